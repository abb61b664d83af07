//! Oriented line representation for 2D region trees.

use nalgebra::{Point2, Vector2};

use crate::hyperplane::{Hyperplane, HyperplaneLocation, Point, SizeProperties};
use crate::{LineSegment, Precision};

impl Point for Point2<f64> {
    #[inline]
    fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }

    #[inline]
    fn distance(&self, other: &Self) -> f64 {
        nalgebra::distance(self, other)
    }
}

/// An oriented line in 2D space.
///
/// The line is stored as an origin point and a unit direction. The plus side
/// lies to the right of the direction (clockwise), so a counter-clockwise
/// boundary loop has its enclosed area on the minus side.
#[derive(Debug, Clone, PartialEq)]
pub struct Line2D {
    origin: Point2<f64>,
    direction: Vector2<f64>,
    precision: Precision,
}

impl Line2D {
    /// Creates a line through `point` heading in `direction`.
    ///
    /// # Panics
    /// Panics if the direction has zero length (within `precision`).
    pub fn from_point_and_direction(
        point: Point2<f64>,
        direction: Vector2<f64>,
        precision: Precision,
    ) -> Self {
        let norm = direction.norm();
        assert!(
            !precision.eq_zero(norm) && norm.is_finite(),
            "Line direction cannot be zero"
        );
        let direction = direction / norm;
        // Store the point closest to the coordinate origin so equal lines compare equal
        let origin = point - direction * point.coords.dot(&direction);
        Self {
            origin,
            direction,
            precision,
        }
    }

    /// Creates a line passing through `start` and then `end`.
    ///
    /// # Panics
    /// Panics if the points are equal (within `precision`).
    pub fn from_points(start: Point2<f64>, end: Point2<f64>, precision: Precision) -> Self {
        Self::from_point_and_direction(start, end - start, precision)
    }

    /// Returns the point on the line closest to the coordinate origin.
    #[inline]
    pub fn origin(&self) -> Point2<f64> {
        self.origin
    }

    /// Returns the unit direction of the line.
    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        self.direction
    }

    /// Returns the unit normal pointing to the plus side.
    #[inline]
    pub fn normal(&self) -> Vector2<f64> {
        Vector2::new(self.direction.y, -self.direction.x)
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Location of the projection of `point` along the line, measured from
    /// the origin in the line's direction.
    #[inline]
    pub fn abscissa(&self, point: &Point2<f64>) -> f64 {
        (*point - self.origin).dot(&self.direction)
    }

    /// Returns the point at `abscissa` along the line.
    #[inline]
    pub fn point_at(&self, abscissa: f64) -> Point2<f64> {
        self.origin + self.direction * abscissa
    }

    /// Projects a point onto the line (finds the closest point on the line).
    #[inline]
    pub fn project(&self, point: &Point2<f64>) -> Point2<f64> {
        self.point_at(self.abscissa(point))
    }

    /// Returns `true` if `point` lies on the line.
    #[inline]
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        self.classify(point) == HyperplaneLocation::On
    }

    /// Returns a new line with the direction flipped, swapping the minus and
    /// plus sides.
    pub fn reverse(&self) -> Self {
        Self {
            origin: self.origin,
            direction: -self.direction,
            precision: self.precision,
        }
    }

    /// Computes the intersection point with another line.
    ///
    /// Returns `None` if the lines are parallel or coincident.
    pub fn intersection(&self, other: &Line2D) -> Option<Point2<f64>> {
        let d1 = self.direction;
        let d2 = other.direction;
        let denom = d1.perp(&d2);
        if self.precision.eq_zero(denom) {
            return None;
        }
        let t = (other.origin - self.origin).perp(&d2) / denom;
        Some(self.point_at(t))
    }

    /// Returns `true` if the lines are parallel (or anti-parallel).
    pub fn is_parallel(&self, other: &Line2D) -> bool {
        self.precision.eq_zero(self.direction.perp(&other.direction))
    }

    /// Signed distance of a parallel line from this one, measured at its origin.
    pub(crate) fn offset_of_line(&self, other: &Line2D) -> f64 {
        self.offset(&other.origin)
    }
}

impl Hyperplane for Line2D {
    type Point = Point2<f64>;
    type ConvexSubset = LineSegment;

    fn classify(&self, point: &Point2<f64>) -> HyperplaneLocation {
        match self.precision.sign(self.offset(point)) {
            std::cmp::Ordering::Less => HyperplaneLocation::Minus,
            std::cmp::Ordering::Greater => HyperplaneLocation::Plus,
            std::cmp::Ordering::Equal => HyperplaneLocation::On,
        }
    }

    #[inline]
    fn offset(&self, point: &Point2<f64>) -> f64 {
        (*point - self.origin).dot(&self.normal())
    }

    fn span(&self) -> LineSegment {
        LineSegment::full(self.clone())
    }

    fn similar_orientation(&self, other: &Self) -> bool {
        self.direction.dot(&other.direction) >= 0.0
    }

    /// Shoelace formula over the boundary. Bounded regions have their
    /// boundary wound counter-clockwise, giving a positive signed area; the
    /// complement of a bounded region winds clockwise and is reported as
    /// infinite, as is any region with an unbounded boundary.
    fn region_size(boundaries: &[LineSegment]) -> SizeProperties<Point2<f64>> {
        let mut twice_area = 0.0;
        let mut centroid_sum = Vector2::zeros();

        for boundary in boundaries {
            let (Some(start), Some(end)) = (boundary.start_point(), boundary.end_point()) else {
                return SizeProperties::infinite();
            };
            let cross = start.coords.perp(&end.coords);
            twice_area += cross;
            centroid_sum += (start.coords + end.coords) * cross;
        }

        let precision = boundaries
            .first()
            .map(|b| b.line().precision())
            .unwrap_or_default();

        if precision.lt(twice_area, 0.0) {
            return SizeProperties::infinite();
        }
        if precision.eq_zero(twice_area) {
            return SizeProperties::zero();
        }

        let area = 0.5 * twice_area;
        let centroid = Point2::from(centroid_sum / (3.0 * twice_area));
        SizeProperties::new(area, Some(centroid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_line(a: [f64; 2], b: [f64; 2]) -> Line2D {
        Line2D::from_points(
            Point2::new(a[0], a[1]),
            Point2::new(b[0], b[1]),
            Precision::default(),
        )
    }

    #[test]
    fn plus_side_is_to_the_right() {
        let line = make_line([0.0, 0.0], [1.0, 0.0]);
        assert_eq!(line.classify(&Point2::new(0.5, -1.0)), HyperplaneLocation::Plus);
        assert_eq!(line.classify(&Point2::new(0.5, 1.0)), HyperplaneLocation::Minus);
        assert_eq!(line.classify(&Point2::new(7.0, 0.0)), HyperplaneLocation::On);
        assert_relative_eq!(line.offset(&Point2::new(3.0, -2.0)), 2.0);
    }

    #[test]
    fn origin_is_closest_point_to_zero() {
        let line = make_line([-3.0, 1.0], [4.0, 1.0]);
        assert_relative_eq!(line.origin(), Point2::new(0.0, 1.0));
        assert_eq!(line, make_line([10.0, 1.0], [11.0, 1.0]));
    }

    #[test]
    fn abscissa_and_point_at_round_trip() {
        let line = make_line([1.0, 1.0], [2.0, 2.0]);
        let point = Point2::new(3.0, 3.0);
        let abscissa = line.abscissa(&point);
        assert_relative_eq!(line.point_at(abscissa), point, epsilon = 1e-12);
    }

    #[test]
    fn projection_onto_line() {
        let line = make_line([0.0, 0.0], [1.0, 0.0]);
        assert_relative_eq!(line.project(&Point2::new(2.5, 4.0)), Point2::new(2.5, 0.0));
    }

    #[test]
    fn reverse_flips_sides() {
        let line = make_line([0.0, 0.0], [1.0, 0.0]);
        let reversed = line.reverse();
        let point = Point2::new(0.0, 1.0);
        assert_eq!(line.classify(&point), HyperplaneLocation::Minus);
        assert_eq!(reversed.classify(&point), HyperplaneLocation::Plus);
        assert!(!line.similar_orientation(&reversed));
        assert!(line.similar_orientation(&line));
    }

    #[test]
    fn intersection_of_crossing_lines() {
        let a = make_line([0.0, 0.0], [1.0, 1.0]);
        let b = make_line([0.0, 2.0], [1.0, 1.0]);
        let point = a.intersection(&b).unwrap();
        assert_relative_eq!(point, Point2::new(1.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let a = make_line([0.0, 0.0], [1.0, 0.0]);
        let b = make_line([0.0, 1.0], [-1.0, 1.0]);
        assert!(a.is_parallel(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    #[should_panic(expected = "cannot be zero")]
    fn coincident_points_panic() {
        make_line([1.0, 1.0], [1.0, 1.0]);
    }

    #[test]
    fn nan_point_detection() {
        assert!(Point2::new(f64::NAN, 0.0).is_nan());
        assert!(!Point2::new(0.0, 0.0).is_nan());
    }

    #[test]
    fn unit_square_size_properties() {
        let precision = Precision::default();
        let boundaries = LineSegment::closed_path(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            precision,
        );
        let props = Line2D::region_size(&boundaries);
        assert_relative_eq!(props.size, 1.0, epsilon = 1e-12);
        assert_relative_eq!(props.centroid.unwrap(), Point2::new(0.5, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn clockwise_loop_is_infinite() {
        let precision = Precision::default();
        let boundaries = LineSegment::closed_path(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 1.0),
                Point2::new(1.0, 1.0),
            ],
            precision,
        );
        let props = Line2D::region_size(&boundaries);
        assert!(props.size.is_infinite());
        assert!(props.centroid.is_none());
    }
}
