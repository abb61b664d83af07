//! Convex subsets of 2D lines: segments, rays and full lines.

use std::cmp::Ordering;

use nalgebra::Point2;

use crate::hyperplane::{Hyperplane, HyperplaneConvexSubset, Split};
use crate::{Line2D, Precision};

/// A convex subset of a [`Line2D`], stored as an abscissa interval
/// `[start, end]` along the line.
///
/// Either bound may be infinite, so the same type represents finite segments,
/// rays, reverse rays and the full line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    line: Line2D,
    start: f64,
    end: f64,
}

impl LineSegment {
    /// Creates the subset of `line` between the abscissas `start` and `end`.
    ///
    /// # Panics (debug builds only)
    /// Panics if `start > end` or either bound is NaN.
    pub fn new(line: Line2D, start: f64, end: f64) -> Self {
        debug_assert!(start <= end, "Segment start must not exceed its end");
        Self { line, start, end }
    }

    /// Creates a subset covering the whole line.
    pub fn full(line: Line2D) -> Self {
        Self::new(line, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Creates a finite segment from `start` to `end`.
    ///
    /// # Panics
    /// Panics if the points are equal (within `precision`).
    pub fn from_points(start: Point2<f64>, end: Point2<f64>, precision: Precision) -> Self {
        let line = Line2D::from_points(start, end, precision);
        let a = line.abscissa(&start);
        let b = line.abscissa(&end);
        Self::new(line, a, b)
    }

    /// Creates a ray starting at `start` and following the line's direction.
    pub fn ray(line: Line2D, start: Point2<f64>) -> Self {
        let a = line.abscissa(&start);
        Self::new(line, a, f64::INFINITY)
    }

    /// Creates the segments of a closed loop through `vertices`, including the
    /// closing edge from the last vertex back to the first.
    ///
    /// A counter-clockwise loop bounds its interior on the minus side of
    /// every segment.
    pub fn closed_path(vertices: &[Point2<f64>], precision: Precision) -> Vec<LineSegment> {
        let n = vertices.len();
        (0..n)
            .map(|i| LineSegment::from_points(vertices[i], vertices[(i + 1) % n], precision))
            .collect()
    }

    #[inline]
    pub fn line(&self) -> &Line2D {
        &self.line
    }

    /// Start abscissa; negative infinity for reverse rays and full lines.
    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End abscissa; positive infinity for rays and full lines.
    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn start_point(&self) -> Option<Point2<f64>> {
        self.start.is_finite().then(|| self.line.point_at(self.start))
    }

    pub fn end_point(&self) -> Option<Point2<f64>> {
        self.end.is_finite().then(|| self.line.point_at(self.end))
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        !self.is_finite()
    }

    fn with_bounds(&self, start: f64, end: f64) -> Self {
        Self::new(self.line.clone(), start, end)
    }
}

impl HyperplaneConvexSubset for LineSegment {
    type Hyperplane = Line2D;

    #[inline]
    fn hyperplane(&self) -> &Line2D {
        &self.line
    }

    /// Splits at the intersection with `splitter`, walking along the line in
    /// the direction of the splitter's plus side.
    fn split(&self, splitter: &Line2D) -> Split<Self> {
        let precision = self.line.precision();

        let Some(intersection) = splitter.intersection(&self.line) else {
            // Parallel: entirely on one side, or lying on the splitter
            return match precision.sign(splitter.offset_of_line(&self.line)) {
                Ordering::Less => Split::new(Some(self.clone()), None),
                Ordering::Greater => Split::new(None, Some(self.clone())),
                Ordering::Equal => Split::new(None, None),
            };
        };

        let t = self.line.abscissa(&intersection);
        let increasing_is_plus = splitter.normal().dot(&self.line.direction()) > 0.0;

        let (low, high) = if precision.lte(t, self.start) {
            (None, Some(self.clone()))
        } else if precision.gte(t, self.end) {
            (Some(self.clone()), None)
        } else {
            (
                Some(self.with_bounds(self.start, t)),
                Some(self.with_bounds(t, self.end)),
            )
        };

        if increasing_is_plus {
            Split::new(low, high)
        } else {
            Split::new(high, low)
        }
    }

    fn reverse(&self) -> Self {
        // The reversed line shares the origin, so abscissas simply negate
        Self::new(self.line.reverse(), -self.end, -self.start)
    }

    #[inline]
    fn size(&self) -> f64 {
        self.end - self.start
    }

    fn closest(&self, point: &Point2<f64>) -> Point2<f64> {
        let t = self.line.abscissa(point).clamp(self.start, self.end);
        self.line.point_at(t)
    }

    fn contains(&self, point: &Point2<f64>) -> bool {
        let precision = self.line.precision();
        let t = self.line.abscissa(point);
        self.line.contains(point) && precision.gte(t, self.start) && precision.lte(t, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperplane::SplitLocation;
    use approx::assert_relative_eq;

    fn make_segment(a: [f64; 2], b: [f64; 2]) -> LineSegment {
        LineSegment::from_points(
            Point2::new(a[0], a[1]),
            Point2::new(b[0], b[1]),
            Precision::default(),
        )
    }

    fn make_line(a: [f64; 2], b: [f64; 2]) -> Line2D {
        Line2D::from_points(
            Point2::new(a[0], a[1]),
            Point2::new(b[0], b[1]),
            Precision::default(),
        )
    }

    #[test]
    fn segment_endpoints_and_size() {
        let segment = make_segment([1.0, 1.0], [4.0, 5.0]);
        assert_relative_eq!(segment.size(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(segment.start_point().unwrap(), Point2::new(1.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(segment.end_point().unwrap(), Point2::new(4.0, 5.0), epsilon = 1e-12);
        assert!(segment.is_finite());
    }

    #[test]
    fn full_line_is_infinite() {
        let full = make_line([0.0, 0.0], [1.0, 0.0]).span();
        assert!(full.is_infinite());
        assert!(full.start_point().is_none());
        assert!(full.end_point().is_none());
        assert_eq!(full.size(), f64::INFINITY);
    }

    #[test]
    fn ray_starts_at_point_and_is_unbounded() {
        let line = make_line([0.0, 1.0], [1.0, 1.0]);
        let ray = LineSegment::ray(line, Point2::new(3.0, 1.0));

        assert_relative_eq!(ray.start_point().unwrap(), Point2::new(3.0, 1.0), epsilon = 1e-12);
        assert!(ray.end_point().is_none());
        assert!(ray.is_infinite());
        assert!(ray.contains(&Point2::new(10.0, 1.0)));
        assert!(!ray.contains(&Point2::new(2.0, 1.0)));
        assert_relative_eq!(ray.closest(&Point2::new(0.0, 4.0)), Point2::new(3.0, 1.0));
    }

    #[test]
    fn spanning_segment_is_split() {
        // Horizontal segment crossing the vertical splitter x = 1 (plus side is +x)
        let segment = make_segment([0.0, 0.0], [3.0, 0.0]);
        let splitter = make_line([1.0, 0.0], [1.0, 1.0]);

        let split = segment.split(&splitter);
        assert_eq!(split.location(), SplitLocation::Both);

        let minus = split.minus().unwrap();
        let plus = split.plus().unwrap();
        assert_relative_eq!(minus.start_point().unwrap(), Point2::new(0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(minus.end_point().unwrap(), Point2::new(1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(plus.start_point().unwrap(), Point2::new(1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(plus.end_point().unwrap(), Point2::new(3.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn split_follows_splitter_orientation() {
        let segment = make_segment([0.0, 0.0], [3.0, 0.0]);
        // Same line as above but reversed: plus side is now -x
        let splitter = make_line([1.0, 1.0], [1.0, 0.0]);

        let split = segment.split(&splitter);
        assert_relative_eq!(split.minus().unwrap().size(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(split.plus().unwrap().size(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn segment_touching_splitter_stays_whole() {
        let segment = make_segment([1.0, 0.0], [3.0, 0.0]);
        let splitter = make_line([1.0, 0.0], [1.0, 1.0]);

        let split = segment.split(&splitter);
        assert_eq!(split.location(), SplitLocation::Plus);
        assert_eq!(split.plus().unwrap(), &segment);
    }

    #[test]
    fn parallel_segments_fall_on_one_side() {
        let segment = make_segment([0.0, 1.0], [3.0, 1.0]);
        let below = make_line([0.0, 0.0], [1.0, 0.0]);
        let above = make_line([0.0, 2.0], [1.0, 2.0]);

        assert_eq!(segment.split(&below).location(), SplitLocation::Minus);
        assert_eq!(segment.split(&above).location(), SplitLocation::Plus);
    }

    #[test]
    fn coincident_segment_is_neither() {
        let segment = make_segment([0.0, 0.0], [3.0, 0.0]);
        let same = make_line([5.0, 0.0], [6.0, 0.0]);
        let opposite = same.reverse();

        assert_eq!(segment.split(&same).location(), SplitLocation::Neither);
        assert_eq!(segment.split(&opposite).location(), SplitLocation::Neither);
    }

    #[test]
    fn full_line_split_gives_rays() {
        let full = make_line([0.0, 0.0], [1.0, 0.0]).span();
        let splitter = make_line([2.0, -1.0], [2.0, 1.0]);

        let split = full.split(&splitter);
        let (minus, plus) = split.into_parts();
        let (minus, plus) = (minus.unwrap(), plus.unwrap());

        // splitter plus side faces +x
        assert_relative_eq!(minus.end_point().unwrap(), Point2::new(2.0, 0.0), epsilon = 1e-12);
        assert!(minus.start_point().is_none());
        assert_relative_eq!(plus.start_point().unwrap(), Point2::new(2.0, 0.0), epsilon = 1e-12);
        assert!(plus.end_point().is_none());
    }

    #[test]
    fn reverse_keeps_points_and_flips_direction() {
        let segment = make_segment([0.0, 0.0], [2.0, 0.0]);
        let reversed = segment.reverse();

        assert_relative_eq!(
            reversed.start_point().unwrap(),
            Point2::new(2.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(reversed.end_point().unwrap(), Point2::new(0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(reversed.size(), segment.size());
        assert!(!reversed.line().similar_orientation(segment.line()));
    }

    #[test]
    fn closest_point_is_clamped() {
        let segment = make_segment([0.0, 0.0], [2.0, 0.0]);
        assert_relative_eq!(segment.closest(&Point2::new(1.0, 5.0)), Point2::new(1.0, 0.0));
        assert_relative_eq!(segment.closest(&Point2::new(-3.0, 1.0)), Point2::new(0.0, 0.0));
        assert_relative_eq!(segment.closest(&Point2::new(9.0, -1.0)), Point2::new(2.0, 0.0));
    }

    #[test]
    fn contains_checks_line_and_bounds() {
        let segment = make_segment([0.0, 0.0], [2.0, 0.0]);
        assert!(segment.contains(&Point2::new(1.0, 0.0)));
        assert!(segment.contains(&Point2::new(2.0, 0.0)));
        assert!(!segment.contains(&Point2::new(3.0, 0.0)));
        assert!(!segment.contains(&Point2::new(1.0, 0.5)));
    }

    #[test]
    fn closed_path_wraps_around() {
        let path = LineSegment::closed_path(
            &[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)],
            Precision::default(),
        );
        assert_eq!(path.len(), 3);
        assert_relative_eq!(path[2].end_point().unwrap(), Point2::new(0.0, 0.0), epsilon = 1e-12);
    }
}
