//! Geometry contract consumed by the BSP engine.
//!
//! The tree never looks at coordinates. Everything it needs from a concrete
//! space (points, hyperplanes and convex pieces of hyperplanes) is expressed
//! by the traits in this module.

use std::fmt::Debug;

/// A point in the space partitioned by a tree.
pub trait Point: Clone + Debug {
    /// Returns `true` if any coordinate is NaN.
    fn is_nan(&self) -> bool;

    /// Euclidean distance to another point.
    fn distance(&self, other: &Self) -> f64;
}

/// Location of a point relative to a hyperplane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HyperplaneLocation {
    /// Point is on the minus side of the hyperplane
    Minus,
    /// Point is on the plus side of the hyperplane
    Plus,
    /// Point lies on the hyperplane (within the hyperplane's precision)
    On,
}

/// Which side(s) of a splitter a split value ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitLocation {
    /// Entirely on the minus side
    Minus,
    /// Entirely on the plus side
    Plus,
    /// Parts on both sides
    Both,
    /// On neither side, e.g. a subset lying directly on the splitter
    Neither,
}

/// Result of splitting a value by a hyperplane.
#[derive(Debug, Clone, PartialEq)]
pub struct Split<T> {
    minus: Option<T>,
    plus: Option<T>,
}

impl<T> Split<T> {
    /// Creates a split from its two (optional) halves.
    pub fn new(minus: Option<T>, plus: Option<T>) -> Self {
        Self { minus, plus }
    }

    /// Returns the part on the minus side of the splitter.
    #[inline]
    pub fn minus(&self) -> Option<&T> {
        self.minus.as_ref()
    }

    /// Returns the part on the plus side of the splitter.
    #[inline]
    pub fn plus(&self) -> Option<&T> {
        self.plus.as_ref()
    }

    /// Consumes the split, returning `(minus, plus)`.
    #[inline]
    pub fn into_parts(self) -> (Option<T>, Option<T>) {
        (self.minus, self.plus)
    }

    /// Derives the split location from which halves are present.
    pub fn location(&self) -> SplitLocation {
        match (&self.minus, &self.plus) {
            (Some(_), Some(_)) => SplitLocation::Both,
            (Some(_), None) => SplitLocation::Minus,
            (None, Some(_)) => SplitLocation::Plus,
            (None, None) => SplitLocation::Neither,
        }
    }
}

/// Size and centroid of a region.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeProperties<P> {
    /// Size of the region (area in 2D); infinite for unbounded regions
    pub size: f64,
    /// Centroid of the region; `None` for empty or unbounded regions
    pub centroid: Option<P>,
}

impl<P> SizeProperties<P> {
    pub fn new(size: f64, centroid: Option<P>) -> Self {
        Self { size, centroid }
    }

    /// Properties of an unbounded region.
    pub fn infinite() -> Self {
        Self::new(f64::INFINITY, None)
    }

    /// Properties of an empty region.
    pub fn zero() -> Self {
        Self::new(0.0, None)
    }
}

/// A codimension-1 surface splitting space into a minus and a plus side.
pub trait Hyperplane: Clone + Debug {
    type Point: Point;
    type ConvexSubset: HyperplaneConvexSubset<Hyperplane = Self>;

    /// Classifies a point against this hyperplane.
    fn classify(&self, point: &Self::Point) -> HyperplaneLocation;

    /// Signed distance from the hyperplane to a point.
    /// Negative on the minus side, positive on the plus side.
    fn offset(&self, point: &Self::Point) -> f64;

    /// Returns a convex subset covering the entire hyperplane.
    fn span(&self) -> Self::ConvexSubset;

    /// Returns `true` if both hyperplanes point their plus sides in roughly
    /// the same direction.
    fn similar_orientation(&self, other: &Self) -> bool;

    /// Computes the size and centroid of a region that is neither empty nor
    /// full from its boundaries. Every boundary has its plus side pointing
    /// away from the region.
    fn region_size(boundaries: &[Self::ConvexSubset]) -> SizeProperties<Self::Point>;
}

/// A convex region confined to a single hyperplane.
pub trait HyperplaneConvexSubset: Clone + Debug {
    type Hyperplane: Hyperplane<ConvexSubset = Self>;

    /// The hyperplane containing this subset.
    fn hyperplane(&self) -> &Self::Hyperplane;

    /// Splits this subset by a hyperplane.
    ///
    /// A subset lying on the splitter ends up on [`SplitLocation::Neither`].
    fn split(&self, splitter: &Self::Hyperplane) -> Split<Self>;

    /// Returns the same point set lying on the reversed hyperplane.
    fn reverse(&self) -> Self;

    /// Size of the subset (length in 2D); may be infinite.
    fn size(&self) -> f64;

    /// Point in this subset closest to `point`.
    fn closest(&self, point: &PointOf<Self::Hyperplane>) -> PointOf<Self::Hyperplane>;

    /// Returns `true` if `point` lies in this subset.
    fn contains(&self, point: &PointOf<Self::Hyperplane>) -> bool;
}

/// Point type of a hyperplane.
pub type PointOf<H> = <H as Hyperplane>::Point;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_location_from_parts() {
        assert_eq!(Split::new(Some(1), Some(2)).location(), SplitLocation::Both);
        assert_eq!(Split::new(Some(1), None).location(), SplitLocation::Minus);
        assert_eq!(Split::<i32>::new(None, Some(2)).location(), SplitLocation::Plus);
        assert_eq!(Split::<i32>::new(None, None).location(), SplitLocation::Neither);
    }

    #[test]
    fn split_into_parts() {
        let split = Split::new(Some("a"), None);
        assert_eq!(split.minus(), Some(&"a"));
        assert_eq!(split.plus(), None);
        assert_eq!(split.into_parts(), (Some("a"), None));
    }
}
