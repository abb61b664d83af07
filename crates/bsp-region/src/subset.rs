//! Non-convex subsets of a single hyperplane.

use crate::hyperplane::{Hyperplane, HyperplaneConvexSubset};

/// A union of convex subsets that all lie on the same hyperplane.
#[derive(Debug, Clone)]
pub struct HyperplaneSubset<C: HyperplaneConvexSubset> {
    hyperplane: C::Hyperplane,
    convex: Vec<C>,
}

impl<C: HyperplaneConvexSubset> HyperplaneSubset<C> {
    /// Creates an empty subset of `hyperplane`.
    pub fn new(hyperplane: C::Hyperplane) -> Self {
        Self {
            hyperplane,
            convex: Vec::new(),
        }
    }

    /// Starts a builder accumulating fragments on `hyperplane`.
    pub fn builder(hyperplane: C::Hyperplane) -> Builder<C> {
        Builder {
            subset: Self::new(hyperplane),
        }
    }

    #[inline]
    pub fn hyperplane(&self) -> &C::Hyperplane {
        &self.hyperplane
    }

    /// Returns the convex pieces making up this subset.
    #[inline]
    pub fn to_convex(&self) -> &[C] {
        &self.convex
    }

    /// Consumes the subset, returning its convex pieces.
    pub fn into_convex(self) -> Vec<C> {
        self.convex
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.convex.is_empty()
    }

    /// Total size of all convex pieces.
    pub fn size(&self) -> f64 {
        self.convex.iter().map(|c| c.size()).sum()
    }
}

/// Accumulates convex fragments into a [`HyperplaneSubset`].
#[derive(Debug, Clone)]
pub struct Builder<C: HyperplaneConvexSubset> {
    subset: HyperplaneSubset<C>,
}

impl<C: HyperplaneConvexSubset> Builder<C> {
    /// Adds a convex fragment.
    ///
    /// # Panics (debug builds only)
    /// Panics if the fragment faces away from the builder's hyperplane.
    pub fn add(&mut self, convex: C) -> &mut Self {
        debug_assert!(
            convex
                .hyperplane()
                .similar_orientation(&self.subset.hyperplane),
            "Fragment must face the same way as the builder's hyperplane"
        );
        self.subset.convex.push(convex);
        self
    }

    /// Finishes building.
    pub fn build(self) -> HyperplaneSubset<C> {
        self.subset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Line2D, LineSegment, Precision};
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    #[test]
    fn builder_accumulates_fragments() {
        let precision = Precision::default();
        let line = Line2D::from_points(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), precision);

        let mut builder = HyperplaneSubset::builder(line.clone());
        builder
            .add(LineSegment::new(line.clone(), 0.0, 1.0))
            .add(LineSegment::new(line, 2.0, 4.0));
        let subset = builder.build();

        assert!(!subset.is_empty());
        assert_eq!(subset.to_convex().len(), 2);
        assert_relative_eq!(subset.size(), 3.0);
    }

    #[test]
    fn new_subset_is_empty() {
        let line = Line2D::from_points(
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Precision::default(),
        );
        let subset: HyperplaneSubset<LineSegment> = HyperplaneSubset::new(line);
        assert!(subset.is_empty());
        assert_eq!(subset.size(), 0.0);
    }
}
