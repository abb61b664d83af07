//! Per-node and tree-wide data of region trees.

use std::fmt::{self, Debug};
use std::sync::OnceLock;

use crate::bsp::NodeData;
use crate::hyperplane::{HyperplaneConvexSubset, PointOf, SizeProperties};

use super::boundary::RegionCutBoundary;
use super::location::RegionLocation;

/// Data stored at every node of a region tree.
///
/// Leaves use the location. Internal nodes lazily cache the part of their
/// cut that lies on the region boundary.
#[derive(Clone)]
pub struct RegionNode<C> {
    pub(crate) location: RegionLocation,
    pub(crate) cut_boundary: OnceLock<RegionCutBoundary<C>>,
}

impl<C> RegionNode<C> {
    pub(crate) fn new(location: RegionLocation) -> Self {
        Self {
            location,
            cut_boundary: OnceLock::new(),
        }
    }

    /// Stored location. Only meaningful on leaves.
    #[inline]
    pub fn location(&self) -> RegionLocation {
        self.location
    }
}

impl<C> Debug for RegionNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.location)
    }
}

impl<C: HyperplaneConvexSubset> NodeData for RegionNode<C> {
    type TreeCache = RegionCache<PointOf<C::Hyperplane>>;

    fn invalidate(&mut self) {
        self.cut_boundary.take();
    }
}

/// Aggregates computed over a whole region tree on first access.
#[derive(Debug, Clone)]
pub struct RegionCache<P> {
    pub(crate) boundary_size: OnceLock<f64>,
    pub(crate) size: OnceLock<SizeProperties<P>>,
}

impl<P> Default for RegionCache<P> {
    fn default() -> Self {
        Self {
            boundary_size: OnceLock::new(),
            size: OnceLock::new(),
        }
    }
}
