//! Errors reported by region tree operations.

use thiserror::Error;

use crate::bsp::NodeId;
use crate::region::RegionLocation;

/// Error returned when a region tree rejects a requested change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegionError {
    /// Leaves can only be inside or outside; boundary is a query result.
    #[error("invalid leaf location {0:?}; only Inside and Outside can be stored")]
    InvalidLocation(RegionLocation),
    /// Locations can only be set on leaves.
    #[error("node {0:?} is not a leaf")]
    NotALeaf(NodeId),
}
