//! Binary Space Partitioning trees and the regions they represent.
//!
//! The [`bsp`] module holds a generic BSP tree over any hyperplane type; the
//! [`region`] module specializes it to sets of points with boolean algebra.
//! [`Line2D`] and [`LineSegment`] provide a two-dimensional Euclidean
//! geometry implementing the [`hyperplane`] traits.

pub mod bsp;
pub mod error;
pub mod hyperplane;
mod line;
mod precision;
pub mod region;
mod segment;
pub mod subset;

pub use bsp::{BspTree, NodeId, NodeRef};
pub use error::RegionError;
pub use line::Line2D;
pub use precision::{DEFAULT_EPSILON, Precision};
pub use region::{BooleanOp, CutRule, RegionLocation, RegionTree};
pub use segment::LineSegment;
