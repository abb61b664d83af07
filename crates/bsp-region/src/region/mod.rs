//! Regions of space represented by BSP trees.
//!
//! A [`RegionTree`] labels every leaf cell of a BSP tree as inside or
//! outside a region. On top of the generic tree it provides:
//!
//! - Point classification (inside, outside or on the boundary)
//! - Boundaries derived from the cut structure, plus size and centroid
//! - Boolean algebra: union, intersection, difference, xor and complement
//! - Splitting a region by a hyperplane, condensing redundant cuts, and
//!   projecting points onto the boundary
//!
//! # Example
//!
//! ```ignore
//! use bsp_region::{Line2D, LineSegment, Precision, RegionTree};
//!
//! let square = RegionTree::<Line2D>::from_boundaries(LineSegment::closed_path(
//!     &corners,
//!     Precision::default(),
//! ));
//! let mut shape = square.clone();
//! shape.difference(&hole);
//! ```

mod boundary;
mod condense;
mod location;
mod merge;
mod node;
mod projector;
mod tree;

pub use boundary::RegionCutBoundary;
pub use location::{CutRule, RegionLocation};
pub use merge::BooleanOp;
pub use node::{RegionCache, RegionNode};
pub use tree::{BoundarySource, RegionTree};
