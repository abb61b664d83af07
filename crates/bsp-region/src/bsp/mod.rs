//! Generic Binary Space Partitioning tree.
//!
//! This module provides an arena-backed BSP tree parameterized over the
//! hyperplane type of the space being partitioned and over a per-node
//! payload. The tree supports:
//!
//! - Bottom-up construction by cutting leaves, and top-down insertion of
//!   hyperplane convex subsets
//! - Copying and importing subtrees, within a tree or across trees
//! - Re-rooting a subtree on a partitioning subset (`split_subtree`), the
//!   primitive that lets two differently shaped trees be merged
//! - Visitor traversal with per-node ordering and pruning
//!
//! # Example
//!
//! ```ignore
//! use bsp_region::bsp::{BspTree, FnVisitor, VisitResult};
//!
//! let mut tree: BspTree<Line2D, ()> = BspTree::new(());
//! let root = tree.root();
//! tree.cut(root, &line);
//!
//! let mut leaves = 0;
//! tree.accept(&mut FnVisitor::new(|node| {
//!     if node.is_leaf() {
//!         leaves += 1;
//!     }
//!     VisitResult::Continue
//! }));
//! ```
//!
//! # Architecture
//!
//! - [`BspTree`]: The container owning every node in an arena
//! - [`NodeId`]: Generational handle to a node
//! - [`NodeRef`]: Borrowed view of a node for navigation
//! - [`NodeData`]: Trait for the payload carried by each node
//! - [`BspVisitor`]: Visitor trait for custom traversal behavior

mod node;
mod tree;
mod visitor;

pub use node::{Node, NodeData, NodeId, NodeRef};
pub use tree::{BspTree, FindCutRule, Nodes};
pub use visitor::{BspVisitor, FnVisitor, VisitOrder, VisitResult};
