//! BSP tree node implementation.

use std::fmt::Debug;

use slotmap::new_key_type;

use crate::hyperplane::{Hyperplane, HyperplaneConvexSubset};

use super::tree::BspTree;

new_key_type! {
    /// Handle to a node owned by a [`BspTree`].
    ///
    /// Handles are generational: once a node is removed by a mutation, its
    /// handle no longer resolves, even if the slot is reused later.
    pub struct NodeId;
}

/// Per-node payload stored by a [`BspTree`].
pub trait NodeData: Clone + Debug {
    /// Tree-wide values derived from the whole node graph. The tree resets
    /// this to its default on every structural change.
    type TreeCache: Default + Clone + Debug;

    /// Drops any value derived from the node's subtree.
    ///
    /// Called on a node and all of its ancestors whenever the subtree below
    /// them changes.
    fn invalidate(&mut self) {}
}

impl NodeData for () {
    type TreeCache = ();
}

/// The cut stored at an internal node, with its two children.
#[derive(Debug, Clone)]
pub(crate) struct Cut<C> {
    pub(crate) subset: C,
    pub(crate) minus: NodeId,
    pub(crate) plus: NodeId,
}

/// A node in the BSP tree.
///
/// A node is either a leaf, or an internal node that stores a cut (a convex
/// subset of a hyperplane confined to the node's cell) and exactly two
/// children: the minus child on the minus side of the cut and the plus child
/// on the plus side.
#[derive(Debug, Clone)]
pub struct Node<C, D> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) cut: Option<Cut<C>>,
    pub(crate) data: D,
}

impl<C, D> Node<C, D> {
    pub(crate) fn new(data: D) -> Self {
        Self {
            parent: None,
            cut: None,
            data,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.cut.is_none()
    }

    #[inline]
    pub fn is_internal(&self) -> bool {
        self.cut.is_some()
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the cut subset of an internal node.
    #[inline]
    pub fn cut(&self) -> Option<&C> {
        self.cut.as_ref().map(|cut| &cut.subset)
    }

    #[inline]
    pub fn minus(&self) -> Option<NodeId> {
        self.cut.as_ref().map(|cut| cut.minus)
    }

    #[inline]
    pub fn plus(&self) -> Option<NodeId> {
        self.cut.as_ref().map(|cut| cut.plus)
    }

    /// Returns `(minus, plus)` for an internal node.
    #[inline]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.cut.as_ref().map(|cut| (cut.minus, cut.plus))
    }

    #[inline]
    pub fn data(&self) -> &D {
        &self.data
    }
}

/// Borrowed view of a node together with the tree that owns it.
///
/// Provides navigation (parent, children) and derived structural
/// properties such as depth and subtree height.
pub struct NodeRef<'a, H: Hyperplane, D: NodeData> {
    tree: &'a BspTree<H, D>,
    id: NodeId,
}

impl<H: Hyperplane, D: NodeData> Clone for NodeRef<'_, H, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: Hyperplane, D: NodeData> Copy for NodeRef<'_, H, D> {}

impl<H: Hyperplane, D: NodeData> Debug for NodeRef<'_, H, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("node", self.node())
            .finish()
    }
}

impl<'a, H: Hyperplane, D: NodeData> NodeRef<'a, H, D> {
    pub(crate) fn new(tree: &'a BspTree<H, D>, id: NodeId) -> Self {
        Self { tree, id }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn tree(&self) -> &'a BspTree<H, D> {
        self.tree
    }

    #[inline]
    fn node(&self) -> &'a Node<H::ConvexSubset, D> {
        self.tree.raw(self.id)
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    #[inline]
    pub fn is_internal(&self) -> bool {
        self.node().is_internal()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    #[inline]
    pub fn data(&self) -> &'a D {
        &self.node().data
    }

    #[inline]
    pub fn cut(&self) -> Option<&'a H::ConvexSubset> {
        self.node().cut()
    }

    /// Returns the hyperplane of the node's cut.
    #[inline]
    pub fn cut_hyperplane(&self) -> Option<&'a H> {
        self.cut().map(|cut| cut.hyperplane())
    }

    pub fn parent(&self) -> Option<Self> {
        self.node().parent.map(|id| Self::new(self.tree, id))
    }

    pub fn minus(&self) -> Option<Self> {
        self.node().minus().map(|id| Self::new(self.tree, id))
    }

    pub fn plus(&self) -> Option<Self> {
        self.node().plus().map(|id| Self::new(self.tree, id))
    }

    /// Returns `true` if this node is the minus child of its parent.
    pub fn is_minus(&self) -> bool {
        self.parent().and_then(|p| p.node().minus()) == Some(self.id)
    }

    /// Returns `true` if this node is the plus child of its parent.
    pub fn is_plus(&self) -> bool {
        self.parent().and_then(|p| p.node().plus()) == Some(self.id)
    }

    /// Number of ancestors between this node and the root (0 for the root).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.node().parent;
        while let Some(id) = current {
            depth += 1;
            current = self.tree.raw(id).parent;
        }
        depth
    }

    /// Height of the subtree rooted here (0 for a leaf).
    pub fn height(&self) -> usize {
        match self.node().children() {
            Some((minus, plus)) => {
                let minus = Self::new(self.tree, minus).height();
                let plus = Self::new(self.tree, plus).height();
                1 + minus.max(plus)
            }
            None => 0,
        }
    }

    /// Number of nodes in the subtree rooted here, including this node.
    pub fn count(&self) -> usize {
        match self.node().children() {
            Some((minus, plus)) => {
                1 + Self::new(self.tree, minus).count() + Self::new(self.tree, plus).count()
            }
            None => 1,
        }
    }
}
