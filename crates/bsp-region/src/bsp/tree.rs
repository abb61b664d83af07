//! BSP tree container and structural operations.

use std::fmt::Write as _;

use slotmap::SlotMap;
use tracing::{instrument, trace};

use crate::hyperplane::{Hyperplane, HyperplaneConvexSubset, HyperplaneLocation, SplitLocation};

use super::node::{Cut, Node, NodeData, NodeId, NodeRef};
use super::visitor::{BspVisitor, VisitResult, VisitStep};

/// How [`BspTree::find_node`] treats a point lying exactly on a cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FindCutRule {
    /// Stop at the node whose cut contains the point
    #[default]
    Node,
    /// Continue into the minus child
    Minus,
    /// Continue into the plus child
    Plus,
}

/// Which nodes lose their derived values after a mutation.
#[derive(Debug, Clone, Copy)]
enum Invalidation {
    /// The node and its ancestors
    Path(NodeId),
    /// Every node of the subtree, plus the ancestors of its root
    Subtree(NodeId),
}

/// A Binary Space Partitioning tree over an arbitrary hyperplane type.
///
/// The tree exclusively owns its nodes in an arena. Nodes are addressed by
/// generational [`NodeId`] handles; parent and child links are stored as
/// handles, never as references. Every internal node has exactly two
/// children and a cut that lies inside the convex cell carved out by its
/// ancestors' cuts.
///
/// Each node carries a payload `D`. Payload values derived from a subtree
/// (and the tree-wide [`NodeData::TreeCache`]) are invalidated by every
/// mutation through a single internal entry point.
///
/// # Construction
///
/// Trees start as a single leaf and grow either bottom-up by cutting leaves
/// directly, or top-down by inserting hyperplane convex subsets:
///
/// ```ignore
/// let mut tree: BspTree<Line2D, ()> = BspTree::new(());
/// let root = tree.root();
/// tree.cut(root, &line);
/// ```
#[derive(Debug, Clone)]
pub struct BspTree<H: Hyperplane, D: NodeData> {
    nodes: SlotMap<NodeId, Node<H::ConvexSubset, D>>,
    root: NodeId,
    version: u64,
    cache: D::TreeCache,
}

impl<H: Hyperplane, D: NodeData> BspTree<H, D> {
    /// Creates a tree consisting of a single leaf carrying `root_data`.
    pub fn new(root_data: D) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(root_data));
        Self {
            nodes,
            root,
            version: 0,
            cache: D::TreeCache::default(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns a view of the node with the given handle.
    ///
    /// # Panics
    /// Panics if the handle does not refer to a live node of this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> NodeRef<'_, H, D> {
        assert!(
            self.nodes.contains_key(id),
            "Node handle {id:?} does not refer to a live node of this tree"
        );
        NodeRef::new(self, id)
    }

    /// Returns a view of the node with the given handle, if it is live.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, H, D>> {
        self.nodes.contains_key(id).then(|| NodeRef::new(self, id))
    }

    /// Returns `true` if the handle refers to a live node of this tree.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Structural version, incremented by every mutation.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Tree-wide cache slot, reset to its default on every mutation.
    #[inline]
    pub fn cache(&self) -> &D::TreeCache {
        &self.cache
    }

    /// Number of nodes reachable from the root.
    pub fn count(&self) -> usize {
        self.node(self.root).count()
    }

    /// Height of the tree (0 for a single leaf).
    pub fn height(&self) -> usize {
        self.node(self.root).height()
    }

    /// Iterates over all node handles in pre-order (node, minus, plus).
    pub fn nodes(&self) -> Nodes<'_, H, D> {
        Nodes {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Iterates over the handles of all leaves, in pre-order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().filter(|&id| self.raw(id).is_leaf())
    }

    /// Cuts a node with a hyperplane, giving both new children a copy of the
    /// node's data.
    ///
    /// See [`insert_cut`](Self::insert_cut).
    pub fn cut(&mut self, id: NodeId, hyperplane: &H) -> bool {
        self.insert_cut(id, hyperplane, |data: &D| (data.clone(), data.clone()))
    }

    /// Cuts a node with a hyperplane.
    ///
    /// The hyperplane is trimmed to the node's cell. If it intersects the
    /// cell, the trimmed subset becomes the node's cut, two new leaf children
    /// are created, and `init` produces their data (minus, plus) from the
    /// node's data. If it misses the cell, the node is turned back into a
    /// leaf. Any previous cut and children are discarded first.
    ///
    /// Returns `true` if the node is internal afterwards.
    #[instrument(level = "trace", skip_all)]
    pub fn insert_cut<F>(&mut self, id: NodeId, hyperplane: &H, init: F) -> bool
    where
        F: FnOnce(&D) -> (D, D),
    {
        let cut = self.trim_to_node(id, hyperplane.span());
        let is_cut = cut.is_some();
        self.set_node_cut(id, cut, init);
        is_cut
    }

    /// Removes the cut and all descendants of a node, turning it into a leaf.
    /// The node keeps its own data.
    pub fn clear_cut(&mut self, id: NodeId) {
        if self.raw(id).is_internal() {
            self.set_node_cut(id, None, |data: &D| (data.clone(), data.clone()));
        }
    }

    /// Inserts a convex subset top-down.
    ///
    /// The subset is pushed down the tree, being split by every cut it
    /// crosses. Wherever a fragment reaches a leaf, the leaf is cut by the
    /// fragment's hyperplane (trimmed to the leaf's cell) and `init`
    /// initializes the new children. Fragments lying on an existing cut are
    /// dropped.
    #[instrument(level = "trace", skip_all)]
    pub fn insert<F>(&mut self, subset: H::ConvexSubset, init: &F)
    where
        F: Fn(&D) -> (D, D),
    {
        let trimmed = subset.hyperplane().span();
        self.insert_recursive(self.root, subset, trimmed, init);
    }

    fn insert_recursive<F>(
        &mut self,
        id: NodeId,
        insert: H::ConvexSubset,
        trimmed: H::ConvexSubset,
        init: &F,
    ) where
        F: Fn(&D) -> (D, D),
    {
        let Some(cut) = self.raw(id).cut.as_ref() else {
            self.set_node_cut(id, Some(trimmed), init);
            return;
        };

        let hyperplane = cut.subset.hyperplane().clone();
        let (minus, plus) = (cut.minus, cut.plus);

        let (insert_minus, insert_plus) = insert.split(&hyperplane).into_parts();
        if insert_minus.is_none() && insert_plus.is_none() {
            // Lies on this node's cut
            return;
        }

        let (trimmed_minus, trimmed_plus) = trimmed.split(&hyperplane).into_parts();
        if let (Some(insert), Some(trimmed)) = (insert_minus, trimmed_minus) {
            self.insert_recursive(minus, insert, trimmed, init);
        }
        if let (Some(insert), Some(trimmed)) = (insert_plus, trimmed_plus) {
            self.insert_recursive(plus, insert, trimmed, init);
        }
    }

    /// Trims a subset to the cell of a node by splitting it with every
    /// ancestor cut and keeping the side the node lies on.
    ///
    /// Returns `None` if nothing of the subset remains inside the cell.
    pub fn trim_to_node(&self, id: NodeId, subset: H::ConvexSubset) -> Option<H::ConvexSubset> {
        let mut result = subset;
        let mut current = id;
        while let Some(parent) = self.raw(current).parent {
            let cut = self.cut_of(parent);
            let (minus, plus) = result.split(cut.subset.hyperplane()).into_parts();
            result = if cut.minus == current { minus? } else { plus? };
            current = parent;
        }
        Some(result)
    }

    /// Finds the deepest node containing `point`.
    ///
    /// Points lying on a cut are resolved with `rule`.
    pub fn find_node(&self, point: &H::Point, rule: FindCutRule) -> NodeId {
        let mut current = self.root;
        while let Some(cut) = self.raw(current).cut.as_ref() {
            current = match (cut.subset.hyperplane().classify(point), rule) {
                (HyperplaneLocation::Minus, _) | (HyperplaneLocation::On, FindCutRule::Minus) => {
                    cut.minus
                }
                (HyperplaneLocation::Plus, _) | (HyperplaneLocation::On, FindCutRule::Plus) => {
                    cut.plus
                }
                (HyperplaneLocation::On, FindCutRule::Node) => return current,
            };
        }
        current
    }

    /// Visits the whole tree, starting at the root.
    pub fn accept<V: BspVisitor<H, D>>(&self, visitor: &mut V) {
        self.accept_from(self.root, visitor);
    }

    /// Visits the subtree rooted at `id`.
    ///
    /// At each internal node the visitor chooses the order in which the node
    /// and its two children are visited. Returning [`VisitResult::Skip`] from
    /// a node skips whatever part of its subtree has not been visited yet;
    /// [`VisitResult::Terminate`] ends the traversal.
    pub fn accept_from<V: BspVisitor<H, D>>(&self, id: NodeId, visitor: &mut V) {
        self.accept_recursive(id, visitor);
    }

    /// Returns `true` if the traversal was terminated.
    fn accept_recursive<V: BspVisitor<H, D>>(&self, id: NodeId, visitor: &mut V) -> bool {
        let node = self.node(id);
        let Some((minus, plus)) = self.raw(id).children() else {
            return visitor.visit(node) == VisitResult::Terminate;
        };

        for step in visitor.visit_order(node).steps() {
            let terminated = match step {
                VisitStep::Node => match visitor.visit(node) {
                    VisitResult::Continue => false,
                    VisitResult::Skip => return false,
                    VisitResult::Terminate => true,
                },
                VisitStep::Minus => self.accept_recursive(minus, visitor),
                VisitStep::Plus => self.accept_recursive(plus, visitor),
            };
            if terminated {
                return true;
            }
        }
        false
    }

    /// Deep-copies a subtree of another tree into this one.
    ///
    /// Returns the handle of the copied subtree root, which is detached (has
    /// no parent) until it is attached somewhere.
    pub fn import_subtree(&mut self, source: &BspTree<H, D>, id: NodeId) -> NodeId {
        let source_node = source.raw(id);
        let copy = self.nodes.insert(Node::new(source_node.data.clone()));
        if let Some(cut) = source_node.cut.as_ref() {
            let minus = self.import_subtree(source, cut.minus);
            let plus = self.import_subtree(source, cut.plus);
            self.attach(copy, cut.subset.clone(), minus, plus);
        }
        copy
    }

    /// Deep-copies a subtree within this tree. The copy is detached.
    pub fn copy_subtree(&mut self, id: NodeId) -> NodeId {
        let node = self.raw(id);
        let data = node.data.clone();
        let cut = node.cut.clone();
        let copy = self.nodes.insert(Node::new(data));
        if let Some(cut) = cut {
            let minus = self.copy_subtree(cut.minus);
            let plus = self.copy_subtree(cut.plus);
            self.attach(copy, cut.subset, minus, plus);
        }
        copy
    }

    /// Re-roots a subtree on a partitioning subset.
    ///
    /// Returns a new, detached node whose cut is `partitioner` and whose minus
    /// and plus children describe exactly the parts of the original subtree
    /// on each side of the partitioner. Every cut crossing the partitioner is
    /// itself split. `partitioner` must lie inside the cell of `id`.
    ///
    /// The original subtree is consumed: its nodes are reused by the result
    /// or removed, and `id` must not be used afterwards.
    pub fn split_subtree(&mut self, id: NodeId, partitioner: &H::ConvexSubset) -> NodeId {
        let (result_minus, result_plus) = if self.raw(id).is_leaf() {
            self.split_leaf(id)
        } else {
            self.split_internal(id, partitioner)
        };
        let data = self.raw(result_minus).data.clone();
        let result = self.nodes.insert(Node::new(data));
        self.set_subtree(result, partitioner.clone(), result_minus, result_plus);
        result
    }

    /// Both sides of a leaf are the leaf itself.
    fn split_leaf(&mut self, id: NodeId) -> (NodeId, NodeId) {
        let copy = self.copy_node(id);
        self.raw_mut(id).parent = None;
        (copy, id)
    }

    fn split_internal(&mut self, id: NodeId, partitioner: &H::ConvexSubset) -> (NodeId, NodeId) {
        let cut = self.cut_of(id).clone();
        let hyperplane = cut.subset.hyperplane().clone();

        // Split the partitioner and the node cut by each other's hyperplanes
        // to find their relative positions
        let partitioner_split = partitioner.split(&hyperplane);
        let cut_split = cut.subset.split(partitioner.hyperplane());

        match partitioner_split.location() {
            SplitLocation::Plus => {
                let (split_minus, split_plus) = self.split_and_take(cut.plus, partitioner);
                if cut_split.location() == SplitLocation::Plus {
                    // Node cut lies entirely on the partitioner's plus side
                    self.set_subtree(id, cut.subset, cut.minus, split_plus);
                    (split_minus, id)
                } else {
                    self.set_subtree(id, cut.subset, cut.minus, split_minus);
                    (id, split_plus)
                }
            }
            SplitLocation::Minus => {
                let (split_minus, split_plus) = self.split_and_take(cut.minus, partitioner);
                if cut_split.location() == SplitLocation::Minus {
                    self.set_subtree(id, cut.subset, split_minus, cut.plus);
                    (id, split_plus)
                } else {
                    self.set_subtree(id, cut.subset, split_plus, cut.plus);
                    (split_minus, id)
                }
            }
            SplitLocation::Both => {
                // The partitioner and the node cut cross each other
                let (partitioner_minus, partitioner_plus) = partitioner_split.into_parts();
                let (cut_minus, cut_plus) = cut_split.into_parts();
                let (Some(cut_minus), Some(cut_plus)) = (cut_minus, cut_plus) else {
                    panic!("Crossing partitioner failed to split the cut of node {id:?}");
                };
                let (Some(partitioner_minus), Some(partitioner_plus)) =
                    (partitioner_minus, partitioner_plus)
                else {
                    unreachable!("split location Both implies both parts are present");
                };

                let (minus_minus, minus_plus) = self.split_and_take(cut.minus, &partitioner_minus);
                let (plus_minus, plus_plus) = self.split_and_take(cut.plus, &partitioner_plus);

                let copy = self.copy_node(id);
                self.raw_mut(id).cut = None;
                self.set_subtree(id, cut_minus, minus_minus, plus_minus);
                self.set_subtree(copy, cut_plus, minus_plus, plus_plus);
                (id, copy)
            }
            SplitLocation::Neither => {
                // The partitioner lies on the node cut's hyperplane: the
                // node's children already are the two sides
                self.nodes.remove(id);
                let (minus, plus) = if partitioner.hyperplane().similar_orientation(&hyperplane) {
                    (cut.minus, cut.plus)
                } else {
                    (cut.plus, cut.minus)
                };
                self.raw_mut(minus).parent = None;
                self.raw_mut(plus).parent = None;
                (minus, plus)
            }
        }
    }

    /// Splits a subtree and dissolves the resulting root, returning its
    /// detached children.
    fn split_and_take(&mut self, id: NodeId, partitioner: &H::ConvexSubset) -> (NodeId, NodeId) {
        let split = self.split_subtree(id, partitioner);
        self.take_children(split)
    }

    /// Removes an internal node from the arena, returning its detached
    /// children `(minus, plus)`.
    pub(crate) fn take_children(&mut self, id: NodeId) -> (NodeId, NodeId) {
        let node = self
            .nodes
            .remove(id)
            .unwrap_or_else(|| panic!("Node {id:?} is not a live node of this tree"));
        let Some(cut) = node.cut else {
            panic!("Internal node {id:?} has no cut");
        };
        self.raw_mut(cut.minus).parent = None;
        self.raw_mut(cut.plus).parent = None;
        (cut.minus, cut.plus)
    }

    /// Copies a single node's data into a new detached leaf.
    pub(crate) fn copy_node(&mut self, id: NodeId) -> NodeId {
        let mut data = self.raw(id).data.clone();
        data.invalidate();
        self.nodes.insert(Node::new(data))
    }

    /// Sets the cut and children of a node without touching its previous
    /// children, which the caller must have reused or removed.
    ///
    /// Together with [`split_subtree`](Self::split_subtree),
    /// [`import_subtree`](Self::import_subtree) and
    /// [`remove_subtree`](Self::remove_subtree) this lets callers assemble
    /// trees from detached subtrees. `subset` must lie inside the node's cell.
    pub fn set_subtree(
        &mut self,
        id: NodeId,
        subset: H::ConvexSubset,
        minus: NodeId,
        plus: NodeId,
    ) {
        self.attach(id, subset, minus, plus);
        self.invalidate(Invalidation::Path(id));
    }

    /// Makes `id` the root. The previous root must have been consumed or
    /// removed by the caller.
    pub fn set_root(&mut self, id: NodeId) {
        self.raw_mut(id).parent = None;
        self.root = id;
        self.invalidate(Invalidation::Path(id));
    }

    /// Removes a node and all of its descendants from the arena. A parent
    /// still referring to `id` must be given a new subtree.
    pub fn remove_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(id)
            && let Some(cut) = node.cut
        {
            self.remove_subtree(cut.minus);
            self.remove_subtree(cut.plus);
        }
    }

    /// Applies `f` to a node's data and invalidates derived values on its
    /// path to the root.
    pub(crate) fn update_data<F>(&mut self, id: NodeId, f: F)
    where
        F: FnOnce(&mut D),
    {
        f(&mut self.raw_mut(id).data);
        self.invalidate(Invalidation::Path(id));
    }

    /// Applies `f` to the data of every leaf below `id` and invalidates the
    /// whole subtree.
    pub(crate) fn update_leaves<F>(&mut self, id: NodeId, mut f: F)
    where
        F: FnMut(&mut D),
    {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.raw_mut(current);
            match node.children() {
                Some((minus, plus)) => {
                    stack.push(plus);
                    stack.push(minus);
                }
                None => f(&mut node.data),
            }
        }
        self.invalidate(Invalidation::Subtree(id));
    }

    fn set_node_cut<F>(&mut self, id: NodeId, cut: Option<H::ConvexSubset>, init: F)
    where
        F: FnOnce(&D) -> (D, D),
    {
        if let Some(old) = self.raw_mut(id).cut.take() {
            self.remove_subtree(old.minus);
            self.remove_subtree(old.plus);
        }
        if let Some(subset) = cut {
            let (minus_data, plus_data) = init(&self.raw(id).data);
            let minus = self.nodes.insert(Node::new(minus_data));
            let plus = self.nodes.insert(Node::new(plus_data));
            self.attach(id, subset, minus, plus);
        }
        trace!(node = ?id, internal = self.raw(id).is_internal(), "set node cut");
        self.invalidate(Invalidation::Path(id));
    }

    fn attach(&mut self, id: NodeId, subset: H::ConvexSubset, minus: NodeId, plus: NodeId) {
        self.raw_mut(minus).parent = Some(id);
        self.raw_mut(plus).parent = Some(id);
        self.raw_mut(id).cut = Some(Cut {
            subset,
            minus,
            plus,
        });
    }

    /// The single entry point through which every mutation drops derived
    /// values.
    fn invalidate(&mut self, scope: Invalidation) {
        self.version = self.version.wrapping_add(1);
        self.cache = D::TreeCache::default();

        let start = match scope {
            Invalidation::Path(id) => id,
            Invalidation::Subtree(id) => {
                let mut stack = vec![id];
                while let Some(current) = stack.pop() {
                    let node = self.raw_mut(current);
                    node.data.invalidate();
                    if let Some((minus, plus)) = node.children() {
                        stack.push(minus);
                        stack.push(plus);
                    }
                }
                match self.raw(id).parent {
                    Some(parent) => parent,
                    None => return,
                }
            }
        };

        let mut current = Some(start);
        while let Some(id) = current {
            let node = self.raw_mut(id);
            node.data.invalidate();
            current = node.parent;
        }
    }

    #[inline]
    pub(crate) fn raw(&self, id: NodeId) -> &Node<H::ConvexSubset, D> {
        self.nodes
            .get(id)
            .unwrap_or_else(|| panic!("Node {id:?} is not a live node of this tree"))
    }

    #[inline]
    fn raw_mut(&mut self, id: NodeId) -> &mut Node<H::ConvexSubset, D> {
        self.nodes
            .get_mut(id)
            .unwrap_or_else(|| panic!("Node {id:?} is not a live node of this tree"))
    }

    pub(crate) fn cut_of(&self, id: NodeId) -> &Cut<H::ConvexSubset> {
        self.raw(id)
            .cut
            .as_ref()
            .unwrap_or_else(|| panic!("Internal node {id:?} has no cut"))
    }

    /// Renders the tree as indented text, down to `max_depth` levels.
    pub fn tree_string(&self, max_depth: usize) -> String {
        let mut out = String::new();
        self.write_node(&mut out, self.root, "", 0, max_depth);
        out
    }

    fn write_node(
        &self,
        out: &mut String,
        id: NodeId,
        label: &str,
        depth: usize,
        max_depth: usize,
    ) {
        let indent = "    ".repeat(depth);
        let node = self.raw(id);
        match node.children() {
            None => {
                let _ = writeln!(out, "{indent}{label}leaf {:?}", node.data);
            }
            Some(_) if depth >= max_depth => {
                let _ = writeln!(out, "{indent}{label}...");
            }
            Some((minus, plus)) => {
                let hyperplane = self.cut_of(id).subset.hyperplane();
                let _ = writeln!(out, "{indent}{label}cut {hyperplane:?}");
                self.write_node(out, minus, "[-] ", depth + 1, max_depth);
                self.write_node(out, plus, "[+] ", depth + 1, max_depth);
            }
        }
    }
}

/// Pre-order iterator over the node handles of a [`BspTree`].
pub struct Nodes<'a, H: Hyperplane, D: NodeData> {
    tree: &'a BspTree<H, D>,
    stack: Vec<NodeId>,
}

impl<H: Hyperplane, D: NodeData> Iterator for Nodes<'_, H, D> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some((minus, plus)) = self.tree.raw(id).children() {
            self.stack.push(plus);
            self.stack.push(minus);
        }
        Some(id)
    }
}
