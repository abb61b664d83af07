//! Region tree: a BSP tree whose leaves are inside or outside a region.

use tracing::instrument;

use crate::bsp::{BspTree, NodeId, NodeRef};
use crate::error::RegionError;
use crate::hyperplane::{
    Hyperplane, HyperplaneConvexSubset, HyperplaneLocation, Point, SizeProperties, Split,
};
use crate::subset::HyperplaneSubset;

use super::boundary::{RegionBsp, RegionCutBoundary, compute_cut_boundary};
use super::location::{CutRule, RegionLocation};
use super::node::RegionNode;

/// A set of points represented by a BSP tree.
///
/// Every leaf is either inside or outside the region. Boundaries are never
/// stored; they are derived from the cuts on demand and cached until the
/// next mutation, as are the region's size, centroid and boundary size.
///
/// Cached values live in [`OnceLock`](std::sync::OnceLock) slots, so a
/// region tree can be shared between threads for concurrent queries.
#[derive(Debug, Clone)]
pub struct RegionTree<H: Hyperplane> {
    pub(crate) tree: RegionBsp<H>,
}

/// Something providing boundary subsets that can be inserted into a region
/// tree.
pub trait BoundarySource<C> {
    /// Boundary subsets, each with its plus side facing away from the region.
    fn boundary_subsets(&self) -> impl Iterator<Item = C> + '_;
}

impl<C: Clone> BoundarySource<C> for [C] {
    fn boundary_subsets(&self) -> impl Iterator<Item = C> + '_ {
        self.iter().cloned()
    }
}

impl<C: HyperplaneConvexSubset> BoundarySource<C> for HyperplaneSubset<C> {
    fn boundary_subsets(&self) -> impl Iterator<Item = C> + '_ {
        self.to_convex().iter().cloned()
    }
}

impl<H: Hyperplane> BoundarySource<H::ConvexSubset> for RegionTree<H> {
    fn boundary_subsets(&self) -> impl Iterator<Item = H::ConvexSubset> + '_ {
        self.boundaries()
    }
}

impl<H: Hyperplane> RegionTree<H> {
    /// Creates a region tree with a single leaf at `location`.
    ///
    /// # Panics
    /// Panics if `location` is [`RegionLocation::Boundary`].
    pub fn new(location: RegionLocation) -> Self {
        assert!(
            location != RegionLocation::Boundary,
            "Region tree root must be inside or outside"
        );
        Self {
            tree: BspTree::new(RegionNode::new(location)),
        }
    }

    /// Creates a tree containing no points.
    pub fn empty() -> Self {
        Self::new(RegionLocation::Outside)
    }

    /// Creates a tree containing the whole space.
    pub fn full() -> Self {
        Self::new(RegionLocation::Inside)
    }

    /// Builds a region from its outward-oriented boundaries, starting from
    /// an empty tree.
    pub fn from_boundaries<I>(boundaries: I) -> Self
    where
        I: IntoIterator<Item = H::ConvexSubset>,
    {
        let mut tree = Self::empty();
        tree.insert_all(boundaries, CutRule::MinusInside);
        tree
    }

    /// The underlying generic tree, for navigation and traversal.
    #[inline]
    pub fn tree(&self) -> &BspTree<H, RegionNode<H::ConvexSubset>> {
        &self.tree
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> NodeRef<'_, H, RegionNode<H::ConvexSubset>> {
        self.tree.node(id)
    }

    pub fn count(&self) -> usize {
        self.tree.count()
    }

    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Structural version, incremented by every mutation.
    pub fn version(&self) -> u64 {
        self.tree.version()
    }

    /// Location of a leaf, or `None` for an internal node.
    pub fn location(&self, id: NodeId) -> Option<RegionLocation> {
        let node = self.tree.node(id);
        node.is_leaf().then(|| node.data().location())
    }

    /// Sets the location of a leaf.
    ///
    /// # Errors
    /// Returns [`RegionError::InvalidLocation`] for [`RegionLocation::Boundary`]
    /// and [`RegionError::NotALeaf`] if `id` is an internal node.
    pub fn set_location(
        &mut self,
        id: NodeId,
        location: RegionLocation,
    ) -> Result<(), RegionError> {
        if location == RegionLocation::Boundary {
            return Err(RegionError::InvalidLocation(location));
        }
        if self.tree.node(id).is_internal() {
            return Err(RegionError::NotALeaf(id));
        }
        self.tree.update_data(id, |data| data.location = location);
        Ok(())
    }

    /// Cuts a node using [`CutRule::MinusInside`].
    pub fn cut(&mut self, id: NodeId, hyperplane: &H) -> bool {
        self.insert_cut(id, hyperplane, CutRule::MinusInside)
    }

    /// Cuts a node with a hyperplane, initializing the new children with
    /// `rule`. Returns `true` if the node is internal afterwards.
    pub fn insert_cut(&mut self, id: NodeId, hyperplane: &H, rule: CutRule) -> bool {
        self.tree.insert_cut(id, hyperplane, child_initializer(rule))
    }

    /// Turns a node back into a leaf, keeping its stored location.
    pub fn clear_cut(&mut self, id: NodeId) {
        self.tree.clear_cut(id);
    }

    /// Inserts a boundary subset top-down using [`CutRule::MinusInside`].
    pub fn insert(&mut self, subset: H::ConvexSubset) {
        self.insert_with_rule(subset, CutRule::MinusInside);
    }

    /// Inserts a boundary subset top-down, initializing new leaves with `rule`.
    pub fn insert_with_rule(&mut self, subset: H::ConvexSubset, rule: CutRule) {
        self.tree.insert(subset, &child_initializer(rule));
    }

    /// Inserts every convex piece of a hyperplane subset.
    pub fn insert_subset(&mut self, subset: HyperplaneSubset<H::ConvexSubset>, rule: CutRule) {
        self.insert_all(subset.into_convex(), rule);
    }

    /// Inserts a sequence of boundary subsets in order.
    #[instrument(level = "trace", skip_all, fields(rule = ?rule))]
    pub fn insert_all<I>(&mut self, subsets: I, rule: CutRule)
    where
        I: IntoIterator<Item = H::ConvexSubset>,
    {
        let init = child_initializer(rule);
        for subset in subsets {
            self.tree.insert(subset, &init);
        }
    }

    /// Inserts all boundaries of another source, such as another region.
    pub fn insert_source<S>(&mut self, source: &S, rule: CutRule)
    where
        S: BoundarySource<H::ConvexSubset> + ?Sized,
    {
        let subsets: Vec<_> = source.boundary_subsets().collect();
        self.insert_all(subsets, rule);
    }

    /// Returns `true` if no point is inside the region.
    pub fn is_empty(&self) -> bool {
        !self
            .tree
            .leaves()
            .any(|id| self.tree.node(id).data().location().is_inside())
    }

    /// Returns `true` if every point is inside the region.
    pub fn is_full(&self) -> bool {
        !self
            .tree
            .leaves()
            .any(|id| self.tree.node(id).data().location().is_outside())
    }

    /// Classifies a point against the region. NaN points are outside.
    pub fn classify(&self, point: &H::Point) -> RegionLocation {
        if point.is_nan() {
            return RegionLocation::Outside;
        }
        self.classify_from(self.tree.root(), point)
    }

    fn classify_from(&self, id: NodeId, point: &H::Point) -> RegionLocation {
        let node = self.tree.node(id);
        let (Some(hyperplane), Some(minus), Some(plus)) =
            (node.cut_hyperplane(), node.minus(), node.plus())
        else {
            return node.data().location();
        };

        match hyperplane.classify(point) {
            HyperplaneLocation::Minus => self.classify_from(minus.id(), point),
            HyperplaneLocation::Plus => self.classify_from(plus.id(), point),
            HyperplaneLocation::On => {
                let minus = self.classify_from(minus.id(), point);
                let plus = self.classify_from(plus.id(), point);
                if minus == plus {
                    minus
                } else {
                    RegionLocation::Boundary
                }
            }
        }
    }

    /// Returns `true` if the point is inside or on the boundary.
    pub fn contains(&self, point: &H::Point) -> bool {
        self.classify(point) != RegionLocation::Outside
    }

    /// The boundary portion of the cut at an internal node, computed on
    /// first access. Returns `None` for leaves.
    pub fn cut_boundary(&self, id: NodeId) -> Option<&RegionCutBoundary<H::ConvexSubset>> {
        let node = self.tree.node(id);
        if node.is_leaf() {
            return None;
        }
        Some(
            node.data()
                .cut_boundary
                .get_or_init(|| compute_cut_boundary(&self.tree, id)),
        )
    }

    /// Lazily yields the region's boundaries, each with its plus side facing
    /// away from the region.
    pub fn boundaries(&self) -> impl Iterator<Item = H::ConvexSubset> + '_ {
        self.tree
            .nodes()
            .filter_map(|id| self.cut_boundary(id))
            .flat_map(RegionCutBoundary::outward)
    }

    /// Collects [`boundaries`](Self::boundaries) into a list.
    pub fn collect_boundaries(&self) -> Vec<H::ConvexSubset> {
        self.boundaries().collect()
    }

    /// Total size of the region's boundary.
    pub fn boundary_size(&self) -> f64 {
        *self.tree.cache().boundary_size.get_or_init(|| {
            self.tree
                .nodes()
                .filter_map(|id| self.cut_boundary(id))
                .map(RegionCutBoundary::size)
                .sum()
        })
    }

    /// Size and centroid of the region.
    pub fn size_properties(&self) -> &SizeProperties<H::Point> {
        self.tree.cache().size.get_or_init(|| {
            if self.is_full() {
                SizeProperties::infinite()
            } else if self.is_empty() {
                SizeProperties::zero()
            } else {
                H::region_size(&self.collect_boundaries())
            }
        })
    }

    /// Size of the region; infinite for unbounded regions.
    pub fn size(&self) -> f64 {
        self.size_properties().size
    }

    /// Centroid of the region, or `None` if it is empty or unbounded.
    pub fn centroid(&self) -> Option<H::Point> {
        self.size_properties().centroid.clone()
    }

    /// Flips every leaf between inside and outside.
    #[instrument(level = "debug", skip_all)]
    pub fn complement(&mut self) {
        let root = self.tree.root();
        self.complement_subtree(root);
    }

    /// Replaces this tree with the complement of `other`.
    pub fn complement_of(&mut self, other: &Self) {
        *self = other.clone();
        self.complement();
    }

    pub(crate) fn complement_subtree(&mut self, id: NodeId) {
        self.tree
            .update_leaves(id, |data| data.location = data.location.complement());
    }

    /// Splits the region by a hyperplane into the parts on its minus and
    /// plus sides. Either part is `None` if it is empty.
    #[instrument(level = "debug", skip_all)]
    pub fn split(&self, splitter: &H) -> Split<Self> {
        let mut base = self.clone();
        let old_root = base.tree.root();
        let root = base.tree.split_subtree(old_root, &splitter.span());
        base.tree.set_root(root);

        let node = base.tree.node(root);
        let (Some(minus), Some(plus)) = (node.minus(), node.plus()) else {
            unreachable!("a split subtree is rooted at its partitioner");
        };
        let (minus, plus) = (minus.id(), plus.id());

        let mut minus_tree = base.clone();
        minus_tree.set_subtree_outside(plus);
        let mut plus_tree = base;
        plus_tree.set_subtree_outside(minus);

        minus_tree.condense();
        plus_tree.condense();

        Split::new(
            (!minus_tree.is_empty()).then_some(minus_tree),
            (!plus_tree.is_empty()).then_some(plus_tree),
        )
    }

    fn set_subtree_outside(&mut self, id: NodeId) {
        self.tree.clear_cut(id);
        self.tree
            .update_data(id, |data| data.location = RegionLocation::Outside);
    }

    /// Renders the tree as indented text, down to `max_depth` levels.
    pub fn tree_string(&self, max_depth: usize) -> String {
        self.tree.tree_string(max_depth)
    }
}

impl<H: Hyperplane> Default for RegionTree<H> {
    fn default() -> Self {
        Self::empty()
    }
}

fn child_initializer<C>(
    rule: CutRule,
) -> impl Fn(&RegionNode<C>) -> (RegionNode<C>, RegionNode<C>) {
    move |parent: &RegionNode<C>| {
        let (minus, plus) = rule.child_locations(parent.location);
        (RegionNode::new(minus), RegionNode::new(plus))
    }
}
