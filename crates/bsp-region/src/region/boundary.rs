//! Region boundaries derived from cut structure.
//!
//! A region tree stores no boundary geometry. The boundary at an internal
//! node is the part of its cut separating an inside cell from an outside
//! cell, found by pushing fragments of the cut down both subtrees and
//! looking at the leaves they land in.

use crate::bsp::{BspTree, NodeId};
use crate::hyperplane::{Hyperplane, HyperplaneConvexSubset, Point, PointOf, SplitLocation};

use super::location::RegionLocation;
use super::node::RegionNode;

/// The generic tree underlying a region tree.
pub(crate) type RegionBsp<H> = BspTree<H, RegionNode<<H as Hyperplane>::ConvexSubset>>;

/// The portion of an internal node's cut lying on the region boundary.
#[derive(Debug, Clone)]
pub struct RegionCutBoundary<C> {
    outside_facing: Vec<C>,
    inside_facing: Vec<C>,
}

impl<C: HyperplaneConvexSubset> RegionCutBoundary<C> {
    /// Fragments with the region on their minus side. Their plus side
    /// already points away from the region.
    #[inline]
    pub fn outside_facing(&self) -> &[C] {
        &self.outside_facing
    }

    /// Fragments with the region on their plus side. They must be reversed
    /// to point away from the region.
    #[inline]
    pub fn inside_facing(&self) -> &[C] {
        &self.inside_facing
    }

    pub fn is_empty(&self) -> bool {
        self.outside_facing.is_empty() && self.inside_facing.is_empty()
    }

    /// Total size of all fragments.
    pub fn size(&self) -> f64 {
        self.fragments().map(|c| c.size()).sum()
    }

    /// Point on the boundary fragments closest to `point`, or `None` if the
    /// cut contributes no boundary.
    pub fn closest(&self, point: &PointOf<C::Hyperplane>) -> Option<PointOf<C::Hyperplane>> {
        self.fragments()
            .map(|c| {
                let candidate = c.closest(point);
                let distance = candidate.distance(point);
                (candidate, distance)
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(candidate, _)| candidate)
    }

    /// Returns `true` if `point` lies on one of the fragments.
    pub fn contains(&self, point: &PointOf<C::Hyperplane>) -> bool {
        self.fragments().any(|c| c.contains(point))
    }

    /// Fragments oriented with their plus side away from the region.
    pub fn outward(&self) -> impl Iterator<Item = C> + '_ {
        self.outside_facing
            .iter()
            .cloned()
            .chain(self.inside_facing.iter().map(|c| c.reverse()))
    }

    fn fragments(&self) -> impl Iterator<Item = &C> {
        self.outside_facing.iter().chain(&self.inside_facing)
    }
}

/// Computes the boundary part of the cut at internal node `id`.
pub(crate) fn compute_cut_boundary<H: Hyperplane>(
    tree: &RegionBsp<H>,
    id: NodeId,
) -> RegionCutBoundary<H::ConvexSubset> {
    let node = tree.node(id);
    let (Some(cut), Some(minus), Some(plus)) = (node.cut(), node.minus(), node.plus()) else {
        panic!("Cut boundary requested for leaf {id:?}");
    };

    let mut minus_in = Vec::new();
    let mut minus_out = Vec::new();
    characterize(tree, minus.id(), cut.clone(), &mut minus_in, &mut minus_out);

    let mut outside_facing = Vec::new();
    let mut inside_facing = Vec::new();
    let mut discarded = Vec::new();

    // Inside below, outside above: faces out as-is
    for fragment in minus_in {
        characterize(tree, plus.id(), fragment, &mut discarded, &mut outside_facing);
    }
    // Outside below, inside above: faces in
    for fragment in minus_out {
        characterize(tree, plus.id(), fragment, &mut inside_facing, &mut discarded);
    }

    RegionCutBoundary {
        outside_facing,
        inside_facing,
    }
}

/// Splits `subset` by the cuts of the subtree at `id` and sorts the pieces by
/// the location of the leaf each one reaches.
fn characterize<H: Hyperplane>(
    tree: &RegionBsp<H>,
    id: NodeId,
    subset: H::ConvexSubset,
    inside: &mut Vec<H::ConvexSubset>,
    outside: &mut Vec<H::ConvexSubset>,
) {
    let node = tree.node(id);
    let (Some(hyperplane), Some(minus), Some(plus)) =
        (node.cut_hyperplane(), node.minus(), node.plus())
    else {
        match node.data().location() {
            RegionLocation::Inside => inside.push(subset),
            _ => outside.push(subset),
        }
        return;
    };

    let split = subset.split(hyperplane);
    if split.location() == SplitLocation::Neither {
        // On this node's cut: both sides touch it
        characterize(tree, plus.id(), subset.clone(), inside, outside);
        characterize(tree, minus.id(), subset, inside, outside);
        return;
    }

    let (split_minus, split_plus) = split.into_parts();
    if let Some(part) = split_minus {
        characterize(tree, minus.id(), part, inside, outside);
    }
    if let Some(part) = split_plus {
        characterize(tree, plus.id(), part, inside, outside);
    }
}
