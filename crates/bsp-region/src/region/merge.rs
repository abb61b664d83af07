//! Boolean operations on region trees.
//!
//! Two trees are merged node by node. At each step the second tree's subtree
//! is re-rooted on the first tree's cut with
//! [`split_subtree`](crate::bsp::BspTree::split_subtree), so both subtrees
//! describe the same cell. As soon as either side is a leaf, the operator's
//! leaf policy decides what the merged cell looks like.

use tracing::{debug, instrument};

use crate::bsp::NodeId;
use crate::hyperplane::Hyperplane;

use super::location::RegionLocation;
use super::tree::RegionTree;

/// A boolean set operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersection,
    /// Points in the first region but not the second
    Difference,
    /// Points in exactly one of the regions
    Xor,
}

/// Which subtree represents a merged cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafChoice {
    First,
    Second,
    ComplementFirst,
    ComplementSecond,
    /// A single outside leaf
    Outside,
}

impl BooleanOp {
    /// Leaf policy. `first` and `second` are the locations of the two nodes,
    /// `None` for an internal node; at least one of them is a leaf.
    fn merge_leaf(
        self,
        first: Option<RegionLocation>,
        second: Option<RegionLocation>,
    ) -> LeafChoice {
        use LeafChoice::*;
        use RegionLocation::Inside;

        let second_inside = second == Some(Inside);
        match (self, first) {
            (Self::Union, Some(Inside)) => First,
            (Self::Union, Some(_)) => Second,
            (Self::Union, None) => {
                if second_inside {
                    Second
                } else {
                    First
                }
            }

            (Self::Intersection, Some(Inside)) => Second,
            (Self::Intersection, Some(_)) => First,
            (Self::Intersection, None) => {
                if second_inside {
                    First
                } else {
                    Second
                }
            }

            (Self::Difference, Some(Inside)) => ComplementSecond,
            (Self::Difference, Some(_)) => First,
            (Self::Difference, None) => {
                if second_inside {
                    Outside
                } else {
                    First
                }
            }

            (Self::Xor, Some(Inside)) => ComplementSecond,
            (Self::Xor, Some(_)) => Second,
            (Self::Xor, None) => {
                if second_inside {
                    ComplementFirst
                } else {
                    First
                }
            }
        }
    }
}

/// Merges two regions into a new, condensed tree.
#[instrument(level = "debug", skip(first, second))]
pub(crate) fn merge<H: Hyperplane>(
    op: BooleanOp,
    first: &RegionTree<H>,
    second: &RegionTree<H>,
) -> RegionTree<H> {
    let mut output = RegionTree::empty();
    let placeholder = output.root();

    // Work on a private copy of the second tree so its nodes can be reused
    let second_root = output.tree.import_subtree(&second.tree, second.root());
    let root = merge_recursive(op, first, first.root(), &mut output, second_root);

    output.tree.set_root(root);
    output.tree.remove_subtree(placeholder);
    output.condense();

    debug!(nodes = output.count(), "merged region trees");
    output
}

/// Merges `first_id` (in `first`) with `second_id` (in `output`), consuming
/// `second_id`. Returns the detached output node representing the cell.
fn merge_recursive<H: Hyperplane>(
    op: BooleanOp,
    first: &RegionTree<H>,
    first_id: NodeId,
    output: &mut RegionTree<H>,
    second_id: NodeId,
) -> NodeId {
    let first_location = first.location(first_id);
    let second_location = output.location(second_id);

    if first_location.is_some() || second_location.is_some() {
        return match op.merge_leaf(first_location, second_location) {
            LeafChoice::First => {
                output.tree.remove_subtree(second_id);
                output.tree.import_subtree(&first.tree, first_id)
            }
            LeafChoice::Second => second_id,
            LeafChoice::ComplementFirst => {
                output.tree.remove_subtree(second_id);
                let imported = output.tree.import_subtree(&first.tree, first_id);
                output.complement_subtree(imported);
                imported
            }
            LeafChoice::ComplementSecond => {
                output.complement_subtree(second_id);
                second_id
            }
            LeafChoice::Outside => {
                // Only chosen when the second node is a leaf
                output
                    .tree
                    .update_data(second_id, |data| data.location = RegionLocation::Outside);
                second_id
            }
        };
    }

    let node = first.node(first_id);
    let (Some(cut), Some(first_minus), Some(first_plus)) = (node.cut(), node.minus(), node.plus())
    else {
        unreachable!("a node that is not a leaf has a cut");
    };

    let partitioned = output.tree.split_subtree(second_id, cut);
    let (second_minus, second_plus) = {
        let split = output.tree.node(partitioned);
        match (split.minus(), split.plus()) {
            (Some(minus), Some(plus)) => (minus.id(), plus.id()),
            _ => unreachable!("a split subtree is rooted at its partitioner"),
        }
    };

    let minus = merge_recursive(op, first, first_minus.id(), output, second_minus);
    let plus = merge_recursive(op, first, first_plus.id(), output, second_plus);
    output.tree.set_subtree(partitioned, cut.clone(), minus, plus);
    partitioned
}

impl<H: Hyperplane> RegionTree<H> {
    /// Replaces this region with its union with `other`.
    pub fn union(&mut self, other: &Self) {
        *self = merge(BooleanOp::Union, self, other);
    }

    /// Replaces this region with its intersection with `other`.
    pub fn intersection(&mut self, other: &Self) {
        *self = merge(BooleanOp::Intersection, self, other);
    }

    /// Removes the points of `other` from this region.
    pub fn difference(&mut self, other: &Self) {
        *self = merge(BooleanOp::Difference, self, other);
    }

    /// Replaces this region with its symmetric difference with `other`.
    pub fn xor(&mut self, other: &Self) {
        *self = merge(BooleanOp::Xor, self, other);
    }

    /// Replaces this tree with the union of `a` and `b`.
    pub fn union_of(&mut self, a: &Self, b: &Self) {
        *self = merge(BooleanOp::Union, a, b);
    }

    /// Replaces this tree with the intersection of `a` and `b`.
    pub fn intersection_of(&mut self, a: &Self, b: &Self) {
        *self = merge(BooleanOp::Intersection, a, b);
    }

    /// Replaces this tree with `a` minus `b`.
    pub fn difference_of(&mut self, a: &Self, b: &Self) {
        *self = merge(BooleanOp::Difference, a, b);
    }

    /// Replaces this tree with the symmetric difference of `a` and `b`.
    pub fn xor_of(&mut self, a: &Self, b: &Self) {
        *self = merge(BooleanOp::Xor, a, b);
    }

    /// Applies `op` to `a` and `b`, returning a new tree.
    pub fn combine(op: BooleanOp, a: &Self, b: &Self) -> Self {
        merge(op, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RegionLocation::{Inside, Outside};

    #[test]
    fn union_policy() {
        let op = BooleanOp::Union;
        assert_eq!(op.merge_leaf(Some(Inside), None), LeafChoice::First);
        assert_eq!(op.merge_leaf(Some(Outside), None), LeafChoice::Second);
        assert_eq!(op.merge_leaf(None, Some(Inside)), LeafChoice::Second);
        assert_eq!(op.merge_leaf(None, Some(Outside)), LeafChoice::First);
    }

    #[test]
    fn intersection_policy() {
        let op = BooleanOp::Intersection;
        assert_eq!(op.merge_leaf(Some(Inside), None), LeafChoice::Second);
        assert_eq!(op.merge_leaf(Some(Outside), None), LeafChoice::First);
        assert_eq!(op.merge_leaf(None, Some(Inside)), LeafChoice::First);
        assert_eq!(op.merge_leaf(None, Some(Outside)), LeafChoice::Second);
    }

    #[test]
    fn difference_policy() {
        let op = BooleanOp::Difference;
        assert_eq!(op.merge_leaf(Some(Inside), None), LeafChoice::ComplementSecond);
        assert_eq!(op.merge_leaf(Some(Outside), Some(Inside)), LeafChoice::First);
        assert_eq!(op.merge_leaf(None, Some(Inside)), LeafChoice::Outside);
        assert_eq!(op.merge_leaf(None, Some(Outside)), LeafChoice::First);
    }

    #[test]
    fn xor_policy() {
        let op = BooleanOp::Xor;
        assert_eq!(op.merge_leaf(Some(Inside), None), LeafChoice::ComplementSecond);
        assert_eq!(op.merge_leaf(Some(Outside), None), LeafChoice::Second);
        assert_eq!(op.merge_leaf(None, Some(Inside)), LeafChoice::ComplementFirst);
        assert_eq!(op.merge_leaf(None, Some(Outside)), LeafChoice::First);
    }
}
