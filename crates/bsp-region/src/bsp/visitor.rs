//! Visitor pattern for BSP tree traversal.
//!
//! Visitors process nodes during traversal without coupling the traversal
//! driver to specific use cases. Each visit returns a [`VisitResult`] that
//! the driver interprets, so a visitor can prune subtrees or stop early.

use crate::hyperplane::Hyperplane;

use super::node::{NodeData, NodeRef};

/// Order in which an internal node and its two children are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitOrder {
    #[default]
    NodeMinusPlus,
    NodePlusMinus,
    MinusNodePlus,
    MinusPlusNode,
    PlusNodeMinus,
    PlusMinusNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VisitStep {
    Node,
    Minus,
    Plus,
}

impl VisitOrder {
    pub(crate) fn steps(self) -> [VisitStep; 3] {
        use VisitStep::{Minus, Node, Plus};
        match self {
            Self::NodeMinusPlus => [Node, Minus, Plus],
            Self::NodePlusMinus => [Node, Plus, Minus],
            Self::MinusNodePlus => [Minus, Node, Plus],
            Self::MinusPlusNode => [Minus, Plus, Node],
            Self::PlusNodeMinus => [Plus, Node, Minus],
            Self::PlusMinusNode => [Plus, Minus, Node],
        }
    }
}

/// Outcome of visiting a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitResult {
    /// Keep traversing
    #[default]
    Continue,
    /// Skip the parts of this node's subtree not yet visited
    Skip,
    /// Stop the traversal entirely
    Terminate,
}

/// Visitor for processing nodes during BSP tree traversal.
///
/// Implement this trait to define custom behavior when traversing the tree.
/// Common uses include:
/// - Collecting nodes or cuts in a particular order
/// - Nearest-feature searches that prune far subtrees
pub trait BspVisitor<H: Hyperplane, D: NodeData> {
    /// Chooses the visit order at an internal node.
    fn visit_order(&mut self, _node: NodeRef<'_, H, D>) -> VisitOrder {
        VisitOrder::NodeMinusPlus
    }

    /// Called for each node reached by the traversal.
    fn visit(&mut self, node: NodeRef<'_, H, D>) -> VisitResult;
}

/// A visitor that calls a closure for each node, using a fixed visit order.
pub struct FnVisitor<F> {
    order: VisitOrder,
    func: F,
}

impl<F> FnVisitor<F> {
    /// Creates a visitor using the default pre-order (node, minus, plus).
    pub fn new<H, D>(func: F) -> Self
    where
        H: Hyperplane,
        D: NodeData,
        F: FnMut(NodeRef<'_, H, D>) -> VisitResult,
    {
        Self::with_order(VisitOrder::default(), func)
    }

    pub fn with_order<H, D>(order: VisitOrder, func: F) -> Self
    where
        H: Hyperplane,
        D: NodeData,
        F: FnMut(NodeRef<'_, H, D>) -> VisitResult,
    {
        Self { order, func }
    }
}

impl<H, D, F> BspVisitor<H, D> for FnVisitor<F>
where
    H: Hyperplane,
    D: NodeData,
    F: FnMut(NodeRef<'_, H, D>) -> VisitResult,
{
    fn visit_order(&mut self, _node: NodeRef<'_, H, D>) -> VisitOrder {
        self.order
    }

    fn visit(&mut self, node: NodeRef<'_, H, D>) -> VisitResult {
        (self.func)(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::BspTree;
    use crate::{Line2D, Precision};
    use nalgebra::Point2;

    fn make_tree() -> BspTree<Line2D, ()> {
        let mut tree = BspTree::new(());
        let root = tree.root();
        tree.cut(
            root,
            &Line2D::from_points(
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Precision::default(),
            ),
        );
        tree
    }

    #[test]
    fn every_order_visits_each_node_once() {
        let tree = make_tree();
        let orders = [
            VisitOrder::NodeMinusPlus,
            VisitOrder::NodePlusMinus,
            VisitOrder::MinusNodePlus,
            VisitOrder::MinusPlusNode,
            VisitOrder::PlusNodeMinus,
            VisitOrder::PlusMinusNode,
        ];
        for order in orders {
            let mut count = 0;
            let mut visitor = FnVisitor::with_order(order, |_| {
                count += 1;
                VisitResult::Continue
            });
            tree.accept(&mut visitor);
            assert_eq!(count, 3, "{order:?}");
        }
    }

    #[test]
    fn internal_node_position_follows_order() {
        let tree = make_tree();
        let mut internal_at = None;
        let mut index = 0;
        let mut visitor = FnVisitor::with_order(VisitOrder::MinusNodePlus, |node| {
            if node.is_internal() {
                internal_at = Some(index);
            }
            index += 1;
            VisitResult::Continue
        });
        tree.accept(&mut visitor);
        assert_eq!(internal_at, Some(1));
    }

    #[test]
    fn skip_at_root_in_pre_order_visits_only_root() {
        let tree = make_tree();
        let mut count = 0;
        let mut visitor = FnVisitor::new(|_| {
            count += 1;
            VisitResult::Skip
        });
        tree.accept(&mut visitor);
        assert_eq!(count, 1);
    }
}
