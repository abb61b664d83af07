//! Closest boundary point queries.

use crate::bsp::{BspVisitor, NodeRef, VisitOrder, VisitResult};
use crate::hyperplane::{Hyperplane, Point};

use super::node::RegionNode;
use super::tree::RegionTree;

/// Visitor searching for the boundary point closest to a target.
///
/// The near side of every cut is visited first. A cut farther from the
/// target than the best point found so far cannot hold a closer boundary
/// point, and neither can anything beyond it, so the rest of that subtree is
/// skipped.
struct BoundaryProjector<'a, H: Hyperplane, F> {
    region: &'a RegionTree<H>,
    target: &'a H::Point,
    best: Option<(H::Point, f64)>,
    disambiguate: F,
}

impl<H, F> BspVisitor<H, RegionNode<H::ConvexSubset>> for BoundaryProjector<'_, H, F>
where
    H: Hyperplane,
    F: FnMut(&H::Point, &H::Point, &H::Point) -> bool,
{
    fn visit_order(&mut self, node: NodeRef<'_, H, RegionNode<H::ConvexSubset>>) -> VisitOrder {
        match node.cut_hyperplane() {
            Some(hyperplane) if hyperplane.offset(self.target) > 0.0 => VisitOrder::PlusNodeMinus,
            _ => VisitOrder::MinusNodePlus,
        }
    }

    fn visit(&mut self, node: NodeRef<'_, H, RegionNode<H::ConvexSubset>>) -> VisitResult {
        let Some(hyperplane) = node.cut_hyperplane() else {
            return VisitResult::Continue;
        };

        if let Some((_, best_distance)) = &self.best
            && hyperplane.offset(self.target).abs() > *best_distance
        {
            return VisitResult::Skip;
        }

        let candidate = self
            .region
            .cut_boundary(node.id())
            .and_then(|boundary| boundary.closest(self.target));
        if let Some(candidate) = candidate {
            let distance = candidate.distance(self.target);
            let replace = match &self.best {
                None => true,
                Some((_, best_distance)) if distance < *best_distance => true,
                Some((best, best_distance)) if distance == *best_distance => {
                    (self.disambiguate)(self.target, best, &candidate)
                }
                Some(_) => false,
            };
            if replace {
                self.best = Some((candidate, distance));
            }
        }
        VisitResult::Continue
    }
}

impl<H: Hyperplane> RegionTree<H> {
    /// Returns the point on the region boundary closest to `point`, or `None`
    /// if the region has no boundary. Among equally close points the first
    /// one found is kept.
    pub fn project(&self, point: &H::Point) -> Option<H::Point> {
        self.project_with(point, |_, _, _| false)
    }

    /// Like [`project`](Self::project), resolving exact ties with
    /// `disambiguate(target, current, candidate)`, which returns `true` to
    /// replace the current best point with the candidate.
    pub fn project_with<F>(&self, point: &H::Point, disambiguate: F) -> Option<H::Point>
    where
        F: FnMut(&H::Point, &H::Point, &H::Point) -> bool,
    {
        if point.is_nan() {
            return None;
        }
        let mut projector = BoundaryProjector {
            region: self,
            target: point,
            best: None,
            disambiguate,
        };
        self.tree.accept(&mut projector);
        projector.best.map(|(best, _)| best)
    }
}
