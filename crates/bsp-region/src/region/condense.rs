//! Structural simplification of region trees.

use tracing::{debug, instrument};

use crate::bsp::NodeId;
use crate::hyperplane::Hyperplane;

use super::location::RegionLocation;
use super::tree::RegionTree;

impl<H: Hyperplane> RegionTree<H> {
    /// Collapses every internal node whose children are leaves with the same
    /// location into a single leaf, bottom-up. The represented region does
    /// not change.
    ///
    /// Returns `true` if the tree changed.
    #[instrument(level = "debug", skip_all)]
    pub fn condense(&mut self) -> bool {
        let root = self.root();
        let changed = condense_recursive(self, root);
        debug!(changed, nodes = self.count(), "condensed region tree");
        changed
    }
}

fn condense_recursive<H: Hyperplane>(tree: &mut RegionTree<H>, id: NodeId) -> bool {
    let node = tree.node(id);
    let (Some(minus), Some(plus)) = (node.minus(), node.plus()) else {
        return false;
    };
    let (minus, plus) = (minus.id(), plus.id());

    let changed = condense_recursive(tree, minus) | condense_recursive(tree, plus);

    match (tree.location(minus), tree.location(plus)) {
        (Some(a), Some(b)) if a == b => {
            collapse(tree, id, a);
            true
        }
        _ => changed,
    }
}

fn collapse<H: Hyperplane>(tree: &mut RegionTree<H>, id: NodeId, location: RegionLocation) {
    tree.tree.clear_cut(id);
    tree.tree.update_data(id, |data| data.location = location);
}
