//! Pieces shared by the searching strategies: the priority-queue entry,
//! endpoint resolution and path reconstruction.

use std::cmp::Ordering;
use std::collections::HashMap;

use tilepath_core::{TilePos, WorldPos};

use crate::Path;
use crate::traits::TileSpace;

/// Priority-queue entry, ordered so that `BinaryHeap` (a max-heap) pops the
/// smallest priority first. Ties are broken on the position to keep the
/// search order deterministic.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef {
    pub(crate) pos: TilePos,
    pub(crate) priority: f32,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

/// Resolve the two endpoints of a search to nodes.
///
/// Returns `None` when either node is invalid or both fall on the same
/// node: in every such case the resulting path is empty.
pub(crate) fn endpoints<M: TileSpace>(
    map: &M,
    start: WorldPos,
    end: WorldPos,
) -> Option<(TilePos, TilePos)> {
    let s = map.world_to_tile(start);
    let g = map.world_to_tile(end);
    if !map.is_valid(s) || !map.is_valid(g) || s == g {
        return None;
    }
    Some((s, g))
}

/// Walk predecessor links back from `goal` to `start` and return the
/// waypoints in travel order, start excluded. Empty if `goal` was never
/// reached.
pub(crate) fn reconstruct<M: TileSpace>(
    map: &M,
    came_from: &HashMap<TilePos, TilePos>,
    start: TilePos,
    goal: TilePos,
) -> Path {
    let mut path = Vec::new();
    let mut cur = goal;
    while cur != start {
        let Some(&prev) = came_from.get(&cur) else {
            return Vec::new();
        };
        path.push(map.tile_to_world(cur));
        cur = prev;
    }
    path.reverse();
    path
}
