use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use tilepath_core::{TilePos, WorldPos};

use crate::Path;
use crate::distance::manhattan;
use crate::frontier::{NodeRef, endpoints, reconstruct};
use crate::traits::TileSpace;

/// Greedy best-first search: always expands the node closest to the goal
/// by Manhattan distance. Fast, but neither tile costs nor path length are
/// taken into account, so the result is not guaranteed optimal.
#[derive(Debug, Default, Clone)]
pub struct GreedyBestFirst {
    came_from: HashMap<TilePos, TilePos>,
    open: BinaryHeap<NodeRef>,
    nbuf: Vec<TilePos>,
    visited: usize,
}

impl GreedyBestFirst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes popped from the frontier by the last search.
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Compute a path from `start` to `end`, stopping at first discovery of
    /// the goal.
    pub fn calculate_path<M: TileSpace>(&mut self, map: &M, start: WorldPos, end: WorldPos) -> Path {
        self.came_from.clear();
        self.open.clear();
        self.visited = 0;

        let Some((s, g)) = endpoints(map, start, end) else {
            return Vec::new();
        };

        self.came_from.insert(s, s);
        self.open.push(NodeRef {
            pos: s,
            priority: manhattan(s, g) as f32,
        });

        while let Some(NodeRef { pos: cur, .. }) = self.open.pop() {
            self.visited += 1;
            if cur == g {
                break;
            }

            self.nbuf.clear();
            map.neighbors(cur, &mut self.nbuf);
            for &n in &self.nbuf {
                if let Entry::Vacant(e) = self.came_from.entry(n) {
                    e.insert(cur);
                    self.open.push(NodeRef {
                        pos: n,
                        priority: manhattan(n, g) as f32,
                    });
                }
            }
        }

        reconstruct(map, &self.came_from, s, g)
    }
}
