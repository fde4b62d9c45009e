use std::collections::{BinaryHeap, HashMap};

use tilepath_core::{TilePos, WorldPos};

use crate::Path;
use crate::frontier::{NodeRef, endpoints, reconstruct};
use crate::traits::TileSpace;

/// Dijkstra's algorithm: cost-optimal, where entering a tile costs that
/// tile's multiplier.
#[derive(Debug, Default, Clone)]
pub struct Dijkstra {
    came_from: HashMap<TilePos, TilePos>,
    cost: HashMap<TilePos, f32>,
    open: BinaryHeap<NodeRef>,
    nbuf: Vec<TilePos>,
    visited: usize,
}

impl Dijkstra {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes popped and expanded by the last search (stale heap
    /// entries are not counted).
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Accumulated cost to reach `p` in the last search, if it was reached.
    pub fn cost_at(&self, p: TilePos) -> Option<f32> {
        self.cost.get(&p).copied()
    }

    /// Compute a cost-optimal path from `start` to `end`.
    ///
    /// A neighbour is re-pushed whenever its accumulated cost strictly
    /// improves; superseded heap entries are skipped when popped.
    pub fn calculate_path<M: TileSpace>(&mut self, map: &M, start: WorldPos, end: WorldPos) -> Path {
        self.came_from.clear();
        self.cost.clear();
        self.open.clear();
        self.visited = 0;

        let Some((s, g)) = endpoints(map, start, end) else {
            return Vec::new();
        };

        self.came_from.insert(s, s);
        self.cost.insert(s, 0.0);
        self.open.push(NodeRef {
            pos: s,
            priority: 0.0,
        });

        while let Some(NodeRef { pos: cur, priority }) = self.open.pop() {
            let cur_cost = self.cost.get(&cur).copied().unwrap_or(f32::INFINITY);
            // Skip stale entries.
            if priority > cur_cost {
                continue;
            }
            self.visited += 1;
            if cur == g {
                break;
            }

            self.nbuf.clear();
            map.neighbors(cur, &mut self.nbuf);
            for &n in &self.nbuf {
                let tentative = cur_cost + map.cost(cur, n);
                if self.cost.get(&n).is_none_or(|&old| tentative < old) {
                    self.cost.insert(n, tentative);
                    self.came_from.insert(n, cur);
                    self.open.push(NodeRef {
                        pos: n,
                        priority: tentative,
                    });
                }
            }
        }

        reconstruct(map, &self.came_from, s, g)
    }
}
