use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use tilepath_core::{TilePos, WorldPos};

use crate::Path;
use crate::frontier::{endpoints, reconstruct};
use crate::traits::TileSpace;

/// Breadth-first search: every step costs 1, so the result has the fewest
/// possible waypoints. Tile costs are ignored.
#[derive(Debug, Default, Clone)]
pub struct BreadthFirst {
    came_from: HashMap<TilePos, TilePos>,
    frontier: VecDeque<TilePos>,
    nbuf: Vec<TilePos>,
    visited: usize,
}

impl BreadthFirst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes popped from the frontier by the last search.
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Compute a hop-optimal path from `start` to `end`.
    ///
    /// Scratch state is reset on entry. The goal check happens when a node is
    /// popped, so the search stops as soon as the goal leaves the queue.
    pub fn calculate_path<M: TileSpace>(&mut self, map: &M, start: WorldPos, end: WorldPos) -> Path {
        self.came_from.clear();
        self.frontier.clear();
        self.visited = 0;

        let Some((s, g)) = endpoints(map, start, end) else {
            return Vec::new();
        };

        self.came_from.insert(s, s);
        self.frontier.push_back(s);

        while let Some(cur) = self.frontier.pop_front() {
            self.visited += 1;
            if cur == g {
                break;
            }

            self.nbuf.clear();
            map.neighbors(cur, &mut self.nbuf);
            for &n in &self.nbuf {
                if let Entry::Vacant(e) = self.came_from.entry(n) {
                    e.insert(cur);
                    self.frontier.push_back(n);
                }
            }
        }

        reconstruct(map, &self.came_from, s, g)
    }
}
