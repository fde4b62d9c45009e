//! Runtime-selectable path finding: the [`PathAlgorithm`] identifier, the
//! [`PathFinder`] that dispatches to one strategy, and search statistics.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use tilepath_core::WorldPos;
use tilepath_map::TileMap;

use crate::Path;
use crate::bfs::BreadthFirst;
use crate::dijkstra::Dijkstra;
use crate::direct::DirectPath;
use crate::gbfs::GreedyBestFirst;
use crate::traits::TileSpace;

/// Identifier of a path finding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathAlgorithm {
    Direct = 1,
    BreadthFirst = 2,
    #[default]
    Dijkstra = 3,
    GreedyBestFirst = 4,
}

impl PathAlgorithm {
    /// Every algorithm, in identifier order.
    pub const ALL: [PathAlgorithm; 4] = [
        PathAlgorithm::Direct,
        PathAlgorithm::BreadthFirst,
        PathAlgorithm::Dijkstra,
        PathAlgorithm::GreedyBestFirst,
    ];

    /// Numeric identifier (1-based).
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Look up an algorithm by numeric identifier. Unknown identifiers are
    /// logged and yield `None`.
    pub fn from_id(id: u8) -> Option<Self> {
        let algo = Self::ALL.into_iter().find(|a| a.id() == id);
        if algo.is_none() {
            log::warn!("unknown path algorithm id {id}");
        }
        algo
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            PathAlgorithm::Direct => "Direct Path",
            PathAlgorithm::BreadthFirst => "Breadth First Search",
            PathAlgorithm::Dijkstra => "Dijkstra's Algorithm",
            PathAlgorithm::GreedyBestFirst => "Greedy Best First Search",
        }
    }

    /// Short name accepted by [`FromStr`].
    pub fn short_name(self) -> &'static str {
        match self {
            PathAlgorithm::Direct => "direct",
            PathAlgorithm::BreadthFirst => "bfs",
            PathAlgorithm::Dijkstra => "dijkstra",
            PathAlgorithm::GreedyBestFirst => "gbfs",
        }
    }

    /// The next algorithm, wrapping around after the last one.
    pub fn next(self) -> Self {
        match self {
            PathAlgorithm::Direct => PathAlgorithm::BreadthFirst,
            PathAlgorithm::BreadthFirst => PathAlgorithm::Dijkstra,
            PathAlgorithm::Dijkstra => PathAlgorithm::GreedyBestFirst,
            PathAlgorithm::GreedyBestFirst => PathAlgorithm::Direct,
        }
    }
}

impl fmt::Display for PathAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown path algorithm '{}' (expected direct, bfs, dijkstra or gbfs)",
            self.0
        )
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for PathAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Ok(id) = lower.parse::<u8>() {
            return Self::from_id(id).ok_or_else(|| UnknownAlgorithm(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|a| a.short_name() == lower)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// Statistics of the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Wall-clock time spent in the search.
    pub elapsed: Duration,
    /// Nodes popped and expanded. Always 0 for [`PathAlgorithm::Direct`].
    pub visited: usize,
}

#[derive(Debug, Clone)]
enum Strategy {
    Direct(DirectPath),
    BreadthFirst(BreadthFirst),
    Dijkstra(Dijkstra),
    GreedyBestFirst(GreedyBestFirst),
}

impl Strategy {
    fn new(algorithm: PathAlgorithm) -> Self {
        match algorithm {
            PathAlgorithm::Direct => Strategy::Direct(DirectPath::new()),
            PathAlgorithm::BreadthFirst => Strategy::BreadthFirst(BreadthFirst::new()),
            PathAlgorithm::Dijkstra => Strategy::Dijkstra(Dijkstra::new()),
            PathAlgorithm::GreedyBestFirst => Strategy::GreedyBestFirst(GreedyBestFirst::new()),
        }
    }

    fn algorithm(&self) -> PathAlgorithm {
        match self {
            Strategy::Direct(_) => PathAlgorithm::Direct,
            Strategy::BreadthFirst(_) => PathAlgorithm::BreadthFirst,
            Strategy::Dijkstra(_) => PathAlgorithm::Dijkstra,
            Strategy::GreedyBestFirst(_) => PathAlgorithm::GreedyBestFirst,
        }
    }
}

/// One path finding strategy bound to a map.
///
/// Each instance owns the scratch state of its strategy and serves one
/// search at a time; the `&mut self` receiver of
/// [`calculate_path`](PathFinder::calculate_path) enforces that.
#[derive(Debug, Clone)]
pub struct PathFinder<'m, M: TileSpace = TileMap> {
    map: &'m M,
    strategy: Strategy,
    stats: SearchStats,
}

/// Create a fresh path finder for `algorithm` bound to `map`.
///
/// Switching algorithms means calling this again: no state carries over.
pub fn create<M: TileSpace>(algorithm: PathAlgorithm, map: &M) -> PathFinder<'_, M> {
    PathFinder::new(algorithm, map)
}

impl<'m, M: TileSpace> PathFinder<'m, M> {
    pub fn new(algorithm: PathAlgorithm, map: &'m M) -> Self {
        log::debug!("new path finder: {algorithm}");
        Self {
            map,
            strategy: Strategy::new(algorithm),
            stats: SearchStats::default(),
        }
    }

    pub fn algorithm(&self) -> PathAlgorithm {
        self.strategy.algorithm()
    }

    /// Human-readable name of the strategy.
    pub fn name(&self) -> &'static str {
        self.algorithm().name()
    }

    pub fn map(&self) -> &'m M {
        self.map
    }

    /// Statistics of the most recent [`calculate_path`](Self::calculate_path) call.
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    /// Compute a route from `start` to `end`.
    ///
    /// The result lists the waypoints after `start`, up to and including the
    /// goal. It is empty if either endpoint is off the map, both lie on the
    /// same tile, or the goal cannot be reached.
    pub fn calculate_path(&mut self, start: WorldPos, end: WorldPos) -> Path {
        let map = self.map;
        let now = Instant::now();
        let (path, visited) = match &mut self.strategy {
            Strategy::Direct(s) => (s.calculate_path(map, start, end), 0),
            Strategy::BreadthFirst(s) => {
                let path = s.calculate_path(map, start, end);
                (path, s.visited())
            }
            Strategy::Dijkstra(s) => {
                let path = s.calculate_path(map, start, end);
                (path, s.visited())
            }
            Strategy::GreedyBestFirst(s) => {
                let path = s.calculate_path(map, start, end);
                (path, s.visited())
            }
        };
        self.stats = SearchStats {
            elapsed: now.elapsed(),
            visited,
        };
        log::debug!(
            "{}: {start} -> {end}: {} waypoints, {} visited, {:?}",
            self.name(),
            path.len(),
            visited,
            self.stats.elapsed
        );
        path
    }
}

/// Total movement cost of following `path` from `start`: the sum of the
/// cost of every tile stepped onto.
///
/// Consecutive waypoints are expected to lie on the same or adjacent tiles,
/// as produced by the searching strategies.
pub fn path_cost<M: TileSpace>(map: &M, start: WorldPos, path: &[WorldPos]) -> f32 {
    let mut prev = map.world_to_tile(start);
    let mut total = 0.0;
    for &w in path {
        let t = map.world_to_tile(w);
        if t != prev {
            total += map.cost(prev, t);
        }
        prev = t;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_and_names() {
        assert_eq!(PathAlgorithm::Direct.id(), 1);
        assert_eq!(PathAlgorithm::GreedyBestFirst.id(), 4);
        assert_eq!(PathAlgorithm::from_id(2), Some(PathAlgorithm::BreadthFirst));
        assert_eq!(PathAlgorithm::from_id(0), None);
        assert_eq!(PathAlgorithm::from_id(5), None);
        assert_eq!(PathAlgorithm::Dijkstra.to_string(), "Dijkstra's Algorithm");
    }

    #[test]
    fn next_cycles_through_all() {
        let mut a = PathAlgorithm::Direct;
        let mut seen = Vec::new();
        for _ in 0..PathAlgorithm::ALL.len() {
            seen.push(a);
            a = a.next();
        }
        assert_eq!(a, PathAlgorithm::Direct);
        assert_eq!(seen, PathAlgorithm::ALL);
    }

    #[test]
    fn parse() {
        assert_eq!("bfs".parse::<PathAlgorithm>(), Ok(PathAlgorithm::BreadthFirst));
        assert_eq!(" GBFS ".parse::<PathAlgorithm>(), Ok(PathAlgorithm::GreedyBestFirst));
        assert_eq!("3".parse::<PathAlgorithm>(), Ok(PathAlgorithm::Dijkstra));
        assert!("astar".parse::<PathAlgorithm>().is_err());
        assert!("9".parse::<PathAlgorithm>().is_err());
    }

    #[test]
    fn unknown_algorithm_message() {
        let err = "astar".parse::<PathAlgorithm>().unwrap_err();
        assert_eq!(err, UnknownAlgorithm("astar".to_string()));
        assert_eq!(
            err.to_string(),
            "unknown path algorithm 'astar' (expected direct, bfs, dijkstra or gbfs)"
        );
    }
}
