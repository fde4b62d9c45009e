//! Path finding over a weighted tile map.
//!
//! Four interchangeable strategies share one contract,
//! `calculate_path(start, end) -> Path`:
//!
//! | Strategy | Edge weight | Frontier | Optimality |
//! |---|---|---|---|
//! | [`DirectPath`] | n/a | none | none |
//! | [`BreadthFirst`] | 1 per step | FIFO queue | fewest steps |
//! | [`Dijkstra`] | destination tile cost | min-heap on accumulated cost | cheapest |
//! | [`GreedyBestFirst`] | ignored | min-heap on [`manhattan`] distance to goal | none |
//!
//! [`PathFinder`] binds one strategy, selected at runtime by a
//! [`PathAlgorithm`], to a map. Every search starts from scratch.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | BFS, greedy best-first |
//! | [`WeightedPather`] : [`Pather`] | Dijkstra |
//! | [`TileSpace`] : [`WeightedPather`] | every strategy, to convert world positions |

mod bfs;
mod dijkstra;
mod direct;
mod distance;
mod finder;
mod frontier;
mod gbfs;
mod traits;

pub use bfs::BreadthFirst;
pub use dijkstra::Dijkstra;
pub use direct::DirectPath;
pub use distance::manhattan;
pub use finder::{PathAlgorithm, PathFinder, SearchStats, UnknownAlgorithm, create, path_cost};
pub use gbfs::GreedyBestFirst;
pub use traits::{Pather, TileSpace, WeightedPather};

use tilepath_core::WorldPos;

/// An ordered list of waypoints, from the first step after the start to the
/// goal inclusive. Empty means "no path".
pub type Path = Vec<WorldPos>;
