//! **tilepath-spatial** — proximity queries over moving entities.
//!
//! Entities live in a [`slotmap::SlotMap`] owned by the caller. Containers
//! store only the copyable handles and look entities up in the arena on
//! every call, so an entity removed from the arena simply turns into a
//! dead handle:
//!
//! - [`SpatialGrid`] partitions the world into chunks and keeps a reverse
//!   index from handle to chunk.
//! - [`BruteForceContainer`] scans a flat list. It answers the same
//!   queries and serves as the reference the grid is tested against.
//!
//! Queries return a bounding-box over-approximation that may include dead
//! handles; [`within_radius`] and [`resolve`] turn it into live entities.

mod brute;
mod container;
mod grid;

pub use brute::BruteForceContainer;
pub use container::{HasPosition, PositionalContainer, resolve, within_radius};
pub use grid::{ChunkPos, GridConfig, SpatialGrid};
