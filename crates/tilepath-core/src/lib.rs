//! **tilepath-core** — core types for the tilepath grid-world engine.
//!
//! This crate provides the foundational types shared by the tile map, the
//! path finders and the spatial grid: discrete tile coordinates, continuous
//! world coordinates, tile ranges and display colours.

pub mod color;
pub mod geom;

pub use color::Color;
pub use geom::{RangeIter, TilePos, TileRange, WORLD_EPSILON, WorldPos, WorldSize};
