use tilepath_core::{TilePos, WorldPos};
use tilepath_map::TileMap;

/// Minimal pathfinding interface: validity and neighbour enumeration.
pub trait Pather {
    /// Whether `p` is a node of the graph.
    fn is_valid(&self, p: TilePos) -> bool;

    /// Append neighbours of `p` into `buf`. The caller clears `buf` before calling.
    fn neighbors(&self, p: TilePos, buf: &mut Vec<TilePos>);
}

/// Pather with weighted (positive-cost) edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`. Must be > 0.
    fn cost(&self, from: TilePos, to: TilePos) -> f32;
}

/// A weighted pather laid out over continuous world space.
pub trait TileSpace: WeightedPather {
    /// The node containing world position `p`. May be invalid.
    fn world_to_tile(&self, p: WorldPos) -> TilePos;

    /// The world position a path waypoint for node `p` is placed at.
    fn tile_to_world(&self, p: TilePos) -> WorldPos;
}

impl Pather for TileMap {
    #[inline]
    fn is_valid(&self, p: TilePos) -> bool {
        self.is_tile_pos_valid(p)
    }

    #[inline]
    fn neighbors(&self, p: TilePos, buf: &mut Vec<TilePos>) {
        self.neighbors_into(p, buf);
    }
}

impl WeightedPather for TileMap {
    /// Entering a tile costs that tile's multiplier.
    #[inline]
    fn cost(&self, _from: TilePos, to: TilePos) -> f32 {
        TileMap::cost(self, to)
    }
}

impl TileSpace for TileMap {
    #[inline]
    fn world_to_tile(&self, p: WorldPos) -> TilePos {
        TileMap::world_to_tile(self, p)
    }

    #[inline]
    fn tile_to_world(&self, p: TilePos) -> WorldPos {
        TileMap::tile_to_world(self, p)
    }
}
