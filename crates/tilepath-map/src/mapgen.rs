//! Random map authoring.
//!
//! [`MapGen`] wraps a [`TileMap`] together with an RNG and provides two
//! generators:
//! - **Randomize**: every cell gets a uniformly chosen palette entry.
//! - **Random walk**: a drunk walk that lays a trail of one tile type.

use rand::{Rng, RngExt};
use tilepath_core::TilePos;

use crate::map::TileMap;
use crate::tile::TileType;

/// Trait for choosing a random neighbour during a random walk.
pub trait RandomWalker {
    /// Given a position `p`, return a random neighbour using `rng`.
    fn neighbor(&self, p: TilePos, rng: &mut impl Rng) -> TilePos;
}

/// A simple 4-directional random walker.
pub struct FourDirectionWalker;

impl RandomWalker for FourDirectionWalker {
    fn neighbor(&self, p: TilePos, rng: &mut impl Rng) -> TilePos {
        match rng.random_range(0..4u32) {
            0 => p.shift(1, 0),
            1 => p.shift(-1, 0),
            2 => p.shift(0, 1),
            _ => p.shift(0, -1),
        }
    }
}

/// Map generator operating on a [`TileMap`].
pub struct MapGen<R: Rng> {
    pub rng: R,
    pub map: TileMap,
}

impl<R: Rng> MapGen<R> {
    /// Create a new `MapGen` with the given map.
    pub fn with_map(map: TileMap, rng: R) -> Self {
        Self { rng, map }
    }

    /// Give the map back.
    pub fn into_map(self) -> TileMap {
        self.map
    }

    /// Fill every tile with a type picked uniformly from `palette`.
    ///
    /// An empty palette leaves the map untouched. Returns the number of
    /// cells whose type changed.
    pub fn randomize(&mut self, palette: &[TileType]) -> usize {
        if palette.is_empty() {
            return 0;
        }
        let mut changed = 0;
        for p in self.map.bounds() {
            let ty = palette[self.rng.random_range(0..palette.len())];
            if self.map.tile_type_at(p) != ty {
                self.map.set_tile(p, ty);
                changed += 1;
            }
        }
        log::debug!("randomize over {} types: {changed} tiles changed", palette.len());
        changed
    }

    /// Walk `steps` random steps from `start`, setting every visited tile to
    /// `tile_type`.
    ///
    /// Steps that would leave the map are discarded and the walker stays
    /// put. A `start` outside the map paints nothing. Returns the number of
    /// cells whose type changed.
    pub fn random_walk(
        &mut self,
        walker: &impl RandomWalker,
        start: TilePos,
        steps: usize,
        tile_type: TileType,
    ) -> usize {
        if !self.map.is_tile_pos_valid(start) {
            return 0;
        }
        let mut changed = 0;
        let mut pos = start;
        for step in 0..=steps {
            if self.map.tile_type_at(pos) != tile_type {
                self.map.set_tile(pos, tile_type);
                changed += 1;
            }
            if step == steps {
                break;
            }
            let next = walker.neighbor(pos, &mut self.rng);
            if self.map.is_tile_pos_valid(next) {
                pos = next;
            }
        }
        log::debug!("random_walk from {start}, {steps} steps of {tile_type}: {changed} tiles changed");
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileTable;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn gen_with(w: i32, h: i32, seed: u64) -> MapGen<StdRng> {
        MapGen::with_map(
            TileMap::new(w, h, TileTable::default()),
            StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn randomize_uses_only_palette() {
        let mut mg = gen_with(20, 20, 7);
        let palette = [TileType::Mud, TileType::Water];
        mg.randomize(&palette);
        assert_eq!(mg.map.count(TileType::Grass), 0);
        assert_eq!(mg.map.count(TileType::Mud) + mg.map.count(TileType::Water), 400);
        // 400 draws from two types: both show up.
        assert!(mg.map.count(TileType::Mud) > 0);
        assert!(mg.map.count(TileType::Water) > 0);
    }

    #[test]
    fn randomize_empty_palette_is_noop() {
        let mut mg = gen_with(5, 5, 1);
        assert_eq!(mg.randomize(&[]), 0);
        assert_eq!(mg.map.count(TileType::Grass), 25);
    }

    #[test]
    fn randomize_is_deterministic_per_seed() {
        let mut a = gen_with(10, 10, 42);
        let mut b = gen_with(10, 10, 42);
        a.randomize(&TileType::ALL);
        b.randomize(&TileType::ALL);
        assert!(a.map.iter().eq(b.map.iter()));
    }

    #[test]
    fn random_walk_trail_is_connected() {
        let mut mg = gen_with(15, 15, 3);
        let start = TilePos::new(7, 7);
        let changed = mg.random_walk(&FourDirectionWalker, start, 60, TileType::Road);
        assert!(changed >= 1);
        assert!(changed <= 61);
        assert_eq!(mg.map.tile_type_at(start), TileType::Road);
        assert_eq!(mg.map.count(TileType::Road), changed);

        // Every road tile other than the start touches another road tile.
        for (p, ty) in mg.map.iter() {
            if ty == TileType::Road && p != start {
                assert!(
                    mg.map
                        .neighbors(p)
                        .iter()
                        .any(|&n| mg.map.tile_type_at(n) == TileType::Road)
                );
            }
        }
    }

    #[test]
    fn random_walk_off_map_start() {
        let mut mg = gen_with(5, 5, 0);
        assert_eq!(
            mg.random_walk(&FourDirectionWalker, TilePos::new(-1, 0), 10, TileType::Mud),
            0
        );
    }

    #[test]
    fn random_walk_zero_steps_paints_start() {
        let mut mg = gen_with(5, 5, 0);
        assert_eq!(
            mg.random_walk(&FourDirectionWalker, TilePos::new(2, 2), 0, TileType::Mud),
            1
        );
        let map = mg.into_map();
        assert_eq!(map.count(TileType::Mud), 1);
    }
}
