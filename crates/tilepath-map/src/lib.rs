//! **tilepath-map** — the weighted tile map.
//!
//! A [`TileMap`] is a fixed-size grid of [`TileType`]s. Each type resolves
//! through a [`TileTable`] to a movement cost and a display colour. The map
//! converts between tile and world coordinates and offers procedural
//! authoring (circles, thick lines, rectangles) plus random generation
//! through [`MapGen`].

pub mod map;
pub mod mapgen;
mod paint;
pub mod tile;

pub use map::{DEFAULT_TILE_SIZE, MapConfig, TileMap};
pub use mapgen::{FourDirectionWalker, MapGen, RandomWalker};
pub use tile::{Tile, TileTable, TileType};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use tilepath_core::Color;

    #[test]
    fn map_config_round_trip() {
        let cfg = MapConfig {
            width: 12,
            height: 8,
            tile_size: 4.0,
            fill: TileType::Mud,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: MapConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn tile_table_round_trip() {
        let table =
            TileTable::default().with(TileType::Wood, Tile::new(4.5, Color::from_rgb(9, 9, 9)));
        let json = serde_json::to_string(&table).unwrap();
        let back: TileTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, back);
    }
}
