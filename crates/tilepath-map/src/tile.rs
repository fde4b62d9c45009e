//! Tile metadata: [`TileType`], [`Tile`] and the [`TileTable`] that maps one
//! to the other.
//!
//! Cells of a [`TileMap`](crate::TileMap) store only a `TileType`; the cost
//! and colour are looked up in the table the map was built with, so several
//! maps with different tables can coexist.

use std::fmt;
use std::ops::Index;

use tilepath_core::Color;

/// The closed set of terrain kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileType {
    #[default]
    Grass,
    Wood,
    Mud,
    Road,
    Water,
}

impl TileType {
    /// Number of tile types.
    pub const COUNT: usize = 5;

    /// Every tile type, in declaration order.
    pub const ALL: [TileType; Self::COUNT] = [
        TileType::Grass,
        TileType::Wood,
        TileType::Mud,
        TileType::Road,
        TileType::Water,
    ];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    /// Lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            TileType::Grass => "grass",
            TileType::Wood => "wood",
            TileType::Mud => "mud",
            TileType::Road => "road",
            TileType::Water => "water",
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable per-type tile metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    /// Movement-cost multiplier. Always > 0.
    pub cost: f32,
    pub color: Color,
}

impl Tile {
    pub const fn new(cost: f32, color: Color) -> Self {
        Self { cost, color }
    }
}

/// A complete `TileType → Tile` table.
///
/// Every tile type always has an entry, so every map cell resolves to valid
/// metadata.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileTable {
    tiles: [Tile; TileType::COUNT],
}

impl Default for TileTable {
    fn default() -> Self {
        Self {
            tiles: [
                Tile::new(1.0, Color::from_rgb(0, 200, 0)),
                Tile::new(3.0, Color::from_rgb(20, 100, 20)),
                Tile::new(2.0, Color::from_rgb(100, 100, 100)),
                Tile::new(0.5, Color::from_rgb(20, 20, 20)),
                Tile::new(10.0, Color::from_rgb(0, 50, 200)),
            ],
        }
    }
}

impl TileTable {
    /// A table where every type shares the same metadata.
    ///
    /// # Panics
    ///
    /// Panics if `tile.cost` is not strictly positive.
    pub fn uniform(tile: Tile) -> Self {
        assert!(tile.cost > 0.0, "tile cost must be > 0, got {}", tile.cost);
        Self {
            tiles: [tile; TileType::COUNT],
        }
    }

    /// Replace the metadata of one type (builder).
    ///
    /// # Panics
    ///
    /// Panics if `tile.cost` is not strictly positive.
    pub fn with(mut self, tile_type: TileType, tile: Tile) -> Self {
        assert!(
            tile.cost > 0.0,
            "tile cost for {tile_type} must be > 0, got {}",
            tile.cost
        );
        self.tiles[tile_type.index()] = tile;
        self
    }

    /// Metadata for `tile_type`.
    #[inline]
    pub fn get(&self, tile_type: TileType) -> &Tile {
        &self.tiles[tile_type.index()]
    }

    /// Iterate over `(TileType, &Tile)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (TileType, &Tile)> {
        TileType::ALL.into_iter().zip(self.tiles.iter())
    }
}

impl Index<TileType> for TileTable {
    type Output = Tile;

    #[inline]
    fn index(&self, tile_type: TileType) -> &Tile {
        self.get(tile_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_costs() {
        let t = TileTable::default();
        assert_eq!(t[TileType::Grass].cost, 1.0);
        assert_eq!(t[TileType::Road].cost, 0.5);
        assert_eq!(t[TileType::Water].cost, 10.0);
        assert!(t.iter().all(|(_, tile)| tile.cost > 0.0));
        assert_eq!(t.iter().count(), TileType::COUNT);
    }

    #[test]
    fn builder_replaces_one_entry() {
        let swamp = Tile::new(7.0, Color::from_rgb(1, 2, 3));
        let t = TileTable::default().with(TileType::Mud, swamp);
        assert_eq!(t[TileType::Mud], swamp);
        assert_eq!(t[TileType::Grass], TileTable::default()[TileType::Grass]);
    }

    #[test]
    fn uniform_table() {
        let t = TileTable::uniform(Tile::new(2.0, Color::default()));
        assert!(TileType::ALL.iter().all(|&ty| t[ty].cost == 2.0));
    }

    #[test]
    #[should_panic]
    fn zero_cost_rejected() {
        let _ = TileTable::default().with(TileType::Road, Tile::new(0.0, Color::default()));
    }

    #[test]
    fn all_matches_index() {
        for (i, ty) in TileType::ALL.iter().enumerate() {
            assert_eq!(ty.index(), i);
        }
    }
}
