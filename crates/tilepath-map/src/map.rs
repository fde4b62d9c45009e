//! The [`TileMap`]: a fixed-size, row-major grid of tile types plus the
//! metadata table and the tile/world coordinate conversions.

use tilepath_core::{TilePos, TileRange, WorldPos, WorldSize};

use crate::tile::{Tile, TileTable, TileType};

/// Edge length of one tile in world units, unless configured otherwise.
pub const DEFAULT_TILE_SIZE: f32 = 10.0;

/// Construction parameters for a [`TileMap`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapConfig {
    /// Number of columns.
    pub width: i32,
    /// Number of rows.
    pub height: i32,
    /// Edge length of one tile in world units.
    pub tile_size: f32,
    /// Type every cell starts with.
    pub fill: TileType,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 30,
            tile_size: DEFAULT_TILE_SIZE,
            fill: TileType::Grass,
        }
    }
}

/// A rectangular tile grid with per-tile movement cost.
///
/// Dimensions are fixed at construction and every cell always holds a valid
/// [`TileType`]. Accessors that index the grid require a position that has
/// been checked with [`is_tile_pos_valid`](TileMap::is_tile_pos_valid) and
/// panic otherwise.
#[derive(Debug, Clone)]
pub struct TileMap {
    tiles: Vec<TileType>,
    table: TileTable,
    bounds: TileRange,
    tile_size: f32,
}

impl TileMap {
    /// Create a `width × height` map filled with [`TileType::Grass`], using
    /// [`DEFAULT_TILE_SIZE`].
    pub fn new(width: i32, height: i32, table: TileTable) -> Self {
        Self::from_config(
            &MapConfig {
                width,
                height,
                ..MapConfig::default()
            },
            table,
        )
    }

    /// Create a map from a [`MapConfig`].
    ///
    /// # Panics
    ///
    /// Panics if `config.tile_size` is not strictly positive.
    pub fn from_config(config: &MapConfig, table: TileTable) -> Self {
        assert!(
            config.tile_size > 0.0,
            "tile size must be > 0, got {}",
            config.tile_size
        );
        let w = config.width.max(0);
        let h = config.height.max(0);
        log::debug!("new tile map: {w}x{h}, tile size {}", config.tile_size);
        Self {
            tiles: vec![config.fill; (w as usize) * (h as usize)],
            table,
            bounds: TileRange::new(0, 0, w, h),
            tile_size: config.tile_size,
        }
    }

    // -----------------------------------------------------------------------
    // Dimensions
    // -----------------------------------------------------------------------

    /// The range of valid tile positions.
    #[inline]
    pub fn bounds(&self) -> TileRange {
        self.bounds
    }

    /// Size in tiles as a `TilePos` (columns, rows).
    #[inline]
    pub fn size(&self) -> TilePos {
        self.bounds.size()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Edge length of one tile in world units.
    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Extent of one tile in world units.
    #[inline]
    pub fn tile_extent(&self) -> WorldSize {
        WorldSize::splat(self.tile_size)
    }

    /// Extent of the whole map in world units.
    #[inline]
    pub fn world_size(&self) -> WorldSize {
        WorldSize::new(
            self.width() as f32 * self.tile_size,
            self.height() as f32 * self.tile_size,
        )
    }

    /// The metadata table this map was built with.
    #[inline]
    pub fn table(&self) -> &TileTable {
        &self.table
    }

    // -----------------------------------------------------------------------
    // Coordinate conversion
    // -----------------------------------------------------------------------

    /// World position of the center of tile `p`.
    #[inline]
    pub fn tile_to_world(&self, p: TilePos) -> WorldPos {
        WorldPos::new(
            (p.x as f32 + 0.5) * self.tile_size,
            (p.y as f32 + 0.5) * self.tile_size,
        )
    }

    /// World position of the top-left corner of tile `p`.
    #[inline]
    pub fn tile_edge_to_world(&self, p: TilePos) -> WorldPos {
        WorldPos::new(p.x as f32 * self.tile_size, p.y as f32 * self.tile_size)
    }

    /// The tile containing world position `p`.
    ///
    /// Rounds towards negative infinity, so positions left of or above the
    /// origin map to negative (invalid) tiles.
    #[inline]
    pub fn world_to_tile(&self, p: WorldPos) -> TilePos {
        TilePos::new(
            (p.x / self.tile_size).floor() as i32,
            (p.y / self.tile_size).floor() as i32,
        )
    }

    // -----------------------------------------------------------------------
    // Tile access
    // -----------------------------------------------------------------------

    /// Whether `p` is a position on this map.
    #[inline]
    pub fn is_tile_pos_valid(&self, p: TilePos) -> bool {
        self.bounds.contains(p)
    }

    #[inline]
    fn index(&self, p: TilePos) -> usize {
        assert!(
            self.is_tile_pos_valid(p),
            "tile position {p} outside map bounds {}",
            self.bounds
        );
        (p.y as usize) * (self.width() as usize) + (p.x as usize)
    }

    /// Type of the tile at `p`.
    ///
    /// # Panics
    ///
    /// Panics if `p` is not a valid position.
    #[inline]
    pub fn tile_type_at(&self, p: TilePos) -> TileType {
        self.tiles[self.index(p)]
    }

    /// Metadata of the tile at `p`.
    ///
    /// # Panics
    ///
    /// Panics if `p` is not a valid position.
    #[inline]
    pub fn tile_at(&self, p: TilePos) -> &Tile {
        self.table.get(self.tile_type_at(p))
    }

    /// Metadata of the tile under world position `p`.
    ///
    /// # Panics
    ///
    /// Panics if `p` is not over the map.
    #[inline]
    pub fn tile_at_world(&self, p: WorldPos) -> &Tile {
        self.tile_at(self.world_to_tile(p))
    }

    /// Overwrite the type of the tile at `p`.
    ///
    /// # Panics
    ///
    /// Panics if `p` is not a valid position.
    #[inline]
    pub fn set_tile(&mut self, p: TilePos, tile_type: TileType) {
        let i = self.index(p);
        self.tiles[i] = tile_type;
    }

    /// Movement-cost multiplier of the tile at `p`. Always > 0.
    ///
    /// # Panics
    ///
    /// Panics if `p` is not a valid position.
    #[inline]
    pub fn cost(&self, p: TilePos) -> f32 {
        self.tile_at(p).cost
    }

    /// Speed multiplier for an agent standing on world position `p`:
    /// the inverse of the tile cost.
    ///
    /// # Panics
    ///
    /// Panics if `p` is not over the map.
    #[inline]
    pub fn velocity_coeff(&self, p: WorldPos) -> f32 {
        1.0 / self.tile_at_world(p).cost
    }

    /// Append the valid 4-connected neighbours of `center` to `buf`.
    /// The caller clears `buf` before calling.
    pub fn neighbors_into(&self, center: TilePos, buf: &mut Vec<TilePos>) {
        for n in center.neighbors_4() {
            if self.is_tile_pos_valid(n) {
                buf.push(n);
            }
        }
    }

    /// The valid 4-connected neighbours of `center` (at most four).
    pub fn neighbors(&self, center: TilePos) -> Vec<TilePos> {
        let mut buf = Vec::with_capacity(4);
        self.neighbors_into(center, &mut buf);
        buf
    }

    /// Iterate over `(TilePos, TileType)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TilePos, TileType)> + '_ {
        self.bounds.iter().zip(self.tiles.iter().copied())
    }

    /// Count the tiles of a given type.
    pub fn count(&self, tile_type: TileType) -> usize {
        self.tiles.iter().filter(|&&t| t == tile_type).count()
    }
}
