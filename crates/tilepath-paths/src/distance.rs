use tilepath_core::TilePos;

/// Manhattan (L1) distance between two positions.
#[inline]
pub fn manhattan(a: TilePos, b: TilePos) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
