//! Procedural authoring: painting circles, thick lines and rectangles of a
//! tile type onto a [`TileMap`].
//!
//! Every target cell is checked with
//! [`is_tile_pos_valid`](TileMap::is_tile_pos_valid) before it is written, so
//! shapes may freely overhang the map edges. Each operation returns the
//! number of cells whose type actually changed.

use tilepath_core::{TilePos, TileRange};

use crate::map::TileMap;
use crate::tile::TileType;

/// Spacing between the parallel strokes that make up a thick line, in tiles.
const LINE_WIDTH_STEP: f64 = 0.1;

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl TileMap {
    /// Write `tile_type` at `p` if `p` is on the map. Returns whether the
    /// cell changed.
    fn paint_cell(&mut self, p: TilePos, tile_type: TileType) -> bool {
        if !self.is_tile_pos_valid(p) || self.tile_type_at(p) == tile_type {
            return false;
        }
        self.set_tile(p, tile_type);
        true
    }

    /// Convert a floating-point tile coordinate to a `TilePos`, but only if
    /// it lies on the map. Bounds are checked before truncating, so that
    /// e.g. `-0.5` is rejected instead of collapsing onto column 0.
    fn tile_from_f64(&self, x: f64, y: f64) -> Option<TilePos> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        if x >= self.width() as f64 || y >= self.height() as f64 {
            return None;
        }
        let p = TilePos::new(x as i32, y as i32);
        self.is_tile_pos_valid(p).then_some(p)
    }

    /// Paint every tile whose distance to `center` is strictly less than
    /// `radius`. A radius of 0 paints nothing.
    ///
    /// Only the part of the bounding box that overlaps the map is visited,
    /// so the cost is bounded by the map size whatever the radius.
    pub fn paint_circle(&mut self, center: TilePos, radius: u32, tile_type: TileType) -> usize {
        let (cx, cy, r) = (center.x as i64, center.y as i64, radius as i64);
        let bbox = TileRange::new(
            clamp_i32(cx - r),
            clamp_i32(cy - r),
            clamp_i32(cx + r + 1),
            clamp_i32(cy + r + 1),
        )
        .intersect(self.bounds());
        // Squares of deltas up to 2^32 need more than 64 bits.
        let r_squared = (r as i128) * (r as i128);

        let mut changed = 0;
        for p in bbox {
            let dx = (p.x as i64 - cx) as i128;
            let dy = (p.y as i64 - cy) as i128;
            if dx * dx + dy * dy < r_squared && self.paint_cell(p, tile_type) {
                changed += 1;
            }
        }
        log::debug!("paint_circle {center} r={radius} {tile_type}: {changed} tiles changed");
        changed
    }

    /// Paint the half-open rectangle spanned by two corners (in any order):
    /// the lower corner is included, the upper one is not.
    pub fn paint_rectangle(
        &mut self,
        first_corner: TilePos,
        second_corner: TilePos,
        tile_type: TileType,
    ) -> usize {
        let rect = TileRange::from_corners(first_corner, second_corner).intersect(self.bounds());
        let mut changed = 0;
        for p in rect {
            if self.paint_cell(p, tile_type) {
                changed += 1;
            }
        }
        log::debug!("paint_rectangle {rect} {tile_type}: {changed} tiles changed");
        changed
    }

    /// Paint a thick line from `start` to `stop`, both included.
    ///
    /// The line advances one tile at a time along its direction; at every
    /// step a stroke of length `width` is laid along the orthogonal vector
    /// (to the left of the direction of travel). Positions stay in floating
    /// point until they have been bounds-checked. A width below one stroke
    /// step still paints the centre line.
    pub fn paint_line(
        &mut self,
        start: TilePos,
        stop: TilePos,
        width: f64,
        tile_type: TileType,
    ) -> usize {
        let (sx, sy) = (start.x as f64, start.y as f64);
        let (dx, dy) = (stop.x as f64 - sx, stop.y as f64 - sy);
        let length = dx.hypot(dy);

        let mut changed = 0;
        if length == 0.0 {
            if self.paint_cell(start, tile_type) {
                changed += 1;
            }
            return changed;
        }

        let (step_x, step_y) = (dx / length, dy / length);
        let (ortho_x, ortho_y) = (-step_y, step_x);
        let strokes = (width / LINE_WIDTH_STEP - 1e-9).ceil().max(1.0) as usize;
        let steps = length.ceil() as usize;

        for i in 0..=steps {
            let t = i as f64;
            // The last step lands exactly on `stop`.
            let (bx, by) = if t >= length {
                (stop.x as f64, stop.y as f64)
            } else {
                (sx + step_x * t, sy + step_y * t)
            };
            for j in 0..strokes {
                let o = j as f64 * LINE_WIDTH_STEP;
                let x = bx + ortho_x * o;
                let y = by + ortho_y * o;
                if let Some(p) = self.tile_from_f64(x, y) {
                    if self.paint_cell(p, tile_type) {
                        changed += 1;
                    }
                }
            }
        }
        log::debug!("paint_line {start}->{stop} w={width} {tile_type}: {changed} tiles changed");
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileTable;

    fn map(w: i32, h: i32) -> TileMap {
        TileMap::new(w, h, TileTable::default())
    }

    #[test]
    fn circle_inside_radius_only() {
        let mut m = map(10, 10);
        let water = m.table()[TileType::Water].cost;
        let grass = m.table()[TileType::Grass].cost;
        m.paint_circle(TilePos::new(5, 5), 3, TileType::Water);

        assert_eq!(m.cost(TilePos::new(5, 5)), water);
        assert_eq!(m.cost(TilePos::new(5, 3)), water);
        assert_eq!(m.cost(TilePos::new(7, 6)), water);
        // On or outside the radius.
        assert_eq!(m.cost(TilePos::new(5, 8)), grass);
        assert_eq!(m.cost(TilePos::new(5, 9)), grass);
        assert_eq!(m.cost(TilePos::new(8, 5)), grass);
    }

    #[test]
    fn circle_overhanging_edges() {
        let mut m = map(4, 4);
        let changed = m.paint_circle(TilePos::new(0, 0), 2, TileType::Mud);
        // (0,0) (1,0) (0,1) (1,1)
        assert_eq!(changed, 4);
        assert_eq!(m.count(TileType::Mud), 4);
    }

    #[test]
    fn huge_radius_covers_map() {
        for radius in [100_000, 1 << 31, u32::MAX] {
            let mut m = map(10, 10);
            assert_eq!(m.paint_circle(TilePos::new(5, 5), radius, TileType::Water), 100);
            assert_eq!(m.count(TileType::Water), 100);
        }
    }

    #[test]
    fn circle_centred_far_off_map() {
        let mut m = map(10, 10);
        let far = TilePos::new(i32::MIN, i32::MAX);
        // The map is about 3.04e9 tiles away from `far`.
        assert_eq!(m.paint_circle(far, 50, TileType::Water), 0);
        assert_eq!(m.paint_circle(far, 1 << 31, TileType::Water), 0);
        assert_eq!(m.paint_circle(far, u32::MAX, TileType::Water), 100);

        let mut m = map(10, 10);
        let left = TilePos::new(-3, 9);
        assert_eq!(m.paint_circle(left, 4, TileType::Mud), 3);
        for y in 7..10 {
            assert_eq!(m.tile_type_at(TilePos::new(0, y)), TileType::Mud);
        }
    }

    #[test]
    fn rectangle_far_outside_map() {
        let mut m = map(5, 5);
        let changed = m.paint_rectangle(
            TilePos::new(i32::MIN, i32::MIN),
            TilePos::new(i32::MAX, i32::MAX),
            TileType::Road,
        );
        assert_eq!(changed, 25);
    }

    #[test]
    fn circle_zero_radius_paints_nothing() {
        let mut m = map(4, 4);
        assert_eq!(m.paint_circle(TilePos::new(2, 2), 0, TileType::Mud), 0);
    }

    #[test]
    fn rectangle_half_open_any_corner_order() {
        let mut m = map(10, 10);
        let changed = m.paint_rectangle(TilePos::new(5, 4), TilePos::new(2, 1), TileType::Road);
        assert_eq!(changed, 9);
        assert_eq!(m.tile_type_at(TilePos::new(2, 1)), TileType::Road);
        assert_eq!(m.tile_type_at(TilePos::new(4, 3)), TileType::Road);
        assert_eq!(m.tile_type_at(TilePos::new(5, 4)), TileType::Grass);

        // Repainting the same region changes nothing.
        assert_eq!(
            m.paint_rectangle(TilePos::new(2, 1), TilePos::new(5, 4), TileType::Road),
            0
        );
    }

    #[test]
    fn rectangle_clipped_to_map() {
        let mut m = map(5, 5);
        let changed = m.paint_rectangle(TilePos::new(-3, -3), TilePos::new(2, 2), TileType::Wood);
        assert_eq!(changed, 4);
    }

    #[test]
    fn horizontal_line_includes_both_ends() {
        let mut m = map(10, 10);
        m.paint_line(TilePos::new(1, 5), TilePos::new(8, 5), 0.0, TileType::Road);
        for x in 1..=8 {
            assert_eq!(m.tile_type_at(TilePos::new(x, 5)), TileType::Road, "x = {x}");
        }
        assert_eq!(m.tile_type_at(TilePos::new(0, 5)), TileType::Grass);
        assert_eq!(m.tile_type_at(TilePos::new(9, 5)), TileType::Grass);
        assert_eq!(m.count(TileType::Road), 8);
    }

    #[test]
    fn thick_line_covers_width() {
        let mut m = map(10, 10);
        // Direction +x, orthogonal is +y.
        m.paint_line(TilePos::new(0, 2), TilePos::new(9, 2), 3.0, TileType::Road);
        for x in 0..10 {
            for y in 2..5 {
                assert_eq!(m.tile_type_at(TilePos::new(x, y)), TileType::Road);
            }
            assert_eq!(m.tile_type_at(TilePos::new(x, 5)), TileType::Grass);
            assert_eq!(m.tile_type_at(TilePos::new(x, 1)), TileType::Grass);
        }
    }

    #[test]
    fn diagonal_line_reaches_stop() {
        let mut m = map(10, 10);
        m.paint_line(TilePos::new(0, 0), TilePos::new(9, 9), 0.0, TileType::Mud);
        assert_eq!(m.tile_type_at(TilePos::new(0, 0)), TileType::Mud);
        assert_eq!(m.tile_type_at(TilePos::new(9, 9)), TileType::Mud);
    }

    #[test]
    fn line_offset_off_the_map_is_skipped() {
        // Direction -x, orthogonal is -y: the whole stroke hangs off the top
        // edge except the centre line, which must not be folded onto row 0
        // by truncation.
        let mut m = map(10, 10);
        m.paint_line(TilePos::new(9, 0), TilePos::new(0, 0), 2.0, TileType::Water);
        assert_eq!(m.count(TileType::Water), 10);
        for x in 0..10 {
            assert_eq!(m.tile_type_at(TilePos::new(x, 0)), TileType::Water);
            assert_eq!(m.tile_type_at(TilePos::new(x, 1)), TileType::Grass);
        }
    }

    #[test]
    fn degenerate_line_paints_start() {
        let mut m = map(4, 4);
        assert_eq!(
            m.paint_line(TilePos::new(1, 1), TilePos::new(1, 1), 2.0, TileType::Mud),
            1
        );
        assert_eq!(m.paint_line(TilePos::new(-1, 1), TilePos::new(-1, 1), 2.0, TileType::Mud), 0);
    }
}
