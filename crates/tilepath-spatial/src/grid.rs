//! [`SpatialGrid`]: a chunked spatial hash over world space.
//!
//! The world `[0, world_size)` is split into `chunks × chunks` equal cells.
//! Each cell holds the handles of the entities last seen inside it, and a
//! reverse index remembers which cell every tracked handle was filed under,
//! so a moved entity can be taken out of its old bucket without scanning the
//! grid.
//!
//! The reverse index is keyed by the full versioned handle rather than by
//! arena slot: a handle whose entity is gone stays indexed until `update` or
//! `prune` drops it, even after the arena hands its slot to a new entity.

use std::collections::BTreeMap;
use std::fmt;

use slotmap::{Key, SlotMap};
use tilepath_core::{WorldPos, WorldSize};

use crate::container::{HasPosition, PositionalContainer, in_world, rect_corners};

/// Construction parameters for a [`SpatialGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// Extent of the indexed world, in world units.
    pub world_size: WorldSize,
    /// Number of chunks along each axis.
    pub chunks: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            world_size: WorldSize::new(400.0, 300.0),
            chunks: 10,
        }
    }
}

/// Coordinate of one chunk of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkPos {
    pub x: usize,
    pub y: usize,
}

impl ChunkPos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Spatial partitioning grid for proximity queries over arena-owned entities.
///
/// # Performance
///
/// - **Add:** O(1) amortized
/// - **Update:** O(1), plus O(bucket size) when the entity changes chunk
/// - **Query:** O(chunks touched × bucket occupancy)
pub struct SpatialGrid<K: Key> {
    world_size: WorldSize,
    chunks: usize,
    chunk_size: WorldSize,
    buckets: Vec<Vec<K>>,
    index: BTreeMap<K, ChunkPos>,
    // reused by update_all
    scratch: Vec<K>,
}

impl<K: Key> SpatialGrid<K> {
    /// Create an empty grid of `chunks × chunks` cells covering `world_size`.
    ///
    /// # Panics
    ///
    /// Panics if `chunks` is 0 or the world size is not strictly positive.
    pub fn new(world_size: WorldSize, chunks: usize) -> Self {
        assert!(chunks > 0, "spatial grid needs at least one chunk");
        assert!(
            world_size.x > 0.0 && world_size.y > 0.0,
            "world size must be positive, got {world_size}"
        );
        let chunk_size = world_size / chunks as f32;
        log::debug!("new spatial grid: world {world_size}, {chunks}x{chunks} chunks of {chunk_size}");
        Self {
            world_size,
            chunks,
            chunk_size,
            buckets: vec![Vec::new(); chunks * chunks],
            index: BTreeMap::new(),
            scratch: Vec::new(),
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.world_size, config.chunks)
    }

    pub fn world_size(&self) -> WorldSize {
        self.world_size
    }

    /// Number of chunks along each axis.
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    /// Extent of one chunk in world units.
    pub fn chunk_size(&self) -> WorldSize {
        self.chunk_size
    }

    /// The chunk `handle` is currently filed under, if tracked.
    pub fn chunk_of(&self, handle: K) -> Option<ChunkPos> {
        self.index.get(&handle).copied()
    }

    /// The chunk containing `p`. Positions outside the world are clamped
    /// onto the border chunks.
    pub fn chunk_at(&self, p: WorldPos) -> ChunkPos {
        let last = self.chunks - 1;
        // `as usize` saturates negative values to 0.
        ChunkPos::new(
            ((p.x / self.chunk_size.x) as usize).min(last),
            ((p.y / self.chunk_size.y) as usize).min(last),
        )
    }

    /// Handles filed under chunk `c`.
    ///
    /// # Panics
    ///
    /// Panics if `c` is outside the grid.
    pub fn bucket(&self, c: ChunkPos) -> &[K] {
        &self.buckets[self.bucket_index(c)]
    }

    #[inline]
    fn bucket_index(&self, c: ChunkPos) -> usize {
        assert!(
            c.x < self.chunks && c.y < self.chunks,
            "chunk {c} outside {0}x{0} grid",
            self.chunks
        );
        c.y * self.chunks + c.x
    }

    /// Count the total number of handles across all buckets.
    /// Useful for debugging and diagnostics.
    pub fn total_entries(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Count the number of non-empty chunks.
    pub fn non_empty_chunks(&self) -> usize {
        self.buckets.iter().filter(|b| !b.is_empty()).count()
    }

    /// Stop tracking every handle whose entity is gone. Returns how many
    /// were dropped.
    pub fn prune<T>(&mut self, entities: &SlotMap<K, T>) -> usize {
        let dead: Vec<K> = self
            .index
            .keys()
            .copied()
            .filter(|&h| !entities.contains_key(h))
            .collect();
        for &h in &dead {
            self.remove(h);
        }
        if !dead.is_empty() {
            log::debug!("pruned {} dead handles", dead.len());
        }
        dead.len()
    }

    /// Concatenate the buckets of every chunk in the inclusive range
    /// `min..=max`.
    fn collect_range(&self, min: ChunkPos, max: ChunkPos, out: &mut Vec<K>) {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                out.extend_from_slice(self.bucket(ChunkPos::new(x, y)));
            }
        }
    }

    /// Unordered pairs of live tracked entities whose collision circles
    /// overlap (centre distance strictly below the sum of the radii). Each
    /// pair is reported once, smaller handle first.
    ///
    /// Candidates come from the buckets as of the last
    /// [`update`](PositionalContainer::update). Entities that have since
    /// moved into another chunk can be missed, so call
    /// [`update_all`](PositionalContainer::update_all) first.
    pub fn collisions<T: HasPosition>(&self, entities: &SlotMap<K, T>) -> Vec<(K, K)> {
        let max_radius = self
            .index
            .keys()
            .filter_map(|&h| entities.get(h))
            .map(|e| e.collision_radius())
            .fold(0.0f32, f32::max);

        let mut pairs = Vec::new();
        let mut candidates = Vec::new();
        for &a in self.index.keys() {
            let Some(ea) = entities.get(a) else {
                continue;
            };
            let ra = ea.collision_radius();
            if ra <= 0.0 {
                continue;
            }
            let pa = ea.position();
            let reach = WorldSize::splat(ra + max_radius);

            candidates.clear();
            self.collect_range(self.chunk_at(pa - reach), self.chunk_at(pa + reach), &mut candidates);
            for &b in &candidates {
                if b <= a {
                    continue;
                }
                let Some(eb) = entities.get(b) else {
                    continue;
                };
                let rb = eb.collision_radius();
                if rb <= 0.0 {
                    continue;
                }
                let limit = ra + rb;
                if (eb.position() - pa).length_squared() < limit * limit {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }
}

impl<K: Key> PositionalContainer<K> for SpatialGrid<K> {
    fn add<T: HasPosition>(&mut self, entities: &SlotMap<K, T>, handle: K) -> bool {
        let Some(e) = entities.get(handle) else {
            return false;
        };
        if self.index.contains_key(&handle) {
            log::warn!("spatial grid: {handle:?} is already tracked");
            return false;
        }
        let p = e.position();
        if !in_world(self.world_size, p) {
            return false;
        }
        let c = self.chunk_at(p);
        let i = self.bucket_index(c);
        self.buckets[i].push(handle);
        self.index.insert(handle, c);
        true
    }

    fn update<T: HasPosition>(&mut self, entities: &SlotMap<K, T>, handle: K) {
        let Some(&old) = self.index.get(&handle) else {
            return;
        };
        let Some(e) = entities.get(handle) else {
            log::trace!("spatial grid: dropping dead handle {handle:?}");
            self.remove(handle);
            return;
        };
        let new = self.chunk_at(e.position());
        if new == old {
            return;
        }

        let oi = self.bucket_index(old);
        let bucket = &mut self.buckets[oi];
        if let Some(at) = bucket.iter().position(|&h| h == handle) {
            bucket.swap_remove(at);
        }
        let ni = self.bucket_index(new);
        self.buckets[ni].push(handle);
        self.index.insert(handle, new);
        log::trace!("{handle:?} moved from chunk {old} to {new}");
    }

    fn update_all<T: HasPosition>(&mut self, entities: &SlotMap<K, T>) {
        let mut handles = std::mem::take(&mut self.scratch);
        handles.clear();
        handles.extend(self.index.keys().copied());
        for &h in &handles {
            self.update(entities, h);
        }
        self.scratch = handles;
    }

    fn get_rect<T: HasPosition>(
        &self,
        _entities: &SlotMap<K, T>,
        corner: WorldPos,
        size: WorldSize,
    ) -> Vec<K> {
        let (min, max) = rect_corners(corner, size);
        if !in_world(self.world_size, min) || !in_world(self.world_size, max) {
            return Vec::new();
        }
        let mut out = Vec::new();
        self.collect_range(self.chunk_at(min), self.chunk_at(max), &mut out);
        out
    }

    fn remove(&mut self, handle: K) -> bool {
        let Some(c) = self.index.remove(&handle) else {
            return false;
        };
        let i = self.bucket_index(c);
        self.buckets[i].retain(|&h| h != handle);
        true
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn contains(&self, handle: K) -> bool {
        self.index.contains_key(&handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::within_radius;
    use slotmap::new_key_type;

    new_key_type! { struct UnitId; }

    struct Unit {
        pos: WorldPos,
        radius: f32,
    }

    impl HasPosition for Unit {
        fn position(&self) -> WorldPos {
            self.pos
        }

        fn collision_radius(&self) -> f32 {
            self.radius
        }
    }

    fn unit(x: f32, y: f32) -> Unit {
        Unit {
            pos: WorldPos::new(x, y),
            radius: 0.0,
        }
    }

    fn setup() -> (SlotMap<UnitId, Unit>, SpatialGrid<UnitId>) {
        (
            SlotMap::with_key(),
            SpatialGrid::new(WorldSize::new(100.0, 100.0), 10),
        )
    }

    #[test]
    fn geometry() {
        let (_, grid) = setup();
        assert_eq!(grid.chunk_size(), WorldSize::new(10.0, 10.0));
        assert_eq!(grid.chunk_at(WorldPos::new(0.0, 0.0)), ChunkPos::new(0, 0));
        assert_eq!(grid.chunk_at(WorldPos::new(19.9, 35.0)), ChunkPos::new(1, 3));
        assert_eq!(grid.chunk_at(WorldPos::new(-5.0, 250.0)), ChunkPos::new(0, 9));
    }

    #[test]
    fn add_rejects_out_of_world() {
        let (mut sm, mut grid) = setup();
        for (x, y) in [(-0.1, 5.0), (5.0, -0.1), (100.0, 5.0), (5.0, 100.0)] {
            let h = sm.insert(unit(x, y));
            assert!(!grid.add(&sm, h), "({x}, {y})");
        }
        assert!(grid.is_empty());
        assert_eq!(grid.total_entries(), 0);

        let h = sm.insert(unit(99.9, 0.0));
        assert!(grid.add(&sm, h));
        assert_eq!(grid.chunk_of(h), Some(ChunkPos::new(9, 0)));
    }

    #[test]
    fn add_rejects_dead_and_duplicate() {
        let (mut sm, mut grid) = setup();
        let h = sm.insert(unit(5.0, 5.0));
        assert!(grid.add(&sm, h));
        assert!(!grid.add(&sm, h));
        assert_eq!(grid.total_entries(), 1);

        let dead = sm.insert(unit(5.0, 5.0));
        sm.remove(dead);
        assert!(!grid.add(&sm, dead));
    }

    #[test]
    fn get_after_add() {
        let (mut sm, mut grid) = setup();
        let h = sm.insert(unit(42.0, 17.0));
        assert!(grid.add(&sm, h));
        let found = grid.get(&sm, WorldPos::new(42.0, 17.0), 1.0);
        assert_eq!(found, vec![h]);
    }

    #[test]
    fn update_moves_between_buckets() {
        let (mut sm, mut grid) = setup();
        let h = sm.insert(unit(15.0, 15.0));
        let other = sm.insert(unit(15.0, 15.0));
        grid.add(&sm, h);
        grid.add(&sm, other);

        let old = WorldPos::new(15.0, 15.0);
        let new = WorldPos::new(75.0, 55.0);
        sm[h].pos = new;
        grid.update(&sm, h);

        assert_eq!(grid.chunk_of(h), Some(ChunkPos::new(7, 5)));
        let near_old = grid.get(&sm, old, 2.0);
        assert!(!near_old.contains(&h));
        // Removal is by handle, not by position.
        assert!(near_old.contains(&other));
        assert_eq!(grid.get(&sm, new, 2.0), vec![h]);
        assert_eq!(grid.total_entries(), 2);
        assert_eq!(grid.non_empty_chunks(), 2);
    }

    #[test]
    fn update_within_chunk_is_noop() {
        let (mut sm, mut grid) = setup();
        let h = sm.insert(unit(11.0, 11.0));
        grid.add(&sm, h);
        sm[h].pos = WorldPos::new(19.0, 12.0);
        grid.update(&sm, h);
        assert_eq!(grid.chunk_of(h), Some(ChunkPos::new(1, 1)));
        assert_eq!(grid.bucket(ChunkPos::new(1, 1)), &[h]);
    }

    #[test]
    fn update_all_resyncs_and_drops_dead() {
        let (mut sm, mut grid) = setup();
        let hs: Vec<UnitId> = (0..5).map(|i| sm.insert(unit(5.0 + i as f32, 5.0))).collect();
        for &h in &hs {
            assert!(grid.add(&sm, h));
        }
        for &h in &hs {
            sm[h].pos.x += 50.0;
        }
        sm.remove(hs[0]);
        grid.update_all(&sm);

        assert_eq!(grid.len(), 4);
        assert!(!grid.contains(hs[0]));
        assert_eq!(grid.total_entries(), 4);
        for &h in &hs[1..] {
            assert_eq!(grid.chunk_of(h), Some(ChunkPos::new(5, 0)));
        }
        assert!(grid.bucket(ChunkPos::new(0, 0)).is_empty());
    }

    #[test]
    fn query_rejected_outside_world() {
        let (mut sm, mut grid) = setup();
        let h = sm.insert(unit(1.0, 1.0));
        grid.add(&sm, h);
        assert!(grid.get(&sm, WorldPos::new(1.0, 1.0), 2.0).is_empty());
        assert!(
            grid.get_rect(&sm, WorldPos::new(90.0, 90.0), WorldSize::new(10.0, 1.0))
                .is_empty()
        );
        assert_eq!(
            grid.get_rect(&sm, WorldPos::new(0.0, 0.0), WorldSize::new(5.0, 5.0)),
            vec![h]
        );
    }

    #[test]
    fn query_returns_dead_handles_until_resolved() {
        let (mut sm, mut grid) = setup();
        let a = sm.insert(unit(50.0, 50.0));
        let b = sm.insert(unit(51.0, 50.0));
        grid.add(&sm, a);
        grid.add(&sm, b);
        sm.remove(a);

        let raw = grid.get(&sm, WorldPos::new(50.0, 50.0), 3.0);
        assert_eq!(raw.len(), 2);
        assert_eq!(within_radius(&sm, &raw, WorldPos::new(50.0, 50.0), 3.0), vec![b]);

        assert_eq!(grid.prune(&sm), 1);
        assert_eq!(grid.get(&sm, WorldPos::new(50.0, 50.0), 3.0), vec![b]);
    }

    #[test]
    fn reused_slot_keeps_dead_handle_indexed() {
        let (mut sm, mut grid) = setup();
        let a = sm.insert(unit(5.0, 5.0));
        assert!(grid.add(&sm, a));
        sm.remove(a);
        // The arena hands a's slot to b with a bumped version.
        let b = sm.insert(unit(6.0, 6.0));
        assert_ne!(a, b);
        assert!(grid.add(&sm, b));
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.total_entries(), 2);

        grid.update_all(&sm);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.total_entries(), grid.len());
        assert!(!grid.contains(a));
        assert_eq!(grid.bucket(ChunkPos::new(0, 0)), &[b]);
    }

    #[test]
    fn prune_after_slot_reuse() {
        let (mut sm, mut grid) = setup();
        let a = sm.insert(unit(5.0, 5.0));
        grid.add(&sm, a);
        sm.remove(a);
        let b = sm.insert(unit(55.0, 55.0));
        grid.add(&sm, b);

        assert_eq!(grid.prune(&sm), 1);
        assert_eq!(grid.total_entries(), 1);
        assert!(grid.bucket(ChunkPos::new(0, 0)).is_empty());
        assert_eq!(grid.chunk_of(b), Some(ChunkPos::new(5, 5)));
    }

    #[test]
    fn from_config_uses_config() {
        let grid: SpatialGrid<UnitId> = SpatialGrid::from_config(&GridConfig::default());
        assert_eq!(grid.chunks(), 10);
        assert_eq!(grid.world_size(), WorldSize::new(400.0, 300.0));
        assert_eq!(grid.chunk_size(), WorldSize::new(40.0, 30.0));
    }

    #[test]
    fn remove_untracks() {
        let (mut sm, mut grid) = setup();
        let h = sm.insert(unit(3.0, 3.0));
        grid.add(&sm, h);
        assert!(grid.remove(h));
        assert!(!grid.remove(h));
        assert!(grid.is_empty());
        assert_eq!(grid.chunk_of(h), None);
        // Updating an untracked handle does nothing.
        grid.update(&sm, h);
        assert_eq!(grid.total_entries(), 0);
    }

    #[test]
    fn collisions_across_chunk_border() {
        let (mut sm, mut grid) = setup();
        let a = sm.insert(Unit {
            pos: WorldPos::new(19.5, 5.0),
            radius: 1.0,
        });
        let b = sm.insert(Unit {
            pos: WorldPos::new(20.5, 5.0),
            radius: 1.0,
        });
        let far = sm.insert(Unit {
            pos: WorldPos::new(60.0, 60.0),
            radius: 1.0,
        });
        let point = sm.insert(unit(19.8, 5.0));
        for h in [a, b, far, point] {
            assert!(grid.add(&sm, h));
        }
        let pairs = grid.collisions(&sm);
        assert_eq!(pairs, vec![(a.min(b), a.max(b))]);
    }

    #[test]
    fn collisions_see_moves_after_update_all() {
        let (mut sm, mut grid) = setup();
        let a = sm.insert(Unit {
            pos: WorldPos::new(5.0, 5.0),
            radius: 1.0,
        });
        let b = sm.insert(Unit {
            pos: WorldPos::new(85.0, 85.0),
            radius: 1.0,
        });
        grid.add(&sm, a);
        grid.add(&sm, b);
        assert!(grid.collisions(&sm).is_empty());

        sm[b].pos = WorldPos::new(6.0, 5.0);
        grid.update_all(&sm);
        assert_eq!(grid.collisions(&sm), vec![(a.min(b), a.max(b))]);
    }
}
