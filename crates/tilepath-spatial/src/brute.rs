//! [`BruteForceContainer`]: the linear-scan reference for
//! [`SpatialGrid`](crate::SpatialGrid).
//!
//! It shares the grid's world bounds and query rejection rules but keeps a
//! flat list of handles and filters on live positions, which makes it both a
//! differential-test oracle and a reasonable backend for a handful of
//! entities.

use slotmap::{Key, SlotMap};
use tilepath_core::{WorldPos, WorldSize};

use crate::container::{HasPosition, PositionalContainer, in_world, rect_corners};

pub struct BruteForceContainer<K: Key> {
    world_size: WorldSize,
    handles: Vec<K>,
}

impl<K: Key> BruteForceContainer<K> {
    pub fn new(world_size: WorldSize) -> Self {
        Self {
            world_size,
            handles: Vec::new(),
        }
    }

    pub fn world_size(&self) -> WorldSize {
        self.world_size
    }
}

impl<K: Key> PositionalContainer<K> for BruteForceContainer<K> {
    fn add<T: HasPosition>(&mut self, entities: &SlotMap<K, T>, handle: K) -> bool {
        let Some(e) = entities.get(handle) else {
            return false;
        };
        if self.contains(handle) || !in_world(self.world_size, e.position()) {
            return false;
        }
        self.handles.push(handle);
        true
    }

    /// Positions are read at query time, so only liveness needs syncing.
    fn update<T: HasPosition>(&mut self, entities: &SlotMap<K, T>, handle: K) {
        if !entities.contains_key(handle) {
            self.remove(handle);
        }
    }

    fn update_all<T: HasPosition>(&mut self, entities: &SlotMap<K, T>) {
        let before = self.handles.len();
        self.handles.retain(|&h| entities.contains_key(h));
        let dropped = before - self.handles.len();
        if dropped > 0 {
            log::debug!("brute-force container: dropped {dropped} dead handles");
        }
    }

    fn get_rect<T: HasPosition>(
        &self,
        entities: &SlotMap<K, T>,
        corner: WorldPos,
        size: WorldSize,
    ) -> Vec<K> {
        let (min, max) = rect_corners(corner, size);
        if !in_world(self.world_size, min) || !in_world(self.world_size, max) {
            return Vec::new();
        }
        self.handles
            .iter()
            .copied()
            .filter(|&h| {
                entities.get(h).is_some_and(|e| {
                    let p = e.position();
                    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
                })
            })
            .collect()
    }

    fn remove(&mut self, handle: K) -> bool {
        let before = self.handles.len();
        self.handles.retain(|&h| h != handle);
        self.handles.len() != before
    }

    fn len(&self) -> usize {
        self.handles.len()
    }

    fn contains(&self, handle: K) -> bool {
        self.handles.contains(&handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::new_key_type;

    new_key_type! { struct Id; }

    struct Dot(WorldPos);

    impl HasPosition for Dot {
        fn position(&self) -> WorldPos {
            self.0
        }
    }

    #[test]
    fn same_add_contract_as_grid() {
        let mut sm: SlotMap<Id, Dot> = SlotMap::with_key();
        let mut c = BruteForceContainer::new(WorldSize::new(50.0, 50.0));
        let inside = sm.insert(Dot(WorldPos::new(10.0, 49.0)));
        let outside = sm.insert(Dot(WorldPos::new(50.0, 10.0)));
        assert!(c.add(&sm, inside));
        assert!(!c.add(&sm, inside));
        assert!(!c.add(&sm, outside));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn get_reads_live_positions() {
        let mut sm: SlotMap<Id, Dot> = SlotMap::with_key();
        let mut c = BruteForceContainer::new(WorldSize::new(50.0, 50.0));
        let h = sm.insert(Dot(WorldPos::new(10.0, 10.0)));
        c.add(&sm, h);
        assert_eq!(c.get(&sm, WorldPos::new(10.0, 10.0), 1.0), vec![h]);

        sm[h].0 = WorldPos::new(30.0, 30.0);
        assert!(c.get(&sm, WorldPos::new(10.0, 10.0), 1.0).is_empty());
        assert_eq!(c.get(&sm, WorldPos::new(30.0, 30.0), 1.0), vec![h]);
        assert!(c.get(&sm, WorldPos::new(0.5, 30.0), 1.0).is_empty());
    }

    #[test]
    fn update_all_drops_dead() {
        let mut sm: SlotMap<Id, Dot> = SlotMap::with_key();
        let mut c = BruteForceContainer::new(WorldSize::new(50.0, 50.0));
        let a = sm.insert(Dot(WorldPos::new(1.0, 1.0)));
        let b = sm.insert(Dot(WorldPos::new(2.0, 2.0)));
        c.add(&sm, a);
        c.add(&sm, b);
        sm.remove(a);
        c.update_all(&sm);
        assert!(!c.contains(a));
        assert!(c.contains(b));
        assert!(c.remove(b));
        assert!(c.is_empty());
    }
}
