//! The positional container contract shared by [`SpatialGrid`](crate::SpatialGrid)
//! and [`BruteForceContainer`](crate::BruteForceContainer).
//!
//! Containers never own entities. They store copyable [`slotmap`] handles
//! and read live positions from the arena passed to each call. A handle
//! returned by a query may refer to an entity that has since been removed
//! from the arena; consumers resolve it with [`resolve`] or
//! [`within_radius`] and treat a dead handle as absent.

use slotmap::{Key, SlotMap};
use tilepath_core::{WorldPos, WorldSize};

/// Anything with a position in world space.
pub trait HasPosition {
    fn position(&self) -> WorldPos;

    /// Radius used by collision queries. Zero means the entity is a point
    /// and never collides.
    fn collision_radius(&self) -> f32 {
        0.0
    }
}

/// A set of tracked entity handles answering proximity queries.
///
/// Handles are tracked from a successful [`add`](Self::add) until
/// [`remove`](Self::remove), or until an update notices the entity is gone.
pub trait PositionalContainer<K: Key> {
    /// Start tracking `handle`.
    ///
    /// Returns `false` without tracking it if the entity is dead, already
    /// tracked, or positioned outside `[0, world_size)` on either axis.
    fn add<T: HasPosition>(&mut self, entities: &SlotMap<K, T>, handle: K) -> bool;

    /// Resynchronize one tracked handle with its entity's live position.
    /// Untracked handles are ignored; dead ones are dropped.
    fn update<T: HasPosition>(&mut self, entities: &SlotMap<K, T>, handle: K);

    /// [`update`](Self::update) every tracked handle.
    fn update_all<T: HasPosition>(&mut self, entities: &SlotMap<K, T>);

    /// Handles possibly inside the circle at `center`.
    ///
    /// The result covers at least every tracked entity inside the circle's
    /// bounding box, and is empty if a corner of that box lies outside the
    /// world.
    fn get<T: HasPosition>(
        &self,
        entities: &SlotMap<K, T>,
        center: WorldPos,
        radius: f32,
    ) -> Vec<K> {
        let r = WorldSize::splat(radius.abs());
        self.get_rect(entities, center - r, r * 2.0)
    }

    /// Handles possibly inside the rectangle spanned by `corner` and
    /// `corner + size`, both edges included. Empty if a corner lies outside
    /// the world.
    fn get_rect<T: HasPosition>(
        &self,
        entities: &SlotMap<K, T>,
        corner: WorldPos,
        size: WorldSize,
    ) -> Vec<K>;

    /// Stop tracking `handle`. Returns whether it was tracked.
    fn remove(&mut self, handle: K) -> bool;

    /// Number of tracked handles.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, handle: K) -> bool;
}

/// Pair each live handle with its entity, skipping dead ones.
pub fn resolve<'a, K: Key, T>(
    entities: &'a SlotMap<K, T>,
    handles: &'a [K],
) -> impl Iterator<Item = (K, &'a T)> + 'a {
    handles
        .iter()
        .filter_map(move |&h| entities.get(h).map(|e| (h, e)))
}

/// Exact circular post-filter: the live handles among `handles` whose
/// entity lies within `radius` of `center` (boundary included).
pub fn within_radius<K: Key, T: HasPosition>(
    entities: &SlotMap<K, T>,
    handles: &[K],
    center: WorldPos,
    radius: f32,
) -> Vec<K> {
    let r_squared = radius * radius;
    resolve(entities, handles)
        .filter(|(_, e)| (e.position() - center).length_squared() <= r_squared)
        .map(|(h, _)| h)
        .collect()
}

/// Normalized `(min, max)` corners of the box spanned by `corner` and
/// `corner + size`.
pub(crate) fn rect_corners(corner: WorldPos, size: WorldSize) -> (WorldPos, WorldPos) {
    let far = corner + size;
    (
        WorldPos::new(corner.x.min(far.x), corner.y.min(far.y)),
        WorldPos::new(corner.x.max(far.x), corner.y.max(far.y)),
    )
}

/// Whether `p` lies in `[0, world_size)` on both axes.
#[inline]
pub(crate) fn in_world(world_size: WorldSize, p: WorldPos) -> bool {
    p.x >= 0.0 && p.y >= 0.0 && p.x < world_size.x && p.y < world_size.y
}
