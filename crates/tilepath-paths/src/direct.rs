use tilepath_core::WorldPos;

use crate::Path;
use crate::frontier::endpoints;
use crate::traits::TileSpace;

/// The no-think baseline: a single waypoint straight to the goal,
/// ignoring terrain entirely.
#[derive(Debug, Default, Clone)]
pub struct DirectPath;

impl DirectPath {
    pub fn new() -> Self {
        Self
    }

    /// `[end]` if both endpoints are on valid, distinct tiles; empty
    /// otherwise. The waypoint is `end` itself, not its tile centre.
    pub fn calculate_path<M: TileSpace>(&mut self, map: &M, start: WorldPos, end: WorldPos) -> Path {
        match endpoints(map, start, end) {
            Some(_) => vec![end],
            None => Vec::new(),
        }
    }
}
