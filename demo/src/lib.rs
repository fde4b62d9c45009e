//! Shared simulation model for the headless demo.
//!
//! Demonstrates: procedural map authoring, runtime-selectable path finding,
//! agents following waypoints at terrain-dependent speed, and proximity
//! queries through the chunked spatial grid while agents come and go.

use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use slotmap::{SlotMap, new_key_type};
use tilepath_core::{TilePos, WorldPos};
use tilepath_map::{FourDirectionWalker, MapConfig, MapGen, TileMap, TileTable, TileType};
use tilepath_paths::{PathAlgorithm, create, path_cost};
use tilepath_spatial::{GridConfig, HasPosition, PositionalContainer, SpatialGrid, within_radius};

/// Agent speed on a cost-1 tile, in world units per second.
pub const AGENT_SPEED: f32 = 40.0;
/// Distance at which a waypoint counts as reached.
pub const ARRIVE_DISTANCE: f32 = 1.0;
/// Radius of the per-agent neighbourhood query.
pub const NEIGHBOR_RADIUS: f32 = 15.0;
pub const AGENT_RADIUS: f32 = 3.0;

new_key_type! { pub struct AgentId; }

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Agent {
    pub pos: WorldPos,
    waypoints: VecDeque<WorldPos>,
}

impl Agent {
    pub fn new(pos: WorldPos) -> Self {
        Self {
            pos,
            waypoints: VecDeque::new(),
        }
    }

    /// Replace the current route.
    pub fn follow(&mut self, path: Vec<WorldPos>) {
        self.waypoints = path.into();
    }

    pub fn is_idle(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints_left(&self) -> usize {
        self.waypoints.len()
    }

    /// The waypoint to head for, dropping every waypoint already reached.
    pub fn move_target(&mut self) -> Option<WorldPos> {
        while let Some(&w) = self.waypoints.front() {
            if self.pos.distance(w) >= ARRIVE_DISTANCE {
                return Some(w);
            }
            self.waypoints.pop_front();
        }
        None
    }
}

impl HasPosition for Agent {
    fn position(&self) -> WorldPos {
        self.pos
    }

    fn collision_radius(&self) -> f32 {
        AGENT_RADIUS
    }
}

// ---------------------------------------------------------------------------
// Map authoring
// ---------------------------------------------------------------------------

/// Author the demo map: a lake, a diagonal road, a mud field and a wandering
/// strip of woods.
pub fn build_map(config: &MapConfig, seed: u64) -> TileMap {
    let mut map = TileMap::from_config(config, TileTable::default());
    let (w, h) = (map.width(), map.height());

    map.paint_circle(TilePos::new(w / 3, h / 2), (h / 5).max(1) as u32, TileType::Water);
    map.paint_line(
        TilePos::new(0, h / 4),
        TilePos::new(w - 1, 3 * h / 4),
        2.0,
        TileType::Road,
    );
    map.paint_rectangle(
        TilePos::new(2 * w / 3, 1),
        TilePos::new(w - 2, h / 3),
        TileType::Mud,
    );

    let mut mg = MapGen::with_map(map, StdRng::seed_from_u64(seed));
    let steps = (w.max(0) as usize) * (h.max(0) as usize) / 4;
    mg.random_walk(
        &FourDirectionWalker,
        TilePos::new(w / 2, h / 5),
        steps,
        TileType::Wood,
    );
    let map = mg.into_map();

    for ty in TileType::ALL {
        log::debug!("{ty}: {} tiles", map.count(ty));
    }
    map
}

/// Centre of a uniformly chosen tile.
fn random_tile_center(map: &TileMap, rng: &mut StdRng) -> WorldPos {
    let p = TilePos::new(
        rng.random_range(0..map.width()),
        rng.random_range(0..map.height()),
    );
    map.tile_to_world(p)
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Parameters of a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub map: MapConfig,
    /// Spatial grid chunks per axis.
    pub chunks: usize,
    /// Population the world keeps topping up to.
    pub agents: usize,
    pub seed: u64,
    pub algorithm: PathAlgorithm,
    /// Per-tick probability that an agent is despawned.
    pub despawn_chance: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            chunks: 10,
            agents: 50,
            seed: 42,
            algorithm: PathAlgorithm::default(),
            despawn_chance: 0.01,
        }
    }
}

/// What happened during one [`World::tick`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Agents that moved.
    pub moving: usize,
    /// Agents that reached the end of their route.
    pub arrived: usize,
    /// Idle agents that were given a new route.
    pub replanned: usize,
    /// Idle agents whose new goal produced no path.
    pub unroutable: usize,
    pub spawned: usize,
    pub despawned: usize,
    /// Sum over agents of the other live agents within [`NEIGHBOR_RADIUS`].
    pub neighbors: usize,
    /// Overlapping agent pairs.
    pub collisions: usize,
}

pub struct World {
    pub map: TileMap,
    pub agents: SlotMap<AgentId, Agent>,
    pub grid: SpatialGrid<AgentId>,
    algorithm: PathAlgorithm,
    population: usize,
    despawn_chance: f64,
    rng: StdRng,
}

impl World {
    pub fn new(config: &SimConfig) -> Self {
        let map = build_map(&config.map, config.seed);
        let grid = SpatialGrid::from_config(&GridConfig {
            world_size: map.world_size(),
            chunks: config.chunks,
        });
        let mut world = World {
            map,
            agents: SlotMap::with_key(),
            grid,
            algorithm: config.algorithm,
            population: config.agents,
            despawn_chance: config.despawn_chance,
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(1)),
        };
        for _ in 0..config.agents {
            world.spawn();
        }
        log::info!(
            "world ready: {}x{} tiles, {} agents, {}",
            world.map.width(),
            world.map.height(),
            world.agents.len(),
            world.algorithm
        );
        world
    }

    pub fn algorithm(&self) -> PathAlgorithm {
        self.algorithm
    }

    /// Switch strategy. Takes effect for every route planned afterwards.
    pub fn set_algorithm(&mut self, algorithm: PathAlgorithm) {
        log::info!("path algorithm: {} -> {algorithm}", self.algorithm);
        self.algorithm = algorithm;
    }

    /// Spawn an idle agent on a random tile and start tracking it.
    pub fn spawn(&mut self) -> Option<AgentId> {
        let pos = random_tile_center(&self.map, &mut self.rng);
        let id = self.agents.insert(Agent::new(pos));
        if !self.grid.add(&self.agents, id) {
            self.agents.remove(id);
            return None;
        }
        Some(id)
    }

    /// Route agent `id` to `goal`. Returns whether a path was found.
    pub fn order(&mut self, id: AgentId, goal: WorldPos) -> bool {
        let Some(agent) = self.agents.get_mut(id) else {
            return false;
        };
        let mut finder = create(self.algorithm, &self.map);
        let path = finder.calculate_path(agent.pos, goal);
        let found = !path.is_empty();
        agent.follow(path);
        found
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Agents are despawned straight from the arena, so the grid holds dead
    /// handles until the resynchronization further down drops them.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let mut report = TickReport::default();

        let doomed: Vec<AgentId> = self
            .agents
            .keys()
            .filter(|_| self.rng.random::<f64>() < self.despawn_chance)
            .collect();
        for id in doomed {
            self.agents.remove(id);
            report.despawned += 1;
        }

        let mut finder = create(self.algorithm, &self.map);
        for (_, agent) in self.agents.iter_mut() {
            if !agent.is_idle() {
                continue;
            }
            let goal = random_tile_center(&self.map, &mut self.rng);
            let path = finder.calculate_path(agent.pos, goal);
            if path.is_empty() {
                report.unroutable += 1;
            } else {
                report.replanned += 1;
            }
            agent.follow(path);
        }

        for (_, agent) in self.agents.iter_mut() {
            let Some(target) = agent.move_target() else {
                continue;
            };
            let tile = self.map.world_to_tile(agent.pos);
            let coeff = if self.map.is_tile_pos_valid(tile) {
                self.map.velocity_coeff(agent.pos)
            } else {
                1.0
            };
            let to_target = target - agent.pos;
            let step = AGENT_SPEED * coeff * dt;
            if step >= to_target.length() {
                agent.pos = target;
            } else {
                agent.pos += to_target.normalized() * step;
            }
            report.moving += 1;
            if agent.move_target().is_none() {
                report.arrived += 1;
            }
        }

        self.grid.update_all(&self.agents);

        while self.agents.len() < self.population {
            if self.spawn().is_none() {
                break;
            }
            report.spawned += 1;
        }

        for (id, agent) in &self.agents {
            let candidates = self.grid.get(&self.agents, agent.pos, NEIGHBOR_RADIUS);
            report.neighbors += within_radius(&self.agents, &candidates, agent.pos, NEIGHBOR_RADIUS)
                .into_iter()
                .filter(|&other| other != id)
                .count();
        }
        report.collisions = self.grid.collisions(&self.agents).len();

        log::trace!("{report:?}");
        report
    }
}

// ---------------------------------------------------------------------------
// Algorithm comparison
// ---------------------------------------------------------------------------

/// Aggregate results of one algorithm over a batch of routes.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmSummary {
    pub algorithm: PathAlgorithm,
    /// Requests that produced a path.
    pub routes: usize,
    pub waypoints: usize,
    pub cost: f32,
    pub visited: usize,
    pub elapsed: Duration,
}

/// Run every algorithm over the same `samples` random start/goal pairs.
pub fn compare_algorithms(map: &TileMap, rng: &mut StdRng, samples: usize) -> Vec<AlgorithmSummary> {
    let pairs: Vec<(WorldPos, WorldPos)> = (0..samples)
        .map(|_| (random_tile_center(map, rng), random_tile_center(map, rng)))
        .collect();

    PathAlgorithm::ALL
        .into_iter()
        .map(|algorithm| {
            let mut finder = create(algorithm, map);
            let mut summary = AlgorithmSummary {
                algorithm,
                routes: 0,
                waypoints: 0,
                cost: 0.0,
                visited: 0,
                elapsed: Duration::ZERO,
            };
            for &(start, goal) in &pairs {
                let path = finder.calculate_path(start, goal);
                let stats = finder.last_stats();
                summary.visited += stats.visited;
                summary.elapsed += stats.elapsed;
                if path.is_empty() {
                    continue;
                }
                summary.routes += 1;
                summary.waypoints += path.len();
                summary.cost += path_cost(map, start, &path);
            }
            summary
        })
        .collect()
}
