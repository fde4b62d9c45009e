//! Headless simulation: agents wander a procedurally authored map, routing
//! with the selected path finder and querying their neighbourhood through
//! the spatial grid every tick.
//!
//! Run: cargo run --bin tilepath-demo -- --algorithm gbfs --agents 200
//! Logging is controlled by `RUST_LOG` (e.g. `RUST_LOG=debug`).

use std::error::Error;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tilepath_demo::{SimConfig, TickReport, World, compare_algorithms};
use tilepath_map::{DEFAULT_TILE_SIZE, MapConfig, TileType};
use tilepath_paths::PathAlgorithm;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tilepath-demo", about = "Grid-world path finding and spatial query demo")]
struct Args {
    /// Path finding strategy: direct, bfs, dijkstra, gbfs (or 1-4).
    #[arg(short, long, default_value = "dijkstra")]
    algorithm: PathAlgorithm,

    /// Population kept alive in the world.
    #[arg(short = 'n', long, default_value_t = 50)]
    agents: usize,

    /// Number of simulation ticks.
    #[arg(short, long, default_value_t = 200)]
    ticks: u32,

    /// Seconds per tick.
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Spatial grid chunks per axis.
    #[arg(short, long, default_value_t = 10)]
    chunks: usize,

    /// Map width in tiles.
    #[arg(long, default_value_t = 40)]
    width: i32,

    /// Map height in tiles.
    #[arg(long, default_value_t = 30)]
    height: i32,

    /// Per-tick probability that an agent is despawned.
    #[arg(long, default_value_t = 0.01)]
    despawn_chance: f64,

    /// Switch to the next algorithm every this many ticks (0 = never).
    #[arg(long, default_value_t = 0)]
    cycle_every: u32,

    /// Also compare all algorithms on this many random routes.
    #[arg(long, default_value_t = 0)]
    compare: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if args.width <= 0 || args.height <= 0 {
        return Err(format!("map must be at least 1x1, got {}x{}", args.width, args.height).into());
    }
    if args.chunks == 0 {
        return Err("chunks must be at least 1".into());
    }

    let config = SimConfig {
        map: MapConfig {
            width: args.width,
            height: args.height,
            tile_size: DEFAULT_TILE_SIZE,
            fill: TileType::Grass,
        },
        chunks: args.chunks,
        agents: args.agents,
        seed: args.seed,
        algorithm: args.algorithm,
        despawn_chance: args.despawn_chance,
    };
    let mut world = World::new(&config);

    let mut totals = TickReport::default();
    for tick in 1..=args.ticks {
        if args.cycle_every > 0 && tick % args.cycle_every == 0 {
            let next = world.algorithm().next();
            world.set_algorithm(next);
        }
        let r = world.tick(args.dt);
        totals.moving += r.moving;
        totals.arrived += r.arrived;
        totals.replanned += r.replanned;
        totals.unroutable += r.unroutable;
        totals.spawned += r.spawned;
        totals.despawned += r.despawned;
        totals.neighbors += r.neighbors;
        totals.collisions += r.collisions;
        if tick % 50 == 0 {
            log::info!(
                "tick {tick}: {} agents, {} arrived, {} collisions",
                world.agents.len(),
                r.arrived,
                r.collisions
            );
        }
    }

    println!("{} ticks with {}", args.ticks, world.algorithm());
    println!("  routes planned:   {}", totals.replanned);
    println!("  unroutable:       {}", totals.unroutable);
    println!("  arrivals:         {}", totals.arrived);
    println!("  spawned/despawned {}/{}", totals.spawned, totals.despawned);
    println!("  neighbour hits:   {}", totals.neighbors);
    println!("  collisions:       {}", totals.collisions);
    println!(
        "  grid: {} tracked in {} of {} chunks",
        world.grid.total_entries(),
        world.grid.non_empty_chunks(),
        args.chunks * args.chunks
    );

    if args.compare > 0 {
        let mut rng = StdRng::seed_from_u64(args.seed);
        println!();
        println!(
            "{:<26} {:>7} {:>9} {:>10} {:>9} {:>12}",
            "algorithm", "routes", "waypoints", "cost", "visited", "time"
        );
        for s in compare_algorithms(&world.map, &mut rng, args.compare) {
            println!(
                "{:<26} {:>7} {:>9} {:>10.1} {:>9} {:>12}",
                s.algorithm.name(),
                s.routes,
                s.waypoints,
                s.cost,
                s.visited,
                format!("{:?}", s.elapsed)
            );
        }
    }

    Ok(())
}
