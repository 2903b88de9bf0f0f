//! Wildlife Simulation Driver
//! Seeds a map with herds and runs the simulation, with a wandering
//! observer provoking detections, hunts, and flights

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use wildtrack::context::{CarcassLog, ObserverContext};
use wildtrack::core::config::SimulationConfig;
use wildtrack::core::error::Result;
use wildtrack::core::types::TileCoord;
use wildtrack::grid::{GridMap, TileMap};
use wildtrack::populate::{populate, PopulatorConfig};
use wildtrack::registry::RegistryEvent;

/// Wildlife sim - herds living on a grid under observation
#[derive(Parser, Debug)]
#[command(name = "wildlife_sim")]
#[command(about = "Run the wildlife herd simulation")]
struct Args {
    /// Random seed for reproducible runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Simulated days to run
    #[arg(long, default_value_t = 3)]
    days: u32,

    /// Number of herds to place
    #[arg(long, default_value_t = 8)]
    herds: usize,

    /// Map width in tiles
    #[arg(long, default_value_t = 40)]
    width: i32,

    /// Map height in tiles
    #[arg(long, default_value_t = 40)]
    height: i32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wildtrack=info".into()),
        )
        .init();

    let args = Args::parse();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut map = GridMap::new(args.width, args.height);
    // Scatter some impassable terrain
    for _ in 0..(args.width * args.height / 20) {
        map.block(TileCoord::new(
            rng.gen_range(0..args.width),
            rng.gen_range(0..args.height),
        ));
    }
    tracing::info!(
        width = args.width,
        height = args.height,
        blocked = map.blocked_count(),
        "map ready"
    );

    let pop_cfg = PopulatorConfig {
        herd_count: args.herds,
        ..Default::default()
    };
    let mut registry = populate(&map, &pop_cfg, &mut rng)?;
    let cfg = SimulationConfig::default();
    cfg.validate().map_err(wildtrack::core::WildError::InvalidConfig)?;
    let mut env = CarcassLog::default();

    println!("=== WILDLIFE SIM ===");
    println!("{}", registry.population_report());

    let mut observer = ObserverContext::at(TileCoord::new(args.width / 2, args.height / 2));
    let step_min = 15.0;
    let steps = args.days * 24 * 4;

    for step in 0..steps {
        // The observer drifts one tile at random every hour
        if step % 4 == 0 {
            let neighbors = observer.position.neighbors();
            let next = neighbors[rng.gen_range(0..neighbors.len())];
            if map.is_passable(next) {
                observer.position = next;
            }
        }

        let events = registry.update(step_min, &observer, &map, &cfg, &mut env, &mut rng);
        let day = step / (24 * 4) + 1;
        let minute = (step % (24 * 4)) * 15;
        for event in events {
            match event {
                RegistryEvent::EncounterRequested { herd, animal } => {
                    if let (Some(h), Some(owner)) =
                        (registry.herd(herd), registry.herd_of_animal(animal))
                    {
                        let name = owner
                            .members()
                            .iter()
                            .find(|a| a.id == animal)
                            .map(|a| a.name.clone())
                            .unwrap_or_default();
                        println!(
                            "[day {day} {:02}:{:02}] {} closes in, {} leading the charge!",
                            minute / 60,
                            minute % 60,
                            h.description(),
                            name
                        );
                    }
                }
                RegistryEvent::Note(text) => {
                    println!("[day {day} {:02}:{:02}] {text}", minute / 60, minute % 60);
                }
                RegistryEvent::PreyKilled { tile, .. } => {
                    println!(
                        "[day {day} {:02}:{:02}] Something was killed at ({}, {}).",
                        minute / 60,
                        minute % 60,
                        tile.x,
                        tile.y
                    );
                }
                RegistryEvent::HerdDisbanded(_) => {
                    println!(
                        "[day {day} {:02}:{:02}] A herd's trail goes cold for good.",
                        minute / 60,
                        minute % 60
                    );
                }
            }
        }

        if let Some(line) = registry.activity_description(observer.position) {
            tracing::debug!("{line}");
        }
    }

    println!("\n=== AFTER {} DAYS ===", args.days);
    println!("{}", registry.population_report());
    println!("Carcasses left on the ground: {}", env.carcasses.len());
    Ok(())
}
