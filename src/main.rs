//! Formicary - headless colony runner
//!
//! Loads a scenario (or the built-in meadow), runs a fixed number of steps
//! with a seeded generator and prints the final colony state.

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use formicary::core::config::SimulationConfig;
use formicary::core::error::Result;
use formicary::simulation::{ColonySnapshot, Scenario, SimulationEvent};

/// Run an ant colony simulation without a frontend
#[derive(Parser, Debug)]
#[command(name = "formicary")]
#[command(about = "Run an ant colony economy simulation headless")]
struct Args {
    /// Number of steps to run
    #[arg(long, default_value_t = 600)]
    steps: u64,

    /// Seconds of simulated time per step
    #[arg(long, default_value_t = 1.0)]
    dt: f64,

    /// Random seed; defaults to the seed in the config
    #[arg(long)]
    seed: Option<u64>,

    /// Scenario TOML file (map, population, tasks, hazards)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Config TOML file, replaces the scenario's config section
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("formicary=info")),
        )
        .init();

    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    if let Some(path) = &args.config {
        scenario.config = SimulationConfig::load(path)?;
    }

    let seed = args.seed.unwrap_or(scenario.config.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut world = scenario.build_world()?;

    tracing::info!("Running {} steps of {}s (seed {})", args.steps, args.dt, seed);

    let mut delivered = 0.0;
    let mut hatched = 0;
    let mut buildings = 0;
    let mut rejected = 0;
    for _ in 0..args.steps {
        let report = world.step(args.dt, &mut rng);
        for result in &report.commands {
            if let Err(err) = result {
                tracing::warn!("Intent rejected: {}", err);
                rejected += 1;
            }
        }
        for event in &report.events {
            match event {
                SimulationEvent::ResourceDelivered { stored, .. } => delivered += stored,
                SimulationEvent::WorkerHatched { .. } => hatched += 1,
                SimulationEvent::BuildingCompleted { .. } => buildings += 1,
                _ => {}
            }
        }
        if report.maintenance.ratio < 1.0 {
            tracing::debug!(
                "Tick {}: maintenance short ({:.2} of {:.2})",
                report.tick,
                report.maintenance.paid,
                report.maintenance.required
            );
        }
    }

    let snapshot = world.snapshot();
    if args.json {
        println!("{}", snapshot.to_json()?);
    } else {
        print_summary(&snapshot, delivered, hatched, buildings, rejected);
    }
    Ok(())
}

fn print_summary(snapshot: &ColonySnapshot, delivered: f64, hatched: u32, buildings: u32, rejected: u32) {
    println!("=== FORMICARY ===");
    println!("Tick {} at {:.1}s", snapshot.tick, snapshot.time);
    println!(
        "Colony level {}, influence {:.1}, visibility {:.1}",
        snapshot.colony_level, snapshot.influence_radius, snapshot.visibility_radius
    );
    println!();

    println!("Resources:");
    for view in &snapshot.resources {
        if view.limit > 0.0 {
            println!("  {:<8} {:>8.1} / {:.0}", view.kind.label(), view.amount, view.limit);
        } else {
            println!("  {:<8} {:>8.1}", view.kind.label(), view.amount);
        }
    }
    println!();

    println!(
        "Ants: {} ({} hatched), tasks queued: {}",
        snapshot.ants.len(),
        hatched,
        snapshot.tasks.len()
    );
    println!("Delivered {:.1} units, built {} buildings", delivered, buildings);
    if rejected > 0 {
        println!("{} intents rejected", rejected);
    }
    for node in &snapshot.nodes {
        println!(
            "  {} {:<7} richness {:>6.1} at {:.1}{}{}",
            node.node.id,
            node.node.kind.label(),
            node.node.richness,
            node.node.distance_to_colony,
            if node.visible { "" } else { " (unseen)" },
            if node.available { "" } else { " (depleted)" },
        );
    }
}
