//! Cascade fan-out simulator
//!
//! Usage:
//!   cascade-sim [participants] [seed]
//!
//! Environment:
//!   CASCADE_EVENTS  When set, print the event log as JSON
//!   RUST_LOG        Log filter (default: cascade_sim=info,cascade_tree=info)

use std::env;

use cascade_sim::{join_concurrently, ParticipantId, Simulation, SimulationConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Joiners added concurrently after the seeded run.
const BURST: u64 = 16;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cascade_sim=info,cascade_tree=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line args
    let args: Vec<String> = env::args().collect();
    let defaults = SimulationConfig::default();

    let participants: usize = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.participants);

    let seed: u64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.seed);

    println!("Cascade Fan-Out Simulator");
    println!("=========================");
    println!();
    println!("Placing {} participants (seed {})...", participants, seed);

    let config = defaults.with_participants(participants).with_seed(seed);
    let mut sim = Simulation::new(config)?;
    let stats = sim.run()?;

    println!();
    println!("Simulation complete:");
    println!("  Joins:      {}", stats.joins);
    println!("  Rejections: {}", stats.rejections);
    println!("  Leaves:     {}", stats.leaves);
    println!("  Rehomed:    {}", stats.rehomed);
    println!("  Stranded:   {}", stats.stranded);
    println!("  Orphans:    {}", stats.orphans);
    println!("  Nodes:      {}", stats.nodes);
    println!();

    // Concurrent burst of relaying joiners on top of the seeded tree
    let tree = sim.tree();
    let first = 1_000_000;
    let burst = (first..first + BURST).map(ParticipantId);
    let outcomes = join_concurrently(tree.clone(), burst, true).await?;
    let placed = outcomes.iter().filter(|(_, outcome)| outcome.is_ok()).count();
    println!("Concurrent burst: {}/{} placed", placed, BURST);
    println!();

    println!("Levels:");
    for (depth, level) in tree.levels().iter().enumerate() {
        let full = level
            .iter()
            .filter(|v| !v.has_capacity(tree.config().branching_factor))
            .count();
        println!("  {:>3}: {:>5} nodes ({} full)", depth + 1, level.len(), full);
    }

    if env::var_os("CASCADE_EVENTS").is_some() {
        println!();
        println!("{}", sim.events_json()?);
    }

    Ok(())
}
