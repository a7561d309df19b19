mod simulation;

use anyhow::{bail, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "merge_sim")]
#[command(about = "Two-lane merge traffic simulation, headless")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "7200")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.016")]
    delta: f32,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Through-lane spawn rate in vehicles per minute
    #[arg(long, default_value = "60")]
    through_rate: u32,

    /// On-ramp spawn rate in vehicles per minute
    #[arg(long, default_value = "30")]
    merge_rate: u32,

    /// Seconds of simulated time between progress summaries
    #[arg(long, default_value = "10.0")]
    summary_interval: f32,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.delta.is_finite() || cli.delta <= 0.0 {
        bail!("time delta must be a positive number of seconds");
    }

    println!("Running merge simulation...");
    println!(
        "Ticks: {}, Delta: {}s, Rates: through={}/min merge={}/min",
        cli.ticks, cli.delta, cli.through_rate, cli.merge_rate
    );
    println!();

    let mut world = match cli.seed {
        Some(seed) => simulation::SimWorld::new_with_seed(seed),
        None => simulation::SimWorld::new(),
    };
    world.configure_rates(cli.through_rate, cli.merge_rate);

    let mut next_summary = cli.summary_interval;
    for _ in 0..cli.ticks {
        world.tick(cli.delta);

        if cli.summary_interval > 0.0 && world.time() >= next_summary {
            world.print_summary();
            println!();
            next_summary += cli.summary_interval;
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    Ok(())
}
