use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use junction_sim::simulation::{
    default_junctions, load_junctions, Mode, SharedSimulation, Simulation, SimulationOptions,
    StateView, StepDriver,
};

#[derive(Parser)]
#[command(name = "junction_sim")]
#[command(about = "Headless junction signal simulation")]
struct Cli {
    /// Milliseconds between simulation steps
    #[arg(long, env = "STEP_INTERVAL_MS", default_value = "5000")]
    interval_ms: u64,

    /// Stop after this many steps (runs until interrupted when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with [[junctions]] definitions (built-in set when omitted)
    #[arg(long)]
    junctions: Option<PathBuf>,

    /// Starting mode: normal, rush_hour or emergency
    #[arg(long, default_value = "normal")]
    mode: Mode,

    /// Start with adaptive signal optimization turned off
    #[arg(long)]
    no_smart_mode: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let definitions = match &cli.junctions {
        Some(path) => load_junctions(path)
            .with_context(|| format!("Failed to load junctions from {}", path.display()))?,
        None => default_junctions(),
    };

    let options = SimulationOptions {
        seed: cli.seed,
        mode: cli.mode,
        smart_mode: !cli.no_smart_mode,
    };
    let simulation =
        Simulation::new(&definitions, options).context("Invalid junction configuration")?;
    let shared = SharedSimulation::new(simulation);

    let interval = Duration::from_millis(cli.interval_ms.max(1));
    info!("Stepping every {:?}", interval);

    println!("Initial state:");
    print_state(&shared.state());
    println!();

    let driver =
        StepDriver::spawn(shared.clone(), interval).context("Failed to start step driver")?;

    let mut reported = 0;
    loop {
        thread::sleep(interval);
        let state = shared.state();
        if state.steps_taken != reported {
            reported = state.steps_taken;
            println!("--- After step {} ---", reported);
            print_state(&state);
            println!();
        }
        if cli.ticks.is_some_and(|ticks| reported >= ticks) {
            break;
        }
    }

    driver.stop();

    println!("=== Final State ===");
    print_state(&shared.state());
    Ok(())
}

fn print_state(state: &StateView) {
    println!("{}", state.summary());
    for junction in &state.junctions {
        println!("  {}", junction.summary());
    }
}
