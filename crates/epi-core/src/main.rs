//! Epidemic simulation runner
//!
//! Loads `epidemic.toml` (or the file given with `--config`), applies any
//! command-line overrides, runs the simulation and writes its output.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use epi_core::{Config, RunRecorder, Simulation, SimulationError, DEFAULT_CONFIG_PATH};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "epidemic_sim")]
#[command(about = "Agent-based SIRD epidemic simulation")]
struct Args {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Number of agents
    #[arg(long)]
    population: Option<usize>,

    /// Agents infected at the start
    #[arg(long)]
    initial_infected: Option<usize>,

    /// Maximum per-axis step per tick
    #[arg(long)]
    movement: Option<i32>,

    /// Output directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Run without writing any files
    #[arg(long)]
    no_output: bool,

    /// Only log warnings and errors
    #[arg(long)]
    quiet: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(ticks) = self.ticks {
            config.simulation.max_ticks = ticks;
        }
        if let Some(population) = self.population {
            config.world.population = population;
        }
        if let Some(initial_infected) = self.initial_infected {
            config.disease.initial_infected = initial_infected;
        }
        if let Some(movement) = self.movement {
            config.simulation.movement = movement;
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if self.no_output {
            config.output.enabled = false;
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimulationError> {
    let mut config = Config::load_or_default(&args.config)?;
    args.apply(&mut config);
    config.validate()?;

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let mut sim = Simulation::new(&config)?;
    info!(
        seed = sim.seed(),
        population = config.world.population,
        width = config.world.width,
        height = config.world.height,
        max_ticks = config.simulation.max_ticks,
        "Starting simulation"
    );
    info!("Tick 0: {}", sim.world().counts());

    let mut recorder = RunRecorder::new(&config.output)?;
    if let Err(e) = recorder.record_start(&sim) {
        warn!("Could not write initial snapshot: {}", e);
    }

    let outcome = sim.run(config.simulation.max_ticks, |s| {
        info!("Tick {}: {}", s.tick(), s.world().counts());
        if let Err(e) = recorder.record_tick(s) {
            warn!("Could not record tick {}: {}", s.tick(), e);
        }
        Ok(())
    })?;

    let stats = recorder.finish(&sim)?;
    info!(
        ticks = outcome.ticks_run,
        peak_infected = stats.peak_infected,
        peak_tick = stats.peak_tick,
        attack_rate = stats.attack_rate,
        "Simulation complete: {}",
        stats.final_counts
    );
    if let Some(tick) = outcome.extinct_at {
        info!("Infection died out at tick {}", tick);
    }
    if let Some(dir) = recorder.dir() {
        info!(
            "Wrote {} snapshots and {} events to {}",
            recorder.snapshot_count(),
            recorder.event_count(),
            dir.display()
        );
    }
    Ok(())
}
