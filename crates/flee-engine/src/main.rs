//! Driver binary for the Flee displacement simulation.
//!
//! Loads configuration, builds the demo scenario, runs the configured
//! number of ticks, and logs the population of every location after each
//! tick.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the path given as the first argument, or
//!    from `flee-config.yaml` in the working directory, or defaults
//! 2. Initialize structured logging (tracing)
//! 3. Build the demo world and seed agents from its conflict zone
//! 4. Run the simulation loop
//! 5. Log the result

mod error;
mod report_callback;
mod scenario;

use std::path::{Path, PathBuf};

use flee_core::runner;
use flee_core::SimulationConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::report_callback::ReportCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "flee-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, scenario construction, or the
/// simulation itself fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so remember where it
    //    came from and report it afterwards.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!("flee-engine starting");
    match source {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        ticks = config.run.ticks,
        initial_agents = config.scenario.initial_agents,
        "Run configured"
    );

    // 3. Build the scenario.
    let mut ecosystem = scenario::build_demo(&config)?;

    // 4. Run the simulation.
    let mut callback = ReportCallback;
    let result = runner::run_simulation(&mut ecosystem, config.run.ticks, &mut callback)
        .map_err(EngineError::from)?;

    // 5. Log results.
    runner::log_simulation_end(&result);
    info!(
        total_ticks = result.total_ticks,
        agents = ecosystem.num_agents(),
        "flee-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration.
///
/// An explicit path argument must exist. Without one, `flee-config.yaml`
/// is used if present, and defaults otherwise. Returns the path that was
/// read, if any.
fn load_config() -> Result<(SimulationConfig, Option<PathBuf>), EngineError> {
    if let Some(arg) = std::env::args_os().nth(1) {
        let path = PathBuf::from(arg);
        let config = SimulationConfig::from_file(&path)?;
        return Ok((config, Some(path)));
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        let config = SimulationConfig::from_file(default_path)?;
        Ok((config, Some(default_path.to_path_buf())))
    } else {
        Ok((SimulationConfig::default(), None))
    }
}
