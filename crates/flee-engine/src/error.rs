//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup and the run so
//! `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: flee_core::ConfigError,
    },

    /// Building the scenario failed.
    #[error("ecosystem error: {source}")]
    Ecosystem {
        /// The underlying ecosystem error.
        #[from]
        source: flee_core::EcosystemError,
    },

    /// Agents were requested but no conflict zone can supply them.
    #[error("cannot seed {requested} agents: no conflict zone registered")]
    NoConflictZones {
        /// Number of agents that were to be seeded.
        requested: u32,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: flee_core::RunnerError,
    },
}
