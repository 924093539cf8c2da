//! Ecosystem, tick cycle, and run orchestration for the Flee displacement
//! simulation.
//!
//! This crate ties the world graph and the agents together into an
//! [`Ecosystem`] and owns the phase loop that advances it one tick at a
//! time: scoring, decisions, completions, arrival aggregation.
//!
//! # Modules
//!
//! - [`arrivals`] -- Per-tick camp arrival counts and mean journey lengths.
//! - [`clock`] -- Tick counter with checked advancement.
//! - [`config`] -- Configuration loading from `flee-config.yaml` into
//!   strongly-typed structs.
//! - [`conflict`] -- Conflict-zone registry with population-weighted
//!   sampling.
//! - [`ecosystem`] -- [`Ecosystem`], the owner of all simulation state.
//! - [`runner`] -- Bounded run loop with a per-tick callback.
//! - [`tick`] -- The phase loop for a single tick.

pub mod arrivals;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod ecosystem;
pub mod runner;
pub mod tick;

// Re-export primary types at crate root.
pub use arrivals::{ArrivalLog, ArrivalStats};
pub use clock::{ClockError, SimulationClock};
pub use config::{ConfigError, SimulationConfig};
pub use conflict::{ConflictZone, ConflictZones};
pub use ecosystem::{Ecosystem, EcosystemError};
pub use runner::{
    NoOpCallback, RunnerError, SimulationResult, TickCallback, log_simulation_end, run_simulation,
};
pub use tick::{TickError, TickSummary};
