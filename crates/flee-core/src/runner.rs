//! Bounded simulation loop.
//!
//! [`run_simulation`] drives [`Ecosystem::evolve`] for a fixed number of
//! ticks and hands each [`TickSummary`] to a [`TickCallback`], which is
//! where drivers hook in reporting.

use tracing::{info, warn};

use crate::ecosystem::Ecosystem;
use crate::tick::{TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of the simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// The last tick summary, if any tick ran.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// Departures summed over every tick.
    pub total_departures: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, ecosystem: &Ecosystem);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _ecosystem: &Ecosystem) {}
}

/// Run `ticks` ticks of the simulation.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails. Ticks that completed before
/// the failure are not rolled back.
pub fn run_simulation(
    ecosystem: &mut Ecosystem,
    ticks: u64,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut final_summary = None;
    let mut total_ticks: u64 = 0;
    let mut total_departures: u64 = 0;

    info!(
        ticks,
        start_tick = ecosystem.time(),
        agents = ecosystem.num_agents(),
        "Simulation starting"
    );

    for _ in 0..ticks {
        let summary = ecosystem.evolve()?;
        total_ticks = total_ticks.saturating_add(1);
        total_departures = total_departures.saturating_add(u64::from(summary.departures));

        info!(
            tick = summary.tick,
            departures = summary.departures,
            link_completions = summary.link_completions,
            in_transit = summary.in_transit,
            "Tick completed"
        );

        callback.on_tick(&summary, ecosystem);
        final_summary = Some(summary);
    }

    Ok(SimulationResult {
        final_summary,
        total_ticks,
        total_departures,
    })
}

/// Log the outcome of [`run_simulation`].
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        total_ticks = result.total_ticks,
        total_departures = result.total_departures,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            in_transit = summary.in_transit,
            camp_arrivals = summary.camp_arrivals.map(|a| a.arrivals),
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
