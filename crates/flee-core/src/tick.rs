//! Tick cycle: the phase loop that drives one step of the displacement model.
//!
//! Each tick runs these phases strictly in order, each one over the whole
//! graph or the whole agent collection before the next begins:
//!
//! 1. **Scoring** -- the three-pass location score cascade (self, then
//!    neighbourhood, then region).
//!
//! 2. **Decisions** -- every resident agent, in creation order, may depart
//!    along a weighted random route.
//!
//! 3. **Completions** -- every travelling agent, in creation order,
//!    advances along its link and may arrive, possibly chaining further
//!    hops within the same speed budget.
//!
//! 4. **Arrivals** -- if camp arrival logging is enabled, camp journey
//!    logs are drained into one [`ArrivalStats`] row.
//!
//! 5. **Clock** -- the tick counter advances.
//!
//! Given the same ecosystem state and RNG state the tick is deterministic.

use flee_agents::{AgentError, decide_departure, finish_travel};
use flee_types::AgentId;
use tracing::debug;

use crate::arrivals::ArrivalStats;
use crate::ecosystem::Ecosystem;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: crate::clock::ClockError,
    },

    /// Moving an agent failed.
    #[error("agent error for {agent_id}: {source}")]
    Agent {
        /// The agent that caused the error.
        agent_id: AgentId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: flee_world::WorldError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick that was executed (the clock value before it advanced).
    pub tick: u64,
    /// Departures this tick, chained departures after an arrival included.
    pub departures: u32,
    /// Links completed this tick.
    pub link_completions: u32,
    /// Agents still on a link at the end of the tick.
    pub in_transit: u64,
    /// Camp arrival statistics, when arrival logging is enabled.
    pub camp_arrivals: Option<ArrivalStats>,
}

/// Execute one complete tick.
///
/// # Errors
///
/// Returns [`TickError`] if the graph bookkeeping is inconsistent or the
/// clock overflows. The ecosystem may be partially updated in that case.
pub fn run_tick(eco: &mut Ecosystem) -> Result<TickSummary, TickError> {
    let tick = eco.clock.tick();
    debug!(tick, agents = eco.agents.len(), "Tick started");

    // --- Phase 1: Scoring ---
    eco.world.update_scores(&eco.params);

    // --- Phase 2: Decisions ---
    let mut departures = phase_decisions(eco)?;

    // --- Phase 3: Completions ---
    let (link_completions, chained) = phase_completions(eco)?;
    departures = departures.saturating_add(chained);
    debug!(tick, departures, link_completions, "Movement phases complete");

    // --- Phase 4: Arrivals ---
    let camp_arrivals = phase_arrivals(eco, tick)?;

    // --- Phase 5: Clock ---
    eco.clock.advance()?;

    Ok(TickSummary {
        tick,
        departures,
        link_completions,
        in_transit: eco.world.agents_on_links(),
        camp_arrivals,
    })
}

/// Phase 2: every agent makes its departure decision.
fn phase_decisions(eco: &mut Ecosystem) -> Result<u32, TickError> {
    let Ecosystem {
        params,
        world,
        agents,
        rng,
        ..
    } = eco;

    let mut departures: u32 = 0;
    for person in agents.iter_mut() {
        let departed =
            decide_departure(person, world, params, rng).map_err(|source| TickError::Agent {
                agent_id: person.id(),
                source,
            })?;
        if departed.is_some() {
            departures = departures.saturating_add(1);
        }
    }
    Ok(departures)
}

/// Phase 3: every traveller advances. Returns completed hops and chained
/// departures.
fn phase_completions(eco: &mut Ecosystem) -> Result<(u32, u32), TickError> {
    let Ecosystem {
        params,
        world,
        agents,
        rng,
        ..
    } = eco;

    let mut hops: u32 = 0;
    let mut chained: u32 = 0;
    for person in agents.iter_mut() {
        let report =
            finish_travel(person, world, params, rng).map_err(|source| TickError::Agent {
                agent_id: person.id(),
                source,
            })?;
        hops = hops.saturating_add(report.hops_completed);
        chained = chained.saturating_add(report.extra_departures);
    }
    Ok((hops, chained))
}

/// Phase 4: drain camp journey logs into the arrival history.
fn phase_arrivals(eco: &mut Ecosystem, tick: u64) -> Result<Option<ArrivalStats>, TickError> {
    if !eco.params.log_camp_arrivals {
        return Ok(None);
    }
    let tally = eco.world.drain_camp_journeys()?;
    let stats = ArrivalStats::from_tally(tick, tally);
    debug!(
        tick,
        arrivals = stats.arrivals,
        mean_duration = stats.mean_duration,
        "Camp arrivals aggregated"
    );
    eco.arrivals.push(stats);
    Ok(Some(stats))
}
