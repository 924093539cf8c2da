//! The two per-tick movement steps of a [`Person`].
//!
//! Every tick runs [`decide_departure`] for all agents, then
//! [`finish_travel`] for all agents. Splitting the steps into two passes
//! keeps departures of one agent from influencing arrivals of another
//! within the same pass.
//!
//! A traveller gains `max_move_speed` km of progress per tick. When a link
//! is completed and the cumulative distance covered this tick is still
//! below `min_move_speed`, the agent immediately makes another departure
//! decision at the new location and may continue onto a further link. The
//! distance already covered is threaded through the chain so a single tick
//! never exceeds one speed budget.

use flee_types::{LinkId, SimulationParameters};
use flee_world::WorldMap;
use rand::Rng;
use tracing::trace;

use crate::error::AgentError;
use crate::person::{Person, Position};
use crate::routing::select_route;

/// What happened to one traveller during [`finish_travel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TravelReport {
    /// Links completed this tick.
    pub hops_completed: u32,
    /// Departures made by chained decisions after an arrival.
    pub extra_departures: u32,
}

/// Make the departure decision for a resident person.
///
/// A resident leaves with probability equal to the current location's
/// movechance, along a link picked by [`select_route`]. Travellers are
/// left alone. The departure counter advances on every call.
///
/// Returns the link departed on, if any.
///
/// # Errors
///
/// Returns [`AgentError`] if the world graph bookkeeping is inconsistent.
pub fn decide_departure(
    person: &mut Person,
    world: &mut WorldMap,
    params: &SimulationParameters,
    rng: &mut impl Rng,
) -> Result<Option<LinkId>, AgentError> {
    let mut departed = None;

    if let Position::AtLocation(location) = person.position {
        let movechance = world.try_location(location)?.movechance();
        let roll: f64 = rng.random();
        if roll < movechance {
            let awareness = params.awareness_for(person.timesteps_since_departure);
            if let Some(index) = select_route(world, location, awareness, params, rng)? {
                let outgoing = world.outgoing(location)?;
                let link = *outgoing.get(index).ok_or(AgentError::RouteOutOfRange {
                    index,
                    available: outgoing.len(),
                })?;
                world.depart(location, link)?;
                person.position = Position::OnLink {
                    link,
                    progress: 0.0,
                };
                trace!(agent = %person.id(), %location, %link, "Departed");
                departed = Some(link);
            }
        }
    }

    person.timesteps_since_departure = person.timesteps_since_departure.saturating_add(1);
    Ok(departed)
}

/// Advance a traveller along its link and handle arrivals.
///
/// Residents are left alone. On arrival the person becomes resident at
/// the link endpoint; if the endpoint is a camp and camp arrival logging
/// is enabled, the journey length is recorded there.
///
/// # Errors
///
/// Returns [`AgentError`] if the world graph bookkeeping is inconsistent.
pub fn finish_travel(
    person: &mut Person,
    world: &mut WorldMap,
    params: &SimulationParameters,
    rng: &mut impl Rng,
) -> Result<TravelReport, AgentError> {
    let mut report = TravelReport::default();
    let mut consumed = 0.0;

    while let Position::OnLink { link, progress } = person.position {
        let progress = progress + params.max_move_speed;
        let distance = world.try_link(link)?.distance();

        if progress - consumed <= distance {
            person.position = Position::OnLink { link, progress };
            break;
        }

        if let Some(log) = person.travel_log.as_mut() {
            log.places_travelled = log.places_travelled.saturating_add(1);
            log.distance_travelled += distance;
        }

        let chain = distance + consumed < params.min_move_speed;
        if chain {
            consumed += distance;
        }

        let endpoint = world.arrive(link)?;
        person.position = Position::AtLocation(endpoint);
        report.hops_completed = report.hops_completed.saturating_add(1);
        trace!(agent = %person.id(), %endpoint, "Arrived");

        if params.log_camp_arrivals {
            world
                .try_location_mut(endpoint)?
                .record_arrival(person.timesteps_since_departure);
        }

        if !chain {
            break;
        }
        if decide_departure(person, world, params, rng)?.is_some() {
            report.extra_departures = report.extra_departures.saturating_add(1);
        }
    }

    Ok(report)
}
