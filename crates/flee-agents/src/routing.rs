//! Weighted stochastic route selection at a decision point.
//!
//! Each outgoing link of the current location gets a weight:
//!
//! 1. A link whose destination is full weighs 0.
//! 2. Otherwise a forced-redirection link is taken immediately, whatever
//!    the other weights are.
//! 3. Otherwise the weight is the destination's score at the agent's
//!    awareness level divided by `softening + distance`.
//!
//! The weights are normalized and one link is drawn from the resulting
//! categorical distribution. When every weight is zero (for example all
//! destinations are full) the draw is uniform over all links, full ones
//! included. A location without links yields no route.

use flee_types::{AwarenessLevel, LocationId, SimulationParameters};
use flee_world::{Link, LocationState, WorldMap};
use rand::Rng;

use crate::error::AgentError;

/// Outcome of weighting the outgoing links of a location.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteWeights {
    /// A forced-redirection link at this index must be taken.
    Forced(usize),
    /// Unnormalized weights, one per outgoing link in order.
    Weighted(Vec<f64>),
}

/// Attractiveness of travelling along `link` to `destination`.
pub fn link_weight(
    link: &Link,
    destination: &LocationState,
    awareness: AwarenessLevel,
    softening: f64,
) -> f64 {
    destination.score(awareness) / (softening + link.distance())
}

/// Weight every outgoing link of `location`.
///
/// # Errors
///
/// Returns [`AgentError::World`] if the location or one of its links is
/// missing from the graph.
pub fn route_weights(
    world: &WorldMap,
    location: LocationId,
    awareness: AwarenessLevel,
    params: &SimulationParameters,
) -> Result<RouteWeights, AgentError> {
    let outgoing = world.outgoing(location)?;
    let mut weights = Vec::with_capacity(outgoing.len());

    for (index, &link_id) in outgoing.iter().enumerate() {
        let link = world.try_link(link_id)?;
        let destination = world.try_location(link.endpoint())?;
        if destination.is_full(params.capacity_buffer) {
            weights.push(0.0);
        } else if link.forced_redirection() {
            return Ok(RouteWeights::Forced(index));
        } else {
            weights.push(link_weight(link, destination, awareness, params.softening));
        }
    }

    Ok(RouteWeights::Weighted(weights))
}

/// Choose the index of an outgoing link of `location`, or `None` if the
/// location has no outgoing links.
///
/// # Errors
///
/// Returns [`AgentError::World`] if the graph bookkeeping is broken.
pub fn select_route(
    world: &WorldMap,
    location: LocationId,
    awareness: AwarenessLevel,
    params: &SimulationParameters,
    rng: &mut impl Rng,
) -> Result<Option<usize>, AgentError> {
    match route_weights(world, location, awareness, params)? {
        RouteWeights::Forced(index) => Ok(Some(index)),
        RouteWeights::Weighted(weights) => Ok(choose_weighted(&weights, rng)),
    }
}

/// Draw an index from the categorical distribution given by `weights`.
///
/// Returns `None` for an empty slice. Falls back to a uniform draw over
/// every index when the weights sum to zero.
pub fn choose_weighted(weights: &[f64], rng: &mut impl Rng) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Some(rng.random_range(0..weights.len()));
    }

    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (index, weight) in weights.iter().enumerate() {
        if *weight <= 0.0 {
            continue;
        }
        cumulative += weight / total;
        last_positive = Some(index);
        if roll < cumulative {
            return Some(index);
        }
    }
    // Rounding left the cumulative sum a hair below 1.0.
    last_positive
}

#[cfg(test)]
mod tests {
    use flee_types::LocationSpec;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn star_world(specs: Vec<(LocationSpec, f64, bool)>) -> (WorldMap, LocationId) {
        let mut map = WorldMap::new();
        let hub = map.add_location(LocationSpec::new("Hub"));
        for (spec, distance, forced) in specs {
            let name = spec.name.clone();
            let _ = map.add_location(spec);
            let _ = map.link_up("Hub", &name, distance, forced);
        }
        (map, hub.unwrap_or(LocationId::new(0)))
    }

    fn fill(map: &mut WorldMap, name: &str, count: u32) {
        if let Some(id) = map.location_id(name) {
            for _ in 0..count {
                let _ = map.place_agent(id);
            }
        }
    }

    #[test]
    fn no_links_no_route() {
        let (map, hub) = star_world(Vec::new());
        let mut rng = SmallRng::seed_from_u64(42);
        let params = SimulationParameters::default();
        let choice = select_route(&map, hub, AwarenessLevel::Location, &params, &mut rng);
        assert_eq!(choice.ok(), Some(None));
    }

    #[test]
    fn weights_are_score_over_distance() {
        let (mut map, hub) = star_world(vec![
            (LocationSpec::new("Near"), 5.0, false),
            (LocationSpec::new("Far").foreign(), 20.0, false),
        ]);
        let params = SimulationParameters {
            softening: 5.0,
            ..SimulationParameters::default()
        };
        map.update_scores(&params);
        let weights = route_weights(&map, hub, AwarenessLevel::Location, &params);
        let Ok(RouteWeights::Weighted(w)) = weights else {
            panic!("expected weighted routes");
        };
        assert_eq!(w.len(), 2);
        assert!((w.first().copied().unwrap_or_default() - 1.0 / 10.0).abs() < 1e-12);
        assert!((w.get(1).copied().unwrap_or_default() - 2.0 / 25.0).abs() < 1e-12);
    }

    #[test]
    fn road_awareness_ignores_scores() {
        let (mut map, hub) = star_world(vec![(LocationSpec::new("Camp").foreign(), 4.0, false)]);
        let params = SimulationParameters::default();
        map.update_scores(&params);
        let weights = route_weights(&map, hub, AwarenessLevel::Road, &params);
        assert_eq!(weights.ok(), Some(RouteWeights::Weighted(vec![0.25])));
    }

    #[test]
    fn forced_link_always_chosen() {
        let (map, hub) = star_world(vec![
            (LocationSpec::new("Attractive").foreign(), 1.0, false),
            (LocationSpec::new("Forced"), 500.0, true),
            (LocationSpec::new("Other"), 2.0, false),
        ]);
        let params = SimulationParameters::default();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let choice = select_route(&map, hub, AwarenessLevel::Location, &params, &mut rng);
            assert_eq!(choice.ok(), Some(Some(1)));
        }
    }

    #[test]
    fn full_forced_link_is_not_forced() {
        let (mut map, hub) = star_world(vec![
            (LocationSpec::new("Forced").with_capacity(1), 1.0, true),
            (LocationSpec::new("Open"), 1.0, false),
        ]);
        fill(&mut map, "Forced", 1);
        let params = SimulationParameters::default();
        let weights = route_weights(&map, hub, AwarenessLevel::Location, &params);
        assert_eq!(weights.ok(), Some(RouteWeights::Weighted(vec![0.0, 1.0])));

        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            let choice = select_route(&map, hub, AwarenessLevel::Location, &params, &mut rng);
            assert_eq!(choice.ok(), Some(Some(1)));
        }
    }

    #[test]
    fn full_destinations_never_chosen_when_others_open() {
        let (mut map, hub) = star_world(vec![
            (LocationSpec::new("Full").with_capacity(2), 1.0, false),
            (LocationSpec::new("Open"), 50.0, false),
        ]);
        fill(&mut map, "Full", 2);
        let params = SimulationParameters::default();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let choice = select_route(&map, hub, AwarenessLevel::Location, &params, &mut rng);
            assert_eq!(choice.ok(), Some(Some(1)));
        }
    }

    #[test]
    fn all_full_falls_back_to_uniform() {
        let (mut map, hub) = star_world(vec![
            (LocationSpec::new("A").with_capacity(1), 1.0, false),
            (LocationSpec::new("B").with_capacity(1), 1.0, false),
        ]);
        fill(&mut map, "A", 1);
        fill(&mut map, "B", 1);
        let params = SimulationParameters::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut counts = [0_u32; 2];
        for _ in 0..2000 {
            if let Ok(Some(index)) =
                select_route(&map, hub, AwarenessLevel::Location, &params, &mut rng)
                && let Some(slot) = counts.get_mut(index)
            {
                *slot += 1;
            }
        }
        assert!(counts.iter().all(|&c| c > 850), "counts: {counts:?}");
    }

    #[test]
    fn choose_weighted_follows_weights() {
        let mut rng = SmallRng::seed_from_u64(99);
        let weights = [1.0, 0.0, 3.0];
        let mut counts = [0_u32; 3];
        for _ in 0..4000 {
            if let Some(slot) = choose_weighted(&weights, &mut rng).and_then(|i| counts.get_mut(i))
            {
                *slot += 1;
            }
        }
        assert_eq!(counts.get(1).copied(), Some(0));
        let share = f64::from(counts.get(2).copied().unwrap_or(0)) / 4000.0;
        assert!((share - 0.75).abs() < 0.04, "share: {share}");
    }

    #[test]
    fn choose_weighted_empty_is_none() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(choose_weighted(&[], &mut rng), None);
    }
}
