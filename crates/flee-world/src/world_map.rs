//! World graph: locations as nodes, links as weighted directed edges.
//!
//! The [`WorldMap`] is the spatial backbone of the simulation. It stores
//! every [`LocationState`] and [`Link`] in insertion-ordered arenas, keeps
//! a name index for constant-time lookup, and owns the bookkeeping that
//! moves agent counts between locations and links.
//!
//! Locations and links are never removed. Removing a road only detaches
//! the link from its source's outgoing list, so agents already on it can
//! still finish their journey.

use std::collections::HashMap;

use flee_types::{LinkId, LocationId, LocationReport, LocationSpec, SimulationParameters};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::WorldError;
use crate::link::Link;
use crate::location::LocationState;

/// Camp arrivals collected from every camp since the last drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JourneyTally {
    /// Number of agents that arrived at a camp.
    pub arrivals: u64,
    /// Sum of their journey lengths in ticks.
    pub total_ticks: u64,
}

/// The world graph holding all locations and links.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldMap {
    /// All locations in registration order.
    locations: Vec<LocationState>,
    /// All links in registration order.
    links: Vec<Link>,
    /// Name index into `locations`.
    names: HashMap<String, LocationId>,
}

impl WorldMap {
    /// Create an empty world map.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------
    // Location operations
    // -------------------------------------------------------------------

    /// Register a location and return its handle.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateLocation`] if the name is taken.
    pub fn add_location(&mut self, spec: LocationSpec) -> Result<LocationId, WorldError> {
        if self.names.contains_key(&spec.name) {
            return Err(WorldError::DuplicateLocation(spec.name));
        }
        let id = LocationId::new(self.locations.len());
        self.names.insert(spec.name.clone(), id);
        self.locations.push(LocationState::new(spec));
        Ok(id)
    }

    /// Get an immutable reference to a location's state.
    pub fn location(&self, id: LocationId) -> Option<&LocationState> {
        self.locations.get(id.index())
    }

    /// Get a mutable reference to a location's state.
    pub fn location_mut(&mut self, id: LocationId) -> Option<&mut LocationState> {
        self.locations.get_mut(id.index())
    }

    /// Like [`Self::location`], but a missing handle is an error.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LocationNotFound`].
    pub fn try_location(&self, id: LocationId) -> Result<&LocationState, WorldError> {
        self.location(id).ok_or(WorldError::LocationNotFound(id))
    }

    /// Like [`Self::location_mut`], but a missing handle is an error.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LocationNotFound`].
    pub fn try_location_mut(&mut self, id: LocationId) -> Result<&mut LocationState, WorldError> {
        self.location_mut(id).ok_or(WorldError::LocationNotFound(id))
    }

    /// Look up a location handle by name.
    pub fn location_id(&self, name: &str) -> Option<LocationId> {
        self.names.get(name).copied()
    }

    /// Look up a location handle by name, reporting unknown names.
    ///
    /// An unknown name is logged together with every registered name so
    /// the offending input can be corrected.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownLocationName`].
    pub fn resolve(&self, name: &str) -> Result<LocationId, WorldError> {
        self.location_id(name).ok_or_else(|| {
            error!(
                name,
                registered = ?self.location_names(),
                "location does not exist in the ecosystem"
            );
            WorldError::UnknownLocationName(name.to_owned())
        })
    }

    /// Return the number of locations in the map.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Names of all locations in registration order.
    pub fn location_names(&self) -> Vec<&str> {
        self.locations.iter().map(LocationState::name).collect()
    }

    /// Iterate over all locations in registration order.
    pub fn locations(&self) -> impl Iterator<Item = (LocationId, &LocationState)> {
        self.locations
            .iter()
            .enumerate()
            .map(|(i, loc)| (LocationId::new(i), loc))
    }

    // -------------------------------------------------------------------
    // Link operations
    // -------------------------------------------------------------------

    /// Connect two named locations with a pair of directed links.
    ///
    /// The forced-redirection flag applies only to the `from -> to`
    /// direction; the return direction is never forced. Returns the handles
    /// of the forward and return links.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownLocationName`] if either name is not
    /// registered, or [`WorldError::InvalidDistance`] if `distance` is not a
    /// finite positive number.
    pub fn link_up(
        &mut self,
        from: &str,
        to: &str,
        distance: f64,
        forced_redirection: bool,
    ) -> Result<(LinkId, LinkId), WorldError> {
        let from_id = self.resolve(from)?;
        let to_id = self.resolve(to)?;
        if !distance.is_finite() || distance <= 0.0 {
            return Err(WorldError::InvalidDistance {
                from: from.to_owned(),
                to: to.to_owned(),
                distance,
            });
        }

        let forward = self.push_link(from_id, Link::new(to_id, distance, forced_redirection))?;
        let back = self.push_link(to_id, Link::new(from_id, distance, false))?;
        debug!(from, to, distance, forced_redirection, "Locations linked");
        Ok((forward, back))
    }

    fn push_link(&mut self, source: LocationId, link: Link) -> Result<LinkId, WorldError> {
        let id = LinkId::new(self.links.len());
        self.try_location_mut(source)?.push_link(id);
        self.links.push(link);
        Ok(id)
    }

    /// Detach every outgoing link of `from` that leads to `to`.
    ///
    /// Only the `from -> to` direction is affected. Returns how many links
    /// were detached.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownLocationName`] if either name is not
    /// registered.
    pub fn remove_links(&mut self, from: &str, to: &str) -> Result<usize, WorldError> {
        let from_id = self.resolve(from)?;
        let to_id = self.resolve(to)?;

        let links = &self.links;
        let source = self
            .locations
            .get_mut(from_id.index())
            .ok_or(WorldError::LocationNotFound(from_id))?;
        let before = source.links().len();
        source.retain_links(|id| links.get(id.index()).is_none_or(|l| l.endpoint() != to_id));
        let removed = before.saturating_sub(source.links().len());
        debug!(from, to, removed, "Links removed");
        Ok(removed)
    }

    /// Get an immutable reference to a link.
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.index())
    }

    /// Like [`Self::link`], but a missing handle is an error.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LinkNotFound`].
    pub fn try_link(&self, id: LinkId) -> Result<&Link, WorldError> {
        self.link(id).ok_or(WorldError::LinkNotFound(id))
    }

    /// Return the number of links ever created, detached ones included.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Iterate over all links in creation order.
    pub fn links(&self) -> impl Iterator<Item = (LinkId, &Link)> {
        self.links
            .iter()
            .enumerate()
            .map(|(i, link)| (LinkId::new(i), link))
    }

    /// Outgoing links of a location, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LocationNotFound`].
    pub fn outgoing(&self, id: LocationId) -> Result<&[LinkId], WorldError> {
        Ok(self.try_location(id)?.links())
    }

    // -------------------------------------------------------------------
    // Scoring
    // -------------------------------------------------------------------

    /// Recompute the location, neighbourhood, and region scores of every
    /// location.
    ///
    /// Each tier is a full pass over the graph that completes before the
    /// next begins, because a tier reads the neighbours' previous tier.
    pub fn update_scores(&mut self, params: &SimulationParameters) {
        for loc in &mut self.locations {
            loc.update_location_score(params);
        }

        let samples = self.neighbour_samples(LocationState::location_score);
        for (loc, neighbours) in self.locations.iter_mut().zip(&samples) {
            loc.update_neighbourhood_score(neighbours);
        }

        let samples = self.neighbour_samples(LocationState::neighbourhood_score);
        for (loc, neighbours) in self.locations.iter_mut().zip(&samples) {
            loc.update_region_score(neighbours);
        }
    }

    /// For every location, `(tier score of endpoint, distance)` per outgoing link.
    fn neighbour_samples(&self, tier: fn(&LocationState) -> f64) -> Vec<Vec<(f64, f64)>> {
        self.locations
            .iter()
            .map(|loc| {
                loc.links()
                    .iter()
                    .filter_map(|id| self.links.get(id.index()))
                    .filter_map(|link| {
                        self.locations
                            .get(link.endpoint().index())
                            .map(|end| (tier(end), link.distance()))
                    })
                    .collect()
            })
            .collect()
    }

    // -------------------------------------------------------------------
    // Agent bookkeeping
    // -------------------------------------------------------------------

    /// Count a newly created agent at a location.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LocationNotFound`] or an overflow error.
    pub fn place_agent(&mut self, id: LocationId) -> Result<(), WorldError> {
        self.try_location_mut(id)?.add_agent()
    }

    /// Move one agent's count from a location onto one of its links.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LocationNotFound`], [`WorldError::LinkNotFound`],
    /// or [`WorldError::CountUnderflow`] if no agent was resident.
    pub fn depart(&mut self, from: LocationId, link: LinkId) -> Result<(), WorldError> {
        if self.link(link).is_none() {
            return Err(WorldError::LinkNotFound(link));
        }
        self.try_location_mut(from)?.remove_agent()?;
        self.links
            .get_mut(link.index())
            .ok_or(WorldError::LinkNotFound(link))?
            .add_agent()
    }

    /// Move one agent's count from a link to its endpoint.
    ///
    /// Returns the endpoint the agent arrived at.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LinkNotFound`], [`WorldError::LocationNotFound`],
    /// or [`WorldError::CountUnderflow`] if the link was empty.
    pub fn arrive(&mut self, link: LinkId) -> Result<LocationId, WorldError> {
        let edge = self
            .links
            .get_mut(link.index())
            .ok_or(WorldError::LinkNotFound(link))?;
        let endpoint = edge.endpoint();
        edge.remove_agent()?;
        self.try_location_mut(endpoint)?.add_agent()?;
        Ok(endpoint)
    }

    /// Collect and reset the journey lengths recorded at every camp.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if the totals overflow.
    pub fn drain_camp_journeys(&mut self) -> Result<JourneyTally, WorldError> {
        let mut tally = JourneyTally::default();
        for loc in self.locations.iter_mut().filter(|l| l.is_camp()) {
            for ticks in loc.drain_journey_lengths() {
                tally.arrivals = tally
                    .arrivals
                    .checked_add(1)
                    .ok_or(WorldError::ArithmeticOverflow)?;
                tally.total_ticks = tally
                    .total_ticks
                    .checked_add(ticks)
                    .ok_or(WorldError::ArithmeticOverflow)?;
            }
        }
        Ok(tally)
    }

    /// Total agents resident at locations.
    pub fn agents_at_locations(&self) -> u64 {
        self.locations
            .iter()
            .map(|l| u64::from(l.num_agents()))
            .sum()
    }

    /// Total agents travelling on links.
    pub fn agents_on_links(&self) -> u64 {
        self.links.iter().map(|l| u64::from(l.num_agents())).sum()
    }

    /// Resident agent counts of every location in registration order.
    pub fn report(&self) -> Vec<LocationReport> {
        self.locations
            .iter()
            .map(|l| LocationReport {
                name: l.name().to_owned(),
                num_agents: l.num_agents(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use flee_types::AwarenessLevel;

    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn make_triangle_world() -> (WorldMap, LocationId, LocationId, LocationId) {
        let mut map = WorldMap::new();
        let a = map.add_location(LocationSpec::new("Alpha"));
        let b = map.add_location(LocationSpec::new("Beta").foreign());
        let c = map.add_location(LocationSpec::new("Gamma").with_movechance(0.001));
        let (Ok(a), Ok(b), Ok(c)) = (a, b, c) else {
            return (map, LocationId::new(0), LocationId::new(1), LocationId::new(2));
        };
        let _ = map.link_up("Alpha", "Beta", 10.0, false);
        let _ = map.link_up("Beta", "Gamma", 5.0, false);
        let _ = map.link_up("Alpha", "Gamma", 20.0, false);
        (map, a, b, c)
    }

    #[test]
    fn add_locations_and_links() {
        let (map, a, _, _) = make_triangle_world();
        assert_eq!(map.location_count(), 3);
        assert_eq!(map.link_count(), 6);
        assert_eq!(map.outgoing(a).map(<[LinkId]>::len).ok(), Some(2));
        assert_eq!(map.location_names(), vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut map = WorldMap::new();
        assert!(map.add_location(LocationSpec::new("A")).is_ok());
        assert!(matches!(
            map.add_location(LocationSpec::new("A")),
            Err(WorldError::DuplicateLocation(_))
        ));
    }

    #[test]
    fn link_requires_known_endpoints() {
        let mut map = WorldMap::new();
        let _ = map.add_location(LocationSpec::new("A"));
        assert!(matches!(
            map.link_up("A", "Nowhere", 3.0, false),
            Err(WorldError::UnknownLocationName(name)) if name == "Nowhere"
        ));
        assert!(map.link_up("Nowhere", "A", 3.0, false).is_err());
        assert_eq!(map.link_count(), 0);
    }

    #[test]
    fn non_positive_distance_rejected() {
        let mut map = WorldMap::new();
        let _ = map.add_location(LocationSpec::new("A"));
        let _ = map.add_location(LocationSpec::new("B"));
        assert!(matches!(
            map.link_up("A", "B", 0.0, false),
            Err(WorldError::InvalidDistance { .. })
        ));
        assert!(map.link_up("A", "B", f64::NAN, false).is_err());
    }

    #[test]
    fn forced_flag_is_one_directional() {
        let mut map = WorldMap::new();
        let _ = map.add_location(LocationSpec::new("A"));
        let _ = map.add_location(LocationSpec::new("B"));
        let pair = map.link_up("A", "B", 4.0, true);
        assert!(pair.is_ok());
        if let Ok((forward, back)) = pair {
            assert_eq!(map.link(forward).map(Link::forced_redirection), Some(true));
            assert_eq!(map.link(back).map(Link::forced_redirection), Some(false));
            let d_forward = map.link(forward).map_or(0.0, Link::distance);
            let d_back = map.link(back).map_or(0.0, Link::distance);
            assert!(approx(d_forward, d_back));
        }
    }

    #[test]
    fn remove_links_detaches_one_direction() {
        let (mut map, a, b, _) = make_triangle_world();
        assert_eq!(map.remove_links("Alpha", "Beta").ok(), Some(1));
        assert_eq!(map.outgoing(a).map(<[LinkId]>::len).ok(), Some(1));
        // Beta still links back to Alpha.
        let back_to_alpha = map.outgoing(b).ok().is_some_and(|ids| {
            ids.iter()
                .any(|id| map.link(*id).is_some_and(|l| l.endpoint() == a))
        });
        assert!(back_to_alpha);
        assert_eq!(map.remove_links("Alpha", "Beta").ok(), Some(0));
        assert!(map.remove_links("Alpha", "Nowhere").is_err());
    }

    #[test]
    fn score_cascade_three_passes() {
        let (mut map, a, b, c) = make_triangle_world();
        let params = SimulationParameters::default();
        map.update_scores(&params);

        let beta = map.location(b).map(LocationState::scores);
        // Beta is foreign: location score 2.0; neighbours Alpha (1.0, 10 km)
        // and Gamma (1.0, 5 km) average to 1.0.
        assert_eq!(beta.map(|s| s[1]), Some(2.0));
        assert!(approx(beta.map_or(0.0, |s| s[2]), 1.0));

        // Alpha: neighbours Beta (2.0 @ 10) and Gamma (1.0 @ 20).
        let expected_alpha = (2.0 / 10.0 + 1.0 / 20.0) / (1.0 / 10.0 + 1.0 / 20.0);
        let alpha = map.location(a);
        assert!(alpha.is_some_and(|l| approx(l.neighbourhood_score(), expected_alpha)));

        // Gamma is a camp: every tier equals its location score and its
        // score vector is never rewritten.
        let gamma = map.location(c);
        assert!(gamma.is_some_and(|l| approx(l.region_score(), l.location_score())));
        assert!(gamma.is_some_and(|l| approx(l.neighbourhood_score(), l.location_score())));
        assert_eq!(gamma.map(LocationState::scores), Some([1.0; 4]));

        // Alpha region: neighbours' neighbourhood scores.
        let beta_n = map.location(b).map_or(0.0, LocationState::neighbourhood_score);
        let gamma_n = map.location(c).map_or(0.0, LocationState::neighbourhood_score);
        let expected_region = (beta_n / 10.0 + gamma_n / 20.0) / (1.0 / 10.0 + 1.0 / 20.0);
        assert!(alpha_region_is(&map, a, expected_region));
    }

    fn alpha_region_is(map: &WorldMap, a: LocationId, expected: f64) -> bool {
        map.location(a)
            .is_some_and(|l| approx(l.score(AwarenessLevel::Region), expected))
    }

    #[test]
    fn score_update_is_idempotent() {
        let (mut map, _, _, _) = make_triangle_world();
        let params = SimulationParameters::default();
        map.update_scores(&params);
        let first: Vec<[f64; 4]> = map.locations().map(|(_, l)| l.scores()).collect();
        map.update_scores(&params);
        let second: Vec<[f64; 4]> = map.locations().map(|(_, l)| l.scores()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn depart_and_arrive_move_counts() {
        let (mut map, a, b, _) = make_triangle_world();
        assert!(map.place_agent(a).is_ok());
        let link = map.outgoing(a).ok().and_then(|ids| ids.first().copied());
        assert!(link.is_some());
        let Some(link) = link else { return };

        assert!(map.depart(a, link).is_ok());
        assert_eq!(map.location(a).map(LocationState::num_agents), Some(0));
        assert_eq!(map.link(link).map(Link::num_agents), Some(1));

        assert_eq!(map.arrive(link).ok(), Some(b));
        assert_eq!(map.location(b).map(LocationState::num_agents), Some(1));
        assert_eq!(map.agents_on_links(), 0);
        assert_eq!(map.agents_at_locations(), 1);
    }

    #[test]
    fn depart_from_empty_location_errors() {
        let (mut map, a, _, _) = make_triangle_world();
        let link = map.outgoing(a).ok().and_then(|ids| ids.first().copied());
        let Some(link) = link else { return };
        assert!(map.depart(a, link).is_err());
        assert!(map.depart(a, LinkId::new(99)).is_err());
    }

    #[test]
    fn camp_journeys_drained() {
        let (mut map, a, _, c) = make_triangle_world();
        if let Some(camp) = map.location_mut(c) {
            camp.record_arrival(2);
            camp.record_arrival(6);
        }
        if let Some(town) = map.location_mut(a) {
            town.record_arrival(9);
        }
        let tally = map.drain_camp_journeys().unwrap_or_default();
        assert_eq!(tally, JourneyTally { arrivals: 2, total_ticks: 8 });
        assert_eq!(map.drain_camp_journeys().unwrap_or_default(), JourneyTally::default());
    }

    #[test]
    fn report_lists_counts_in_order() {
        let (mut map, _, b, _) = make_triangle_world();
        let _ = map.place_agent(b);
        let report = map.report();
        assert_eq!(report.len(), 3);
        assert_eq!(report.get(1).map(|r| r.num_agents), Some(1));
        assert_eq!(report.first().map(|r| r.name.as_str()), Some("Alpha"));
    }

    #[test]
    fn world_map_serializes() {
        let (map, _, _, _) = make_triangle_world();
        let json = serde_json::to_string(&map);
        assert!(json.is_ok());
    }
}
