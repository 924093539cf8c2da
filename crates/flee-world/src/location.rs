//! Location node implementation with agent counting, admission control,
//! and attractiveness scoring.
//!
//! A [`LocationState`] wraps the static [`LocationSpec`] supplied by the
//! driver and adds the runtime state the model mutates every tick: the
//! resident agent count, the conflict flag, the outgoing links, the score
//! tiers, and (when arrival logging is on) the journey lengths of agents
//! that reached this camp during the current tick.
//!
//! # Score tiers
//!
//! | Index | Tier          | Meaning                                                  |
//! |-------|---------------|----------------------------------------------------------|
//! | 0     | constant      | Always 1.0; routing by distance only                     |
//! | 1     | location      | Camp weight if foreign, conflict weight if in conflict   |
//! | 2     | neighbourhood | Inverse-distance average of neighbours' location scores  |
//! | 3     | region        | Inverse-distance average of neighbours' neighbourhood    |
//!
//! Camps and locations without outgoing links take their location score
//! as neighbourhood and region score, but their score vector is never
//! rewritten: it keeps `[1.0; 4]`, so routing treats them by distance.

use flee_types::{AwarenessLevel, LinkId, LocationSpec, SimulationParameters};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Mutable runtime state for a location in the world graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationState {
    /// The static definition; `movechance` and `population` change during a run.
    spec: LocationSpec,
    /// Whether the location is a registered conflict zone.
    conflict: bool,
    /// Derived once at construction from the movement propensity.
    camp: bool,
    /// Agents currently resident (agents on links are not counted here).
    num_agents: u32,
    /// Outgoing links in registration order.
    links: Vec<LinkId>,
    location_score: f64,
    neighbourhood_score: f64,
    region_score: f64,
    /// `[1.0, location, neighbourhood, region]`, indexed by awareness level.
    scores: [f64; 4],
    /// Journey lengths (ticks since departure) of agents arriving this tick.
    incoming_journey_lengths: Vec<u64>,
}

impl LocationState {
    /// Create a new [`LocationState`] from a [`LocationSpec`].
    ///
    /// Starts with no agents, no links, and every score at 1.0. The camp
    /// flag is set when the movement propensity is below 1%.
    pub fn new(spec: LocationSpec) -> Self {
        let camp = spec.is_camp();
        Self {
            spec,
            conflict: false,
            camp,
            num_agents: 0,
            links: Vec::new(),
            location_score: 1.0,
            neighbourhood_score: 1.0,
            region_score: 1.0,
            scores: [1.0; 4],
            incoming_journey_lengths: Vec::new(),
        }
    }

    /// The static definition this location was registered with.
    pub const fn spec(&self) -> &LocationSpec {
        &self.spec
    }

    /// Unique name of this location.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Probability that a resident agent decides to move in a tick.
    pub const fn movechance(&self) -> f64 {
        self.spec.movechance
    }

    /// Override the movement propensity. The camp flag is not re-derived.
    pub const fn set_movechance(&mut self, movechance: f64) {
        self.spec.movechance = movechance;
    }

    /// Remaining non-agent population.
    pub const fn population(&self) -> u64 {
        self.spec.population
    }

    /// Maximum number of agents admitted; `None` means unlimited.
    pub const fn capacity(&self) -> Option<u32> {
        self.spec.capacity
    }

    /// Whether the location lies across a border.
    pub const fn is_foreign(&self) -> bool {
        self.spec.foreign
    }

    /// Whether the location is a registered conflict zone.
    pub const fn is_conflict(&self) -> bool {
        self.conflict
    }

    /// Set or clear the conflict-zone flag.
    pub const fn set_conflict(&mut self, conflict: bool) {
        self.conflict = conflict;
    }

    /// Whether the location is a camp.
    pub const fn is_camp(&self) -> bool {
        self.camp
    }

    /// Number of agents currently resident here.
    pub const fn num_agents(&self) -> u32 {
        self.num_agents
    }

    /// Outgoing links in registration order.
    pub fn links(&self) -> &[LinkId] {
        &self.links
    }

    /// The full score vector, indexed by awareness level.
    pub const fn scores(&self) -> [f64; 4] {
        self.scores
    }

    /// The score tier selected by an awareness level.
    pub const fn score(&self, level: AwarenessLevel) -> f64 {
        match level {
            AwarenessLevel::Road => self.scores[0],
            AwarenessLevel::Location => self.scores[1],
            AwarenessLevel::Neighbourhood => self.scores[2],
            AwarenessLevel::Region => self.scores[3],
        }
    }

    /// Attractiveness based on local information only.
    pub const fn location_score(&self) -> f64 {
        self.location_score
    }

    /// Attractiveness averaged over directly linked neighbours.
    pub const fn neighbourhood_score(&self) -> f64 {
        self.neighbourhood_score
    }

    /// Attractiveness averaged over neighbours' neighbourhoods.
    pub const fn region_score(&self) -> f64 {
        self.region_score
    }

    /// Whether the location has reached its admission limit.
    ///
    /// A location with unlimited capacity never reports full. Otherwise it
    /// is full once its resident count reaches `capacity * capacity_buffer`.
    pub fn is_full(&self, capacity_buffer: f64) -> bool {
        self.spec
            .capacity
            .is_some_and(|cap| f64::from(self.num_agents) >= f64::from(cap) * capacity_buffer)
    }

    /// Count one more resident agent.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if the count overflows.
    pub fn add_agent(&mut self) -> Result<(), WorldError> {
        self.num_agents = self
            .num_agents
            .checked_add(1)
            .ok_or(WorldError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Count one fewer resident agent.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CountUnderflow`] if no agent is resident.
    pub fn remove_agent(&mut self) -> Result<(), WorldError> {
        self.num_agents =
            self.num_agents
                .checked_sub(1)
                .ok_or_else(|| WorldError::CountUnderflow {
                    context: format!("location {:?}", self.spec.name),
                })?;
        Ok(())
    }

    /// Draw one person from the remaining population, if any is left.
    ///
    /// Returns `true` when the population was decremented.
    pub const fn take_from_population(&mut self) -> bool {
        if let Some(remaining) = self.spec.population.checked_sub(1) {
            self.spec.population = remaining;
            true
        } else {
            false
        }
    }

    pub(crate) fn push_link(&mut self, link: LinkId) {
        self.links.push(link);
    }

    pub(crate) fn retain_links(&mut self, mut keep: impl FnMut(LinkId) -> bool) {
        self.links.retain(|id| keep(*id));
    }

    /// Recompute the location tier from local information only.
    ///
    /// Foreign takes precedence over conflict.
    pub const fn update_location_score(&mut self, params: &SimulationParameters) {
        self.location_score = if self.spec.foreign {
            params.camp_weight
        } else if self.conflict {
            params.conflict_weight
        } else {
            1.0
        };
    }

    /// Recompute the neighbourhood tier.
    ///
    /// `neighbours` yields `(neighbour location score, link distance)` for
    /// each outgoing link. Camps and unlinked locations use their own
    /// location score.
    pub fn update_neighbourhood_score(&mut self, neighbours: &[(f64, f64)]) {
        self.neighbourhood_score = self.averaged_or_local(neighbours);
    }

    /// Recompute the region tier and refresh the score vector.
    ///
    /// `neighbours` yields `(neighbour neighbourhood score, link distance)`
    /// for each outgoing link. Camps and unlinked locations only take
    /// their location score as region score; their score vector is left
    /// as it was.
    pub fn update_region_score(&mut self, neighbours: &[(f64, f64)]) {
        if self.uses_local_score() {
            self.region_score = self.location_score;
            return;
        }
        self.region_score = self.averaged_or_local(neighbours);
        self.scores = [
            1.0,
            self.location_score,
            self.neighbourhood_score,
            self.region_score,
        ];
    }

    const fn uses_local_score(&self) -> bool {
        self.links.is_empty() || self.camp
    }

    fn averaged_or_local(&self, neighbours: &[(f64, f64)]) -> f64 {
        if self.uses_local_score() {
            return self.location_score;
        }
        inverse_distance_average(neighbours).unwrap_or(self.location_score)
    }

    /// Record the journey length of an agent arriving here, if this is a camp.
    pub fn record_arrival(&mut self, timesteps_since_departure: u64) {
        if self.camp {
            self.incoming_journey_lengths.push(timesteps_since_departure);
        }
    }

    /// Journey lengths recorded since the last drain.
    pub fn incoming_journey_lengths(&self) -> &[u64] {
        &self.incoming_journey_lengths
    }

    /// Take and reset the journey lengths recorded this tick.
    pub fn drain_journey_lengths(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.incoming_journey_lengths)
    }
}

/// Average of `score / distance` over `samples`, normalized by `1 / distance`.
///
/// Returns `None` when there are no samples.
pub fn inverse_distance_average(samples: &[(f64, f64)]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for &(score, distance) in samples {
        weighted += score / distance;
        total_weight += 1.0 / distance;
    }
    Some(weighted / total_weight)
}
