//! The [`Ecosystem`]: one self-contained simulation instance.
//!
//! An ecosystem owns the world graph, every agent, the conflict-zone
//! registry, the clock, the arrival log, and the random number generator.
//! Setup code builds it in a fixed order (locations, links, conflict
//! zones, agents) and then calls [`Ecosystem::evolve`] once per tick.
//!
//! Nothing in here is global: two ecosystems built with the same
//! parameters, seed, and construction sequence produce identical runs.

use flee_agents::Person;
use flee_types::{
    AgentId, InvalidParameter, LinkId, LocationId, LocationReport, LocationSpec,
    SimulationParameters,
};
use flee_world::{WorldError, WorldMap};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use crate::arrivals::{ArrivalLog, ArrivalStats};
use crate::clock::SimulationClock;
use crate::conflict::ConflictZones;
use crate::tick::{self, TickError, TickSummary};

/// Errors raised while building or querying an ecosystem.
#[derive(Debug, thiserror::Error)]
pub enum EcosystemError {
    /// The parameter set was rejected.
    #[error("invalid parameters: {source}")]
    InvalidParameters {
        /// The rejected parameter.
        #[from]
        source: InvalidParameter,
    },

    /// A world-graph operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// A single simulation instance.
#[derive(Debug)]
pub struct Ecosystem {
    pub(crate) params: SimulationParameters,
    pub(crate) world: WorldMap,
    /// Agents in creation order; the tick processes them in this order.
    pub(crate) agents: Vec<Person>,
    pub(crate) conflict_zones: ConflictZones,
    pub(crate) clock: SimulationClock,
    pub(crate) arrivals: ArrivalLog,
    pub(crate) rng: StdRng,
}

impl Ecosystem {
    /// Create an empty ecosystem.
    ///
    /// # Errors
    ///
    /// Returns [`EcosystemError::InvalidParameters`] if `params` fails
    /// validation.
    pub fn new(params: SimulationParameters, seed: u64) -> Result<Self, EcosystemError> {
        params.validate()?;
        debug!(seed, ?params, "Ecosystem created");
        Ok(Self {
            params,
            world: WorldMap::new(),
            agents: Vec::new(),
            conflict_zones: ConflictZones::new(),
            clock: SimulationClock::new(),
            arrivals: ArrivalLog::default(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    // ---- Graph construction ----

    /// Register a location and return its handle.
    ///
    /// # Errors
    ///
    /// Returns [`EcosystemError::World`] if the name is already taken.
    pub fn add_location(&mut self, spec: LocationSpec) -> Result<LocationId, EcosystemError> {
        let id = self.world.add_location(spec)?;
        let spec = self.world.try_location(id)?.spec();
        if self.params.log_init {
            info!(%id, name = %spec.name, x = spec.x, y = spec.y, movechance = spec.movechance,
                capacity = ?spec.capacity, population = spec.population, foreign = spec.foreign,
                "Location added");
        } else {
            debug!(%id, name = %spec.name, x = spec.x, y = spec.y, movechance = spec.movechance,
                capacity = ?spec.capacity, population = spec.population, foreign = spec.foreign,
                "Location added");
        }
        Ok(id)
    }

    /// Connect two named locations in both directions.
    ///
    /// `forced_redirection` applies to the `from -> to` direction only.
    ///
    /// # Errors
    ///
    /// Returns [`EcosystemError::World`] if a name is unknown or the
    /// distance is not positive.
    pub fn link_up(
        &mut self,
        from: &str,
        to: &str,
        distance: f64,
        forced_redirection: bool,
    ) -> Result<(LinkId, LinkId), EcosystemError> {
        Ok(self.world.link_up(from, to, distance, forced_redirection)?)
    }

    /// Close the `from -> to` direction of a road, as at a border closure.
    ///
    /// Agents already travelling on the closed link still arrive. Returns
    /// how many links were closed.
    ///
    /// # Errors
    ///
    /// Returns [`EcosystemError::World`] if a name is unknown.
    pub fn remove_link(&mut self, from: &str, to: &str) -> Result<usize, EcosystemError> {
        let removed = self.world.remove_links(from, to)?;
        info!(from, to, removed, "Link closed");
        Ok(removed)
    }

    // ---- Conflict zones ----

    /// Mark a named location as a conflict zone weighted by its population.
    ///
    /// With `change_movechance` the location's movechance is forced to 1.0.
    /// Returns `false` if the zone was already registered, in which case
    /// nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`EcosystemError::World`] if the name is unknown.
    pub fn add_conflict_zone(
        &mut self,
        name: &str,
        change_movechance: bool,
    ) -> Result<bool, EcosystemError> {
        let id = self.world.resolve(name)?;
        if self.conflict_zones.contains(id) {
            debug!(name, "Conflict zone already registered");
            return Ok(false);
        }

        let location = self.world.try_location_mut(id)?;
        location.set_conflict(true);
        if change_movechance {
            location.set_movechance(1.0);
        }
        let population = location.population();
        self.conflict_zones.register(id, population);

        let total = self.conflict_zones.total_population();
        if self.params.log_init {
            info!(name, population, total, "Conflict zone added");
        } else {
            debug!(name, population, total, "Conflict zone added");
        }
        Ok(true)
    }

    /// Drop a named location from the conflict-zone registry and clear its
    /// conflict flag. Returns whether it was registered.
    ///
    /// # Errors
    ///
    /// Returns [`EcosystemError::World`] if the name is unknown.
    pub fn remove_conflict_zone(&mut self, name: &str) -> Result<bool, EcosystemError> {
        let id = self.world.resolve(name)?;
        if !self.conflict_zones.remove(id) {
            return Ok(false);
        }
        self.world.try_location_mut(id)?.set_conflict(false);
        info!(
            name,
            total = self.conflict_zones.total_population(),
            "Conflict zone removed"
        );
        Ok(true)
    }

    /// Draw a conflict zone with probability proportional to its weight.
    pub fn pick_conflict_location(&mut self) -> Option<LocationId> {
        self.conflict_zones.pick(&mut self.rng)
    }

    /// Resynchronize conflict weights with live populations.
    ///
    /// # Errors
    ///
    /// Returns [`EcosystemError::World`] if a zone no longer resolves.
    pub fn refresh_conflict_weights(&mut self) -> Result<(), EcosystemError> {
        self.conflict_zones.refresh(&self.world)?;
        Ok(())
    }

    /// The conflict-zone registry.
    pub const fn conflict_zones(&self) -> &ConflictZones {
        &self.conflict_zones
    }

    // ---- Agents ----

    /// Create an agent resident at `location`.
    ///
    /// When `take_refugees_from_population` is set, the location's remaining
    /// population drops by one if any is left.
    ///
    /// # Errors
    ///
    /// Returns [`EcosystemError::World`] if the location does not exist.
    pub fn add_agent(&mut self, location: LocationId) -> Result<AgentId, EcosystemError> {
        self.world.place_agent(location)?;
        if self.params.take_refugees_from_population {
            let _ = self.world.try_location_mut(location)?.take_from_population();
        }

        let id = AgentId::new(self.agents.len());
        self.agents
            .push(Person::new(id, location, self.params.log_agent_travel));
        trace!(agent = %id, %location, "Agent added");
        Ok(id)
    }

    /// Total number of agents.
    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    /// All agents in creation order.
    pub fn agents(&self) -> &[Person] {
        &self.agents
    }

    /// Look up one agent.
    pub fn agent(&self, id: AgentId) -> Option<&Person> {
        self.agents.get(id.index())
    }

    // ---- Stepping ----

    /// Recompute the score cascade without advancing time.
    pub fn update_scores(&mut self) {
        self.world.update_scores(&self.params);
    }

    /// Advance the simulation by one tick.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if graph bookkeeping breaks or the clock
    /// overflows.
    pub fn evolve(&mut self) -> Result<TickSummary, TickError> {
        tick::run_tick(self)
    }

    // ---- Queries ----

    /// Number of completed ticks.
    pub const fn time(&self) -> u64 {
        self.clock.tick()
    }

    /// The parameters this ecosystem was built with.
    pub const fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// The world graph.
    pub const fn world(&self) -> &WorldMap {
        &self.world
    }

    /// Resident agents at a location.
    pub fn location_agent_count(&self, id: LocationId) -> Option<u32> {
        self.world.location(id).map(flee_world::LocationState::num_agents)
    }

    /// Resident agents at a named location.
    ///
    /// # Errors
    ///
    /// Returns [`EcosystemError::World`] if the name is unknown.
    pub fn agents_at(&self, name: &str) -> Result<u32, EcosystemError> {
        let id = self.world.resolve(name)?;
        Ok(self.world.try_location(id)?.num_agents())
    }

    /// Agents at locations plus agents on links. Equals
    /// [`Ecosystem::num_agents`] whenever the bookkeeping is consistent.
    pub fn agents_accounted_for(&self) -> u64 {
        self.world
            .agents_at_locations()
            .saturating_add(self.world.agents_on_links())
    }

    /// Resident agent counts for every location in registration order.
    pub fn population_report(&self) -> Vec<LocationReport> {
        self.world.report()
    }

    /// Camp arrival statistics of the last tick, when arrival logging is on.
    pub fn latest_arrivals(&self) -> Option<&ArrivalStats> {
        self.arrivals.latest()
    }

    /// Camp arrival statistics of every tick so far.
    pub const fn arrivals(&self) -> &ArrivalLog {
        &self.arrivals
    }
}
