//! Demo scenario: one conflict zone draining into two sinks.
//!
//! `Source` is linked to `Sink1` (10 km) and `Sink2` (5 km). `Source` is
//! registered as a conflict zone and agents are seeded from the
//! conflict-zone registry, drawing its population down as they go.

use flee_core::{Ecosystem, SimulationConfig};
use flee_types::LocationSpec;
use tracing::info;

use crate::error::EngineError;

/// Remaining population of `Source` before seeding.
const SOURCE_POPULATION: u64 = 10_000;

/// Build the demo ecosystem and seed it with the configured agents.
///
/// # Errors
///
/// Returns [`EngineError`] if the parameters are invalid or the graph
/// cannot be built.
pub fn build_demo(config: &SimulationConfig) -> Result<Ecosystem, EngineError> {
    let mut eco = Ecosystem::new(config.parameters.clone(), config.world.seed)?;

    eco.add_location(LocationSpec::new("Source").with_population(SOURCE_POPULATION))?;
    eco.add_location(LocationSpec::new("Sink1"))?;
    eco.add_location(LocationSpec::new("Sink2"))?;

    eco.link_up("Source", "Sink1", 10.0, false)?;
    eco.link_up("Source", "Sink2", 5.0, false)?;

    eco.add_conflict_zone("Source", true)?;
    seed_agents(&mut eco, config.scenario.initial_agents)?;

    info!(
        world_name = config.world.name,
        locations = eco.world().location_count(),
        links = eco.world().link_count(),
        agents = eco.num_agents(),
        conflict_population = eco.conflict_zones().total_population(),
        "Demo scenario built"
    );
    Ok(eco)
}

/// Create `count` agents at population-weighted conflict zones.
///
/// Weights are refreshed after every agent when agents are drawn from the
/// population.
///
/// # Errors
///
/// Returns [`EngineError::NoConflictZones`] if there is nowhere to seed
/// from, or an ecosystem error if seeding fails.
pub fn seed_agents(eco: &mut Ecosystem, count: u32) -> Result<(), EngineError> {
    let refresh = eco.params().take_refugees_from_population;
    for _ in 0..count {
        let source = eco
            .pick_conflict_location()
            .ok_or(EngineError::NoConflictZones { requested: count })?;
        eco.add_agent(source)?;
        if refresh {
            eco.refresh_conflict_weights()?;
        }
    }
    Ok(())
}
