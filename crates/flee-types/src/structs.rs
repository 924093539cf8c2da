//! Core entity structs shared between the world graph and its callers.

use serde::{Deserialize, Serialize};

/// Movement propensity below which a location is treated as a camp.
pub const CAMP_MOVECHANCE_THRESHOLD: f64 = 0.01;

/// Default movement propensity for a newly registered location.
pub const DEFAULT_MOVECHANCE: f64 = 0.1;

/// Static definition of a settlement, camp, or conflict zone.
///
/// This is the identity a driver supplies when registering a location.
/// Runtime state (agent counts, scores, outgoing links) is layered on top
/// by the world graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSpec {
    /// Unique name within an ecosystem.
    pub name: String,
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Probability in `[0, 1]` that a resident agent decides to move each tick.
    pub movechance: f64,
    /// Maximum number of agents admitted; `None` means unlimited.
    pub capacity: Option<u32>,
    /// Remaining non-agent population.
    pub population: u64,
    /// Whether the location lies across a border (scored as a camp).
    pub foreign: bool,
}

impl LocationSpec {
    /// A location with the given name and default properties: origin
    /// coordinates, movechance 0.1, unlimited capacity, no population,
    /// domestic.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            y: 0.0,
            movechance: DEFAULT_MOVECHANCE,
            capacity: None,
            population: 0,
            foreign: false,
        }
    }

    /// Set the coordinates.
    #[must_use]
    pub const fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the movement propensity.
    #[must_use]
    pub const fn with_movechance(mut self, movechance: f64) -> Self {
        self.movechance = movechance;
        self
    }

    /// Set a finite capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the non-agent population.
    #[must_use]
    pub const fn with_population(mut self, population: u64) -> Self {
        self.population = population;
        self
    }

    /// Mark the location as foreign.
    #[must_use]
    pub const fn foreign(mut self) -> Self {
        self.foreign = true;
        self
    }

    /// Whether this definition describes a camp (movechance below 1%).
    pub fn is_camp(&self) -> bool {
        self.movechance < CAMP_MOVECHANCE_THRESHOLD
    }
}

/// One row of a per-location population report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationReport {
    /// Location name.
    pub name: String,
    /// Agents currently resident at the location.
    pub num_agents: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let spec = LocationSpec::new("Sink")
            .at(1.5, -2.0)
            .with_movechance(0.3)
            .with_capacity(40)
            .with_population(1000)
            .foreign();
        assert_eq!(spec.name, "Sink");
        assert_eq!(spec.capacity, Some(40));
        assert_eq!(spec.population, 1000);
        assert!(spec.foreign);
        assert!((spec.x - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn low_movechance_is_camp() {
        assert!(LocationSpec::new("Camp").with_movechance(0.001).is_camp());
        assert!(!LocationSpec::new("Town").is_camp());
        assert!(!LocationSpec::new("Edge").with_movechance(0.01).is_camp());
    }
}
