//! Conflict-zone registry with population-weighted sampling.
//!
//! Each registered zone carries a weight equal to the remaining population
//! of its location at registration time. Seeding code draws source
//! locations for new agents in proportion to these weights and calls
//! [`ConflictZones::refresh`] after drawing population down.

use flee_types::LocationId;
use flee_world::{WorldError, WorldMap};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One registered conflict zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictZone {
    /// The conflict location.
    pub location: LocationId,
    /// Sampling weight, the location's population when last refreshed.
    pub weight: u64,
}

/// Ordered set of conflict zones and their total weight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictZones {
    zones: Vec<ConflictZone>,
    total: u64,
}

impl ConflictZones {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `location` with `weight`.
    ///
    /// Returns `false` without changing anything if the location is already
    /// registered.
    pub fn register(&mut self, location: LocationId, weight: u64) -> bool {
        if self.contains(location) {
            return false;
        }
        self.zones.push(ConflictZone { location, weight });
        self.recompute_total();
        true
    }

    /// Drop `location` from the registry. Returns whether it was present.
    pub fn remove(&mut self, location: LocationId) -> bool {
        let before = self.zones.len();
        self.zones.retain(|z| z.location != location);
        let removed = self.zones.len() != before;
        if removed {
            self.recompute_total();
        }
        removed
    }

    /// Whether `location` is registered.
    pub fn contains(&self, location: LocationId) -> bool {
        self.zones.iter().any(|z| z.location == location)
    }

    /// Reset every weight to its location's current population.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LocationNotFound`] if a zone no longer resolves.
    pub fn refresh(&mut self, world: &WorldMap) -> Result<(), WorldError> {
        for zone in &mut self.zones {
            zone.weight = world.try_location(zone.location)?.population();
        }
        self.recompute_total();
        Ok(())
    }

    /// Draw one zone with probability proportional to its weight.
    ///
    /// Returns `None` when no zone is registered. When every weight is zero
    /// the draw is uniform over the zones.
    pub fn pick(&self, rng: &mut impl Rng) -> Option<LocationId> {
        if self.zones.is_empty() {
            return None;
        }
        if self.total == 0 {
            let index = rng.random_range(0..self.zones.len());
            return self.zones.get(index).map(|z| z.location);
        }

        let roll = rng.random_range(0..self.total);
        let mut cumulative: u64 = 0;
        for zone in &self.zones {
            cumulative = cumulative.saturating_add(zone.weight);
            if roll < cumulative {
                return Some(zone.location);
            }
        }
        self.zones.last().map(|z| z.location)
    }

    /// Sum of all weights.
    pub const fn total_population(&self) -> u64 {
        self.total
    }

    /// Registered zones in registration order.
    pub fn zones(&self) -> &[ConflictZone] {
        &self.zones
    }

    /// Number of registered zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether no zone is registered.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    fn recompute_total(&mut self) {
        self.total = self
            .zones
            .iter()
            .fold(0_u64, |acc, z| acc.saturating_add(z.weight));
    }
}
