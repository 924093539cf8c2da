//! Directed travel links between locations.
//!
//! A physical road is modelled as two independent [`Link`] values, one per
//! direction, sharing the same distance. Each direction carries its own
//! forced-redirection flag and its own count of agents in transit.

use flee_types::LocationId;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// A directed weighted edge from an implicit source to `endpoint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// Destination of the link.
    endpoint: LocationId,
    /// Length in km; always finite and positive.
    distance: f64,
    /// When set, every departing agent takes this link unless its
    /// destination is full.
    forced_redirection: bool,
    /// Agents currently travelling along the link.
    num_agents: u32,
}

impl Link {
    /// Create a link with no agents in transit.
    ///
    /// Distance validation happens in [`crate::WorldMap::link_up`].
    pub(crate) const fn new(endpoint: LocationId, distance: f64, forced_redirection: bool) -> Self {
        Self {
            endpoint,
            distance,
            forced_redirection,
            num_agents: 0,
        }
    }

    /// Destination location.
    pub const fn endpoint(&self) -> LocationId {
        self.endpoint
    }

    /// Length in km.
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Whether departing agents are forced onto this link.
    pub const fn forced_redirection(&self) -> bool {
        self.forced_redirection
    }

    /// Agents currently in transit.
    pub const fn num_agents(&self) -> u32 {
        self.num_agents
    }

    pub(crate) fn add_agent(&mut self) -> Result<(), WorldError> {
        self.num_agents = self
            .num_agents
            .checked_add(1)
            .ok_or(WorldError::ArithmeticOverflow)?;
        Ok(())
    }

    pub(crate) fn remove_agent(&mut self) -> Result<(), WorldError> {
        self.num_agents =
            self.num_agents
                .checked_sub(1)
                .ok_or_else(|| WorldError::CountUnderflow {
                    context: format!("link to {}", self.endpoint),
                })?;
        Ok(())
    }
}
