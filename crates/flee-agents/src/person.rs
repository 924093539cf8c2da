//! Agent identity, position, and travel counters.
//!
//! A [`Person`] is either resident at a location or part-way along a link.
//! The two cases are an explicit [`Position`] enum: counts for residents
//! are attributed to the location, counts for travellers to the link,
//! until the traveller arrives.

use flee_types::{AgentId, LinkId, LocationId};
use serde::{Deserialize, Serialize};

/// Default health of a newly created person.
pub const DEFAULT_HEALTH: f64 = 1.0;

/// Default age of a newly created person.
pub const DEFAULT_AGE: u32 = 35;

/// Where an agent currently is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Position {
    /// Resident at a location.
    AtLocation(LocationId),
    /// Travelling along a link.
    OnLink {
        /// The link being traversed.
        link: LinkId,
        /// Movement budget accumulated on this link, in km.
        progress: f64,
    },
}

/// Optional cumulative travel counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelLog {
    /// Total length of completed links, in km.
    pub distance_travelled: f64,
    /// Locations visited, the home location included.
    pub places_travelled: u32,
}

impl Default for TravelLog {
    fn default() -> Self {
        Self {
            distance_travelled: 0.0,
            places_travelled: 1,
        }
    }
}

/// One displaced person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    id: AgentId,
    /// Carried for downstream models; unused by movement.
    pub health: f64,
    /// Carried for downstream models; unused by movement.
    pub injured: bool,
    /// Carried for downstream models; unused by movement.
    pub age: u32,
    home_location: LocationId,
    pub(crate) position: Position,
    /// Ticks since the first movement decision. Never reset on arrival.
    pub(crate) timesteps_since_departure: u64,
    pub(crate) travel_log: Option<TravelLog>,
}

impl Person {
    /// Create a person resident at `location`.
    ///
    /// The caller is responsible for counting the person at the location.
    /// When `track_travel` is set the person keeps a [`TravelLog`].
    pub fn new(id: AgentId, location: LocationId, track_travel: bool) -> Self {
        Self {
            id,
            health: DEFAULT_HEALTH,
            injured: false,
            age: DEFAULT_AGE,
            home_location: location,
            position: Position::AtLocation(location),
            timesteps_since_departure: 0,
            travel_log: track_travel.then(TravelLog::default),
        }
    }

    /// This person's identifier.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// The location the person was created at.
    pub const fn home_location(&self) -> LocationId {
        self.home_location
    }

    /// Current position.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// The location the person is resident at, or `None` while travelling.
    pub const fn location(&self) -> Option<LocationId> {
        match self.position {
            Position::AtLocation(loc) => Some(loc),
            Position::OnLink { .. } => None,
        }
    }

    /// The link the person is travelling on, if any.
    pub const fn link(&self) -> Option<LinkId> {
        match self.position {
            Position::AtLocation(_) => None,
            Position::OnLink { link, .. } => Some(link),
        }
    }

    /// Whether the person is currently on a link.
    pub const fn is_travelling(&self) -> bool {
        matches!(self.position, Position::OnLink { .. })
    }

    /// Ticks elapsed since the person first decided whether to move.
    pub const fn timesteps_since_departure(&self) -> u64 {
        self.timesteps_since_departure
    }

    /// Cumulative travel counters, when tracking is enabled.
    pub const fn travel_log(&self) -> Option<&TravelLog> {
        self.travel_log.as_ref()
    }
}
