//! Enumeration types shared across the workspace.

use serde::{Deserialize, Serialize};

/// Error returned when a raw number does not name an awareness level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("awareness level must be between 0 and 3, got {0}")]
pub struct InvalidAwarenessLevel(pub u8);

/// Which tier of a location's score vector informs route weighting.
///
/// The discriminant is the index into the score vector
/// `[1.0, location, neighbourhood, region]`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum AwarenessLevel {
    /// Ignore endpoint attractiveness; route by distance only.
    Road = 0,
    /// Use the destination's own attractiveness.
    #[default]
    Location = 1,
    /// Use the destination's neighbourhood-averaged attractiveness.
    Neighbourhood = 2,
    /// Use the destination's region-averaged attractiveness.
    Region = 3,
}

impl AwarenessLevel {
    /// Index into a location's score vector.
    pub const fn index(self) -> usize {
        match self {
            Self::Road => 0,
            Self::Location => 1,
            Self::Neighbourhood => 2,
            Self::Region => 3,
        }
    }

    /// Awareness an agent has gained after travelling for `timesteps` ticks.
    ///
    /// Used when dynamic awareness is enabled: agents start out routing by
    /// distance only and learn about regions the longer they are displaced.
    pub const fn from_timesteps(timesteps: u64) -> Self {
        match timesteps {
            0 => Self::Road,
            1 => Self::Location,
            2 | 3 => Self::Neighbourhood,
            _ => Self::Region,
        }
    }
}

impl TryFrom<u8> for AwarenessLevel {
    type Error = InvalidAwarenessLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Road),
            1 => Ok(Self::Location),
            2 => Ok(Self::Neighbourhood),
            3 => Ok(Self::Region),
            other => Err(InvalidAwarenessLevel(other)),
        }
    }
}

impl From<AwarenessLevel> for u8 {
    fn from(level: AwarenessLevel) -> Self {
        match level {
            AwarenessLevel::Road => 0,
            AwarenessLevel::Location => 1,
            AwarenessLevel::Neighbourhood => 2,
            AwarenessLevel::Region => 3,
        }
    }
}
