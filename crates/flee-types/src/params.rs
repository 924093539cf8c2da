//! Simulation parameters consumed by every component of the model.
//!
//! A [`SimulationParameters`] value is set once before the simulation
//! starts and threaded into the ecosystem at construction. Nothing mutates
//! it afterwards, so independent ecosystems can run side by side with
//! different settings.
//!
//! The YAML representation lives under the `parameters` key of
//! `flee-config.yaml`; every field has a default matching the reference
//! model.

use serde::{Deserialize, Serialize};

use crate::enums::AwarenessLevel;

/// Reason a parameter set was rejected by [`SimulationParameters::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid simulation parameter `{field}`: {reason}")]
pub struct InvalidParameter {
    /// Name of the offending field.
    pub field: &'static str,
    /// What is wrong with its value.
    pub reason: String,
}

/// Tunable constants of the displacement model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Distance-smoothing constant added to every link distance when
    /// weighting routes (default: 0.0).
    pub softening: f64,

    /// Least number of km an agent is expected to cover per tick. Hops
    /// shorter than this allow another decision in the same tick
    /// (default: 25.0).
    pub min_move_speed: f64,

    /// Most number of km an agent can cover per tick (default: 250.0).
    pub max_move_speed: f64,

    /// Attraction factor applied to foreign locations (default: 2.0).
    pub camp_weight: f64,

    /// Attraction factor applied to conflict zones (default: 0.25).
    pub conflict_weight: f64,

    /// Multiplier on location capacity before a location reports full
    /// (default: 1.0).
    pub capacity_buffer: f64,

    /// Static awareness level used for route weighting (default: 1).
    pub awareness_level: AwarenessLevel,

    /// Derive the awareness level from ticks since departure instead of
    /// using [`Self::awareness_level`] (default: false).
    pub use_dynamic_awareness: bool,

    /// Draw each new agent from its location's remaining population
    /// (default: true).
    pub take_refugees_from_population: bool,

    /// Track per-agent cumulative distance and places visited (default: false).
    pub log_agent_travel: bool,

    /// Collect per-tick camp arrival counts and mean journey durations
    /// (default: false).
    pub log_camp_arrivals: bool,

    /// Report location and conflict-zone registration at `info` level
    /// instead of `debug` (default: false).
    pub log_init: bool,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            softening: 0.0,
            min_move_speed: 25.0,
            max_move_speed: 250.0,
            camp_weight: 2.0,
            conflict_weight: 0.25,
            capacity_buffer: 1.0,
            awareness_level: AwarenessLevel::Location,
            use_dynamic_awareness: false,
            take_refugees_from_population: true,
            log_agent_travel: false,
            log_camp_arrivals: false,
            log_init: false,
        }
    }
}

impl SimulationParameters {
    /// Check that every numeric parameter is usable by the model.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<(), InvalidParameter> {
        let finite = [
            ("softening", self.softening),
            ("min_move_speed", self.min_move_speed),
            ("max_move_speed", self.max_move_speed),
            ("camp_weight", self.camp_weight),
            ("conflict_weight", self.conflict_weight),
            ("capacity_buffer", self.capacity_buffer),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("must be finite, got {value}")));
            }
            if value < 0.0 {
                return Err(invalid(field, format!("must not be negative, got {value}")));
            }
        }

        if self.max_move_speed <= 0.0 {
            return Err(invalid("max_move_speed", "must be positive".to_owned()));
        }
        if self.min_move_speed > self.max_move_speed {
            return Err(invalid(
                "min_move_speed",
                format!(
                    "must not exceed max_move_speed ({} > {})",
                    self.min_move_speed, self.max_move_speed
                ),
            ));
        }
        if self.capacity_buffer <= 0.0 {
            return Err(invalid("capacity_buffer", "must be positive".to_owned()));
        }
        Ok(())
    }

    /// The awareness level to route with after `timesteps_since_departure` ticks.
    pub const fn awareness_for(&self, timesteps_since_departure: u64) -> AwarenessLevel {
        if self.use_dynamic_awareness {
            AwarenessLevel::from_timesteps(timesteps_since_departure)
        } else {
            self.awareness_level
        }
    }
}

const fn invalid(field: &'static str, reason: String) -> InvalidParameter {
    InvalidParameter { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = SimulationParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.awareness_level, AwarenessLevel::Location);
        assert!(params.take_refugees_from_population);
    }

    #[test]
    fn min_speed_above_max_rejected() {
        let params = SimulationParameters {
            min_move_speed: 300.0,
            ..SimulationParameters::default()
        };
        let err = params.validate();
        assert_eq!(err.map_err(|e| e.field), Err("min_move_speed"));
    }

    #[test]
    fn zero_max_speed_rejected() {
        let params = SimulationParameters {
            min_move_speed: 0.0,
            max_move_speed: 0.0,
            ..SimulationParameters::default()
        };
        assert_eq!(params.validate().map_err(|e| e.field), Err("max_move_speed"));
    }

    #[test]
    fn nan_rejected() {
        let params = SimulationParameters {
            camp_weight: f64::NAN,
            ..SimulationParameters::default()
        };
        assert_eq!(params.validate().map_err(|e| e.field), Err("camp_weight"));
    }

    #[test]
    fn negative_buffer_rejected() {
        let params = SimulationParameters {
            capacity_buffer: -1.0,
            ..SimulationParameters::default()
        };
        assert_eq!(params.validate().map_err(|e| e.field), Err("capacity_buffer"));
    }

    #[test]
    fn static_awareness_ignores_time() {
        let params = SimulationParameters {
            awareness_level: AwarenessLevel::Region,
            ..SimulationParameters::default()
        };
        assert_eq!(params.awareness_for(0), AwarenessLevel::Region);
    }

    #[test]
    fn dynamic_awareness_follows_time() {
        let params = SimulationParameters {
            use_dynamic_awareness: true,
            ..SimulationParameters::default()
        };
        assert_eq!(params.awareness_for(0), AwarenessLevel::Road);
        assert_eq!(params.awareness_for(5), AwarenessLevel::Region);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: Result<SimulationParameters, _> =
            serde_json::from_str(r#"{"max_move_speed": 100.0, "awareness_level": 3}"#);
        assert!(params.is_ok());
        if let Ok(p) = params {
            assert!((p.max_move_speed - 100.0).abs() < f64::EPSILON);
            assert_eq!(p.awareness_level, AwarenessLevel::Region);
            assert!((p.min_move_speed - 25.0).abs() < f64::EPSILON);
        }
    }
}
