//! Per-tick camp arrival statistics.

use flee_world::JourneyTally;
use serde::{Deserialize, Serialize};

/// Camp arrivals aggregated over one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrivalStats {
    /// Tick the arrivals happened in (0-indexed, before the clock advanced).
    pub tick: u64,
    /// Number of agents that reached a camp.
    pub arrivals: u64,
    /// Mean journey length in ticks, 0.0 when there were no arrivals.
    pub mean_duration: f64,
}

impl ArrivalStats {
    /// Summarize a tally collected during `tick`.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_tally(tick: u64, tally: JourneyTally) -> Self {
        let mean_duration = if tally.arrivals == 0 {
            0.0
        } else {
            tally.total_ticks as f64 / tally.arrivals as f64
        };
        Self {
            tick,
            arrivals: tally.arrivals,
            mean_duration,
        }
    }
}

/// History of per-tick arrival statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrivalLog {
    history: Vec<ArrivalStats>,
}

impl ArrivalLog {
    /// Append the statistics of one tick.
    pub fn push(&mut self, stats: ArrivalStats) {
        self.history.push(stats);
    }

    /// Statistics of the most recent tick.
    pub fn latest(&self) -> Option<&ArrivalStats> {
        self.history.last()
    }

    /// All recorded ticks, oldest first.
    pub fn history(&self) -> &[ArrivalStats] {
        &self.history
    }

    /// Arrival counts, one per recorded tick.
    pub fn num_arrivals(&self) -> Vec<u64> {
        self.history.iter().map(|s| s.arrivals).collect()
    }

    /// Mean journey lengths, one per recorded tick.
    pub fn travel_durations(&self) -> Vec<f64> {
        self.history.iter().map(|s| s.mean_duration).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_arrivals_mean_is_zero() {
        let stats = ArrivalStats::from_tally(3, JourneyTally::default());
        assert_eq!(stats.arrivals, 0);
        assert!(stats.mean_duration.abs() < f64::EPSILON);
    }

    #[test]
    fn mean_is_total_over_count() {
        let tally = JourneyTally {
            arrivals: 4,
            total_ticks: 10,
        };
        let stats = ArrivalStats::from_tally(0, tally);
        assert!((stats.mean_duration - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn log_keeps_history() {
        let mut log = ArrivalLog::default();
        assert!(log.latest().is_none());
        log.push(ArrivalStats::from_tally(0, JourneyTally::default()));
        log.push(ArrivalStats::from_tally(
            1,
            JourneyTally {
                arrivals: 2,
                total_ticks: 2,
            },
        ));
        assert_eq!(log.num_arrivals(), vec![0, 2]);
        let durations = log.travel_durations();
        assert_eq!(durations.len(), 2);
        assert!((durations.iter().sum::<f64>() - 1.0).abs() < f64::EPSILON);
        assert_eq!(log.latest().map(|s| s.tick), Some(1));
    }

    #[test]
    fn stats_serialize_with_field_names() {
        let stats = ArrivalStats::from_tally(
            5,
            JourneyTally {
                arrivals: 1,
                total_ticks: 3,
            },
        );
        let json = serde_json::to_value(stats);
        assert!(json.is_ok());
        let Ok(json) = json else { return };
        assert_eq!(json["tick"], 5);
        assert_eq!(json["arrivals"], 1);
        assert_eq!(json["mean_duration"], 3.0);
    }
}
