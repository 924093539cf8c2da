//! Tick callback that logs the per-location population report.

use flee_core::{Ecosystem, TickCallback, TickSummary};
use tracing::info;

/// Logs every location's resident agent count after each tick.
pub struct ReportCallback;

impl TickCallback for ReportCallback {
    fn on_tick(&mut self, summary: &TickSummary, ecosystem: &Ecosystem) {
        info!(
            time = ecosystem.time(),
            agents = ecosystem.num_agents(),
            "Population report"
        );
        for row in ecosystem.population_report() {
            info!(tick = summary.tick, location = %row.name, agents = row.num_agents);
        }
        if let Some(arrivals) = summary.camp_arrivals {
            info!(
                tick = summary.tick,
                arrivals = arrivals.arrivals,
                mean_duration = arrivals.mean_duration,
                "Camp arrivals"
            );
        }
    }
}
