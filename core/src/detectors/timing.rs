use std::collections::HashMap;

use crate::model::{ActivityEvent, RiskSignal, SignalKind};
use crate::stats::TimingStats;

/// Per-endpoint latency outlier detector, one Welford accumulator
/// per endpoint, lazily created on first reference.
#[derive(Debug, Default)]
pub struct TimingProfiler {
    stats: HashMap<String, TimingStats>,
}

impl TimingProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assess(&mut self, event: &ActivityEvent, sigma_threshold: f64) -> Option<RiskSignal> {
        let stats = self.stats.entry(event.endpoint.clone()).or_default();
        stats.update(event.latency_ms);

        if stats.count < 5 {
            return None;
        }

        let deviation = (event.latency_ms - stats.mean).abs();
        if deviation > sigma_threshold * (stats.stddev() + 1e-6) {
            Some(RiskSignal::new(
                SignalKind::TimingAnomaly,
                15.0,
                format!(
                    "Latency {:.2}ms diverges from mean {:.2}ms",
                    event.latency_ms, stats.mean
                ),
            ))
        } else {
            None
        }
    }
}
