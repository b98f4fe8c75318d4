use std::collections::HashMap;

use crate::model::{ActivityEvent, RiskSignal, SignalKind};

/// Per-trace distinct-service-depth detector: flags a request trace
/// that has pivoted across enough distinct microservices to look like
/// lateral movement.
#[derive(Debug, Default)]
pub struct PivotTracker {
    traces: HashMap<String, Vec<String>>,
}

impl PivotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assess(&mut self, event: &ActivityEvent, depth_threshold: usize) -> Option<RiskSignal> {
        let trace = self.traces.entry(event.trace_id.clone()).or_default();
        trace.push(event.service.clone());

        let mut seen = std::collections::HashSet::new();
        let unique_services: Vec<&String> = trace.iter().filter(|s| seen.insert(*s)).collect();

        if unique_services.len() >= depth_threshold {
            Some(RiskSignal::new(
                SignalKind::MicroservicePivot,
                18.0,
                format!(
                    "Trace {} pivoted across {} services",
                    event.trace_id,
                    unique_services.len()
                ),
            ))
        } else {
            None
        }
    }
}
