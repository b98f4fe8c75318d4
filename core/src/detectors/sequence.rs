use std::collections::{HashMap, VecDeque};

use crate::model::{ActivityEvent, RiskSignal, SignalKind};

/// Per-user first-order endpoint transition model. The transition
/// table is process-global but keyed by `(prev_endpoint)`; per-user state is
/// just the bounded recent-path queue.
#[derive(Debug, Default)]
pub struct ApiSequenceModel {
    transitions: HashMap<String, HashMap<String, u64>>,
    recent_paths: HashMap<String, VecDeque<String>>,
}

impl ApiSequenceModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn observe(&mut self, user_id: &str, event: &ActivityEvent, window: usize) {
        let path = self.recent_paths.entry(user_id.to_string()).or_default();
        if let Some(prev) = path.back() {
            *self
                .transitions
                .entry(prev.clone())
                .or_default()
                .entry(event.endpoint.clone())
                .or_insert(0) += 1;
        }
        path.push_back(event.endpoint.clone());
        if path.len() > window {
            path.pop_front();
        }
    }

    pub fn score(
        &mut self,
        user_id: &str,
        event: &ActivityEvent,
        window: usize,
    ) -> Option<RiskSignal> {
        let path = self.recent_paths.entry(user_id.to_string()).or_default();
        let Some(prev) = path.back().cloned() else {
            self.observe(user_id, event, window);
            return None;
        };

        let next_counts = self.transitions.get(&prev);
        let total: u64 = next_counts.map(|m| m.values().sum()).unwrap_or(0);
        let total_floor = total.max(1) as f64;
        let hits = next_counts
            .and_then(|m| m.get(&event.endpoint))
            .copied()
            .unwrap_or(0);
        let probability = hits as f64 / total_floor;

        self.observe(user_id, event, window);

        if probability < 0.05 && total >= 2 {
            Some(RiskSignal::new(
                SignalKind::ApiSequenceAnomaly,
                30.0,
                format!("Unexpected transition from {prev} to {}", event.endpoint),
            ))
        } else {
            None
        }
    }

    /// Recent endpoint path for a user, in oldest-first order, for `summary()`.
    pub fn recent_sequence(&self, user_id: &str) -> Vec<String> {
        self.recent_paths
            .get(user_id)
            .map(|path| path.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn event(endpoint: &str) -> ActivityEvent {
        ActivityEvent {
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            endpoint: endpoint.to_string(),
            method: "GET".to_string(),
            status_code: 200,
            latency_ms: 10.0,
            bytes_in: 0,
            bytes_out: 0,
            service: "svc".to_string(),
            trace_id: "t".to_string(),
            metadata: Default::default(),
        }
    }

    #[test]
    fn first_event_observes_without_signal() {
        let mut model = ApiSequenceModel::new();
        assert!(model.score("u", &event("/a"), 10).is_none());
        assert_eq!(model.recent_sequence("u"), vec!["/a".to_string()]);
    }

    #[test]
    fn rare_transition_emits_signal_once_baseline_exists() {
        let mut model = ApiSequenceModel::new();
        // Build up a strong prior: /a -> /a repeatedly.
        model.score("u", &event("/a"), 10);
        for _ in 0..10 {
            model.score("u", &event("/a"), 10);
        }
        let signal = model.score("u", &event("/zzz-unexpected"), 10);
        let signal = signal.expect("rare transition should be flagged");
        assert_eq!(signal.name, SignalKind::ApiSequenceAnomaly);
        assert_eq!(signal.score, 30.0);
    }

    #[test]
    fn queue_never_exceeds_capacity() {
        let mut model = ApiSequenceModel::new();
        for i in 0..50 {
            model.score("u", &event(&format!("/e{i}")), 10);
        }
        assert!(model.recent_sequence("u").len() <= 10);
    }
}
