use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};

use crate::model::{ActivityEvent, RiskSignal, SignalKind};

/// A sliding window of a user's recent events, bounded by wall-clock
/// duration rather than count, plus a running per-endpoint count over the
/// same window.
#[derive(Debug)]
struct BehaviorProfile {
    window: Duration,
    events: VecDeque<ActivityEvent>,
    endpoint_counts: HashMap<String, u64>,
}

impl BehaviorProfile {
    fn new(window: Duration) -> Self {
        Self {
            window,
            events: VecDeque::new(),
            endpoint_counts: HashMap::new(),
        }
    }

    fn observe(&mut self, event: ActivityEvent) {
        *self.endpoint_counts.entry(event.endpoint.clone()).or_insert(0) += 1;
        let now = event.timestamp;
        self.events.push_back(event);
        self.trim(now);
    }

    fn trim(&mut self, now: DateTime<Utc>) {
        while let Some(front) = self.events.front() {
            if now - front.timestamp > self.window {
                let old = self.events.pop_front().unwrap();
                if let Some(count) = self.endpoint_counts.get_mut(&old.endpoint) {
                    *count -= 1;
                    if *count == 0 {
                        self.endpoint_counts.remove(&old.endpoint);
                    }
                }
            } else {
                break;
            }
        }
    }

    fn request_rate(&self) -> f64 {
        let Some(first) = self.events.front() else {
            return 0.0;
        };
        let last = self.events.back().unwrap();
        let window_seconds = (last.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0;
        self.events.len() as f64 / window_seconds.max(1.0)
    }

    fn endpoint_skew(&self, endpoint: &str) -> f64 {
        let total: u64 = self.endpoint_counts.values().sum();
        let total = total.max(1) as f64;
        *self.endpoint_counts.get(endpoint).unwrap_or(&0) as f64 / total
    }
}

/// Per-user request-rate surge and endpoint-skew spike detector.
#[derive(Debug, Default)]
pub struct BehaviorAnomalyDetector {
    profiles: HashMap<String, BehaviorProfile>,
}

impl BehaviorAnomalyDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assess(
        &mut self,
        user_id: &str,
        event: &ActivityEvent,
        window: Duration,
    ) -> Option<RiskSignal> {
        let profile = self
            .profiles
            .entry(user_id.to_string())
            .or_insert_with(|| BehaviorProfile::new(window));

        let rate_before = profile.request_rate();
        let skew_before = profile.endpoint_skew(&event.endpoint);

        profile.observe(event.clone());

        let rate_after = profile.request_rate();
        let skew_after = profile.endpoint_skew(&event.endpoint);

        let surge = (rate_after - rate_before) / (rate_before + 0.01);
        if surge > 2.0 {
            return Some(RiskSignal::new(
                SignalKind::BehaviorRateAnomaly,
                (20.0 * surge).min(40.0),
                format!("Request rate surged by {surge:.2}x for user {user_id}"),
            ));
        }

        let spike = skew_after - skew_before;
        if spike > 0.3 && skew_after > 0.5 {
            return Some(RiskSignal::new(
                SignalKind::BehaviorEndpointAnomaly,
                25.0,
                format!("Endpoint {} suddenly dominates traffic for user {user_id}", event.endpoint),
            ));
        }

        None
    }

    /// Current request rate for a user, for `summary()`. `0.0` if unseen.
    pub fn request_rate(&self, user_id: &str) -> f64 {
        self.profiles
            .get(user_id)
            .map(BehaviorProfile::request_rate)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_at(offset_secs: i64, endpoint: &str) -> ActivityEvent {
        ActivityEvent {
            timestamp: DateTime::UNIX_EPOCH + Duration::seconds(offset_secs),
            endpoint: endpoint.to_string(),
            method: "GET".to_string(),
            status_code: 200,
            latency_ms: 50.0,
            bytes_in: 0,
            bytes_out: 0,
            service: "svc".to_string(),
            trace_id: "t".to_string(),
            metadata: Default::default(),
        }
    }

    #[test]
    fn no_signal_on_steady_traffic() {
        let mut detector = BehaviorAnomalyDetector::new();
        let window = Duration::hours(24);
        for i in 0..10 {
            let signal = detector.assess("u", &event_at(i * 60, "/a"), window);
            assert!(signal.is_none(), "unexpected signal at iteration {i}");
        }
    }

    #[test]
    fn rate_surge_emits_behavior_rate_anomaly() {
        let mut detector = BehaviorAnomalyDetector::new();
        let window = Duration::hours(24);
        // Establish a slow baseline rate (one request per 600s).
        for i in 0..5 {
            detector.assess("u", &event_at(i * 600, "/a"), window);
        }
        // Then a burst of fast requests.
        let mut signal = None;
        for i in 0..20 {
            signal = detector.assess("u", &event_at(3000 + i, "/a"), window);
            if signal.is_some() {
                break;
            }
        }
        let signal = signal.expect("expected a rate surge signal");
        assert_eq!(signal.name, SignalKind::BehaviorRateAnomaly);
        assert!(signal.score <= 40.0);
    }

    #[test]
    fn window_trims_events_older_than_behavior_window() {
        let mut detector = BehaviorAnomalyDetector::new();
        let window = Duration::hours(1);
        detector.assess("u", &event_at(0, "/a"), window);
        detector.assess("u", &event_at(3 * 3600, "/a"), window);
        let profile = detector.profiles.get("u").unwrap();
        assert_eq!(profile.events.len(), 1);
    }
}
