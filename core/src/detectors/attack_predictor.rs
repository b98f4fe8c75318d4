use std::collections::HashSet;

use crate::model::{ActivityEvent, RiskSignal, SignalKind};
use crate::stats::FeatureStats;

/// Lightweight statistical anomaly detector over engineered sequence
/// features. Self-bootstraps: becomes trained the first time it
/// observes a `fit` batch or a baseline sample fed by the engine.
#[derive(Debug)]
pub struct AttackSequencePredictor {
    score_multiplier: f64,
    threshold: f64,
    is_trained: bool,
    stats: FeatureStats,
}

impl AttackSequencePredictor {
    pub fn new(contamination: f64, score_multiplier: f64) -> Self {
        Self {
            score_multiplier,
            threshold: contamination.max(0.05) * 6.0,
            is_trained: false,
            stats: FeatureStats::default(),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.is_trained
    }

    pub fn fit<'a, I>(&mut self, sequences: I)
    where
        I: IntoIterator<Item = &'a [ActivityEvent]>,
    {
        for sequence in sequences {
            self.stats.update(&featurize(sequence));
        }
        self.is_trained = self.stats.count > 0;
    }

    pub fn update_baseline(&mut self, sequence: &[ActivityEvent]) {
        self.stats.update(&featurize(sequence));
        self.is_trained = self.stats.count > 0;
    }

    pub fn score(&self, sequence: &[ActivityEvent]) -> Option<RiskSignal> {
        if !self.is_trained {
            return None;
        }
        let vector = featurize(sequence);
        let stddevs = self.stats.stddev();
        let budget: f64 = vector
            .iter()
            .zip(self.stats.mean.iter())
            .zip(stddevs.iter())
            .map(|((value, mean), stddev)| {
                let z = (value - mean).abs() / stddev;
                (z - self.threshold).max(0.0)
            })
            .sum();

        if budget <= 0.0 {
            return None;
        }

        Some(RiskSignal::new(
            SignalKind::MlAttackPrediction,
            (budget * self.score_multiplier).min(30.0),
            "Statistical model flags attack-like sequence",
        ))
    }
}

/// `[len, admin_hits, status_errors, unique_services, avg_latency_ms, max_bytes_out]`.
fn featurize(sequence: &[ActivityEvent]) -> Vec<f64> {
    let admin_hits = sequence
        .iter()
        .filter(|e| e.endpoint.contains("/admin") || e.endpoint.contains("export"))
        .count();
    let status_errors = sequence.iter().filter(|e| e.status_code >= 400).count();
    let unique_services: HashSet<&str> = sequence.iter().map(|e| e.service.as_str()).collect();
    let avg_latency = if sequence.is_empty() {
        0.0
    } else {
        sequence.iter().map(|e| e.latency_ms).sum::<f64>() / sequence.len() as f64
    };
    let max_bytes_out = sequence.iter().map(|e| e.bytes_out).max().unwrap_or(0);

    vec![
        sequence.len() as f64,
        admin_hits as f64,
        status_errors as f64,
        unique_services.len() as f64,
        avg_latency,
        max_bytes_out as f64,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn event(endpoint: &str, status: u16, latency: f64, bytes_out: u64, service: &str) -> ActivityEvent {
        ActivityEvent {
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            endpoint: endpoint.to_string(),
            method: "GET".to_string(),
            status_code: status,
            latency_ms: latency,
            bytes_in: 0,
            bytes_out,
            service: service.to_string(),
            trace_id: "t".to_string(),
            metadata: Default::default(),
        }
    }

    #[test]
    fn untrained_predictor_is_silent() {
        let predictor = AttackSequencePredictor::new(0.08, 100.0);
        let sequence = vec![event("/a", 200, 100.0, 100, "svc")];
        assert!(predictor.score(&sequence).is_none());
    }

    #[test]
    fn update_baseline_trains_the_predictor() {
        let mut predictor = AttackSequencePredictor::new(0.08, 100.0);
        assert!(!predictor.is_trained());
        predictor.update_baseline(&[event("/a", 200, 100.0, 100, "svc")]);
        assert!(predictor.is_trained());
    }

    #[test]
    fn wildly_different_sequence_flags_after_baseline() {
        let mut predictor = AttackSequencePredictor::new(0.08, 100.0);
        let baseline: Vec<ActivityEvent> = (0..3)
            .map(|_| event("/profile", 200, 100.0, 200, "profile"))
            .collect();
        for _ in 0..10 {
            predictor.update_baseline(&baseline);
        }

        let attack_like: Vec<ActivityEvent> = (0..3)
            .map(|_| event("/admin/export", 500, 5000.0, 5_000_000, "reporting"))
            .collect();
        let signal = predictor.score(&attack_like);
        let signal = signal.expect("an attack-like sequence should score");
        assert_eq!(signal.name, SignalKind::MlAttackPrediction);
        assert!(signal.score <= 30.0);
    }

    #[test]
    fn featurize_handles_empty_sequence() {
        assert_eq!(
            featurize(&[]),
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
    }
}
