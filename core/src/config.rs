use chrono::Duration;

use crate::model::Action;

/// Thresholds and window sizes for the risk engine. No hot-reload: the
/// engine binds its config at construction (`Engine::new`).
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub high_risk_threshold: f64,
    pub medium_risk_threshold: f64,
    pub sequence_window: usize,
    pub behavior_window: Duration,
    pub timing_sigma_threshold: f64,
    pub privilege_drift_threshold: usize,
    pub multi_actor_window: Duration,
    pub pivot_depth_threshold: usize,
    pub attack_prediction_contamination: f64,
    pub attack_prediction_score_multiplier: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            high_risk_threshold: 85.0,
            medium_risk_threshold: 60.0,
            sequence_window: 10,
            behavior_window: Duration::hours(24),
            timing_sigma_threshold: 3.0,
            privilege_drift_threshold: 3,
            multi_actor_window: Duration::hours(6),
            pivot_depth_threshold: 4,
            attack_prediction_contamination: 0.08,
            attack_prediction_score_multiplier: 100.0,
        }
    }
}

impl EngineConfig {
    /// `freeze_account` and `force_logout` are mutually exclusive because
    /// `high_risk_threshold >= medium_risk_threshold` is assumed here; a
    /// config that violates that ordering is a caller error, not guarded.
    pub fn evaluate_action(&self, total_score: f64) -> Action {
        if total_score >= self.high_risk_threshold {
            Action::FreezeAccount
        } else if total_score >= self.medium_risk_threshold {
            Action::ForceLogout
        } else {
            Action::Monitor
        }
    }
}
