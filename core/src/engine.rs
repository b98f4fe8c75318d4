use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::detectors::{
    ApiSequenceModel, AttackSequencePredictor, BehaviorAnomalyDetector, GraphModel,
    IdentityFingerprinter, PivotTracker, PrivilegeMonitor, TimingProfiler,
};
use crate::model::{
    AccountState, Action, ActivityEvent, IdentityContext, PrivilegeChange, RiskAssessment,
    SessionState,
};

/// All mutable per-user/global detector state, guarded by a single mutex.
/// Detector evaluation for one `assess_event` call holds this lock for its
/// whole duration, which is what gives the engine its total-order guarantee
/// for a fixed user_id and its mutual exclusion across different users.
struct EngineState {
    accounts: HashMap<String, AccountState>,
    behavior: BehaviorAnomalyDetector,
    sequence_model: ApiSequenceModel,
    timing: TimingProfiler,
    privileges: PrivilegeMonitor,
    pivots: PivotTracker,
    graph: GraphModel,
    fingerprinter: IdentityFingerprinter,
    attack_predictor: AttackSequencePredictor,
    recent_sequences: HashMap<String, VecDeque<ActivityEvent>>,
}

impl EngineState {
    fn new(config: &EngineConfig) -> Self {
        Self {
            accounts: HashMap::new(),
            behavior: BehaviorAnomalyDetector::new(),
            sequence_model: ApiSequenceModel::new(),
            timing: TimingProfiler::new(),
            privileges: PrivilegeMonitor::new(config.privilege_drift_threshold),
            pivots: PivotTracker::new(),
            graph: GraphModel::new(),
            fingerprinter: IdentityFingerprinter::new(),
            attack_predictor: AttackSequencePredictor::new(
                config.attack_prediction_contamination,
                config.attack_prediction_score_multiplier,
            ),
            recent_sequences: HashMap::new(),
        }
    }

    fn get_account(&mut self, user_id: &str) -> &mut AccountState {
        self.accounts
            .entry(user_id.to_string())
            .or_insert_with(|| AccountState::new(user_id))
    }
}

/// Per-user summary, as consumed by `GET /accounts/{user_id}/summary`.
#[derive(Debug, Clone, Serialize)]
pub struct BehaviorSummary {
    pub request_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub frozen: bool,
    pub active_sessions: Vec<String>,
    pub behavior: BehaviorSummary,
    pub recent_sequence: Vec<String>,
}

/// The risk-scoring orchestrator. Maintains the account table, invokes
/// detectors in a fixed order, aggregates their signals, and
/// drives the account-lifecycle side effects of the resulting action.
pub struct Engine {
    config: EngineConfig,
    state: Mutex<EngineState>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let state = EngineState::new(&config);
        Self {
            config,
            state: Mutex::new(state),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Pre-train the attack predictor before serving traffic.
    pub fn bootstrap_model(&self, baseline_sequences: &[Vec<ActivityEvent>]) {
        if baseline_sequences.is_empty() {
            return;
        }
        let mut state = self.state.lock().unwrap();
        state
            .attack_predictor
            .fit(baseline_sequences.iter().map(Vec::as_slice));
    }

    pub fn assess_event(
        &self,
        identity: &IdentityContext,
        event: &ActivityEvent,
        privilege_change: Option<&PrivilegeChange>,
    ) -> RiskAssessment {
        let mut state = self.state.lock().unwrap();
        let state = &mut *state;

        // 1. Upsert the session and refresh the account's fingerprint hint.
        let session_id = identity
            .session_id
            .clone()
            .unwrap_or_else(|| format!("session-{}", identity.user_id));
        {
            let account = state.get_account(&identity.user_id);
            account.update_session(SessionState {
                session_id: session_id.clone(),
                device_id: identity.device_id.clone(),
                created_at: identity.timestamp,
                last_seen: identity.timestamp,
                ip: identity.ip.clone(),
            });
        }

        // 2. Run detectors in fixed order.
        let mut signals = Vec::new();

        if let Some(signal) = state
            .fingerprinter
            .detect_multi_actor(identity, self.config.multi_actor_window)
        {
            signals.push(signal);
        }

        if let Some(signal) =
            state
                .behavior
                .assess(&identity.user_id, event, self.config.behavior_window)
        {
            signals.push(signal);
        }

        if let Some(signal) =
            state
                .sequence_model
                .score(&identity.user_id, event, self.config.sequence_window)
        {
            signals.push(signal);
        }

        if let Some(signal) = state.timing.assess(event, self.config.timing_sigma_threshold) {
            signals.push(signal);
        }

        {
            let account = state.get_account(&identity.user_id);
            let privilege_signals = state.privileges.assess(account, privilege_change);
            signals.extend(privilege_signals);
        }

        if let Some(signal) = state.pivots.assess(event, self.config.pivot_depth_threshold) {
            signals.push(signal);
        }

        if let Some(signal) = state.graph.assess(&identity.user_id, &identity.ip, &identity.device_id) {
            signals.push(signal);
        }

        // 3. Update the recent-sequence queue and self-bootstrap the
        //    predictor from it if untrained, then score the current window.
        let queue = state
            .recent_sequences
            .entry(identity.user_id.clone())
            .or_default();
        queue.push_back(event.clone());
        if queue.len() > self.config.sequence_window {
            queue.pop_front();
        }
        let bootstrap_size = (self.config.sequence_window / 2).max(3);
        if !state.attack_predictor.is_trained() && queue.len() >= bootstrap_size {
            let sample: Vec<ActivityEvent> = queue.iter().cloned().collect();
            state.attack_predictor.update_baseline(&sample);
        }
        let sample: Vec<ActivityEvent> = state
            .recent_sequences
            .get(&identity.user_id)
            .unwrap()
            .iter()
            .cloned()
            .collect();
        if let Some(signal) = state.attack_predictor.score(&sample) {
            signals.push(signal);
        }

        // 4-5. Aggregate and select an action.
        let total_score: f64 = signals.iter().map(|s| s.score).sum();
        let action = self.config.evaluate_action(total_score);

        let mut assessment = RiskAssessment {
            total_score,
            signals,
            action,
            account_frozen: false,
            session_invalidated: false,
        };

        // 6. Side effects.
        let account = state.get_account(&identity.user_id);
        match action {
            Action::FreezeAccount => {
                account.frozen = true;
                assessment.account_frozen = true;
                tracing::warn!(user_id = %identity.user_id, score = total_score, "account frozen");
            }
            Action::ForceLogout => {
                let expired = identity.session_id.as_deref().unwrap_or("");
                account.expire_session(expired);
                assessment.session_invalidated = true;
                tracing::info!(user_id = %identity.user_id, score = total_score, "session invalidated");
            }
            Action::Monitor => {}
        }

        assessment
    }

    pub fn freeze_account(&self, user_id: &str) {
        let mut state = self.state.lock().unwrap();
        state.get_account(user_id).frozen = true;
    }

    pub fn reset_sessions(&self, user_id: &str) {
        let mut state = self.state.lock().unwrap();
        state.get_account(user_id).sessions.clear();
    }

    pub fn summary(&self, user_id: &str) -> AccountSummary {
        let mut state = self.state.lock().unwrap();
        let frozen = state.get_account(user_id).frozen;
        let mut active_sessions: Vec<String> =
            state.get_account(user_id).sessions.keys().cloned().collect();
        active_sessions.sort();
        let request_rate = state.behavior.request_rate(user_id);
        let recent_sequence = state.sequence_model.recent_sequence(user_id);

        AccountSummary {
            frozen,
            active_sessions,
            behavior: BehaviorSummary { request_rate },
            recent_sequence,
        }
    }
}
