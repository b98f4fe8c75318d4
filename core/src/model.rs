use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Endpoint prefixes treated as administratively sensitive for `risk_surface`.
const ADMIN_LIKE_PREFIXES: [&str; 4] = ["/admin", "/export", "/internal", "/elevate"];

/// One observed request against a user-facing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub method: String,
    pub status_code: u16,
    pub latency_ms: f64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub service: String,
    pub trace_id: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ActivityEvent {
    /// `1` if the endpoint looks administratively sensitive, plus the response
    /// volume in megabytes capped at 5. Not currently consumed by a detector
    /// directly, but exposed because callers (summaries, webhooks) surface it.
    pub fn risk_surface(&self) -> f64 {
        let admin_score = if ADMIN_LIKE_PREFIXES
            .iter()
            .any(|prefix| self.endpoint.starts_with(prefix))
        {
            1.0
        } else {
            0.0
        };
        let volume_score = (self.bytes_out as f64 / 1_000_000.0).min(5.0);
        admin_score + volume_score
    }
}

/// The actor making a request, as resolved by the authentication layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityContext {
    pub user_id: String,
    pub device_id: String,
    pub ip: String,
    pub geo: String,
    pub user_agent: String,
    #[serde(default)]
    pub session_id: Option<String>,
    pub roles: BTreeSet<String>,
    pub privileges: BTreeSet<String>,
    pub timestamp: DateTime<Utc>,
}

/// An atomic role/privilege delta applied to an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegeChange {
    pub previous_roles: BTreeSet<String>,
    pub new_roles: BTreeSet<String>,
    pub previous_privileges: BTreeSet<String>,
    pub new_privileges: BTreeSet<String>,
    pub timestamp: DateTime<Utc>,
}

/// Closed set of detector findings. The wire representation (snake_case) is
/// load-bearing: it is what callers match on, so renames here are breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    PrivilegeEscalation,
    PrivilegeDrift,
    MultiActorDetection,
    BehaviorRateAnomaly,
    BehaviorEndpointAnomaly,
    ApiSequenceAnomaly,
    TimingAnomaly,
    MicroservicePivot,
    SharedIpRisk,
    DeviceSprawl,
    MlAttackPrediction,
}

impl SignalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalKind::PrivilegeEscalation => "privilege_escalation",
            SignalKind::PrivilegeDrift => "privilege_drift",
            SignalKind::MultiActorDetection => "multi_actor_detection",
            SignalKind::BehaviorRateAnomaly => "behavior_rate_anomaly",
            SignalKind::BehaviorEndpointAnomaly => "behavior_endpoint_anomaly",
            SignalKind::ApiSequenceAnomaly => "api_sequence_anomaly",
            SignalKind::TimingAnomaly => "timing_anomaly",
            SignalKind::MicroservicePivot => "microservice_pivot",
            SignalKind::SharedIpRisk => "shared_ip_risk",
            SignalKind::DeviceSprawl => "device_sprawl",
            SignalKind::MlAttackPrediction => "ml_attack_prediction",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detector finding: a named, scored, human-readable contribution to the
/// total risk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSignal {
    pub name: SignalKind,
    pub score: f64,
    pub detail: String,
}

impl RiskSignal {
    pub fn new(name: SignalKind, score: f64, detail: impl Into<String>) -> Self {
        Self {
            name,
            score,
            detail: detail.into(),
        }
    }
}

/// The enforcement action an assessment drives, selected purely by total
/// score against two ordered thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Monitor,
    ForceLogout,
    FreezeAccount,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Monitor => "monitor",
            Action::ForceLogout => "force_logout",
            Action::FreezeAccount => "freeze_account",
        }
    }
}

/// Output of `assess_event`: the aggregate score, the signals that produced
/// it in evaluation order, and the account-lifecycle side effects applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub total_score: f64,
    pub signals: Vec<RiskSignal>,
    pub action: Action,
    pub account_frozen: bool,
    pub session_invalidated: bool,
}

/// One live session for an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: String,
    pub device_id: String,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub ip: String,
}

/// Per-user account record. `frozen` is monotonic: nothing in the engine
/// clears it once set. `sessions` is cleared only by `reset_sessions` or by
/// `force_logout`'s single-session invalidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountState {
    pub user_id: String,
    pub sessions: HashMap<String, SessionState>,
    pub frozen: bool,
    pub privilege_history: Vec<PrivilegeChange>,
    pub last_fingerprint: Option<String>,
}

impl AccountState {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            sessions: HashMap::new(),
            frozen: false,
            privilege_history: Vec::new(),
            last_fingerprint: None,
        }
    }

    /// Distinct devices seen across currently-active sessions.
    pub fn active_devices(&self) -> BTreeSet<String> {
        self.sessions
            .values()
            .map(|session| session.device_id.clone())
            .collect()
    }

    pub fn update_session(&mut self, session: SessionState) {
        self.last_fingerprint = Some(session.device_id.clone());
        self.sessions.insert(session.session_id.clone(), session);
    }

    /// No-op if `session_id` names no live session — in particular an empty
    /// id, which `assess_event` never assigns but `force_logout` may pass
    /// when the identity carried no `session_id`.
    pub fn expire_session(&mut self, session_id: &str) {
        self.sessions.remove(session_id);
    }
}
