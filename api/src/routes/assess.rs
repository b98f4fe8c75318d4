use std::collections::BTreeSet;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aegis_core::{ActivityEvent, IdentityContext, PrivilegeChange, RiskAssessment, RiskSignal};

use crate::collab::{self, AssessmentJob};
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assess", post(assess))
        .route("/assess/async", post(assess_async))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct IdentityContextRequest {
    pub user_id: String,
    pub device_id: String,
    pub ip: String,
    pub geo: String,
    pub user_agent: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub privileges: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<IdentityContextRequest> for IdentityContext {
    fn from(request: IdentityContextRequest) -> Self {
        Self {
            user_id: request.user_id,
            device_id: request.device_id,
            ip: request.ip,
            geo: request.geo,
            user_agent: request.user_agent,
            session_id: request.session_id,
            roles: request.roles.into_iter().collect(),
            privileges: request.privileges.into_iter().collect(),
            timestamp: request.timestamp,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivityEventRequest {
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

impl From<ActivityEventRequest> for ActivityEvent {
    fn from(request: ActivityEventRequest) -> Self {
        Self {
            timestamp: request.timestamp,
            endpoint: request.endpoint,
            method: request.method,
            status_code: request.status_code,
            latency_ms: request.latency_ms,
            bytes_in: request.bytes_in,
            bytes_out: request.bytes_out,
            service: request.service,
            trace_id: request.trace_id,
            metadata: request.metadata,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PrivilegeChangeRequest {
    #[serde(default)]
    pub previous_roles: Vec<String>,
    #[serde(default)]
    pub new_roles: Vec<String>,
    #[serde(default)]
    pub previous_privileges: Vec<String>,
    #[serde(default)]
    pub new_privileges: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<PrivilegeChangeRequest> for PrivilegeChange {
    fn from(request: PrivilegeChangeRequest) -> Self {
        Self {
            previous_roles: request.previous_roles.into_iter().collect(),
            new_roles: request.new_roles.into_iter().collect(),
            previous_privileges: request.previous_privileges.into_iter().collect(),
            new_privileges: request.new_privileges.into_iter().collect(),
            timestamp: request.timestamp,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssessRequest {
    pub identity: IdentityContextRequest,
    pub event: ActivityEventRequest,
    #[serde(default)]
    pub privilege_change: Option<PrivilegeChangeRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RiskSignalResponse {
    pub name: String,
    pub score: f64,
    pub detail: String,
}

impl From<&RiskSignal> for RiskSignalResponse {
    fn from(signal: &RiskSignal) -> Self {
        Self {
            name: signal.name.as_str().to_string(),
            score: signal.score,
            detail: signal.detail.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssessResponse {
    pub total_score: f64,
    pub action: String,
    pub signals: Vec<RiskSignalResponse>,
    pub account_frozen: bool,
    pub session_invalidated: bool,
}

impl From<&RiskAssessment> for AssessResponse {
    fn from(assessment: &RiskAssessment) -> Self {
        Self {
            total_score: assessment.total_score,
            action: assessment.action.as_str().to_string(),
            signals: assessment.signals.iter().map(RiskSignalResponse::from).collect(),
            account_frozen: assessment.account_frozen,
            session_invalidated: assessment.session_invalidated,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AsyncAssessResponse {
    pub task_id: String,
    pub status: String,
}

fn validate_roles(roles: &BTreeSet<String>) -> Result<(), AppError> {
    if roles.iter().any(|role| role.trim().is_empty()) {
        return Err(AppError::Validation("roles must not contain blank entries".to_string()));
    }
    Ok(())
}

/// `POST /assess` — synchronous assessment.
#[utoipa::path(
    post,
    path = "/assess",
    request_body = AssessRequest,
    responses(
        (status = 200, description = "Assessment computed", body = AssessResponse),
        (status = 400, description = "Malformed request", body = crate::error::ApiError),
    ),
    tag = "assessment"
)]
pub async fn assess(
    State(state): State<AppState>,
    Json(request): Json<AssessRequest>,
) -> Result<impl IntoResponse, AppError> {
    let identity: IdentityContext = request.identity.into();
    validate_roles(&identity.roles)?;
    let event: ActivityEvent = request.event.into();
    let privilege_change: Option<PrivilegeChange> = request.privilege_change.map(Into::into);

    let assessment = state
        .engine
        .assess_event(&identity, &event, privilege_change.as_ref());

    Ok(Json(AssessResponse::from(&assessment)))
}

/// `POST /assess/async` — enqueues the assessment and returns immediately
/// with a task id.
#[utoipa::path(
    post,
    path = "/assess/async",
    request_body = AssessRequest,
    responses(
        (status = 202, description = "Assessment queued", body = AsyncAssessResponse),
        (status = 400, description = "Malformed request", body = crate::error::ApiError),
    ),
    tag = "assessment"
)]
pub async fn assess_async(
    State(state): State<AppState>,
    Json(request): Json<AssessRequest>,
) -> Result<impl IntoResponse, AppError> {
    let identity: IdentityContext = request.identity.into();
    validate_roles(&identity.roles)?;
    let event: ActivityEvent = request.event.into();
    let privilege_change: Option<PrivilegeChange> = request.privilege_change.map(Into::into);

    let task_id = collab::new_task_id();
    state.queue.enqueue(AssessmentJob {
        task_id,
        identity,
        event,
        privilege_change,
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(AsyncAssessResponse {
            task_id: task_id.to_string(),
            status: "queued".to_string(),
        }),
    ))
}
