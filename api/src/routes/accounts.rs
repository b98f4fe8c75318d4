use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts/{user_id}/summary", get(get_summary))
        .route("/accounts/{user_id}/freeze", post(freeze))
        .route("/accounts/{user_id}/reset-sessions", post(reset_sessions))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BehaviorSummaryResponse {
    pub request_rate: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountSummaryResponse {
    pub frozen: bool,
    pub active_sessions: Vec<String>,
    pub behavior: BehaviorSummaryResponse,
    pub recent_sequence: Vec<String>,
}

impl From<aegis_core::AccountSummary> for AccountSummaryResponse {
    fn from(summary: aegis_core::AccountSummary) -> Self {
        Self {
            frozen: summary.frozen,
            active_sessions: summary.active_sessions,
            behavior: BehaviorSummaryResponse {
                request_rate: summary.behavior.request_rate,
            },
            recent_sequence: summary.recent_sequence,
        }
    }
}

/// `GET /accounts/{user_id}/summary`.
#[utoipa::path(
    get,
    path = "/accounts/{user_id}/summary",
    params(("user_id" = String, Path)),
    responses((status = 200, description = "Account summary", body = AccountSummaryResponse)),
    tag = "accounts"
)]
pub async fn get_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    Json(AccountSummaryResponse::from(state.engine.summary(&user_id)))
}

/// `POST /accounts/{user_id}/freeze`.
#[utoipa::path(
    post,
    path = "/accounts/{user_id}/freeze",
    params(("user_id" = String, Path)),
    responses((status = 200, description = "Account frozen", body = AccountSummaryResponse)),
    tag = "accounts"
)]
pub async fn freeze(State(state): State<AppState>, Path(user_id): Path<String>) -> impl IntoResponse {
    state.engine.freeze_account(&user_id);
    Json(AccountSummaryResponse::from(state.engine.summary(&user_id)))
}

/// `POST /accounts/{user_id}/reset-sessions`.
#[utoipa::path(
    post,
    path = "/accounts/{user_id}/reset-sessions",
    params(("user_id" = String, Path)),
    responses((status = 200, description = "Sessions reset", body = AccountSummaryResponse)),
    tag = "accounts"
)]
pub async fn reset_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    state.engine.reset_sessions(&user_id);
    Json(AccountSummaryResponse::from(state.engine.summary(&user_id)))
}
