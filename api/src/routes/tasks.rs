use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::collab::TaskStatus;
use crate::error::AppError;
use crate::routes::assess::AssessResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/tasks/{task_id}", get(get_task))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    pub task_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<AssessResponse>,
}

/// `GET /tasks/{task_id}` — an unknown or not-yet-completed task id is a
/// normal `"pending"` response, not an error.
#[utoipa::path(
    get,
    path = "/tasks/{task_id}",
    params(("task_id" = String, Path, description = "Task id returned by POST /assess/async")),
    responses(
        (status = 200, description = "Task status", body = TaskResponse),
        (status = 400, description = "task_id is not a valid UUID", body = crate::error::ApiError),
    ),
    tag = "assessment"
)]
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let task_id: Uuid = task_id
        .parse()
        .map_err(|_| AppError::Validation("task_id must be a UUID".to_string()))?;

    match state.store.get(&task_id).await {
        Some(record) if record.status == TaskStatus::Completed => Ok(Json(TaskResponse {
            task_id: record.task_id.to_string(),
            status: "completed".to_string(),
            assessment: record.assessment.as_ref().map(AssessResponse::from),
        })),
        _ => Ok(Json(TaskResponse {
            task_id: task_id.to_string(),
            status: "pending".to_string(),
            assessment: None,
        })),
    }
}
