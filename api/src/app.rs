use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::routes;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Aegis Risk Engine API",
        version = "0.1.0",
        description = "Real-time risk-scoring HTTP surface: synchronous and asynchronous event assessment, and account-lifecycle control."
    ),
    paths(
        routes::health::health_check,
        routes::assess::assess,
        routes::assess::assess_async,
        routes::tasks::get_task,
        routes::accounts::get_summary,
        routes::accounts::freeze,
        routes::accounts::reset_sessions,
    ),
    components(schemas(
        routes::health::HealthResponse,
        routes::assess::IdentityContextRequest,
        routes::assess::ActivityEventRequest,
        routes::assess::PrivilegeChangeRequest,
        routes::assess::AssessRequest,
        routes::assess::RiskSignalResponse,
        routes::assess::AssessResponse,
        routes::assess::AsyncAssessResponse,
        routes::tasks::TaskResponse,
        routes::accounts::BehaviorSummaryResponse,
        routes::accounts::AccountSummaryResponse,
        crate::error::ApiError,
    ))
)]
pub struct ApiDoc;

/// Assembles the full router. Split out from `main` so integration tests
/// can drive it directly with `tower::ServiceExt::oneshot` instead of
/// binding a real listener.
pub fn build(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::assess::router())
        .merge(routes::tasks::router())
        .merge(routes::accounts::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
