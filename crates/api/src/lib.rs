use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use restock_core::advisor;
use restock_core::artifacts::ArtifactBundle;
use restock_core::domain::request::RecommendationRequest;
use restock_core::explain::ExplanationMode;

#[derive(Debug, Clone)]
pub struct AppState {
    pub artifacts: Arc<ArtifactBundle>,
    pub explanation_mode: ExplanationMode,
}

/// Build the full router. Shared by the binary and the black-box tests so
/// both exercise the same middleware stack.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/recommend", post(recommend))
        .with_state(state)
        // Browser dashboards call this API from arbitrary origins.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendationRequest>,
) -> Response {
    match advisor::recommend(&state.artifacts, &req, state.explanation_mode) {
        Ok(rec) => Json(rec).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "recommendation rejected");
            json_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "incompatible_request",
                format!("{err:#}"),
            )
        }
    }
}

fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
