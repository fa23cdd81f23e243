use axum::{extract::State, routing::get, Json, Router};

use crate::schemas::HealthCheck;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health_check", get(health_check))
}

/// Liveness report. Does not touch the database.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheck> {
    Json(HealthCheck {
        mode: state.settings.mode,
        version: state.settings.app_version.clone(),
        status: "OK".to_string(),
    })
}
