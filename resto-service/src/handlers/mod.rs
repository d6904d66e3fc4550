pub mod audit;
pub mod auth;
pub mod menu;
pub mod order;
pub mod payment;
pub mod preparation;
pub mod role;
pub mod table;
pub mod user;

use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::AppState;

/// Service banner.
///
/// GET /
pub async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": state.config.service_name,
        "version": state.config.service_version,
    }))
}

/// Service health check, including a database ping.
///
/// GET /health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.health_check().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "postgres": "up"
        }
    })))
}
