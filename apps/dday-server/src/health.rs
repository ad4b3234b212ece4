use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Service banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerResponse {
    pub message: String,
    pub version: String,
}

/// Health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "D-Day Backend API".to_string(),
        version: "2.0".to_string(),
    })
}

/// `ok` while the database answers, `unavailable` with 503 otherwise
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let health = state.db.get_pool_health().await;
    debug!(
        pool_size = health.pool_size,
        idle = health.idle_connections,
        max = health.max_connections,
        "Pool health"
    );
    let (code, status) = if health.is_healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
        }),
    )
}
