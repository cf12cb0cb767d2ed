//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use core_kernel::{AdapterHealth, HealthCheckResult};

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub version: String,
    pub adapters: Vec<HealthCheckResult>,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check (includes adapter health)
///
/// Only the storage adapter gates readiness. The notifier is best-effort by
/// contract, so an unconfigured or broken email provider must not take the
/// submission path out of rotation.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let adapters = state.service.adapter_health().await;

    // adapter_health reports storage first
    let storage_down = adapters
        .first()
        .map(|check| check.status == AdapterHealth::Unhealthy)
        .unwrap_or(true);

    let response = ReadinessResponse {
        status: if storage_down { "not_ready" } else { "ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        adapters,
    };

    if storage_down {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    } else {
        Ok(Json(response))
    }
}
