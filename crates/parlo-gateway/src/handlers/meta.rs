// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service info and health endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::ApiState;

/// Response body for GET /.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub status: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded".
    pub status: String,
    /// "connected" or the database error text.
    pub database: String,
}

/// GET /
pub async fn get_root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "parlo".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
    })
}

/// GET /health
///
/// Always 200; a database failure is reported in the body.
pub async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    match state.store.health_check().await {
        Ok(()) => Json(HealthResponse {
            status: "healthy".to_string(),
            database: "connected".to_string(),
        }),
        Err(e) => Json(HealthResponse {
            status: "degraded".to_string(),
            database: format!("error: {e}"),
        }),
    }
}
