//! Liveness endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::application::ElicitationContext;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: String,
    pub model: String,
}

/// GET /health
pub async fn health(State(context): State<ElicitationContext>) -> Json<HealthResponse> {
    let info = context.provider_info();
    Json(HealthResponse {
        status: "ok",
        provider: info.name.clone(),
        model: info.model.clone(),
    })
}
