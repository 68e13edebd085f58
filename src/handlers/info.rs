//! Banner, liveness and readiness.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct BannerBody {
    pub message: String,
    pub version: String,
    pub environment: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthBody {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadyBody {
    pub status: String,
    pub database: String,
}

#[utoipa::path(get, path = "/", tag = "service", responses((status = 200, description = "Service banner", body = BannerBody)))]
pub async fn root(State(state): State<AppState>) -> Json<BannerBody> {
    let s = &state.settings;
    Json(BannerBody {
        message: format!("Welcome to {}", s.api_title),
        version: s.api_version.clone(),
        environment: s.environment().to_string(),
    })
}

#[utoipa::path(get, path = "/health", tag = "service", responses((status = 200, description = "Process is alive", body = HealthBody)))]
pub async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "healthy".into(),
        version: state.settings.api_version.clone(),
    })
}

#[utoipa::path(
    get,
    path = "/ready",
    tag = "service",
    responses(
        (status = 200, description = "Database reachable", body = ReadyBody),
        (status = 503, description = "Database unreachable", body = ReadyBody),
    )
)]
pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadyBody>, (StatusCode, Json<ReadyBody>)> {
    if let Err(e) = state.store.ping().await {
        tracing::warn!(error = %e, "readiness check failed");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded".into(),
                database: "unavailable".into(),
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok".into(),
        database: "connected".into(),
    }))
}
