//! Service banner and health probe.

use crate::error::AppError;
use crate::state::AppState;
use crate::WebResult;
use axum::{extract::State, Json};
use serde::Serialize;

/// Banner returned from `GET /`.
#[derive(Debug, Serialize)]
pub struct Banner {
    /// Service name.
    pub message: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Body of a successful health probe.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Overall status.
    pub status: &'static str,
    /// Database connectivity.
    pub database: &'static str,
}

/// `GET /` — welcome banner.
#[allow(clippy::unused_async)]
pub async fn root() -> Json<Banner> {
    Json(Banner {
        message: "Inventory Management API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /health` — probes store connectivity; 503 when unreachable.
pub async fn health(State(state): State<AppState>) -> WebResult<Json<Health>> {
    state
        .store
        .ping()
        .await
        .map_err(|e| AppError::unavailable("Service unavailable").with_source(e.into()))?;
    Ok(Json(Health {
        status: "healthy",
        database: "connected",
    }))
}
