use axum::{Json, extract::State};
use serde::Serialize;

use crate::domain::blocklist::BlocklistStore;
use crate::server::{AppState, errors::AppError};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub blocked: usize,
}

/// Liveness check. Also proves the store lock can still be taken.
pub async fn health_check<S: BlocklistStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<HealthStatus>, AppError> {
    let blocked = state.blocklist.len().await?;
    Ok(Json(HealthStatus {
        status: "healthy",
        blocked,
    }))
}
