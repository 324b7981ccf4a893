use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::reading::{NewReading, Snapshot};
use crate::readings::store::ReadingStore;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StoredResponse {
    pub message: &'static str,
}

/// GET /data
/// Latest snapshot, or `null` when nothing has been recorded yet.
pub async fn handle_get_latest(
    State(state): State<AppState>,
) -> Result<Json<Option<Snapshot>>, AppError> {
    info!("GET /data");
    let latest = state.store.latest().await.map_err(AppError::StoreRead)?;
    Ok(Json(latest))
}

/// POST /data
pub async fn handle_post_reading(
    State(state): State<AppState>,
    Json(reading): Json<NewReading>,
) -> Result<Json<StoredResponse>, AppError> {
    info!("POST /data");
    debug!(?reading, "ingesting reading");

    state
        .store
        .insert(&reading)
        .await
        .map_err(AppError::StoreWrite)?;

    Ok(Json(StoredResponse {
        message: "reading stored",
    }))
}
