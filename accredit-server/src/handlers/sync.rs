//! `POST /api/MobileSync`

use crate::error::ServerError;
use crate::server::AppState;
use accredit_core::sync::{self, SyncModel, SyncRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

/// Apply the client's report edits and return a full snapshot.
///
/// Business failures are reported in the snapshot's `Error` field; the
/// status is 201 either way.
pub async fn sync(
    State(state): State<AppState>,
    payload: Result<Json<SyncRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SyncModel>), ServerError> {
    let Json(req) = payload.inspect_err(|e| {
        tracing::info!("sync...request rejected: {}", e);
    })?;

    let model = {
        let mut db = state.storage.db()?;
        sync::synchronize(&mut db, &state.cipher, req)
    };

    if !model.error.is_empty() {
        tracing::warn!(error = %model.error.trim_end(), "sync finished with errors");
    }
    Ok((StatusCode::CREATED, Json(model)))
}
