use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::PendingDocument,
    error::Result,
    service::ReconcileReport,
};

/// Review queue: every pending document, oldest first.
pub async fn list_pending(
    State(state): State<AppState>,
) -> Result<Json<Vec<PendingDocument>>> {
    let pending = state.service_context.moderation.list_pending().await?;
    Ok(Json(pending))
}

pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    state.service_context.moderation.approve(id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    state.service_context.moderation.reject(id).await?;
    Ok(Json(json!({ "success": true })))
}

/// On-demand sweep for blobs whose record never landed (or whose deletion
/// half-failed).
pub async fn reconcile(State(state): State<AppState>) -> Result<Json<ReconcileReport>> {
    let report = state.service_context.moderation.reconcile().await?;
    Ok(Json(report))
}
