use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    api::state::AppState,
    domain::{DocumentKind, PublishedDocument},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    pub kind: String,
}

/// Public listing: approved documents of the requested kind, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListDocumentsQuery>,
) -> Result<Json<Vec<PublishedDocument>>> {
    let kind = DocumentKind::parse(&params.kind)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown document kind: {}", params.kind)))?;

    let documents = state.service_context.catalog.list_documents(kind).await;

    Ok(Json(documents))
}
