use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use tokio_util::io::ReaderStream;

use crate::{
    api::state::AppState,
    error::{AppError, Result},
    storage::{ANNOUNCEMENTS_BUCKET, DOCUMENTS_BUCKET},
};

/// Serve a public blob. The path shape matches the hosted store the
/// listing clients were originally written against:
/// `/storage/v1/object/public/{bucket}/{key}`.
pub async fn serve_blob(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<Response> {
    if bucket != DOCUMENTS_BUCKET && bucket != ANNOUNCEMENTS_BUCKET {
        return Err(AppError::NotFound(format!("Unknown bucket: {}", bucket)));
    }

    // Generated keys are single path segments; anything deeper is not ours.
    if key.contains('/') {
        return Err(AppError::NotFound("Object not found".to_string()));
    }

    let reader = state
        .service_context
        .blob_store
        .open(&bucket, &key)
        .await?;

    let stream = ReaderStream::new(reader);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&bucket, &key))
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

fn content_type_for(bucket: &str, key: &str) -> &'static str {
    if bucket == DOCUMENTS_BUCKET {
        return "application/pdf";
    }
    match key.rsplit('.').next() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
