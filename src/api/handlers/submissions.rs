use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::state::AppState,
    domain::{Document, DocumentKind},
    error::{AppError, Result},
    service::SubmitDocumentRequest,
};

/// Accept one contributed document: metadata fields plus a PDF file, as
/// multipart form data. The upload forms label `semester` as "year", so
/// both field names are accepted.
pub async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>)> {
    let mut title = String::new();
    let mut subject = String::new();
    let mut semester = String::new();
    let mut kind_str = String::new();
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" => title = field.text().await.unwrap_or_default(),
            "subject" => subject = field.text().await.unwrap_or_default(),
            "semester" | "year" => semester = field.text().await.unwrap_or_default(),
            "kind" | "doc_type" => kind_str = field.text().await.unwrap_or_default(),
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let mime_type = field.content_type().unwrap_or("").to_string();
                if let Ok(data) = field.bytes().await {
                    if !data.is_empty() {
                        file = Some((filename, mime_type, data.to_vec()));
                    }
                }
            }
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    let kind = DocumentKind::parse(&kind_str)
        .ok_or_else(|| AppError::Validation(format!("Unknown document kind: {}", kind_str)))?;

    let (filename, mime_type, data) =
        file.ok_or_else(|| AppError::Validation("Please upload a PDF".to_string()))?;

    let document = state
        .service_context
        .submissions
        .submit(
            SubmitDocumentRequest {
                title,
                subject,
                semester,
                kind,
            },
            &filename,
            &mime_type,
            &data,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}
