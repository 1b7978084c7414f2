use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{Document, DocumentKind, DocumentStatus},
    error::{AppError, Result},
    repository::DocumentRepository,
    storage::{sanitize_filename, BlobStore, DOCUMENTS_BUCKET},
};

/// Maximum accepted upload size (10 MiB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// The only accepted media type for document uploads.
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitDocumentRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Subject must not be empty"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Year must not be empty"))]
    pub semester: String,
    pub kind: DocumentKind,
}

/// Creates contributed documents. The single place that decides a new
/// record starts out unpublished: `status` is always forced to `Pending`
/// here, never taken from the caller.
pub struct SubmissionService {
    document_repo: Arc<dyn DocumentRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl SubmissionService {
    pub fn new(
        document_repo: Arc<dyn DocumentRepository>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            document_repo,
            blob_store,
        }
    }

    /// Validate and store one submission: blob first, then the record in
    /// `Pending` state. The record id is generated up front and prefixes
    /// the blob key, so a retried submission overwrites its own blob
    /// instead of stacking duplicates.
    pub async fn submit(
        &self,
        request: SubmitDocumentRequest,
        filename: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Result<Document> {
        // All validation happens before any store call.
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if mime_type != PDF_MIME {
            return Err(AppError::Validation(
                "Only PDF files are allowed".to_string(),
            ));
        }

        if data.is_empty() {
            return Err(AppError::Validation("File is empty".to_string()));
        }

        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::Validation(
                "File size must be under 10MB".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        let file_path = format!("{}-{}", id, sanitize_filename(filename));

        self.blob_store
            .put(DOCUMENTS_BUCKET, &file_path, data)
            .await?;

        let now = Utc::now();
        let document = Document {
            id,
            title: request.title,
            subject: request.subject,
            semester: request.semester,
            kind: request.kind,
            file_path: file_path.clone(),
            status: DocumentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        match self.document_repo.create(document).await {
            Ok(created) => {
                tracing::info!(
                    id = %created.id,
                    kind = created.kind.as_str(),
                    "submission stored, pending review"
                );
                Ok(created)
            }
            Err(e) => {
                // The blob landed but the record did not. Reclaim it now if
                // possible; the reconciliation sweep covers the rest.
                if let Err(del_err) = self.blob_store.delete(DOCUMENTS_BUCKET, &file_path).await {
                    tracing::warn!(
                        key = %file_path,
                        error = %del_err,
                        "failed to clean up blob after record insert failure"
                    );
                }
                Err(e)
            }
        }
    }
}
