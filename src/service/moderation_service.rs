use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{Announcement, AnnouncementCategory, PendingDocument},
    error::{AppError, Result},
    repository::{AnnouncementRepository, DocumentRepository},
    storage::{sanitize_filename, BlobStore, ANNOUNCEMENTS_BUCKET, DOCUMENTS_BUCKET},
};

/// Image types accepted for announcement attachments.
const ALLOWED_IMAGE_MIMES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Maximum announcement image size (10 MiB).
const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// How long an unreferenced blob must have sat in storage before the sweep
/// will remove it. Shields uploads whose record insert is still in flight.
const RECONCILE_GRACE_HOURS: i64 = 1;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAnnouncement {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
    pub category: AnnouncementCategory,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<AnnouncementCategory>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub removed_blobs: u64,
}

/// Privileged write side of the moderation console: state transitions on
/// documents, announcement management, and the orphaned-blob sweep. Only
/// reachable through admin-authenticated routes.
pub struct ModerationService {
    document_repo: Arc<dyn DocumentRepository>,
    announcement_repo: Arc<dyn AnnouncementRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl ModerationService {
    pub fn new(
        document_repo: Arc<dyn DocumentRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            document_repo,
            announcement_repo,
            blob_store,
        }
    }

    /// Pending documents, oldest first, with view URLs for review.
    pub async fn list_pending(&self) -> Result<Vec<PendingDocument>> {
        let documents = self.document_repo.list_pending().await?;

        Ok(documents
            .into_iter()
            .map(|d| PendingDocument {
                url: self.blob_store.public_url(DOCUMENTS_BUCKET, &d.file_path),
                id: d.id,
                title: d.title,
                subject: d.subject,
                semester: d.semester,
                kind: d.kind,
                file_path: d.file_path,
                created_at: d.created_at,
            })
            .collect())
    }

    /// Publish a document. Approving an already-approved id is a no-op.
    pub async fn approve(&self, id: Uuid) -> Result<()> {
        self.document_repo.approve(id).await?;
        tracing::info!(id = %id, "document approved");
        Ok(())
    }

    /// Reject a pending document: remove the record, then its blob. The
    /// record goes first so no listing can ever reference a half-deleted
    /// entry; a failed blob delete is logged and left to the sweep.
    pub async fn reject(&self, id: Uuid) -> Result<()> {
        let document = self
            .document_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

        self.document_repo.delete(id).await?;

        if let Err(e) = self
            .blob_store
            .delete(DOCUMENTS_BUCKET, &document.file_path)
            .await
        {
            tracing::warn!(
                id = %id,
                key = %document.file_path,
                error = %e,
                "blob deletion failed during reject, leaving to reconcile sweep"
            );
        }

        tracing::info!(id = %id, "document rejected and removed");
        Ok(())
    }

    /// Garbage-collect blobs no record references. A blob younger than the
    /// grace period is skipped: its record insert may not have landed yet.
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        self.reconcile_with_grace(Duration::hours(RECONCILE_GRACE_HOURS))
            .await
    }

    pub async fn reconcile_with_grace(&self, grace: Duration) -> Result<ReconcileReport> {
        let mut removed = 0u64;
        let cutoff = Utc::now() - grace;

        let document_paths: HashSet<String> =
            self.document_repo.list_file_paths().await?.into_iter().collect();
        removed += self
            .sweep_bucket(DOCUMENTS_BUCKET, &document_paths, cutoff)
            .await?;

        let image_paths: HashSet<String> =
            self.announcement_repo.list_image_paths().await?.into_iter().collect();
        removed += self
            .sweep_bucket(ANNOUNCEMENTS_BUCKET, &image_paths, cutoff)
            .await?;

        tracing::info!(removed_blobs = removed, "reconciliation sweep complete");
        Ok(ReconcileReport {
            removed_blobs: removed,
        })
    }

    async fn sweep_bucket(
        &self,
        bucket: &str,
        referenced: &HashSet<String>,
        cutoff: chrono::DateTime<Utc>,
    ) -> Result<u64> {
        let mut removed = 0u64;

        for entry in self.blob_store.list(bucket).await? {
            if referenced.contains(&entry.key) || entry.modified > cutoff {
                continue;
            }
            match self.blob_store.delete(bucket, &entry.key).await {
                Ok(()) => {
                    tracing::debug!(bucket = bucket, key = %entry.key, "orphaned blob removed");
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!(bucket = bucket, key = %entry.key, error = %e, "sweep failed to remove blob");
                }
            }
        }

        Ok(removed)
    }

    pub async fn create_announcement(
        &self,
        request: NewAnnouncement,
        image: Option<UploadedImage>,
    ) -> Result<Announcement> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let id = Uuid::new_v4();

        let image_path = match image {
            Some(img) => {
                if !ALLOWED_IMAGE_MIMES.contains(&img.mime_type.as_str()) {
                    return Err(AppError::Validation(format!(
                        "Image type not allowed: {}",
                        img.mime_type
                    )));
                }
                if img.data.len() > MAX_IMAGE_SIZE {
                    return Err(AppError::Validation(
                        "Image size must be under 10MB".to_string(),
                    ));
                }
                let key = format!("{}-{}", id, sanitize_filename(&img.filename));
                self.blob_store
                    .put(ANNOUNCEMENTS_BUCKET, &key, &img.data)
                    .await?;
                Some(key)
            }
            None => None,
        };

        let announcement = Announcement {
            id,
            title: request.title,
            content: request.content,
            category: request.category,
            image_path: image_path.clone(),
            is_active: request.is_active,
            created_at: Utc::now(),
        };

        match self.announcement_repo.create(announcement).await {
            Ok(created) => Ok(created),
            Err(e) => {
                if let Some(key) = image_path {
                    if let Err(del_err) =
                        self.blob_store.delete(ANNOUNCEMENTS_BUCKET, &key).await
                    {
                        tracing::warn!(
                            key = %key,
                            error = %del_err,
                            "failed to clean up image after record insert failure"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    pub async fn update_announcement(
        &self,
        id: Uuid,
        request: UpdateAnnouncementRequest,
    ) -> Result<Announcement> {
        let mut announcement = self
            .announcement_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

        if let Some(title) = request.title {
            announcement.title = title;
        }
        if let Some(content) = request.content {
            announcement.content = content;
        }
        if let Some(category) = request.category {
            announcement.category = category;
        }
        if let Some(is_active) = request.is_active {
            announcement.is_active = is_active;
        }

        self.announcement_repo.update(id, announcement).await
    }

    /// Remove an announcement and its image blob (best-effort, record
    /// first, same ordering rationale as `reject`).
    pub async fn delete_announcement(&self, id: Uuid) -> Result<()> {
        let announcement = self
            .announcement_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

        self.announcement_repo.delete(id).await?;

        if let Some(key) = announcement.image_path {
            if let Err(e) = self.blob_store.delete(ANNOUNCEMENTS_BUCKET, &key).await {
                tracing::warn!(
                    id = %id,
                    key = %key,
                    error = %e,
                    "image deletion failed, leaving to reconcile sweep"
                );
            }
        }

        Ok(())
    }
}
