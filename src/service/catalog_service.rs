use std::sync::Arc;

use crate::{
    domain::{DocumentKind, PublishedAnnouncement, PublishedDocument},
    repository::{AnnouncementRepository, DocumentRepository},
    storage::{BlobStore, ANNOUNCEMENTS_BUCKET, DOCUMENTS_BUCKET},
};

/// Read-only view over published content. Holds no write capability: the
/// only records it can surface are approved documents and active
/// announcements.
pub struct CatalogService {
    document_repo: Arc<dyn DocumentRepository>,
    announcement_repo: Arc<dyn AnnouncementRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl CatalogService {
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

    /// Approved documents of one kind, newest first, with public URLs
    /// resolved. A store failure degrades to an empty list rather than an
    /// error page on the public site.
    pub async fn list_documents(&self, kind: DocumentKind) -> Vec<PublishedDocument> {
        let documents = match self.document_repo.list_approved(kind).await {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!(error = %e, "document listing unavailable, returning empty");
                return Vec::new();
            }
        };

        documents
            .into_iter()
            .map(|d| PublishedDocument {
                url: self.blob_store.public_url(DOCUMENTS_BUCKET, &d.file_path),
                id: d.id,
                title: d.title,
                subject: d.subject,
                semester: d.semester,
                kind: d.kind,
                created_at: d.created_at,
            })
            .collect()
    }

    /// Active announcements, newest first, with image URLs resolved.
    pub async fn list_announcements(&self) -> Vec<PublishedAnnouncement> {
        let announcements = match self.announcement_repo.list_active().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "announcement listing unavailable, returning empty");
                return Vec::new();
            }
        };

        announcements
            .into_iter()
            .map(|a| PublishedAnnouncement {
                image_url: a
                    .image_path
                    .as_deref()
                    .map(|p| self.blob_store.public_url(ANNOUNCEMENTS_BUCKET, p)),
                id: a.id,
                title: a.title,
                content: a.content,
                category: a.category,
                created_at: a.created_at,
            })
            .collect()
    }
}
