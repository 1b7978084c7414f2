pub mod catalog_service;
pub mod moderation_service;
pub mod submission_service;

use std::sync::Arc;

use crate::auth::AuthService;
use crate::repository::{AdminRepository, AnnouncementRepository, DocumentRepository};
use crate::storage::BlobStore;

pub use catalog_service::CatalogService;
pub use moderation_service::{ModerationService, NewAnnouncement, ReconcileReport, UpdateAnnouncementRequest, UploadedImage};
pub use submission_service::{SubmissionService, SubmitDocumentRequest};

/// Shared service graph, built once at startup and injected into handlers.
///
/// The read side (`catalog`) and the privileged write side (`moderation`)
/// are separate types: a handler holding only the catalog cannot mutate
/// anything.
pub struct ServiceContext {
    pub catalog: Arc<CatalogService>,
    pub submissions: Arc<SubmissionService>,
    pub moderation: Arc<ModerationService>,
    pub auth_service: Arc<AuthService>,
    pub admin_repo: Arc<dyn AdminRepository>,
    pub blob_store: Arc<dyn BlobStore>,
}

impl ServiceContext {
    pub fn new(
        document_repo: Arc<dyn DocumentRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        admin_repo: Arc<dyn AdminRepository>,
        blob_store: Arc<dyn BlobStore>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        let catalog = Arc::new(CatalogService::new(
            document_repo.clone(),
            announcement_repo.clone(),
            blob_store.clone(),
        ));
        let submissions = Arc::new(SubmissionService::new(
            document_repo.clone(),
            blob_store.clone(),
        ));
        let moderation = Arc::new(ModerationService::new(
            document_repo,
            announcement_repo,
            blob_store.clone(),
        ));

        Self {
            catalog,
            submissions,
            moderation,
            auth_service,
            admin_repo,
            blob_store,
        }
    }
}
