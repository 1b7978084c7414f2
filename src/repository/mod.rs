use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod admin_repository;
pub mod announcement_repository;
pub mod document_repository;

pub use admin_repository::SqliteAdminRepository;
pub use announcement_repository::SqliteAnnouncementRepository;
pub use document_repository::SqliteDocumentRepository;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create(&self, document: Document) -> Result<Document>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>>;
    /// Approved documents of one kind, newest first.
    async fn list_approved(&self, kind: DocumentKind) -> Result<Vec<Document>>;
    /// Pending documents across all kinds, oldest first.
    async fn list_pending(&self) -> Result<Vec<Document>>;
    async fn approve(&self, id: Uuid) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    /// Every referenced blob key, for the reconciliation sweep.
    async fn list_file_paths(&self) -> Result<Vec<String>>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: Announcement) -> Result<Announcement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Announcement>>;
    /// Active announcements, newest first.
    async fn list_active(&self) -> Result<Vec<Announcement>>;
    async fn update(&self, id: Uuid, announcement: Announcement) -> Result<Announcement>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    /// Every referenced image key, for the reconciliation sweep.
    async fn list_image_paths(&self) -> Result<Vec<String>>;
}

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create(&self, username: &str, password_hash: &str) -> Result<AdminUser>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUser>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>>;
}
