use std::sync::Arc;

use campushub::{
    domain::{DocumentKind, DocumentStatus},
    repository::{
        DocumentRepository, SqliteAnnouncementRepository, SqliteDocumentRepository,
    },
    service::{CatalogService, ModerationService, SubmissionService, SubmitDocumentRequest},
    storage::{BlobStore, LocalBlobStore, DOCUMENTS_BUCKET},
};
use chrono::Duration;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

const PDF_BYTES: &[u8] = b"%PDF-1.4 test content";

struct Fixture {
    submissions: SubmissionService,
    moderation: ModerationService,
    catalog: CatalogService,
    documents: Arc<SqliteDocumentRepository>,
    blobs: Arc<LocalBlobStore>,
    _tmp: tempfile::TempDir,
}

async fn setup() -> anyhow::Result<Fixture> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let tmp = tempfile::tempdir()?;
    let documents = Arc::new(SqliteDocumentRepository::new(pool.clone()));
    let announcements = Arc::new(SqliteAnnouncementRepository::new(pool));
    let blobs = Arc::new(LocalBlobStore::new(
        tmp.path().to_path_buf(),
        "http://localhost:8080",
    ));

    Ok(Fixture {
        submissions: SubmissionService::new(documents.clone(), blobs.clone()),
        moderation: ModerationService::new(
            documents.clone(),
            announcements.clone(),
            blobs.clone(),
        ),
        catalog: CatalogService::new(documents.clone(), announcements, blobs.clone()),
        documents,
        blobs,
        _tmp: tmp,
    })
}

fn request(kind: DocumentKind) -> SubmitDocumentRequest {
    SubmitDocumentRequest {
        title: "Midterm 2023".to_string(),
        subject: "DBMS".to_string(),
        semester: "2nd Year".to_string(),
        kind,
    }
}

#[tokio::test]
async fn test_submission_to_publication_lifecycle() -> anyhow::Result<()> {
    let fx = setup().await?;

    // Submit a valid PYQ
    let document = fx
        .submissions
        .submit(
            request(DocumentKind::Pyq),
            "midterm-2023.pdf",
            "application/pdf",
            PDF_BYTES,
        )
        .await?;
    assert_eq!(document.status, DocumentStatus::Pending);

    // Hidden from the public listing while pending
    assert!(fx.catalog.list_documents(DocumentKind::Pyq).await.is_empty());

    // Visible in the review queue, with a resolvable view URL
    let pending = fx.moderation.list_pending().await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, document.id);
    assert!(pending[0]
        .url
        .starts_with("http://localhost:8080/storage/v1/object/public/pdfs/"));

    // Approve, then the listing shows exactly this record
    fx.moderation.approve(document.id).await?;
    let listed = fx.catalog.list_documents(DocumentKind::Pyq).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, document.id);
    assert_eq!(
        listed[0].url,
        format!(
            "http://localhost:8080/storage/v1/object/public/pdfs/{}",
            document.file_path
        )
    );

    // The other partition stays empty
    assert!(fx
        .catalog
        .list_documents(DocumentKind::Assignment)
        .await
        .is_empty());

    // And the review queue is drained
    assert!(fx.moderation.list_pending().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_reject_removes_record_and_blob() -> anyhow::Result<()> {
    let fx = setup().await?;

    let document = fx
        .submissions
        .submit(
            request(DocumentKind::Assignment),
            "lab1.pdf",
            "application/pdf",
            PDF_BYTES,
        )
        .await?;
    assert!(fx.blobs.exists(DOCUMENTS_BUCKET, &document.file_path).await?);

    fx.moderation.reject(document.id).await?;

    assert!(fx.documents.find_by_id(document.id).await?.is_none());
    assert!(!fx.blobs.exists(DOCUMENTS_BUCKET, &document.file_path).await?);
    assert!(fx.moderation.list_pending().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_reject_unknown_id_is_not_found() -> anyhow::Result<()> {
    let fx = setup().await?;

    assert!(fx.moderation.reject(Uuid::new_v4()).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_approve_is_idempotent() -> anyhow::Result<()> {
    let fx = setup().await?;

    let document = fx
        .submissions
        .submit(
            request(DocumentKind::Pyq),
            "paper.pdf",
            "application/pdf",
            PDF_BYTES,
        )
        .await?;

    fx.moderation.approve(document.id).await?;
    fx.moderation.approve(document.id).await?;

    let listed = fx.catalog.list_documents(DocumentKind::Pyq).await;
    assert_eq!(listed.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_reconcile_removes_only_orphaned_blobs() -> anyhow::Result<()> {
    let fx = setup().await?;

    // A referenced blob, via a real submission
    let document = fx
        .submissions
        .submit(
            request(DocumentKind::Pyq),
            "kept.pdf",
            "application/pdf",
            PDF_BYTES,
        )
        .await?;

    // An orphan: a blob no record points at
    fx.blobs
        .put(DOCUMENTS_BUCKET, "orphan-upload.pdf", PDF_BYTES)
        .await?;

    let report = fx.moderation.reconcile_with_grace(Duration::zero()).await?;
    assert_eq!(report.removed_blobs, 1);

    assert!(fx.blobs.exists(DOCUMENTS_BUCKET, &document.file_path).await?);
    assert!(!fx.blobs.exists(DOCUMENTS_BUCKET, "orphan-upload.pdf").await?);

    Ok(())
}

#[tokio::test]
async fn test_reconcile_grace_period_spares_fresh_blobs() -> anyhow::Result<()> {
    let fx = setup().await?;

    // Freshly orphaned blob, as if its record insert were still in flight
    fx.blobs
        .put(DOCUMENTS_BUCKET, "in-flight.pdf", PDF_BYTES)
        .await?;

    let report = fx.moderation.reconcile_with_grace(Duration::hours(1)).await?;
    assert_eq!(report.removed_blobs, 0);
    assert!(fx.blobs.exists(DOCUMENTS_BUCKET, "in-flight.pdf").await?);

    Ok(())
}
