use campushub::{
    domain::{Document, DocumentKind, DocumentStatus},
    repository::{DocumentRepository, SqliteDocumentRepository},
};
use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

fn sample_document(kind: DocumentKind, title: &str) -> Document {
    let id = Uuid::new_v4();
    let now = Utc::now();
    Document {
        id,
        title: title.to_string(),
        subject: "DBMS".to_string(),
        semester: "2nd Year".to_string(),
        kind,
        file_path: format!("{}-sample.pdf", id),
        status: DocumentStatus::Pending,
        created_at: now,
        updated_at: now,
    }
}

async fn setup() -> anyhow::Result<SqliteDocumentRepository> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(SqliteDocumentRepository::new(pool))
}

#[tokio::test]
async fn test_document_crud() -> anyhow::Result<()> {
    let repo = setup().await?;

    let document = repo
        .create(sample_document(DocumentKind::Pyq, "Midterm 2023"))
        .await?;
    assert_eq!(document.title, "Midterm 2023");
    assert_eq!(document.status, DocumentStatus::Pending);
    assert_eq!(document.kind, DocumentKind::Pyq);

    let found = repo.find_by_id(document.id).await?;
    assert!(found.is_some());
    assert_eq!(found.unwrap().id, document.id);

    // Pending documents never show up in the approved listing
    let approved = repo.list_approved(DocumentKind::Pyq).await?;
    assert!(approved.is_empty());

    repo.approve(document.id).await?;
    let approved = repo.list_approved(DocumentKind::Pyq).await?;
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].status, DocumentStatus::Approved);

    // Approving again is harmless
    repo.approve(document.id).await?;

    repo.delete(document.id).await?;
    assert!(repo.find_by_id(document.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_approved_listing_is_partitioned_by_kind() -> anyhow::Result<()> {
    let repo = setup().await?;

    let pyq = repo
        .create(sample_document(DocumentKind::Pyq, "Semester exam"))
        .await?;
    let assignment = repo
        .create(sample_document(DocumentKind::Assignment, "Lab assignment"))
        .await?;

    repo.approve(pyq.id).await?;
    repo.approve(assignment.id).await?;

    let pyqs = repo.list_approved(DocumentKind::Pyq).await?;
    assert_eq!(pyqs.len(), 1);
    assert_eq!(pyqs[0].id, pyq.id);

    let assignments = repo.list_approved(DocumentKind::Assignment).await?;
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].id, assignment.id);

    Ok(())
}

#[tokio::test]
async fn test_approved_listing_is_newest_first() -> anyhow::Result<()> {
    let repo = setup().await?;

    let mut older = sample_document(DocumentKind::Pyq, "Older paper");
    older.created_at = Utc::now() - Duration::days(2);
    older.updated_at = older.created_at;
    let mut newer = sample_document(DocumentKind::Pyq, "Newer paper");
    newer.created_at = Utc::now() - Duration::days(1);
    newer.updated_at = newer.created_at;

    let older = repo.create(older).await?;
    let newer = repo.create(newer).await?;
    repo.approve(older.id).await?;
    repo.approve(newer.id).await?;

    let listed = repo.list_approved(DocumentKind::Pyq).await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].id, older.id);

    Ok(())
}

#[tokio::test]
async fn test_pending_listing_is_oldest_first() -> anyhow::Result<()> {
    let repo = setup().await?;

    let mut first = sample_document(DocumentKind::Pyq, "First in queue");
    first.created_at = Utc::now() - Duration::days(3);
    first.updated_at = first.created_at;
    let mut second = sample_document(DocumentKind::Assignment, "Second in queue");
    second.created_at = Utc::now() - Duration::days(1);
    second.updated_at = second.created_at;

    let first = repo.create(first).await?;
    let second = repo.create(second).await?;

    let pending = repo.list_pending().await?;
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].id, first.id);
    assert_eq!(pending[1].id, second.id);

    Ok(())
}

#[tokio::test]
async fn test_approve_unknown_id_is_not_found() -> anyhow::Result<()> {
    let repo = setup().await?;

    let result = repo.approve(Uuid::new_v4()).await;
    assert!(result.is_err());

    Ok(())
}

#[tokio::test]
async fn test_list_file_paths_covers_all_statuses() -> anyhow::Result<()> {
    let repo = setup().await?;

    let pending = repo
        .create(sample_document(DocumentKind::Pyq, "Pending doc"))
        .await?;
    let approved = repo
        .create(sample_document(DocumentKind::Assignment, "Approved doc"))
        .await?;
    repo.approve(approved.id).await?;

    let paths = repo.list_file_paths().await?;
    assert_eq!(paths.len(), 2);
    assert!(paths.contains(&pending.file_path));
    assert!(paths.contains(&approved.file_path));

    Ok(())
}
