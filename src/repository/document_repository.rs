use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Document, DocumentKind, DocumentStatus},
    error::{AppError, Result},
    repository::DocumentRepository,
};

#[derive(FromRow)]
struct DocumentRow {
    id: String,
    title: String,
    subject: String,
    semester: String,
    doc_kind: String,
    file_path: String,
    status: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteDocumentRepository {
    pool: SqlitePool,
}

impl SqliteDocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_document(row: DocumentRow) -> Result<Document> {
        Ok(Document {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            subject: row.subject,
            semester: row.semester,
            kind: DocumentKind::parse(&row.doc_kind)
                .ok_or_else(|| AppError::Database(format!("Invalid doc kind: {}", row.doc_kind)))?,
            file_path: row.file_path,
            status: DocumentStatus::parse(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid status: {}", row.status)))?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl DocumentRepository for SqliteDocumentRepository {
    async fn create(&self, document: Document) -> Result<Document> {
        let id_str = document.id.to_string();
        let created_at_naive = document.created_at.naive_utc();
        let updated_at_naive = document.updated_at.naive_utc();

        sqlx::query(
            r#"
            INSERT INTO documents (
                id, title, subject, semester, doc_kind, file_path, status,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&document.title)
        .bind(&document.subject)
        .bind(&document.semester)
        .bind(document.kind.as_str())
        .bind(&document.file_path)
        .bind(document.status.as_str())
        .bind(created_at_naive)
        .bind(updated_at_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(document.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created document".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, title, subject, semester, doc_kind, file_path, status,
                   created_at, updated_at
            FROM documents
            WHERE id = ?
            "#,
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_document(r)?)),
            None => Ok(None),
        }
    }

    async fn list_approved(&self, kind: DocumentKind) -> Result<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, title, subject, semester, doc_kind, file_path, status,
                   created_at, updated_at
            FROM documents
            WHERE status = 'approved' AND doc_kind = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn list_pending(&self) -> Result<Vec<Document>> {
        // Oldest first so the longest-waiting submissions are reviewed first.
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, title, subject, semester, doc_kind, file_path, status,
                   created_at, updated_at
            FROM documents
            WHERE status = 'pending'
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn approve(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            "UPDATE documents SET status = 'approved', updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Document not found".to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Document not found".to_string()));
        }

        Ok(())
    }

    async fn list_file_paths(&self) -> Result<Vec<String>> {
        let paths = sqlx::query_scalar::<_, String>("SELECT file_path FROM documents")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(paths)
    }
}
