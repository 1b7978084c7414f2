use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contributed study document. Created in `Pending` status by the
/// submission workflow; only the moderation console moves it to `Approved`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    /// Year of study the document belongs to ("1st Year" .. "4th Year").
    /// Kept under the original column name.
    pub semester: String,
    pub kind: DocumentKind,
    /// Blob key in the pdfs bucket.
    pub file_path: String,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentKind {
    #[serde(rename = "PYQ")]
    Pyq,
    Assignment,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pyq => "PYQ",
            DocumentKind::Assignment => "Assignment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PYQ" | "pyq" => Some(DocumentKind::Pyq),
            "Assignment" | "assignment" => Some(DocumentKind::Assignment),
            _ => None,
        }
    }
}

/// Moderation state. Rejection deletes the record outright, so there is no
/// third variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Approved,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(DocumentStatus::Pending),
            "approved" => Some(DocumentStatus::Approved),
            _ => None,
        }
    }
}

/// A document as exposed by the public listing: approved, with its public
/// download URL resolved.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedDocument {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub semester: String,
    pub kind: DocumentKind,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A pending document as exposed to the moderation console.
#[derive(Debug, Clone, Serialize)]
pub struct PendingDocument {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub semester: String,
    pub kind: DocumentKind,
    pub file_path: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}
