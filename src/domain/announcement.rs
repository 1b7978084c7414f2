use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: AnnouncementCategory,
    /// Blob key in the announcements bucket, if an image was attached.
    pub image_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnnouncementCategory {
    General,
    Exam,
    Event,
    Urgent,
    Placement,
}

impl AnnouncementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementCategory::General => "General",
            AnnouncementCategory::Exam => "Exam",
            AnnouncementCategory::Event => "Event",
            AnnouncementCategory::Urgent => "Urgent",
            AnnouncementCategory::Placement => "Placement",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "General" => Some(AnnouncementCategory::General),
            "Exam" => Some(AnnouncementCategory::Exam),
            "Event" => Some(AnnouncementCategory::Event),
            "Urgent" => Some(AnnouncementCategory::Urgent),
            "Placement" => Some(AnnouncementCategory::Placement),
            _ => None,
        }
    }
}

/// An announcement as exposed by the public board: active, with the image
/// URL resolved when present.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedAnnouncement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: AnnouncementCategory,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
