use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Announcement, AnnouncementCategory, PublishedAnnouncement},
    error::{AppError, Result},
    service::{NewAnnouncement, UpdateAnnouncementRequest, UploadedImage},
};

/// Public board: active announcements, newest first.
pub async fn list(State(state): State<AppState>) -> Json<Vec<PublishedAnnouncement>> {
    Json(state.service_context.catalog.list_announcements().await)
}

/// Admin create, multipart so an image can ride along with the fields.
pub async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Announcement>)> {
    let mut title = String::new();
    let mut content = String::new();
    let mut category_str = String::new();
    let mut is_active = true;
    let mut image: Option<UploadedImage> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" => title = field.text().await.unwrap_or_default(),
            "content" => content = field.text().await.unwrap_or_default(),
            "category" => category_str = field.text().await.unwrap_or_default(),
            "is_active" => {
                is_active = field
                    .text()
                    .await
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(true);
            }
            "image" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let mime_type = field.content_type().unwrap_or("").to_string();
                if !filename.is_empty() {
                    if let Ok(data) = field.bytes().await {
                        if !data.is_empty() {
                            image = Some(UploadedImage {
                                filename,
                                mime_type,
                                data: data.to_vec(),
                            });
                        }
                    }
                }
            }
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    let category = AnnouncementCategory::parse(&category_str).ok_or_else(|| {
        AppError::Validation(format!("Unknown announcement category: {}", category_str))
    })?;

    let announcement = state
        .service_context
        .moderation
        .create_announcement(
            NewAnnouncement {
                title,
                content,
                category,
                is_active,
            },
            image,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(announcement)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAnnouncementRequest>,
) -> Result<Json<Announcement>> {
    let announcement = state
        .service_context
        .moderation
        .update_announcement(id, request)
        .await?;

    Ok(Json(announcement))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state
        .service_context
        .moderation
        .delete_announcement(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
