use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Campushub API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Student community hub: shared study material, announcements, contributors",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "documents": "/api/documents",
            "announcements": "/api/announcements",
            "contributors": "/api/contributors",
            "auth": "/auth/login",
            "admin": "/api/admin"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}
