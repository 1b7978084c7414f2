pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{config::Settings, service::ServiceContext};
use state::AppState;

/// Uploads are capped at 10 MiB by validation; the body limit leaves room
/// for multipart framing on top of that.
const MAX_BODY_SIZE: usize = 12 * 1024 * 1024;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        // Auth routes
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        // API routes
        .nest("/api", api_routes(app_state.clone()))
        // Public blob access, hosted-store URL shape
        .route(
            "/storage/v1/object/public/:bucket/*key",
            get(handlers::storage::serve_blob),
        )
        // Add state to the router
        .with_state(app_state)
        // Middleware
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public reads
        .route("/documents", get(handlers::documents::list))
        .route("/announcements", get(handlers::announcements::list))
        .route("/contributors", get(handlers::contributors::list))
        // Anonymous submissions land in the review queue
        .route("/submissions", post(handlers::submissions::create))
        // Moderation console
        .nest("/admin", admin_routes(state))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/documents/pending", get(handlers::moderation::list_pending))
        .route("/documents/:id/approve", post(handlers::moderation::approve))
        .route("/documents/:id/reject", post(handlers::moderation::reject))
        .route("/reconcile", post(handlers::moderation::reconcile))
        .route("/announcements", post(handlers::announcements::create))
        .route("/announcements/:id", put(handlers::announcements::update))
        .route("/announcements/:id", delete(handlers::announcements::delete))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}
