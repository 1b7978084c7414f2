use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campushub::{
    api,
    auth::AuthService,
    config::Settings,
    repository::{SqliteAdminRepository, SqliteAnnouncementRepository, SqliteDocumentRepository},
    service::ServiceContext,
    storage::LocalBlobStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campushub=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!(
        "Starting Campushub server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // Initialize auth service
    let auth_service = Arc::new(AuthService::new(db_pool.clone()));

    // Initialize repositories and the blob store
    let document_repo = Arc::new(SqliteDocumentRepository::new(db_pool.clone()));
    let announcement_repo = Arc::new(SqliteAnnouncementRepository::new(db_pool.clone()));
    let admin_repo = Arc::new(SqliteAdminRepository::new(db_pool.clone()));
    let blob_store = Arc::new(LocalBlobStore::new(
        settings.storage.root.clone(),
        settings.server.base_url.clone(),
    ));

    // Create service context
    let service_context = Arc::new(ServiceContext::new(
        document_repo,
        announcement_repo,
        admin_repo,
        blob_store,
        auth_service,
    ));

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        settings.server.host, settings.server.port
    ))
    .await?;

    tracing::info!(
        "Server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
