use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use campushub::{
    api,
    auth::AuthService,
    config::Settings,
    repository::{
        AdminRepository, SqliteAdminRepository, SqliteAnnouncementRepository,
        SqliteDocumentRepository,
    },
    service::ServiceContext,
    storage::LocalBlobStore,
};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

const BOUNDARY: &str = "X-CAMPUSHUB-TEST-BOUNDARY";

struct TestApp {
    app: Router,
    _tmp: tempfile::TempDir,
}

async fn setup() -> anyhow::Result<TestApp> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let tmp = tempfile::tempdir()?;
    let settings = Settings::default();

    let document_repo = Arc::new(SqliteDocumentRepository::new(pool.clone()));
    let announcement_repo = Arc::new(SqliteAnnouncementRepository::new(pool.clone()));
    let admin_repo = Arc::new(SqliteAdminRepository::new(pool.clone()));
    let blob_store = Arc::new(LocalBlobStore::new(
        tmp.path().to_path_buf(),
        settings.server.base_url.clone(),
    ));
    let auth_service = Arc::new(AuthService::new(pool));

    // One admin account for the moderation flow
    let password_hash = AuthService::hash_password("sekrit123").await?;
    admin_repo.create("moderator", &password_hash).await?;

    let service_context = Arc::new(ServiceContext::new(
        document_repo,
        announcement_repo,
        admin_repo,
        blob_store,
        auth_service,
    ));

    Ok(TestApp {
        app: api::create_app(service_context, Arc::new(settings)),
        _tmp: tmp,
    })
}

fn multipart_submission(title: &str) -> (String, String) {
    let content_type = format!("multipart/form-data; boundary={}", BOUNDARY);
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\n{title}\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"subject\"\r\n\r\nDBMS\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"year\"\r\n\r\n2nd Year\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"kind\"\r\n\r\nPYQ\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"midterm.pdf\"\r\n\
         Content-Type: application/pdf\r\n\r\n%PDF-1.4 test content\r\n\
         --{b}--\r\n",
        b = BOUNDARY,
        title = title
    );
    (content_type, body)
}

async fn login(app: &Router) -> anyhow::Result<String> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username": "moderator", "password": "sekrit123"}"#,
                ))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a session cookie")
        .to_str()?
        .to_string();

    // "session=<token>; Path=/; ..." -> "session=<token>"
    Ok(set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string())
}

async fn body_json(response: axum::response::Response) -> anyhow::Result<serde_json::Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn test_health_check() -> anyhow::Result<()> {
    let tx = setup().await?;

    let response = tx
        .app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_admin_routes_require_session() -> anyhow::Result<()> {
    let tx = setup().await?;

    let response = tx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/documents/pending")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = tx
        .app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/api/admin/documents/{}/approve",
                    uuid::Uuid::new_v4()
                ))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_login_rejects_bad_password() -> anyhow::Result<()> {
    let tx = setup().await?;

    let response = tx
        .app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username": "moderator", "password": "wrong"}"#,
                ))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_submission_moderation_publication_over_http() -> anyhow::Result<()> {
    let tx = setup().await?;
    let app = tx.app;

    // Anonymous contributor submits a PYQ
    let (content_type, body) = multipart_submission("Midterm 2023");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/submissions")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let document = body_json(response).await?;
    assert_eq!(document["status"], "pending");
    assert_eq!(document["kind"], "PYQ");
    let id = document["id"].as_str().unwrap().to_string();

    // Pending submissions stay out of the public listing
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/documents?kind=PYQ")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?.as_array().unwrap().len(), 0);

    // The moderator logs in and finds it in the queue
    let cookie = login(&app).await?;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/documents/pending")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let pending = body_json(response).await?;
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["id"].as_str().unwrap(), id);

    // Approve it
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/admin/documents/{}/approve", id))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?["success"], true);

    // Now it is published, with a URL this same service resolves
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/documents?kind=PYQ")
                .body(Body::empty())?,
        )
        .await?;
    let listed = body_json(response).await?;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let url = listed[0]["url"].as_str().unwrap().to_string();
    let path = url
        .strip_prefix("http://localhost:8080")
        .expect("public URL uses the configured base URL");

    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/pdf")
    );

    Ok(())
}

#[tokio::test]
async fn test_reject_over_http_clears_queue() -> anyhow::Result<()> {
    let tx = setup().await?;
    let app = tx.app;

    let (content_type, body) = multipart_submission("Spam upload");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/submissions")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let document = body_json(response).await?;
    let id = document["id"].as_str().unwrap().to_string();
    let url = format!(
        "/storage/v1/object/public/pdfs/{}",
        document["file_path"].as_str().unwrap()
    );

    let cookie = login(&app).await?;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/admin/documents/{}/reject", id))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Queue is empty and the blob is gone
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/documents/pending")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(body_json(response).await?.as_array().unwrap().len(), 0);

    let response = app
        .oneshot(Request::builder().uri(url).body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_unknown_document_kind_is_bad_request() -> anyhow::Result<()> {
    let tx = setup().await?;

    let response = tx
        .app
        .oneshot(
            Request::builder()
                .uri("/api/documents?kind=thesis")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
