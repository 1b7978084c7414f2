use axum::{extract::State, Json};
use tokio::fs;

use crate::{api::state::AppState, domain::Contributor};

/// Contributor directory, read from a JSON file maintained alongside the
/// deployment. A missing or unparsable file is an empty directory, not an
/// error page.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Contributor>> {
    let path = &state.settings.contributors.path;

    let contributors = match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<Vec<Contributor>>(&bytes) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "contributors file is not valid JSON");
                Vec::new()
            }
        },
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "contributors file unavailable");
            Vec::new()
        }
    };

    Json(contributors)
}
