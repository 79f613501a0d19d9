use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct CreateProfileBody {
    pub display_name: String,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// POST /api/profiles — create a profile.
pub async fn create_profile(
    State(app): State<AppState>,
    Json(body): Json<CreateProfileBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.display_name.trim().is_empty() {
        return Err(AppError::bad_request("display_name must not be empty"));
    }

    let store = app.store.clone();
    let profile = tokio::task::spawn_blocking(move || {
        let profile = lodestar_core::profile::Profile::new(
            body.display_name.trim(),
            body.timezone.filter(|tz| !tz.is_empty()),
        );
        store.create_profile(&profile)?;
        Ok::<_, lodestar_core::LodestarError>(profile)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();
    Ok(Json(serde_json::json!(profile)))
}

/// GET /api/profiles — list all profiles.
pub async fn list_profiles(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let profiles = tokio::task::spawn_blocking(move || store.list_profiles())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(profiles)))
}

/// GET /api/profiles/:user — one profile.
pub async fn get_profile(
    State(app): State<AppState>,
    Path(user): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let profile = tokio::task::spawn_blocking(move || store.profile(user))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(profile)))
}
