use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use lodestar_core::blueprint::BlueprintBody;
use muse_client::{BlueprintContext, ModelOutput, MuseError};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct GenerateBody {
    pub user_id: Uuid,
    pub reflections: Vec<String>,
}

/// POST /api/blueprints/generate — draft a new version from the user's
/// reflections and make it active.
pub async fn generate(
    State(app): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let muse = app.muse_required()?;
    if body.reflections.iter().all(|r| r.trim().is_empty()) {
        return Err(AppError::bad_request("reflections must not be empty"));
    }

    let user = body.user_id;
    let store = app.store.clone();
    let display_name = tokio::task::spawn_blocking(move || {
        Ok::<_, lodestar_core::LodestarError>(store.profile(user)?.display_name)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let ctx = BlueprintContext {
        display_name,
        reflections: body.reflections,
    };
    let blueprint_body = match muse.generate_blueprint(&ctx).await? {
        ModelOutput::Parsed(draft) => BlueprintBody::Structured {
            identity: draft.identity,
            purpose: draft.purpose,
            values: draft.values,
            narrative: draft.narrative,
        },
        ModelOutput::RawText(text) => BlueprintBody::Raw { text },
        ModelOutput::Failed(reason) => return Err(MuseError::UnusableOutput(reason).into()),
    };

    let store = app.store.clone();
    let model = muse.model().to_string();
    let blueprint =
        tokio::task::spawn_blocking(move || store.put_blueprint(user, blueprint_body, model))
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();
    Ok(Json(serde_json::json!(blueprint)))
}

/// GET /api/blueprints/:user — the active version.
pub async fn get_active(
    State(app): State<AppState>,
    Path(user): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let blueprint = tokio::task::spawn_blocking(move || {
        store.profile(user)?;
        store.active_blueprint(user)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(blueprint)))
}

/// GET /api/blueprints/:user/versions — every version, oldest first.
pub async fn list_versions(
    State(app): State<AppState>,
    Path(user): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let blueprints = tokio::task::spawn_blocking(move || {
        store.profile(user)?;
        store.list_blueprints(user)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(blueprints)))
}

/// POST /api/blueprints/:user/:version/activate — roll back (or forward)
/// to an existing version.
pub async fn activate(
    State(app): State<AppState>,
    Path((user, version)): Path<(Uuid, u32)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let blueprint = tokio::task::spawn_blocking(move || {
        store.activate_blueprint(user, version)?;
        store.blueprint(user, version)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();
    Ok(Json(serde_json::json!(blueprint)))
}
