use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/streaks/:user — the user's streak, zeroed if they have never
/// checked in.
pub async fn get_streak(
    State(app): State<AppState>,
    Path(user): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let streak = tokio::task::spawn_blocking(move || {
        store.profile(user)?;
        store.streak(user)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(streak)))
}
