use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/share/:user — the public share-card snapshot: identity line
/// and streak numbers, nothing from the check-in entries themselves.
pub async fn share_card(
    State(app): State<AppState>,
    Path(user): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let card = tokio::task::spawn_blocking(move || {
        let profile = store.profile(user)?;
        let streak = store.streak(user)?;
        let identity = store
            .active_blueprint(user)
            .ok()
            .and_then(|b| b.body.identity_line().map(str::to_string));
        Ok::<_, lodestar_core::LodestarError>(serde_json::json!({
            "display_name": profile.display_name,
            "identity": identity,
            "current_streak": streak.current_streak,
            "longest_streak": streak.longest_streak,
            "total_checkins": streak.total_checkins,
            "member_since": profile.created_at.date_naive(),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(card))
}
