//! Check-in submission and retrieval.
//!
//! Submission does the durable work (check-in row + streak credit) first,
//! then asks the text backend for an accompanying message. A generation
//! failure is reported in the response but never fails the check-in.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use lodestar_core::checkin::{Checkin, EveningEntry, MorningEntry};
use lodestar_core::dates::parse_day_key;
use lodestar_core::store::{CheckinOutcome, StreakCredit};
use muse_client::{EveningContext, MorningContext};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct MorningBody {
    pub user_id: Uuid,
    /// The submitting device's calendar date, `yyyy-mm-dd`.
    pub local_date: String,
    #[serde(default)]
    pub priorities: Vec<String>,
    pub intention: String,
}

#[derive(serde::Deserialize)]
pub struct EveningBody {
    pub user_id: Uuid,
    pub local_date: String,
    pub wins: String,
    pub struggles: String,
    pub gratitude: String,
    pub day_rating: u8,
}

/// Check-in row plus profile context needed for the generated message.
struct Submitted {
    display_name: String,
    identity_line: Option<String>,
    outcome: CheckinOutcome,
}

fn submit_response(
    outcome: &CheckinOutcome,
    message: Option<String>,
    message_error: Option<String>,
) -> serde_json::Value {
    let warning = match outcome.credit {
        StreakCredit::OutOfOrder => {
            Some("check-in date precedes the last credited date; streak unchanged")
        }
        _ => None,
    };
    serde_json::json!({
        "checkin": outcome.checkin,
        "streak": outcome.streak,
        "credited": outcome.credit.credited(),
        "streak_broken": outcome.credit.streak_broken(),
        "warning": warning,
        "message": message,
        "message_error": message_error,
    })
}

/// POST /api/checkins/morning — record the morning half and credit the
/// streak.
pub async fn submit_morning(
    State(app): State<AppState>,
    Json(body): Json<MorningBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let date = parse_day_key(&body.local_date)?;
    let user = body.user_id;
    let entry = MorningEntry {
        priorities: body.priorities,
        intention: body.intention,
    };

    let store = app.store.clone();
    let submitted = tokio::task::spawn_blocking(move || {
        let profile = store.profile(user)?;
        let outcome = store.submit_morning(user, date, entry)?;
        let identity_line = store
            .active_blueprint(user)
            .ok()
            .and_then(|b| b.body.identity_line().map(str::to_string));
        Ok::<_, lodestar_core::LodestarError>(Submitted {
            display_name: profile.display_name,
            identity_line,
            outcome,
        })
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();

    let (message, message_error) = match &app.muse {
        Some(muse) => {
            let ctx = MorningContext {
                display_name: submitted.display_name.clone(),
                identity_line: submitted.identity_line.clone(),
                priorities: submitted
                    .outcome
                    .checkin
                    .priorities
                    .clone()
                    .unwrap_or_default(),
                intention: submitted
                    .outcome
                    .checkin
                    .intention
                    .clone()
                    .unwrap_or_default(),
                current_streak: submitted.outcome.streak.current_streak,
            };
            match muse.morning_message(&ctx).await {
                Ok(text) => (Some(text), None),
                Err(e) => {
                    tracing::warn!(user = %user, error = %e, "morning message generation failed");
                    (None, Some(e.to_string()))
                }
            }
        }
        None => (None, None),
    };

    Ok(Json(submit_response(
        &submitted.outcome,
        message,
        message_error,
    )))
}

/// POST /api/checkins/evening — record the evening half. Credits the
/// streak too, so an evening-only day still counts.
pub async fn submit_evening(
    State(app): State<AppState>,
    Json(body): Json<EveningBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let date = parse_day_key(&body.local_date)?;
    let user = body.user_id;
    let entry = EveningEntry {
        wins: body.wins,
        struggles: body.struggles,
        gratitude: body.gratitude,
        day_rating: body.day_rating,
    };

    let store = app.store.clone();
    let submitted = tokio::task::spawn_blocking(move || {
        let profile = store.profile(user)?;
        let outcome = store.submit_evening(user, date, entry)?;
        let identity_line = store
            .active_blueprint(user)
            .ok()
            .and_then(|b| b.body.identity_line().map(str::to_string));
        Ok::<_, lodestar_core::LodestarError>(Submitted {
            display_name: profile.display_name,
            identity_line,
            outcome,
        })
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();

    let (message, message_error) = match &app.muse {
        Some(muse) => {
            let checkin = &submitted.outcome.checkin;
            let ctx = EveningContext {
                display_name: submitted.display_name.clone(),
                identity_line: submitted.identity_line.clone(),
                wins: checkin.wins.clone().unwrap_or_default(),
                struggles: checkin.struggles.clone().unwrap_or_default(),
                gratitude: checkin.gratitude.clone().unwrap_or_default(),
                day_rating: checkin.day_rating.unwrap_or_default(),
                current_streak: submitted.outcome.streak.current_streak,
            };
            match muse.evening_message(&ctx).await {
                Ok(text) => (Some(text), None),
                Err(e) => {
                    tracing::warn!(user = %user, error = %e, "evening message generation failed");
                    (None, Some(e.to_string()))
                }
            }
        }
        None => (None, None),
    };

    Ok(Json(submit_response(
        &submitted.outcome,
        message,
        message_error,
    )))
}

/// GET /api/checkins/:user/:date — one day's check-in.
pub async fn get_checkin(
    State(app): State<AppState>,
    Path((user, date)): Path<(Uuid, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let date = parse_day_key(&date)?;
    let store = app.store.clone();
    let checkin = tokio::task::spawn_blocking(move || store.checkin(user, date))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(checkin)))
}

#[derive(serde::Deserialize)]
pub struct RangeQuery {
    pub from: String,
    pub to: String,
}

/// GET /api/checkins/:user?from=&to= — inclusive date-range history.
pub async fn list_checkins(
    State(app): State<AppState>,
    Path(user): Path<Uuid>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let from = parse_day_key(&range.from)?;
    let to = parse_day_key(&range.to)?;

    let store = app.store.clone();
    let checkins: Vec<Checkin> = tokio::task::spawn_blocking(move || {
        store.profile(user)?;
        store.checkins_between(user, from, to)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(checkins)))
}
