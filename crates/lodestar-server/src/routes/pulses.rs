use axum::extract::{Path, State};
use axum::Json;
use chrono::{Duration, Utc};
use uuid::Uuid;

use lodestar_core::checkin::Checkin;
use lodestar_core::dates::{day_key, parse_day_key, week_start};
use lodestar_core::pulse::{Pulse, PulseBody, WeekStats};
use muse_client::{ModelOutput, MuseError, PulseContext};

use crate::error::AppError;
use crate::state::AppState;

const MAX_HIGHLIGHTS: usize = 6;

#[derive(serde::Deserialize)]
pub struct GenerateBody {
    pub user_id: Uuid,
    /// Any date inside the week to summarize; defaults to the current UTC
    /// date.
    #[serde(default)]
    pub week_of: Option<String>,
}

fn week_stats(rows: &[Checkin]) -> WeekStats {
    let ratings: Vec<f32> = rows
        .iter()
        .filter_map(|c| c.day_rating)
        .map(f32::from)
        .collect();
    let average_rating = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f32>() / ratings.len() as f32)
    };
    WeekStats {
        days_checked_in: rows.len() as u32,
        average_rating,
    }
}

fn highlights(rows: &[Checkin]) -> Vec<String> {
    let mut lines = Vec::new();
    for row in rows {
        if let Some(wins) = &row.wins {
            if !wins.trim().is_empty() {
                lines.push(format!("win: {wins}"));
            }
        }
        if let Some(struggles) = &row.struggles {
            if !struggles.trim().is_empty() {
                lines.push(format!("struggle: {struggles}"));
            }
        }
    }
    lines.truncate(MAX_HIGHLIGHTS);
    lines
}

/// POST /api/pulses/generate — summarize a week of check-ins. Regenerating
/// the same week replaces the stored pulse.
pub async fn generate(
    State(app): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let muse = app.muse_required()?;
    let anchor = match &body.week_of {
        Some(raw) => parse_day_key(raw)?,
        None => Utc::now().date_naive(),
    };
    let monday = week_start(anchor);
    let user = body.user_id;

    let store = app.store.clone();
    let (display_name, identity_line, rows) = tokio::task::spawn_blocking(move || {
        let profile = store.profile(user)?;
        let identity_line = store
            .active_blueprint(user)
            .ok()
            .and_then(|b| b.body.identity_line().map(str::to_string));
        let rows = store.checkins_between(user, monday, monday + Duration::days(6))?;
        Ok::<_, lodestar_core::LodestarError>((profile.display_name, identity_line, rows))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let stats = week_stats(&rows);
    let ctx = PulseContext {
        display_name,
        identity_line,
        week_start: day_key(monday),
        days_checked_in: stats.days_checked_in,
        average_rating: stats.average_rating,
        highlights: highlights(&rows),
    };
    let pulse_body = match muse.weekly_pulse(&ctx).await? {
        ModelOutput::Parsed(summary) => PulseBody::Structured {
            headline: summary.headline,
            summary: summary.summary,
            wins: summary.wins,
            focus: summary.focus,
        },
        ModelOutput::RawText(text) => PulseBody::Raw { text },
        ModelOutput::Failed(reason) => return Err(MuseError::UnusableOutput(reason).into()),
    };

    let pulse = Pulse::new(user, monday, pulse_body, stats, muse.model());
    let store = app.store.clone();
    let stored = pulse.clone();
    tokio::task::spawn_blocking(move || store.put_pulse(&stored))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();
    Ok(Json(serde_json::json!(pulse)))
}

/// GET /api/pulses/:user/:week_start — one week's pulse. Any date inside
/// the week resolves to its Monday.
pub async fn get_pulse(
    State(app): State<AppState>,
    Path((user, raw_date)): Path<(Uuid, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let monday = week_start(parse_day_key(&raw_date)?);
    let store = app.store.clone();
    let pulse = tokio::task::spawn_blocking(move || store.pulse(user, monday))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(pulse)))
}

/// GET /api/pulses/:user — all pulses, oldest week first.
pub async fn list_pulses(
    State(app): State<AppState>,
    Path(user): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let pulses = tokio::task::spawn_blocking(move || {
        store.profile(user)?;
        store.list_pulses(user)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(pulses)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(date: &str, rating: Option<u8>, wins: Option<&str>) -> Checkin {
        let mut c = Checkin::new(Uuid::new_v4(), date.parse::<NaiveDate>().unwrap());
        c.day_rating = rating;
        c.wins = wins.map(str::to_string);
        c
    }

    #[test]
    fn stats_average_skips_morning_only_days() {
        let rows = vec![
            row("2024-01-08", Some(8), Some("shipped")),
            row("2024-01-09", None, None),
            row("2024-01-10", Some(6), None),
        ];
        let stats = week_stats(&rows);
        assert_eq!(stats.days_checked_in, 3);
        assert_eq!(stats.average_rating, Some(7.0));
    }

    #[test]
    fn stats_without_ratings_have_no_average() {
        let rows = vec![row("2024-01-08", None, None)];
        assert_eq!(week_stats(&rows).average_rating, None);
    }

    #[test]
    fn highlights_are_capped() {
        let rows: Vec<Checkin> = (0..10)
            .map(|i| row(&format!("2024-01-{:02}", i + 1), Some(5), Some("a win")))
            .collect();
        assert_eq!(highlights(&rows).len(), MAX_HIGHLIGHTS);
    }
}
