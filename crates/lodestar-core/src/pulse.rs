//! Pulse: the weekly generated progress summary, keyed by the Monday of the
//! week it covers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generated content, with the same raw-text fallback as blueprints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PulseBody {
    Structured {
        headline: String,
        summary: String,
        #[serde(default)]
        wins: Vec<String>,
        #[serde(default)]
        focus: Vec<String>,
    },
    Raw {
        text: String,
    },
}

/// Activity numbers for the week, snapshotted at generation time so the
/// pulse stays stable even if check-ins are edited later.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeekStats {
    pub days_checked_in: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pulse {
    pub user_id: Uuid,
    /// Monday of the covered week.
    pub week_start: NaiveDate,
    pub body: PulseBody,
    pub stats: WeekStats,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

impl Pulse {
    pub fn new(
        user_id: Uuid,
        week_start: NaiveDate,
        body: PulseBody,
        stats: WeekStats,
        model: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            week_start,
            body,
            stats,
            model: model.into(),
            created_at: Utc::now(),
        }
    }
}
