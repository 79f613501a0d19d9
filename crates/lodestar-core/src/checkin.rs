//! Daily check-in record: a morning half and an evening half per calendar
//! date. Either half may be missing; whichever arrives first creates the
//! row.

use crate::error::{LodestarError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Entries (request halves)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorningEntry {
    #[serde(default)]
    pub priorities: Vec<String>,
    pub intention: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EveningEntry {
    pub wins: String,
    pub struggles: String,
    pub gratitude: String,
    /// 1-10 inclusive.
    pub day_rating: u8,
}

impl EveningEntry {
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.day_rating) {
            return Err(LodestarError::InvalidDayRating(self.day_rating));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Checkin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkin {
    pub user_id: Uuid,
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priorities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intention: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning_completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wins: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub struggles: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gratitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening_completed_at: Option<DateTime<Utc>>,
}

impl Checkin {
    pub fn new(user_id: Uuid, date: NaiveDate) -> Self {
        Self {
            user_id,
            date,
            priorities: None,
            intention: None,
            morning_completed_at: None,
            wins: None,
            struggles: None,
            gratitude: None,
            day_rating: None,
            evening_completed_at: None,
        }
    }

    /// Record (or overwrite) the morning half.
    pub fn record_morning(&mut self, entry: MorningEntry, now: DateTime<Utc>) {
        self.priorities = Some(entry.priorities);
        self.intention = Some(entry.intention);
        self.morning_completed_at = Some(now);
    }

    /// Record (or overwrite) the evening half.
    pub fn record_evening(&mut self, entry: EveningEntry, now: DateTime<Utc>) {
        self.wins = Some(entry.wins);
        self.struggles = Some(entry.struggles);
        self.gratitude = Some(entry.gratitude);
        self.day_rating = Some(entry.day_rating);
        self.evening_completed_at = Some(now);
    }

    pub fn morning_done(&self) -> bool {
        self.morning_completed_at.is_some()
    }

    pub fn evening_done(&self) -> bool {
        self.evening_completed_at.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.morning_done() && self.evening_done()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
