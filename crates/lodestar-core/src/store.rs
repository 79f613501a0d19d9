//! Persistent storage on redb.
//!
//! # Table design
//!
//! All tables use string keys and JSON-encoded values. Per-day records use a
//! composite `"{user}/{yyyy-mm-dd}"` key: the uuid prefix is fixed-width and
//! ISO day keys sort lexicographically, so one range scan returns a user's
//! records in date order with no post-filtering.
//!
//! # Atomicity
//!
//! A check-in submission merges the day's check-in row AND applies the
//! streak transition inside a single write transaction. redb serializes
//! write transactions, so of two concurrent same-day submissions the second
//! observes `last_checkin_date == today` and credits nothing — the
//! read-modify-write race from double-counting is closed at this layer, not
//! in the handlers.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use redb::{Database, ReadableTable, TableDefinition};
use uuid::Uuid;

use crate::blueprint::{Blueprint, BlueprintBody};
use crate::checkin::{Checkin, EveningEntry, MorningEntry};
use crate::dates::day_key;
use crate::error::{LodestarError, Result};
use crate::profile::Profile;
use crate::pulse::Pulse;
use crate::streak::{compute_streak_update, Streak};

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

/// Key: user uuid. Value: JSON-encoded Profile.
const PROFILES: TableDefinition<&str, &[u8]> = TableDefinition::new("profiles");
/// Key: user uuid. Value: JSON-encoded Streak.
const STREAKS: TableDefinition<&str, &[u8]> = TableDefinition::new("streaks");
/// Key: `"{user}/{yyyy-mm-dd}"`. Value: JSON-encoded Checkin.
const CHECKINS: TableDefinition<&str, &[u8]> = TableDefinition::new("checkins");
/// Key: `"{user}/{version:06}"`. Value: JSON-encoded Blueprint.
const BLUEPRINTS: TableDefinition<&str, &[u8]> = TableDefinition::new("blueprints");
/// Key: user uuid. Value: the active blueprint version.
const BLUEPRINT_ACTIVE: TableDefinition<&str, u32> = TableDefinition::new("blueprint_active");
/// Key: `"{user}/{yyyy-mm-dd}"` (Monday of the week). Value: JSON Pulse.
const PULSES: TableDefinition<&str, &[u8]> = TableDefinition::new("pulses");

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

fn checkin_key(user: Uuid, date: NaiveDate) -> String {
    format!("{user}/{}", day_key(date))
}

fn blueprint_key(user: Uuid, version: u32) -> String {
    format!("{user}/{version:06}")
}

fn pulse_key(user: Uuid, week_start: NaiveDate) -> String {
    format!("{user}/{}", day_key(week_start))
}

/// Half-open range covering every composite key for `user`. `'0'` is the
/// first byte after `'/'`, so `["{user}/", "{user}0")` spans all suffixes.
fn user_range(user: Uuid) -> (String, String) {
    (format!("{user}/"), format!("{user}0"))
}

fn db_err<E: std::fmt::Display>(e: E) -> LodestarError {
    LodestarError::Store(e.to_string())
}

// ---------------------------------------------------------------------------
// Check-in outcome
// ---------------------------------------------------------------------------

/// What the streak transition did for this submission. Out-of-order dates
/// are reported distinctly (not as a break) and leave the stored streak
/// untouched; the check-in itself is still saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakCredit {
    Credited { streak_broken: bool },
    SameDay,
    OutOfOrder,
}

impl StreakCredit {
    pub fn credited(&self) -> bool {
        matches!(self, StreakCredit::Credited { .. })
    }

    pub fn streak_broken(&self) -> bool {
        matches!(
            self,
            StreakCredit::Credited {
                streak_broken: true
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct CheckinOutcome {
    pub checkin: Checkin,
    pub streak: Streak,
    pub credit: StreakCredit,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct Store {
    db: Database,
}

impl Store {
    /// Open or create the redb database at `path`, ensuring all tables
    /// exist before any reads.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(db_err)?;
        let wt = db.begin_write().map_err(db_err)?;
        wt.open_table(PROFILES).map_err(db_err)?;
        wt.open_table(STREAKS).map_err(db_err)?;
        wt.open_table(CHECKINS).map_err(db_err)?;
        wt.open_table(BLUEPRINTS).map_err(db_err)?;
        wt.open_table(BLUEPRINT_ACTIVE).map_err(db_err)?;
        wt.open_table(PULSES).map_err(db_err)?;
        wt.commit().map_err(db_err)?;
        Ok(Self { db })
    }

    // -----------------------------------------------------------------------
    // Profiles
    // -----------------------------------------------------------------------

    pub fn create_profile(&self, profile: &Profile) -> Result<()> {
        let key = profile.id.to_string();
        let value = serde_json::to_vec(profile)?;
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = wt.open_table(PROFILES).map_err(db_err)?;
            if table.get(key.as_str()).map_err(db_err)?.is_some() {
                return Err(LodestarError::ProfileExists(profile.id));
            }
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    pub fn profile(&self, user: Uuid) -> Result<Profile> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(PROFILES).map_err(db_err)?;
        let key = user.to_string();
        match table.get(key.as_str()).map_err(db_err)? {
            Some(v) => Ok(serde_json::from_slice(v.value())?),
            None => Err(LodestarError::ProfileNotFound(user)),
        }
    }

    pub fn list_profiles(&self) -> Result<Vec<Profile>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(PROFILES).map_err(db_err)?;
        let mut profiles = Vec::new();
        for entry in table.iter().map_err(db_err)? {
            let (_, v) = entry.map_err(db_err)?;
            profiles.push(serde_json::from_slice::<Profile>(v.value())?);
        }
        profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(profiles)
    }

    // -----------------------------------------------------------------------
    // Streaks
    // -----------------------------------------------------------------------

    /// The user's streak row, or a zeroed row if none has been created yet.
    pub fn streak(&self, user: Uuid) -> Result<Streak> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(STREAKS).map_err(db_err)?;
        let key = user.to_string();
        match table.get(key.as_str()).map_err(db_err)? {
            Some(v) => Ok(serde_json::from_slice(v.value())?),
            None => Ok(Streak::new(user)),
        }
    }

    // -----------------------------------------------------------------------
    // Check-ins
    // -----------------------------------------------------------------------

    pub fn submit_morning(
        &self,
        user: Uuid,
        date: NaiveDate,
        entry: MorningEntry,
    ) -> Result<CheckinOutcome> {
        self.submit_half(user, date, |checkin, now| {
            checkin.record_morning(entry, now);
        })
    }

    pub fn submit_evening(
        &self,
        user: Uuid,
        date: NaiveDate,
        entry: EveningEntry,
    ) -> Result<CheckinOutcome> {
        entry.validate()?;
        self.submit_half(user, date, |checkin, now| {
            checkin.record_evening(entry, now);
        })
    }

    /// Merge one half into the day's check-in row and apply the streak
    /// transition, all inside one write transaction.
    fn submit_half(
        &self,
        user: Uuid,
        date: NaiveDate,
        apply: impl FnOnce(&mut Checkin, DateTime<Utc>),
    ) -> Result<CheckinOutcome> {
        let now = Utc::now();
        let user_key = user.to_string();
        let row_key = checkin_key(user, date);

        let wt = self.db.begin_write().map_err(db_err)?;
        let outcome = {
            // The profile must exist; a write transaction can read.
            let profiles = wt.open_table(PROFILES).map_err(db_err)?;
            if profiles.get(user_key.as_str()).map_err(db_err)?.is_none() {
                return Err(LodestarError::ProfileNotFound(user));
            }

            let mut checkins = wt.open_table(CHECKINS).map_err(db_err)?;
            let mut checkin = match checkins.get(row_key.as_str()).map_err(db_err)? {
                Some(v) => serde_json::from_slice(v.value())?,
                None => Checkin::new(user, date),
            };
            apply(&mut checkin, now);
            let value = serde_json::to_vec(&checkin)?;
            checkins
                .insert(row_key.as_str(), value.as_slice())
                .map_err(db_err)?;

            let mut streaks = wt.open_table(STREAKS).map_err(db_err)?;
            let mut streak: Streak = match streaks.get(user_key.as_str()).map_err(db_err)? {
                Some(v) => serde_json::from_slice(v.value())?,
                None => Streak::new(user),
            };

            let credit = if streak.last_checkin_date == Some(date) {
                // Second submission of the day (evening after morning, or a
                // concurrent duplicate): idempotent no-op.
                StreakCredit::SameDay
            } else {
                match compute_streak_update(
                    streak.last_checkin_date,
                    streak.current_streak,
                    streak.longest_streak,
                    streak.total_checkins,
                    date,
                ) {
                    Ok(update) => {
                        streak.apply(&update, date, now);
                        let value = serde_json::to_vec(&streak)?;
                        streaks
                            .insert(user_key.as_str(), value.as_slice())
                            .map_err(db_err)?;
                        StreakCredit::Credited {
                            streak_broken: update.streak_broken,
                        }
                    }
                    Err(LodestarError::InvalidDateOrder { last, today }) => {
                        // Clock skew or an out-of-order write: keep the
                        // check-in, leave the streak row alone.
                        tracing::warn!(
                            user = %user,
                            %last,
                            %today,
                            "check-in date precedes last credited date; streak left untouched"
                        );
                        StreakCredit::OutOfOrder
                    }
                    Err(e) => return Err(e),
                }
            };

            CheckinOutcome {
                checkin,
                streak,
                credit,
            }
        };
        wt.commit().map_err(db_err)?;
        Ok(outcome)
    }

    pub fn checkin(&self, user: Uuid, date: NaiveDate) -> Result<Checkin> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(CHECKINS).map_err(db_err)?;
        let key = checkin_key(user, date);
        match table.get(key.as_str()).map_err(db_err)? {
            Some(v) => Ok(serde_json::from_slice(v.value())?),
            None => Err(LodestarError::CheckinNotFound { user, date }),
        }
    }

    /// All of a user's check-ins in `[from, to]`, in date order.
    pub fn checkins_between(
        &self,
        user: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Checkin>> {
        if from > to {
            return Err(LodestarError::InvalidDateRange { from, to });
        }
        let start = checkin_key(user, from);
        let end = checkin_key(user, to);
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(CHECKINS).map_err(db_err)?;
        let mut result = Vec::new();
        for entry in table
            .range(start.as_str()..=end.as_str())
            .map_err(db_err)?
        {
            let (_, v) = entry.map_err(db_err)?;
            result.push(serde_json::from_slice::<Checkin>(v.value())?);
        }
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Blueprints
    // -----------------------------------------------------------------------

    /// Store a newly generated blueprint under the next version number and
    /// make it the active version.
    pub fn put_blueprint(
        &self,
        user: Uuid,
        body: BlueprintBody,
        model: impl Into<String>,
    ) -> Result<Blueprint> {
        let user_key = user.to_string();
        let wt = self.db.begin_write().map_err(db_err)?;
        let blueprint = {
            let mut table = wt.open_table(BLUEPRINTS).map_err(db_err)?;
            let (start, end) = user_range(user);
            let mut latest = 0u32;
            for entry in table
                .range(start.as_str()..end.as_str())
                .map_err(db_err)?
            {
                let (_, v) = entry.map_err(db_err)?;
                let existing: Blueprint = serde_json::from_slice(v.value())?;
                latest = latest.max(existing.version);
            }

            let blueprint = Blueprint::new(user, latest + 1, body, model);
            let key = blueprint_key(user, blueprint.version);
            let value = serde_json::to_vec(&blueprint)?;
            table.insert(key.as_str(), value.as_slice()).map_err(db_err)?;

            let mut active = wt.open_table(BLUEPRINT_ACTIVE).map_err(db_err)?;
            active
                .insert(user_key.as_str(), blueprint.version)
                .map_err(db_err)?;
            blueprint
        };
        wt.commit().map_err(db_err)?;
        Ok(blueprint)
    }

    pub fn blueprint(&self, user: Uuid, version: u32) -> Result<Blueprint> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(BLUEPRINTS).map_err(db_err)?;
        let key = blueprint_key(user, version);
        match table.get(key.as_str()).map_err(db_err)? {
            Some(v) => Ok(serde_json::from_slice(v.value())?),
            None => Err(LodestarError::BlueprintNotFound { user, version }),
        }
    }

    /// The single active blueprint version for `user`.
    pub fn active_blueprint(&self, user: Uuid) -> Result<Blueprint> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let active = rt.open_table(BLUEPRINT_ACTIVE).map_err(db_err)?;
        let key = user.to_string();
        let version = match active.get(key.as_str()).map_err(db_err)? {
            Some(v) => v.value(),
            None => return Err(LodestarError::NoActiveBlueprint(user)),
        };
        drop(active);
        self.blueprint(user, version)
    }

    /// All versions for `user`, oldest first.
    pub fn list_blueprints(&self, user: Uuid) -> Result<Vec<Blueprint>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(BLUEPRINTS).map_err(db_err)?;
        let (start, end) = user_range(user);
        let mut result = Vec::new();
        for entry in table
            .range(start.as_str()..end.as_str())
            .map_err(db_err)?
        {
            let (_, v) = entry.map_err(db_err)?;
            result.push(serde_json::from_slice::<Blueprint>(v.value())?);
        }
        Ok(result)
    }

    /// Point the active marker at an existing version. Swapping the pointer
    /// is what keeps "at most one active version" true by construction.
    pub fn activate_blueprint(&self, user: Uuid, version: u32) -> Result<()> {
        let user_key = user.to_string();
        let key = blueprint_key(user, version);
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let table = wt.open_table(BLUEPRINTS).map_err(db_err)?;
            if table.get(key.as_str()).map_err(db_err)?.is_none() {
                return Err(LodestarError::BlueprintNotFound { user, version });
            }
            let mut active = wt.open_table(BLUEPRINT_ACTIVE).map_err(db_err)?;
            active.insert(user_key.as_str(), version).map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pulses
    // -----------------------------------------------------------------------

    /// Insert or replace the pulse for its week.
    pub fn put_pulse(&self, pulse: &Pulse) -> Result<()> {
        let key = pulse_key(pulse.user_id, pulse.week_start);
        let value = serde_json::to_vec(pulse)?;
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = wt.open_table(PULSES).map_err(db_err)?;
            table.insert(key.as_str(), value.as_slice()).map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    pub fn pulse(&self, user: Uuid, week_start: NaiveDate) -> Result<Pulse> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(PULSES).map_err(db_err)?;
        let key = pulse_key(user, week_start);
        match table.get(key.as_str()).map_err(db_err)? {
            Some(v) => Ok(serde_json::from_slice(v.value())?),
            None => Err(LodestarError::PulseNotFound { user, week_start }),
        }
    }

    /// All pulses for `user`, oldest week first.
    pub fn list_pulses(&self, user: Uuid) -> Result<Vec<Pulse>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(PULSES).map_err(db_err)?;
        let (start, end) = user_range(user);
        let mut result = Vec::new();
        for entry in table
            .range(start.as_str()..end.as_str())
            .map_err(db_err)?
        {
            let (_, v) = entry.map_err(db_err)?;
            result.push(serde_json::from_slice::<Pulse>(v.value())?);
        }
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_day_key;
    use tempfile::TempDir;

    fn open_tmp() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("test.redb")).unwrap();
        (dir, store)
    }

    fn new_user(store: &Store) -> Uuid {
        let profile = Profile::new("Ada", Some("Europe/Lisbon".into()));
        store.create_profile(&profile).unwrap();
        profile.id
    }

    fn d(s: &str) -> NaiveDate {
        parse_day_key(s).unwrap()
    }

    fn morning() -> MorningEntry {
        MorningEntry {
            priorities: vec!["deep work".into()],
            intention: "one thing at a time".into(),
        }
    }

    fn evening() -> EveningEntry {
        EveningEntry {
            wins: "focused morning".into(),
            struggles: "afternoon slump".into(),
            gratitude: "quiet office".into(),
            day_rating: 7,
        }
    }

    #[test]
    fn first_morning_creates_streak_row() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);

        let outcome = store.submit_morning(user, d("2024-01-10"), morning()).unwrap();
        assert_eq!(outcome.streak.current_streak, 1);
        assert_eq!(outcome.streak.total_checkins, 1);
        assert_eq!(outcome.streak.last_checkin_date, Some(d("2024-01-10")));
        assert_eq!(
            outcome.credit,
            StreakCredit::Credited {
                streak_broken: false
            }
        );
        assert!(outcome.checkin.morning_done());
    }

    #[test]
    fn evening_same_day_does_not_double_count() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);

        store.submit_morning(user, d("2024-01-10"), morning()).unwrap();
        let outcome = store.submit_evening(user, d("2024-01-10"), evening()).unwrap();

        assert_eq!(outcome.credit, StreakCredit::SameDay);
        assert_eq!(outcome.streak.current_streak, 1);
        assert_eq!(outcome.streak.total_checkins, 1);
        assert!(outcome.checkin.is_complete());
    }

    #[test]
    fn concurrent_same_day_submissions_credit_once() {
        let (_dir, store) = open_tmp();
        let store = std::sync::Arc::new(store);
        let user = new_user(&store);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .submit_morning(user, d("2024-01-10"), morning())
                        .unwrap()
                        .credit
                })
            })
            .collect();
        let credits: Vec<StreakCredit> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Write transactions serialize: exactly one submission wins the
        // credit, the rest observe last_checkin_date == today.
        assert_eq!(credits.iter().filter(|c| c.credited()).count(), 1);
        assert_eq!(credits.iter().filter(|c| **c == StreakCredit::SameDay).count(), 7);

        let streak = store.streak(user).unwrap();
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.total_checkins, 1);
    }

    #[test]
    fn consecutive_days_extend_the_streak() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);

        store.submit_morning(user, d("2024-01-10"), morning()).unwrap();
        let outcome = store.submit_morning(user, d("2024-01-11"), morning()).unwrap();
        assert_eq!(outcome.streak.current_streak, 2);
        assert_eq!(outcome.streak.longest_streak, 2);
        assert_eq!(outcome.streak.total_checkins, 2);
        assert!(!outcome.credit.streak_broken());
    }

    #[test]
    fn gap_breaks_the_streak_but_keeps_longest() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);

        for day in ["2024-01-10", "2024-01-11", "2024-01-12"] {
            store.submit_morning(user, d(day), morning()).unwrap();
        }
        let outcome = store.submit_morning(user, d("2024-01-15"), morning()).unwrap();
        assert_eq!(outcome.streak.current_streak, 1);
        assert_eq!(outcome.streak.longest_streak, 3);
        assert_eq!(outcome.streak.total_checkins, 4);
        assert!(outcome.credit.streak_broken());
    }

    #[test]
    fn out_of_order_date_saves_checkin_but_not_streak() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);

        store.submit_morning(user, d("2024-01-10"), morning()).unwrap();
        let outcome = store.submit_morning(user, d("2024-01-08"), morning()).unwrap();

        assert_eq!(outcome.credit, StreakCredit::OutOfOrder);
        // Backfilled check-in exists...
        assert!(store.checkin(user, d("2024-01-08")).unwrap().morning_done());
        // ...but the streak row is exactly as it was.
        let streak = store.streak(user).unwrap();
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.total_checkins, 1);
        assert_eq!(streak.last_checkin_date, Some(d("2024-01-10")));
    }

    #[test]
    fn evening_without_morning_creates_row_and_credits() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);

        let outcome = store.submit_evening(user, d("2024-01-10"), evening()).unwrap();
        assert!(outcome.credit.credited());
        assert!(!outcome.checkin.morning_done());
        assert!(outcome.checkin.evening_done());
    }

    #[test]
    fn submit_requires_profile() {
        let (_dir, store) = open_tmp();
        let ghost = Uuid::new_v4();
        let err = store.submit_morning(ghost, d("2024-01-10"), morning()).unwrap_err();
        assert!(matches!(err, LodestarError::ProfileNotFound(_)));
    }

    #[test]
    fn invalid_rating_rejected_before_any_write() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);
        let mut bad = evening();
        bad.day_rating = 0;
        assert!(store.submit_evening(user, d("2024-01-10"), bad).is_err());
        assert!(store.checkin(user, d("2024-01-10")).is_err());
    }

    #[test]
    fn checkins_between_is_ordered_and_bounded() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);
        for day in ["2024-01-10", "2024-01-11", "2024-01-13", "2024-02-01"] {
            store.submit_morning(user, d(day), morning()).unwrap();
        }
        // Another user's rows must not bleed into the scan.
        let other = new_user(&store);
        store.submit_morning(other, d("2024-01-12"), morning()).unwrap();

        let rows = store
            .checkins_between(user, d("2024-01-10"), d("2024-01-31"))
            .unwrap();
        let dates: Vec<NaiveDate> = rows.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![d("2024-01-10"), d("2024-01-11"), d("2024-01-13")]);
    }

    #[test]
    fn checkins_between_rejects_inverted_range() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);
        let err = store
            .checkins_between(user, d("2024-01-31"), d("2024-01-10"))
            .unwrap_err();
        assert!(matches!(err, LodestarError::InvalidDateRange { .. }));
    }

    #[test]
    fn missing_checkin_is_not_found() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);
        let err = store.checkin(user, d("2024-01-10")).unwrap_err();
        assert!(matches!(err, LodestarError::CheckinNotFound { .. }));
    }

    #[test]
    fn streak_defaults_to_zeroed_row() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);
        let streak = store.streak(user).unwrap();
        assert_eq!(streak.current_streak, 0);
        assert_eq!(streak.last_checkin_date, None);
    }

    #[test]
    fn blueprint_versions_increment_and_activate() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);

        let v1 = store
            .put_blueprint(user, BlueprintBody::Raw { text: "draft".into() }, "muse-large")
            .unwrap();
        assert_eq!(v1.version, 1);
        let v2 = store
            .put_blueprint(
                user,
                BlueprintBody::Structured {
                    identity: "a finisher".into(),
                    purpose: "ship".into(),
                    values: vec!["craft".into()],
                    narrative: None,
                },
                "muse-large",
            )
            .unwrap();
        assert_eq!(v2.version, 2);

        // Latest generation becomes active.
        assert_eq!(store.active_blueprint(user).unwrap().version, 2);

        // Re-activating an older version swaps the single pointer.
        store.activate_blueprint(user, 1).unwrap();
        assert_eq!(store.active_blueprint(user).unwrap().version, 1);
        assert_eq!(store.list_blueprints(user).unwrap().len(), 2);
    }

    #[test]
    fn activate_unknown_version_fails() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);
        let err = store.activate_blueprint(user, 3).unwrap_err();
        assert!(matches!(err, LodestarError::BlueprintNotFound { .. }));
    }

    #[test]
    fn no_active_blueprint_without_generation() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);
        let err = store.active_blueprint(user).unwrap_err();
        assert!(matches!(err, LodestarError::NoActiveBlueprint(_)));
    }

    #[test]
    fn pulse_put_get_replace() {
        let (_dir, store) = open_tmp();
        let user = new_user(&store);
        let week = d("2024-01-08");

        let pulse = Pulse::new(
            user,
            week,
            crate::pulse::PulseBody::Raw { text: "ok week".into() },
            crate::pulse::WeekStats {
                days_checked_in: 3,
                average_rating: Some(6.0),
            },
            "muse-large",
        );
        store.put_pulse(&pulse).unwrap();
        assert_eq!(store.pulse(user, week).unwrap().stats.days_checked_in, 3);

        // Regenerating the same week replaces the record.
        let pulse = Pulse::new(
            user,
            week,
            crate::pulse::PulseBody::Raw { text: "better week".into() },
            crate::pulse::WeekStats {
                days_checked_in: 5,
                average_rating: Some(7.5),
            },
            "muse-large",
        );
        store.put_pulse(&pulse).unwrap();
        assert_eq!(store.pulse(user, week).unwrap().stats.days_checked_in, 5);
        assert_eq!(store.list_pulses(user).unwrap().len(), 1);
    }

    #[test]
    fn duplicate_profile_rejected() {
        let (_dir, store) = open_tmp();
        let profile = Profile::new("Ada", None);
        store.create_profile(&profile).unwrap();
        assert!(matches!(
            store.create_profile(&profile).unwrap_err(),
            LodestarError::ProfileExists(_)
        ));
    }

    #[test]
    fn profiles_listed_in_creation_order() {
        let (_dir, store) = open_tmp();
        let a = Profile::new("Ada", None);
        store.create_profile(&a).unwrap();
        let b = Profile::new("Grace", None);
        store.create_profile(&b).unwrap();
        let listed = store.list_profiles().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, a.id);
    }
}
