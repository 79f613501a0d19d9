use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LodestarError {
    #[error("not initialized: run 'lodestar init'")]
    NotInitialized,

    #[error("profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("profile already exists: {0}")]
    ProfileExists(Uuid),

    #[error("check-in not found for {user} on {date}")]
    CheckinNotFound { user: Uuid, date: NaiveDate },

    #[error("blueprint v{version} not found for {user}")]
    BlueprintNotFound { user: Uuid, version: u32 },

    #[error("no active blueprint for {0}")]
    NoActiveBlueprint(Uuid),

    #[error("pulse not found for {user}, week of {week_start}")]
    PulseNotFound { user: Uuid, week_start: NaiveDate },

    #[error("check-in date {today} is earlier than last credited date {last}")]
    InvalidDateOrder { last: NaiveDate, today: NaiveDate },

    #[error("invalid day key '{0}': expected yyyy-MM-dd")]
    InvalidDayKey(String),

    #[error("invalid day rating {0}: must be 1-10")]
    InvalidDayRating(u8),

    #[error("invalid date range: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error("store error: {0}")]
    Store(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LodestarError>;
