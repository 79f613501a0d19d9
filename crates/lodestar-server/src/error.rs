use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lodestar_core::error::LodestarError;
use muse_client::MuseError;

// ---------------------------------------------------------------------------
// Internal sentinels for explicit status codes
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain without touching the `LodestarError` enum.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// Private sentinel for HTTP 503 — a generation endpoint was called on a
/// deployment with no text backend configured.
#[derive(Debug)]
struct UnavailableError(String);

impl std::fmt::Display for UnavailableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for UnavailableError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    /// Construct a 503 Service Unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self(UnavailableError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Check explicit sentinel types before falling through to the
        // domain enums.
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }
        if let Some(u) = self.0.downcast_ref::<UnavailableError>() {
            let body = serde_json::json!({ "error": u.0.clone() });
            return (StatusCode::SERVICE_UNAVAILABLE, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<LodestarError>() {
            match e {
                LodestarError::NotInitialized => StatusCode::BAD_REQUEST,
                LodestarError::ProfileNotFound(_)
                | LodestarError::CheckinNotFound { .. }
                | LodestarError::BlueprintNotFound { .. }
                | LodestarError::NoActiveBlueprint(_)
                | LodestarError::PulseNotFound { .. } => StatusCode::NOT_FOUND,
                LodestarError::ProfileExists(_) => StatusCode::CONFLICT,
                LodestarError::InvalidDayKey(_)
                | LodestarError::InvalidDayRating(_)
                | LodestarError::InvalidDateRange { .. } => StatusCode::BAD_REQUEST,
                LodestarError::InvalidDateOrder { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                LodestarError::Store(_)
                | LodestarError::Io(_)
                | LodestarError::Yaml(_)
                | LodestarError::Json(_)
                | LodestarError::HomeNotFound => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(e) = self.0.downcast_ref::<MuseError>() {
            match e {
                MuseError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
                MuseError::Http(_)
                | MuseError::Api { .. }
                | MuseError::EmptyResponse
                | MuseError::UnusableOutput(_) => StatusCode::BAD_GATEWAY,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
