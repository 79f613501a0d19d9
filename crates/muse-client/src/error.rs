use thiserror::Error;

#[derive(Debug, Error)]
pub enum MuseError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("No API key available; set the configured environment variable")]
    MissingApiKey,

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model output unusable: {0}")]
    UnusableOutput(String),
}
