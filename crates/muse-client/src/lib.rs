//! `muse-client` — HTTP client for the text-generation backend.
//!
//! Wraps the messages endpoint behind typed prompt contexts so the rest of
//! the workspace never assembles prompt strings or touches wire JSON.
//!
//! ```text
//! BlueprintContext / MorningContext / EveningContext / PulseContext
//!     │  prompt()
//!     ▼
//! MuseClient      ← POST {endpoint}/v1/messages, x-api-key auth
//!     │  complete()
//!     ▼
//! ModelOutput<T>  ← Parsed | RawText | Failed, via the lenient parse chain
//! ```
//!
//! Generation is best-effort by contract: callers treat any [`MuseError`]
//! as a degraded response, never as a failure of the operation that asked
//! for the text.

pub mod client;
pub mod error;
pub mod parse;
pub mod types;

pub use client::MuseClient;
pub use error::MuseError;
pub use parse::{model_output, ModelOutput};
pub use types::{
    BlueprintContext, BlueprintDraft, EveningContext, MorningContext, PulseContext, PulseSummary,
};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, MuseError>;
