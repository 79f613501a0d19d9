//! Blueprint: the generated identity/purpose/values document. Versioned per
//! user; at most one version is active at a time (the store enforces that
//! with an active-pointer row).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// BlueprintBody
// ---------------------------------------------------------------------------

/// Generated content. `Raw` carries the model's unstructured text when the
/// response could not be parsed into the documented schema — a fallback,
/// not a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlueprintBody {
    Structured {
        identity: String,
        purpose: String,
        values: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        narrative: Option<String>,
    },
    Raw {
        text: String,
    },
}

impl BlueprintBody {
    /// The one-line identity statement, if the body is structured.
    pub fn identity_line(&self) -> Option<&str> {
        match self {
            BlueprintBody::Structured { identity, .. } => Some(identity),
            BlueprintBody::Raw { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Blueprint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    pub user_id: Uuid,
    /// 1-based, assigned by the store on insert.
    pub version: u32,
    pub body: BlueprintBody,
    /// Model that produced this version.
    pub model: String,
    pub created_at: DateTime<Utc>,
}

impl Blueprint {
    pub fn new(user_id: Uuid, version: u32, body: BlueprintBody, model: impl Into<String>) -> Self {
        Self {
            user_id,
            version,
            body,
            model: model.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_body_round_trips() {
        let body = BlueprintBody::Structured {
            identity: "A builder who finishes".into(),
            purpose: "Make useful things".into(),
            values: vec!["craft".into(), "honesty".into()],
            narrative: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"kind\":\"structured\""));
        let parsed: BlueprintBody = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.identity_line(), Some("A builder who finishes"));
    }

    #[test]
    fn raw_body_has_no_identity_line() {
        let body = BlueprintBody::Raw {
            text: "free-form reflection".into(),
        };
        assert!(body.identity_line().is_none());
    }
}
