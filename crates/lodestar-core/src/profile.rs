use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user profile. Timezone is the IANA name the client reported at signup;
/// it is informational — day boundaries always come from the caller's
/// `local_date`, not from server-side timezone math.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(display_name: impl Into<String>, timezone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            timezone,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_gets_unique_id() {
        let a = Profile::new("Ada", None);
        let b = Profile::new("Ada", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn timezone_omitted_when_absent() {
        let p = Profile::new("Ada", None);
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("timezone"));

        let p = Profile::new("Ada", Some("Europe/Lisbon".into()));
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("Europe/Lisbon"));
    }
}
