use serde::Deserialize;
use std::fmt::Write;

// ─── Prompt contexts ──────────────────────────────────────────────────────

/// Everything the model needs to draft a blueprint: the user's name and
/// their free-form onboarding reflections.
#[derive(Debug, Clone)]
pub struct BlueprintContext {
    pub display_name: String,
    pub reflections: Vec<String>,
}

impl BlueprintContext {
    pub fn prompt(&self) -> String {
        let mut p = String::new();
        let _ = writeln!(
            p,
            "You are a thoughtful coach helping {} articulate who they want to become.",
            self.display_name
        );
        let _ = writeln!(p, "Their reflections:");
        for r in &self.reflections {
            let _ = writeln!(p, "- {r}");
        }
        let _ = writeln!(
            p,
            "\nRespond with a single JSON object with fields: \
             \"identity\" (one sentence, second person), \"purpose\" (one sentence), \
             \"values\" (array of 3-5 short strings), \"narrative\" (optional short paragraph)."
        );
        p
    }
}

/// Context for the short encouragement returned with a morning check-in.
#[derive(Debug, Clone)]
pub struct MorningContext {
    pub display_name: String,
    /// Identity line from the active blueprint, when one exists.
    pub identity_line: Option<String>,
    pub priorities: Vec<String>,
    pub intention: String,
    pub current_streak: u32,
}

impl MorningContext {
    pub fn prompt(&self) -> String {
        let mut p = String::new();
        let _ = writeln!(
            p,
            "Write a two-sentence morning encouragement for {}. Plain text, no preamble.",
            self.display_name
        );
        if let Some(identity) = &self.identity_line {
            let _ = writeln!(p, "They are becoming: {identity}");
        }
        if !self.priorities.is_empty() {
            let _ = writeln!(p, "Today's priorities: {}", self.priorities.join("; "));
        }
        let _ = writeln!(p, "Today's intention: {}", self.intention);
        let _ = writeln!(p, "Current check-in streak: {} days.", self.current_streak);
        p
    }
}

/// Context for the reflection returned with an evening check-in.
#[derive(Debug, Clone)]
pub struct EveningContext {
    pub display_name: String,
    pub identity_line: Option<String>,
    pub wins: String,
    pub struggles: String,
    pub gratitude: String,
    pub day_rating: u8,
    pub current_streak: u32,
}

impl EveningContext {
    pub fn prompt(&self) -> String {
        let mut p = String::new();
        let _ = writeln!(
            p,
            "Write a two-sentence evening reflection for {}. Plain text, no preamble.",
            self.display_name
        );
        if let Some(identity) = &self.identity_line {
            let _ = writeln!(p, "They are becoming: {identity}");
        }
        let _ = writeln!(p, "Wins: {}", self.wins);
        let _ = writeln!(p, "Struggles: {}", self.struggles);
        let _ = writeln!(p, "Gratitude: {}", self.gratitude);
        let _ = writeln!(
            p,
            "They rated the day {}/10 and are on a {}-day streak.",
            self.day_rating, self.current_streak
        );
        p
    }
}

/// Context for the weekly pulse: aggregate numbers plus a sample of the
/// week's entries.
#[derive(Debug, Clone)]
pub struct PulseContext {
    pub display_name: String,
    pub identity_line: Option<String>,
    /// ISO date of the Monday the week starts on.
    pub week_start: String,
    pub days_checked_in: u32,
    pub average_rating: Option<f32>,
    /// Win/struggle lines pulled from the week's evening entries.
    pub highlights: Vec<String>,
}

impl PulseContext {
    pub fn prompt(&self) -> String {
        let mut p = String::new();
        let _ = writeln!(
            p,
            "Summarize {}'s week starting {}.",
            self.display_name, self.week_start
        );
        if let Some(identity) = &self.identity_line {
            let _ = writeln!(p, "They are becoming: {identity}");
        }
        let _ = writeln!(p, "Days checked in: {} of 7.", self.days_checked_in);
        if let Some(avg) = self.average_rating {
            let _ = writeln!(p, "Average day rating: {avg:.1}/10.");
        }
        if !self.highlights.is_empty() {
            let _ = writeln!(p, "From their entries:");
            for h in &self.highlights {
                let _ = writeln!(p, "- {h}");
            }
        }
        let _ = writeln!(
            p,
            "\nRespond with a single JSON object with fields: \
             \"headline\" (short), \"summary\" (2-3 sentences), \
             \"wins\" (array of short strings), \"focus\" (array of short strings)."
        );
        p
    }
}

// ─── Structured output shapes ─────────────────────────────────────────────

/// The JSON shape requested by [`BlueprintContext::prompt`].
#[derive(Debug, Clone, Deserialize)]
pub struct BlueprintDraft {
    pub identity: String,
    pub purpose: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub narrative: Option<String>,
}

/// The JSON shape requested by [`PulseContext::prompt`].
#[derive(Debug, Clone, Deserialize)]
pub struct PulseSummary {
    pub headline: String,
    pub summary: String,
    #[serde(default)]
    pub wins: Vec<String>,
    #[serde(default)]
    pub focus: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blueprint_prompt_lists_reflections() {
        let ctx = BlueprintContext {
            display_name: "Ada".into(),
            reflections: vec!["I want to ship more".into(), "I value honesty".into()],
        };
        let p = ctx.prompt();
        assert!(p.contains("Ada"));
        assert!(p.contains("- I want to ship more"));
        assert!(p.contains("\"identity\""));
    }

    #[test]
    fn morning_prompt_includes_streak_and_identity() {
        let ctx = MorningContext {
            display_name: "Ada".into(),
            identity_line: Some("A builder who finishes".into()),
            priorities: vec!["deep work".into()],
            intention: "stay present".into(),
            current_streak: 4,
        };
        let p = ctx.prompt();
        assert!(p.contains("A builder who finishes"));
        assert!(p.contains("4 days"));
    }

    #[test]
    fn pulse_prompt_omits_missing_rating() {
        let ctx = PulseContext {
            display_name: "Ada".into(),
            identity_line: None,
            week_start: "2024-01-08".into(),
            days_checked_in: 2,
            average_rating: None,
            highlights: vec![],
        };
        let p = ctx.prompt();
        assert!(p.contains("2 of 7"));
        assert!(!p.contains("Average day rating"));
    }
}
