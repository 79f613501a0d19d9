//! Lenient parsing of model output into a requested JSON shape.
//!
//! Models asked for "a single JSON object" return, in practice: bare JSON, a
//! fenced ```json block with commentary around it, or prose. The parse chain
//! tries each in order and degrades to raw text rather than failing the
//! whole request; the caller decides how to render the fallback.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

/// Outcome of interpreting a model response as a `T`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput<T> {
    /// The response (or a fenced block inside it) parsed as `T`.
    Parsed(T),
    /// Not parseable as `T`, but usable as text.
    RawText(String),
    /// Nothing usable at all.
    Failed(String),
}

impl<T> ModelOutput<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ModelOutput::Parsed(_))
    }
}

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // ```json ... ``` or a bare ``` fence; non-greedy body.
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").unwrap())
}

/// Run the parse chain: bare JSON, then the first fenced block, then raw
/// text.
pub fn model_output<T: DeserializeOwned>(text: &str) -> ModelOutput<T> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ModelOutput::Failed("empty response".to_string());
    }

    if let Ok(value) = serde_json::from_str::<T>(trimmed) {
        return ModelOutput::Parsed(value);
    }

    if let Some(caps) = fence_re().captures(trimmed) {
        let body = caps[1].trim();
        if let Ok(value) = serde_json::from_str::<T>(body) {
            return ModelOutput::Parsed(value);
        }
    }

    ModelOutput::RawText(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Shape {
        headline: String,
        #[serde(default)]
        wins: Vec<String>,
    }

    #[test]
    fn bare_json_parses() {
        let out: ModelOutput<Shape> =
            model_output(r#"{"headline": "good week", "wins": ["shipped"]}"#);
        match out {
            ModelOutput::Parsed(s) => {
                assert_eq!(s.headline, "good week");
                assert_eq!(s.wins, vec!["shipped"]);
            }
            other => panic!("expected Parsed, got {other:?}"),
        }
    }

    #[test]
    fn fenced_json_with_commentary_parses() {
        let text = "Here is your summary:\n```json\n{\"headline\": \"solid\"}\n```\nHope that helps!";
        let out: ModelOutput<Shape> = model_output(text);
        assert!(out.is_parsed());
    }

    #[test]
    fn bare_fence_without_language_tag_parses() {
        let text = "```\n{\"headline\": \"solid\"}\n```";
        let out: ModelOutput<Shape> = model_output(text);
        assert!(out.is_parsed());
    }

    #[test]
    fn prose_falls_back_to_raw_text() {
        let out: ModelOutput<Shape> = model_output("You had a lovely week. Keep it up.");
        assert_eq!(
            out,
            ModelOutput::RawText("You had a lovely week. Keep it up.".to_string())
        );
    }

    #[test]
    fn fenced_block_that_is_not_the_shape_falls_back() {
        let text = "```json\n{\"unrelated\": true}\n```";
        let out: ModelOutput<Shape> = model_output(text);
        assert!(matches!(out, ModelOutput::RawText(_)));
    }

    #[test]
    fn empty_response_fails() {
        let out: ModelOutput<Shape> = model_output("   \n  ");
        assert!(matches!(out, ModelOutput::Failed(_)));
    }
}
