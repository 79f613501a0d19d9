use crate::error::MuseError;
use crate::parse::{model_output, ModelOutput};
use crate::types::{
    BlueprintContext, BlueprintDraft, EveningContext, MorningContext, PulseContext, PulseSummary,
};
use crate::Result;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";

// ─── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<WireBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

// ─── MuseClient ───────────────────────────────────────────────────────────

/// Client for the text-generation endpoint (Anthropic messages wire shape).
///
/// One request per call, no retries: generated content is decoration on top
/// of a check-in, and a failed generation must never fail the check-in.
#[derive(Debug, Clone)]
pub struct MuseClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl MuseClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user prompt and return the concatenated text blocks of the
    /// response.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.endpoint);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![WireMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "muse request");
        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MuseError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        let mut text = String::new();
        for block in parsed.content {
            if let WireBlock::Text { text: t } = block {
                text.push_str(&t);
            }
        }
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(MuseError::EmptyResponse);
        }
        Ok(text)
    }

    // ─── Typed wrappers ───────────────────────────────────────────────────

    pub async fn generate_blueprint(
        &self,
        ctx: &BlueprintContext,
    ) -> Result<ModelOutput<BlueprintDraft>> {
        let text = self.complete(&ctx.prompt()).await?;
        Ok(model_output(&text))
    }

    pub async fn morning_message(&self, ctx: &MorningContext) -> Result<String> {
        self.complete(&ctx.prompt()).await
    }

    pub async fn evening_message(&self, ctx: &EveningContext) -> Result<String> {
        self.complete(&ctx.prompt()).await
    }

    pub async fn weekly_pulse(&self, ctx: &PulseContext) -> Result<ModelOutput<PulseSummary>> {
        let text = self.complete(&ctx.prompt()).await?;
        Ok(model_output(&text))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
