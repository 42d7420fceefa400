//! OpenAI Responses API provider (`POST /responses`).
//!
//! The transcript's system message is sent as `instructions`; every other
//! message becomes an `input` item with a single text block. The generated
//! text is the first `output_text` block found in `output`.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thoughtloop_core::error::ProviderError;
use thoughtloop_core::message::{Message, Role};
use thoughtloop_core::provider::{CompletionRequest, Provider, ProviderResponse, Usage};
use tracing::debug;

use crate::http::{self, DEFAULT_TIMEOUT};

/// A provider speaking the OpenAI Responses API.
pub struct ResponsesProvider {
    name: String,
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ResponsesProvider {
    /// Create a new Responses API provider. A `/v1` suffix is appended to the
    /// base URL when missing.
    pub fn new(
        name: impl Into<String>,
        base_url: impl AsRef<str>,
        api_key: Option<String>,
    ) -> Self {
        let mut base_url = http::normalize_base_url(base_url.as_ref());
        if !base_url.ends_with("/v1") {
            base_url.push_str("/v1");
        }

        Self {
            name: name.into(),
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
            client: http::build_client(DEFAULT_TIMEOUT),
        }
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http::build_client(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Split a transcript into `(instructions, input items)`.
fn to_responses_input(messages: &[Message]) -> (String, Vec<InputItem>) {
    let mut instructions = String::new();
    let mut items = Vec::new();

    for m in messages {
        let kind = match m.role {
            Role::System => {
                instructions = m.content.clone();
                continue;
            }
            Role::User => "input_text",
            Role::Assistant => "output_text",
        };
        items.push(InputItem {
            role: m.role.as_str(),
            content: vec![ContentBlock {
                kind,
                text: m.content.clone(),
            }],
        });
    }

    (instructions, items)
}

/// The first `output_text` block in a Responses API payload.
fn output_text(body: &serde_json::Value) -> Option<String> {
    body["output"]
        .as_array()?
        .iter()
        .filter_map(|item| item["content"].as_array())
        .flatten()
        .find(|block| block["type"] == "output_text")
        .map(|block| block["text"].as_str().unwrap_or_default().to_string())
}

#[async_trait]
impl Provider for ResponsesProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = format!("{}/responses", self.base_url);
        let (instructions, input) = to_responses_input(&request.messages);

        let mut body = serde_json::json!({
            "model": request.model,
            "instructions": instructions,
            "input": input,
        });

        if request.temperature != 0.0 {
            body["temperature"] = serde_json::json!(request.temperature);
        }

        if let Some(max_tokens) = request.max_tokens {
            body["max_output_tokens"] = serde_json::json!(max_tokens);
        }

        debug!(provider = %self.name, model = %request.model, "Sending responses request");

        let response = http::authorize(self.client.post(&url), self.api_key.as_deref())
            .json(&body)
            .send()
            .await
            .map_err(http::send_error)?;

        let response = http::check_status(response).await?;

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        let content = output_text(&payload).ok_or_else(|| {
            ProviderError::MalformedResponse("No output_text block in response".into())
        })?;

        let usage = payload["usage"].as_object().map(|u| {
            let field = |k: &str| u.get(k).and_then(|v| v.as_u64()).unwrap_or(0) as u32;
            Usage {
                prompt_tokens: field("input_tokens"),
                completion_tokens: field("output_tokens"),
                total_tokens: field("total_tokens"),
            }
        });

        Ok(ProviderResponse {
            content,
            model: payload["model"]
                .as_str()
                .map(String::from)
                .unwrap_or(request.model),
            usage,
        })
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = http::authorize(self.client.get(&url), self.api_key.as_deref())
            .send()
            .await
            .map_err(http::send_error)?;

        Ok(response.status().is_success())
    }
}

// --- Responses API types (internal) ---

#[derive(Debug, Serialize)]
struct InputItem {
    role: &'static str,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}
