//! Chat-style service facade over [`ReactAgent`].
//!
//! The service is built once per process. Every request gets its own tool
//! registry and agent, so concurrent requests share nothing mutable.

use futures::Stream;
use futures::stream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thoughtloop_config::{AppConfig, FreeformReply};
use thoughtloop_core::message::{Message, Role};
use thoughtloop_core::provider::Provider;
use thoughtloop_core::tool::ToolRegistry;

use crate::react::{DEFAULT_MAX_TURNS, ReactAgent};

/// Builds the tools for one request.
pub type RegistryFactory = Arc<dyn Fn() -> ToolRegistry + Send + Sync>;

pub const FINISH_REASON_STOP: &str = "stop";

/// Response of [`AgentService::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRunOutput {
    /// The input messages followed by the assistant answer
    pub messages: Vec<Message>,
    pub finish_reason: String,
}

/// Request body accepted by `generate` and `generate_stream`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Non-streaming completion body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionBody {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: Message,
}

/// One streamed chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: Message,
    /// Always serialized, `null` until the stream ends
    pub finish_reason: Option<String>,
}

pub struct AgentService {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    max_turns: u32,
    freeform: FreeformReply,
    tools: RegistryFactory,
}

impl AgentService {
    /// Create a service with an empty tool set.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            max_turns: DEFAULT_MAX_TURNS,
            freeform: FreeformReply::default(),
            tools: Arc::new(ToolRegistry::new),
        }
    }

    /// Take the loop settings from configuration.
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.temperature = config.temperature;
        self.max_tokens = config.max_tokens;
        self.max_turns = config.max_turns;
        self.freeform = config.freeform_reply;
        self
    }

    /// Set the factory that builds each request's tools.
    pub fn with_tools<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> ToolRegistry + Send + Sync + 'static,
    {
        self.tools = Arc::new(factory);
        self
    }

    /// A fresh agent for one request.
    pub fn agent(&self) -> ReactAgent {
        let mut agent = ReactAgent::new(self.provider.clone(), self.model.clone(), self.temperature)
            .with_tools((self.tools)())
            .with_max_turns(self.max_turns)
            .with_freeform_reply(self.freeform);
        if let Some(max) = self.max_tokens {
            agent = agent.with_max_tokens(max);
        }
        agent
    }

    /// Answer the last message of `messages`.
    ///
    /// A failed run answers with an empty string.
    pub async fn run(&self, messages: Vec<Message>) -> ChatRunOutput {
        let question = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        let answer = self.agent().run(&question).await.answer.unwrap_or_default();

        let mut messages = messages;
        messages.push(Message::assistant(answer));
        ChatRunOutput {
            messages,
            finish_reason: FINISH_REASON_STOP.to_string(),
        }
    }

    /// Handle a `{"messages": [...]}` payload and return a completion body.
    pub async fn generate(&self, payload: serde_json::Value) -> Result<CompletionBody, serde_json::Error> {
        let request: GenerateRequest = serde_json::from_value(payload)?;
        let message = self.answer_message(request.messages).await;
        Ok(CompletionBody {
            choices: vec![Choice { index: 0, message }],
        })
    }

    /// Like [`generate`](Self::generate), delivered as a single stream chunk.
    pub fn generate_stream(
        &self,
        payload: serde_json::Value,
    ) -> impl Stream<Item = Result<StreamChunk, serde_json::Error>> + '_ {
        stream::once(async move {
            let request: GenerateRequest = serde_json::from_value(payload)?;
            let delta = self.answer_message(request.messages).await;
            Ok::<_, serde_json::Error>(StreamChunk {
                choices: vec![ChunkChoice {
                    index: 0,
                    delta,
                    finish_reason: None,
                }],
            })
        })
    }

    async fn answer_message(&self, messages: Vec<Message>) -> Message {
        self.run(messages)
            .await
            .messages
            .pop()
            .filter(|m| m.role == Role::Assistant)
            .unwrap_or_else(|| Message::assistant(""))
    }
}
