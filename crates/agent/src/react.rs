//! ReAct control loop: Thought → Action → Observation → Answer.
//!
//! Each run owns a fresh [`Transcript`]: the system prompt, the question,
//! then per turn the model reply and, when a tool runs, its observation.
//!
//! The loop ends when the model gives a final answer, when it names an
//! unknown tool, when a tool or the completion call fails, or when the turn
//! ceiling is reached. Every failure is logged and reported to the caller
//! as "no answer".

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thoughtloop_config::FreeformReply;
use thoughtloop_core::error::{ProviderError, ToolError};
use thoughtloop_core::message::{Message, Transcript};
use thoughtloop_core::provider::{CompletionRequest, Provider};
use thoughtloop_core::tool::{Tool, ToolRegistry};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::directive::{self, ActionCall, Directive};
use crate::error::AgentError;
use crate::prompt;

pub const DEFAULT_MAX_TURNS: u32 = 10;

/// A tool-calling agent driven by free-text directives.
pub struct ReactAgent {
    /// LLM provider.
    provider: Arc<dyn Provider>,
    /// Model name.
    model: String,
    /// Temperature.
    temperature: f32,
    /// Max tokens per response.
    max_tokens: Option<u32>,
    /// Tools the model may call.
    tools: ToolRegistry,
    /// Maximum model calls per run.
    max_turns: u32,
    /// What to do with a reply that has no directive.
    freeform: FreeformReply,
    /// Override for the protocol prompt.
    prompt_template: Option<String>,
}

/// The result of one run.
#[derive(Debug)]
pub struct RunOutcome {
    /// The final answer, or `None` when the run failed.
    pub answer: Option<String>,
    /// Every message exchanged during the run.
    pub transcript: Transcript,
    /// Number of model calls made.
    pub turns: u32,
    /// Number of tools invoked.
    pub tool_calls: usize,
}

/// Mutable state of a run in progress.
#[derive(Default)]
struct RunState {
    transcript: Transcript,
    turns: u32,
    tool_calls: usize,
}

impl ReactAgent {
    /// Create an agent with no tools and the default turn ceiling.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools: ToolRegistry::new(),
            max_turns: DEFAULT_MAX_TURNS,
            freeform: FreeformReply::default(),
            prompt_template: None,
        }
    }

    /// Replace the tool registry.
    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    /// Set the turn ceiling. Values below 1 are raised to 1.
    pub fn with_max_turns(mut self, max: u32) -> Self {
        self.max_turns = max.max(1);
        self
    }

    /// Set the max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_freeform_reply(mut self, policy: FreeformReply) -> Self {
        self.freeform = policy;
        self
    }

    /// Use a custom protocol prompt. `{tools}` receives the tool listing.
    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = Some(template.into());
        self
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register_tool(&mut self, name: impl Into<String>, tool: impl Tool + 'static) {
        self.tools.register(name, tool);
    }

    /// Register a closure as a tool.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, description: impl Into<String>, func: F)
    where
        F: Fn(&[String]) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        self.tools.register_fn(name, description, func);
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    /// The system prompt sent as the first message of every run.
    pub fn system_prompt(&self) -> String {
        let template = self
            .prompt_template
            .as_deref()
            .unwrap_or(prompt::DEFAULT_TEMPLATE);
        prompt::render(template, &self.tools)
    }

    /// Answer `question`, returning `answer: None` if the run fails.
    pub async fn run(&self, question: &str) -> RunOutcome {
        let run_id = Uuid::new_v4();
        let mut state = RunState::default();

        info!(%run_id, model = %self.model, max_turns = self.max_turns, "Agent run starting");

        let answer = match self.drive(run_id, question, &mut state).await {
            Ok(answer) => {
                info!(
                    %run_id,
                    turns = state.turns,
                    tool_calls = state.tool_calls,
                    "Agent run completed"
                );
                Some(answer)
            }
            Err(e) => {
                warn!(%run_id, kind = e.kind(), turns = state.turns, "Agent run failed: {e}");
                None
            }
        };

        RunOutcome {
            answer,
            transcript: state.transcript,
            turns: state.turns,
            tool_calls: state.tool_calls,
        }
    }

    async fn drive(
        &self,
        run_id: Uuid,
        question: &str,
        state: &mut RunState,
    ) -> Result<String, AgentError> {
        state.transcript.push(Message::system(self.system_prompt()));
        state.transcript.push(Message::user(question));

        while state.turns < self.max_turns {
            state.turns += 1;
            debug!(%run_id, turn = state.turns, "Requesting completion");

            let reply = self.complete(&state.transcript).await?;
            state.transcript.push(Message::assistant(reply.as_str()));

            match directive::parse(&reply) {
                Directive::FinalAnswer(answer) => return Ok(answer),
                Directive::Action(call) => {
                    state.tool_calls += 1;
                    let observation = self.dispatch(run_id, &call).await?;
                    state.transcript.push(Message::observation(observation));
                }
                Directive::None => match self.freeform {
                    FreeformReply::Answer => {
                        if reply.is_empty() {
                            return Err(AgentError::EmptyResponse);
                        }
                        return Ok(reply.trim().to_string());
                    }
                    FreeformReply::Reprompt => {
                        debug!(%run_id, turn = state.turns, "Reply has no directive, asking again");
                    }
                },
            }
        }

        Err(AgentError::MaxTurnsExceeded(self.max_turns))
    }

    async fn complete(&self, transcript: &Transcript) -> Result<String, ProviderError> {
        let mut request = CompletionRequest::new(
            self.model.clone(),
            transcript.messages().to_vec(),
            self.temperature,
        );
        request.max_tokens = self.max_tokens;

        let response = self.provider.complete(request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion usage"
            );
        }
        Ok(response.content)
    }

    async fn dispatch(&self, run_id: Uuid, call: &ActionCall) -> Result<String, AgentError> {
        let tool = self
            .tools
            .resolve(&call.name)
            .map_err(|_| AgentError::UnknownTool(call.name.clone()))?;

        debug!(%run_id, tool = %call.name, args = ?call.args, "Running tool");

        match AssertUnwindSafe(tool.invoke(&call.args)).catch_unwind().await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(AgentError::ToolExecution {
                tool: call.name.clone(),
                reason: e.to_string(),
            }),
            Err(panic) => Err(AgentError::ToolExecution {
                tool: call.name.clone(),
                reason: panic_message(panic.as_ref()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
