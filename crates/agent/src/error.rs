//! Failure kinds of a single agent run.
//!
//! These never leave [`ReactAgent::run`](crate::ReactAgent::run): they are
//! logged with their kind and collapsed into "no answer".

use thiserror::Error;
use thoughtloop_core::error::ProviderError;

#[derive(Debug, Error)]
pub enum AgentError {
    /// The model named a tool that is not registered.
    #[error("Unknown action: {0}")]
    UnknownTool(String),

    /// A registered tool failed or panicked.
    #[error("Tool '{tool}' failed: {reason}")]
    ToolExecution { tool: String, reason: String },

    /// The completion call failed.
    #[error("Completion request failed: {0}")]
    CompletionTransport(#[from] ProviderError),

    /// The turn ceiling was reached without a final answer.
    #[error("Max turns exceeded ({0})")]
    MaxTurnsExceeded(u32),

    /// The model returned no text at all.
    #[error("Model returned an empty response")]
    EmptyResponse,
}

impl AgentError {
    /// Short, stable label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AgentError::UnknownTool(_) => "unknown_tool",
            AgentError::ToolExecution { .. } => "tool_execution",
            AgentError::CompletionTransport(_) => "completion_transport",
            AgentError::MaxTurnsExceeded(_) => "max_turns_exceeded",
            AgentError::EmptyResponse => "empty_response",
        }
    }
}
