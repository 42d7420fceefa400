//! The Thought / Action / Observation control loop.
//!
//! The agent follows a **Think → Act → Observe** cycle:
//!
//! 1. **Prime** the transcript with the tool protocol and the question
//! 2. **Send to LLM** via the configured provider
//! 3. **Parse** the reply into a [`Directive`]
//! 4. **If action**: run the tool, append `Observation: ...`, loop back to step 2
//! 5. **If answer**: return it to the caller
//!
//! The loop continues until the model answers or the turn ceiling is
//! reached. Failures never escape a run; they become "no answer".

pub mod directive;
pub mod error;
pub mod prompt;
pub mod react;
pub mod service;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use directive::{ActionCall, Directive};
pub use error::AgentError;
pub use react::{DEFAULT_MAX_TURNS, ReactAgent, RunOutcome};
pub use service::{AgentService, ChatRunOutput, CompletionBody, StreamChunk};
