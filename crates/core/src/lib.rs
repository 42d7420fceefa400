//! # thoughtloop core
//!
//! Domain types, traits, and error definitions for the thoughtloop agent.
//! This crate has **no transport dependencies**: it defines the transcript,
//! the tool registry and the completion seam that the other crates
//! implement against.
//!
//! ## Design
//!
//! The two outward-facing capabilities of an agent run (asking the model
//! for text and invoking a tool) are traits here. Implementations live in
//! `thoughtloop-providers` and `thoughtloop-tools`, which keeps the control
//! loop testable with scripted stand-ins.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ProviderError, ToolError};
pub use message::{Message, Role, Transcript};
pub use provider::{CompletionRequest, Provider, ProviderResponse, Usage};
pub use tool::{FnTool, Tool, ToolRegistry};
