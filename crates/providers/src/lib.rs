//! Completion endpoint adapters for thoughtloop.
//!
//! All providers implement the `thoughtloop_core::Provider` trait.
//! [`build_from_config`] picks the adapter for the configured transport.

mod http;
pub mod openai_compat;
pub mod responses;
pub mod router;

pub use http::DEFAULT_TIMEOUT;
pub use openai_compat::OpenAiCompatProvider;
pub use responses::ResponsesProvider;
pub use router::build_from_config;
