//! Provider construction from configuration.
//!
//! Selects the completion adapter for the configured transport. The provider
//! is built once per process and shared by every run.

use std::sync::Arc;
use std::time::Duration;
use thoughtloop_config::{AppConfig, ConfigError, Transport};
use thoughtloop_core::provider::Provider;

use crate::openai_compat::OpenAiCompatProvider;
use crate::responses::ResponsesProvider;

/// Build the provider selected by `config.transport`.
///
/// Fails when no base URL is configured.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ConfigError> {
    let endpoint = config.require_endpoint()?;
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let api_key = config.api_key.clone();

    tracing::debug!(
        transport = %config.transport,
        base_url = %endpoint.base_url,
        "Building provider"
    );

    let provider: Arc<dyn Provider> = match config.transport {
        Transport::ChatCompletions => Arc::new(
            OpenAiCompatProvider::new("openai", &endpoint.base_url, api_key).with_timeout(timeout),
        ),
        Transport::LlamaStack => Arc::new(
            OpenAiCompatProvider::llama_stack(&endpoint.base_url, api_key).with_timeout(timeout),
        ),
        Transport::Responses => Arc::new(
            ResponsesProvider::new("openai-responses", &endpoint.base_url, api_key)
                .with_timeout(timeout),
        ),
    };

    Ok(provider)
}
