//! Shared test helpers for agent tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use thoughtloop_core::error::ProviderError;
use thoughtloop_core::provider::{CompletionRequest, Provider, ProviderResponse, Usage};

/// A mock provider that returns a sequence of scripted replies.
///
/// Each call to `complete` pops the next reply. Once the script is exhausted
/// the provider repeats `fallback` if one is set, and panics otherwise.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    fallback: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_results(replies.into_iter().map(|r| Ok(r.into())))
    }

    pub fn from_results(replies: impl IntoIterator<Item = Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider that answers every call with the same text.
    pub fn repeating(text: &str) -> Self {
        Self {
            fallback: Some(text.to_string()),
            ..Self::from_results(Vec::new())
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<ProviderResponse, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };

        let reply = match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply?,
            None => match &self.fallback {
                Some(text) => text.clone(),
                None => panic!("ScriptedProvider: no more replies (call #{call})"),
            },
        };

        Ok(make_text_response(&reply))
    }
}

/// Create a plain text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        content: text.to_string(),
        model: "mock-model".into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}
