//! Shared test helpers for translator tests.

use querywright_core::error::ProviderError;
use querywright_core::message::Message;
use querywright_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::sync::Mutex;

/// A mock provider that replays a script of outcomes.
///
/// Each call to `complete` returns the next outcome in the script.
/// Panics if more calls are made than outcomes provided.
pub struct ScriptedProvider {
    script: Mutex<Vec<Result<String, ProviderError>>>,
    call_count: Mutex<usize>,
    last_request: Mutex<Option<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script),
            call_count: Mutex::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A provider that answers once with `text`.
    pub fn text(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// A provider whose single call fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let script = self.script.lock().unwrap();

        if *count >= script.len() {
            panic!(
                "ScriptedProvider: no more outcomes (call #{}, have {})",
                *count,
                script.len()
            );
        }

        let outcome = script[*count].clone();
        *count += 1;
        *self.last_request.lock().unwrap() = Some(request);

        outcome.map(|text| ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }
}
