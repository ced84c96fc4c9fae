//! Generation client: one backend call per translation.
//!
//! Wraps an injected [`Provider`] with the model settings and the schema
//! preamble. Failures come back as [`ProviderError`] untouched: there is no
//! retry, no fallback model and no partial result here.

use crate::schema::SchemaDescriptor;
use querywright_core::error::ProviderError;
use querywright_core::message::Message;
use querywright_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use tracing::debug;

/// Instruction that closes every prompt.
const GENERATE_INSTRUCTION: &str = "Generate the GraphQL query:";

pub struct GenerationClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    preamble: &'static str,
}

impl GenerationClient {
    /// Create a client for `model` on `provider`, prompting with the builtin schema.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.1,
            max_tokens: None,
            preamble: SchemaDescriptor::context_text(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Prompt messages for a given PromptContext.
    pub fn build_messages(&self, prompt_context: &str) -> Vec<Message> {
        vec![
            Message::system(self.preamble),
            Message::user(format!(
                "User Query: {prompt_context}\n\n{GENERATE_INSTRUCTION}"
            )),
        ]
    }

    /// Send the prompt and return the backend's raw text.
    pub async fn generate(&self, prompt_context: &str) -> Result<String, ProviderError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: self.build_messages(prompt_context),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop: Vec::new(),
        };

        debug!(
            provider = %self.provider.name(),
            model = %self.model,
            context_len = prompt_context.len(),
            "Requesting generation"
        );

        let response = self.provider.complete(request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Generation finished"
            );
        }

        Ok(response.message.content)
    }
}
