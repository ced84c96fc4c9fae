//! Request handler: validate → build context → generate → normalize → envelope.
//!
//! [`Translator::translate`] never returns an error: every outcome, including
//! bad input and backend failure, is folded into a [`TranslateResponse`].

use crate::context::ContextBuilder;
use crate::generation::GenerationClient;
use crate::normalizer;
use querywright_config::AppConfig;
use querywright_core::error::{Error, ProviderError};
use querywright_core::message::ConversationTurn;
use querywright_core::provider::Provider;
use querywright_core::result::NormalizedResult;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};

/// One translation request.
#[derive(Debug, Clone, Default)]
pub struct TranslateRequest {
    pub utterance: String,
    pub history: Vec<ConversationTurn>,
}

impl TranslateRequest {
    pub fn new(utterance: impl Into<String>) -> Self {
        Self {
            utterance: utterance.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }
}

/// Why a translation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The caller's input was rejected before any backend call.
    Validation,
    /// The backend call itself failed.
    Generation,
}

/// Outcome envelope for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateResponse {
    Success {
        result: NormalizedResult,
        original: String,
    },
    Failure {
        kind: FailureKind,
        error: String,
    },
}

impl TranslateResponse {
    fn failure(kind: FailureKind, error: &Error) -> Self {
        TranslateResponse::Failure {
            kind,
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TranslateResponse::Success { .. })
    }

    pub fn result(&self) -> Option<&NormalizedResult> {
        match self {
            TranslateResponse::Success { result, .. } => Some(result),
            TranslateResponse::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            TranslateResponse::Success { .. } => None,
            TranslateResponse::Failure { kind, .. } => Some(*kind),
        }
    }
}

// Wire shape: `{success, result, graphql_query, original_query}` on success,
// `{success, error}` on failure.
impl Serialize for TranslateResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TranslateResponse::Success { result, original } => {
                let mut state = serializer.serialize_struct("TranslateResponse", 4)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("result", result)?;
                state.serialize_field("graphql_query", &result.render())?;
                state.serialize_field("original_query", original)?;
                state.end()
            }
            TranslateResponse::Failure { error, .. } => {
                let mut state = serializer.serialize_struct("TranslateResponse", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}

/// The translation pipeline. Holds no per-request state; share it behind an `Arc`.
pub struct Translator {
    context: ContextBuilder,
    generator: GenerationClient,
}

impl Translator {
    pub fn new(generator: GenerationClient) -> Self {
        Self {
            context: ContextBuilder::default(),
            generator,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.context = ContextBuilder::new(window);
        self
    }

    /// Wire up the default provider, model and history window from configuration.
    pub fn from_config(config: &AppConfig) -> querywright_core::Result<Self> {
        let router = querywright_providers::router::build_from_config(config);
        let provider: Arc<dyn Provider> = router.default().ok_or_else(|| {
            Error::Generation(ProviderError::NotConfigured(config.default_provider.clone()))
        })?;

        let model = config
            .providers
            .get(&config.default_provider)
            .and_then(|p| p.default_model.clone())
            .unwrap_or_else(|| config.default_model.clone());

        let generator = GenerationClient::new(provider, model)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens);

        Ok(Self::new(generator).with_history_window(config.translator.history_window))
    }

    pub fn generator(&self) -> &GenerationClient {
        &self.generator
    }

    pub fn history_window(&self) -> usize {
        self.context.window()
    }

    /// Translate one utterance. Never fails; see [`TranslateResponse`].
    pub async fn translate(&self, request: TranslateRequest) -> TranslateResponse {
        let request_id = uuid::Uuid::new_v4();
        let span = info_span!(
            "translate",
            %request_id,
            provider = %self.generator.provider_name(),
            model = %self.generator.model(),
        );

        self.run(request).instrument(span).await
    }

    async fn run(&self, request: TranslateRequest) -> TranslateResponse {
        if request.utterance.trim().is_empty() {
            warn!("Rejected empty utterance");
            return TranslateResponse::failure(FailureKind::Validation, &Error::no_query());
        }

        let prompt_context = self.context.build(&request.utterance, &request.history);
        info!(
            history_turns = request.history.len(),
            context_len = prompt_context.len(),
            "Translating utterance"
        );

        let raw = match self.generator.generate(&prompt_context).await {
            Ok(raw) => raw,
            Err(e) => {
                let error = Error::from(e);
                warn!(error = %error, "Generation failed");
                return TranslateResponse::failure(FailureKind::Generation, &error);
            }
        };

        let result = normalizer::normalize(&raw);
        match &result {
            NormalizedResult::Operation { text } => {
                info!(mutation = result.is_mutation(), len = text.len(), "Produced operation");
            }
            NormalizedResult::NeedsInfo {
                missing_fields_message,
            } => {
                warn!(message = %missing_fields_message, "Backend asked for more information");
            }
        }

        TranslateResponse::Success {
            result,
            original: request.utterance,
        }
    }
}
