//! Error types for the querywright domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all querywright operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Caller input ---
    #[error("{0}")]
    Validation(String),

    // --- Generation backend ---
    #[error("Error generating GraphQL query: {0}")]
    Generation(#[from] ProviderError),
}

impl Error {
    /// The caller sent an empty or whitespace-only utterance.
    pub fn no_query() -> Self {
        Error::Validation("No query provided".into())
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures talking to a generation backend.
///
/// Covers transport and backend-level failures only. Messy but delivered
/// text is not an error; the normalizer deals with it.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Classify a `reqwest`-style transport failure message.
    pub fn transport(is_timeout: bool, detail: impl Into<String>) -> Self {
        if is_timeout {
            ProviderError::Timeout(detail.into())
        } else {
            ProviderError::Network(detail.into())
        }
    }
}
