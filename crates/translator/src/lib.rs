//! The translation pipeline: natural language in, one GraphQL operation out.
//!
//! Every request runs the same linear path:
//!
//! 1. **Validate** the utterance (empty input never reaches a backend)
//! 2. **Build context** from the last few user turns plus the utterance
//! 3. **Generate** once via the configured provider, schema preamble first
//! 4. **Normalize** the raw text into an operation or a need-info message
//! 5. **Envelope** the outcome for the caller
//!
//! There is no retry loop and no state carried between requests.

pub mod context;
pub mod generation;
pub mod handler;
pub mod normalizer;
pub mod schema;

#[cfg(test)]
mod test_helpers;

pub use context::{ContextBuilder, DEFAULT_HISTORY_WINDOW};
pub use generation::GenerationClient;
pub use handler::{FailureKind, TranslateRequest, TranslateResponse, Translator};
pub use normalizer::normalize;
pub use schema::SchemaDescriptor;
