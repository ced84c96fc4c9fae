//! The two outcomes a translation can produce.

use serde::{Deserialize, Serialize};

/// Sentinel the backend uses to signal missing required fields.
pub const NEED_INFO_MARKER: &str = "NEED_INFO";

/// Message used when the backend asks for more information without saying what.
pub const NEED_INFO_FALLBACK: &str = "Please provide more information";

/// A validated translation outcome.
///
/// Exactly one variant is produced per request; raw backend text never
/// crosses the translator boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedResult {
    /// A single-line GraphQL operation with balanced braces, starting with
    /// `query` or `mutation`.
    Operation { text: String },

    /// A write could not be completed because required fields were absent.
    NeedsInfo {
        #[serde(rename = "message")]
        missing_fields_message: String,
    },
}

impl NormalizedResult {
    pub fn operation(text: impl Into<String>) -> Self {
        NormalizedResult::Operation { text: text.into() }
    }

    pub fn needs_info(message: impl Into<String>) -> Self {
        NormalizedResult::NeedsInfo {
            missing_fields_message: message.into(),
        }
    }

    /// Whether the operation is a `mutation` (false for queries and need-info).
    pub fn is_mutation(&self) -> bool {
        match self {
            NormalizedResult::Operation { text } => text
                .get(..8)
                .is_some_and(|head| head.eq_ignore_ascii_case("mutation")),
            NormalizedResult::NeedsInfo { .. } => false,
        }
    }

    /// Canonical text form: the operation itself, or `NEED_INFO: <message>`.
    pub fn render(&self) -> String {
        match self {
            NormalizedResult::Operation { text } => text.clone(),
            NormalizedResult::NeedsInfo {
                missing_fields_message,
            } => format!("{NEED_INFO_MARKER}: {missing_fields_message}"),
        }
    }
}

impl std::fmt::Display for NormalizedResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
