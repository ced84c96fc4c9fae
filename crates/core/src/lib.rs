//! # querywright Core
//!
//! Domain types, traits, and error definitions for the querywright
//! natural-language to GraphQL translator. This crate has **zero framework
//! dependencies**: it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every external seam is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping generation backends via configuration
//! - Easy testing with scripted mock providers
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod provider;
pub mod result;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result};
pub use message::{ConversationTurn, Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use result::{NEED_INFO_FALLBACK, NEED_INFO_MARKER, NormalizedResult};
