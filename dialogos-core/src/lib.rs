//! # Dialogos - Conversational Session & Message Pipeline Core
//!
//! Dialogos (Διάλογος) is the in-process core of a conversational proxy: it
//! keeps per-session dialogue state and mediates turns between a caller and a
//! hosted LLM completion service.
//!
//! - Session lifecycle with sliding-window history truncation
//! - Message normalization and pluggable moderation
//! - Prompt assembly around a fixed persona instruction
//! - Single-pass or draft/refine completion orchestration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dialogos_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = DialogosConfig::load()?;
//!     let store = Arc::new(SessionStore::new(config.history.max_entries));
//!     let provider = Arc::new(OpenAIProvider::from_config(&config.completion)?);
//!
//!     let engine = ChatEngine::new(&config, store, provider)?;
//!
//!     let outcome = engine.ask("How do black holes evaporate?", None, false).await?;
//!     println!("[{}] {}", outcome.session_id, outcome.reply);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The transport layer (HTTP routing, schema validation, status codes) sits
//! outside this crate and consumes exactly two operations:
//! [`ChatEngine::ask`](engine::ChatEngine::ask) and
//! [`ChatEngine::clear_session`](engine::ChatEngine::clear_session). The
//! completion provider sits behind the
//! [`CompletionProvider`](llm::CompletionProvider) trait. Sessions live in
//! memory for the life of the process; nothing is persisted.

pub mod config;
pub mod conversation;
pub mod engine;
pub mod error;
pub mod llm;
pub mod moderation;
pub mod normalize;
pub mod persona;
pub mod prompt;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{
        CompletionConfig, DialogosConfig, HistoryConfig, ModerationConfig, NormalizerConfig,
    };
    pub use crate::conversation::{MessageHistory, SessionStore, Turn};
    pub use crate::engine::{ChatEngine, ChatOutcome};
    pub use crate::error::{DialogosError, Result};
    pub use crate::llm::{
        CompletionProvider, CompletionRequest, CompletionResponse, Message, MessageRole, ModelInfo,
        TokenUsage, providers::OpenAIProvider,
    };
    pub use crate::moderation::{DenyListPolicy, ModerationPolicy, ModerationVerdict};
    pub use crate::normalize::TextNormalizer;
    pub use crate::persona::{DEFAULT_PERSONA, REFINEMENT_INSTRUCTION};
}
