//! Completion provider implementations

pub mod openai;

pub use openai::OpenAIProvider;
