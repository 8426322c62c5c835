// file: src/llm/mod.rs
// description: llm client module exports
// reference: internal module structure

pub mod backend;
pub mod client;
pub mod prompt;
pub mod retry;

pub use backend::{ChatMessage, CompletionBackend, CompletionRequest, OpenAiCompatibleBackend};
pub use client::{QaClient, parse_candidates};
pub use prompt::{INSUFFICIENT_INFORMATION, PromptBuilder};
pub use retry::RetryPolicy;
