//! Multimodal LLM integration for calligraphy comments.
//!
//! Provides a provider abstraction over the DashScope native API and
//! OpenAI-compatible Chat Completions endpoints, plus the retrying comment
//! generator built on top of it.

pub(crate) mod dashscope;
pub(crate) mod generator;
pub(crate) mod openai;
pub mod provider;
pub mod retry;

pub use generator::CommentGenerator;
pub use provider::{ProviderFactory, VisionProvider};
pub use retry::{Backoff, RetryPolicy};
