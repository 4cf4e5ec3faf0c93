//! inkcritic core - calligraphy comments from a multimodal LLM.
//!
//! Given an image of a calligraphy work, a student name and a comment style,
//! inkcritic asks a vision-language model (Qwen-VL on DashScope by default)
//! for an evaluative comment.
//!
//! # Architecture
//!
//! ```text
//! CommentRequest → Style prompt → VisionProvider (retry loop) → CommentOutcome
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use inkcritic_core::{CommentGenerator, CommentRequest, Config, Style};
//!
//! #[tokio::main]
//! async fn main() -> inkcritic_core::Result<()> {
//!     let config = Config::load()?;
//!     let generator = CommentGenerator::from_config(&config)?;
//!
//!     let request = CommentRequest::new("./work.jpg").subject("小明").style(Style::Warm);
//!     match generator.generate(&request).await.into_parts() {
//!         (Some(comment), _, elapsed_ms) => println!("{comment} ({elapsed_ms}ms)"),
//!         (None, error, _) => eprintln!("{}", error.unwrap_or_default()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod llm;
pub mod style;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, FaultKind, InkcriticError, ProviderFault, Result};
pub use llm::{Backoff, CommentGenerator, ProviderFactory, RetryPolicy, VisionProvider};
pub use style::{Style, DEFAULT_SUBJECT};
pub use types::{CommentOutcome, CommentRequest, FailureKind};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
