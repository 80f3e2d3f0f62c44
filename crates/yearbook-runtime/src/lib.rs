//! # yearbook-runtime
//!
//! Remote, LLM-backed side of the year-in-review pipeline.
//!
//! This crate talks to an OpenAI-compatible chat-completion endpoint to:
//! - Write the year summary ([`RemoteSummaryGenerator`])
//! - Recover answers from uploaded documents ([`DocumentAnswerExtractor`])
//! - Suggest writing hints ([`InspirationGenerator`])
//!
//! ## Important
//!
//! Everything deterministic lives in `yearbook-core`. The generators here
//! surface remote failures as errors; [`YearbookPipeline`] is the caller-side
//! orchestration that turns a failed summary into the local fallback.
//!
//! ## Example
//!
//! ```rust,ignore
//! use yearbook_runtime::{RuntimeConfig, YearbookPipeline};
//!
//! let config = RuntimeConfig::from_yaml_file("yearbook.yaml")?;
//! let pipeline = YearbookPipeline::from_config(config)?;
//!
//! let outcome = pipeline.summarize(&answers, QuestionSet::standard()).await?;
//! println!("{} ({:?})", outcome.summary.keyword, outcome.source);
//! ```

use std::time::Duration;
use thiserror::Error;

use yearbook_core::SummaryError;

pub mod cache;
pub mod config;
pub mod extraction;
pub mod inspiration;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod resilience;
pub mod summary;

pub use cache::{CacheConfig, CacheKey, SummaryCache};
pub use config::{CallSettings, ConfigError, ProviderSettings, RuntimeConfig};
pub use extraction::DocumentAnswerExtractor;
pub use inspiration::InspirationGenerator;
pub use pipeline::{SummaryOutcome, SummarySource, YearbookPipeline, YearbookPipelineBuilder};
pub use providers::{LlmProvider, ProviderError, ProviderHandle};
pub use resilience::{CircuitBreaker, CircuitBreakerConfig, RemoteCall, SummaryFallback};
pub use summary::RemoteSummaryGenerator;

/// Errors from remote summary generation.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid summary: {0}")]
    InvalidSummary(#[from] SummaryError),

    #[error("Circuit open for remote summaries")]
    CircuitOpen,

    #[error("Summary generation timed out after {0:?}")]
    Timeout(Duration),
}

impl GenerationError {
    /// Whether the failure is a configuration problem (missing key, bad kind).
    pub fn is_configuration(&self) -> bool {
        matches!(self, GenerationError::Provider(e) if e.is_configuration())
    }
}

/// Errors from document answer extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Document is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("No answers could be recovered from the document{}", .cause.as_ref().map(|c| format!(": {}", c)).unwrap_or_default())]
    NoAnswersRecovered { cause: Option<String> },
}
