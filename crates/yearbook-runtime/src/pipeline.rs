//! Caller-side orchestration of the year-in-review calls.
//!
//! The pipeline owns one shared [`ProviderHandle`] and one
//! [`CircuitBreaker`] for all three remote calls. For summaries it runs:
//! - Cache lookup keyed by the answered questions
//! - Circuit breaker check
//! - Timeout-bounded remote generation
//! - Deterministic fallback, unless configured to fail

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use yearbook_core::{
    AnswerStore, FallbackSummaryGenerator, Question, QuestionSet, YearSummary,
};

use crate::cache::{CacheKey, SummaryCache};
use crate::config::{ConfigError, ProviderSettings, RuntimeConfig};
use crate::extraction::DocumentAnswerExtractor;
use crate::inspiration::InspirationGenerator;
use crate::providers::{LlmProvider, ProviderHandle, ProviderRegistry};
use crate::resilience::{CircuitBreaker, RemoteCall};
use crate::summary::RemoteSummaryGenerator;
use crate::{ExtractionError, GenerationError};

/// Where a summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    Remote,
    Cache,
    Fallback,
}

/// A summary plus how it was obtained.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub summary: YearSummary,
    pub source: SummarySource,
    pub generated_at: DateTime<Utc>,
}

impl SummaryOutcome {
    fn new(summary: YearSummary, source: SummarySource) -> Self {
        Self {
            summary,
            source,
            generated_at: Utc::now(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == SummarySource::Fallback
    }
}

/// Entry point for the UI layer.
pub struct YearbookPipeline {
    config: RuntimeConfig,
    handle: Arc<ProviderHandle>,
    breaker: Arc<CircuitBreaker>,
    cache: SummaryCache,
    remote: RemoteSummaryGenerator,
    fallback: FallbackSummaryGenerator,
    extractor: DocumentAnswerExtractor,
    inspiration: InspirationGenerator,
}

impl YearbookPipeline {
    /// Pipeline over the built-in providers.
    pub fn from_config(config: RuntimeConfig) -> Result<Self, ConfigError> {
        YearbookPipelineBuilder::new().config(config).build()
    }

    fn assemble(config: RuntimeConfig, handle: Arc<ProviderHandle>) -> Self {
        let breaker = Arc::new(CircuitBreaker::new(config.circuit_breaker.clone()));

        let remote = RemoteSummaryGenerator::new(Arc::clone(&handle), config.summary.clone());
        let extractor = DocumentAnswerExtractor::new(Arc::clone(&handle), config.extraction.clone())
            .with_duplicate_policy(config.duplicate_ids)
            .with_circuit_breaker(Arc::clone(&breaker));
        let inspiration =
            InspirationGenerator::new(Arc::clone(&handle), config.inspiration.clone())
                .with_circuit_breaker(Arc::clone(&breaker));

        Self {
            cache: SummaryCache::new(&config.cache),
            fallback: FallbackSummaryGenerator::new(),
            config,
            handle,
            breaker,
            remote,
            extractor,
            inspiration,
        }
    }

    /// Summarize the session, falling back locally per configuration.
    ///
    /// # Execution Flow
    /// 1. Return a cached remote summary for identical answers
    /// 2. Skip the remote call while the summary circuit is open
    /// 3. Remote generation bounded by the summary timeout
    /// 4. On failure, the deterministic summary (or the error with
    ///    `summary_fallback: fail`)
    pub async fn summarize(
        &self,
        answers: &AnswerStore,
        questions: &QuestionSet,
    ) -> Result<SummaryOutcome, GenerationError> {
        let key = CacheKey::new(questions, answers, &self.handle.model());
        if let Some(summary) = self.cache.get(&key).await {
            tracing::debug!("Summary served from cache");
            return Ok(SummaryOutcome::new(summary, SummarySource::Cache));
        }

        if self.breaker.is_open(RemoteCall::Summary) {
            tracing::warn!("Summary circuit open, skipping remote call");
            return self.fall_back(answers, questions, GenerationError::CircuitOpen);
        }

        let timeout = self.config.summary.timeout;
        let error = match tokio::time::timeout(timeout, self.remote.generate(answers, questions)).await
        {
            Ok(Ok(summary)) => {
                self.breaker.record_success(RemoteCall::Summary);
                self.cache.insert(key, summary.clone()).await;
                return Ok(SummaryOutcome::new(summary, SummarySource::Remote));
            }
            Ok(Err(e)) => e,
            Err(_) => GenerationError::Timeout(timeout),
        };

        if error.is_configuration() {
            tracing::error!(error = %error, "Remote summary is not configured");
        } else {
            self.breaker.record_failure(RemoteCall::Summary);
        }
        self.fall_back(answers, questions, error)
    }

    fn fall_back(
        &self,
        answers: &AnswerStore,
        questions: &QuestionSet,
        error: GenerationError,
    ) -> Result<SummaryOutcome, GenerationError> {
        if !self.config.summary_fallback.allows_local() {
            return Err(error);
        }
        tracing::warn!(error = %error, "Using deterministic fallback summary");
        Ok(SummaryOutcome::new(
            self.fallback.generate(answers, questions),
            SummarySource::Fallback,
        ))
    }

    /// Deterministic summary; never fails.
    pub fn build_fallback(&self, answers: &AnswerStore, questions: &QuestionSet) -> YearSummary {
        self.fallback.generate(answers, questions)
    }

    /// Remote summary only, without cache or fallback.
    pub async fn generate_summary(
        &self,
        answers: &AnswerStore,
        questions: &QuestionSet,
    ) -> Result<YearSummary, GenerationError> {
        self.remote.generate(answers, questions).await
    }

    pub async fn extract_answers(
        &self,
        file_base64: &str,
        mime_type: &str,
    ) -> Result<AnswerStore, ExtractionError> {
        self.extractor.extract(file_base64, mime_type).await
    }

    pub async fn hint(&self, question: &Question) -> String {
        self.inspiration.hint(question).await
    }

    /// Whether a provider can be built and reports itself healthy.
    pub async fn remote_available(&self) -> bool {
        match self.handle.provider() {
            Ok(provider) => provider.health_check().await,
            Err(_) => false,
        }
    }

    /// Swap provider settings; the provider is rebuilt on next use.
    pub fn update_provider(&self, settings: ProviderSettings) {
        self.handle.update(settings);
        self.breaker.reset();
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn cache(&self) -> &SummaryCache {
        &self.cache
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

/// Builder for [`YearbookPipeline`].
pub struct YearbookPipelineBuilder {
    config: RuntimeConfig,
    provider: Option<Arc<dyn LlmProvider>>,
    registry: Option<Arc<ProviderRegistry>>,
}

impl YearbookPipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            provider: None,
            registry: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this provider instead of building one from the settings.
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Build providers from a custom registry.
    pub fn registry(mut self, registry: Arc<ProviderRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the pipeline. Fails only on invalid configuration; a missing
    /// API key surfaces on the first remote call.
    pub fn build(self) -> Result<YearbookPipeline, ConfigError> {
        self.config.validate()?;

        let settings = self.config.provider.clone();
        let handle = match (self.provider, self.registry) {
            (Some(provider), _) => ProviderHandle::from_provider(provider, settings),
            (None, Some(registry)) => ProviderHandle::with_registry(registry, settings),
            (None, None) => ProviderHandle::new(settings),
        };

        Ok(YearbookPipeline::assemble(self.config, Arc::new(handle)))
    }
}

impl Default for YearbookPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
