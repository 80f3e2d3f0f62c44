//! Caching layer for yearbook-runtime.
//!
//! Keeps remote summaries in memory so resubmitting identical answers
//! does not call the model again.

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use yearbook_core::{AnswerStore, QuestionSet, YearSummary};

use crate::config::duration_str;

/// Cache sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub max_entries: u64,

    /// Time to live per entry
    #[serde(with = "duration_str")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            ttl: Duration::from_secs(3600),
        }
    }
}

/// Cache key: fingerprint of the answered questions plus the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    answers_hash: u64,
    model: String,
}

impl CacheKey {
    /// Skipped questions do not contribute, so an empty answer and a
    /// missing one produce the same key.
    pub fn new(questions: &QuestionSet, answers: &AnswerStore, model: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        for (question, answer) in answers.answered(questions) {
            question.id.hash(&mut hasher);
            question.text.hash(&mut hasher);
            answer.hash(&mut hasher);
        }
        Self {
            answers_hash: hasher.finish(),
            model: model.to_string(),
        }
    }
}

/// Summary cache using moka.
pub struct SummaryCache {
    cache: Cache<CacheKey, YearSummary>,
}

impl SummaryCache {
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();

        Self { cache }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<YearSummary> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: CacheKey, summary: YearSummary) {
        self.cache.insert(key, summary).await;
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for SummaryCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
