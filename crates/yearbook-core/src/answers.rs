//! Answer storage keyed by question id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::questions::{Question, QuestionSet};

/// Marker written into transcripts for questions without an answer.
pub const SKIPPED_MARKER: &str = "Skipped";

/// Mapping from question id to free-text answer.
///
/// An empty (or whitespace-only) answer means the question was skipped.
/// Keys need not cover the whole catalogue. Ordering is deterministic
/// (BTreeMap, not HashMap) so fingerprints and transcripts are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore {
    answers: BTreeMap<u32, String>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) the answer for a question.
    pub fn insert(&mut self, id: u32, answer: impl Into<String>) -> Option<String> {
        self.answers.insert(id, answer.into())
    }

    /// Set the answer only when none is stored yet.
    ///
    /// Returns `true` if the answer was stored.
    pub fn insert_if_absent(&mut self, id: u32, answer: impl Into<String>) -> bool {
        if self.answers.contains_key(&id) {
            return false;
        }
        self.answers.insert(id, answer.into());
        true
    }

    /// Raw stored value, including empty strings.
    pub fn get(&self, id: u32) -> Option<&str> {
        self.answers.get(&id).map(String::as_str)
    }

    /// Trimmed answer, or `None` when absent or skipped.
    pub fn answer(&self, id: u32) -> Option<&str> {
        self.answers
            .get(&id)
            .map(|a| a.trim())
            .filter(|a| is_answered(a))
    }

    pub fn remove(&mut self, id: u32) -> Option<String> {
        self.answers.remove(&id)
    }

    /// Drop every answer; used when a new review session starts.
    pub fn clear(&mut self) {
        self.answers.clear();
    }

    /// Number of stored entries, skipped ones included.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Number of entries carrying a real answer.
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|a| is_answered(a)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.answers.iter().map(|(id, a)| (*id, a.as_str()))
    }

    /// Answered questions paired with their trimmed answers, in catalogue order.
    pub fn answered<'a>(
        &'a self,
        questions: &'a QuestionSet,
    ) -> impl Iterator<Item = (&'a Question, &'a str)> + 'a {
        questions
            .iter()
            .filter_map(move |q| self.answer(q.id).map(|a| (q, a)))
    }
}

impl FromIterator<(u32, String)> for AnswerStore {
    fn from_iter<T: IntoIterator<Item = (u32, String)>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(u32, &str); N]> for AnswerStore {
    fn from(entries: [(u32, &str); N]) -> Self {
        entries
            .into_iter()
            .map(|(id, a)| (id, a.to_string()))
            .collect()
    }
}

/// Whether an answer carries content.
///
/// Whitespace-only strings and the literal skip marker count as skipped.
pub fn is_answered(answer: &str) -> bool {
    let trimmed = answer.trim();
    !trimmed.is_empty() && trimmed != SKIPPED_MARKER && trimmed != "跳过"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_answers_are_not_answered() {
        let store = AnswerStore::from([(1, "成都"), (2, "   "), (3, "Skipped"), (4, "跳过")]);
        assert_eq!(store.len(), 4);
        assert_eq!(store.answered_count(), 1);
        assert_eq!(store.answer(1), Some("成都"));
        assert_eq!(store.answer(2), None);
        assert_eq!(store.get(2), Some("   "));
    }

    #[test]
    fn test_insert_if_absent_keeps_first() {
        let mut store = AnswerStore::new();
        assert!(store.insert_if_absent(7, "first"));
        assert!(!store.insert_if_absent(7, "second"));
        assert_eq!(store.answer(7), Some("first"));
    }

    #[test]
    fn test_answered_follows_catalogue_order() {
        let store = AnswerStore::from([(21, "晴天"), (5, "大理"), (40, "再见")]);
        let ids: Vec<u32> = store
            .answered(QuestionSet::standard())
            .map(|(q, _)| q.id)
            .collect();
        assert_eq!(ids, vec![5, 21, 40]);
    }

    #[test]
    fn test_clear_resets_session() {
        let mut store = AnswerStore::from([(1, "a")]);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let store = AnswerStore::from([(1, "a"), (2, "b")]);
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"1":"a","2":"b"}"#);
        let back: AnswerStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }
}
