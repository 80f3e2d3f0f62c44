//! Transcript and categorized context built from a questionnaire session.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::answers::{AnswerStore, SKIPPED_MARKER};
use crate::classify::{classify_question, Bucket, Slot};
use crate::questions::{Question, QuestionSet};

/// Full question-by-question transcript in catalogue order.
///
/// Unanswered questions are kept with the literal "Skipped" marker so the
/// model sees what the user chose not to answer.
pub fn build_transcript(questions: &QuestionSet, answers: &AnswerStore) -> String {
    let mut out = String::new();
    for q in questions {
        let answer = answers.answer(q.id).unwrap_or(SKIPPED_MARKER);
        // Writing to a String never fails.
        let _ = writeln!(out, "[{}] Q{}: {}\nA: {}\n", q.category, q.id, q.text, answer);
    }
    out.trim_end().to_string()
}

/// An answered question placed into a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEntry<'a> {
    pub question: &'a Question,
    pub slot: Option<Slot>,
    pub answer: &'a str,
}

/// Answered questions grouped by bucket.
///
/// Unclassified questions are absent here but remain in the transcript.
#[derive(Debug, Clone, Default)]
pub struct CategorizedContext<'a> {
    buckets: BTreeMap<Bucket, Vec<BucketEntry<'a>>>,
}

impl<'a> CategorizedContext<'a> {
    pub fn build(questions: &'a QuestionSet, answers: &'a AnswerStore) -> Self {
        let mut buckets: BTreeMap<Bucket, Vec<BucketEntry<'a>>> = BTreeMap::new();

        for (question, answer) in answers.answered(questions) {
            if let Some(placement) = classify_question(question) {
                buckets.entry(placement.bucket).or_default().push(BucketEntry {
                    question,
                    slot: placement.slot,
                    answer,
                });
            }
        }

        tracing::debug!(
            journey = buckets.get(&Bucket::Journey).map_or(0, Vec::len),
            emotions = buckets.get(&Bucket::Emotions).map_or(0, Vec::len),
            tastes = buckets.get(&Bucket::Tastes).map_or(0, Vec::len),
            future = buckets.get(&Bucket::Future).map_or(0, Vec::len),
            "Categorized answers"
        );

        Self { buckets }
    }

    /// Entries of one bucket, in catalogue order.
    pub fn entries(&self, bucket: Bucket) -> &[BucketEntry<'a>] {
        self.buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Render as prompt text, one section per non-empty bucket.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for bucket in Bucket::ALL {
            let entries = self.entries(bucket);
            if entries.is_empty() {
                continue;
            }
            let _ = writeln!(out, "## {} ({})", bucket.label(), bucket);
            for e in entries {
                let _ = writeln!(out, "- {}: {}", e.question.text, e.answer);
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}
