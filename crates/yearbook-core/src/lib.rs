//! # yearbook-core
//!
//! Deterministic side of the year-in-review pipeline.
//!
//! This crate turns questionnaire answers into a [`YearSummary`] without
//! touching the network:
//! - What was asked? ([`QuestionSet`])
//! - What was answered? ([`AnswerStore`], numbered-document parsing)
//! - What does the year look like? ([`build_fallback`])
//!
//! It also owns the summary contract that remote output must satisfy.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same answers always produce the same fallback summary
//! 2. **No LLM calls**: Everything here is template and rule based
//! 3. **Total fallback**: [`build_fallback`] never fails, even with no answers
//! 4. **Validated contract**: A [`YearSummary`] parsed from model output has
//!    passed the JSON Schema
//!
//! ## Example
//!
//! ```rust,ignore
//! use yearbook_core::{build_fallback, AnswerStore, QuestionSet, YearSummary};
//!
//! let answers = AnswerStore::from([(5, "大理"), (21, "《晴天》")]);
//! let summary = match YearSummary::from_model_output(&raw) {
//!     Ok(summary) => summary,
//!     Err(_) => build_fallback(&answers, QuestionSet::standard()),
//! };
//! assert_eq!(summary.cards.len(), 4);
//! ```

pub mod answers;
pub mod classify;
pub mod details;
pub mod document;
pub mod fallback;
pub mod questions;
pub mod summary;
pub mod transcript;

// Re-export main types at crate root
pub use answers::{is_answered, AnswerStore, SKIPPED_MARKER};
pub use classify::{bucket_of, classify, classify_question, Bucket, Placement, Slot};
pub use details::{unique_details, MAX_PROMPT_DETAILS, MAX_TAG_DETAILS};
pub use document::{
    answers_from_text, collect_answers, parse_numbered_answers, total_capture, DocumentError,
    DuplicateIdPolicy, MimeClass,
};
pub use fallback::{build_fallback, CardBuilder, FallbackSummaryGenerator};
pub use questions::{Question, QuestionSet, QUESTION_COUNT};
pub use summary::{
    strip_code_fences, CardStyle, SummaryCard, SummaryError, YearSummary, CARD_COUNT,
};
pub use transcript::{build_transcript, BucketEntry, CategorizedContext};
