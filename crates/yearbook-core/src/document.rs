//! Local, deterministic answer recovery from uploaded documents.
//!
//! Plain text in the numbered export format ("1. question" followed by
//! the answer) is parsed here without any model call. When nothing
//! numbered is found, the whole text is captured under question 1 so an
//! upload never stalls the session.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::answers::AnswerStore;
use crate::questions::QuestionSet;

/// Errors from local document parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("No answers could be recovered from the document")]
    NoAnswers,
}

/// Which entry wins when a document lists the same question twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateIdPolicy {
    /// Later entries overwrite earlier ones
    #[default]
    LastWins,

    /// The first entry for an id is kept
    FirstWins,
}

/// Coarse classification of an uploaded file's mime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeClass {
    PlainText,
    Image,
    Pdf,
    Other,
}

impl MimeClass {
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        let essence = mime.split(';').next().unwrap_or_default().trim();

        if essence.starts_with("text/") {
            MimeClass::PlainText
        } else if essence.starts_with("image/") {
            MimeClass::Image
        } else if essence == "application/pdf" {
            MimeClass::Pdf
        } else {
            MimeClass::Other
        }
    }
}

lazy_static! {
    /// A question marker: a line starting with an integer followed by a period.
    static ref MARKER_PATTERN: Regex = Regex::new(r"^\s*(\d{1,3})\s*[.．]").unwrap();
}

fn marker_id(line: &str, questions: &QuestionSet) -> Option<u32> {
    MARKER_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|id| questions.get(*id).is_some())
}

/// Build an answer store from `(id, answer)` pairs.
///
/// Entries whose id is not in `questions`, or whose answer is blank, are
/// dropped; repeated ids are resolved with `policy`.
pub fn collect_answers<I>(
    entries: I,
    questions: &QuestionSet,
    policy: DuplicateIdPolicy,
) -> AnswerStore
where
    I: IntoIterator<Item = (u32, String)>,
{
    let mut store = AnswerStore::new();
    for (id, answer) in entries {
        let answer = answer.trim();
        if questions.get(id).is_none() || answer.is_empty() {
            tracing::debug!(id, "Dropping unknown or blank entry");
            continue;
        }
        match policy {
            DuplicateIdPolicy::LastWins => {
                store.insert(id, answer);
            }
            DuplicateIdPolicy::FirstWins => {
                store.insert_if_absent(id, answer);
            }
        }
    }
    store
}

/// Parse the numbered plain-text format.
///
/// The marker line itself holds the question text and is not part of the
/// answer; everything up to the next marker (or end of input) is, trimmed.
/// Text before the first marker is ignored.
pub fn parse_numbered_answers(
    text: &str,
    questions: &QuestionSet,
    policy: DuplicateIdPolicy,
) -> AnswerStore {
    let mut entries = Vec::new();
    let mut current: Option<(u32, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(id) = marker_id(line, questions) {
            if let Some((prev, body)) = current.take() {
                entries.push((prev, body.join("\n")));
            }
            current = Some((id, Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((prev, body)) = current {
        entries.push((prev, body.join("\n")));
    }

    collect_answers(entries, questions, policy)
}

/// Place the whole text under question 1.
pub fn total_capture(text: &str) -> AnswerStore {
    let mut store = AnswerStore::new();
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        store.insert(1, trimmed);
    }
    store
}

/// Recover answers from plain text: numbered parse, then total capture.
pub fn answers_from_text(
    text: &str,
    questions: &QuestionSet,
    policy: DuplicateIdPolicy,
) -> Result<AnswerStore, DocumentError> {
    let parsed = parse_numbered_answers(text, questions, policy);
    if !parsed.is_empty() {
        tracing::debug!(entries = parsed.len(), "Parsed numbered answers");
        return Ok(parsed);
    }

    let captured = total_capture(text);
    if captured.is_empty() {
        return Err(DocumentError::NoAnswers);
    }
    tracing::warn!("No numbered entries found, captured whole text under question 1");
    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::Question;

    fn standard() -> &'static QuestionSet {
        QuestionSet::standard()
    }

    #[test]
    fn test_numbered_entries() {
        let store = parse_numbered_answers(
            "1. Q1\n\nAnswer one\n\n2. Q2\n\nAnswer two",
            standard(),
            DuplicateIdPolicy::LastWins,
        );
        assert_eq!(store, AnswerStore::from([(1, "Answer one"), (2, "Answer two")]));
    }

    #[test]
    fn test_multiline_answers_and_preamble() {
        let text = "我的年度回顾\n\n5. 今年去过的最难忘的城市？\n大理\n洱海边住了一周\n\n21. 单曲循环\r\n《晴天》\r\n";
        let store = parse_numbered_answers(text, standard(), DuplicateIdPolicy::LastWins);
        assert_eq!(store.answer(5), Some("大理\n洱海边住了一周"));
        assert_eq!(store.answer(21), Some("《晴天》"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_out_of_range_numbers_are_body_text() {
        let text = "3. 技能\n游泳\n2024. 这一年\n还学了做饭";
        let store = parse_numbered_answers(text, standard(), DuplicateIdPolicy::LastWins);
        assert_eq!(store.answer(3), Some("游泳\n2024. 这一年\n还学了做饭"));
        let text = "41. 超出范围\n答案";
        assert!(parse_numbered_answers(text, standard(), DuplicateIdPolicy::LastWins).is_empty());
    }

    #[test]
    fn test_duplicate_policy() {
        let text = "7. a\nfirst\n7. a again\nsecond";
        let last = parse_numbered_answers(text, standard(), DuplicateIdPolicy::LastWins);
        assert_eq!(last.answer(7), Some("second"));
        let first = parse_numbered_answers(text, standard(), DuplicateIdPolicy::FirstWins);
        assert_eq!(first.answer(7), Some("first"));
    }

    #[test]
    fn test_total_capture_fallback() {
        let store =
            answers_from_text("just some free text", standard(), DuplicateIdPolicy::LastWins).unwrap();
        assert_eq!(store, AnswerStore::from([(1, "just some free text")]));
    }

    #[test]
    fn test_blank_text_recovers_nothing() {
        assert_eq!(
            answers_from_text("  \n ", standard(), DuplicateIdPolicy::LastWins),
            Err(DocumentError::NoAnswers)
        );
    }

    #[test]
    fn test_collect_answers_drops_invalid() {
        let store = collect_answers(
            vec![(0, "zero".to_string()), (12, " ".to_string()), (40, "ok".to_string()), (99, "x".to_string())],
            standard(),
            DuplicateIdPolicy::LastWins,
        );
        assert_eq!(store, AnswerStore::from([(40, "ok")]));
    }

    #[test]
    fn test_ids_follow_custom_question_set() {
        let custom = QuestionSet::new(vec![
            Question::new(3, 1, "旅行", "去过哪里？"),
            Question::new(41, 4, "未来", "明年想做什么？"),
        ]);

        let store = collect_answers(
            vec![(3, "大理".to_string()), (5, "not asked".to_string()), (41, "学潜水".to_string())],
            &custom,
            DuplicateIdPolicy::LastWins,
        );
        assert_eq!(store, AnswerStore::from([(3, "大理"), (41, "学潜水")]));

        let parsed = parse_numbered_answers(
            "41. 明年\n学潜水\n1. 不在问卷里\n照片",
            &custom,
            DuplicateIdPolicy::LastWins,
        );
        assert_eq!(parsed.answer(41), Some("学潜水\n1. 不在问卷里\n照片"));
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_mime_classes() {
        assert_eq!(MimeClass::from_mime("text/plain; charset=utf-8"), MimeClass::PlainText);
        assert_eq!(MimeClass::from_mime("text/markdown"), MimeClass::PlainText);
        assert_eq!(MimeClass::from_mime("IMAGE/PNG"), MimeClass::Image);
        assert_eq!(MimeClass::from_mime("application/pdf"), MimeClass::Pdf);
        assert_eq!(MimeClass::from_mime("application/octet-stream"), MimeClass::Other);
    }
}
