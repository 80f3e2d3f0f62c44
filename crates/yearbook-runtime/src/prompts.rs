//! Prompts for the remote calls.
//!
//! Each call has a fixed system prompt (the persona and output rules) and
//! a user payload built from the session:
//! 1. Summary - categorized context, unique details, full transcript
//! 2. Extraction - the numbered question reference list
//! 3. Inspiration - one question

use std::fmt::Write;

use yearbook_core::{
    build_transcript, unique_details, AnswerStore, CategorizedContext, Question, QuestionSet,
    MAX_PROMPT_DETAILS,
};

/// Persona for summary generation.
pub const SUMMARY_SYSTEM_PROMPT: &str = r#"
You are a soulful writer who turns a person's year into a small keepsake.
You write in Simplified Chinese, warmly and concretely, like a friend who
listened carefully.

You reply with JSON only. No markdown, no commentary, no code fences.
"#;

/// Task and writing rules that open every summary payload.
pub const SUMMARY_RULES: &str = r#"
## Task
Write a "year in review" for this person as exactly four cards, in this order:
1. journey (style "ticket", keyword "GROWTH"): places, milestones, what they achieved
2. emotions (style "paper", keyword "EMOTIONS"): feelings, people, moments that moved them
3. tastes (style "note", keyword "TASTES"): songs, books, films, food, small pleasures
4. future (style "polaroid", keyword "FUTURE"): hopes, plans, where they want to go next

## Content Rules
- Never copy a full sentence from the answers; retell it in your own words
- Every card must mention at least one concrete detail from the list below
- No generic filler ("这一年很充实", "未来可期" on its own, "加油")
- journey and future cards: 120-180 characters; emotions and tastes cards: 100-150 characters
- Titles are four Chinese characters
- visualTags: 5-8 short words, taken from their details where possible
- poem: four short lines separated by "\n"
- analysis: about 100 characters looking back on the whole year
- keyword: one English word in capitals; animal: one animal in Chinese
"#;

/// Persona for document extraction.
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"
You read a filled-in year-in-review questionnaire and recover the answers.
Match each answer to the numbered question it belongs to. Copy answers as
written; do not summarize or translate. Leave out questions with no answer.

You reply with JSON only.
"#;

/// Persona for writing hints.
pub const HINT_SYSTEM_PROMPT: &str = r#"
You help someone who is stuck on a reflection question. Reply with one
short, gentle prompt in Simplified Chinese (under 30 characters) that
nudges them toward a concrete memory. No quotes, no lists, no preamble.
"#;

/// Offline hints, used when the remote call fails.
pub const STATIC_HINTS: [&str; 6] = [
    "想一想今年让你停下脚步的那个瞬间。",
    "翻翻相册，最常出现的是哪个地方？",
    "有没有一句话，你今年反复对自己说？",
    "回忆一个让你笑出声的普通日子。",
    "今年谁陪你走过了最难的那段路？",
    "如果用一种天气形容今年，会是什么？",
];

/// Longest document excerpt sent for extraction, in characters.
pub const MAX_EXCERPT_CHARS: usize = 8000;

/// User payload for summary generation.
pub fn summary_prompt(questions: &QuestionSet, answers: &AnswerStore) -> String {
    let context = CategorizedContext::build(questions, answers);
    let details: Vec<String> = unique_details(questions, answers)
        .into_iter()
        .take(MAX_PROMPT_DETAILS)
        .collect();

    let mut out = String::from(SUMMARY_RULES.trim());
    out.push_str("\n\n## Categorized Answers\n");
    if context.is_empty() {
        out.push_str("(none)\n");
    } else {
        let _ = writeln!(out, "{}", context.render());
    }

    out.push_str("\n## Unique Details (use them)\n");
    if details.is_empty() {
        out.push_str("(none)\n");
    } else {
        let _ = writeln!(out, "{}", details.join("、"));
    }

    out.push_str("\n## Full Transcript\n");
    out.push_str(&build_transcript(questions, answers));
    out
}

/// User payload for extraction.
///
/// `excerpt` is the decoded document text, if any; it is cut to
/// [`MAX_EXCERPT_CHARS`]. Image uploads pass `None` and attach the image.
pub fn extraction_prompt(questions: &QuestionSet, excerpt: Option<&str>) -> String {
    let mut out = String::from(
        "Recover the answers to these questions from the attached document.\n\n## Questions\n",
    );
    out.push_str(&questions.reference_list());
    out.push_str("\n\nReturn {\"answers\": [{\"id\": <question number>, \"answer\": \"...\"}]}.");

    if let Some(text) = excerpt {
        let cut: String = text.chars().take(MAX_EXCERPT_CHARS).collect();
        let _ = write!(out, "\n\n## Document\n{}", cut);
    }
    out
}

/// User payload for a hint.
pub fn hint_prompt(question: &Question) -> String {
    format!(
        "问题（{}）：{}\n请给一个帮助回忆的小提示。",
        question.category, question.text
    )
}

/// Offline hint for a question; stable per question id.
pub fn static_hint(question: &Question) -> &'static str {
    STATIC_HINTS[question.id as usize % STATIC_HINTS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_sections() {
        let answers = AnswerStore::from([(5, "大理"), (21, "《晴天》")]);
        let prompt = summary_prompt(QuestionSet::standard(), &answers);

        assert!(prompt.contains("## Categorized Answers"));
        assert!(prompt.contains("## Unique Details"));
        assert!(prompt.contains("晴天"));
        assert!(prompt.contains("Skipped"));
    }

    #[test]
    fn test_summary_prompt_with_no_answers() {
        let prompt = summary_prompt(QuestionSet::standard(), &AnswerStore::new());
        assert!(prompt.contains("(none)"));
        assert!(prompt.contains("## Full Transcript"));
    }

    #[test]
    fn test_extraction_prompt_lists_questions_and_caps_excerpt() {
        let long = "∞".repeat(MAX_EXCERPT_CHARS + 500);
        let prompt = extraction_prompt(QuestionSet::standard(), Some(long.as_str()));

        assert!(prompt.contains("1. "));
        assert!(prompt.contains("40. "));
        assert_eq!(prompt.matches('∞').count(), MAX_EXCERPT_CHARS);
    }

    #[test]
    fn test_static_hint_is_stable() {
        let q = QuestionSet::standard().get(7).unwrap();
        assert_eq!(static_hint(q), static_hint(q));
        assert!(STATIC_HINTS.contains(&static_hint(q)));
    }

    #[test]
    fn test_system_prompts_demand_json() {
        assert!(SUMMARY_SYSTEM_PROMPT.contains("JSON only"));
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("JSON only"));
    }
}
