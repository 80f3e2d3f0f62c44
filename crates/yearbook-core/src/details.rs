//! Unique-detail extraction.
//!
//! Pulls short concrete tokens (place names, titles, brands) out of free
//! text answers. The same list feeds the remote prompt ("mention these
//! details") and the fallback generator (tags, poem, keyword).
//!
//! Tokens come from three sources, in order of appearance:
//! - quoted or title-marked substrings (“…”, 「…」, 《…》, "…")
//! - Latin-letter runs of two or more letters
//! - CJK runs, split on function characters, kept when 2..=8 chars long

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::answers::AnswerStore;
use crate::questions::QuestionSet;

/// Details included in the remote prompt.
pub const MAX_PROMPT_DETAILS: usize = 15;

/// Details used as fallback visual tags.
pub const MAX_TAG_DETAILS: usize = 5;

const MIN_CJK_TOKEN: usize = 2;
const MAX_CJK_TOKEN: usize = 8;
const MAX_QUOTED_TOKEN: usize = 20;

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(
        r#"“([^”]+)”|「([^」]+)」|『([^』]+)』|《([^》]+)》|"([^"]+)"|([A-Za-z][A-Za-z0-9'&\-]*[A-Za-z0-9])|(\p{Han}+)"#
    ).unwrap();
}

// Characters that glue phrases together rather than carry meaning.
const FUNCTION_CHARS: &str = "的了和与及在是我你他她它也都就还很最又把被给让跟着过吧呢啊吗呀这那去看到从对为有说想要会能得地";

const STOPWORDS: [&str; 24] = [
    "今年", "明年", "去年", "一个", "一次", "一些", "什么", "没有", "因为", "所以", "但是", "自己",
    "我们", "他们", "就是", "还是", "可以", "时候", "真的", "非常", "特别", "感觉", "觉得", "一样",
];

/// Extract tokens from a single piece of text, in order of appearance.
pub fn tokens(text: &str) -> Vec<String> {
    let mut out = Vec::new();

    for caps in TOKEN_PATTERN.captures_iter(text) {
        if let Some(m) = (1..=5).find_map(|i| caps.get(i)) {
            let quoted = m.as_str().trim();
            let len = quoted.chars().count();
            if len > 0 && len <= MAX_QUOTED_TOKEN {
                out.push(quoted.to_string());
            }
        } else if let Some(m) = caps.get(6) {
            out.push(m.as_str().to_string());
        } else if let Some(m) = caps.get(7) {
            out.extend(split_cjk_run(m.as_str()));
        }
    }

    out
}

fn split_cjk_run(run: &str) -> impl Iterator<Item = String> + '_ {
    run.split(|c: char| FUNCTION_CHARS.contains(c))
        .filter(|piece| {
            let len = piece.chars().count();
            (MIN_CJK_TOKEN..=MAX_CJK_TOKEN).contains(&len) && !STOPWORDS.contains(piece)
        })
        .map(str::to_string)
}

/// Deduplicated tokens across several texts, first occurrence wins.
pub fn unique_tokens<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    texts
        .into_iter()
        .flat_map(tokens)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Unique details from every answered question, in catalogue order.
pub fn unique_details(questions: &QuestionSet, answers: &AnswerStore) -> Vec<String> {
    unique_tokens(answers.answered(questions).map(|(_, a)| a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_and_title_marks() {
        let t = tokens("《晴天》循环了一整年，还有“海边的卡夫卡”这本书");
        assert_eq!(t[0], "晴天");
        assert!(t.contains(&"海边的卡夫卡".to_string()));
    }

    #[test]
    fn test_latin_runs() {
        let t = tokens("每天打开 Duolingo 和 Notion，I love it");
        assert!(t.contains(&"Duolingo".to_string()));
        assert!(t.contains(&"Notion".to_string()));
        assert!(t.contains(&"love".to_string()));
        assert!(!t.contains(&"I".to_string()));
    }

    #[test]
    fn test_cjk_runs_split_on_function_chars() {
        let t = tokens("今年去了成都看大熊猫");
        assert_eq!(t, vec!["成都".to_string(), "大熊猫".to_string()]);
    }

    #[test]
    fn test_long_runs_dropped_and_short_runs_kept() {
        let t = tokens("猫");
        assert!(t.is_empty());
        let t = tokens("一二三四五六七八九十");
        assert!(t.is_empty());
    }

    #[test]
    fn test_unique_details_dedupes_in_catalogue_order() {
        let answers = AnswerStore::from([(22, "《百年孤独》"), (5, "大理，洱海"), (6, "在洱海骑车")]);
        let details = unique_details(QuestionSet::standard(), &answers);
        assert_eq!(details[0], "大理");
        assert_eq!(details[1], "洱海");
        assert_eq!(details.iter().filter(|d| *d == "洱海").count(), 1);
        assert!(details.contains(&"百年孤独".to_string()));
    }

    #[test]
    fn test_skipped_answers_contribute_nothing() {
        let answers = AnswerStore::from([(1, "Skipped"), (2, "  ")]);
        assert!(unique_details(QuestionSet::standard(), &answers).is_empty());
    }
}
