//! Text composition helpers shared by the card builders.

/// Characters that end a sentence.
pub const SENTENCE_ENDINGS: [char; 5] = ['。', '！', '？', '!', '?'];

/// Punctuation stripped from the end of interpolated answers.
const TRAILING_PUNCTUATION: &str = "，,。.！!？?；;：:、…~～ ";

/// Characters where a long answer is cut before the soft limit.
const CLAUSE_BREAKS: [char; 8] = ['\n', '。', '！', '？', '!', '?', '；', ';'];
const SOFT_BREAKS: [char; 4] = ['，', ',', '、', ' '];

/// Longest answer fragment interpolated into a template.
pub const MAX_FRAGMENT_CHARS: usize = 24;

/// Inclusive character-count bounds for card content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl LengthBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, len: usize) -> bool {
        (self.min..=self.max).contains(&len)
    }

    /// Longest closing sentence that can be appended without overshooting.
    pub fn slack(&self) -> usize {
        self.max - self.min
    }
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn ends_sentence(s: &str) -> bool {
    s.chars().last().is_some_and(|c| SENTENCE_ENDINGS.contains(&c))
}

/// Reduce a free-text answer to a short phrase fit for a template.
///
/// Keeps the first clause, cuts long clauses at a comma when possible,
/// and strips trailing punctuation. Returns `None` for blank answers.
pub fn clean_fragment(answer: &str) -> Option<String> {
    let trimmed = answer.trim();
    let first = trimmed
        .split(|c: char| CLAUSE_BREAKS.contains(&c))
        .map(str::trim)
        .find(|s| !s.is_empty())?;

    let chars: Vec<char> = first.chars().collect();
    let clipped: String = if chars.len() > MAX_FRAGMENT_CHARS {
        let window = &chars[..MAX_FRAGMENT_CHARS];
        match window.iter().rposition(|c| SOFT_BREAKS.contains(c)) {
            Some(pos) if pos > 0 => window[..pos].iter().collect(),
            _ => window.iter().collect(),
        }
    } else {
        first.to_string()
    };

    let cleaned = clipped.trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(c)).trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Cut text to at most `max` characters at a sentence boundary.
///
/// When no sentence ending lies within range, the text is cut one short
/// of the cap and a terminal "。" is appended, so the result always ends
/// a sentence and never exceeds `max`.
pub fn truncate_at_sentence(text: &str, max: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max {
        return text.to_string();
    }

    match chars[..max].iter().rposition(|c| SENTENCE_ENDINGS.contains(c)) {
        Some(end) => chars[..=end].iter().collect(),
        None => {
            let mut cut: String = chars[..max.saturating_sub(1)].iter().collect();
            cut = cut.trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(c)).to_string();
            cut.push('。');
            cut
        }
    }
}

/// Bring content within `bounds`.
///
/// Over-long text is truncated at a sentence boundary; short text gets
/// closing sentences appended, starting at `seed` and cycling through
/// `closings`. Each closing must be no longer than `bounds.slack()`.
pub fn fit_length(text: &str, bounds: LengthBounds, closings: &[&str], seed: usize) -> String {
    debug_assert!(closings.iter().all(|c| char_len(c) <= bounds.slack()));

    let mut out = truncate_at_sentence(text.trim(), bounds.max);
    if !out.is_empty() && !ends_sentence(&out) {
        if char_len(&out) >= bounds.max {
            out = truncate_at_sentence(&out, bounds.max - 1);
        }
        if !ends_sentence(&out) {
            out.push('。');
        }
    }

    let before = char_len(&out);
    let mut i = 0;
    while char_len(&out) < bounds.min && !closings.is_empty() {
        out.push_str(closings[(seed + i) % closings.len()]);
        i += 1;
    }
    if i > 0 {
        tracing::debug!(before, after = char_len(&out), closings = i, "Padded card content");
    }

    out
}

/// Deterministic seed derived from text, stable across runs and platforms.
pub fn seed_of<'a>(parts: impl IntoIterator<Item = &'a str>) -> usize {
    parts
        .into_iter()
        .flat_map(str::chars)
        .fold(0usize, |acc, c| acc.wrapping_mul(31).wrapping_add(c as usize))
}

/// Pick from a pool by seed.
pub fn pick<'a>(pool: &[&'a str], seed: usize) -> &'a str {
    if pool.is_empty() {
        ""
    } else {
        pool[seed % pool.len()]
    }
}

/// Strip surrounding title or quote marks.
pub fn unquote(s: &str) -> &str {
    s.trim_matches(|c: char| "《》“”「」『』\"'".contains(c))
}

/// Join sentence parts with "，" and close with "。".
pub fn join_clauses(parts: &[String]) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(format!("{}。", parts.join("，")))
    }
}

/// First sentence of a paragraph, ending punctuation included.
pub fn first_sentence(text: &str) -> &str {
    match text.char_indices().find(|(_, c)| SENTENCE_ENDINGS.contains(c)) {
        Some((i, c)) => &text[..i + c.len_utf8()],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CLOSINGS: [&str; 2] = ["这是结尾。", "再补一句话。"];

    #[test]
    fn test_clean_fragment_first_clause() {
        assert_eq!(clean_fragment("  大理。还有丽江！ "), Some("大理".to_string()));
        assert_eq!(clean_fragment("学会了游泳，"), Some("学会了游泳".to_string()));
        assert_eq!(clean_fragment("。。"), None);
        assert_eq!(clean_fragment("   "), None);
    }

    #[test]
    fn test_clean_fragment_clips_long_answers_at_comma() {
        let long = "在洱海边骑了一整天的自行车，看日落看云看山，晚上还去古城听了民谣";
        let cleaned = clean_fragment(long).unwrap();
        assert!(char_len(&cleaned) <= MAX_FRAGMENT_CHARS);
        assert_eq!(cleaned, "在洱海边骑了一整天的自行车，看日落看云看山");
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_at_sentence("一句话。", 10), "一句话。");
    }

    #[test]
    fn test_truncate_at_last_sentence_end() {
        let text = "第一句。第二句！第三句很长很长很长。";
        assert_eq!(truncate_at_sentence(text, 9), "第一句。第二句！");
    }

    #[test]
    fn test_truncate_without_sentence_end_appends_period() {
        let text = "没有任何标点的一段很长很长的文字";
        let out = truncate_at_sentence(text, 6);
        assert_eq!(out, "没有任何标。");
        assert_eq!(char_len(&out), 6);
    }

    #[test]
    fn test_fit_length_pads_short_text() {
        let out = fit_length("短。", LengthBounds::new(10, 20), &CLOSINGS, 0);
        assert!(LengthBounds::new(10, 20).contains(char_len(&out)));
        assert!(out.starts_with("短。这是结尾。"));
    }

    #[test]
    fn test_fit_length_closes_unterminated_text() {
        let out = fit_length("没有句号的内容已经够长了吧", LengthBounds::new(5, 40), &CLOSINGS, 0);
        assert!(out.ends_with('。'));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("《晴天》"), "晴天");
        assert_eq!(unquote("“自由”"), "自由");
        assert_eq!(unquote("晴天"), "晴天");
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("一。二。"), "一。");
        assert_eq!(first_sentence("没有句号"), "没有句号");
    }

    #[test]
    fn test_seed_is_stable() {
        assert_eq!(seed_of(["大理", "晴天"]), seed_of(["大理晴天"]));
        assert_ne!(seed_of(["大理"]), seed_of(["丽江"]));
    }

    proptest! {
        #[test]
        fn prop_truncation_respects_cap_and_ends_sentence(text in "[一二三四五。！？a-z ]{0,200}", max in 5usize..120) {
            let out = truncate_at_sentence(&text, max);
            prop_assert!(char_len(&out) <= max);
            if char_len(&text) > max {
                prop_assert!(ends_sentence(&out));
            }
        }

        #[test]
        fn prop_fit_length_within_bounds(text in "[一二三四五。，a-z]{0,300}", seed in 0usize..10) {
            let bounds = LengthBounds::new(20, 40);
            let out = fit_length(&text, bounds, &CLOSINGS, seed);
            prop_assert!(bounds.contains(char_len(&out)), "len {} for {:?}", char_len(&out), out);
            prop_assert!(ends_sentence(&out));
        }
    }
}
