//! Deterministic fallback summary.
//!
//! Used whenever the remote generator is unavailable. Each bucket has its
//! own [`CardBuilder`] that interpolates the user's answers into fixed
//! sentence templates; the four cards are then assembled with tags, a
//! poem, an analysis paragraph, a keyword and an animal.
//!
//! ## Guarantees
//!
//! | Property | Holds for |
//! |----------|-----------|
//! | Exactly four cards, styles ticket/paper/note/polaroid in order | every input |
//! | Card content within its bucket's length bounds | every input |
//! | Same output for the same answers | every input |
//! | Output passes the summary schema | every input |

mod compose;
mod emotions;
mod future;
mod journey;
mod tastes;

pub use compose::{
    char_len, clean_fragment, first_sentence, fit_length, truncate_at_sentence, LengthBounds,
    SENTENCE_ENDINGS,
};
pub use emotions::EmotionsCard;
pub use future::FutureCard;
pub use journey::JourneyCard;
pub use tastes::TastesCard;

use std::collections::BTreeMap;

use crate::answers::AnswerStore;
use crate::classify::{Bucket, Slot};
use crate::details::{unique_details, MAX_TAG_DETAILS};
use crate::questions::QuestionSet;
use crate::summary::{SummaryCard, YearSummary};
use crate::transcript::{BucketEntry, CategorizedContext};

use compose::{pick, seed_of};

/// Tags used to pad the visual tags up to the schema minimum.
pub const GENERIC_TAGS: [&str; 5] = ["回忆", "成长", "温柔", "热爱", "未来"];

/// Minimum number of visual tags.
pub const MIN_VISUAL_TAGS: usize = 5;

const GENERIC_POEM_WORD: &str = "时光";
const GENERIC_KEYWORD: &str = "MEMORIES";
const SPIRIT_ANIMAL: &str = "鲸鱼";

/// Most unslotted answers woven into one card.
const MAX_EXTRAS: usize = 2;

/// Cleaned answer fragments of one bucket, keyed by slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotValues {
    slots: BTreeMap<Slot, String>,
    extras: Vec<String>,
}

impl SlotValues {
    /// Collect fragments from a bucket's entries.
    ///
    /// The first answer for a slot wins. Answers without a slot are kept
    /// as extras, in catalogue order.
    pub fn from_entries(entries: &[BucketEntry<'_>]) -> Self {
        let mut values = Self::default();
        for entry in entries {
            let Some(fragment) = clean_fragment(entry.answer) else {
                continue;
            };
            match entry.slot {
                Some(slot) => {
                    values.slots.entry(slot).or_insert(fragment);
                }
                None => values.extras.push(fragment),
            }
        }
        values
    }

    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }

    pub fn has(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn has_any(&self, slots: &[Slot]) -> bool {
        slots.iter().any(|s| self.has(*s))
    }

    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.extras.is_empty()
    }

    pub fn filled(&self) -> usize {
        self.slots.len() + self.extras.len()
    }

    /// Seed for title and closing selection.
    pub fn seed(&self) -> usize {
        seed_of(self.slots.values().chain(self.extras.iter()).map(String::as_str))
    }
}

/// Composed card text before length fitting.
#[derive(Debug, Clone)]
pub struct Draft {
    /// Title pool narrowed by the filled slots
    pub titles: &'static [&'static str],

    /// Paragraphs, each one or more full sentences
    pub paragraphs: Vec<String>,
}

/// One card per bucket.
pub trait CardBuilder: Send + Sync {
    fn bucket(&self) -> Bucket;

    /// Allowed content length in characters.
    fn bounds(&self) -> LengthBounds;

    /// Closing sentences appended to short content.
    fn closings(&self) -> &'static [&'static str];

    /// Card returned when the bucket has no usable answers.
    fn generic(&self) -> (&'static str, &'static str);

    /// Compose paragraphs from non-empty slot values.
    fn compose(&self, values: &SlotValues) -> Draft;

    fn build(&self, entries: &[BucketEntry<'_>]) -> SummaryCard {
        let bucket = self.bucket();
        let values = SlotValues::from_entries(entries);

        let (title, content) = if values.is_empty() {
            tracing::debug!(bucket = %bucket, "No usable answers, using generic card");
            let (title, content) = self.generic();
            (title, fit_length(content, self.bounds(), self.closings(), 0))
        } else {
            let draft = self.compose(&values);
            let seed = values.seed();
            tracing::debug!(bucket = %bucket, filled = values.filled(), "Composing card");
            let mut paragraphs = draft.paragraphs;
            paragraphs.extend(extra_sentences(&values));
            let content = fit_length(&paragraphs.join("\n"), self.bounds(), self.closings(), seed);
            (pick(draft.titles, seed), content)
        };

        SummaryCard {
            title: title.to_string(),
            content,
            keyword: bucket.keyword().to_string(),
            style: bucket.style(),
        }
    }
}

fn extra_sentences(values: &SlotValues) -> Option<String> {
    let mentioned: Vec<String> = values
        .extras()
        .iter()
        .take(MAX_EXTRAS)
        .map(|x| format!("“{x}”"))
        .collect();
    if mentioned.is_empty() {
        None
    } else {
        Some(format!("你还写下了{}。", mentioned.join("和")))
    }
}

/// Builds complete summaries without any network access.
pub struct FallbackSummaryGenerator {
    builders: Vec<Box<dyn CardBuilder>>,
}

impl FallbackSummaryGenerator {
    pub fn new() -> Self {
        Self {
            builders: vec![
                Box::new(JourneyCard::new()),
                Box::new(EmotionsCard::new()),
                Box::new(TastesCard::new()),
                Box::new(FutureCard::new()),
            ],
        }
    }

    /// Build a summary. Never fails.
    pub fn generate(&self, answers: &AnswerStore, questions: &QuestionSet) -> YearSummary {
        let context = CategorizedContext::build(questions, answers);
        let cards: Vec<SummaryCard> = self
            .builders
            .iter()
            .map(|b| b.build(context.entries(b.bucket())))
            .collect();

        let details = unique_details(questions, answers);
        let summary = YearSummary {
            visual_tags: visual_tags(&details),
            poem: poem(details.first().map(String::as_str)),
            analysis: analysis(&cards),
            keyword: details
                .first()
                .map(|d| d.to_uppercase())
                .unwrap_or_else(|| GENERIC_KEYWORD.to_string()),
            animal: SPIRIT_ANIMAL.to_string(),
            cards,
        };

        tracing::info!(
            answered = answers.answered_count(),
            details = details.len(),
            "Built fallback summary"
        );
        summary
    }
}

impl Default for FallbackSummaryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a fallback summary with the standard card builders.
pub fn build_fallback(answers: &AnswerStore, questions: &QuestionSet) -> YearSummary {
    FallbackSummaryGenerator::new().generate(answers, questions)
}

fn visual_tags(details: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = details.iter().take(MAX_TAG_DETAILS).cloned().collect();
    for generic in GENERIC_TAGS {
        if tags.len() >= MIN_VISUAL_TAGS {
            break;
        }
        if !tags.iter().any(|t| t == generic) {
            tags.push(generic.to_string());
        }
    }
    tags
}

fn poem(detail: Option<&str>) -> String {
    let word = detail.unwrap_or(GENERIC_POEM_WORD);
    format!("{word}藏在这一年的风里\n你把平凡的日子写成了诗\n走过的路都会慢慢发光\n下一站依然值得期待")
}

fn analysis(cards: &[SummaryCard]) -> String {
    let titles: Vec<String> = cards.iter().map(|c| format!("「{}」", c.title)).collect();
    let mut out = format!("这一年被收进了{}张卡片：{}。", cards.len(), titles.join(""));
    for card in cards {
        out.push_str(first_sentence(&card.content));
    }
    out.push_str("愿你带着这些记忆，走进新的一年。");
    out
}
