//! Thematic classification of questions.
//!
//! Every question maps to at most one [`Bucket`] and, optionally, a
//! named [`Slot`] used by the fallback templates. The mapping is a static
//! table keyed by question id; questions outside the table fall back to
//! a category-label lookup. Both lookups are pure functions with no
//! hidden state, so repeated calls always agree.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::questions::Question;
use crate::summary::CardStyle;

/// One of the four themes a year summary is organised around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Journey,
    Emotions,
    Tastes,
    Future,
}

impl Bucket {
    /// All buckets in card order.
    pub const ALL: [Bucket; 4] = [Bucket::Journey, Bucket::Emotions, Bucket::Tastes, Bucket::Future];

    /// Fixed English keyword carried by the bucket's fallback card.
    pub fn keyword(&self) -> &'static str {
        match self {
            Bucket::Journey => "GROWTH",
            Bucket::Emotions => "EMOTIONS",
            Bucket::Tastes => "TASTES",
            Bucket::Future => "FUTURE",
        }
    }

    /// Visual style of the bucket's fallback card. Never shared between buckets.
    pub fn style(&self) -> CardStyle {
        match self {
            Bucket::Journey => CardStyle::Ticket,
            Bucket::Emotions => CardStyle::Paper,
            Bucket::Tastes => CardStyle::Note,
            Bucket::Future => CardStyle::Polaroid,
        }
    }

    /// Label used when rendering categorized prompt context.
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Journey => "旅程与成长",
            Bucket::Emotions => "情绪与关系",
            Bucket::Tastes => "品味与日常",
            Bucket::Future => "未来与期许",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Journey => write!(f, "journey"),
            Bucket::Emotions => write!(f, "emotions"),
            Bucket::Tastes => write!(f, "tastes"),
            Bucket::Future => write!(f, "future"),
        }
    }
}

/// Named piece of content a fallback template can interpolate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    // journey
    YearWord,
    Achievement,
    Skill,
    Decision,
    Destination,
    TravelStory,
    Haunt,
    Challenge,
    // emotions
    NewFriend,
    Joy,
    Tears,
    Gratitude,
    Family,
    Anxiety,
    Comfort,
    Gift,
    Farewell,
    MoodColor,
    SelfTalk,
    // tastes
    Song,
    Book,
    Screen,
    Meal,
    Habit,
    Purchase,
    App,
    Hobby,
    Outfit,
    Season,
    // future
    Wish,
    NextPlace,
    NextSkill,
    QuitHabit,
    LetterToSelf,
    Companion,
    Adventure,
    Theme,
    Regret,
    Goodbye,
}

/// Classification of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub bucket: Bucket,
    pub slot: Option<Slot>,
}

// Question 10 (catch-phrase) is deliberately absent: it stays in the raw
// transcript but feeds no bucket.
const ID_TABLE: [(u32, Bucket, Slot); 39] = [
    (1, Bucket::Journey, Slot::YearWord),
    (2, Bucket::Journey, Slot::Achievement),
    (3, Bucket::Journey, Slot::Skill),
    (4, Bucket::Journey, Slot::Decision),
    (5, Bucket::Journey, Slot::Destination),
    (6, Bucket::Journey, Slot::TravelStory),
    (7, Bucket::Journey, Slot::Haunt),
    (8, Bucket::Journey, Slot::Challenge),
    (9, Bucket::Emotions, Slot::NewFriend),
    (11, Bucket::Emotions, Slot::Joy),
    (12, Bucket::Emotions, Slot::Tears),
    (13, Bucket::Emotions, Slot::Gratitude),
    (14, Bucket::Emotions, Slot::Family),
    (15, Bucket::Emotions, Slot::Anxiety),
    (16, Bucket::Emotions, Slot::Comfort),
    (17, Bucket::Emotions, Slot::Gift),
    (18, Bucket::Emotions, Slot::Farewell),
    (19, Bucket::Emotions, Slot::MoodColor),
    (20, Bucket::Emotions, Slot::SelfTalk),
    (21, Bucket::Tastes, Slot::Song),
    (22, Bucket::Tastes, Slot::Book),
    (23, Bucket::Tastes, Slot::Screen),
    (24, Bucket::Tastes, Slot::Meal),
    (25, Bucket::Tastes, Slot::Habit),
    (26, Bucket::Tastes, Slot::Purchase),
    (27, Bucket::Tastes, Slot::App),
    (28, Bucket::Tastes, Slot::Hobby),
    (29, Bucket::Tastes, Slot::Outfit),
    (30, Bucket::Tastes, Slot::Season),
    (31, Bucket::Future, Slot::Wish),
    (32, Bucket::Future, Slot::NextPlace),
    (33, Bucket::Future, Slot::NextSkill),
    (34, Bucket::Future, Slot::QuitHabit),
    (35, Bucket::Future, Slot::LetterToSelf),
    (36, Bucket::Future, Slot::Companion),
    (37, Bucket::Future, Slot::Adventure),
    (38, Bucket::Future, Slot::Theme),
    (39, Bucket::Future, Slot::Regret),
    (40, Bucket::Future, Slot::Goodbye),
];

// Category substrings for questions outside the id table, checked in order.
const CATEGORY_RULES: [(&str, Bucket); 10] = [
    ("足迹", Bucket::Journey),
    ("成就", Bucket::Journey),
    ("成长", Bucket::Journey),
    ("情绪", Bucket::Emotions),
    ("关系", Bucket::Emotions),
    ("品味", Bucket::Tastes),
    ("日常", Bucket::Tastes),
    ("爱好", Bucket::Tastes),
    ("未来", Bucket::Future),
    ("寄语", Bucket::Future),
];

/// Classify a question by id, falling back to its category label.
///
/// Returns `None` for questions that belong to no bucket.
pub fn classify(id: u32, category: &str) -> Option<Placement> {
    if let Some(&(_, bucket, slot)) = ID_TABLE.iter().find(|(qid, _, _)| *qid == id) {
        return Some(Placement {
            bucket,
            slot: Some(slot),
        });
    }

    CATEGORY_RULES
        .iter()
        .find(|(needle, _)| category.contains(needle))
        .map(|&(_, bucket)| Placement { bucket, slot: None })
}

// Question-text substrings that name a slot, per bucket, checked in order.
const SLOT_KEYWORDS: [(Bucket, &str, Slot); 38] = [
    (Bucket::Journey, "关键词", Slot::YearWord),
    (Bucket::Journey, "成就", Slot::Achievement),
    (Bucket::Journey, "技能", Slot::Skill),
    (Bucket::Journey, "决定", Slot::Decision),
    (Bucket::Journey, "城市", Slot::Destination),
    (Bucket::Journey, "国家", Slot::Destination),
    (Bucket::Journey, "旅行", Slot::TravelStory),
    (Bucket::Journey, "常去", Slot::Haunt),
    (Bucket::Journey, "困难", Slot::Challenge),
    (Bucket::Journey, "挑战", Slot::Challenge),
    (Bucket::Emotions, "朋友", Slot::NewFriend),
    (Bucket::Emotions, "开心", Slot::Joy),
    (Bucket::Emotions, "哭", Slot::Tears),
    (Bucket::Emotions, "感谢", Slot::Gratitude),
    (Bucket::Emotions, "家人", Slot::Family),
    (Bucket::Emotions, "焦虑", Slot::Anxiety),
    (Bucket::Emotions, "礼物", Slot::Gift),
    (Bucket::Emotions, "告别", Slot::Farewell),
    (Bucket::Emotions, "颜色", Slot::MoodColor),
    (Bucket::Tastes, "歌", Slot::Song),
    (Bucket::Tastes, "书", Slot::Book),
    (Bucket::Tastes, "电影", Slot::Screen),
    (Bucket::Tastes, "剧", Slot::Screen),
    (Bucket::Tastes, "吃", Slot::Meal),
    (Bucket::Tastes, "习惯", Slot::Habit),
    (Bucket::Tastes, "消费", Slot::Purchase),
    (Bucket::Tastes, "App", Slot::App),
    (Bucket::Tastes, "爱好", Slot::Hobby),
    (Bucket::Tastes, "衣服", Slot::Outfit),
    (Bucket::Tastes, "季节", Slot::Season),
    (Bucket::Future, "愿望", Slot::Wish),
    (Bucket::Future, "城市", Slot::NextPlace),
    (Bucket::Future, "国家", Slot::NextPlace),
    (Bucket::Future, "改掉", Slot::QuitHabit),
    (Bucket::Future, "学会", Slot::NextSkill),
    (Bucket::Future, "陪伴", Slot::Companion),
    (Bucket::Future, "遗憾", Slot::Regret),
    (Bucket::Future, "告别", Slot::Goodbye),
];

/// Slot named by a question's text within `bucket`, if any.
pub fn slot_from_text(bucket: Bucket, text: &str) -> Option<Slot> {
    SLOT_KEYWORDS
        .iter()
        .find(|(b, needle, _)| *b == bucket && text.contains(needle))
        .map(|&(_, _, slot)| slot)
}

/// Classify a full question.
///
/// Same as [`classify`], except that a placement without a slot gets one
/// from the question text when a keyword matches.
pub fn classify_question(question: &Question) -> Option<Placement> {
    classify(question.id, &question.category).map(|mut placement| {
        if placement.slot.is_none() {
            placement.slot = slot_from_text(placement.bucket, &question.text);
        }
        placement
    })
}

/// Bucket of a question, ignoring slots.
pub fn bucket_of(id: u32, category: &str) -> Option<Bucket> {
    classify(id, category).map(|p| p.bucket)
}
