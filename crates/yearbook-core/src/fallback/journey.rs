//! Journey & Growth card
//!
//! **Theme**: where the user went and what they became along the way.
//!
//! | Slot | Sentence |
//! |------|----------|
//! | year word | opening line |
//! | destination, travel story | place paragraph |
//! | haunt | everyday place |
//! | achievement, skill, challenge, decision | growth paragraph |

use crate::classify::{Bucket, Slot};

use super::compose::{join_clauses, LengthBounds};
use super::{CardBuilder, Draft, SlotValues};

const BOUNDS: LengthBounds = LengthBounds::new(120, 180);

const TITLES: [&str; 4] = ["步履不停", "向光而行", "一路生花", "山高水长"];
const TRAVEL_TITLES: [&str; 3] = ["山海为径", "远方来信", "行者无疆"];
const GROWTH_TITLES: [&str; 3] = ["破茧成蝶", "厚积薄发", "步步为营"];

const CLOSINGS: [&str; 5] = [
    "回头看，走过的路都成了光。",
    "那些奔波与停留，都在悄悄塑造新的你。",
    "旅程还没有结束，下一站依然值得期待。",
    "你比年初的自己，又勇敢了一点点。",
    "愿你把这份闯劲，带进新的一年。",
];

const GENERIC_TITLE: &str = "步履不停";
const GENERIC_CONTENT: &str = "这一年，你或许没有写下太多答案，但时间依然在你身上留下了痕迹。你走过熟悉的街道，也闯过陌生的路口；有过停下来犹豫的时刻，也有咬牙坚持的日子。那些没有被说出口的成长，同样算数。回头看，你已经比年初的自己走得更远了一些，也更懂得如何照顾自己的脚步。";

/// Builds the journey card (ticket).
pub struct JourneyCard;

impl JourneyCard {
    pub fn new() -> Self {
        Self
    }

    fn opening(&self, values: &SlotValues) -> String {
        match values.get(Slot::YearWord) {
            Some(word) => format!("如果这一年只能用一个词来概括，你选择了“{word}”。"),
            None => "这一年，你用自己的节奏走过了很多路。".to_string(),
        }
    }

    fn places(&self, values: &SlotValues) -> Option<String> {
        let mut out = match (values.get(Slot::Destination), values.get(Slot::TravelStory)) {
            (Some(place), Some(story)) => {
                format!("你去了{place}，{story}，这段记忆至今仍闪着光。")
            }
            (Some(place), None) => {
                format!("{place}是你今年最难忘的目的地，那里的风景被你悄悄收进了心里。")
            }
            (None, Some(story)) => format!("旅途中，{story}，这一幕你记了很久。"),
            (None, None) => String::new(),
        };
        if let Some(haunt) = values.get(Slot::Haunt) {
            out.push_str(&format!("而在日常里，{haunt}是你最常停靠的地方。"));
        }
        (!out.is_empty()).then_some(out)
    }

    fn growth(&self, values: &SlotValues) -> Option<String> {
        let mut clauses = Vec::new();
        if let Some(a) = values.get(Slot::Achievement) {
            clauses.push(format!("你完成了{a}"));
        }
        if let Some(s) = values.get(Slot::Skill) {
            clauses.push(format!("学会了{s}"));
        }
        if let Some(c) = values.get(Slot::Challenge) {
            clauses.push(format!("也扛过了{c}"));
        }
        if let Some(d) = values.get(Slot::Decision) {
            clauses.push(format!("还做出了“{d}”这个决定"));
        }
        join_clauses(&clauses).map(|s| format!("{s}每一步都算数。"))
    }
}

impl Default for JourneyCard {
    fn default() -> Self {
        Self::new()
    }
}

impl CardBuilder for JourneyCard {
    fn bucket(&self) -> Bucket {
        Bucket::Journey
    }

    fn bounds(&self) -> LengthBounds {
        BOUNDS
    }

    fn closings(&self) -> &'static [&'static str] {
        &CLOSINGS
    }

    fn generic(&self) -> (&'static str, &'static str) {
        (GENERIC_TITLE, GENERIC_CONTENT)
    }

    fn compose(&self, values: &SlotValues) -> Draft {
        let titles: &'static [&'static str] =
            if values.has_any(&[Slot::Destination, Slot::TravelStory]) {
                &TRAVEL_TITLES
            } else if values.has_any(&[Slot::Achievement, Slot::Skill]) {
                &GROWTH_TITLES
            } else {
                &TITLES
            };

        let mut paragraphs = vec![self.opening(values)];
        paragraphs.extend(self.places(values));
        paragraphs.extend(self.growth(values));

        Draft { titles, paragraphs }
    }
}
