//! Future & Wishes card
//!
//! **Theme**: what the user hopes to carry into next year.
//!
//! Places and companions are merged into one sentence when both exist.
//! Regrets and farewells close the card.

use crate::classify::{Bucket, Slot};

use super::compose::{join_clauses, LengthBounds};
use super::{CardBuilder, Draft, SlotValues};

const BOUNDS: LengthBounds = LengthBounds::new(120, 180);

const TITLES: [&str; 4] = ["未来可期", "来日方长", "星河长明", "万物可爱"];
const OUTWARD_TITLES: [&str; 2] = ["奔赴山海", "心之所向"];

const CLOSINGS: [&str; 5] = [
    "未来的日子，请继续闪闪发光。",
    "带着这一年的勇气，去赴下一场约。",
    "愿所求皆如愿，所行皆坦途。",
    "新的一页已经翻开，慢慢写就好。",
    "明年的你，一定会感谢现在的自己。",
];

const GENERIC_TITLE: &str = "未来可期";
const GENERIC_CONTENT: &str = "新的一年还是一张空白的拍立得，等待你按下快门。也许你还没想好要去哪里、成为怎样的人，但这并不要紧。想见的人、想去的地方、想学的东西，都可以慢慢写进清单。带着这一年积攒下的勇气和温柔，慢慢走，认真看，大胆去试，未来总会在某个转角给你一个小小的惊喜。";

/// Builds the future card (polaroid).
pub struct FutureCard;

impl FutureCard {
    pub fn new() -> Self {
        Self
    }

    fn intention(&self, values: &SlotValues) -> String {
        let mut out = String::new();
        if let Some(theme) = values.get(Slot::Theme) {
            out.push_str(&format!("你给明年定下的基调是“{theme}”。"));
        }
        if let Some(wish) = values.get(Slot::Wish) {
            out.push_str(&format!("明年，你最想实现的愿望是{wish}。"));
        }
        if out.is_empty() {
            out.push_str("新的一年正在前方等你。");
        }
        out
    }

    fn company(&self, values: &SlotValues) -> Option<String> {
        match (values.get(Slot::NextPlace), values.get(Slot::Companion)) {
            (Some(place), Some(who)) => Some(format!("你想和{who}一起，去{place}看看。")),
            (Some(place), None) => Some(format!("你想去{place}，看看不一样的风景。")),
            (None, Some(who)) => Some(format!("你最想陪伴的人是{who}。")),
            (None, None) => None,
        }
    }

    fn plans(&self, values: &SlotValues) -> Option<String> {
        let mut clauses = Vec::new();
        if let Some(skill) = values.get(Slot::NextSkill) {
            clauses.push(format!("学会{skill}"));
        }
        if let Some(habit) = values.get(Slot::QuitHabit) {
            clauses.push(format!("改掉{habit}"));
        }
        if let Some(adventure) = values.get(Slot::Adventure) {
            clauses.push(format!("试试{adventure}"));
        }
        join_clauses(&clauses).map(|s| format!("你计划{s}"))
    }

    fn farewell(&self, values: &SlotValues) -> Option<String> {
        let mut out = String::new();
        if let Some(regret) = values.get(Slot::Regret) {
            out.push_str(&format!("那些关于{regret}的遗憾，明年慢慢弥补。"));
        }
        if let Some(letter) = values.get(Slot::LetterToSelf) {
            out.push_str(&format!("你想对明年的自己说：“{letter}”。"));
        }
        if let Some(goodbye) = values.get(Slot::Goodbye) {
            out.push_str(&format!("最后，你用“{goodbye}”和这一年告别。"));
        }
        (!out.is_empty()).then_some(out)
    }
}

impl Default for FutureCard {
    fn default() -> Self {
        Self::new()
    }
}

impl CardBuilder for FutureCard {
    fn bucket(&self) -> Bucket {
        Bucket::Future
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
            if values.has_any(&[Slot::Wish, Slot::Adventure, Slot::NextPlace]) {
                &OUTWARD_TITLES
            } else {
                &TITLES
            };

        let mut paragraphs = vec![self.intention(values)];
        paragraphs.extend(self.company(values));
        paragraphs.extend(self.plans(values));
        paragraphs.extend(self.farewell(values));

        Draft { titles, paragraphs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::compose::char_len;
    use crate::questions::QuestionSet;
    use crate::transcript::BucketEntry;

    fn entry(id: u32, slot: Slot, answer: &'static str) -> BucketEntry<'static> {
        BucketEntry {
            question: QuestionSet::standard().get(id).unwrap(),
            slot: Some(slot),
            answer,
        }
    }

    #[test]
    fn test_generic_card_within_bounds() {
        assert!(BOUNDS.contains(char_len(GENERIC_CONTENT)));
        let card = FutureCard::new().build(&[]);
        assert_eq!(card.content, GENERIC_CONTENT);
        assert_eq!(card.keyword, "FUTURE");
    }

    #[test]
    fn test_closings_fit_slack() {
        assert!(CLOSINGS.iter().all(|c| char_len(c) <= BOUNDS.slack()));
    }

    #[test]
    fn test_place_and_companion_merge() {
        let card = FutureCard::new().build(&[
            entry(32, Slot::NextPlace, "冰岛"),
            entry(36, Slot::Companion, "爸妈"),
        ]);
        assert!(OUTWARD_TITLES.contains(&card.title.as_str()));
        assert!(card.content.contains("你想和爸妈一起，去冰岛看看。"));
        assert!(BOUNDS.contains(char_len(&card.content)));
    }

    #[test]
    fn test_plans_and_goodbye() {
        let card = FutureCard::new().build(&[
            entry(33, Slot::NextSkill, "日语"),
            entry(34, Slot::QuitHabit, "熬夜。"),
            entry(40, Slot::Goodbye, "再见啦"),
        ]);
        assert!(TITLES.contains(&card.title.as_str()));
        assert!(card.content.contains("你计划学会日语，改掉熬夜。"));
        assert!(card.content.contains("最后，你用“再见啦”和这一年告别。"));
    }
}
