//! Emotions & Relationships card
//!
//! **Theme**: the moods of the year and the people who shared them.

use crate::classify::{Bucket, Slot};

use super::compose::{join_clauses, LengthBounds};
use super::{CardBuilder, Draft, SlotValues};

const BOUNDS: LengthBounds = LengthBounds::new(100, 150);

const TITLES: [&str; 4] = ["心有微光", "温柔以待", "悲欢自渡", "万般滋味"];
const WARM_TITLES: [&str; 3] = ["人间值得", "爱意永存", "被爱包围"];
const STORM_TITLES: [&str; 3] = ["雨后初晴", "与己和解", "穿过风雨"];

const CLOSINGS: [&str; 5] = [
    "所有情绪都值得被温柔接住。",
    "哭过笑过，你依然柔软而勇敢。",
    "被爱过，也认真地爱着，这就是你的这一年。",
    "愿你继续做自己情绪的好朋友。",
    "心里有光的人，走到哪里都亮堂。",
];

const GENERIC_TITLE: &str = "心有微光";
const GENERIC_CONTENT: &str = "这一年的情绪像潮水，有涨有落。你也许在深夜里难过过，也在某个普通的午后突然笑出声来。那些没有说出口的心事，都被时间温柔地收好了。身边的人来来去去，留下的都是真心。愿你记得，每一种情绪都值得被认真对待。";

/// Builds the emotions card (paper).
pub struct EmotionsCard;

impl EmotionsCard {
    pub fn new() -> Self {
        Self
    }

    fn mood(&self, values: &SlotValues) -> String {
        let mut out = String::new();
        if let Some(joy) = values.get(Slot::Joy) {
            out.push_str(&format!("今年最开心的瞬间，是{joy}。"));
        }
        if let Some(color) = values.get(Slot::MoodColor) {
            out.push_str(&format!("如果给这一年的心情涂上颜色，那会是{color}。"));
        }
        if out.is_empty() {
            out.push_str("这一年的心情有晴也有雨。");
        }
        out
    }

    fn storms(&self, values: &SlotValues) -> Option<String> {
        let low = match (values.get(Slot::Tears), values.get(Slot::Anxiety)) {
            (Some(tears), _) => Some(format!("你也曾因为{tears}而落泪")),
            (None, Some(worry)) => Some(format!("{worry}曾让你辗转难眠")),
            (None, None) => None,
        };
        match (low, values.get(Slot::Comfort)) {
            (Some(low), Some(comfort)) => Some(format!("{low}，好在你找到了自己的办法：{comfort}。")),
            (Some(low), None) => Some(format!("{low}，但你还是一步步走了过来。")),
            (None, Some(comfort)) => Some(format!("难过的时候，你学会了用{comfort}安抚自己。")),
            (None, None) => None,
        }
    }

    fn people(&self, values: &SlotValues) -> Option<String> {
        let mut clauses = Vec::new();
        if let Some(who) = values.get(Slot::Gratitude) {
            clauses.push(format!("你最想感谢的是{who}"));
        }
        if let Some(moment) = values.get(Slot::Family) {
            clauses.push(format!("和家人在一起的{moment}最温暖"));
        }
        if let Some(friend) = values.get(Slot::NewFriend) {
            clauses.push(format!("{friend}走进了你的生活"));
        }
        if let Some(gift) = values.get(Slot::Gift) {
            clauses.push(format!("{gift}是今年最好的礼物"));
        }

        let mut out = join_clauses(&clauses).unwrap_or_default();
        if let Some(farewell) = values.get(Slot::Farewell) {
            out.push_str(&format!("也有{farewell}，在这一年里悄悄告别。"));
        }
        (!out.is_empty()).then_some(out)
    }
}

impl Default for EmotionsCard {
    fn default() -> Self {
        Self::new()
    }
}

impl CardBuilder for EmotionsCard {
    fn bucket(&self) -> Bucket {
        Bucket::Emotions
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
        let titles: &'static [&'static str] = if values.has_any(&[Slot::Gratitude, Slot::Family]) {
            &WARM_TITLES
        } else if values.has_any(&[Slot::Tears, Slot::Anxiety]) {
            &STORM_TITLES
        } else {
            &TITLES
        };

        let mut paragraphs = vec![self.mood(values)];
        paragraphs.extend(self.storms(values));
        paragraphs.extend(self.people(values));
        if let Some(words) = values.get(Slot::SelfTalk) {
            paragraphs.push(format!("你对自己说：“{words}”。"));
        }

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
        let card = EmotionsCard::new().build(&[]);
        assert_eq!(card.title, GENERIC_TITLE);
        assert_eq!(card.keyword, "EMOTIONS");
    }

    #[test]
    fn test_closings_fit_slack() {
        assert!(CLOSINGS.iter().all(|c| char_len(c) <= BOUNDS.slack()));
    }

    #[test]
    fn test_tears_with_comfort() {
        let card = EmotionsCard::new().build(&[
            entry(12, Slot::Tears, "毕业离别"),
            entry(16, Slot::Comfort, "出门散步"),
        ]);
        assert!(STORM_TITLES.contains(&card.title.as_str()));
        assert!(card.content.contains("你也曾因为毕业离别而落泪，好在你找到了自己的办法：出门散步。"));
        assert!(BOUNDS.contains(char_len(&card.content)));
    }

    #[test]
    fn test_gratitude_prefers_warm_titles() {
        let card = EmotionsCard::new().build(&[
            entry(12, Slot::Tears, "毕业离别"),
            entry(13, Slot::Gratitude, "妈妈"),
        ]);
        assert!(WARM_TITLES.contains(&card.title.as_str()));
        assert!(card.content.contains("你最想感谢的是妈妈。"));
    }
}
