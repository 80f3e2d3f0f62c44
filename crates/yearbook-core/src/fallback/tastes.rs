//! Tastes & Daily Life card

use crate::classify::{Bucket, Slot};

use super::compose::{join_clauses, unquote, LengthBounds};
use super::{CardBuilder, Draft, SlotValues};

const BOUNDS: LengthBounds = LengthBounds::new(100, 150);

const TITLES: [&str; 4] = ["人间滋味", "生活切片", "热爱可抵", "日常诗篇"];
const CULTURE_TITLES: [&str; 3] = ["耳畔旋律", "书影相伴", "光影流年"];
const MEAL_TITLES: [&str; 2] = ["人间烟火", "舌尖记忆"];

const CLOSINGS: [&str; 5] = [
    "热爱的东西，会悄悄拼成你的模样。",
    "日常的小确幸，撑起了整整一年。",
    "你的品味，就是你生活最好的注脚。",
    "平凡的日子里，也藏着闪闪发光的细节。",
    "愿这些热爱，陪你走进新的一年。",
];

const GENERIC_TITLE: &str = "生活切片";
const GENERIC_CONTENT: &str = "这一年的日子由许多细小的热爱拼成：一首随手点开的歌，一顿热气腾腾的饭，一个慢慢养成的习惯。它们不声不响，却让平凡的生活有了自己的味道。周末的阳光、深夜的零食、喜欢的衣服和常听的播客，你的品味，就藏在这些日常里。";

/// Builds the tastes card (note).
pub struct TastesCard;

impl TastesCard {
    pub fn new() -> Self {
        Self
    }

    fn culture(&self, values: &SlotValues) -> Option<String> {
        let mut clauses = Vec::new();
        if let Some(song) = values.get(Slot::Song) {
            clauses.push(format!("耳机里单曲循环着《{}》", unquote(song)));
        }
        if let Some(book) = values.get(Slot::Book) {
            clauses.push(format!("枕边放着《{}》", unquote(book)));
        }
        if let Some(screen) = values.get(Slot::Screen) {
            clauses.push(format!("屏幕上反复重温《{}》", unquote(screen)));
        }
        join_clauses(&clauses).map(|s| format!("这一年，{s}"))
    }

    fn routine(&self, values: &SlotValues) -> Option<String> {
        let mut clauses = Vec::new();
        if let Some(habit) = values.get(Slot::Habit) {
            clauses.push(format!("你养成了{habit}这个新习惯"));
        }
        if let Some(hobby) = values.get(Slot::Hobby) {
            clauses.push(format!("还迷上了{hobby}"));
        }
        join_clauses(&clauses)
    }

    fn details(&self, values: &SlotValues) -> Option<String> {
        let mut clauses = Vec::new();
        if let Some(purchase) = values.get(Slot::Purchase) {
            clauses.push(format!("最值得的一笔消费是{purchase}"));
        }
        if let Some(app) = values.get(Slot::App) {
            clauses.push(format!("{app}陪你度过了无数碎片时间"));
        }
        if let Some(outfit) = values.get(Slot::Outfit) {
            clauses.push(format!("{outfit}几乎成了你的标配"));
        }
        if let Some(season) = values.get(Slot::Season) {
            clauses.push(format!("你偏爱{season}"));
        }
        join_clauses(&clauses)
    }
}

impl Default for TastesCard {
    fn default() -> Self {
        Self::new()
    }
}

impl CardBuilder for TastesCard {
    fn bucket(&self) -> Bucket {
        Bucket::Tastes
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
            if values.has_any(&[Slot::Song, Slot::Book, Slot::Screen]) {
                &CULTURE_TITLES
            } else if values.has(Slot::Meal) {
                &MEAL_TITLES
            } else {
                &TITLES
            };

        let mut paragraphs = Vec::new();
        paragraphs.extend(self.culture(values));
        if let Some(meal) = values.get(Slot::Meal) {
            paragraphs.push(format!("最难忘的一顿饭是{meal}，那是生活最真实的味道。"));
        }
        paragraphs.extend(self.routine(values));
        paragraphs.extend(self.details(values));
        if paragraphs.is_empty() {
            paragraphs.push("这一年的日常，藏着只属于你的小小热爱。".to_string());
        }

        Draft { titles, paragraphs }
    }
}
