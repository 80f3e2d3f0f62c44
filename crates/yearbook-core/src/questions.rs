//! The fixed 40-question year-in-review catalogue.
//!
//! Questions are grouped into four parts and never change at runtime.
//! Use [`QuestionSet::standard`] for the built-in catalogue; custom sets
//! can be built with [`QuestionSet::new`] for tests or localisation.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Number of questions in the standard catalogue.
pub const QUESTION_COUNT: u32 = 40;

/// A single questionnaire prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique id, 1..=40 in the standard catalogue
    pub id: u32,

    /// Part of the questionnaire, 1..=4
    pub part: u8,

    /// Prompt text shown to the user
    pub text: String,

    /// Short category label
    pub category: String,
}

impl Question {
    pub fn new(id: u32, part: u8, category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            part,
            text: text.into(),
            category: category.into(),
        }
    }
}

/// Ordered, immutable collection of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

// (id, part, category, text)
const STANDARD: [(u32, u8, &str, &str); 40] = [
    (1, 1, "年度关键词", "如果用一个词概括你的这一年，你会选哪个词？"),
    (2, 1, "高光成就", "今年你最骄傲的一项成就是什么？"),
    (3, 1, "成长", "今年你学会的一项新技能是什么？"),
    (4, 1, "关键抉择", "今年你做出的最重要的一个决定是什么？"),
    (5, 1, "足迹", "今年去过的最难忘的城市/州/国家是哪里？"),
    (6, 1, "足迹", "在那里发生了什么让你印象深刻的事？"),
    (7, 1, "日常足迹", "今年你最常去的一个地方是哪里？"),
    (8, 1, "挑战", "今年你克服的最大困难是什么？"),
    (9, 1, "相遇", "今年认识的最重要的新朋友是谁？"),
    (10, 1, "口头禅", "今年你最常说的一句话是什么？"),
    (11, 2, "情绪", "今年最开心的一个瞬间是什么？"),
    (12, 2, "情绪", "今年哭得最厉害的一次是因为什么？"),
    (13, 2, "关系", "今年你最想感谢的人是谁？为什么？"),
    (14, 2, "关系", "今年和家人之间最温暖的一刻是什么？"),
    (15, 2, "情绪", "今年最让你焦虑的事情是什么？"),
    (16, 2, "自愈", "焦虑的时候，你是如何让自己平静下来的？"),
    (17, 2, "惊喜", "今年收到的最好的一份礼物是什么？"),
    (18, 2, "告别", "今年有没有失去或告别什么？"),
    (19, 2, "心情色彩", "如果给今年的心情涂一个颜色，会是什么颜色？"),
    (20, 2, "自我", "今年你对自己说过最温柔的一句话是什么？"),
    (21, 3, "品味·音乐", "今年单曲循环最多的一首歌是什么？"),
    (22, 3, "品味·阅读", "今年读过印象最深的一本书是什么？"),
    (23, 3, "品味·影视", "今年最喜欢的一部电影或剧集是什么？"),
    (24, 3, "品味·美食", "今年吃过最难忘的一顿饭是什么？"),
    (25, 3, "日常", "今年养成的一个新习惯是什么？"),
    (26, 3, "日常", "今年最值得的一笔消费是什么？"),
    (27, 3, "日常", "今年你最常用的一个App是什么？"),
    (28, 3, "爱好", "今年迷上的一个新爱好是什么？"),
    (29, 3, "日常", "今年穿得最多的一件衣服是什么？"),
    (30, 3, "氛围", "今年你最喜欢的季节或天气是怎样的？"),
    (31, 4, "未来", "明年最想实现的一个愿望是什么？"),
    (32, 4, "未来", "明年最想去的一个城市或国家是哪里？"),
    (33, 4, "未来", "明年想学会的一项技能是什么？"),
    (34, 4, "未来", "明年想改掉的一个习惯是什么？"),
    (35, 4, "寄语", "你想对明年的自己说一句什么话？"),
    (36, 4, "未来", "明年最想陪伴的人是谁？"),
    (37, 4, "未来", "明年想尝试的一件新鲜事是什么？"),
    (38, 4, "未来", "用一个词给明年定下基调。"),
    (39, 4, "未来", "今年有什么遗憾想在明年弥补？"),
    (40, 4, "结语", "最后，用一句话和这一年告别。"),
];

static STANDARD_SET: OnceLock<QuestionSet> = OnceLock::new();

impl QuestionSet {
    /// Build a set from questions, kept in the given order.
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// The built-in catalogue, constructed once per process.
    pub fn standard() -> &'static QuestionSet {
        STANDARD_SET.get_or_init(|| {
            Self::new(
                STANDARD
                    .iter()
                    .map(|&(id, part, category, text)| Question::new(id, part, category, text))
                    .collect(),
            )
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question by id.
    pub fn get(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Questions belonging to one part, in catalogue order.
    pub fn part(&self, part: u8) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.part == part)
    }

    /// Numbered reference list ("1. text") used in extraction prompts.
    pub fn reference_list(&self) -> String {
        self.questions
            .iter()
            .map(|q| format!("{}. {}", q.id, q.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_standard_catalogue_shape() {
        let set = QuestionSet::standard();
        assert_eq!(set.len(), QUESTION_COUNT as usize);

        let ids: HashSet<u32> = set.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 40);
        assert!(set.iter().all(|q| (1..=40).contains(&q.id)));
        assert!(set.iter().all(|q| (1..=4).contains(&q.part)));
    }

    #[test]
    fn test_parts_have_ten_questions_each() {
        let set = QuestionSet::standard();
        for part in 1..=4 {
            assert_eq!(set.part(part).count(), 10);
        }
    }

    #[test]
    fn test_question_five_asks_about_places() {
        let q = QuestionSet::standard().get(5).unwrap();
        assert!(q.text.contains("城市"));
        assert!(q.text.contains("国家"));
    }

    #[test]
    fn test_reference_list_is_numbered() {
        let list = QuestionSet::standard().reference_list();
        assert!(list.starts_with("1. "));
        assert!(list.contains("\n40. "));
    }
}
