//! Year summary data model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cards in every summary.
pub const CARD_COUNT: usize = 4;

/// Visual treatment of a memory card on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    Ticket,
    Paper,
    Polaroid,
    Note,
}

impl CardStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStyle::Ticket => "ticket",
            CardStyle::Paper => "paper",
            CardStyle::Polaroid => "polaroid",
            CardStyle::Note => "note",
        }
    }
}

impl fmt::Display for CardStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One themed narrative fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCard {
    /// Short, evocative title
    pub title: String,

    /// One paragraph of narrative
    pub content: String,

    /// Single English word
    pub keyword: String,

    pub style: CardStyle,
}

/// Complete structured output of the summary pipeline.
///
/// Either generator produces this atomically; a partially filled summary
/// never reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    /// Exactly four cards (journey, emotions, tastes, future by convention)
    pub cards: Vec<SummaryCard>,

    /// 5-8 short keyword strings
    pub visual_tags: Vec<String>,

    /// Short multi-line verse
    pub poem: String,

    /// Roughly 100 words of prose
    pub analysis: String,

    /// Single theme word
    pub keyword: String,

    /// Spirit animal
    pub animal: String,
}

impl YearSummary {
    /// Serialize to the wire representation used by the board.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn card(&self, style: CardStyle) -> Option<&SummaryCard> {
        self.cards.iter().find(|c| c.style == style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> YearSummary {
        YearSummary {
            cards: vec![SummaryCard {
                title: "山海为径".to_string(),
                content: "今年去了大理。".to_string(),
                keyword: "GROWTH".to_string(),
                style: CardStyle::Ticket,
            }],
            visual_tags: vec!["大理".to_string()],
            poem: "风\n花\n雪\n月".to_string(),
            analysis: "一段分析。".to_string(),
            keyword: "DALI".to_string(),
            animal: "鲸鱼".to_string(),
        }
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("visualTags").is_some());
        assert!(value.get("visual_tags").is_none());
        assert_eq!(value["cards"][0]["style"], "ticket");
    }

    #[test]
    fn test_serialize_then_parse_is_identity() {
        let summary = sample();
        let json = summary.to_json().unwrap();
        let back: YearSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn test_unknown_style_rejected() {
        let err = serde_json::from_str::<CardStyle>(r#""sticker""#);
        assert!(err.is_err());
    }
}
