//! Year summary contracts.
//!
//! Model output is untrusted text. It becomes a [`YearSummary`] only after
//! code-fence stripping, JSON parsing and schema validation all succeed;
//! no field-level repair is attempted.

mod schema;
mod types;

pub use schema::{
    answer_list_schema, validate_summary_schema, year_summary_schema,
    ANSWER_LIST_SCHEMA_NAME, YEAR_SUMMARY_SCHEMA_NAME,
};
pub use types::{CardStyle, SummaryCard, YearSummary, CARD_COUNT};

use thiserror::Error;

/// Errors from turning model output into a summary.
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Model output was empty")]
    EmptyOutput,

    #[error("Model output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model output violates the summary schema: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),

    #[error("Failed to load schema: {0}")]
    Schema(String),
}

/// Remove a surrounding markdown code fence (```json ... ``` or ``` ... ```).
pub fn strip_code_fences(raw: &str) -> &str {
    let s = raw.trim();
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    // Drop the info string ("json", "JSON", ...) up to the first newline.
    let body = match rest.find('\n') {
        Some(pos) if rest[..pos].chars().all(|c| c.is_ascii_alphanumeric()) => &rest[pos + 1..],
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim().strip_suffix("```").unwrap_or(body).trim()
}

impl YearSummary {
    /// Parse raw model text into a validated summary.
    pub fn from_model_output(raw: &str) -> Result<Self, SummaryError> {
        let text = strip_code_fences(raw);
        if text.is_empty() {
            return Err(SummaryError::EmptyOutput);
        }

        let value: serde_json::Value = serde_json::from_str(text)?;
        validate_summary_schema(&value)?;
        Ok(serde_json::from_value(value)?)
    }
}
