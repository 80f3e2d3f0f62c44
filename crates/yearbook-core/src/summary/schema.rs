//! JSON Schema contracts for structured model output.
//!
//! These documents are the full contract. Summaries are compiled and
//! checked locally at the boundary before they are accepted; providers
//! may send the model a reduced form their structured-output mode
//! accepts, so the length and count bounds are only enforced here.

use serde_json::Value;
use std::sync::OnceLock;

use super::SummaryError;

/// Schema name used in the structured-output request.
pub const YEAR_SUMMARY_SCHEMA_NAME: &str = "year_summary";

/// Schema name used in the extraction request.
pub const ANSWER_LIST_SCHEMA_NAME: &str = "extracted_answers";

const YEAR_SUMMARY_SCHEMA_JSON: &str = include_str!("../../schemas/year_summary.schema.json");
const ANSWER_LIST_SCHEMA_JSON: &str = include_str!("../../schemas/answer_list.schema.json");

static YEAR_SUMMARY_SCHEMA: OnceLock<Value> = OnceLock::new();
static ANSWER_LIST_SCHEMA: OnceLock<Value> = OnceLock::new();

/// Compiled validator (initialized once, reused).
static COMPILED_SUMMARY_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

fn parse_embedded(source: &str) -> Value {
    // Embedded at compile time and covered by tests; Null only if the file is corrupt.
    serde_json::from_str(source).unwrap_or(Value::Null)
}

/// The YearSummary output schema.
pub fn year_summary_schema() -> &'static Value {
    YEAR_SUMMARY_SCHEMA.get_or_init(|| parse_embedded(YEAR_SUMMARY_SCHEMA_JSON))
}

/// The `{answers: [{id, answer}]}` extraction schema.
pub fn answer_list_schema() -> &'static Value {
    ANSWER_LIST_SCHEMA.get_or_init(|| parse_embedded(ANSWER_LIST_SCHEMA_JSON))
}

fn get_validator() -> Result<&'static jsonschema::Validator, SummaryError> {
    let result = COMPILED_SUMMARY_SCHEMA.get_or_init(|| {
        jsonschema::options()
            .build(year_summary_schema())
            .map_err(|e| format!("Failed to compile summary schema: {}", e))
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SummaryError::Schema(e.clone())),
    }
}

/// Validate a summary JSON value against the schema.
///
/// Returns every violation, each with its instance path.
pub fn validate_summary_schema(value: &Value) -> Result<(), SummaryError> {
    let validator = get_validator()?;

    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SummaryError::SchemaViolation(errors))
    }
}
