//! Answer recovery from uploaded documents.
//!
//! | Upload            | Path                                                  |
//! |-------------------|-------------------------------------------------------|
//! | `text/*`          | Local numbered parse, then total capture (no network) |
//! | `image/*`         | Remote, image attached as a data URL                  |
//! | `application/pdf` | Remote, file attached as a data URL                   |
//! | other             | Remote, decoded text excerpt in the prompt            |
//!
//! When the remote call fails, text that decoded cleanly as UTF-8 is
//! captured whole under question 1. Only when that also yields nothing
//! does [`ExtractionError::NoAnswersRecovered`] reach the caller.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Instant;

use yearbook_core::summary::{answer_list_schema, ANSWER_LIST_SCHEMA_NAME};
use yearbook_core::{
    answers_from_text, collect_answers, strip_code_fences, total_capture, AnswerStore,
    DuplicateIdPolicy, MimeClass, QuestionSet,
};

use crate::config::CallSettings;
use crate::prompts::{extraction_prompt, EXTRACTION_SYSTEM_PROMPT};
use crate::providers::{ChatMessage, ProviderError, ProviderHandle, ResponseSchema};
use crate::resilience::{CircuitBreaker, RemoteCall};
use crate::ExtractionError;

const PDF_MIME: &str = "application/pdf";

pub struct DocumentAnswerExtractor {
    handle: Arc<ProviderHandle>,
    call: CallSettings,
    questions: QuestionSet,
    policy: DuplicateIdPolicy,
    breaker: Option<Arc<CircuitBreaker>>,
}

impl DocumentAnswerExtractor {
    /// Extractor over the standard questionnaire.
    pub fn new(handle: Arc<ProviderHandle>, call: CallSettings) -> Self {
        Self {
            handle,
            call,
            questions: QuestionSet::standard().clone(),
            policy: DuplicateIdPolicy::default(),
            breaker: None,
        }
    }

    pub fn with_questions(mut self, questions: QuestionSet) -> Self {
        self.questions = questions;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicateIdPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_circuit_breaker(mut self, breaker: Arc<CircuitBreaker>) -> Self {
        self.breaker = Some(breaker);
        self
    }

    /// Recover answers from a base64 payload of the given mime type.
    pub async fn extract(
        &self,
        file_base64: &str,
        mime_type: &str,
    ) -> Result<AnswerStore, ExtractionError> {
        let bytes = STANDARD.decode(file_base64.trim())?;
        let class = MimeClass::from_mime(mime_type);
        tracing::debug!(mime = mime_type, ?class, bytes = bytes.len(), "Extracting answers");

        if class == MimeClass::PlainText {
            let text = String::from_utf8(bytes).map_err(|_| ExtractionError::NoAnswersRecovered {
                cause: Some("text document is not valid UTF-8".into()),
            })?;
            return answers_from_text(&text, &self.questions, self.policy).map_err(|e| {
                ExtractionError::NoAnswersRecovered {
                    cause: Some(e.to_string()),
                }
            });
        }

        // Only clean UTF-8 is trusted for local capture; binary formats are
        // still excerpted (lossily) for the model.
        let local_text = match class {
            MimeClass::Image => None,
            _ => std::str::from_utf8(&bytes).ok().map(str::to_string),
        };

        let cause = if self.circuit_open() {
            tracing::warn!("Extraction circuit open, skipping remote call");
            Some("extraction circuit is open".to_string())
        } else {
            match self.remote(&bytes, mime_type, class).await {
                Ok(store) if !store.is_empty() => return Ok(store),
                Ok(_) => None,
                Err(e) => Some(e.to_string()),
            }
        };

        let captured = local_text.as_deref().map(total_capture).unwrap_or_default();
        if captured.is_empty() {
            tracing::warn!(cause = cause.as_deref().unwrap_or("empty result"), "No answers recovered");
            return Err(ExtractionError::NoAnswersRecovered { cause });
        }
        tracing::warn!(
            cause = cause.as_deref().unwrap_or("empty result"),
            "Remote extraction unusable, captured whole text under question 1"
        );
        Ok(captured)
    }

    fn circuit_open(&self) -> bool {
        self.breaker
            .as_ref()
            .is_some_and(|b| b.is_open(RemoteCall::Extraction))
    }

    /// Remote call with breaker bookkeeping.
    async fn remote(
        &self,
        bytes: &[u8],
        mime_type: &str,
        class: MimeClass,
    ) -> Result<AnswerStore, ProviderError> {
        let result = self.call_remote(bytes, mime_type, class).await;
        if let Some(breaker) = &self.breaker {
            match &result {
                Ok(_) => breaker.record_success(RemoteCall::Extraction),
                Err(e) if !e.is_configuration() => breaker.record_failure(RemoteCall::Extraction),
                Err(_) => {}
            }
        }
        result
    }

    async fn call_remote(
        &self,
        bytes: &[u8],
        mime_type: &str,
        class: MimeClass,
    ) -> Result<AnswerStore, ProviderError> {
        let provider = self.handle.provider()?;
        let model = self.handle.model();

        let user = match class {
            MimeClass::Image => ChatMessage::user(extraction_prompt(&self.questions, None))
                .with_attachment(mime_type.trim(), STANDARD.encode(bytes)),
            MimeClass::Pdf => ChatMessage::user(extraction_prompt(&self.questions, None))
                .with_attachment(PDF_MIME, STANDARD.encode(bytes)),
            _ => {
                let excerpt = String::from_utf8_lossy(bytes);
                ChatMessage::user(extraction_prompt(&self.questions, Some(&*excerpt)))
            }
        };
        let messages = vec![ChatMessage::system(EXTRACTION_SYSTEM_PROMPT.trim()), user];
        let config = self.call.completion(&model).with_response_schema(ResponseSchema::new(
            ANSWER_LIST_SCHEMA_NAME,
            answer_list_schema().clone(),
        ));

        let started = Instant::now();
        let response = provider.complete(messages, &config).await?;
        tracing::info!(
            provider = provider.name(),
            model = %response.model,
            call = "extraction",
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Remote extraction received"
        );

        let entries = parse_answer_list(&response.content)?;
        Ok(collect_answers(entries, &self.questions, self.policy))
    }
}

/// Parse `{"answers": [{id, answer}]}` (a bare array is also accepted).
///
/// Items without a usable id or answer are dropped, not fatal.
fn parse_answer_list(raw: &str) -> Result<Vec<(u32, String)>, ProviderError> {
    let value: JsonValue = serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| ProviderError::ParseError(e.to_string()))?;

    let items = match &value {
        JsonValue::Array(items) => items,
        JsonValue::Object(map) => match map.get("answers") {
            Some(JsonValue::Array(items)) => items,
            _ => return Err(ProviderError::ParseError("missing 'answers' array".into())),
        },
        _ => return Err(ProviderError::ParseError("expected an object or array".into())),
    };

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match (item_id(&item["id"]), item["answer"].as_str()) {
            (Some(id), Some(answer)) => entries.push((id, answer.to_string())),
            _ => tracing::warn!(index, "Dropping extraction item without id or answer"),
        }
    }
    Ok(entries)
}

fn item_id(value: &JsonValue) -> Option<u32> {
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|id| u32::try_from(id).ok()),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
