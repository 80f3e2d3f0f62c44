//! Remote summary generation.
//!
//! One chat-completion call constrained by the year summary JSON Schema.
//! The response is accepted only if it parses and validates; anything
//! else is a [`GenerationError`] and the caller decides what to show.

use std::sync::Arc;
use std::time::Instant;

use yearbook_core::summary::{year_summary_schema, YEAR_SUMMARY_SCHEMA_NAME};
use yearbook_core::{AnswerStore, QuestionSet, YearSummary};

use crate::config::CallSettings;
use crate::prompts::{summary_prompt, SUMMARY_SYSTEM_PROMPT};
use crate::providers::{ChatMessage, ProviderHandle, ResponseSchema};
use crate::GenerationError;

pub struct RemoteSummaryGenerator {
    handle: Arc<ProviderHandle>,
    call: CallSettings,
}

impl RemoteSummaryGenerator {
    pub fn new(handle: Arc<ProviderHandle>, call: CallSettings) -> Self {
        Self { handle, call }
    }

    pub fn call_settings(&self) -> &CallSettings {
        &self.call
    }

    /// Ask the model for a summary of this session.
    pub async fn generate(
        &self,
        answers: &AnswerStore,
        questions: &QuestionSet,
    ) -> Result<YearSummary, GenerationError> {
        let provider = self.handle.provider()?;
        let model = self.handle.model();

        let config = self
            .call
            .completion(&model)
            .with_response_schema(ResponseSchema::new(
                YEAR_SUMMARY_SCHEMA_NAME,
                year_summary_schema().clone(),
            ));
        let payload = summary_prompt(questions, answers);
        tracing::debug!(
            estimated_tokens = provider.estimate_tokens(&payload),
            answered = answers.answered_count(),
            "Requesting remote summary"
        );
        let messages = vec![
            ChatMessage::system(SUMMARY_SYSTEM_PROMPT.trim()),
            ChatMessage::user(payload),
        ];

        let started = Instant::now();
        let response = provider.complete(messages, &config).await?;

        tracing::info!(
            provider = provider.name(),
            model = %response.model,
            call = "summary",
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Remote summary received"
        );

        YearSummary::from_model_output(&response.content).map_err(|e| {
            tracing::warn!(error = %e, "Remote summary rejected");
            GenerationError::InvalidSummary(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderSettings;
    use crate::providers::{
        CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::time::Duration;

    const VALID_SUMMARY: &str = r#"```json
{
  "cards": [
    {"title": "山海为径", "content": "今年去了大理。", "keyword": "GROWTH", "style": "ticket"},
    {"title": "心有微光", "content": "哭过也笑过。", "keyword": "EMOTIONS", "style": "paper"},
    {"title": "人间滋味", "content": "循环一首歌。", "keyword": "TASTES", "style": "note"},
    {"title": "未来可期", "content": "明年去冰岛。", "keyword": "FUTURE", "style": "polaroid"}
  ],
  "visualTags": ["大理", "洱海", "晚风", "Jazz", "冰岛"],
  "poem": "风吹过洱海\n你走过四季\n把心事写进歌里\n明年再见",
  "analysis": "这是充满探索的一年。",
  "keyword": "EXPLORE",
  "animal": "鲸鱼"
}
```"#;

    /// Replies with fixed text and records the config it was called with.
    struct ScriptedProvider {
        reply: Result<String, ()>,
        seen: Mutex<Option<CompletionConfig>>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            *self.seen.lock() = Some(config.clone());
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    content: text.clone(),
                    usage: TokenUsage {
                        prompt_tokens: 900,
                        completion_tokens: 400,
                    },
                    model: config.model.clone(),
                    stop_reason: Some("stop".into()),
                }),
                Err(()) => Err(ProviderError::HttpError("connection refused".into())),
            }
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn generator(reply: Result<&str, ()>) -> (RemoteSummaryGenerator, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider {
            reply: reply.map(String::from),
            seen: Mutex::new(None),
        });
        let handle = ProviderHandle::from_provider(provider.clone(), ProviderSettings::default());
        let call = CallSettings::new(0.8, 2048, Duration::from_secs(5));
        (RemoteSummaryGenerator::new(Arc::new(handle), call), provider)
    }

    #[tokio::test]
    async fn test_fenced_valid_output_accepted() {
        let (remote, provider) = generator(Ok(VALID_SUMMARY));
        let answers = AnswerStore::from([(5, "大理")]);

        let summary = remote.generate(&answers, QuestionSet::standard()).await.unwrap();
        assert_eq!(summary.cards.len(), 4);
        assert_eq!(summary.animal, "鲸鱼");

        let seen = provider.seen.lock().clone().unwrap();
        let schema = seen.response_schema.unwrap();
        assert_eq!(schema.name, YEAR_SUMMARY_SCHEMA_NAME);
        assert_eq!(seen.max_tokens, 2048);
    }

    #[tokio::test]
    async fn test_malformed_json_is_error() {
        let (remote, _) = generator(Ok("{\"cards\": [oops"));
        let err = remote
            .generate(&AnswerStore::new(), QuestionSet::standard())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidSummary(_)));
    }

    #[tokio::test]
    async fn test_schema_violation_is_error() {
        let (remote, _) = generator(Ok(r#"{"cards": [], "visualTags": [], "poem": "", "analysis": "", "keyword": "", "animal": ""}"#));
        let err = remote
            .generate(&AnswerStore::new(), QuestionSet::standard())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidSummary(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_error() {
        let (remote, _) = generator(Err(()));
        let err = remote
            .generate(&AnswerStore::new(), QuestionSet::standard())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Provider(ProviderError::HttpError(_))));
    }
}
