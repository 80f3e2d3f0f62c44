//! Writing hints for a question the user is stuck on.
//!
//! [`InspirationGenerator::hint`] never fails: any remote problem (no key,
//! transport error, timeout, open circuit, blank reply) yields a static hint.

use std::sync::Arc;
use std::time::Instant;

use yearbook_core::Question;

use crate::config::CallSettings;
use crate::prompts::{hint_prompt, static_hint, HINT_SYSTEM_PROMPT};
use crate::providers::{ChatMessage, ProviderError, ProviderHandle};
use crate::resilience::{CircuitBreaker, RemoteCall};

const QUOTE_CHARS: [char; 8] = ['"', '\'', '“', '”', '‘', '’', '「', '」'];

pub struct InspirationGenerator {
    handle: Arc<ProviderHandle>,
    call: CallSettings,
    breaker: Option<Arc<CircuitBreaker>>,
}

impl InspirationGenerator {
    pub fn new(handle: Arc<ProviderHandle>, call: CallSettings) -> Self {
        Self {
            handle,
            call,
            breaker: None,
        }
    }

    pub fn with_circuit_breaker(mut self, breaker: Arc<CircuitBreaker>) -> Self {
        self.breaker = Some(breaker);
        self
    }

    /// A short hint for `question`.
    pub async fn hint(&self, question: &Question) -> String {
        if let Some(breaker) = &self.breaker {
            if breaker.is_open(RemoteCall::Inspiration) {
                return static_hint(question).to_string();
            }
        }

        let result = match tokio::time::timeout(self.call.timeout, self.remote(question)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.call.timeout)),
        };

        if let Some(breaker) = &self.breaker {
            match &result {
                Ok(_) => breaker.record_success(RemoteCall::Inspiration),
                Err(e) if !e.is_configuration() => breaker.record_failure(RemoteCall::Inspiration),
                Err(_) => {}
            }
        }

        match result {
            Ok(hint) => hint,
            Err(e) => {
                tracing::warn!(question = question.id, error = %e, "Hint unavailable, using static hint");
                static_hint(question).to_string()
            }
        }
    }

    async fn remote(&self, question: &Question) -> Result<String, ProviderError> {
        let provider = self.handle.provider()?;
        let model = self.handle.model();
        let config = self.call.completion(&model);
        let messages = vec![
            ChatMessage::system(HINT_SYSTEM_PROMPT.trim()),
            ChatMessage::user(hint_prompt(question)),
        ];

        let started = Instant::now();
        let response = provider.complete(messages, &config).await?;
        tracing::debug!(
            provider = provider.name(),
            model = %response.model,
            call = "inspiration",
            completion_tokens = response.usage.completion_tokens,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Hint received"
        );

        let hint = strip_quotes(&response.content);
        if hint.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(hint)
    }
}

/// Remove quote characters anywhere in the text, then trim.
fn strip_quotes(text: &str) -> String {
    text.chars()
        .filter(|c| !QUOTE_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderSettings;
    use crate::providers::{CompletionConfig, CompletionResponse, LlmProvider, TokenUsage};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use yearbook_core::QuestionSet;

    enum Reply {
        Text(&'static str),
        Fail,
        Hang,
    }

    struct ScriptedProvider {
        reply: Reply,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Text(text) => Ok(CompletionResponse {
                    content: text.to_string(),
                    usage: TokenUsage::default(),
                    model: config.model.clone(),
                    stop_reason: None,
                }),
                Reply::Fail => Err(ProviderError::HttpError("unreachable".into())),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(ProviderError::EmptyResponse)
                }
            }
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn generator(reply: Reply) -> (InspirationGenerator, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider {
            reply,
            calls: AtomicUsize::new(0),
        });
        let handle = ProviderHandle::from_provider(provider.clone(), ProviderSettings::default());
        let call = CallSettings::new(0.9, 120, Duration::from_secs(2));
        (InspirationGenerator::new(Arc::new(handle), call), provider)
    }

    fn question() -> &'static Question {
        QuestionSet::standard().get(5).unwrap()
    }

    #[tokio::test]
    async fn test_quotes_stripped() {
        let (hints, _) = generator(Reply::Text("  “想想你拍过最多照片的城市”\n"));
        assert_eq!(hints.hint(question()).await, "想想你拍过最多照片的城市");
    }

    #[tokio::test]
    async fn test_failure_uses_static_hint() {
        let (hints, _) = generator(Reply::Fail);
        assert_eq!(hints.hint(question()).await, static_hint(question()));
    }

    #[tokio::test]
    async fn test_blank_reply_uses_static_hint() {
        let (hints, _) = generator(Reply::Text("\"\""));
        assert_eq!(hints.hint(question()).await, static_hint(question()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_uses_static_hint() {
        let (hints, _) = generator(Reply::Hang);
        assert_eq!(hints.hint(question()).await, static_hint(question()));
    }

    #[tokio::test]
    async fn test_open_circuit_skips_remote() {
        let breaker = Arc::new(CircuitBreaker::default());
        let (hints, provider) = generator(Reply::Fail);
        let hints = hints.with_circuit_breaker(breaker);

        for _ in 0..3 {
            hints.hint(question()).await;
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);

        hints.hint(question()).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }
}
