//! Lazily built, shared provider handle.
//!
//! Generators hold a [`ProviderHandle`] rather than a provider. The
//! provider is constructed on first use and reused until the settings
//! change, so a missing API key surfaces as
//! [`ProviderError::NotConfigured`] on the first remote call instead of
//! at startup.

use parking_lot::RwLock;
use std::sync::Arc;

use super::{LlmProvider, ProviderError, ProviderRegistry};
use crate::config::ProviderSettings;

type Built = (ProviderSettings, Arc<dyn LlmProvider>);

pub struct ProviderHandle {
    registry: Arc<ProviderRegistry>,
    settings: RwLock<ProviderSettings>,
    cached: RwLock<Option<Built>>,
}

impl ProviderHandle {
    /// Handle over the built-in providers.
    pub fn new(settings: ProviderSettings) -> Self {
        Self::with_registry(Arc::new(ProviderRegistry::with_defaults()), settings)
    }

    pub fn with_registry(registry: Arc<ProviderRegistry>, settings: ProviderSettings) -> Self {
        Self {
            registry,
            settings: RwLock::new(settings),
            cached: RwLock::new(None),
        }
    }

    /// Handle around an already constructed provider.
    ///
    /// The provider is kept until [`update`](Self::update) changes the
    /// settings, after which the registry (empty here) is consulted.
    pub fn from_provider(provider: Arc<dyn LlmProvider>, settings: ProviderSettings) -> Self {
        Self {
            registry: Arc::new(ProviderRegistry::new()),
            cached: RwLock::new(Some((settings.clone(), provider))),
            settings: RwLock::new(settings),
        }
    }

    /// Current settings.
    pub fn settings(&self) -> ProviderSettings {
        self.settings.read().clone()
    }

    /// Replace the settings; the provider is rebuilt on next use.
    pub fn update(&self, settings: ProviderSettings) {
        *self.settings.write() = settings;
    }

    pub fn model(&self) -> String {
        self.settings.read().model.clone()
    }

    /// The provider for the current settings, building it if needed.
    pub fn provider(&self) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        let settings = self.settings();

        if let Some((built_for, provider)) = self.cached.read().as_ref() {
            if *built_for == settings {
                return Ok(Arc::clone(provider));
            }
        }

        let provider = self
            .registry
            .create(&settings.kind, &settings.factory_config())?;
        tracing::info!(
            provider = provider.name(),
            model = %settings.model,
            base_url = %settings.base_url,
            "Provider initialized"
        );

        *self.cached.write() = Some((settings, Arc::clone(&provider)));
        Ok(provider)
    }
}

impl std::fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("settings", &*self.settings.read())
            .field("built", &self.cached.read().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{
        ChatMessage, CompletionConfig, CompletionResponse, ProviderFactory, TokenUsage,
    };
    use async_trait::async_trait;
    use serde_json::Value as JsonValue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: "ok".into(),
                usage: TokenUsage::default(),
                model: config.model.clone(),
                stop_reason: None,
            })
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    struct CountingFactory {
        builds: Arc<AtomicUsize>,
    }

    impl ProviderFactory for CountingFactory {
        fn provider_type(&self) -> &'static str {
            "echo"
        }

        fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
            self.validate_config(config)?;
            self.builds.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(EchoProvider))
        }

        fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
            match config["api_key"].as_str() {
                Some(k) if !k.trim().is_empty() => Ok(()),
                _ => Err(ProviderError::NotConfigured("API key is missing".into())),
            }
        }
    }

    fn handle(api_key: Option<&str>) -> (ProviderHandle, Arc<AtomicUsize>) {
        let builds = Arc::new(AtomicUsize::new(0));
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(CountingFactory {
            builds: Arc::clone(&builds),
        }));
        let settings = ProviderSettings {
            kind: "echo".into(),
            api_key: api_key.map(String::from),
            base_url: "http://localhost:1".into(),
            model: "test-model".into(),
        };
        (ProviderHandle::with_registry(Arc::new(registry), settings), builds)
    }

    #[test]
    fn test_provider_built_once() {
        let (handle, builds) = handle(Some("k"));
        handle.provider().unwrap();
        handle.provider().unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rebuilt_when_settings_change() {
        let (handle, builds) = handle(Some("k"));
        handle.provider().unwrap();

        let mut settings = handle.settings();
        settings.base_url = "http://localhost:2".into();
        handle.update(settings);
        handle.provider().unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_key_fails_on_first_use() {
        let (handle, builds) = handle(None);
        let err = handle.provider().err().unwrap();
        assert!(err.is_configuration());
        assert_eq!(builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unknown_kind_is_configuration_error() {
        let (handle, _) = handle(Some("k"));
        let mut settings = handle.settings();
        settings.kind = "nope".into();
        handle.update(settings);
        assert!(matches!(handle.provider(), Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_from_provider_reuses_instance() {
        let handle = ProviderHandle::from_provider(Arc::new(EchoProvider), ProviderSettings::default());
        assert_eq!(handle.provider().unwrap().name(), "echo");
        assert!(!format!("{:?}", handle).contains("sk-"));
    }
}
