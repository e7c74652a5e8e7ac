use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use wellness_provider::{create_provider, LlmProvider, LlmRequest};

use crate::config::WellnessConfig;
use crate::fallback::fallback_reply;
use crate::persona::Persona;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Remote,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

/// Turns a user message into a reply. Tries the completion endpoint once and
/// falls back to the offline rule table on any failure.
#[derive(Clone)]
pub struct ResponseResolver {
    provider: Option<Arc<dyn LlmProvider>>,
    model: String,
    max_tokens: u32,
    system_prompt: String,
    timeout: Duration,
}

impl ResponseResolver {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, persona: &Persona) -> Self {
        let defaults = crate::config::ProviderSettings::default();
        Self {
            provider,
            model: defaults.model,
            max_tokens: defaults.max_tokens,
            system_prompt: persona.system_prompt.clone(),
            timeout: Duration::from_secs(defaults.timeout_secs),
        }
    }

    /// Builds the remote provider from config. Without a usable API key the
    /// resolver runs offline only.
    pub fn from_config(config: &WellnessConfig, persona: &Persona) -> Self {
        let settings = &config.provider;
        let provider = match create_provider(&settings.to_provider_config()) {
            Ok(provider) => Some(provider),
            Err(e) => {
                tracing::warn!("remote replies disabled: {e}");
                None
            }
        };

        Self::new(provider, persona)
            .with_model(settings.model.clone())
            .with_max_tokens(settings.max_tokens)
            .with_timeout(Duration::from_secs(settings.timeout_secs))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_online(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn resolve(&self, text: &str) -> Reply {
        match self.request_completion(text).await {
            Ok(reply) => Reply {
                text: reply,
                source: ReplySource::Remote,
            },
            Err(e) => {
                tracing::warn!(error = %e, "completion unavailable, replying offline");
                Reply {
                    text: fallback_reply(text),
                    source: ReplySource::Offline,
                }
            }
        }
    }

    async fn request_completion(&self, text: &str) -> Result<String> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| anyhow!("no api key configured"))?;
        let request = LlmRequest::simple(
            self.model.clone(),
            Some(self.system_prompt.clone()),
            text.to_string(),
        )
        .with_max_tokens(self.max_tokens);

        let response = tokio::time::timeout(self.timeout, provider.chat(request))
            .await
            .map_err(|_| anyhow!("completion timed out after {}s", self.timeout.as_secs()))??;

        if response.text.is_empty() {
            bail!("completion returned empty text");
        }
        tracing::debug!(
            output_tokens = response.output_tokens,
            "completion received"
        );
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{Category, OFFLINE_NOTICE};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use wellness_provider::{LlmResponse, StubProvider};

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn chat(&self, _request: LlmRequest) -> Result<LlmResponse> {
            bail!("connection refused")
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl LlmProvider for HangingProvider {
        async fn chat(&self, _request: LlmRequest) -> Result<LlmResponse> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct RecordingProvider {
        seen: Mutex<Vec<LlmRequest>>,
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        async fn chat(&self, request: LlmRequest) -> Result<LlmResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(LlmResponse {
                text: "You're not alone in this.".into(),
                input_tokens: None,
                output_tokens: Some(7),
                stop_reason: Some("end_turn".into()),
            })
        }
    }

    #[tokio::test]
    async fn remote_text_is_returned_verbatim() {
        let provider: Arc<dyn LlmProvider> = Arc::new(StubProvider);
        let resolver = ResponseResolver::new(Some(provider), &Persona::default())
            .with_model("test-model");
        let reply = resolver.resolve("hello").await;
        assert_eq!(reply.text, "[stub:test-model] hello");
        assert_eq!(reply.source, ReplySource::Remote);
    }

    #[tokio::test]
    async fn request_carries_persona_and_single_user_message() {
        let provider = Arc::new(RecordingProvider::default());
        let shared: Arc<dyn LlmProvider> = provider.clone();
        let persona = Persona::builtin("Sunny");
        let resolver = ResponseResolver::new(Some(shared), &persona).with_max_tokens(256);

        resolver.resolve("I had a rough day").await;

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.system.as_deref(), Some(persona.system_prompt.as_str()));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
        assert_eq!(request.messages[0].content, "I had a rough day");
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.model, "claude-sonnet-4-20250514");
    }

    #[tokio::test]
    async fn provider_error_falls_back() {
        let provider: Arc<dyn LlmProvider> = Arc::new(FailingProvider);
        let resolver = ResponseResolver::new(Some(provider), &Persona::default());
        let reply = resolver.resolve("I feel so anxious about tomorrow").await;
        assert_eq!(
            reply.text,
            format!("{}{}", Category::Anxiety.reply(), OFFLINE_NOTICE)
        );
        assert_eq!(reply.source, ReplySource::Offline);
    }

    #[tokio::test]
    async fn missing_provider_falls_back() {
        let resolver = ResponseResolver::new(None, &Persona::default());
        assert!(!resolver.is_online());
        let reply = resolver.resolve("What time is it?").await;
        assert_eq!(reply.source, ReplySource::Offline);
        assert!(reply.text.ends_with(OFFLINE_NOTICE));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_request_times_out_into_fallback() {
        let provider: Arc<dyn LlmProvider> = Arc::new(HangingProvider);
        let resolver = ResponseResolver::new(Some(provider), &Persona::default())
            .with_timeout(Duration::from_secs(5));
        let reply = resolver.resolve("so tired").await;
        assert_eq!(reply.source, ReplySource::Offline);
        assert!(reply.text.starts_with(Category::Fatigue.reply()));
    }

    #[test]
    fn from_config_without_key_is_offline() {
        let mut config = WellnessConfig::default();
        config.provider.api_key = String::new();
        let resolver = ResponseResolver::from_config(&config, &Persona::default());
        assert!(!resolver.is_online());
    }

    #[test]
    fn from_config_with_key_is_online() {
        let mut config = WellnessConfig::default();
        config.provider.api_key = "sk-test".into();
        config.provider.model = "claude-test".into();
        let resolver = ResponseResolver::from_config(&config, &Persona::default());
        assert!(resolver.is_online());
        assert_eq!(resolver.model, "claude-test");
    }
}
