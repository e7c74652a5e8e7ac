pub mod anthropic;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use anthropic::{AnthropicProvider, ProviderErrorKind, ResponseDecodeError};
pub use types::*;

pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat(&self, request: LlmRequest) -> Result<LlmResponse>;
}

// ============================================================
// Provider Configuration
// ============================================================

/// Connection settings for the completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; a missing or blank key means no remote provider can be built
    #[serde(default)]
    pub api_key: Option<String>,
    /// Custom base URL (defaults to the public Anthropic endpoint)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout_secs: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a provider from configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>> {
    let key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| anyhow!("anthropic requires api_key"))?;
    let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_API_BASE);

    let mut provider = AnthropicProvider::new(key, base_url);
    if let Some(secs) = config.timeout_secs {
        provider = provider.with_timeout(Duration::from_secs(secs));
    }
    tracing::info!("Configured anthropic provider at {}", base_url);
    Ok(Arc::new(provider))
}

/// Echoes the last user message back; used where no network is wanted.
pub struct StubProvider;

#[async_trait]
impl LlmProvider for StubProvider {
    async fn chat(&self, request: LlmRequest) -> Result<LlmResponse> {
        let user_text = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(LlmResponse {
            text: format!("[stub:{}] {}", request.model, user_text),
            input_tokens: None,
            output_tokens: None,
            stop_reason: Some("end_turn".into()),
        })
    }
}
