use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wellness_provider::{ProviderConfig, DEFAULT_API_BASE};

use crate::persona::DEFAULT_PERSONA_NAME;

pub const CONFIG_FILE: &str = "config.yaml";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_api_key() -> String {
    "${ANTHROPIC_API_KEY}".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_persona_name() -> String {
    DEFAULT_PERSONA_NAME.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: default_api_key(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderSettings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn to_provider_config(&self) -> ProviderConfig {
        let mut config = ProviderConfig::new()
            .with_base_url(self.api_base.clone())
            .with_timeout_secs(self.timeout_secs);
        if self.has_api_key() {
            config = config.with_api_key(self.api_key.clone());
        }
        config
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default = "default_persona_name")]
    pub name: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: default_persona_name(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WellnessConfig {
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub persona: PersonaConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("provider.api_base must not be empty")]
    EmptyApiBase,
    #[error("provider.model must not be empty")]
    EmptyModel,
    #[error("provider.max_tokens must be greater than zero")]
    ZeroMaxTokens,
    #[error("provider.timeout_secs must be greater than zero")]
    ZeroTimeout,
}

pub fn resolve_env_var(raw: &str) -> String {
    let mut output = String::new();
    let mut rest = raw;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);

        let candidate = &rest[start + 2..];
        let Some(end) = candidate.find('}') else {
            output.push_str(&rest[start..]);
            return output;
        };

        let key = &candidate[..end];
        output.push_str(&std::env::var(key).unwrap_or_default());
        rest = &candidate[end + 1..];
    }

    output.push_str(rest);
    output
}

/// Loads `<root>/config.yaml`. A missing file yields the defaults.
pub fn load_config(root: &Path) -> Result<WellnessConfig> {
    let path = root.join(CONFIG_FILE);
    let mut config = if path.exists() {
        read_yaml_file::<WellnessConfig>(&path)?
    } else {
        tracing::debug!("no config file at {}, using defaults", path.display());
        WellnessConfig::default()
    };

    resolve_config_env(&mut config);
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &WellnessConfig) -> std::result::Result<(), ConfigError> {
    let provider = &config.provider;
    if provider.api_base.trim().is_empty() {
        return Err(ConfigError::EmptyApiBase);
    }
    if provider.model.trim().is_empty() {
        return Err(ConfigError::EmptyModel);
    }
    if provider.max_tokens == 0 {
        return Err(ConfigError::ZeroMaxTokens);
    }
    if provider.timeout_secs == 0 {
        return Err(ConfigError::ZeroTimeout);
    }
    Ok(())
}

fn read_yaml_file<T>(path: &Path) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse yaml file: {}", path.display()))
}

fn resolve_config_env(config: &mut WellnessConfig) {
    let provider = &mut config.provider;
    provider.api_base = resolve_env_var(&provider.api_base);
    provider.api_key = resolve_env_var(&provider.api_key);
    provider.model = resolve_env_var(&provider.model);
    config.persona.name = resolve_env_var(&config.persona.name);
}
