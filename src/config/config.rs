//! TOML configuration parsing and management.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// `[provider]`
    #[serde(default)]
    pub provider: ProviderConfig,
    /// `[execution]`
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// `[logging]`
    #[serde(default)]
    pub logging: LoggingConfig,
    /// `[plugins]`
    #[serde(default)]
    pub plugins: PluginsConfig,
}

/// Which chat-completions API flavour the provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// api.openai.com or any OpenAI-compatible endpoint
    OpenAi,
    /// Azure OpenAI deployment
    Azure,
}

impl ProviderKind {
    /// Parse the `provider.kind` config value.
    pub fn parse(kind: &str) -> Result<Self> {
        match kind.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "azure" | "azure-openai" | "azure_openai" => Ok(Self::Azure),
            other => anyhow::bail!(
                "Unknown provider kind '{}'. Supported kinds: openai, azure",
                other
            ),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => f.write_str("openai"),
            Self::Azure => f.write_str("azure"),
        }
    }
}

/// Remote model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// "openai" or "azure"
    #[serde(default = "default_provider_kind")]
    pub kind: String,
    /// Base URL (openai) or resource endpoint (azure)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key; opaque, never logged
    #[serde(default)]
    pub api_key: String,
    /// Model name, or deployment name for azure
    #[serde(default = "default_model")]
    pub model: String,
    /// Azure `api-version` query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// HTTP request timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_provider_kind() -> String {
    "openai".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_version() -> String {
    "2024-06-01".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_provider_kind(),
            endpoint: default_endpoint(),
            api_key: String::new(),
            model: default_model(),
            api_version: default_api_version(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl ProviderConfig {
    /// Parsed `kind`.
    pub fn provider_kind(&self) -> Result<ProviderKind> {
        ProviderKind::parse(&self.kind)
    }
}

/// Execution configuration for the tool loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Execute tool calls inside the kernel
    #[serde(default = "default_true")]
    pub auto_invoke_tools: bool,
    /// Tool rounds before the final tool-less request
    #[serde(default = "default_max_auto_invoke_attempts")]
    pub max_auto_invoke_attempts: u32,
    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,
    /// Completion token limit; provider default when unset
    pub max_tokens: Option<u32>,
}

fn default_true() -> bool {
    true
}

fn default_max_auto_invoke_attempts() -> u32 {
    10
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            auto_invoke_tools: true,
            max_auto_invoke_attempts: default_max_auto_invoke_attempts(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Transcript path
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// INFO, or DEBUG/TRACE to include full request JSON
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Write the markdown transcript
    #[serde(default)]
    pub enabled: bool,
}

fn default_log_file() -> String {
    std::env::temp_dir()
        .join("toolchat")
        .join(format!(
            "transcript_{}_{}.md",
            Utc::now().timestamp_millis(),
            std::process::id()
        ))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            log_level: default_log_level(),
            enabled: false,
        }
    }
}

/// Which built-in plugins the kernel registers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Register `get_weather`
    #[serde(default = "default_true")]
    pub weather: bool,
    /// Register the date and time functions
    #[serde(default = "default_true")]
    pub time: bool,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            weather: true,
            time: true,
        }
    }
}

/// Loads and manages TOML configuration.
#[derive(Debug)]
pub struct ConfigurationLoader {
    pub config_path: PathBuf,
    pub config: Configuration,
}

impl ConfigurationLoader {
    /// Initialize configuration loader.
    ///
    /// # Arguments
    /// * `config_path` - Path to TOML config file. If None or missing, uses default config.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("config/toolchat.toml"));

        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            Self::get_default_config()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Create a configuration loader from a pre-parsed Configuration.
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config_path: PathBuf::from("config/toolchat.toml"),
            config,
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Configuration> {
        toml::from_str(content).context("Failed to parse TOML config")
    }

    /// Load configuration from TOML file.
    fn load_config(path: &Path) -> Result<Configuration> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Get default configuration.
    fn get_default_config() -> Configuration {
        Configuration::default()
    }

    /// Get configuration value by dot-notation key.
    ///
    /// `provider.api_key` is deliberately not exposed.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match key {
            "provider.kind" => Some(self.config.provider.kind.clone()),
            "provider.endpoint" => Some(self.config.provider.endpoint.clone()),
            "provider.model" => Some(self.config.provider.model.clone()),
            "provider.api_version" => Some(self.config.provider.api_version.clone()),
            "logging.log_file" => Some(self.config.logging.log_file.clone()),
            "logging.log_level" => Some(self.config.logging.log_level.clone()),
            _ => None,
        }
    }

    /// Get numeric configuration value.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match key {
            "provider.timeout_seconds" => Some(self.config.provider.timeout_seconds),
            "execution.max_auto_invoke_attempts" => {
                Some(self.config.execution.max_auto_invoke_attempts as u64)
            }
            "execution.max_tokens" => self.config.execution.max_tokens.map(u64::from),
            _ => None,
        }
    }

    /// Get boolean configuration value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match key {
            "execution.auto_invoke_tools" => Some(self.config.execution.auto_invoke_tools),
            "logging.enabled" => Some(self.config.logging.enabled),
            "plugins.weather" => Some(self.config.plugins.weather),
            "plugins.time" => Some(self.config.plugins.time),
            _ => None,
        }
    }
}
