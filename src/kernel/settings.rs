//! Prompt execution settings and per-request options.

use crate::config::ExecutionConfig;
use crate::provider::GenerateConfig;
use tokio_util::sync::CancellationToken;

/// Default cap on tool rounds per request.
pub const DEFAULT_MAX_AUTO_INVOKE_ATTEMPTS: u32 = 10;

/// How the kernel executes a chat request.
///
/// Fixed when a chat client is constructed and reused for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSettings {
    /// Resolve tool calls inside the kernel and return only the final answer
    pub auto_invoke_tools: bool,
    /// Tool rounds before a final request is made without tools
    pub max_auto_invoke_attempts: u32,
    /// Model or deployment override (None = provider default)
    pub model: Option<String>,
    /// Sampling temperature override
    pub temperature: Option<f32>,
    /// Completion length override
    pub max_tokens: Option<u32>,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            auto_invoke_tools: true,
            max_auto_invoke_attempts: DEFAULT_MAX_AUTO_INVOKE_ATTEMPTS,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl ExecutionSettings {
    /// Settings with automatic tool invocation enabled
    pub fn auto_invoke() -> Self {
        Self::default()
    }

    /// Settings that advertise tools but hand tool calls back to the caller
    pub fn manual() -> Self {
        Self {
            auto_invoke_tools: false,
            ..Self::default()
        }
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the tool round cap
    pub fn with_max_auto_invoke_attempts(mut self, attempts: u32) -> Self {
        self.max_auto_invoke_attempts = attempts;
        self
    }

    /// Provider config for one request, without tools.
    pub fn generate_config(&self) -> GenerateConfig {
        let mut config = GenerateConfig::new();
        if let Some(ref model) = self.model {
            config = config.with_model(model.clone());
        }
        if let Some(temperature) = self.temperature {
            config = config.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            config = config.with_max_tokens(max_tokens);
        }
        config
    }
}

impl ExecutionConfig {
    /// Convert the `[execution]` config section into kernel settings.
    pub fn to_settings(&self) -> ExecutionSettings {
        ExecutionSettings {
            auto_invoke_tools: self.auto_invoke_tools,
            max_auto_invoke_attempts: self.max_auto_invoke_attempts,
            model: None,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Request-scoped options.
#[derive(Debug, Clone, Default)]
pub struct KernelRequest {
    /// Restrict advertised tools to these names (None = every registered tool)
    pub tools: Option<Vec<String>>,
    /// Cooperative cancellation
    pub cancellation: Option<CancellationToken>,
}

impl KernelRequest {
    /// Request with no tool filter and no cancellation
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict advertised tools
    pub fn with_tools<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Whether the caller has cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map_or(false, CancellationToken::is_cancelled)
    }

    /// The caller's token, or a fresh one that is never cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone().unwrap_or_else(CancellationToken::new)
    }
}

/// The caller cancelled the request before it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request cancelled")]
pub struct RequestCancelled;
