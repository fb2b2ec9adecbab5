//! Per-request generation options passed to a provider.

use crate::provider::types::tools::{InternalToolDefinition, ToolChoice};
use serde::{Deserialize, Serialize};

/// Configuration for a generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Model or deployment (None = provider default)
    pub model: Option<String>,
    /// Sampling temperature (0.0 = deterministic, 2.0 = very random)
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Tools advertised to the model for this request
    pub tools: Option<Vec<InternalToolDefinition>>,
    /// Tool choice strategy
    pub tool_choice: Option<ToolChoice>,
    /// Whether the response is streamed
    pub enable_streaming: bool,
}

impl GenerateConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            model: None,
            temperature: 0.7,
            max_tokens: Some(4000),
            tools: None,
            tool_choice: None,
            enable_streaming: false,
        }
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Advertise tools with `auto` tool choice.
    ///
    /// An empty list clears both tools and tool choice: providers reject a
    /// tool choice without tools.
    pub fn with_tools(mut self, tools: Vec<InternalToolDefinition>) -> Self {
        if tools.is_empty() {
            self.tools = None;
            self.tool_choice = None;
        } else {
            self.tools = Some(tools);
            self.tool_choice = Some(ToolChoice::Auto);
        }
        self
    }

    /// Remove all tools from the request.
    pub fn without_tools(mut self) -> Self {
        self.tools = None;
        self.tool_choice = None;
        self
    }

    /// Set tool choice
    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    /// Enable streaming
    pub fn with_streaming(mut self, enable: bool) -> Self {
        self.enable_streaming = enable;
        self
    }

    /// Whether any tool is advertised.
    pub fn has_tools(&self) -> bool {
        self.tools.as_ref().map_or(false, |t| !t.is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            anyhow::bail!("Temperature must be between 0.0 and 2.0");
        }

        if self.max_tokens == Some(0) {
            anyhow::bail!("Max tokens must be greater than 0");
        }

        if self.tool_choice.is_some() && !self.has_tools() {
            anyhow::bail!("Tool choice requires at least one tool");
        }

        if let Some(ref tools) = self.tools {
            for tool in tools {
                tool.validate()?;
            }
        }

        Ok(())
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self::new()
    }
}
