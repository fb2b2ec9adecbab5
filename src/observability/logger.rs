//! Markdown transcript of kernel requests.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Transcript logger for chat requests and tool calls.
///
/// Each call appends one markdown section to the log file and emits a
/// matching `tracing` event. The logger holds no open handle, so it can be
/// shared across concurrent requests behind an `Arc`.
#[derive(Debug)]
pub struct Logger {
    log_file: PathBuf,
    log_level: String,
}

impl Logger {
    /// Initialize logger.
    ///
    /// # Arguments
    /// * `log_file` - Path to log file. If None, creates a timestamped file in temp directory.
    /// * `log_level` - Logging level (defaults to "INFO"). "DEBUG" writes full message payloads.
    pub fn new(log_file: Option<&Path>, log_level: Option<&str>) -> Result<Self> {
        let log_file = match log_file {
            Some(p) => p.to_path_buf(),
            None => std::env::temp_dir().join("toolchat").join(format!(
                "transcript_{}_{}.md",
                Utc::now().timestamp_millis(),
                std::process::id()
            )),
        };

        let log_level = log_level.unwrap_or("INFO").to_uppercase();

        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        let logger = Self {
            log_file,
            log_level,
        };

        if !logger.log_file.exists() {
            logger.initialize_log_file()?;
        }

        Ok(logger)
    }

    fn initialize_log_file(&self) -> Result<()> {
        let mut file = File::create(&self.log_file)
            .with_context(|| format!("Failed to create log file: {}", self.log_file.display()))?;

        let now: DateTime<Utc> = Utc::now();

        writeln!(file, "# Chat Transcript\n")?;
        writeln!(file, "Log started: {}\n", now.to_rfc3339())?;
        writeln!(file, "---\n")?;

        Ok(())
    }

    fn append_to_log(&self, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .with_context(|| format!("Failed to open log file: {}", self.log_file.display()))?;

        file.write_all(content.as_bytes())
            .with_context(|| "Failed to write to log file")?;

        Ok(())
    }

    fn is_debug(&self) -> bool {
        matches!(self.log_level.as_str(), "DEBUG" | "TRACE")
    }

    /// Log an outgoing model request.
    ///
    /// # Arguments
    /// * `model` - Model or deployment name.
    /// * `messages` - Messages in provider wire format.
    /// * `tools` - Names of the tools advertised with the request.
    /// * `streaming` - Whether the response is streamed.
    pub fn log_request(
        &self,
        model: &str,
        messages: &[serde_json::Value],
        tools: &[String],
        streaming: bool,
    ) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let tools_line = if tools.is_empty() {
            "none".to_string()
        } else {
            tools.join(", ")
        };

        let messages_block = if self.is_debug() {
            format!(
                "**Messages:**\n```json\n{}\n```\n\n",
                serde_json::to_string_pretty(messages).unwrap_or_else(|_| "[]".to_string())
            )
        } else {
            format!("**Messages:** {} messages\n\n", messages.len())
        };

        let content = format!(
            "## Request - {}\n\n**Model:** {}\n**Streaming:** {}\n**Tools:** {}\n\n{}",
            now.to_rfc3339(),
            model,
            streaming,
            tools_line,
            messages_block
        );

        self.append_to_log(&content)?;
        info!(model, messages = messages.len(), streaming, "request logged");
        Ok(())
    }

    /// Log LLM response text.
    ///
    /// Empty or whitespace-only responses are skipped.
    pub fn log_llm_response(&self, response: &str, model: Option<&str>) -> Result<()> {
        if response.trim().is_empty() {
            debug!("Skipping log entry for empty LLM response");
            return Ok(());
        }

        let model = model.unwrap_or("unknown");
        let now: DateTime<Utc> = Utc::now();
        let content = format!(
            "### LLM Response - {}\n\n**Model:** {}\n\n**Response:**\n```\n{}\n```\n\n",
            now.to_rfc3339(),
            model,
            response
        );

        self.append_to_log(&content)?;
        info!(model, "LLM response logged");
        Ok(())
    }

    /// Log tool execution with detailed results.
    ///
    /// # Arguments
    /// * `tool_name` - Name of the tool executed.
    /// * `tool_args` - Arguments passed to the tool.
    /// * `result` - Tool execution result.
    /// * `success` - Whether the tool execution was successful.
    pub fn log_tool_execution(
        &self,
        tool_name: &str,
        tool_args: &str,
        result: &str,
        success: bool,
    ) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let status = if success { "Result" } else { "Error" };

        let content = format!(
            "### Tool Execution - {}\n\n**Tool:** {}\n**Args:** {}\n**{}:** {}\n\n",
            now.to_rfc3339(),
            tool_name,
            tool_args,
            status,
            result
        );

        self.append_to_log(&content)?;
        Ok(())
    }

    /// Log error with context.
    pub fn log_error(
        &self,
        error: &str,
        context: Option<&HashMap<String, serde_json::Value>>,
    ) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let mut content = format!(
            "### Error - {}\n\n**Error:** {}\n\n",
            now.to_rfc3339(),
            error
        );

        if let Some(ctx) = context {
            content.push_str(&format!(
                "**Context:** {}\n\n",
                serde_json::to_string_pretty(ctx).unwrap_or_default()
            ));
        }

        self.append_to_log(&content)?;
        error!("{}", error);
        Ok(())
    }

    /// Log the end of a request.
    pub fn log_completion(&self, reason: &str) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let content = format!(
            "### Request Completed - {}\n\n**Reason:** {}\n\n---\n\n",
            now.to_rfc3339(),
            reason
        );

        self.append_to_log(&content)?;
        info!("Request completed: {}", reason);
        Ok(())
    }

    /// Log custom content.
    ///
    /// # Arguments
    /// * `title` - Log entry title.
    /// * `content` - Log content.
    /// * `level` - Log level ("ERROR", "WARN", anything else is INFO).
    pub fn log_custom(&self, title: &str, content: &str, level: Option<&str>) -> Result<()> {
        let level = level.unwrap_or("INFO");
        let now: DateTime<Utc> = Utc::now();
        let log_content = format!("### {} - {}\n\n{}\n\n", title, now.to_rfc3339(), content);

        self.append_to_log(&log_content)?;

        match level {
            "ERROR" => error!("{}: {}", title, content),
            "WARN" => warn!("{}: {}", title, content),
            _ => info!("{}: {}", title, content),
        }

        Ok(())
    }

    /// Get the log file path.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Get the log level.
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}
