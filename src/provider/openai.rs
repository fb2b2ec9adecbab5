//! OpenAI chat-completions provider over `reqwest`.
//!
//! Speaks both api.openai.com style endpoints (Bearer auth, model in the
//! body) and Azure OpenAI deployments (`api-key` header, deployment in the
//! URL). Streaming responses are server-sent events: `data: {...}` events
//! separated by a blank line and terminated by `data: [DONE]`.

use crate::provider::adapters::{MessageAdapter, ToolAdapter};
use crate::provider::traits::{GenerateResponse, LlmProvider, StreamChunk, StreamingResponse};
use crate::provider::types::{GenerateConfig, InternalMessage};
use anyhow::{Context, Result};
use futures_util::{Stream, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const DATA_PREFIX: &str = "data:";
const DONE_MARKER: &str = "[DONE]";

/// Endpoint flavour
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFlavor {
    /// `{base_url}/chat/completions`, Bearer auth
    OpenAi {
        /// e.g. `https://api.openai.com/v1`
        base_url: String,
    },
    /// `{endpoint}/openai/deployments/{deployment}/chat/completions`, `api-key` header
    Azure {
        /// e.g. `https://contoso.openai.azure.com`
        endpoint: String,
        /// `api-version` query parameter
        api_version: String,
    },
}

/// Chat-completions provider
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    flavor: ApiFlavor,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    /// Provider for an OpenAI-compatible endpoint.
    pub fn openai(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        Self::with_flavor(
            ApiFlavor::OpenAi {
                base_url: base_url.into(),
            },
            api_key.into(),
            model.into(),
            None,
        )
    }

    /// Provider for an Azure OpenAI deployment. `deployment` plays the role
    /// of the model name.
    pub fn azure(
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Result<Self> {
        Self::with_flavor(
            ApiFlavor::Azure {
                endpoint: endpoint.into(),
                api_version: api_version.into(),
            },
            api_key.into(),
            deployment.into(),
            None,
        )
    }

    /// Build a provider with an explicit flavour and optional request timeout.
    pub fn with_flavor(
        flavor: ApiFlavor,
        api_key: String,
        model: String,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            anyhow::bail!("Missing API key for provider");
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            flavor,
            api_key,
            model,
        })
    }

    /// Endpoint flavour of this provider.
    pub fn flavor(&self) -> &ApiFlavor {
        &self.flavor
    }

    /// Full chat-completions URL for a model (or deployment).
    pub fn chat_url(&self, model: &str) -> String {
        match &self.flavor {
            ApiFlavor::OpenAi { base_url } => {
                format!("{}/chat/completions", base_url.trim_end_matches('/'))
            }
            ApiFlavor::Azure {
                endpoint,
                api_version,
            } => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                endpoint.trim_end_matches('/'),
                model,
                api_version
            ),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.flavor {
            ApiFlavor::OpenAi { .. } => request.bearer_auth(&self.api_key),
            ApiFlavor::Azure { .. } => request.header("api-key", &self.api_key),
        }
    }

    fn resolve_model(&self, config: &GenerateConfig) -> String {
        config.model.clone().unwrap_or_else(|| self.model.clone())
    }

    /// Build the JSON request body.
    pub fn build_request_body(
        &self,
        messages: &[InternalMessage],
        config: &GenerateConfig,
        model: &str,
        stream: bool,
    ) -> Result<Value> {
        config.validate()?;

        let mut body = json!({
            "messages": MessageAdapter::to_openai_messages(messages)?,
            "temperature": config.temperature,
            "stream": stream,
        });

        // Azure routes by deployment in the URL
        if let ApiFlavor::OpenAi { .. } = self.flavor {
            body["model"] = json!(model);
        }

        if let Some(max_tokens) = config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if let Some(ref tools) = config.tools {
            if !tools.is_empty() {
                body["tools"] = Value::Array(ToolAdapter::tools_to_json(tools));
                if let Some(ref choice) = config.tool_choice {
                    body["tool_choice"] = choice.to_openai_value();
                }
            }
        }

        Ok(body)
    }

    /// Parse a non-streaming chat-completions response body.
    pub fn parse_response(body: &str) -> Result<GenerateResponse> {
        let value: Value =
            serde_json::from_str(body).context("Failed to parse chat completion response")?;

        let message = value
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .context("Chat completion response has no choices")?;

        let text = message["content"].as_str().unwrap_or_default().to_string();

        let calls = match message.get("tool_calls").and_then(Value::as_array) {
            Some(calls) => calls
                .iter()
                .map(ToolAdapter::tool_call_from_json)
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        if calls.is_empty() {
            Ok(GenerateResponse::Content(text))
        } else {
            Ok(GenerateResponse::ToolCalls { text, calls })
        }
    }

    /// Translate one SSE `data:` payload into stream chunks.
    ///
    /// Events without choices (Azure content-filter preambles) produce no
    /// chunks; empty content deltas are dropped, and so are payloads that
    /// are not JSON. An `error` event is returned as `Err`.
    pub fn parse_stream_event(data: &str) -> Result<Vec<StreamChunk>> {
        let data = data.trim();
        if data == DONE_MARKER {
            return Ok(vec![StreamChunk::Done]);
        }

        let value: Value = match serde_json::from_str(data) {
            Ok(value) => value,
            Err(e) => {
                warn!("Skipping malformed stream event: {}", e);
                return Ok(Vec::new());
            }
        };
        if let Some(error) = value.get("error") {
            anyhow::bail!("Stream error event: {}", error);
        }

        let mut chunks = Vec::new();
        let Some(delta) = value
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("delta"))
        else {
            return Ok(chunks);
        };

        if let Some(content) = delta.get("content").and_then(Value::as_str) {
            if !content.is_empty() {
                chunks.push(StreamChunk::Text(content.to_string()));
            }
        }

        if let Some(tool_calls) = delta.get("tool_calls").and_then(Value::as_array) {
            for tool_delta in tool_calls {
                chunks.push(StreamChunk::ToolCallDelta {
                    index: tool_delta["index"].as_u64().unwrap_or(0) as usize,
                    id: tool_delta["id"].as_str().map(|s| s.to_string()),
                    name: tool_delta["function"]["name"].as_str().map(|s| s.to_string()),
                    arguments_delta: tool_delta["function"]["arguments"]
                        .as_str()
                        .map(|s| s.to_string()),
                });
            }
        }

        Ok(chunks)
    }
}

/// Forward the chunks of an SSE byte stream to `tx`.
///
/// Ends after `[DONE]`, after the body ends, or once the receiver is gone.
/// Transport failures and `error` events are sent as one `Err`, which also
/// ends the pump.
async fn pump_events<S, B, E>(byte_stream: S, tx: mpsc::UnboundedSender<Result<StreamChunk>>)
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut byte_stream = std::pin::pin!(byte_stream);
    let mut decoder = SseDecoder::new();

    loop {
        let next = tokio::select! {
            // Consumer gone: drop the connection
            _ = tx.closed() => return,
            next = byte_stream.next() => next,
        };

        let (payloads, finished) = match next {
            Some(Ok(bytes)) => (decoder.feed(bytes.as_ref()), false),
            Some(Err(e)) => {
                let _ = tx.send(Err(anyhow::anyhow!("Stream error: {}", e)));
                return;
            }
            None => (decoder.finish().into_iter().collect::<Vec<_>>(), true),
        };

        for payload in payloads {
            let chunks = match OpenAiProvider::parse_stream_event(&payload) {
                Ok(chunks) => chunks,
                Err(e) => {
                    let _ = tx.send(Err(e));
                    return;
                }
            };
            for chunk in chunks {
                let done = matches!(chunk, StreamChunk::Done);
                if tx.send(Ok(chunk)).is_err() || done {
                    return;
                }
            }
        }

        if finished {
            return;
        }
    }
}

/// Splits a byte stream into SSE `data:` payloads.
///
/// Bytes are buffered until a blank line closes an event, so multi-byte
/// characters and events split across network chunks are reassembled.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes and return the payloads of every completed event.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend(bytes.iter().copied().filter(|b| *b != b'\r'));

        let mut payloads = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let event: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(payload) = Self::event_data(&event[..end]) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Flush a trailing event that was not followed by a blank line.
    pub fn finish(&mut self) -> Option<String> {
        let event = std::mem::take(&mut self.buffer);
        Self::event_data(&event)
    }

    fn event_data(event: &[u8]) -> Option<String> {
        let event = String::from_utf8_lossy(event);
        let data: Vec<&str> = event
            .lines()
            .filter_map(|line| line.strip_prefix(DATA_PREFIX))
            .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
            .collect();

        if data.is_empty() {
            None
        } else {
            Some(data.join("\n"))
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(
        &self,
        messages: Vec<InternalMessage>,
        config: &GenerateConfig,
    ) -> Result<GenerateResponse> {
        let model = self.resolve_model(config);
        let body = self.build_request_body(&messages, config, &model, false)?;

        debug!(
            provider = self.provider_name(),
            model = %model,
            messages = messages.len(),
            tools = config.tools.as_ref().map_or(0, Vec::len),
            "sending chat completion request"
        );

        let response = self
            .authorize(self.client.post(self.chat_url(&model)))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_body = response.text().await?;

        if !status.is_success() {
            anyhow::bail!("API error {}: {}", status, response_body);
        }

        Self::parse_response(&response_body)
    }

    async fn generate_stream(
        &self,
        messages: Vec<InternalMessage>,
        config: &GenerateConfig,
    ) -> Result<StreamingResponse> {
        let model = self.resolve_model(config);
        let body = self.build_request_body(&messages, config, &model, true)?;

        debug!(
            provider = self.provider_name(),
            model = %model,
            messages = messages.len(),
            "sending streaming chat completion request"
        );

        let response = self
            .authorize(self.client.post(self.chat_url(&model)))
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error {}: {}", status, error_body);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(pump_events(response.bytes_stream(), tx));

        let chunk_stream = futures_util::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });

        Ok(Box::pin(chunk_stream))
    }

    fn provider_name(&self) -> &str {
        match self.flavor {
            ApiFlavor::OpenAi { .. } => "openai",
            ApiFlavor::Azure { .. } => "azure-openai",
        }
    }

    fn default_model(&self) -> String {
        self.model.clone()
    }
}
