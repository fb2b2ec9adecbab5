//! The kernel: a provider, a function registry and the auto-invoke loop.

use crate::config::Configuration;
use crate::invoker::{FunctionRegistry, InvokerError, InvokerRegistry, KernelFunction, Plugin};
use crate::kernel::settings::{ExecutionSettings, KernelRequest, RequestCancelled};
use crate::kernel::tools::{ToolCoordinator, ToolExecutionResult};
use crate::observability::Logger;
use crate::plugins::{TimePlugin, WeatherPlugin};
use crate::provider::types::assistant_with_tool_calls;
use crate::provider::{
    GenerateConfig, GenerateResponse, InternalMessage, InternalToolDefinition, LlmProvider,
    MessageAdapter, MessageRole, ProviderFactory, StreamChunk, ToolInvocation,
};
use anyhow::{Context, Result};
use futures_util::{Stream, StreamExt};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One streamed piece of the assistant's reply.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamingChatContent {
    /// Always `Assistant`
    pub role: MessageRole,
    /// Text delta (never empty when `tool_calls` is empty)
    pub text: String,
    /// Unexecuted tool calls; only produced when auto-invoke is off
    pub tool_calls: Vec<ToolInvocation>,
}

impl StreamingChatContent {
    /// A text delta
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Tool calls handed back to the caller
    pub fn tool_calls(calls: Vec<ToolInvocation>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: String::new(),
            tool_calls: calls,
        }
    }
}

/// Stream returned by [`Kernel::get_streaming_chat_message_contents`].
pub type StreamingChatContents =
    Pin<Box<dyn Stream<Item = Result<StreamingChatContent>> + Send>>;

/// Model-orchestration engine.
///
/// Immutable after [`KernelBuilder::build`]; clones share the provider,
/// registry and logger, so one kernel serves any number of concurrent
/// requests.
#[derive(Clone)]
pub struct Kernel {
    provider: Arc<dyn LlmProvider>,
    functions: Arc<FunctionRegistry>,
    logger: Option<Arc<Logger>>,
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("provider", &self.provider.provider_name())
            .field("functions", &self.functions.names())
            .field("logger", &self.logger)
            .finish()
    }
}

/// Builder for [`Kernel`]
#[derive(Default)]
pub struct KernelBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    functions: FunctionRegistry,
    logger: Option<Arc<Logger>>,
}

impl KernelBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Register every function of a plugin
    pub fn plugin(mut self, plugin: &dyn Plugin) -> Result<Self, InvokerError> {
        let count = plugin.register_all(&mut self.functions)?;
        debug!(plugin = plugin.name(), functions = count, "plugin registered");
        Ok(self)
    }

    /// Register a single function
    pub fn function(mut self, function: KernelFunction) -> Result<Self, InvokerError> {
        self.functions.register(function)?;
        Ok(self)
    }

    /// Attach a transcript logger
    pub fn logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Build the kernel. A provider is required.
    pub fn build(self) -> Result<Kernel> {
        let provider = self
            .provider
            .context("Kernel requires a provider")?;

        Ok(Kernel {
            provider,
            functions: Arc::new(self.functions),
            logger: self.logger,
        })
    }
}

impl Kernel {
    /// Start building a kernel
    pub fn builder() -> KernelBuilder {
        KernelBuilder::new()
    }

    /// Build a kernel from configuration: provider via the factory, the
    /// enabled built-in plugins, and the transcript logger if enabled.
    pub fn from_config(config: &Configuration) -> Result<Self> {
        let provider = ProviderFactory::create(&config.provider)?;
        let mut builder = KernelBuilder::new().provider(provider);

        if config.plugins.weather {
            builder = builder.plugin(&WeatherPlugin)?;
        }
        if config.plugins.time {
            builder = builder.plugin(&TimePlugin::new())?;
        }
        if config.logging.enabled {
            let logger = Logger::new(
                Some(Path::new(&config.logging.log_file)),
                Some(&config.logging.log_level),
            )?;
            builder = builder.logger(Arc::new(logger));
        }

        builder.build()
    }

    /// The remote model provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Registered tool functions
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Definitions of the tools advertised for a request.
    pub fn tool_definitions(&self, request: &KernelRequest) -> Vec<InternalToolDefinition> {
        self.functions
            .descriptors_filtered(request.tools.as_deref())
            .iter()
            .map(InternalToolDefinition::from)
            .collect()
    }

    /// Provider config for one round. Once the round cap is reached in
    /// auto-invoke mode no tools are advertised, forcing a text answer.
    fn round_config(
        &self,
        settings: &ExecutionSettings,
        tools: &[InternalToolDefinition],
        rounds: u32,
    ) -> GenerateConfig {
        let config = settings.generate_config();
        if settings.auto_invoke_tools && rounds >= settings.max_auto_invoke_attempts {
            config.without_tools()
        } else {
            config.with_tools(tools.to_vec())
        }
    }

    /// Single-shot completion.
    ///
    /// With auto-invoke on, every tool call the model makes is executed and
    /// fed back until the model answers with text; the returned message has
    /// no tool-use blocks. With auto-invoke off, the first tool-call reply is
    /// returned as is.
    ///
    /// Cancelling the request's token fails with [`RequestCancelled`], also
    /// while a provider call is in flight; the pending call is dropped.
    pub async fn get_chat_message_content(
        &self,
        history: Vec<InternalMessage>,
        settings: &ExecutionSettings,
        request: &KernelRequest,
    ) -> Result<InternalMessage> {
        if history.is_empty() {
            anyhow::bail!("chat history is empty");
        }

        let token = request.cancellation_token();
        let tools = self.tool_definitions(request);
        let mut history = history;
        let mut coordinator = ToolCoordinator::new();
        let mut rounds = 0u32;

        loop {
            if token.is_cancelled() {
                return Err(RequestCancelled.into());
            }

            let config = self.round_config(settings, &tools, rounds);
            self.log_request(&history, &config, false);

            let generated = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("request cancelled while waiting for the provider");
                    return Err(RequestCancelled.into());
                }
                generated = self.provider.generate(history.clone(), &config) => generated,
            };
            let response = match generated {
                Ok(response) => response,
                Err(e) => {
                    self.log_failure(&e, &config);
                    return Err(e);
                }
            };

            match response {
                GenerateResponse::Content(text) => {
                    self.log_response(&text, &config);
                    self.log_completion(&coordinator, rounds);
                    return Ok(InternalMessage::assistant(text.as_str()));
                }
                GenerateResponse::ToolCalls { text, calls } => {
                    if !settings.auto_invoke_tools {
                        return Ok(assistant_with_tool_calls(&text, &calls));
                    }
                    if !config.has_tools() {
                        warn!(calls = calls.len(), "model requested tools after the auto-invoke limit");
                        self.log_completion(&coordinator, rounds);
                        return Ok(InternalMessage::assistant(text.as_str()));
                    }

                    history.push(assistant_with_tool_calls(&text, &calls));
                    self.invoke_all(&mut coordinator, &calls, &mut history);
                    rounds += 1;
                }
            }
        }
    }

    /// Streaming completion.
    ///
    /// A producer task runs the same loop over the provider's stream and
    /// forwards text deltas. Cancelling the request's token, or dropping the
    /// returned stream, stops the task, which drops the provider stream.
    pub async fn get_streaming_chat_message_contents(
        &self,
        history: Vec<InternalMessage>,
        settings: &ExecutionSettings,
        request: &KernelRequest,
    ) -> Result<StreamingChatContents> {
        if history.is_empty() {
            anyhow::bail!("chat history is empty");
        }
        if request.is_cancelled() {
            return Err(RequestCancelled.into());
        }

        let token = request.cancellation_token();
        let tools = self.tool_definitions(request);
        let (tx, rx) = mpsc::unbounded_channel();

        let kernel = self.clone();
        let settings = settings.clone();
        let producer_token = token.clone();
        tokio::spawn(async move {
            kernel
                .run_streaming(history, settings, tools, producer_token, tx)
                .await;
        });

        let stream = futures_util::stream::unfold((rx, token), |(mut rx, token)| async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                item = rx.recv() => item.map(|item| (item, (rx, token))),
            }
        });

        Ok(Box::pin(stream))
    }

    async fn run_streaming(
        self,
        mut history: Vec<InternalMessage>,
        settings: ExecutionSettings,
        tools: Vec<InternalToolDefinition>,
        token: CancellationToken,
        tx: mpsc::UnboundedSender<Result<StreamingChatContent>>,
    ) {
        let mut coordinator = ToolCoordinator::new();
        let mut rounds = 0u32;

        loop {
            let config = self.round_config(&settings, &tools, rounds).with_streaming(true);
            self.log_request(&history, &config, true);

            let opened = tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tx.closed() => return,
                opened = self.provider.generate_stream(history.clone(), &config) => opened,
            };
            let mut stream = match opened {
                Ok(stream) => stream,
                Err(e) => {
                    self.log_failure(&e, &config);
                    let _ = tx.send(Err(e));
                    return;
                }
            };

            let mut accumulator = umf::StreamingAccumulator::new();
            loop {
                let next = tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("streaming request cancelled");
                        return;
                    }
                    _ = tx.closed() => return,
                    next = stream.next() => next,
                };

                match next {
                    None => break,
                    Some(Err(e)) => {
                        self.log_failure(&e, &config);
                        let _ = tx.send(Err(e));
                        return;
                    }
                    Some(Ok(chunk)) => {
                        if let StreamChunk::Text(ref text) = chunk {
                            if !text.is_empty()
                                && tx.send(Ok(StreamingChatContent::text(text.clone()))).is_err()
                            {
                                return;
                            }
                        }
                        if accumulator.process_chunk(chunk) {
                            break;
                        }
                    }
                }
            }
            drop(stream);

            let accumulated = accumulator.finish();
            let calls: Vec<ToolInvocation> = accumulated
                .tool_calls
                .iter()
                .map(ToolInvocation::from_tool_call)
                .collect();

            if calls.is_empty() {
                self.log_response(&accumulated.text, &config);
                self.log_completion(&coordinator, rounds);
                return;
            }
            if !settings.auto_invoke_tools {
                let _ = tx.send(Ok(StreamingChatContent::tool_calls(calls)));
                return;
            }
            if !config.has_tools() {
                warn!(calls = calls.len(), "model requested tools after the auto-invoke limit");
                self.log_completion(&coordinator, rounds);
                return;
            }

            history.push(assistant_with_tool_calls(&accumulated.text, &calls));
            self.invoke_all(&mut coordinator, &calls, &mut history);
            rounds += 1;
        }
    }

    /// Execute a round of tool calls in model order, appending one result
    /// message per call.
    fn invoke_all(
        &self,
        coordinator: &mut ToolCoordinator,
        calls: &[ToolInvocation],
        history: &mut Vec<InternalMessage>,
    ) {
        info!(
            calls = calls.len(),
            tools = %calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", "),
            "invoking tools"
        );

        for call in calls {
            let result = coordinator.execute(&self.functions, call);
            self.log_tool(&result);
            history.push(result.to_tool_result().into_message());
        }
    }

    fn log_request(&self, history: &[InternalMessage], config: &GenerateConfig, streaming: bool) {
        let Some(ref logger) = self.logger else {
            return;
        };

        let messages = MessageAdapter::to_openai_messages(history).unwrap_or_default();
        let tools: Vec<String> = config
            .tools
            .iter()
            .flatten()
            .map(|t| t.name.clone())
            .collect();
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model());

        if let Err(e) = logger.log_request(&model, &messages, &tools, streaming) {
            warn!("Failed to write transcript: {}", e);
        }
    }

    fn log_tool(&self, result: &ToolExecutionResult) {
        if let Some(ref logger) = self.logger {
            let args = serde_json::to_string(&result.arguments).unwrap_or_default();
            if let Err(e) =
                logger.log_tool_execution(&result.tool_name, &args, &result.content, result.success)
            {
                warn!("Failed to write transcript: {}", e);
            }
        }
    }

    fn log_response(&self, text: &str, config: &GenerateConfig) {
        if let Some(ref logger) = self.logger {
            let model = config
                .model
                .clone()
                .unwrap_or_else(|| self.provider.default_model());
            if let Err(e) = logger.log_llm_response(text, Some(&model)) {
                warn!("Failed to write transcript: {}", e);
            }
        }
    }

    fn log_failure(&self, error: &anyhow::Error, config: &GenerateConfig) {
        if let Some(ref logger) = self.logger {
            let mut context = HashMap::new();
            context.insert(
                "provider".to_string(),
                serde_json::Value::from(self.provider.provider_name()),
            );
            context.insert("streaming".to_string(), serde_json::Value::from(config.enable_streaming));
            if let Err(e) = logger.log_error(&error.to_string(), Some(&context)) {
                warn!("Failed to write transcript: {}", e);
            }
        }
    }

    fn log_completion(&self, coordinator: &ToolCoordinator, rounds: u32) {
        debug!(
            rounds,
            tool_calls = coordinator.invocation_count(),
            failed = coordinator.failed_executions().len(),
            "request completed"
        );
        if let Some(ref logger) = self.logger {
            let reason = format!(
                "{} tool rounds, {} tool calls",
                rounds,
                coordinator.invocation_count()
            );
            if let Err(e) = logger.log_completion(&reason) {
                warn!("Failed to write transcript: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::{ToolArguments, ToolDescriptor};
    use crate::provider::StreamingResponse;

    struct EchoProvider;

    #[async_trait::async_trait]
    impl LlmProvider for EchoProvider {
        async fn generate(
            &self,
            messages: Vec<InternalMessage>,
            _config: &GenerateConfig,
        ) -> Result<GenerateResponse> {
            let last = messages
                .last()
                .and_then(|m| m.text())
                .unwrap_or_default()
                .to_string();
            Ok(GenerateResponse::Content(format!("echo: {}", last)))
        }

        async fn generate_stream(
            &self,
            _messages: Vec<InternalMessage>,
            _config: &GenerateConfig,
        ) -> Result<StreamingResponse> {
            anyhow::bail!("streaming not scripted")
        }

        fn provider_name(&self) -> &str {
            "echo"
        }

        fn default_model(&self) -> String {
            "echo-1".to_string()
        }
    }

    fn kernel() -> Kernel {
        Kernel::builder()
            .provider(Arc::new(EchoProvider))
            .plugin(&WeatherPlugin)
            .unwrap()
            .plugin(&TimePlugin::new())
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_provider() {
        let err = KernelBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("requires a provider"));
    }

    #[test]
    fn test_builder_rejects_duplicate_function() {
        let function = KernelFunction::new(ToolDescriptor::new("get_weather", "dup"), |_| {
            Ok(String::new())
        });
        let result = Kernel::builder().plugin(&WeatherPlugin).unwrap().function(function);
        assert!(matches!(result, Err(InvokerError::DuplicateName { .. })));
    }

    #[test]
    fn test_tool_definitions_respect_filter() {
        let kernel = kernel();
        let all = kernel.tool_definitions(&KernelRequest::new());
        assert!(all.iter().any(|t| t.name == "get_weather"));
        assert!(all.iter().any(|t| t.name == "days_ago"));

        let only = kernel.tool_definitions(&KernelRequest::new().with_tools(["get_weather"]));
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].name, "get_weather");
    }

    #[test]
    fn test_round_config_drops_tools_at_limit() {
        let kernel = kernel();
        let tools = kernel.tool_definitions(&KernelRequest::new());
        let settings = ExecutionSettings::default().with_max_auto_invoke_attempts(2);

        assert!(kernel.round_config(&settings, &tools, 0).has_tools());
        assert!(kernel.round_config(&settings, &tools, 1).has_tools());
        assert!(!kernel.round_config(&settings, &tools, 2).has_tools());

        // Manual mode always advertises
        let manual = ExecutionSettings::manual().with_max_auto_invoke_attempts(0);
        assert!(kernel.round_config(&manual, &tools, 5).has_tools());
    }

    #[tokio::test]
    async fn test_content_reply() {
        let kernel = kernel();
        let reply = kernel
            .get_chat_message_content(
                vec![InternalMessage::user("hello")],
                &ExecutionSettings::default(),
                &KernelRequest::new(),
            )
            .await
            .unwrap();
        assert_eq!(reply.role, MessageRole::Assistant);
        assert_eq!(reply.text(), Some("echo: hello"));
    }

    #[tokio::test]
    async fn test_empty_history_and_cancelled_request() {
        let kernel = kernel();
        let settings = ExecutionSettings::default();

        let err = kernel
            .get_chat_message_content(Vec::new(), &settings, &KernelRequest::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("empty"));

        let token = CancellationToken::new();
        token.cancel();
        let request = KernelRequest::new().with_cancellation(token);
        let err = kernel
            .get_chat_message_content(vec![InternalMessage::user("hi")], &settings, &request)
            .await
            .unwrap_err();
        assert!(err.is::<RequestCancelled>());
        assert_eq!(err.to_string(), "request cancelled");
    }

    #[tokio::test]
    async fn test_transcript_records_completion_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.md");
        let logger = Logger::new(Some(&path), Some("INFO")).unwrap();
        let kernel = Kernel::builder()
            .provider(Arc::new(EchoProvider))
            .logger(Arc::new(logger))
            .build()
            .unwrap();

        kernel
            .get_chat_message_content(
                vec![InternalMessage::user("hello")],
                &ExecutionSettings::default(),
                &KernelRequest::new(),
            )
            .await
            .unwrap();

        let mut stream = kernel
            .get_streaming_chat_message_contents(
                vec![InternalMessage::user("hello")],
                &ExecutionSettings::default(),
                &KernelRequest::new(),
            )
            .await
            .unwrap();
        assert!(stream.next().await.unwrap().is_err());

        let transcript = std::fs::read_to_string(&path).unwrap();
        assert!(transcript.contains("echo: hello"));
        assert!(transcript.contains("### Request Completed"));
        assert!(transcript.contains("streaming not scripted"));
    }

    #[test]
    fn test_registered_functions_are_callable() {
        let kernel = kernel();
        let out = kernel
            .functions()
            .invoke("get_weather", &ToolArguments::new().with("city", "LA"))
            .unwrap();
        assert_eq!(out, "68°F (20°C)");
        assert_eq!(kernel.provider().provider_name(), "echo");
    }
}
