//! Shared test doubles for the integration tests.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use futures_util::stream;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use toolchat::provider::{
    GenerateConfig, GenerateResponse, InternalMessage, LlmProvider, StreamChunk,
    StreamingResponse, ToolInvocation,
};

/// Scripted stream for one `generate_stream` call.
pub enum StreamScript {
    /// Yield these chunks then end
    Chunks(Vec<StreamChunk>),
    /// Yield whatever the test sends; stays open until the sender is dropped
    Channel(mpsc::UnboundedReceiver<Result<StreamChunk>>),
    /// Fail to open the stream
    Fail(String),
}

/// Scripted outcome of one `generate` call.
enum Reply {
    Respond(GenerateResponse),
    Fail(String),
    /// Never resolves
    Hang,
}

/// Provider that replays scripted replies and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Reply>>,
    streams: Mutex<VecDeque<StreamScript>>,
    calls: AtomicUsize,
    configs: Mutex<Vec<GenerateConfig>>,
    histories: Mutex<Vec<Vec<InternalMessage>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, response: GenerateResponse) -> Self {
        self.responses.lock().unwrap().push_back(Reply::Respond(response));
        self
    }

    pub fn reply_text(self, text: &str) -> Self {
        self.reply(GenerateResponse::Content(text.to_string()))
    }

    pub fn reply_tool_call(self, id: &str, name: &str, arguments: Value) -> Self {
        self.reply(GenerateResponse::ToolCalls {
            text: String::new(),
            calls: vec![ToolInvocation::new(id, name, arguments)],
        })
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses.lock().unwrap().push_back(Reply::Fail(message.to_string()));
        self
    }

    /// Next `generate` call waits forever, like a request that never answers.
    pub fn hang(self) -> Self {
        self.responses.lock().unwrap().push_back(Reply::Hang);
        self
    }

    pub fn stream(self, script: StreamScript) -> Self {
        self.streams.lock().unwrap().push_back(script);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn configs(&self) -> Vec<GenerateConfig> {
        self.configs.lock().unwrap().clone()
    }

    pub fn histories(&self) -> Vec<Vec<InternalMessage>> {
        self.histories.lock().unwrap().clone()
    }

    /// Names of the tools advertised on request `n`
    pub fn advertised_tools(&self, n: usize) -> Vec<String> {
        self.configs()[n]
            .tools
            .iter()
            .flatten()
            .map(|t| t.name.clone())
            .collect()
    }

    fn record(&self, messages: &[InternalMessage], config: &GenerateConfig) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.configs.lock().unwrap().push(config.clone());
        self.histories.lock().unwrap().push(messages.to_vec());
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(
        &self,
        messages: Vec<InternalMessage>,
        config: &GenerateConfig,
    ) -> Result<GenerateResponse> {
        self.record(&messages, config);
        let reply = self.responses.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(anyhow::anyhow!(message)),
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(anyhow::anyhow!("no scripted response left")),
        }
    }

    async fn generate_stream(
        &self,
        messages: Vec<InternalMessage>,
        config: &GenerateConfig,
    ) -> Result<StreamingResponse> {
        self.record(&messages, config);
        let script = self.streams.lock().unwrap().pop_front();
        match script {
            Some(StreamScript::Chunks(chunks)) => {
                Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok))))
            }
            Some(StreamScript::Channel(rx)) => Ok(Box::pin(stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|item| (item, rx))
            }))),
            Some(StreamScript::Fail(message)) => Err(anyhow::anyhow!(message)),
            None => Err(anyhow::anyhow!("no scripted stream left")),
        }
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> String {
        "scripted-model".to_string()
    }
}

pub fn shared(provider: ScriptedProvider) -> Arc<ScriptedProvider> {
    Arc::new(provider)
}

pub fn text_chunks(parts: &[&str]) -> Vec<StreamChunk> {
    let mut chunks: Vec<StreamChunk> = parts
        .iter()
        .map(|p| StreamChunk::Text(p.to_string()))
        .collect();
    chunks.push(StreamChunk::Done);
    chunks
}

/// Stream chunks for a single tool call whose arguments arrive in pieces.
pub fn tool_call_chunks(id: &str, name: &str, argument_parts: &[&str]) -> Vec<StreamChunk> {
    let mut chunks = vec![StreamChunk::ToolCallDelta {
        index: 0,
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        arguments_delta: None,
    }];
    for part in argument_parts {
        chunks.push(StreamChunk::ToolCallDelta {
            index: 0,
            id: None,
            name: None,
            arguments_delta: Some(part.to_string()),
        });
    }
    chunks.push(StreamChunk::Done);
    chunks
}
