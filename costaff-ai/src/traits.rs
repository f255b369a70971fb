// File: costaff-ai/src/traits.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A single chat message exchanged with a model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender ("user" or "assistant")
    pub role: String,

    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// One item on a streaming chat channel.
///
/// `Done` is sent exactly once after the provider's completion marker; a
/// channel that closes without it means the stream was aborted and the
/// partial text must be discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Delta(String),
    Done,
    Error(String),
}

/// Interface for model providers
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Get the name of this provider
    fn name(&self) -> &str;

    /// One-shot chat completion
    async fn chat(
        &self,
        system: &str,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
    ) -> anyhow::Result<String>;

    /// Streaming chat completion. Returns once the provider has accepted the
    /// request; tokens arrive on the channel as they are produced.
    async fn chat_stream(
        &self,
        system: &str,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
    ) -> anyhow::Result<mpsc::Receiver<StreamEvent>>;
}
