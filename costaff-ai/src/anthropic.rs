// File: costaff-ai/src/anthropic.rs

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::models::ProviderConfig;
use crate::traits::{ChatMessage, ModelProvider, StreamEvent};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    config: ProviderConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given configuration
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::new();
        Self { config, client }
    }

    fn api_base(&self) -> String {
        self.config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    fn request_payload(
        &self,
        system: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
        stream: bool,
    ) -> serde_json::Value {
        let formatted: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| json!({ "role": m.role, "content": m.content }))
            .collect();

        let mut payload = json!({
            "model": self.config.model,
            "max_tokens": max_tokens,
            "system": system,
            "messages": formatted,
        });
        if stream {
            payload["stream"] = json!(true);
        }
        payload
    }
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn chat(
        &self,
        system: &str,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
    ) -> anyhow::Result<String> {
        let payload = self.request_payload(system, &messages, max_tokens, false);
        debug!("Anthropic one-shot call: model={}", self.config.model);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_base()))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow::anyhow!("Provider returned status {}", status));
        }

        let data = response.json::<serde_json::Value>().await?;

        let text = data["content"]
            .as_array()
            .and_then(|blocks| blocks.first())
            .and_then(|block| block["text"].as_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid response format"))?
            .to_string();

        Ok(text)
    }

    async fn chat_stream(
        &self,
        system: &str,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
    ) -> anyhow::Result<mpsc::Receiver<StreamEvent>> {
        let payload = self.request_payload(system, &messages, max_tokens, true);
        debug!("Anthropic streaming call: model={}", self.config.model);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_base()))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow::anyhow!("Provider returned status {}", status));
        }

        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            // SSE chunks can split mid-line; keep the tail until the next chunk.
            let mut buf = String::new();

            while let Some(chunk_result) = stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        warn!("Anthropic stream chunk error: {}", e);
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                };
                buf.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(pos) = buf.find('\n') {
                    let line = buf[..pos].trim_end_matches('\r').to_string();
                    buf.drain(..=pos);

                    match parse_sse_line(&line) {
                        Some(SseEvent::Delta(text)) => {
                            if tx.send(StreamEvent::Delta(text)).await.is_err() {
                                // Receiver gone; the caller disconnected.
                                return;
                            }
                        }
                        Some(SseEvent::Stop) => {
                            let _ = tx.send(StreamEvent::Done).await;
                            return;
                        }
                        Some(SseEvent::Error(msg)) => {
                            warn!("Anthropic stream error event: {}", msg);
                            let _ = tx.send(StreamEvent::Error(msg)).await;
                            return;
                        }
                        None => {}
                    }
                }
            }
            // Stream ended without message_stop; the channel closes without
            // a Done and the caller treats the turn as aborted.
        });

        Ok(rx)
    }
}

#[derive(Debug, PartialEq)]
enum SseEvent {
    Delta(String),
    Stop,
    Error(String),
}

/// Parse one line of the Messages API event stream.
fn parse_sse_line(line: &str) -> Option<SseEvent> {
    let data = line.strip_prefix("data: ")?;
    let parsed: serde_json::Value = serde_json::from_str(data).ok()?;
    match parsed["type"].as_str()? {
        "content_block_delta" => parsed["delta"]["text"]
            .as_str()
            .map(|t| SseEvent::Delta(t.to_string())),
        "message_stop" => Some(SseEvent::Stop),
        "error" => Some(SseEvent::Error(
            parsed["error"]["message"]
                .as_str()
                .unwrap_or("provider error")
                .to_string(),
        )),
        _ => None,
    }
}
