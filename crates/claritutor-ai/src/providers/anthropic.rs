use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use claritutor_storage::models::Role;

use crate::provider::{ChatProvider, ChatRequest, GenerationError};
use crate::sse::{sse_data, LineDecoder};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicProvider {
    #[must_use]
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn send(
        &self,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<reqwest::Response, GenerationError> {
        let url = format!("{}/messages", self.base_url);

        let messages: Vec<serde_json::Value> = request
            .turns
            .iter()
            .map(|turn| {
                json!({
                    "role": match turn.role {
                        Role::User => "user",
                        Role::Assistant => "assistant",
                    },
                    "content": turn.content,
                })
            })
            .collect();

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": stream,
        });
        if let Some(system) = &request.system {
            body["system"] = json!(system);
        }

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::request("anthropic", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                provider: "anthropic",
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, GenerationError> {
        let response = self.send(request, false).await?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenerationError::request("anthropic", &e))?;

        // Extract text from: content[0].text
        body["content"][0]["text"]
            .as_str()
            .map(ToString::to_string)
            .filter(|s| !s.is_empty())
            .ok_or(GenerationError::EmptyResponse {
                provider: "anthropic",
            })
    }

    async fn stream(
        &self,
        request: &ChatRequest,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<String>, GenerationError> {
        let response = self.send(request, true).await?;

        let (tx, rx) = mpsc::channel(64);
        let mut stream = response.bytes_stream();

        tokio::spawn(async move {
            let mut decoder = LineDecoder::new();
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    chunk = stream.next() => {
                        let Some(chunk) = chunk else { break };
                        let Ok(chunk) = chunk else {
                            log::warn!("anthropic stream ended early");
                            break;
                        };
                        for line in decoder.push(&chunk) {
                            let Some(data) = sse_data(&line) else { continue };
                            let Ok(event) = serde_json::from_str::<serde_json::Value>(data) else {
                                continue;
                            };
                            match event["type"].as_str() {
                                Some("content_block_delta") => {
                                    if let Some(delta) = event["delta"]["text"].as_str() {
                                        if !delta.is_empty()
                                            && tx.send(delta.to_string()).await.is_err()
                                        {
                                            return;
                                        }
                                    }
                                }
                                Some("message_stop") => return,
                                _ => {}
                            }
                        }
                    }
                }
            }
        });

        Ok(rx)
    }
}
