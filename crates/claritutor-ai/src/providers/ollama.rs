use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use claritutor_storage::models::Role;

use crate::provider::{ChatProvider, ChatRequest, GenerationError};
use crate::sse::LineDecoder;

/// Ollama local model provider. Streams NDJSON rather than SSE.
pub struct OllamaProvider {
    client: Client,
    model: String,
    base_url: String,
}

impl OllamaProvider {
    #[must_use]
    pub fn new(model: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn send(
        &self,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<reqwest::Response, GenerationError> {
        let url = format!("{}/api/chat", self.base_url);

        let mut messages = Vec::with_capacity(request.turns.len() + 1);
        if let Some(system) = &request.system {
            messages.push(json!({"role": "system", "content": system}));
        }
        for turn in &request.turns {
            messages.push(json!({
                "role": match turn.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                "content": turn.content,
            }));
        }

        let body = json!({
            "model": self.model,
            "messages": messages,
            "stream": stream,
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens,
            },
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::request("ollama", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                provider: "ollama",
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, GenerationError> {
        let response = self.send(request, false).await?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenerationError::request("ollama", &e))?;

        body["message"]["content"]
            .as_str()
            .map(ToString::to_string)
            .filter(|s| !s.is_empty())
            .ok_or(GenerationError::EmptyResponse { provider: "ollama" })
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
                            log::warn!("ollama stream ended early");
                            break;
                        };
                        for line in decoder.push(&chunk) {
                            if line.is_empty() {
                                continue;
                            }
                            let Ok(event) = serde_json::from_str::<serde_json::Value>(&line) else {
                                continue;
                            };
                            if let Some(delta) = event["message"]["content"].as_str() {
                                if !delta.is_empty() && tx.send(delta.to_string()).await.is_err() {
                                    return;
                                }
                            }
                            if event["done"].as_bool() == Some(true) {
                                return;
                            }
                        }
                    }
                }
            }
        });

        Ok(rx)
    }
}
