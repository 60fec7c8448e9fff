use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use claritutor_storage::models::Role;

use crate::provider::{ChatProvider, ChatRequest, GenerationError};
use crate::sse::{sse_data, LineDecoder};

/// Google Gemini API provider
pub struct GoogleGenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GoogleGenAiProvider {
    #[must_use]
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn body(request: &ChatRequest) -> serde_json::Value {
        // Gemini uses "model" for assistant turns and a separate
        // systemInstruction block
        let contents: Vec<serde_json::Value> = request
            .turns
            .iter()
            .map(|turn| {
                json!({
                    "role": match turn.role {
                        Role::User => "user",
                        Role::Assistant => "model",
                    },
                    "parts": [{"text": turn.content}],
                })
            })
            .collect();

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_tokens,
            },
        });
        if let Some(system) = &request.system {
            body["systemInstruction"] = json!({"parts": [{"text": system}]});
        }
        body
    }

    async fn send(
        &self,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<reqwest::Response, GenerationError> {
        let method = if stream {
            "streamGenerateContent?alt=sse&"
        } else {
            "generateContent?"
        };
        let url = format!(
            "{}/models/{}:{}key={}",
            self.base_url, self.model, method, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&Self::body(request))
            .send()
            .await
            .map_err(|e| GenerationError::request("google", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                provider: "google",
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    fn candidate_text(event: &serde_json::Value) -> Option<&str> {
        event["candidates"][0]["content"]["parts"][0]["text"].as_str()
    }
}

#[async_trait]
impl ChatProvider for GoogleGenAiProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, GenerationError> {
        let response = self.send(request, false).await?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenerationError::request("google", &e))?;

        Self::candidate_text(&body)
            .map(ToString::to_string)
            .filter(|s| !s.is_empty())
            .ok_or(GenerationError::EmptyResponse { provider: "google" })
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
                            log::warn!("google stream ended early");
                            break;
                        };
                        for line in decoder.push(&chunk) {
                            let Some(data) = sse_data(&line) else { continue };
                            let Ok(event) = serde_json::from_str::<serde_json::Value>(data) else {
                                continue;
                            };
                            if let Some(delta) = Self::candidate_text(&event) {
                                if !delta.is_empty() && tx.send(delta.to_string()).await.is_err() {
                                    return;
                                }
                            }
                        }
                    }
                }
            }
        });

        Ok(rx)
    }
}
