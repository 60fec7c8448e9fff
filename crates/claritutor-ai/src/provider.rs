use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use claritutor_storage::models::{AiConfig, AiProvider, Role};

use crate::providers::{
    anthropic::AnthropicProvider, google::GoogleGenAiProvider, ollama::OllamaProvider,
    openai::OpenAiProvider,
};

/// One role-attributed turn sent to a provider
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A chat completion request. The model is the provider's configured one;
/// temperature and output budget vary per call site.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: Option<String>,
    pub turns: Vec<Turn>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// A single-question request with a system directive - the shape used
    /// by every auxiliary analysis.
    #[must_use]
    pub fn single(system: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            turns: vec![Turn::new(Role::User, user_text)],
            temperature: 0.3,
            max_tokens: 256,
        }
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Chat generation failure. Callers surface this once and allow a resend;
/// there is no automatic retry.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to {provider} failed: {message}")]
    Request {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("no usable content in {provider} response")]
    EmptyResponse { provider: &'static str },

    #[error("API key required for {provider}")]
    MissingApiKey { provider: &'static str },

    #[error("AI tutoring is disabled in configuration")]
    Disabled,
}

impl GenerationError {
    pub(crate) fn request(provider: &'static str, error: &reqwest::Error) -> Self {
        Self::Request {
            provider,
            message: error.to_string(),
        }
    }
}

/// Trait for AI chat providers
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for diagnostics
    fn name(&self) -> &'static str;

    /// Get the model name being used
    fn model_name(&self) -> &str;

    /// Generate a complete reply for the request
    async fn complete(&self, request: &ChatRequest) -> Result<String, GenerationError>;

    /// Generate a reply as a lazy sequence of text chunks.
    ///
    /// The returned channel closes when the reply is complete, the stream is
    /// cut off, or `cancel` fires. A cut-off stream is not an error: whatever
    /// chunks arrived are best-effort content.
    async fn stream(
        &self,
        request: &ChatRequest,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<String>, GenerationError>;
}

/// Create a provider instance based on configuration
///
/// # Errors
///
/// Returns an error if the API key is missing for providers that require one
/// (`OpenAI`, Anthropic, Google).
pub fn create_provider(config: &AiConfig) -> Result<Box<dyn ChatProvider>, GenerationError> {
    let model = config.effective_model().to_string();
    let api_key = config.effective_api_key();
    let base_url = config.effective_base_url();

    match config.provider {
        AiProvider::OpenAi => {
            let api_key = api_key.ok_or(GenerationError::MissingApiKey { provider: "openai" })?;
            Ok(Box::new(OpenAiProvider::new(&api_key, &model, &base_url)))
        }
        AiProvider::Anthropic => {
            let api_key = api_key.ok_or(GenerationError::MissingApiKey {
                provider: "anthropic",
            })?;
            Ok(Box::new(AnthropicProvider::new(&api_key, &model, &base_url)))
        }
        AiProvider::Google => {
            let api_key = api_key.ok_or(GenerationError::MissingApiKey { provider: "google" })?;
            Ok(Box::new(GoogleGenAiProvider::new(
                &api_key, &model, &base_url,
            )))
        }
        AiProvider::Ollama => Ok(Box::new(OllamaProvider::new(&model, &base_url))),
    }
}
