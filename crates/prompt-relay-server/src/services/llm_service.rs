use crate::config::LlmConfig;
use crate::models::chat::ChatMessage;
use crate::utils::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Seam over the model provider so handlers can be exercised without a
/// network backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ApiError>;
}

#[derive(Clone)]
pub struct LlmService {
    client: Client,
    config: LlmConfig,
}

impl LlmService {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }

    /// Generate the next assistant turn from the full accumulated history.
    pub async fn generate_chat(&self, messages: &[ChatMessage]) -> Result<String, ApiError> {
        debug!("Starting chat generation with {} messages", messages.len());

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Provider(format!("Failed to call model provider: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Provider(format!(
                "Model provider error: {} - {}",
                status,
                provider_error_detail(&body)
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            ApiError::Provider(format!("Failed to parse provider response: {}", e))
        })?;

        completion
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| ApiError::Provider("No choices returned from model provider".to_string()))
    }
}

/// Pull the human-readable message out of an OpenAI-style error payload,
/// falling back to the raw body.
fn provider_error_detail(body: &str) -> String {
    serde_json::from_str::<ProviderErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl CompletionProvider for LlmService {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ApiError> {
        self.generate_chat(messages).await
    }
}
