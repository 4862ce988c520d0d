//! OpenAI Chat Completions API integration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use askbench_core::error::{BenchError, ModelError, Result};
use askbench_core::message::Message;
use askbench_core::model::ChatModel;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

// ---------------------------------------------------------------------------
// Chat Completions API request/response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ApiChoice {
    pub message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

// ---------------------------------------------------------------------------
// OpenAiChatModel
// ---------------------------------------------------------------------------

pub struct OpenAiChatModel {
    api_key: String,
    model_id: String,
    api_url: String,
    client: reqwest::Client,
}

impl OpenAiChatModel {
    pub fn new(api_key: String, model_id: String) -> Self {
        Self {
            api_key,
            model_id,
            api_url: DEFAULT_API_URL.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a non-default endpoint (proxies, test servers).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn build_request(&self, messages: &[Message]) -> ChatRequest {
        let api_messages = messages
            .iter()
            .map(|msg| ApiMessage {
                role: msg.role().into(),
                content: msg.content().into(),
            })
            .collect();

        ChatRequest {
            model: self.model_id.clone(),
            messages: api_messages,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn generate(&self, messages: &[Message]) -> Result<String> {
        let request_body = self.build_request(messages);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| BenchError::Model(ModelError::ApiRequest(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read response body".into());
            let error_msg = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(BenchError::Model(match status.as_u16() {
                401 => ModelError::Auth(error_msg),
                429 => ModelError::RateLimited {
                    retry_after_secs: None,
                },
                _ => ModelError::ApiRequest(format!("HTTP {status}: {error_msg}")),
            }));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| BenchError::Model(ModelError::InvalidResponse(e.to_string())))?;

        let text = api_response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| {
                BenchError::Model(ModelError::InvalidResponse(
                    "response contained no message content".into(),
                ))
            })?;

        Ok(text.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.model_id
    }
}
