//! LLM (`OpenAI`) API client module
//!
//! Chat completions for reports and translations, image generation for `/art`.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;

use crate::clients::{CompletionRequest, Completions};
use crate::core::config::AppConfig;
use crate::errors::BotError;

const IMAGE_SIZE: &str = "1024x1024";
const IMAGE_QUALITY: &str = "standard";

/// LLM API client for completions and image generation
pub struct LlmClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    image_model_name: String,
    base_url: String,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, BotError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| BotError::HttpError(format!("Failed to build OpenAI HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: config.openai_api_key.clone(),
            org_id: config.openai_org_id.clone(),
            model_name: config.openai_model.clone(),
            image_model_name: config.openai_image_model.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn headers(&self) -> Result<HeaderMap, BotError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", self.api_key)
            .parse()
            .map_err(|e| BotError::HttpError(format!("Invalid Authorization header: {e}")))?;
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(org) = &self.org_id {
            let org_value = org.parse().map_err(|e| {
                BotError::HttpError(format!("Invalid OpenAI-Organization header: {e}"))
            })?;
            headers.insert("OpenAI-Organization", org_value);
        }

        Ok(headers)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, BotError> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .headers(self.headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::HttpError(format!("OpenAI API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(BotError::OpenAIError(format!(
                "OpenAI API error (status {status}): {error_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BotError::OpenAIError(format!("Failed to parse OpenAI response: {e}")))
    }
}

#[async_trait]
impl Completions for LlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BotError> {
        let prompt = build_prompt(&request.system, &request.user);

        #[cfg(feature = "debug-logs")]
        info!("Using completion prompt:\n{:?}", prompt);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            model = %self.model_name,
            input_chars = request.user.chars().count(),
            "Requesting chat completion"
        );

        let body = json!({
            "model": self.model_name,
            "messages": to_wire_messages(&prompt),
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });

        let response_json = self.post_json("/v1/chat/completions", &body).await?;
        extract_completion_text(&response_json)
            .ok_or_else(|| BotError::OpenAIError("No text in response".to_string()))
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, BotError> {
        info!(model = %self.image_model_name, "Requesting image generation");

        let body = json!({
            "model": self.image_model_name,
            "prompt": prompt,
            "size": IMAGE_SIZE,
            "quality": IMAGE_QUALITY,
            "n": 1,
        });

        let response_json = self.post_json("/v1/images/generations", &body).await?;
        extract_image_url(&response_json)
            .ok_or_else(|| BotError::OpenAIError("No image URL in response".to_string()))
    }
}

#[must_use]
pub fn build_prompt(system: &str, user: &str) -> Vec<ChatCompletionMessage> {
    vec![
        ChatCompletionMessage {
            role: MessageRole::system,
            content: Content::Text(system.to_string()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        },
        ChatCompletionMessage {
            role: MessageRole::user,
            content: Content::Text(user.to_string()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        },
    ]
}

/// Converts prompt messages into the Chat Completions wire shape.
/// Image parts are dropped; the bot only sends text prompts.
pub(crate) fn to_wire_messages(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .filter_map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                MessageRole::user | MessageRole::function | MessageRole::tool => "user",
                MessageRole::assistant => "assistant",
            };
            match &m.content {
                Content::Text(t) => Some(json!({ "role": role_str, "content": t })),
                Content::ImageUrl(_) => None,
            }
        })
        .collect()
}

pub(crate) fn extract_completion_text(response: &Value) -> Option<String> {
    response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
}

pub(crate) fn extract_image_url(response: &Value) -> Option<String> {
    response
        .get("data")
        .and_then(Value::as_array)
        .and_then(|data| data.first())
        .and_then(|item| item.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
