use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

use crate::clients::CallbackSink;
use crate::errors::BotError;

/// Posts terminal payloads to Slack `response_url`s.
pub struct HttpCallbackSink {
    http: HttpClient,
}

impl HttpCallbackSink {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self, BotError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BotError::HttpError(format!("Failed to build callback client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl CallbackSink for HttpCallbackSink {
    /// A non-2xx answer is logged and swallowed; the outcome is never resent.
    async fn deliver(&self, callback_url: &str, payload: &Value) -> Result<(), BotError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let resp = self
            .http
            .post(callback_url)
            .headers(headers)
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            info!("response_url POST delivered: status={}", status);
        } else {
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!(
                "response_url POST failed: status={} body={}",
                status, body_text
            );
        }
        Ok(())
    }
}
