//! Seams for the external services a background task talks to.
//!
//! Each trait has one production implementation (Slack, `OpenAI`, Epson Connect,
//! plain HTTP for `response_url`) and is implemented by in-memory fakes in tests.

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

use crate::core::models::{Channel, ChatMessage, ChatUser, Download};
use crate::errors::BotError;

/// Read access to the team chat workspace.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// All channels visible to the bot, following pagination to the end.
    async fn list_channels(&self) -> Result<Vec<Channel>, BotError>;

    /// Joins a channel. Channel types that cannot be joined count as success.
    async fn join_channel(&self, channel_id: &str) -> Result<(), BotError>;

    /// Messages posted at or after `oldest` (unix seconds), following pagination.
    async fn channel_history(
        &self,
        channel_id: &str,
        oldest: i64,
    ) -> Result<Vec<ChatMessage>, BotError>;

    async fn list_users(&self) -> Result<Vec<ChatUser>, BotError>;

    /// Fetches a private file URL with bot authorization.
    async fn download_file(&self, url: &str) -> Result<Download, BotError>;
}

/// Parameters for a single chat completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Text and image generation.
#[async_trait]
pub trait Completions: Send + Sync {
    /// Returns the trimmed text of the first choice.
    async fn complete(&self, request: CompletionRequest) -> Result<String, BotError>;

    /// Returns the URL of one generated image.
    async fn generate_image(&self, prompt: &str) -> Result<String, BotError>;
}

/// Submits local files to a cloud printer.
#[async_trait]
pub trait PrintGateway: Send + Sync {
    /// Returns the gateway's job identifier.
    async fn print(&self, path: &Path) -> Result<String, BotError>;
}

/// Delivers a terminal payload to a caller-supplied callback URL.
#[async_trait]
pub trait CallbackSink: Send + Sync {
    async fn deliver(&self, callback_url: &str, payload: &Value) -> Result<(), BotError>;
}
