//! Slack API client module
//!
//! Wraps `slack-morphism` sessions for the Web API calls the commands need and
//! uses `reqwest` for authenticated file downloads. Every call is attempted once.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use slack_morphism::events::SlackMessageEventType;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::{
    SlackApiConversationsHistoryRequest, SlackApiConversationsJoinRequest,
    SlackApiConversationsListRequest, SlackApiUsersListRequest,
};
use slack_morphism::{
    SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackHistoryMessage, SlackTs,
};
use std::time::Duration;
use tracing::{debug, info};

use crate::clients::ChatPlatform;
use crate::core::models::{Channel, ChatFile, ChatMessage, ChatUser, Download};
use crate::errors::BotError;

const PAGE_LIMIT: u16 = 200;

/// Slack returns this when joining DMs, group DMs and the like; it is not a failure.
const ERROR_METHOD_NOT_SUPPORTED: &str = "method_not_supported_for_channel_type";

/// Slack Web API client authenticated with the bot token
pub struct SlackClient {
    client: SlackHyperClient,
    token: SlackApiToken,
    bot_token: String,
    http: Client,
}

impl SlackClient {
    /// # Errors
    ///
    /// Returns an error if the HTTPS connector or the download client cannot be built.
    pub fn new(token: String) -> Result<Self, BotError> {
        let connector = SlackClientHyperConnector::new().map_err(|e| {
            BotError::GeneralError(format!("Failed to create Slack HTTP connector: {e}"))
        })?;
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| BotError::HttpError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client: SlackHyperClient::new(connector),
            token: SlackApiToken::new(SlackApiTokenValue::new(token.clone())),
            bot_token: token,
            http,
        })
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn list_channels(&self) -> Result<Vec<Channel>, BotError> {
        let session = self.client.open_session(&self.token);
        let mut channels = Vec::new();
        let mut cursor = None;

        loop {
            let mut request = SlackApiConversationsListRequest::new().with_limit(PAGE_LIMIT);
            if let Some(c) = cursor.take() {
                request = request.with_cursor(c);
            }

            let response = session.conversations_list(&request).await?;
            channels.extend(response.channels.into_iter().map(|info| {
                let id = info.id.0;
                Channel {
                    name: info.name.unwrap_or_else(|| id.clone()),
                    id,
                }
            }));

            cursor = response
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.0.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        info!("Listed {} channels", channels.len());
        Ok(channels)
    }

    async fn join_channel(&self, channel_id: &str) -> Result<(), BotError> {
        let session = self.client.open_session(&self.token);
        let request = SlackApiConversationsJoinRequest::new(SlackChannelId(channel_id.to_string()));

        match session.conversations_join(&request).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let msg = e.to_string();
                if msg.contains(ERROR_METHOD_NOT_SUPPORTED) {
                    debug!("Channel {} cannot be joined; reading anyway", channel_id);
                    Ok(())
                } else {
                    Err(BotError::ApiError(msg))
                }
            }
        }
    }

    async fn channel_history(
        &self,
        channel_id: &str,
        oldest: i64,
    ) -> Result<Vec<ChatMessage>, BotError> {
        let session = self.client.open_session(&self.token);
        let mut messages = Vec::new();
        let mut cursor = None;

        loop {
            let mut request = SlackApiConversationsHistoryRequest::new()
                .with_channel(SlackChannelId(channel_id.to_string()))
                .with_oldest(SlackTs(oldest.to_string()))
                .with_limit(PAGE_LIMIT);
            if let Some(c) = cursor.take() {
                request = request.with_cursor(c);
            }

            let response = session.conversations_history(&request).await?;
            let has_more = response.has_more.unwrap_or(false);
            messages.extend(response.messages.into_iter().map(to_chat_message));

            cursor = response
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.0.is_empty());
            if !has_more || cursor.is_none() {
                break;
            }
        }

        Ok(messages)
    }

    async fn list_users(&self) -> Result<Vec<ChatUser>, BotError> {
        let session = self.client.open_session(&self.token);
        let mut users = Vec::new();
        let mut cursor = None;

        loop {
            let mut request = SlackApiUsersListRequest::new().with_limit(PAGE_LIMIT);
            if let Some(c) = cursor.take() {
                request = request.with_cursor(c);
            }

            let response = session.users_list(&request).await?;
            users.extend(response.members.into_iter().map(|member| {
                let (real_name, display_name) = member
                    .profile
                    .map(|p| (p.real_name, p.display_name))
                    .unwrap_or((None, None));
                ChatUser {
                    id: member.id.0,
                    real_name,
                    display_name,
                }
            }));

            cursor = response
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.0.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        Ok(users)
    }

    async fn download_file(&self, url: &str) -> Result<Download, BotError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.bot_token)
            .send()
            .await
            .map_err(|e| BotError::HttpError(format!("Failed to download Slack file: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Ok(Download::Failed {
                status: status.as_u16(),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| BotError::HttpError(format!("Error reading Slack file body: {e}")))?;

        Ok(Download::Fetched {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

fn to_chat_message(msg: SlackHistoryMessage) -> ChatMessage {
    let is_channel_join = matches!(msg.subtype, Some(SlackMessageEventType::ChannelJoin));
    let files = msg
        .content
        .files
        .unwrap_or_default()
        .into_iter()
        .map(|f| ChatFile {
            id: f.id.0,
            name: f.name,
            url_private: f.url_private.map(|u| u.to_string()),
        })
        .collect();

    ChatMessage {
        user: msg.sender.user.map(|u| u.0),
        text: msg.content.text.unwrap_or_default(),
        is_channel_join,
        files,
    }
}
