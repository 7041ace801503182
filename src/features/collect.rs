//! Workspace-wide lookups over every channel the bot can see.

use tracing::{info, warn};

use crate::clients::ChatPlatform;
use crate::core::models::{Channel, ChatMessage, FileMatch};
use crate::errors::BotError;
use crate::utils::filters::filter_report_messages;

/// History of one channel after joining it, or `None` when the channel
/// must be skipped.
async fn joined_history(
    chat: &dyn ChatPlatform,
    channel: &Channel,
    oldest: i64,
) -> Option<Vec<ChatMessage>> {
    if let Err(e) = chat.join_channel(&channel.id).await {
        warn!("Could not join channel {}: {}", channel.name, e);
        return None;
    }
    match chat.channel_history(&channel.id, oldest).await {
        Ok(messages) => Some(messages),
        Err(e) => {
            warn!("Error fetching messages for channel {}: {}", channel.name, e);
            None
        }
    }
}

async fn collect_text(
    chat: &dyn ChatPlatform,
    oldest: i64,
    user_id: Option<&str>,
) -> Result<String, BotError> {
    let channels = chat.list_channels().await?;
    let mut text = String::new();

    for channel in &channels {
        let Some(history) = joined_history(chat, channel, oldest).await else {
            continue;
        };
        let messages = filter_report_messages(history, user_id);
        info!(
            "Found {} messages in channel {} ({})",
            messages.len(),
            channel.name,
            channel.id
        );
        for message in messages {
            text.push_str(&message.text);
            text.push('\n');
        }
    }

    Ok(text)
}

/// Text of every non-join message posted since `oldest`, one per line.
///
/// # Errors
///
/// Fails only if the channel list cannot be read; per-channel failures are
/// logged and skipped.
pub async fn fetch_messages_for_period(
    chat: &dyn ChatPlatform,
    oldest: i64,
) -> Result<String, BotError> {
    collect_text(chat, oldest, None).await
}

/// Like [`fetch_messages_for_period`], restricted to one author.
///
/// # Errors
///
/// Fails only if the channel list cannot be read.
pub async fn fetch_user_messages_for_period(
    chat: &dyn ChatPlatform,
    user_id: &str,
    oldest: i64,
) -> Result<String, BotError> {
    collect_text(chat, oldest, Some(user_id)).await
}

/// Files named exactly `file_name` attached to messages since `oldest`.
///
/// # Errors
///
/// Fails only if the channel list cannot be read.
pub async fn find_files_by_name(
    chat: &dyn ChatPlatform,
    file_name: &str,
    oldest: i64,
) -> Result<Vec<FileMatch>, BotError> {
    let channels = chat.list_channels().await?;
    let mut found = Vec::new();

    for channel in &channels {
        let Some(history) = joined_history(chat, channel, oldest).await else {
            continue;
        };
        for file in history.into_iter().flat_map(|m| m.files) {
            if file.name.as_deref() != Some(file_name) {
                continue;
            }
            let Some(url) = file.url_private else {
                warn!("File {} in {} has no download URL", file.id, channel.name);
                continue;
            };
            found.push(FileMatch {
                channel: channel.name.clone(),
                file_id: file.id,
                file_name: file_name.to_string(),
                file_url: url,
            });
        }
    }

    info!("Found {} files named {}", found.len(), file_name);
    Ok(found)
}

/// Id of the first user whose real name or display name equals `username`.
///
/// # Errors
///
/// Fails if the user list cannot be read.
pub async fn find_user_id_by_name(
    chat: &dyn ChatPlatform,
    username: &str,
) -> Result<Option<String>, BotError> {
    let users = chat.list_users().await?;
    let found = users
        .into_iter()
        .find(|u| {
            u.real_name.as_deref() == Some(username) || u.display_name.as_deref() == Some(username)
        })
        .map(|u| u.id);
    if found.is_none() {
        info!("User '{}' not found", username);
    }
    Ok(found)
}
