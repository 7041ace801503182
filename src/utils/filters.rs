use crate::core::models::ChatMessage;

/// Drops `channel_join` notices, and when `user_id` is given, anything not
/// posted by that user.
#[must_use]
pub fn filter_report_messages(messages: Vec<ChatMessage>, user_id: Option<&str>) -> Vec<ChatMessage> {
    messages
        .into_iter()
        .filter(|msg| {
            let from_requested_user = match user_id {
                Some(id) => msg.user.as_deref() == Some(id),
                None => true,
            };
            !msg.is_channel_join && from_requested_user
        })
        .collect()
}
