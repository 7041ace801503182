//! Payload builders for messages posted back to Slack.
//!
//! Slash-command acknowledgments and `response_url` callbacks share the same
//! minimal shape: a JSON object with a `text` field.

use serde_json::{Value, json};

/// Create the plain `{"text": ...}` payload used for acknowledgments and callbacks.
///
/// # Examples
///
/// ```
/// use printbot::slack::response_builder::create_text_payload;
///
/// let payload = create_text_payload("Processing...");
/// assert_eq!(payload["text"], "Processing...");
/// ```
#[must_use]
pub fn create_text_payload(text: &str) -> Value {
    json!({ "text": text })
}

/// Create the in-channel payload that shows a generated image as an attachment.
#[must_use]
pub fn create_artwork_payload(image_url: &str) -> Value {
    json!({
        "response_type": "in_channel",
        "text": "Here is your artwork:",
        "attachments": [
            {
                "fallback": "Your generated artwork",
                "image_url": image_url,
                "title": "Generated Artwork",
                "text": "Enjoy your custom creation!"
            }
        ]
    })
}
