use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structure representing a Slack slash command event.
/// Only `text` and `response_url` drive behavior; the rest is kept for logging.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SlackCommandEvent {
    pub team_id: String,
    pub channel_id: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
}

/// Decodes a URL-encoded form component, treating `+` as a space.
///
/// # Examples
///
/// ```
/// use printbot::slack::command_parser::decode_url_component;
///
/// assert_eq!(decode_url_component("hello%20world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("hello+world").unwrap(), "hello world");
/// ```
pub fn decode_url_component(input: &str) -> Result<String, String> {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.to_string())
        .map_err(|e| format!("Failed to decode URL component: {e}"))
}

/// Parses a URL-encoded slash command body.
///
/// Missing fields default to empty strings. A non-empty body with no
/// `key=value` pair at all, or a component that is not valid UTF-8 after
/// decoding, is an error.
///
/// # Examples
///
/// ```
/// use printbot::slack::command_parser::parse_form_data;
///
/// let form_data = "team_id=T123&channel_id=C123&user_id=U123&\
///                  command=%2Fprint_file&text=file_name%3Areport.pdf&\
///                  response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2F1";
///
/// let event = parse_form_data(form_data).unwrap();
/// assert_eq!(event.command, "/print_file");
/// assert_eq!(event.text, "file_name:report.pdf");
/// ```
pub fn parse_form_data(form_data: &str) -> Result<SlackCommandEvent, String> {
    let mut map: HashMap<String, String> = HashMap::new();
    let mut saw_pair = false;

    for pair in form_data.split('&').filter(|p| !p.is_empty()) {
        let Some(idx) = pair.find('=') else {
            continue;
        };
        saw_pair = true;

        let key = decode_url_component(&pair[..idx])
            .map_err(|e| format!("Failed to decode key: {e}"))?;
        let value = decode_url_component(&pair[idx + 1..])
            .map_err(|e| format!("Failed to decode value: {e}"))?;

        map.insert(key, value);
    }

    if !saw_pair && !form_data.trim().is_empty() {
        return Err("Body is not form-encoded".to_string());
    }

    let mut field = |name: &str| map.remove(name).unwrap_or_default();

    Ok(SlackCommandEvent {
        team_id: field("team_id"),
        channel_id: field("channel_id"),
        user_id: field("user_id"),
        user_name: field("user_name"),
        command: field("command"),
        text: field("text"),
        response_url: field("response_url"),
        trigger_id: field("trigger_id"),
    })
}
