use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::BotError;
use crate::slack::command_parser::{SlackCommandEvent, parse_form_data};

static FILE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"file_name:(\S+)").expect("static regex compile"));
static LANGUAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"language:(\S+)").expect("static regex compile"));

pub fn parse_slack_event(payload: &str) -> Result<SlackCommandEvent, BotError> {
    parse_form_data(payload)
        .map_err(|e| BotError::ParseError(format!("Failed to parse form data: {e}")))
}

fn first_capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Value of the first `file_name:<value>` token, or an empty string.
#[must_use]
pub fn parse_file_name(text: &str) -> String {
    first_capture(&FILE_NAME_RE, text)
}

/// `(file_name, language)` from `/print_translate` text. The language is
/// lower-cased; either part is empty when its token is absent.
#[must_use]
pub fn parse_translate_params(text: &str) -> (String, String) {
    (
        parse_file_name(text),
        first_capture(&LANGUAGE_RE, text).to_lowercase(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_file_name_and_lowercased_language() {
        assert_eq!(
            parse_translate_params("file_name:report.pdf language:French"),
            ("report.pdf".to_string(), "french".to_string())
        );
    }

    #[test]
    fn missing_tokens_default_to_empty() {
        assert_eq!(
            parse_translate_params("please print my report"),
            (String::new(), String::new())
        );
        assert_eq!(parse_file_name(""), "");
    }

    #[test]
    fn token_marker_is_case_sensitive() {
        assert_eq!(parse_file_name("File_Name:report.pdf"), "");
        assert_eq!(parse_file_name("  file_name:Q1.pdf  extra"), "Q1.pdf");
    }
}
