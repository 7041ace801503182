use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::slack::response_builder::{create_artwork_payload, create_text_payload};

/// Target languages accepted by `/print_translate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    Japanese,
    Hindi,
    French,
    Russian,
}

impl Language {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Spanish => "spanish",
            Language::Japanese => "japanese",
            Language::Hindi => "hindi",
            Language::French => "french",
            Language::Russian => "russian",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    /// Matches the lower-case language name exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "english" => Ok(Language::English),
            "spanish" => Ok(Language::Spanish),
            "japanese" => Ok(Language::Japanese),
            "hindi" => Ok(Language::Hindi),
            "french" => Ok(Language::French),
            "russian" => Ok(Language::Russian),
            other => Err(format!("'{other}' is not a valid language")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.as_str();
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}

/// Document formats the text extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    WordDoc,
    PowerPoint,
}

impl DocumentKind {
    pub const PDF_MIME: &'static str = "application/pdf";
    pub const WORD_DOC_MIME: &'static str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
    pub const POWERPOINT_MIME: &'static str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation";

    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            Self::PDF_MIME => Some(DocumentKind::Pdf),
            Self::WORD_DOC_MIME => Some(DocumentKind::WordDoc),
            Self::POWERPOINT_MIME => Some(DocumentKind::PowerPoint),
            _ => None,
        }
    }

    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            DocumentKind::Pdf => Self::PDF_MIME,
            DocumentKind::WordDoc => Self::WORD_DOC_MIME,
            DocumentKind::PowerPoint => Self::POWERPOINT_MIME,
        }
    }
}

/// Look-back window for the workspace report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Weekly,
    Monthly,
    Yearly,
}

impl ReportPeriod {
    #[must_use]
    pub fn weeks(self) -> i64 {
        match self {
            ReportPeriod::Weekly => 1,
            ReportPeriod::Monthly => 4,
            ReportPeriod::Yearly => 52,
        }
    }

    /// Capitalized adjective, e.g. `Weekly`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "Weekly",
            ReportPeriod::Monthly => "Monthly",
            ReportPeriod::Yearly => "Yearly",
        }
    }

    /// Lower-case noun, e.g. `week`.
    #[must_use]
    pub fn noun(self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "week",
            ReportPeriod::Monthly => "month",
            ReportPeriod::Yearly => "year",
        }
    }
}

/// A public channel as returned by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// A file attached to a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatFile {
    pub id: String,
    /// `None` when Slack omits the name; such a file never matches a search.
    pub name: Option<String>,
    pub url_private: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatMessage {
    pub user: Option<String>,
    pub text: String,
    /// `true` for `channel_join` system messages.
    pub is_channel_join: bool,
    pub files: Vec<ChatFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub id: String,
    pub real_name: Option<String>,
    pub display_name: Option<String>,
}

/// A file located by name search, with the channel it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatch {
    pub channel: String,
    pub file_id: String,
    pub file_name: String,
    pub file_url: String,
}

/// Result of fetching a private file from the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Download {
    Fetched { bytes: Vec<u8>, content_type: String },
    Failed { status: u16 },
}

/// The single terminal payload posted to a command's `response_url`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackMessage {
    payload: Value,
}

impl CallbackMessage {
    #[must_use]
    pub fn text(text: impl AsRef<str>) -> Self {
        Self {
            payload: create_text_payload(text.as_ref()),
        }
    }

    #[must_use]
    pub fn artwork(image_url: &str) -> Self {
        Self {
            payload: create_artwork_payload(image_url),
        }
    }

    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        self.payload.get("text").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_lowercase_names_only() {
        assert_eq!("french".parse::<Language>(), Ok(Language::French));
        assert!("French".parse::<Language>().is_err());
        assert_eq!(
            "klingon".parse::<Language>().unwrap_err(),
            "'klingon' is not a valid language"
        );
    }

    #[test]
    fn language_displays_capitalized() {
        assert_eq!(Language::Japanese.to_string(), "Japanese");
    }

    #[test]
    fn document_kind_round_trips_mime() {
        for kind in [DocumentKind::Pdf, DocumentKind::WordDoc, DocumentKind::PowerPoint] {
            assert_eq!(DocumentKind::from_mime(kind.mime()), Some(kind));
        }
        assert_eq!(DocumentKind::from_mime("text/plain"), None);
    }

    #[test]
    fn callback_text_payload_has_only_text() {
        let msg = CallbackMessage::text("done");
        assert_eq!(msg.payload(), &serde_json::json!({ "text": "done" }));
        assert_eq!(msg.text_content(), Some("done"));
    }
}
