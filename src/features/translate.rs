use async_trait::async_trait;
use chrono::{DateTime, Local};
use tracing::info;

use super::print_file::{Fetched, fetch_named_file};
use super::{Services, blocking, render_and_print};
use crate::ai::prompt_builder::translation_request;
use crate::core::models::{CallbackMessage, Language};
use crate::documents::extract_text;
use crate::errors::BotError;
use crate::utils::mime::resolve_content_type;
use crate::worker::Command;

pub const NO_TEXT_EXTRACTED: &str = "No text extracted.";

/// `/print_translate`: extracts a shared document's text, translates it and
/// prints the translation.
#[derive(Debug, Clone)]
pub struct PrintTranslate {
    file_name: String,
    /// Lower-cased but not yet validated.
    language: String,
    now: DateTime<Local>,
}

impl PrintTranslate {
    pub const ACKNOWLEDGMENT: &'static str = "Processing and translating your file...";

    #[must_use]
    pub fn new(file_name: impl Into<String>, language: impl Into<String>) -> Self {
        Self::at(file_name, language, Local::now())
    }

    #[must_use]
    pub fn at(
        file_name: impl Into<String>,
        language: impl Into<String>,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            language: language.into(),
            now,
        }
    }
}

#[async_trait]
impl Command for PrintTranslate {
    fn name(&self) -> &'static str {
        "print_translate"
    }

    async fn run(&self, services: &Services) -> Result<CallbackMessage, BotError> {
        let language: Language = self.language.parse().map_err(BotError::GeneralError)?;

        let (found, bytes, content_type) =
            match fetch_named_file(services, &self.file_name, self.now).await? {
                Fetched::File {
                    found,
                    bytes,
                    content_type,
                } => (found, bytes, content_type),
                Fetched::Missing(message) => return Ok(message),
            };

        let mime = resolve_content_type(&content_type, &found.file_name);
        let extraction = blocking(move || extract_text(&bytes, &mime)).await?;
        let translated = match extraction.into_text() {
            Some(text) => {
                info!(chars = text.chars().count(), language = %language, "Translating");
                services
                    .llm
                    .complete(translation_request(&text, language))
                    .await?
            }
            None => NO_TEXT_EXTRACTED.to_string(),
        };

        let job_id = render_and_print(services, &translated).await?;

        Ok(CallbackMessage::text(format!(
            "Original File URL: {}\nLanguage: {}\nPrint Job ID: {}\n",
            found.file_url, language, job_id
        )))
    }

    fn failure(&self, error: &BotError) -> CallbackMessage {
        CallbackMessage::text(format!("Error processing file: {error}"))
    }
}
