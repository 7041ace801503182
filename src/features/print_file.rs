use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::path::Path;
use tracing::{info, warn};

use super::collect::find_files_by_name;
use super::{Services, discard, temp_file, window_start};
use crate::core::models::{CallbackMessage, Download, FileMatch};
use crate::errors::BotError;
use crate::worker::Command;

/// How far back file searches look.
pub const FILE_SEARCH_WEEKS: i64 = 52;

pub const NO_FILES_FOUND: &str = "No files found with the specified name.";

/// `/print_file`: finds a shared file by name and prints it as is.
#[derive(Debug, Clone)]
pub struct PrintFile {
    file_name: String,
    now: DateTime<Local>,
}

impl PrintFile {
    pub const ACKNOWLEDGMENT: &'static str = "Processing your file for printing...";

    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self::at(file_name, Local::now())
    }

    #[must_use]
    pub fn at(file_name: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            file_name: file_name.into(),
            now,
        }
    }
}

/// What a file lookup plus download produced.
pub(crate) enum Fetched {
    File {
        found: FileMatch,
        bytes: Vec<u8>,
        content_type: String,
    },
    Missing(CallbackMessage),
}

/// Finds the first file named `file_name` within the search window and
/// downloads it.
pub(crate) async fn fetch_named_file(
    services: &Services,
    file_name: &str,
    now: DateTime<Local>,
) -> Result<Fetched, BotError> {
    let oldest = window_start(now, FILE_SEARCH_WEEKS).timestamp();
    let matches = find_files_by_name(services.chat.as_ref(), file_name, oldest).await?;
    let Some(found) = matches.into_iter().next() else {
        return Ok(Fetched::Missing(CallbackMessage::text(NO_FILES_FOUND)));
    };

    match services.chat.download_file(&found.file_url).await? {
        Download::Fetched {
            bytes,
            content_type,
        } => {
            info!(size = bytes.len(), content_type = %content_type, "Downloaded {}", found.file_name);
            Ok(Fetched::File {
                found,
                bytes,
                content_type,
            })
        }
        Download::Failed { status } => {
            warn!("Download of {} failed with status {}", found.file_url, status);
            Ok(Fetched::Missing(CallbackMessage::text(format!(
                "Failed to download file from URL: {}",
                found.file_url
            ))))
        }
    }
}

/// `.pdf` for `report.pdf`, empty when there is no extension.
fn suffix_for(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

#[async_trait]
impl Command for PrintFile {
    fn name(&self) -> &'static str {
        "print_file"
    }

    async fn run(&self, services: &Services) -> Result<CallbackMessage, BotError> {
        let (found, bytes) = match fetch_named_file(services, &self.file_name, self.now).await? {
            Fetched::File { found, bytes, .. } => (found, bytes),
            Fetched::Missing(message) => return Ok(message),
        };

        let local = temp_file(&suffix_for(&found.file_name))?;
        tokio::fs::write(local.path(), &bytes).await?;
        let job_id = services.printer.print(local.path()).await?;
        discard(local);

        Ok(CallbackMessage::text(format!(
            "File '{}' has been sent to the printer.\nFile URL: {}\nPrint Job ID: {}",
            found.file_name, found.file_url, job_id
        )))
    }

    fn failure(&self, error: &BotError) -> CallbackMessage {
        CallbackMessage::text(format!("Error processing file: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_keeps_the_original_extension() {
        assert_eq!(suffix_for("Q1.pdf"), ".pdf");
        assert_eq!(suffix_for("photo.final.jpeg"), ".jpeg");
        assert_eq!(suffix_for("README"), "");
    }
}
