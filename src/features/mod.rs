//! Slash command implementations run by the background dispatcher.

pub mod art;
pub mod collect;
pub mod print_file;
pub mod reports;
pub mod translate;

use chrono::{DateTime, Duration, Local};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::warn;

use crate::clients::{ChatPlatform, Completions, PrintGateway};
use crate::documents::PdfRenderer;
use crate::errors::BotError;

pub use art::GenerateArtwork;
pub use print_file::PrintFile;
pub use reports::{PrintUserReport, PrintWorkspaceReport};
pub use translate::PrintTranslate;

/// Collaborators shared by every background task.
pub struct Services {
    pub chat: Arc<dyn ChatPlatform>,
    pub llm: Arc<dyn Completions>,
    pub printer: Arc<dyn PrintGateway>,
    pub renderer: PdfRenderer,
}

impl Services {
    #[must_use]
    pub fn new(
        chat: Arc<dyn ChatPlatform>,
        llm: Arc<dyn Completions>,
        printer: Arc<dyn PrintGateway>,
        renderer: PdfRenderer,
    ) -> Self {
        Self {
            chat,
            llm,
            printer,
            renderer,
        }
    }
}

/// Start of a look-back window of `weeks` weeks ending at `now`.
pub(crate) fn window_start(now: DateTime<Local>, weeks: i64) -> DateTime<Local> {
    now - Duration::weeks(weeks)
}

/// A uniquely named temp file, removed when dropped.
pub(crate) fn temp_file(suffix: &str) -> Result<NamedTempFile, BotError> {
    Ok(tempfile::Builder::new()
        .prefix("printbot-")
        .suffix(suffix)
        .tempfile()?)
}

/// Removes a temp file now so a failed removal shows up in the logs.
pub(crate) fn discard(file: NamedTempFile) {
    let path = file.path().to_path_buf();
    if let Err(e) = file.close() {
        warn!("Failed to remove temp file {}: {}", path.display(), e);
    }
}

/// Runs CPU- or file-bound work on the blocking pool. A panic inside `work`
/// comes back as an error.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, BotError>
where
    F: FnOnce() -> Result<T, BotError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| BotError::GeneralError(format!("blocking task failed: {e}")))?
}

/// Renders `text` to a temp PDF and submits it, returning the job id.
/// The PDF is removed on every path.
pub(crate) async fn render_and_print(services: &Services, text: &str) -> Result<String, BotError> {
    let pdf = temp_file(".pdf")?;
    let renderer = services.renderer;
    let (text, path) = (text.to_string(), pdf.path().to_path_buf());
    blocking(move || renderer.render(&text, &path)).await?;
    let job_id = services.printer.print(pdf.path()).await?;
    discard(pdf);
    Ok(job_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blocking_returns_the_work_result() {
        let value = blocking(|| Ok::<_, BotError>(42)).await.unwrap();
        assert_eq!(value, 42);

        let err = blocking(|| Err::<(), _>(BotError::PdfError("bad font".to_string())))
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::PdfError(_)));
    }

    #[tokio::test]
    async fn blocking_turns_a_panic_into_an_error() {
        let err = blocking(|| -> Result<(), BotError> { panic!("renderer blew up") })
            .await
            .unwrap_err();
        assert!(
            matches!(err, BotError::GeneralError(ref m) if m.starts_with("blocking task failed"))
        );
    }
}
