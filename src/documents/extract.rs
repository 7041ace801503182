//! Plain-text extraction from PDF, Word and PowerPoint files.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::io::{Cursor, Read};
use tracing::{info, warn};
use zip::ZipArchive;

use crate::core::models::DocumentKind;
use crate::errors::BotError;
use crate::utils::mime::canonicalize_mime;

/// Outcome of [`extract_text`]. An unsupported type is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Text(String),
    Unsupported(String),
}

impl Extraction {
    /// The extracted text, if any was found.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Extraction::Text(t) if !t.trim().is_empty() => Some(t),
            _ => None,
        }
    }
}

/// Extracts text according to the declared MIME type.
///
/// # Errors
///
/// Returns an error when the type is supported but the bytes are not a
/// readable document of that type.
pub fn extract_text(bytes: &[u8], mime: &str) -> Result<Extraction, BotError> {
    let canonical = canonicalize_mime(mime);
    let Some(kind) = DocumentKind::from_mime(&canonical) else {
        warn!("Unsupported content type: {}", canonical);
        return Ok(Extraction::Unsupported(canonical));
    };

    info!(kind = ?kind, size = bytes.len(), "Extracting document text");
    let text = match kind {
        DocumentKind::Pdf => pdf_to_text(bytes)?,
        DocumentKind::WordDoc => docx_to_text(bytes)?,
        DocumentKind::PowerPoint => pptx_to_text(bytes)?,
    };
    Ok(Extraction::Text(text))
}

fn pdf_to_text(bytes: &[u8]) -> Result<String, BotError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| BotError::DocumentError(format!("PDF: {e}")))
}

fn docx_to_text(bytes: &[u8]) -> Result<String, BotError> {
    let mut archive = open_archive(bytes)?;
    let xml = read_entry(&mut archive, "word/document.xml")?;
    let text = collect_text(&xml, b"w:t", b"w:p")?;
    Ok(text.trim_end().to_string())
}

fn pptx_to_text(bytes: &[u8]) -> Result<String, BotError> {
    let mut archive = open_archive(bytes)?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort_unstable();

    let mut out = Vec::with_capacity(slides.len());
    for (_, name) in slides {
        let xml = read_entry(&mut archive, &name)?;
        let text = collect_text(&xml, b"a:t", b"a:p")?;
        let text = text.trim_end();
        if !text.is_empty() {
            out.push(text.to_string());
        }
    }
    Ok(out.join("\n\n"))
}

fn open_archive(bytes: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>, BotError> {
    ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| BotError::DocumentError(format!("not an Office document: {e}")))
}

fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<String, BotError> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| BotError::DocumentError(format!("{name}: {e}")))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| BotError::DocumentError(format!("{name}: {e}")))?;
    Ok(xml)
}

/// `ppt/slides/slide12.xml` -> `Some(12)`
fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Concatenates the text of every `text_tag` element, ending a line at each
/// closing `paragraph_tag`.
fn collect_text(xml: &str, text_tag: &[u8], paragraph_tag: &[u8]) -> Result<String, BotError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == text_tag {
                    in_text = true;
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if name.as_ref() == text_tag {
                    in_text = false;
                } else if name.as_ref() == paragraph_tag {
                    out.push('\n');
                }
            }
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"a:br" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| BotError::DocumentError(format!("XML text: {e}")))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(BotError::DocumentError(format!(
                    "XML error at position {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    Ok(out)
}
