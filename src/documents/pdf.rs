//! Plain-text to PDF rendering.
//!
//! Layout is fixed: US Letter, Helvetica 12 pt, 40 pt margins and a 14 pt
//! line pitch. Long lines are hard-wrapped by character count, never by word.

use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::core::config::DEFAULT_MAX_CHARS_PER_LINE;
use crate::errors::BotError;

pub const PAGE_WIDTH_PT: f32 = 612.0;
pub const PAGE_HEIGHT_PT: f32 = 792.0;
pub const MARGIN_PT: f32 = 40.0;
pub const LINE_HEIGHT_PT: f32 = 14.0;
pub const FONT_SIZE_PT: f32 = 12.0;

/// Lines that fit between the top and bottom margins.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn lines_per_page() -> usize {
    ((PAGE_HEIGHT_PT - 2.0 * MARGIN_PT) / LINE_HEIGHT_PT) as usize
}

/// Splits `text` into lines of at most `max_chars` characters.
///
/// Blank lines are preserved; a trailing newline does not add one.
#[must_use]
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut out = Vec::new();
    for line in text.lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(chars.chunks(max_chars).map(|chunk| chunk.iter().collect::<String>()));
    }
    out
}

/// Groups lines into pages. There is always at least one page.
#[must_use]
pub fn paginate(lines: Vec<String>, per_page: usize) -> Vec<Vec<String>> {
    let per_page = per_page.max(1);
    let mut pages: Vec<Vec<String>> = Vec::new();
    let mut lines = lines.into_iter().peekable();
    while lines.peek().is_some() {
        pages.push(lines.by_ref().take(per_page).collect());
    }
    if pages.is_empty() {
        pages.push(Vec::new());
    }
    pages
}

#[derive(Debug, Clone, Copy)]
pub struct PdfRenderer {
    max_chars_per_line: usize,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS_PER_LINE)
    }
}

impl PdfRenderer {
    #[must_use]
    pub fn new(max_chars_per_line: usize) -> Self {
        Self {
            max_chars_per_line: max_chars_per_line.max(1),
        }
    }

    /// Writes `text` to a new PDF at `path` and returns the page count.
    ///
    /// # Errors
    ///
    /// Returns an error if the font cannot be embedded or the file cannot be
    /// written.
    pub fn render(&self, text: &str, path: &Path) -> Result<usize, BotError> {
        let pages = paginate(wrap_lines(text, self.max_chars_per_line), lines_per_page());
        let page_count = pages.len();

        let width = Mm::from(Pt(PAGE_WIDTH_PT));
        let height = Mm::from(Pt(PAGE_HEIGHT_PT));
        let (doc, first_page, first_layer) = PdfDocument::new("printbot", width, height, "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| BotError::PdfError(format!("Failed to load Helvetica: {e}")))?;

        let mut target = (first_page, first_layer);
        for (index, page) in pages.iter().enumerate() {
            if index > 0 {
                target = doc.add_page(width, height, "Layer 1");
            }
            let layer = doc.get_page(target.0).get_layer(target.1);
            let mut y = PAGE_HEIGHT_PT - MARGIN_PT;
            for line in page {
                if !line.is_empty() {
                    layer.use_text(
                        line.as_str(),
                        FONT_SIZE_PT,
                        Mm::from(Pt(MARGIN_PT)),
                        Mm::from(Pt(y)),
                        &font,
                    );
                }
                y -= LINE_HEIGHT_PT;
            }
        }

        let file = File::create(path)?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| BotError::PdfError(format!("Failed to write {}: {e}", path.display())))?;

        info!(pages = page_count, path = %path.display(), "Rendered PDF");
        Ok(page_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_lines_fit_on_a_letter_page() {
        assert_eq!(lines_per_page(), 50);
    }

    #[test]
    fn long_lines_are_hard_wrapped() {
        let lines = wrap_lines(&"a".repeat(170), 80);
        assert_eq!(
            lines.iter().map(String::len).collect::<Vec<_>>(),
            vec![80, 80, 10]
        );
    }

    #[test]
    fn exact_multiple_does_not_add_an_empty_line() {
        assert_eq!(wrap_lines(&"b".repeat(160), 80).len(), 2);
    }

    #[test]
    fn blank_lines_survive_wrapping() {
        assert_eq!(wrap_lines("one\n\ntwo\n", 80), vec!["one", "", "two"]);
    }

    #[test]
    fn wraps_by_characters_not_bytes() {
        let lines = wrap_lines("日本語のテキスト", 3);
        assert_eq!(lines, vec!["日本語", "のテキ", "スト"]);
    }

    #[test]
    fn pagination_breaks_at_capacity() {
        let lines: Vec<String> = (0..120).map(|i| i.to_string()).collect();
        let pages = paginate(lines, 50);
        assert_eq!(
            pages.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![50, 50, 20]
        );
        assert_eq!(pages[2][0], "100");
    }

    #[test]
    fn empty_text_is_one_blank_page() {
        assert_eq!(paginate(wrap_lines("", 80), 50), vec![Vec::<String>::new()]);
    }

    #[test]
    fn renders_a_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let text = (0..60).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");

        let pages = PdfRenderer::new(80).render(&text, &path).unwrap();

        assert_eq!(pages, 2);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
