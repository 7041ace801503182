//! Document text extraction and PDF rendering

pub mod extract;
pub mod pdf;

pub use extract::{Extraction, extract_text};
pub use pdf::PdfRenderer;
