//! MIME utilities shared across modules

const OCTET_STREAM_TYPES: [&str; 2] = ["binary/octet-stream", "application/octet-stream"];

/// Lower-cases a MIME type and drops any parameters (`; charset=...`).
#[must_use]
pub fn canonicalize_mime(mime: &str) -> String {
    let main = mime
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match main.as_str() {
        "image/jpg" => "image/jpeg".to_string(),
        other => other.to_string(),
    }
}

/// Returns the content type to extract with.
///
/// Storage backends often label uploads as a generic byte stream; in that
/// case the type is guessed from the file extension instead.
#[must_use]
pub fn resolve_content_type(declared: &str, file_name: &str) -> String {
    let canonical = canonicalize_mime(declared);
    if !OCTET_STREAM_TYPES.contains(&canonical.as_str()) {
        return canonical;
    }
    mime_guess::from_path(file_name)
        .first_raw()
        .map_or(canonical, str::to_string)
}

/// Whether the printer gateway accepts this file, judged by extension.
#[must_use]
pub fn is_printable_path(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "pdf" | "jpg" | "jpeg"))
}
