//! Content-type lookup for served files.
use std::path::Path;

/// Fallback when nothing else recognises the extension
pub const DEFAULT_MIME: &str = "text/plain";

/// Extensions whose content type is pinned regardless of the system table
const MIME_OVERRIDES: &[(&str, &str)] = &[
    ("ico", "image/vnd.microsoft.icon"),
    ("svg", "image/svg+xml"),
    ("js", "text/javascript"),
    ("png", "image/png"),
    ("css", "text/css"),
];

/// Content type for `path`: override table, then `mime_guess`, then `text/plain`
pub fn mime_for<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if let Some((_, mime)) = MIME_OVERRIDES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        {
            return (*mime).to_string();
        }
    }

    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_MIME)
        .to_string()
}
