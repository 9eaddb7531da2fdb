use std::path::Path;

/// Extensions (lower-case, without the dot) that count as drawings
pub const DRAWING_EXTENSIONS: &[&str] = &["dwg", "pdf"];

/// Suffix used for the staging copy during a staged promotion
pub const STAGING_SUFFIX: &str = ".revsync-tmp";

/// Get current timestamp in ISO 8601 format
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Check whether a lower-cased extension is a drawing extension
pub fn is_drawing_extension(ext: &str) -> bool {
    DRAWING_EXTENSIONS.contains(&ext)
}

/// Get the file name of a path as an owned string, if it is valid UTF-8
pub fn file_name_of(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
}
