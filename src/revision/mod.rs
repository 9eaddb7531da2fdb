//! Revision token parsing for drawing file names.
//!
//! A revision token is a trailing `-REV-<digits>` or `-REV_<digits>` on the
//! file name without its extension, matched case-insensitively. Names without
//! a token are normal input: they parse to [`NO_REVISION`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Revision number reported for names that carry no revision token.
///
/// Lower than every explicit revision, so an untokened file always loses a
/// comparison against a tokened one.
pub const NO_REVISION: i64 = -1;

static REVISION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)-REV[-_]([0-9]+)$").expect("revision pattern is valid"));

/// Split a file name into the name without extension and the extension
/// (including its leading dot). A name whose only dot is the first character
/// has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Check if the name without extension ends with a revision token
pub fn has_revision(name: &str) -> bool {
    let (stem, _) = split_extension(name);
    REVISION_TOKEN.is_match(stem)
}

/// Remove the trailing revision token, keeping the extension in place.
/// Returns the name unchanged when there is no token.
///
/// Stacked tokens (`A-REV-1-REV-2`) are all removed, so stripping twice
/// gives the same name as stripping once.
pub fn strip_revision(name: &str) -> String {
    let (mut stem, ext) = split_extension(name);
    while let Some(token) = REVISION_TOKEN.find(stem) {
        stem = &stem[..token.start()];
    }
    format!("{}{}", stem, ext)
}

/// Get the revision number, or [`NO_REVISION`] when there is no token.
///
/// A digit run too large for `i64` is treated like a missing token.
pub fn extract_revision(name: &str) -> i64 {
    let (stem, _) = split_extension(name);
    REVISION_TOKEN
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<i64>().ok())
        .unwrap_or(NO_REVISION)
}
