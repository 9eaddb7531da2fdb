//! Directory listing for reconciliation candidates.
//!
//! Every listing is sorted by file name so that "first match" has a stable
//! meaning across platforms and filesystems.

use crate::revision::{extract_revision, has_revision, split_extension, strip_revision};
use crate::utils::{file_name_of, is_drawing_extension};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A file considered by a reconciliation or mismatch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFile {
    pub path: PathBuf,
    pub file_name: String,
    /// Extension without the dot, lower-cased
    pub extension: String,
    /// File name with the revision token stripped, extension kept
    pub base_name: String,
    /// Revision number, `-1` when absent
    pub revision: i64,
    pub has_revision: bool,
}

impl CandidateFile {
    /// Build a candidate from a file path. Returns `None` for paths without a
    /// UTF-8 file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = file_name_of(path)?;
        let (_, ext) = split_extension(&file_name);
        let extension = ext.trim_start_matches('.').to_lowercase();

        Some(Self {
            path: path.to_path_buf(),
            base_name: strip_revision(&file_name),
            revision: extract_revision(&file_name),
            has_revision: has_revision(&file_name),
            extension,
            file_name,
        })
    }

    /// Name without extension, as listed
    pub fn stem(&self) -> &str {
        split_extension(&self.file_name).0
    }

    pub fn is_drawing(&self) -> bool {
        is_drawing_extension(&self.extension)
    }

    /// Drawings carrying a revision token may replace target files
    pub fn is_eligible_source(&self) -> bool {
        self.is_drawing() && self.has_revision
    }

    /// Same logical document: base names equal ignoring case, same extension
    pub fn same_document(&self, other: &CandidateFile) -> bool {
        self.extension == other.extension
            && self.base_name.to_lowercase() == other.base_name.to_lowercase()
    }
}

/// List the regular files directly inside `dir`, sorted by file name.
///
/// Failing to read `dir` itself is an error; unreadable individual entries
/// are skipped.
pub fn list_files(dir: &Path) -> Result<Vec<CandidateFile>, std::io::Error> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                debug!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        match CandidateFile::from_path(path) {
            Some(candidate) => files.push(candidate),
            None => debug!(path = %path.display(), "Skipping non UTF-8 file name"),
        }
    }

    Ok(files)
}

/// List the `.dwg` / `.pdf` files directly inside `dir`, sorted by file name
pub fn list_drawings(dir: &Path) -> Result<Vec<CandidateFile>, std::io::Error> {
    Ok(list_files(dir)?
        .into_iter()
        .filter(CandidateFile::is_drawing)
        .collect())
}
