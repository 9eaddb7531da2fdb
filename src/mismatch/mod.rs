//! Name comparison between two directories.
//!
//! Files are compared by name without extension, ignoring case. Revision
//! tokens are part of the compared name.

use crate::candidate::{list_files, CandidateFile};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum MismatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Which side a name is missing from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingSide {
    Target,
    Source,
}

impl fmt::Display for MissingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingSide::Target => write!(f, "Missing in Target"),
            MissingSide::Source => write!(f, "Missing in Source"),
        }
    }
}

/// A name present on only one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MismatchEntry {
    /// Name without extension, spelled as first listed
    pub name: String,
    pub missing_in: MissingSide,
}

impl fmt::Display for MismatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.missing_in)
    }
}

/// Mismatches for one target of a multi-target check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetMismatches {
    pub target: PathBuf,
    pub entries: Vec<MismatchEntry>,
}

/// Compare the names in `source_dir` and `target_dir`.
///
/// Names only in the source come first ("Missing in Target"), then names
/// only in the target ("Missing in Source"), each in file name order. An
/// empty result means every name matched.
pub fn check_mismatch(
    source_dir: &Path,
    target_dir: &Path,
) -> Result<Vec<MismatchEntry>, MismatchError> {
    let source_names = unique_stems(&list_files(source_dir)?);
    let target_names = unique_stems(&list_files(target_dir)?);

    let source_keys: HashSet<String> = source_names.iter().map(|n| n.to_lowercase()).collect();
    let target_keys: HashSet<String> = target_names.iter().map(|n| n.to_lowercase()).collect();

    let missing_in_target = source_names
        .into_iter()
        .filter(|name| !target_keys.contains(&name.to_lowercase()))
        .map(|name| MismatchEntry {
            name,
            missing_in: MissingSide::Target,
        });
    let missing_in_source = target_names
        .into_iter()
        .filter(|name| !source_keys.contains(&name.to_lowercase()))
        .map(|name| MismatchEntry {
            name,
            missing_in: MissingSide::Source,
        });

    let entries: Vec<MismatchEntry> = missing_in_target.chain(missing_in_source).collect();

    debug!(
        source = %source_dir.display(),
        target = %target_dir.display(),
        mismatches = entries.len(),
        "Mismatch check finished"
    );

    Ok(entries)
}

/// Run [`check_mismatch`] for each target in turn
pub fn check_mismatch_all(
    source_dir: &Path,
    targets: &[PathBuf],
) -> Result<Vec<TargetMismatches>, MismatchError> {
    let mut reports = Vec::with_capacity(targets.len());
    for target in targets {
        reports.push(TargetMismatches {
            target: target.clone(),
            entries: check_mismatch(source_dir, target)?,
        });
    }
    Ok(reports)
}

/// Names without extension in listing order, first spelling of each
/// case-insensitive name only
fn unique_stems(files: &[CandidateFile]) -> Vec<String> {
    let mut seen = HashSet::new();
    files
        .iter()
        .map(|f| f.stem().to_string())
        .filter(|stem| seen.insert(stem.to_lowercase()))
        .collect()
}
