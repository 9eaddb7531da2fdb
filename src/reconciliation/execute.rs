use crate::candidate::CandidateFile;
use crate::utils::STAGING_SUFFIX;
use super::plan::{PlannedAction, ReconciliationPlan};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How a higher-revision source file replaces its target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PromoteStrategy {
    /// Delete the target, then move the source in. A failure between the
    /// two steps leaves neither file in the target directory.
    #[default]
    DeleteThenMove,
    /// Move the source to a staging name in the target directory, delete the
    /// target, then rename the staging file into place. A failure after the
    /// first step leaves the new revision under its staging name.
    StageThenSwap,
}

/// Result of reconciliation execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    /// Source files that replaced an older target file
    pub updated: u32,
    /// Source files left untouched, discarded, or failed
    pub skipped: u32,
}

impl AddAssign for ReconciliationResult {
    fn add_assign(&mut self, other: Self) {
        self.updated += other.updated;
        self.skipped += other.skipped;
    }
}

/// Execute the reconciliation plan.
///
/// File operation failures are logged and counted as skipped; nothing that
/// already happened for the failing file is rolled back.
///
/// The plan assumes every promotion succeeds. When one fails, later actions
/// planned against the file it would have produced are decided again against
/// the target still in place.
pub fn execute_reconciliation(
    plan: &ReconciliationPlan,
    strategy: PromoteStrategy,
) -> ReconciliationResult {
    let mut result = ReconciliationResult::default();
    // Planned destination of a failed promotion -> target it failed to replace
    let mut failed: HashMap<PathBuf, CandidateFile> = HashMap::new();

    for action in &plan.actions {
        let (source, planned_target) = match action {
            PlannedAction::NoMatch { source } => {
                debug!(file = %source.file_name, "Left untouched");
                result.skipped += 1;
                continue;
            }
            PlannedAction::Discard { source, target }
            | PlannedAction::Promote { source, target } => (source, target),
        };

        let target = match failed.get(&planned_target.path) {
            Some(actual) => {
                if !actual.path.exists() {
                    debug!(
                        file = %source.file_name,
                        "Matched target is gone, left untouched"
                    );
                    result.skipped += 1;
                    continue;
                }
                actual.clone()
            }
            None => planned_target.clone(),
        };

        if source.revision <= target.revision {
            match fs::remove_file(&source.path) {
                Ok(()) => info!(
                    file = %source.file_name,
                    kept = %target.file_name,
                    "Discarded source file"
                ),
                Err(e) => warn!(
                    file = %source.file_name,
                    error = %e,
                    "Failed to discard source file"
                ),
            }
            result.skipped += 1;
            continue;
        }

        match promote(source, &target, &plan.target_dir, strategy) {
            Ok(()) => {
                info!(
                    file = %source.file_name,
                    replaced = %target.file_name,
                    "Promoted source file"
                );
                result.updated += 1;
            }
            Err(e) => {
                warn!(
                    file = %source.file_name,
                    replaced = %target.file_name,
                    error = %e,
                    "Failed to promote source file"
                );
                failed.insert(plan.target_dir.join(&source.file_name), target);
                result.skipped += 1;
            }
        }
    }

    result
}

fn promote(
    source: &CandidateFile,
    target: &CandidateFile,
    target_dir: &Path,
    strategy: PromoteStrategy,
) -> io::Result<()> {
    let destination = target_dir.join(&source.file_name);
    if destination.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", destination.display()),
        ));
    }

    match strategy {
        PromoteStrategy::DeleteThenMove => {
            fs::remove_file(&target.path)?;
            move_file(&source.path, &destination)
        }
        PromoteStrategy::StageThenSwap => {
            let staging = staging_path(target_dir, &source.file_name);
            if staging.exists() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} already exists", staging.display()),
                ));
            }
            move_file(&source.path, &staging)?;

            if let Err(e) = fs::remove_file(&target.path) {
                if let Err(restore) = move_file(&staging, &source.path) {
                    warn!(
                        staging = %staging.display(),
                        error = %restore,
                        "Failed to return staged file to source"
                    );
                }
                return Err(e);
            }

            fs::rename(&staging, &destination)
        }
    }
}

fn staging_path(target_dir: &Path, file_name: &str) -> PathBuf {
    target_dir.join(format!("{}{}", file_name, STAGING_SUFFIX))
}

/// Move a file, falling back to copy + remove across filesystems
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            if let Err(e) = fs::remove_file(from) {
                let _ = fs::remove_file(to);
                return Err(e);
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}
