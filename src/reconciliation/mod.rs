//! Revision reconciliation between a source and target directories.
//!
//! For every source drawing carrying a revision token, the first target
//! drawing of the same document decides its fate:
//! 1. Higher source revision: the target is deleted and the source moved in
//! 2. Lower or equal revision: the source is deleted
//! 3. No such target: the source is left alone

mod execute;
mod plan;

pub use execute::{execute_reconciliation, PromoteStrategy, ReconciliationResult};
pub use plan::{build_reconciliation_plan, PlannedAction, ReconciliationPlan};

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Source and target are the same directory: {0}")]
    SameDirectory(String),
}

/// Options for a reconciliation run
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Only plan; report the counts a real run would produce
    pub dry_run: bool,
    pub strategy: PromoteStrategy,
}

/// Outcome for one target directory of a batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetOutcome {
    pub target: PathBuf,
    #[serde(flatten)]
    pub result: ReconciliationResult,
}

/// Outcome of reconciling one source against several targets
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub targets: Vec<TargetOutcome>,
    pub total: ReconciliationResult,
}

/// Reconcile `source_dir` into `target_dir` with default options
pub fn reconcile(
    source_dir: &Path,
    target_dir: &Path,
) -> Result<ReconciliationResult, ReconcileError> {
    reconcile_with(source_dir, target_dir, ReconcileOptions::default())
}

/// Reconcile `source_dir` into `target_dir`.
///
/// Errors only when a directory cannot be listed; per-file failures are
/// counted as skipped.
pub fn reconcile_with(
    source_dir: &Path,
    target_dir: &Path,
    options: ReconcileOptions,
) -> Result<ReconciliationResult, ReconcileError> {
    if source_dir.canonicalize()? == target_dir.canonicalize()? {
        return Err(ReconcileError::SameDirectory(
            target_dir.display().to_string(),
        ));
    }

    let plan = build_reconciliation_plan(source_dir, target_dir)?;
    if plan.is_empty() {
        info!(source = %source_dir.display(), "No eligible source files");
        return Ok(ReconciliationResult::default());
    }

    info!(
        source = %source_dir.display(),
        target = %target_dir.display(),
        candidates = plan.actions.len(),
        dry_run = options.dry_run,
        "Reconciling"
    );

    let result = if options.dry_run {
        plan.expected_result()
    } else {
        execute_reconciliation(&plan, options.strategy)
    };

    info!(
        target = %target_dir.display(),
        updated = result.updated,
        skipped = result.skipped,
        "Reconciliation finished"
    );

    Ok(result)
}

/// Reconcile one source against each target in turn.
///
/// Targets are processed in the given order with no coordination between
/// them: a source file moved or deleted for one target is gone for the rest.
pub fn reconcile_all(
    source_dir: &Path,
    targets: &[PathBuf],
    options: ReconcileOptions,
) -> Result<BatchResult, ReconcileError> {
    let mut batch = BatchResult::default();

    for target in targets {
        let result = reconcile_with(source_dir, target, options)?;
        batch.total += result;
        batch.targets.push(TargetOutcome {
            target: target.clone(),
            result,
        });
    }

    Ok(batch)
}
