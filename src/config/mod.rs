use crate::reconciliation::{PromoteStrategy, ReconcileOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Source directory not set")]
    MissingSource,

    #[error("No target directories given")]
    NoTargets,

    #[error("Directory does not exist: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Target is the source directory: {0}")]
    TargetIsSource(String),
}

/// Directories and options for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    pub source: PathBuf,
    pub targets: Vec<PathBuf>,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub strategy: PromoteStrategy,
}

impl SyncConfig {
    pub fn new(source: impl Into<PathBuf>, targets: Vec<PathBuf>) -> Self {
        Self {
            source: source.into(),
            targets,
            ..Self::default()
        }
    }

    /// Check that the source and every target are existing, distinct
    /// directories. Runs before any engine operation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.as_os_str().is_empty() {
            return Err(ConfigError::MissingSource);
        }
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        check_dir(&self.source)?;
        let source = self.source.canonicalize().ok();

        for target in &self.targets {
            check_dir(target)?;
            if source.is_some() && target.canonicalize().ok() == source {
                return Err(ConfigError::TargetIsSource(target.display().to_string()));
            }
        }

        Ok(())
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            dry_run: self.dry_run,
            strategy: self.strategy,
        }
    }
}

fn check_dir(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(ConfigError::NotADirectory(path.display().to_string()));
    }
    Ok(())
}
