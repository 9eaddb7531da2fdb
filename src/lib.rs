pub mod candidate;
pub mod config;
pub mod mismatch;
pub mod reconciliation;
pub mod revision;
pub mod utils;

// Re-export commonly used types
pub use candidate::{list_drawings, list_files, CandidateFile};
pub use config::{ConfigError, SyncConfig};
pub use mismatch::{
    check_mismatch, check_mismatch_all, MismatchEntry, MismatchError, MissingSide,
    TargetMismatches,
};
pub use reconciliation::{
    build_reconciliation_plan, execute_reconciliation, reconcile, reconcile_all, reconcile_with,
    BatchResult, PlannedAction, PromoteStrategy, ReconcileError, ReconcileOptions,
    ReconciliationPlan, ReconciliationResult, TargetOutcome,
};
pub use revision::{extract_revision, has_revision, strip_revision, NO_REVISION};
