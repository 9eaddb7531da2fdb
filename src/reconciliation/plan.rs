use crate::candidate::{list_drawings, CandidateFile};
use super::execute::ReconciliationResult;
use super::ReconcileError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What will happen to one eligible source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PlannedAction {
    /// Source has the higher revision: delete target, move source in
    Promote {
        source: CandidateFile,
        target: CandidateFile,
    },
    /// Source revision is lower or equal: delete source
    Discard {
        source: CandidateFile,
        target: CandidateFile,
    },
    /// No target file for the same document: leave source alone
    NoMatch { source: CandidateFile },
}

impl PlannedAction {
    pub fn source(&self) -> &CandidateFile {
        match self {
            PlannedAction::Promote { source, .. }
            | PlannedAction::Discard { source, .. }
            | PlannedAction::NoMatch { source } => source,
        }
    }
}

/// The reconciliation plan for one source/target pair
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationPlan {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    /// One action per eligible source file, in source listing order
    pub actions: Vec<PlannedAction>,
}

impl ReconciliationPlan {
    /// Counts the plan produces if every file operation succeeds
    pub fn expected_result(&self) -> ReconciliationResult {
        let mut result = ReconciliationResult::default();
        for action in &self.actions {
            match action {
                PlannedAction::Promote { .. } => result.updated += 1,
                PlannedAction::Discard { .. } | PlannedAction::NoMatch { .. } => {
                    result.skipped += 1
                }
            }
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Build a reconciliation plan without touching the filesystem.
///
/// Each eligible source file is compared with the first target drawing (by
/// file name) of the same document. A promotion replaces that target in the
/// working listing, so a later source file of the same document is compared
/// with the file just promoted rather than the one it removed.
pub fn build_reconciliation_plan(
    source_dir: &Path,
    target_dir: &Path,
) -> Result<ReconciliationPlan, ReconcileError> {
    let sources: Vec<CandidateFile> = list_drawings(source_dir)?
        .into_iter()
        .filter(|f| f.has_revision)
        .collect();
    let mut targets = list_drawings(target_dir)?;

    let mut plan = ReconciliationPlan {
        source_dir: source_dir.to_path_buf(),
        target_dir: target_dir.to_path_buf(),
        actions: Vec::with_capacity(sources.len()),
    };

    for source in sources {
        let Some(index) = targets.iter().position(|t| t.same_document(&source)) else {
            debug!(file = %source.file_name, "No matching target");
            plan.actions.push(PlannedAction::NoMatch { source });
            continue;
        };

        let target = targets[index].clone();
        if source.revision > target.revision {
            let promoted_path = target_dir.join(&source.file_name);
            let mut promoted = source.clone();
            promoted.path = promoted_path;
            targets[index] = promoted;
            targets.sort_by(|a, b| a.file_name.cmp(&b.file_name));

            plan.actions.push(PlannedAction::Promote { source, target });
        } else {
            plan.actions.push(PlannedAction::Discard { source, target });
        }
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup(source: &[&str], target: &[&str]) -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let source_dir = temp.path().join("source");
        let target_dir = temp.path().join("target");
        fs::create_dir_all(&source_dir).unwrap();
        fs::create_dir_all(&target_dir).unwrap();
        for name in source {
            fs::write(source_dir.join(name), name).unwrap();
        }
        for name in target {
            fs::write(target_dir.join(name), name).unwrap();
        }
        (temp, source_dir, target_dir)
    }

    fn describe(plan: &ReconciliationPlan) -> Vec<String> {
        plan.actions
            .iter()
            .map(|a| match a {
                PlannedAction::Promote { source, target } => {
                    format!("promote {} over {}", source.file_name, target.file_name)
                }
                PlannedAction::Discard { source, target } => {
                    format!("discard {} for {}", source.file_name, target.file_name)
                }
                PlannedAction::NoMatch { source } => format!("nomatch {}", source.file_name),
            })
            .collect()
    }

    #[test]
    fn test_plan_basic_decisions() {
        let (_temp, source_dir, target_dir) = setup(
            &["A-REV-3.pdf", "B-REV-1.pdf", "C-REV-1.dwg", "D.pdf", "E-REV-2.txt"],
            &["A-REV-2.pdf", "B-REV-5.pdf"],
        );

        let plan = build_reconciliation_plan(&source_dir, &target_dir).unwrap();
        assert_eq!(
            describe(&plan),
            vec![
                "promote A-REV-3.pdf over A-REV-2.pdf",
                "discard B-REV-1.pdf for B-REV-5.pdf",
                "nomatch C-REV-1.dwg",
            ]
        );

        let expected = plan.expected_result();
        assert_eq!(expected.updated, 1);
        assert_eq!(expected.skipped, 2);
    }

    #[test]
    fn test_plan_empty_without_eligible_sources() {
        let (_temp, source_dir, target_dir) =
            setup(&["A.pdf", "B-REV-1.txt"], &["A-REV-1.pdf"]);

        let plan = build_reconciliation_plan(&source_dir, &target_dir).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.expected_result(), ReconciliationResult::default());
    }

    #[test]
    fn test_plan_does_not_touch_files() {
        let (_temp, source_dir, target_dir) = setup(&["A-REV-3.pdf"], &["A-REV-2.pdf"]);

        build_reconciliation_plan(&source_dir, &target_dir).unwrap();
        assert!(source_dir.join("A-REV-3.pdf").exists());
        assert!(target_dir.join("A-REV-2.pdf").exists());
    }

    #[test]
    fn test_plan_untokened_target_loses() {
        let (_temp, source_dir, target_dir) = setup(&["A-REV-0.pdf"], &["A.pdf"]);

        let plan = build_reconciliation_plan(&source_dir, &target_dir).unwrap();
        assert_eq!(describe(&plan), vec!["promote A-REV-0.pdf over A.pdf"]);
    }

    #[test]
    fn test_plan_equal_revision_discards() {
        let (_temp, source_dir, target_dir) = setup(&["A-REV_02.pdf"], &["a-rev-2.PDF"]);

        let plan = build_reconciliation_plan(&source_dir, &target_dir).unwrap();
        assert_eq!(describe(&plan), vec!["discard A-REV_02.pdf for a-rev-2.PDF"]);
    }

    #[test]
    fn test_plan_first_match_is_lexicographic() {
        let (_temp, source_dir, target_dir) =
            setup(&["A-REV-4.pdf"], &["A-REV-5.pdf", "A-REV-1.pdf"]);

        let plan = build_reconciliation_plan(&source_dir, &target_dir).unwrap();
        assert_eq!(describe(&plan), vec!["promote A-REV-4.pdf over A-REV-1.pdf"]);
    }

    #[test]
    fn test_plan_tracks_promoted_files() {
        let (_temp, source_dir, target_dir) = setup(
            &["A-REV-2.pdf", "A-REV-3.pdf", "B-REV-10.pdf", "B-REV-9.pdf"],
            &["A-REV-1.pdf", "B-REV-1.pdf"],
        );

        let plan = build_reconciliation_plan(&source_dir, &target_dir).unwrap();
        assert_eq!(
            describe(&plan),
            vec![
                "promote A-REV-2.pdf over A-REV-1.pdf",
                "promote A-REV-3.pdf over A-REV-2.pdf",
                "promote B-REV-10.pdf over B-REV-1.pdf",
                "discard B-REV-9.pdf for B-REV-10.pdf",
            ]
        );
    }

    #[test]
    fn test_plan_extension_must_match() {
        let (_temp, source_dir, target_dir) = setup(&["A-REV-3.dwg"], &["A-REV-1.pdf"]);

        let plan = build_reconciliation_plan(&source_dir, &target_dir).unwrap();
        assert_eq!(describe(&plan), vec!["nomatch A-REV-3.dwg"]);
    }
}
