#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Create `name` under the temp dir with the given files in it
pub fn create_folder(root: &TempDir, name: &str, files: &[&str]) -> PathBuf {
    let dir = root.path().join(name);
    fs::create_dir_all(&dir).expect("Failed to create folder");
    for file in files {
        fs::write(dir.join(file), format!("contents of {file}")).expect("Failed to write file");
    }
    dir
}

/// Sorted file names directly inside `dir`
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|e| e.expect("Bad entry").file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
