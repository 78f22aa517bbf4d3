//! Shared test utilities and fixtures for state reference tests

use std::fs;
use std::path::{Path, PathBuf};

pub mod loader_tests;
pub mod query_tests;

/// Write a reference CSV file into `dir` and return its path
pub fn create_reference_file(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).unwrap();
    path
}

/// Small reference file with headers in a non-default order
pub fn create_test_reference_content() -> &'static str {
    "name,code\nMaharashtra,MH\nGujarat,gj\nKarnataka,KA\n"
}
