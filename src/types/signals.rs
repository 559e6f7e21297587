use crate::types::record::BuildKind;
use serde::Serialize;

/// Fixed-schema view of a repository: the only input the scoring rules see.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signals {
    pub readme_exists: bool,
    pub readme_is_big: bool,
    pub readme_uses_markdown: bool,
    pub licence_file: bool,
    pub contributing_file: bool,
    pub build_kind: Option<BuildKind>,
    pub build_file_ok: bool,
    pub uses_checkstyle: bool,
    pub uses_spotbugs: bool,
    pub test_files: usize,
    pub non_test_files: usize,
    /// `-1.0` when there are no non-test files.
    pub test_ratio: f64,
    /// Fraction of measured non-test files with enough comments per method.
    pub method_coverage: f64,
    /// Fraction of measured non-test files with enough comments per line.
    pub line_coverage: f64,
    pub comments: u64,
    pub lines: u64,
    pub methods: u64,
    pub style_errors: u64,
    pub average_method_size: Option<f64>,
    pub uses_github_features: bool,
    pub uses_ci: bool,
    pub commits: u64,
    pub contributors: u64,
    pub branches: u64,
}

impl Signals {
    pub fn build_exists(&self) -> bool {
        self.build_kind.is_some()
    }

    pub fn test_files_exist(&self) -> bool {
        self.test_files > 0
    }
}
