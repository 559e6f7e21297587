//! Repository content providers.
//!
//! Every signal extractor reads a repository through [`RepositoryProvider`],
//! so collection can run against the hosting API, a directory of local
//! checkouts, or an in-memory double in tests.

pub mod github;
pub mod local;
pub mod retry;

use crate::error::EvidenceResult;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry of a recursive tree listing. Paths are `/`-separated and relative
/// to the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub path: String,
    pub kind: EntryKind,
    pub size: u64,
}

impl TreeEntry {
    pub fn file(path: &str, size: u64) -> Self {
        Self {
            path: path.to_string(),
            kind: EntryKind::File,
            size,
        }
    }

    pub fn dir(path: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: EntryKind::Dir,
            size: 0,
        }
    }

    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// CI activity the host can report beyond what is visible in the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CiIndicators {
    pub action_runs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureUsage {
    pub issue_activity: bool,
    pub workflow_runs: u64,
    pub projects: u64,
}

impl FeatureUsage {
    pub fn any(&self) -> bool {
        self.issue_activity || self.workflow_runs > 0 || self.projects > 0
    }
}

pub trait RepositoryProvider {
    /// Short name used in logs and evidence-gap notes.
    fn name(&self) -> &'static str;

    /// Decoded content of a file, `None` when it does not exist.
    fn get_file(&self, address: &str, path: &str) -> EvidenceResult<Option<String>>;

    fn list_tree(&self, address: &str) -> EvidenceResult<Vec<TreeEntry>>;

    fn get_readme(&self, address: &str) -> EvidenceResult<Option<String>>;

    fn get_licence(&self, address: &str) -> EvidenceResult<Option<String>>;

    fn get_commit_count(&self, address: &str) -> EvidenceResult<u64>;

    fn get_contributor_count(&self, address: &str) -> EvidenceResult<u64>;

    fn get_branch_count(&self, address: &str) -> EvidenceResult<u64>;

    fn get_ci_indicators(&self, address: &str) -> EvidenceResult<CiIndicators>;

    fn get_feature_usage(&self, address: &str) -> EvidenceResult<FeatureUsage>;
}
