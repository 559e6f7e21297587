use super::tree::TreeIndex;

const CI_FILES: [&str; 5] = [
    ".travis.yml",
    ".circleci/config.yml",
    "circleci/config.yml",
    ".gitlab-ci.yml",
    "Jenkinsfile",
];

const WORKFLOW_DIR: &str = ".github/workflows";

/// CI configuration visible in the repository tree.
pub fn ci_config_present(index: &TreeIndex) -> bool {
    CI_FILES.iter().any(|path| index.has_file(path)) || workflows_present(index)
}

fn workflows_present(index: &TreeIndex) -> bool {
    index.files().any(|file| {
        file.path.starts_with(".github/workflows/")
            && (file.path.ends_with(".yml") || file.path.ends_with(".yaml"))
    })
}

/// Hosting features that leave traces in the tree: issue and pull request
/// templates, and workflows.
pub fn feature_files_present(index: &TreeIndex) -> bool {
    index.dir_has_files(".github/ISSUE_TEMPLATE")
        || index.files().any(|file| {
            let lower = file.path.to_ascii_lowercase();
            lower.starts_with(".github/issue_template")
                || lower.starts_with(".github/pull_request_template")
                || lower.starts_with("pull_request_template")
        })
        || index.dir_has_files(WORKFLOW_DIR)
}
