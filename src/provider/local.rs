use super::{CiIndicators, FeatureUsage, RepositoryProvider, TreeEntry};
use crate::error::{EvidenceError, EvidenceResult};
use crate::external::process::run_with_timeout;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use walkdir::WalkDir;

const README_PREFIXES: [&str; 1] = ["readme"];
const LICENCE_PREFIXES: [&str; 3] = ["license", "licence", "copying"];

/// Reads repositories from local checkouts laid out as `<root>/<owner>/<name>`.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    root: PathBuf,
    timeout: Duration,
}

impl LocalProvider {
    pub fn new(root: &Path, timeout: Duration) -> Self {
        Self {
            root: root.to_path_buf(),
            timeout,
        }
    }

    fn checkout(&self, address: &str) -> EvidenceResult<PathBuf> {
        let path = self.root.join(address);
        if path.is_dir() {
            Ok(path)
        } else {
            Err(EvidenceError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no checkout at {}", path.display()),
            )))
        }
    }

    fn root_file_with_prefix(&self, address: &str, prefixes: &[&str]) -> EvidenceResult<Option<String>> {
        let checkout = self.checkout(address)?;
        let mut candidates = fs::read_dir(&checkout)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|kind| kind.is_file()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| {
                let lower = name.to_ascii_lowercase();
                prefixes.iter().any(|prefix| lower.starts_with(prefix))
            })
            .collect::<Vec<_>>();
        candidates.sort();
        match candidates.first() {
            Some(name) => read_lossy(&checkout.join(name)).map(Some),
            None => Ok(None),
        }
    }

    /// Runs git inside the checkout. A directory that is not a git work tree
    /// has no history to count, so `None` is returned instead of an error.
    fn git(&self, address: &str, args: &[&str]) -> EvidenceResult<Option<String>> {
        let checkout = self.checkout(address)?;
        if !checkout.join(".git").exists() {
            return Ok(None);
        }
        let output = run_with_timeout(
            Command::new("git").arg("-C").arg(&checkout).args(args),
            self.timeout,
        )?;
        if !output.success {
            return Err(EvidenceError::Command(format!(
                "git {}: {}",
                args.join(" "),
                output.stderr.trim()
            )));
        }
        Ok(Some(output.stdout))
    }

    fn git_line_count(&self, address: &str, args: &[&str]) -> EvidenceResult<u64> {
        Ok(self
            .git(address, args)?
            .map(|stdout| stdout.lines().filter(|line| !line.trim().is_empty()).count() as u64)
            .unwrap_or(0))
    }
}

fn read_lossy(path: &Path) -> EvidenceResult<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl RepositoryProvider for LocalProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    fn get_file(&self, address: &str, path: &str) -> EvidenceResult<Option<String>> {
        let file = self.checkout(address)?.join(path.trim_start_matches('/'));
        if !file.is_file() {
            return Ok(None);
        }
        read_lossy(&file).map(Some)
    }

    fn list_tree(&self, address: &str) -> EvidenceResult<Vec<TreeEntry>> {
        let checkout = self.checkout(address)?;
        let mut entries = Vec::new();
        let walker = WalkDir::new(&checkout)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git");
        for entry in walker.filter_map(|entry| entry.ok()) {
            let Ok(relative) = entry.path().strip_prefix(&checkout) else {
                continue;
            };
            let path = relative
                .components()
                .map(|part| part.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if entry.file_type().is_dir() {
                entries.push(TreeEntry::dir(&path));
            } else if entry.file_type().is_file() {
                let size = entry.metadata().map(|meta| meta.len()).unwrap_or(0);
                entries.push(TreeEntry::file(&path, size));
            }
        }
        Ok(entries)
    }

    fn get_readme(&self, address: &str) -> EvidenceResult<Option<String>> {
        self.root_file_with_prefix(address, &README_PREFIXES)
    }

    fn get_licence(&self, address: &str) -> EvidenceResult<Option<String>> {
        self.root_file_with_prefix(address, &LICENCE_PREFIXES)
    }

    fn get_commit_count(&self, address: &str) -> EvidenceResult<u64> {
        let Some(stdout) = self.git(address, &["rev-list", "--count", "HEAD"])? else {
            return Ok(0);
        };
        stdout
            .trim()
            .parse::<u64>()
            .map_err(|err| EvidenceError::Decode(format!("git rev-list output: {err}")))
    }

    fn get_contributor_count(&self, address: &str) -> EvidenceResult<u64> {
        self.git_line_count(address, &["shortlog", "-sne", "HEAD"])
    }

    fn get_branch_count(&self, address: &str) -> EvidenceResult<u64> {
        let Some(stdout) = self.git(
            address,
            &["for-each-ref", "--format=%(refname)", "refs/heads", "refs/remotes"],
        )?
        else {
            return Ok(0);
        };
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.ends_with("/HEAD"))
            .count() as u64)
    }

    fn get_ci_indicators(&self, _address: &str) -> EvidenceResult<CiIndicators> {
        Ok(CiIndicators::default())
    }

    fn get_feature_usage(&self, _address: &str) -> EvidenceResult<FeatureUsage> {
        Ok(FeatureUsage::default())
    }
}
