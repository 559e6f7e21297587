use super::process::run_with_timeout;
use super::StyleChecker;
use crate::error::{EvidenceError, EvidenceResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;

/// Runs the Checkstyle all-in-one jar through `java -jar`.
#[derive(Debug, Clone)]
pub struct CheckstyleRunner {
    java: PathBuf,
    jar: PathBuf,
    config: PathBuf,
    timeout: Duration,
}

impl CheckstyleRunner {
    pub fn new(jar: &Path, config: &Path, timeout: Duration) -> Self {
        Self {
            java: PathBuf::from("java"),
            jar: jar.to_path_buf(),
            config: config.to_path_buf(),
            timeout,
        }
    }

    pub fn with_java(mut self, java: &Path) -> Self {
        self.java = java.to_path_buf();
        self
    }
}

/// Checkstyle prints one `[ERROR]` line per violation.
pub fn count_errors(stdout: &str) -> u32 {
    stdout.matches("ERROR").count() as u32
}

/// The file must be named after its public class for Checkstyle's
/// outer-type rules, so keep the identifier's base name and force `.java`.
fn scratch_name(identifier: &str) -> String {
    let base = identifier
        .rsplit(|ch: char| ch == '/' || ch == '\\')
        .next()
        .unwrap_or(identifier)
        .trim_end_matches(".java");
    let base = if base.is_empty() { "Source" } else { base };
    format!("{base}.java")
}

impl StyleChecker for CheckstyleRunner {
    fn run_style_check(&self, source_text: &str, identifier: &str) -> EvidenceResult<u32> {
        let scratch = TempDir::new()?;
        let file = scratch.path().join(scratch_name(identifier));
        fs::write(&file, source_text)?;

        let output = run_with_timeout(
            Command::new(&self.java)
                .arg("-jar")
                .arg(&self.jar)
                .arg("-c")
                .arg(&self.config)
                .arg(&file),
            self.timeout,
        )?;
        if output.stdout.trim().is_empty() && !output.success {
            return Err(EvidenceError::Command(format!(
                "checkstyle: {}",
                output.stderr.trim()
            )));
        }
        Ok(count_errors(&output.stdout))
    }
}
