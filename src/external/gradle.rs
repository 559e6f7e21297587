use super::process::run_with_timeout;
use super::{BuildOutcome, BuildRunner};
use crate::error::EvidenceResult;
use crate::types::record::BuildKind;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;
use tracing::debug;

/// Copies a Gradle descriptor into a scratch project and runs `gradle build` on it.
#[derive(Debug, Clone)]
pub struct GradleRunner {
    gradle: PathBuf,
    timeout: Duration,
}

impl GradleRunner {
    pub fn new(gradle: &Path, timeout: Duration) -> Self {
        Self {
            gradle: gradle.to_path_buf(),
            timeout,
        }
    }
}

impl BuildRunner for GradleRunner {
    fn run_build(
        &self,
        kind: BuildKind,
        descriptor_text: &str,
        project_identifier: &str,
    ) -> EvidenceResult<BuildOutcome> {
        let scratch = TempDir::new()?;
        fs::write(scratch.path().join(kind.descriptor_name()), descriptor_text)?;
        debug!(project = project_identifier, dir = %scratch.path().display(), "running gradle build");

        let output = run_with_timeout(
            Command::new(&self.gradle)
                .arg("build")
                .arg("--quiet")
                .arg("-p")
                .arg(scratch.path()),
            self.timeout,
        )?;
        Ok(BuildOutcome {
            success: output.success,
            stderr: output.stderr,
        })
    }
}
