//! External tools the collection stage shells out to.

pub mod checkstyle;
pub mod gradle;
pub mod process;

use crate::error::EvidenceResult;
use crate::types::record::BuildKind;

/// Counts style violations in one Java compilation unit.
pub trait StyleChecker {
    fn run_style_check(&self, source_text: &str, identifier: &str) -> EvidenceResult<u32>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub success: bool,
    pub stderr: String,
}

/// Executes a Gradle build descriptor in isolation.
pub trait BuildRunner {
    fn run_build(
        &self,
        kind: BuildKind,
        descriptor_text: &str,
        project_identifier: &str,
    ) -> EvidenceResult<BuildOutcome>;
}
