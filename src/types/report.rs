use crate::types::record::BuildKind;
use crate::types::scoring::GradeBreakdown;
use crate::types::signals::Signals;
use serde::Serialize;

/// Conditions that make the numeric grade likely to be a false negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWarning {
    UnverifiedBuildTool { tool: BuildKind },
    NoBuildDetected,
    NoSourceFiles,
    TooFewCommits { count: u64, minimum: u64 },
    TooFewContributors { count: u64, minimum: u64 },
}

#[derive(Debug, Clone)]
pub struct GradeReport {
    pub address: String,
    pub signals: Signals,
    pub breakdown: GradeBreakdown,
    pub warnings: Vec<ReportWarning>,
    pub evidence_gaps: Vec<String>,
    pub build_failure_output: Option<String>,
}
