//! Repository-level ratios reduced from per-file measurements.

use crate::types::config::Thresholds;
use crate::types::record::{CodeMetrics, SourceFile};
use crate::types::scoring::round_to;

/// Test ratio reported when the repository has no non-test source files.
pub const NO_SOURCE_FILES: f64 = -1.0;

/// Test files per non-test file, rounded to two places.
pub fn find_test_ratio(test_files: usize, non_test_files: usize) -> f64 {
    if non_test_files == 0 {
        return NO_SOURCE_FILES;
    }
    round_to(test_files as f64 / non_test_files as f64, 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileCoverage {
    pub method_ok: bool,
    pub line_ok: bool,
}

/// A file with no methods always has adequate method coverage; one with no
/// lines never has adequate line coverage.
pub fn comment_coverage(metrics: &CodeMetrics, thresholds: &Thresholds) -> FileCoverage {
    let comments = f64::from(metrics.comment_count);
    let method_ok = metrics.method_count == 0
        || comments / f64::from(metrics.method_count) > 1.0 / thresholds.methods_per_comment;
    let line_ok = metrics.line_count > 0
        && comments / f64::from(metrics.line_count) > 1.0 / thresholds.lines_per_comment;
    FileCoverage { method_ok, line_ok }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoverageSummary {
    pub method_ok_fraction: f64,
    pub line_ok_fraction: f64,
}

/// Mean of the per-file 0/1 coverage verdicts over measured non-test files.
pub fn summarize_coverage(files: &[SourceFile], thresholds: &Thresholds) -> CoverageSummary {
    let verdicts = files
        .iter()
        .filter(|file| !file.is_test)
        .filter_map(|file| file.metrics.as_ref())
        .map(|metrics| comment_coverage(metrics, thresholds))
        .collect::<Vec<_>>();

    if verdicts.is_empty() {
        return CoverageSummary::default();
    }

    let measured = verdicts.len() as f64;
    let methods_ok = verdicts.iter().filter(|verdict| verdict.method_ok).count() as f64;
    let lines_ok = verdicts.iter().filter(|verdict| verdict.line_ok).count() as f64;
    CoverageSummary {
        method_ok_fraction: methods_ok / measured,
        line_ok_fraction: lines_ok / measured,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeTotals {
    pub lines: u64,
    pub methods: u64,
    pub comments: u64,
    pub style_errors: u64,
}

pub fn code_totals(files: &[SourceFile]) -> CodeTotals {
    files
        .iter()
        .filter(|file| !file.is_test)
        .filter_map(|file| file.metrics.as_ref())
        .fold(CodeTotals::default(), |mut totals, metrics| {
            totals.lines += u64::from(metrics.line_count);
            totals.methods += u64::from(metrics.method_count);
            totals.comments += u64::from(metrics.comment_count);
            totals.style_errors += u64::from(metrics.style_error_count);
            totals
        })
}

/// Lines per method; `None` when there are no methods to divide by.
pub fn average_method_size(total_lines: u64, total_methods: u64) -> Option<f64> {
    if total_methods == 0 {
        return None;
    }
    Some(total_lines as f64 / total_methods as f64)
}

pub fn modularity_ok(average_method_size: Option<f64>, thresholds: &Thresholds) -> bool {
    average_method_size
        .map(|size| size < thresholds.modularity_avg_method_size)
        .unwrap_or(false)
}
