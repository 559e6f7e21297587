use super::aggregate::{average_method_size, code_totals, find_test_ratio, summarize_coverage};
use crate::scan::readme::{is_big_readme, uses_markdown};
use crate::types::config::WeightTable;
use crate::types::record::RepositoryRecord;
use crate::types::signals::Signals;

pub fn derive_signals(record: &RepositoryRecord, table: &WeightTable) -> Signals {
    let thresholds = &table.thresholds;
    let test_files = record.test_files().count();
    let non_test_files = record.non_test_files().count();
    let coverage = summarize_coverage(&record.source_files, thresholds);
    let totals = code_totals(&record.source_files);

    let (readme_is_big, readme_uses_markdown) = match &record.readme {
        Some(readme) => (
            is_big_readme(&readme.decoded, thresholds.big_readme_size),
            uses_markdown(
                &readme.decoded,
                readme.raw.as_deref(),
                thresholds.readme_markdown_factor,
            ),
        ),
        None => (false, false),
    };

    Signals {
        readme_exists: record.readme.is_some(),
        readme_is_big,
        readme_uses_markdown,
        licence_file: record.licence_present,
        contributing_file: record.contributing_present,
        build_kind: record.build.as_ref().map(|build| build.kind),
        build_file_ok: record
            .build
            .as_ref()
            .map(|build| build.well_formed)
            .unwrap_or(false),
        uses_checkstyle: record.uses_checkstyle,
        uses_spotbugs: record.uses_spotbugs,
        test_files,
        non_test_files,
        test_ratio: find_test_ratio(test_files, non_test_files),
        method_coverage: coverage.method_ok_fraction,
        line_coverage: coverage.line_ok_fraction,
        comments: totals.comments,
        lines: totals.lines,
        methods: totals.methods,
        style_errors: totals.style_errors,
        average_method_size: average_method_size(totals.lines, totals.methods),
        uses_github_features: record.uses_github_features,
        uses_ci: record.ci_detected,
        commits: record.commit_count,
        contributors: record.contributor_count,
        branches: record.branch_count,
    }
}
