pub mod aggregate;
pub mod bonus;
pub mod commenting;
pub mod packaging;
pub mod quality;
pub mod readme;
pub mod signals;
pub mod testing;

use crate::types::config::{Requirements, WeightTable};
use crate::types::record::{BuildKind, RepositoryRecord};
use crate::types::report::{GradeReport, ReportWarning};
use crate::types::scoring::GradeBreakdown;
use crate::types::signals::Signals;
use tracing::debug;

/// Map a signal set onto a finalized breakdown. Never fails; absent evidence scores 0.
pub fn grade(signals: &Signals, table: &WeightTable) -> GradeBreakdown {
    let mut breakdown = GradeBreakdown::new(table.top_mark);

    readme::score_readme(signals, table, &mut breakdown);
    packaging::score_packaging(signals, table, &mut breakdown);
    testing::score_testing(signals, table, &mut breakdown);
    commenting::score_commenting(signals, table, &mut breakdown);
    quality::score_quality(signals, table, &mut breakdown);
    bonus::score_bonuses(signals, table, &mut breakdown);

    breakdown.finalize();
    breakdown
}

/// Commit and contributor warnings fire only below the minimum; meeting it is enough.
pub fn warnings(signals: &Signals, requirements: &Requirements) -> Vec<ReportWarning> {
    let mut warnings = Vec::new();
    match signals.build_kind {
        Some(BuildKind::Maven) => {}
        Some(tool) => warnings.push(ReportWarning::UnverifiedBuildTool { tool }),
        None => warnings.push(ReportWarning::NoBuildDetected),
    }
    if signals.non_test_files == 0 {
        warnings.push(ReportWarning::NoSourceFiles);
    }
    if signals.commits < requirements.min_commits {
        warnings.push(ReportWarning::TooFewCommits {
            count: signals.commits,
            minimum: requirements.min_commits,
        });
    }
    if signals.contributors < requirements.min_contributors {
        warnings.push(ReportWarning::TooFewContributors {
            count: signals.contributors,
            minimum: requirements.min_contributors,
        });
    }
    warnings
}

pub fn evaluate(record: &RepositoryRecord, table: &WeightTable) -> GradeReport {
    let signals = signals::derive_signals(record, table);
    let breakdown = grade(&signals, table);
    debug!(
        address = %record.address,
        total = breakdown.total(),
        "graded repository"
    );

    GradeReport {
        address: record.address.clone(),
        warnings: warnings(&signals, &table.requirements),
        evidence_gaps: record.evidence_gaps.clone(),
        build_failure_output: record
            .build
            .as_ref()
            .and_then(|build| build.failure_output.clone()),
        signals,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::{BuildDescriptor, CodeMetrics, Readme, SourceFile};
    use crate::types::scoring::{Category, Module};

    fn full_signals() -> Signals {
        Signals {
            readme_exists: true,
            readme_is_big: true,
            readme_uses_markdown: true,
            licence_file: true,
            contributing_file: true,
            build_kind: Some(BuildKind::Maven),
            build_file_ok: true,
            uses_checkstyle: true,
            uses_spotbugs: true,
            test_files: 5,
            non_test_files: 5,
            test_ratio: 1.0,
            method_coverage: 1.0,
            line_coverage: 1.0,
            comments: 100,
            lines: 100,
            methods: 10,
            style_errors: 0,
            average_method_size: Some(10.0),
            uses_github_features: true,
            uses_ci: true,
            commits: 100,
            contributors: 10,
            branches: 3,
        }
    }

    fn source(name: &str, is_test: bool, metrics: Option<CodeMetrics>) -> SourceFile {
        SourceFile {
            name: name.to_string(),
            path: format!("src/{name}"),
            is_test,
            metrics,
        }
    }

    fn maven(well_formed: bool) -> BuildDescriptor {
        BuildDescriptor {
            kind: BuildKind::Maven,
            path: "pom.xml".to_string(),
            descriptor_text: String::new(),
            well_formed,
            failure_output: None,
        }
    }

    #[test]
    fn every_leaf_stays_within_its_maximum() {
        let table = WeightTable::default();
        let mut signals = full_signals();
        signals.method_coverage = 7.5;
        signals.line_coverage = f64::NAN;
        let breakdown = grade(&signals, &table);
        for (module, score) in breakdown.leaves() {
            assert!(score >= 0.0, "{} is negative", module.as_str());
            assert!(
                score <= table.leaf_max(module) + 1e-9,
                "{} exceeds its maximum",
                module.as_str()
            );
        }
    }

    #[test]
    fn all_bonuses_granted_caps_total_at_top_mark() {
        let table = WeightTable::default();
        let breakdown = grade(&full_signals(), &table);
        for module in Module::BONUSES {
            assert!(breakdown.is_granted(module), "{}", module.as_str());
        }
        assert!(breakdown.raw_total() > table.top_mark);
        assert_eq!(breakdown.total(), table.top_mark);
    }

    #[test]
    fn build_file_ok_requires_build_exists() {
        let mut signals = full_signals();
        signals.build_kind = None;
        signals.build_file_ok = true;
        let breakdown = grade(&signals, &WeightTable::default());
        assert!(!breakdown.is_granted(Module::BuildExists));
        assert!(!breakdown.is_granted(Module::BuildFileOk));
        assert_eq!(breakdown.category(Category::Packaging), 0.0);
    }

    #[test]
    fn empty_record_scores_zero_and_warns() {
        let table = WeightTable::default();
        let report = evaluate(&RepositoryRecord::empty("owner/empty"), &table);
        for (module, score) in report.breakdown.leaves() {
            assert_eq!(score, 0.0, "{}", module.as_str());
        }
        assert_eq!(report.breakdown.total(), 0.0);
        assert!(report.warnings.contains(&ReportWarning::NoBuildDetected));
        assert!(report.warnings.contains(&ReportWarning::TooFewCommits {
            count: 0,
            minimum: 50
        }));
        assert!(report.warnings.contains(&ReportWarning::TooFewContributors {
            count: 0,
            minimum: 7
        }));
    }

    #[test]
    fn maven_scenario_grants_readme_packaging_and_testing() {
        let table = WeightTable::default();
        let mut record = RepositoryRecord::empty("owner/maven");
        record.readme = Some(Readme {
            decoded: "a".repeat(2000),
            raw: Some("a".repeat(1700)),
        });
        record.build = Some(maven(true));
        for index in 0..10 {
            record.source_files.push(source(
                &format!("Main{index}.java"),
                false,
                Some(CodeMetrics {
                    line_count: 20,
                    method_count: 1,
                    comment_count: 2,
                    style_error_count: 0,
                }),
            ));
        }
        for index in 0..3 {
            record
                .source_files
                .push(source(&format!("Main{index}Test.java"), true, None));
        }

        let report = evaluate(&record, &table);
        assert_eq!(report.signals.test_ratio, 0.3);
        for module in [
            Module::BigReadme,
            Module::ReadmeUsesMarkdown,
            Module::BuildExists,
            Module::BuildFileOk,
            Module::TestingExistence,
            Module::TestingCoverage,
        ] {
            assert!(report.breakdown.is_granted(module), "{}", module.as_str());
        }
        assert!((report.breakdown.category(Category::Packaging) - 2.0).abs() < 1e-9);
        assert!((report.breakdown.category(Category::Testing) - 1.5).abs() < 1e-9);
        assert!(!report
            .warnings
            .iter()
            .any(|warning| matches!(warning, ReportWarning::NoBuildDetected)));
    }

    #[test]
    fn malformed_pom_keeps_build_exists_only() {
        let mut record = RepositoryRecord::empty("owner/broken");
        record.build = Some(maven(false));
        let report = evaluate(&record, &WeightTable::default());
        assert!(report.breakdown.is_granted(Module::BuildExists));
        assert_eq!(report.breakdown.score(Module::BuildFileOk), 0.0);
    }

    #[test]
    fn gradle_build_is_flagged_as_unverified() {
        let mut signals = full_signals();
        signals.build_kind = Some(BuildKind::GradleKotlin);
        let warnings = warnings(&signals, &Requirements::default());
        assert_eq!(
            warnings,
            vec![ReportWarning::UnverifiedBuildTool {
                tool: BuildKind::GradleKotlin
            }]
        );
    }

    #[test]
    fn counts_at_the_minimum_do_not_warn() {
        let requirements = Requirements::default();
        let mut signals = full_signals();
        signals.commits = requirements.min_commits;
        signals.contributors = requirements.min_contributors;
        assert!(warnings(&signals, &requirements).is_empty());

        signals.commits -= 1;
        signals.contributors -= 1;
        assert_eq!(
            warnings(&signals, &requirements),
            vec![
                ReportWarning::TooFewCommits {
                    count: 49,
                    minimum: 50
                },
                ReportWarning::TooFewContributors {
                    count: 6,
                    minimum: 7
                },
            ]
        );
    }

    #[test]
    fn test_ratio_at_threshold_is_not_enough() {
        let mut signals = full_signals();
        signals.test_ratio = 0.25;
        let breakdown = grade(&signals, &WeightTable::default());
        assert!(breakdown.is_granted(Module::TestingExistence));
        assert!(!breakdown.is_granted(Module::TestingCoverage));
    }

    #[test]
    fn partial_comment_coverage_scores_proportionally() {
        let mut signals = full_signals();
        signals.method_coverage = 0.5;
        signals.line_coverage = 0.0;
        let breakdown = grade(&signals, &WeightTable::default());
        assert!((breakdown.score(Module::CommentingMethodCoverage) - 0.25).abs() < 1e-9);
        assert_eq!(breakdown.score(Module::CommentingLineCoverage), 0.0);
        assert!((breakdown.category(Category::Commenting) - 0.25).abs() < 1e-9);
    }
}
