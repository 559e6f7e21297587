use crate::types::config::WeightTable;
use crate::types::report::{GradeReport, ReportWarning};
use crate::types::scoring::{Category, Module};

pub fn warning_text(warning: &ReportWarning) -> String {
    match warning {
        ReportWarning::UnverifiedBuildTool { tool } => format!(
            "[WARNING] {tool} was used to build this project.\n\
[WARNING] This might mean that the build file is incorrectly flagged as wrong\n\
[WARNING] (BUILD_FILE_OK:0). If you think this is the case please inform me!"
        ),
        ReportWarning::NoBuildDetected => "[WARNING] NOTHING was used to build this project.\n\
[WARNING] If you think this is wrong please inform me!"
            .to_string(),
        ReportWarning::NoSourceFiles => "[WARNING] No Java source files were found.\n\
[WARNING] Code metrics could not be evaluated!"
            .to_string(),
        ReportWarning::TooFewCommits { count, minimum } => format!(
            "[WARNING] This Repository doesn't have enough commits ({count}/{minimum})!\n\
[WARNING] Please evaluate why!"
        ),
        ReportWarning::TooFewContributors { count, minimum } => format!(
            "[WARNING] This Repository doesn't have enough contributors ({count}/{minimum})!\n\
[WARNING] Please evaluate why!"
        ),
    }
}

pub fn to_text(report: &GradeReport, table: &WeightTable) -> String {
    let breakdown = &report.breakdown;
    let mut output = String::new();

    output.push_str(&report.address);
    output.push_str("\nGrades:");
    for category in Category::ALL {
        output.push_str(&format!(
            "\n{}:{:.2}/{:.2}",
            category.as_str(),
            breakdown.category(category),
            table.category_max(category)
        ));
    }

    for category in Category::ALL.into_iter().filter(|c| c.is_composite()) {
        output.push_str(&format!("\n\n{} was evaluated from:", category.as_str()));
        for module in category.leaves() {
            output.push_str(&format!(
                "\n -{}:{:.2}/{:.2}",
                module.as_str(),
                breakdown.score(*module),
                table.leaf_max(*module)
            ));
        }
    }

    output.push_str("\n\nBonuses:");
    for module in Module::BONUSES {
        output.push_str(&format!(
            "\n{}:{:.2}/{:.2}",
            module.as_str(),
            breakdown.score(module),
            table.leaf_max(module)
        ));
    }

    output.push_str(&format!(
        "\n\nStyle checker errors:{}",
        report.signals.style_errors
    ));
    output.push_str(&format!(
        "\n\nTotal Grade:{}/{}",
        breakdown.total(),
        table.top_mark
    ));

    for warning in &report.warnings {
        output.push_str("\n\n");
        output.push_str(&warning_text(warning));
    }

    if !report.evidence_gaps.is_empty() {
        output.push_str("\n\n[NOTE] Some evidence could not be collected and was scored as absent:");
        for gap in &report.evidence_gaps {
            output.push_str(&format!("\n - {gap}"));
        }
    }

    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::evaluate;
    use crate::types::record::RepositoryRecord;

    #[test]
    fn empty_repository_report_has_layout_and_warnings() {
        let table = WeightTable::default();
        let mut record = RepositoryRecord::empty("owner/empty");
        record.evidence_gaps.push("get_readme: timed out: readme".to_string());
        let report = evaluate(&record, &table);

        let text = to_text(&report, &table);
        assert!(text.starts_with("owner/empty\nGrades:\nREADME:0.00/1.00\nPACKAGING:0.00/2.00"));
        assert!(text.contains("\n\nPACKAGING was evaluated from:\n -BUILD_EXISTS:0.00/1.00\n -BUILD_FILE_OK:0.00/1.00"));
        assert!(text.contains("\n -TESTING_EXISTENCE:0.00/0.45\n -TESTING_COVERAGE:0.00/1.05"));
        assert!(text.contains("\nBonuses:\nBIG_README:0.00/0.10"));
        assert!(text.contains("Total Grade:0/10"));
        assert!(text.contains("NOTHING was used to build this project."));
        assert!(text.contains("doesn't have enough commits (0/50)"));
        assert!(text.contains("doesn't have enough contributors (0/7)"));
        assert!(text.contains("\n - get_readme: timed out: readme"));
    }

    #[test]
    fn gradle_warning_names_the_tool() {
        let text = warning_text(&ReportWarning::UnverifiedBuildTool {
            tool: crate::types::record::BuildKind::GradleKotlin,
        });
        assert!(text.starts_with("[WARNING] Gradle - Kotlin was used to build this project."));
    }
}
