//! One summary row per repository, appended to a shared results sheet.

use crate::types::report::GradeReport;

/// Published column order. The trailing space of the last column is kept as is.
pub const HEADER: [&str; 21] = [
    "REPOSITORY ADDRESS",
    "README EXISTS",
    "README IS BIG",
    "README USES MARKDOWN",
    "LICENCE FILE EXISTS",
    "CONTRIBUTING FILE EXISTS",
    "BUILD FILE EXISTS",
    "BUILD FILE IS OK",
    "TEST FILES EXIST",
    "NUMBER OF TEST CLASSES",
    "NUMBER OF NON TEST CLASSES",
    "USES GITHUB FEATURES",
    "NUMBER OF COMMENTS",
    "NUMBER OF LINES",
    "NUMBER OF METHODS",
    "USES CHECKSTYLE",
    "USES SPOTBUGS",
    "USES CI",
    "NUMBER OF COMMITS",
    "NUMBER OF CONTRIBUTORS",
    "NUMBER OF BRANCHES ",
];

const LINE_END: &str = "\r\n";

pub fn header_line() -> String {
    join_line(HEADER.iter().map(|column| column.to_string()))
}

pub fn to_csv_row(report: &GradeReport) -> String {
    let signals = &report.signals;
    let flag = |value: bool| u8::from(value).to_string();

    join_line([
        report.address.clone(),
        flag(signals.readme_exists),
        flag(signals.readme_is_big),
        flag(signals.readme_uses_markdown),
        flag(signals.licence_file),
        flag(signals.contributing_file),
        flag(signals.build_exists()),
        flag(signals.build_file_ok),
        flag(signals.test_files_exist()),
        signals.test_files.to_string(),
        signals.non_test_files.to_string(),
        flag(signals.uses_github_features),
        signals.comments.to_string(),
        signals.lines.to_string(),
        signals.methods.to_string(),
        flag(signals.uses_checkstyle),
        flag(signals.uses_spotbugs),
        flag(signals.uses_ci),
        signals.commits.to_string(),
        signals.contributors.to_string(),
        signals.branches.to_string(),
    ])
}

fn join_line(fields: impl IntoIterator<Item = String>) -> String {
    let mut line = fields
        .into_iter()
        .map(|field| quote(&field))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str(LINE_END);
    line
}

/// Quote a field only when it contains a separator, a quote or a line break.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::evaluate;
    use crate::types::config::WeightTable;
    use crate::types::record::RepositoryRecord;

    #[test]
    fn header_keeps_published_order_and_trailing_space() {
        let header = header_line();
        assert!(header.starts_with("REPOSITORY ADDRESS,README EXISTS,README IS BIG,"));
        assert!(header.ends_with(",NUMBER OF CONTRIBUTORS,NUMBER OF BRANCHES \r\n"));
    }

    #[test]
    fn row_matches_header_width() {
        let report = evaluate(&RepositoryRecord::empty("o/r"), &WeightTable::default());
        let row = to_csv_row(&report);
        assert_eq!(row.trim_end().split(',').count(), HEADER.len());
    }

    #[test]
    fn booleans_and_counts_are_plain_integers() {
        let mut record = RepositoryRecord::empty("owner/repo");
        record.licence_present = true;
        record.ci_detected = true;
        record.commit_count = 12;
        record.contributor_count = 3;
        record.branch_count = 2;
        let report = evaluate(&record, &WeightTable::default());
        assert_eq!(
            to_csv_row(&report),
            "owner/repo,0,0,0,1,0,0,0,0,0,0,0,0,0,0,0,0,1,12,3,2\r\n"
        );
    }

    #[test]
    fn fields_with_separators_are_quoted() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
