use crate::types::config::WeightTable;
use crate::types::report::{GradeReport, ReportWarning};
use crate::types::scoring::{Category, Module};
use crate::types::signals::Signals;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct ScoreEntry {
    score: f64,
    max: f64,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    address: &'a str,
    total: f64,
    top_mark: f64,
    categories: BTreeMap<Category, ScoreEntry>,
    modules: BTreeMap<Module, ScoreEntry>,
    signals: &'a Signals,
    warnings: &'a [ReportWarning],
    evidence_gaps: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    build_failure_output: Option<&'a str>,
}

pub fn to_json(report: &GradeReport, table: &WeightTable) -> Result<String, serde_json::Error> {
    let breakdown = &report.breakdown;
    let view = JsonReport {
        address: &report.address,
        total: breakdown.total(),
        top_mark: table.top_mark,
        categories: Category::ALL
            .into_iter()
            .map(|category| {
                (
                    category,
                    ScoreEntry {
                        score: breakdown.category(category),
                        max: table.category_max(category),
                    },
                )
            })
            .collect(),
        modules: breakdown
            .leaves()
            .map(|(module, score)| {
                (
                    module,
                    ScoreEntry {
                        score,
                        max: table.leaf_max(module),
                    },
                )
            })
            .collect(),
        signals: &report.signals,
        warnings: &report.warnings,
        evidence_gaps: &report.evidence_gaps,
        build_failure_output: report.build_failure_output.as_deref(),
    };
    serde_json::to_string_pretty(&view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::evaluate;
    use crate::types::record::RepositoryRecord;

    #[test]
    fn json_report_carries_totals_maxima_and_warnings() {
        let table = WeightTable::default();
        let mut record = RepositoryRecord::empty("owner/repo");
        record.licence_present = true;
        let report = evaluate(&record, &table);

        let rendered = to_json(&report, &table).expect("json should serialize");
        let value: serde_json::Value =
            serde_json::from_str(&rendered).expect("rendered json should parse");

        assert_eq!(value["address"], "owner/repo");
        assert_eq!(value["top_mark"], 10.0);
        assert_eq!(value["categories"]["PACKAGING"]["max"], 2.0);
        assert!(value["modules"]["LICENCE_FILE"]["score"].as_f64().unwrap_or(0.0) > 0.0);
        assert_eq!(value["warnings"][0]["kind"], "no_build_detected");
        assert!(value.get("build_failure_output").is_none());
    }
}
