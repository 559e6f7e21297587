use crate::types::config::WeightTable;
use crate::types::scoring::{GradeBreakdown, Module};
use crate::types::signals::Signals;

pub fn score_testing(signals: &Signals, table: &WeightTable, breakdown: &mut GradeBreakdown) {
    if signals.test_files_exist() {
        breakdown.set(
            Module::TestingExistence,
            table.leaf_share(Module::TestingExistence),
        );
    }
    if signals.test_ratio > table.thresholds.test_ratio {
        breakdown.set(
            Module::TestingCoverage,
            table.leaf_share(Module::TestingCoverage),
        );
    }
}
