use crate::types::config::WeightTable;
use crate::types::scoring::{GradeBreakdown, Module};
use crate::types::signals::Signals;

/// `BUILD_FILE_OK` is only reachable through `BUILD_EXISTS`.
pub fn score_packaging(signals: &Signals, table: &WeightTable, breakdown: &mut GradeBreakdown) {
    if !signals.build_exists() {
        return;
    }
    breakdown.set(Module::BuildExists, table.leaf_share(Module::BuildExists));
    if signals.build_file_ok {
        breakdown.set(Module::BuildFileOk, table.leaf_share(Module::BuildFileOk));
    }
}
