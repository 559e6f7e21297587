use super::aggregate::modularity_ok;
use crate::types::config::WeightTable;
use crate::types::scoring::{GradeBreakdown, Module};
use crate::types::signals::Signals;

pub fn score_quality(signals: &Signals, table: &WeightTable, breakdown: &mut GradeBreakdown) {
    if signals.uses_checkstyle {
        breakdown.set(Module::Checkstyle, table.leaf_share(Module::Checkstyle));
    }
    if signals.uses_spotbugs {
        breakdown.set(Module::Spotbugs, table.leaf_share(Module::Spotbugs));
    }
    if signals.uses_ci {
        breakdown.set(Module::Ci, table.leaf_share(Module::Ci));
    }
    if modularity_ok(signals.average_method_size, &table.thresholds) {
        breakdown.set(Module::Modularity, table.leaf_share(Module::Modularity));
    }
}
