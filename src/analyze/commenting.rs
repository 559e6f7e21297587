use crate::types::config::WeightTable;
use crate::types::scoring::{GradeBreakdown, Module};
use crate::types::signals::Signals;

/// Both commenting leaves are proportional to the fraction of files that pass.
pub fn score_commenting(signals: &Signals, table: &WeightTable, breakdown: &mut GradeBreakdown) {
    breakdown.set(
        Module::CommentingMethodCoverage,
        fraction(signals.method_coverage) * table.leaf_share(Module::CommentingMethodCoverage),
    );
    breakdown.set(
        Module::CommentingLineCoverage,
        fraction(signals.line_coverage) * table.leaf_share(Module::CommentingLineCoverage),
    );
}

fn fraction(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
