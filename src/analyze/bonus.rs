use crate::types::config::WeightTable;
use crate::types::scoring::{GradeBreakdown, Module};
use crate::types::signals::Signals;

pub fn score_bonuses(signals: &Signals, table: &WeightTable, breakdown: &mut GradeBreakdown) {
    if signals.licence_file {
        breakdown.set(Module::LicenceFile, table.leaf_share(Module::LicenceFile));
    }
    if signals.contributing_file {
        breakdown.set(
            Module::ContributingFile,
            table.leaf_share(Module::ContributingFile),
        );
    }
    if signals.uses_github_features {
        breakdown.set(
            Module::GithubFeatures,
            table.leaf_share(Module::GithubFeatures),
        );
    }
}
