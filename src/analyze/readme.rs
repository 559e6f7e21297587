use crate::types::config::WeightTable;
use crate::types::scoring::{GradeBreakdown, Module};
use crate::types::signals::Signals;

pub fn score_readme(signals: &Signals, table: &WeightTable, breakdown: &mut GradeBreakdown) {
    if !signals.readme_exists {
        return;
    }
    breakdown.set(Module::Readme, table.leaf_share(Module::Readme));
    if signals.readme_is_big {
        breakdown.set(Module::BigReadme, table.leaf_share(Module::BigReadme));
    }
    if signals.readme_uses_markdown {
        breakdown.set(
            Module::ReadmeUsesMarkdown,
            table.leaf_share(Module::ReadmeUsesMarkdown),
        );
    }
}
