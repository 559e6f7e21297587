use serde::Serialize;
use std::collections::BTreeMap;

/// Smallest independently graded criterion, bonuses included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Module {
    Readme,
    BigReadme,
    ReadmeUsesMarkdown,
    BuildExists,
    BuildFileOk,
    LicenceFile,
    ContributingFile,
    TestingExistence,
    TestingCoverage,
    GithubFeatures,
    CommentingMethodCoverage,
    CommentingLineCoverage,
    Checkstyle,
    Spotbugs,
    Ci,
    Modularity,
}

impl Module {
    pub const ALL: [Module; 16] = [
        Module::Readme,
        Module::BigReadme,
        Module::ReadmeUsesMarkdown,
        Module::BuildExists,
        Module::BuildFileOk,
        Module::LicenceFile,
        Module::ContributingFile,
        Module::TestingExistence,
        Module::TestingCoverage,
        Module::GithubFeatures,
        Module::CommentingMethodCoverage,
        Module::CommentingLineCoverage,
        Module::Checkstyle,
        Module::Spotbugs,
        Module::Ci,
        Module::Modularity,
    ];

    pub const BONUSES: [Module; 5] = [
        Module::BigReadme,
        Module::ReadmeUsesMarkdown,
        Module::LicenceFile,
        Module::ContributingFile,
        Module::GithubFeatures,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Readme => "README",
            Self::BigReadme => "BIG_README",
            Self::ReadmeUsesMarkdown => "README_USES_MARKDOWN",
            Self::BuildExists => "BUILD_EXISTS",
            Self::BuildFileOk => "BUILD_FILE_OK",
            Self::LicenceFile => "LICENCE_FILE",
            Self::ContributingFile => "CONTRIBUTING_FILE",
            Self::TestingExistence => "TESTING_EXISTENCE",
            Self::TestingCoverage => "TESTING_COVERAGE",
            Self::GithubFeatures => "GITHUB_FEATURES",
            Self::CommentingMethodCoverage => "COMMENTING_METHOD_COVERAGE",
            Self::CommentingLineCoverage => "COMMENTING_LINE_COVERAGE",
            Self::Checkstyle => "CHECKSTYLE",
            Self::Spotbugs => "SPOTBUGS",
            Self::Ci => "CI",
            Self::Modularity => "MODULARITY",
        }
    }

    pub fn is_bonus(self) -> bool {
        Self::BONUSES.contains(&self)
    }
}

/// Top-level module shown in the report, rolled up from one or two leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Readme,
    Packaging,
    Testing,
    Commenting,
    Checkstyle,
    Spotbugs,
    Ci,
    Modularity,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Readme,
        Category::Packaging,
        Category::Testing,
        Category::Commenting,
        Category::Checkstyle,
        Category::Spotbugs,
        Category::Ci,
        Category::Modularity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Readme => "README",
            Self::Packaging => "PACKAGING",
            Self::Testing => "TESTING",
            Self::Commenting => "COMMENTING",
            Self::Checkstyle => "CHECKSTYLE",
            Self::Spotbugs => "SPOTBUGS",
            Self::Ci => "CI",
            Self::Modularity => "MODULARITY",
        }
    }

    pub fn leaves(self) -> &'static [Module] {
        match self {
            Self::Readme => &[Module::Readme],
            Self::Packaging => &[Module::BuildExists, Module::BuildFileOk],
            Self::Testing => &[Module::TestingExistence, Module::TestingCoverage],
            Self::Commenting => &[
                Module::CommentingMethodCoverage,
                Module::CommentingLineCoverage,
            ],
            Self::Checkstyle => &[Module::Checkstyle],
            Self::Spotbugs => &[Module::Spotbugs],
            Self::Ci => &[Module::Ci],
            Self::Modularity => &[Module::Modularity],
        }
    }

    /// Categories whose value is a sum of two leaves rather than a single one.
    pub fn is_composite(self) -> bool {
        self.leaves().len() > 1
    }
}

/// Per-repository grade: leaf shares plus roll-ups derived from them.
///
/// Leaves hold unscaled shares of the top mark. Scaled values are derived on
/// read, and category roll-ups are recomputed from the leaves on every
/// `finalize`, so finalizing twice never drifts.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeBreakdown {
    top_mark: f64,
    leaves: BTreeMap<Module, f64>,
    categories: BTreeMap<Category, f64>,
}

impl GradeBreakdown {
    pub fn new(top_mark: f64) -> Self {
        Self {
            top_mark,
            leaves: Module::ALL.iter().map(|module| (*module, 0.0)).collect(),
            categories: Category::ALL
                .iter()
                .map(|category| (*category, 0.0))
                .collect(),
        }
    }

    /// Set a leaf share. Overwrites; negative or non-finite shares become 0.
    pub fn set(&mut self, module: Module, share: f64) {
        let share = if share.is_finite() { share.max(0.0) } else { 0.0 };
        self.leaves.insert(module, share);
    }

    pub fn share(&self, module: Module) -> f64 {
        self.leaves.get(&module).copied().unwrap_or(0.0)
    }

    #[cfg(test)]
    pub fn is_granted(&self, module: Module) -> bool {
        self.share(module) > 0.0
    }

    /// Leaf value on the top-mark scale.
    pub fn score(&self, module: Module) -> f64 {
        self.share(module) * self.top_mark
    }

    pub fn finalize(&mut self) {
        for category in Category::ALL {
            let share: f64 = category
                .leaves()
                .iter()
                .map(|module| self.share(*module))
                .sum();
            self.categories.insert(category, share * self.top_mark);
        }
    }

    /// Roll-up value on the top-mark scale, as of the last `finalize`.
    pub fn category(&self, category: Category) -> f64 {
        self.categories.get(&category).copied().unwrap_or(0.0)
    }

    /// Sum of every leaf (bonuses included) on the top-mark scale, uncapped.
    ///
    /// Roll-ups are descriptive and never contribute.
    pub fn raw_total(&self) -> f64 {
        self.leaves.values().sum::<f64>() * self.top_mark
    }

    /// Rounded to three places and capped at the top mark.
    pub fn total(&self) -> f64 {
        round_to(self.raw_total(), 3).min(self.top_mark)
    }

    pub fn leaves(&self) -> impl Iterator<Item = (Module, f64)> + '_ {
        self.leaves
            .iter()
            .map(|(module, share)| (*module, share * self.top_mark))
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}
