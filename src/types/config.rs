use crate::error::GradeError;
use crate::types::scoring::{Category, Module};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraderConfig {
    pub grading: Option<GradingConfig>,
    pub weights: Option<HashMap<String, f64>>,
    pub splits: Option<SplitConfig>,
    pub bonuses: Option<HashMap<String, f64>>,
    pub thresholds: Option<ThresholdConfig>,
    pub requirements: Option<RequirementsConfig>,
    pub collection: Option<CollectionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradingConfig {
    pub top_mark: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitConfig {
    pub build_exists: Option<f64>,
    pub testing_existence: Option<f64>,
    pub commenting_line_coverage: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdConfig {
    pub big_readme_size: Option<usize>,
    pub readme_markdown_factor: Option<f64>,
    pub lines_per_comment: Option<f64>,
    pub methods_per_comment: Option<f64>,
    pub test_ratio: Option<f64>,
    pub modularity_avg_method_size: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequirementsConfig {
    pub min_commits: Option<u64>,
    pub min_contributors: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    pub max_retries: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
}

const WEIGHT_KEYS: [&str; 8] = [
    "readme",
    "packaging",
    "testing",
    "commenting",
    "checkstyle",
    "spotbugs",
    "ci",
    "modularity",
];

const BONUS_KEYS: [&str; 5] = [
    "big_readme",
    "readme_uses_markdown",
    "licence_file",
    "contributing_file",
    "github_features",
];

/// Percentile of the top mark each top-level category is worth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryWeights {
    pub readme: f64,
    pub packaging: f64,
    pub testing: f64,
    pub commenting: f64,
    pub checkstyle: f64,
    pub spotbugs: f64,
    pub ci: f64,
    pub modularity: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            readme: 0.10,
            packaging: 0.20,
            testing: 0.15,
            commenting: 0.10,
            checkstyle: 0.10,
            spotbugs: 0.10,
            ci: 0.10,
            modularity: 0.15,
        }
    }
}

impl CategoryWeights {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Readme => self.readme,
            Category::Packaging => self.packaging,
            Category::Testing => self.testing,
            Category::Commenting => self.commenting,
            Category::Checkstyle => self.checkstyle,
            Category::Spotbugs => self.spotbugs,
            Category::Ci => self.ci,
            Category::Modularity => self.modularity,
        }
    }

    fn from_map(map: &HashMap<String, f64>) -> Option<Self> {
        Some(Self {
            readme: *map.get("readme")?,
            packaging: *map.get("packaging")?,
            testing: *map.get("testing")?,
            commenting: *map.get("commenting")?,
            checkstyle: *map.get("checkstyle")?,
            spotbugs: *map.get("spotbugs")?,
            ci: *map.get("ci")?,
            modularity: *map.get("modularity")?,
        })
    }

    pub fn sum(&self) -> f64 {
        Category::ALL.iter().map(|category| self.get(*category)).sum()
    }
}

/// Share of a category assigned to its first leaf; the second leaf gets the rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splits {
    pub build_exists: f64,
    pub testing_existence: f64,
    pub commenting_line_coverage: f64,
}

impl Default for Splits {
    fn default() -> Self {
        Self {
            build_exists: 0.5,
            testing_existence: 0.3,
            commenting_line_coverage: 0.5,
        }
    }
}

/// Bonus shares, expressed as a fraction of the top mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonusWeights {
    pub big_readme: f64,
    pub readme_uses_markdown: f64,
    pub licence_file: f64,
    pub contributing_file: f64,
    pub github_features: f64,
}

impl Default for BonusWeights {
    fn default() -> Self {
        Self {
            big_readme: 0.01,
            readme_uses_markdown: 0.01,
            licence_file: 0.01,
            contributing_file: 0.01,
            github_features: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub big_readme_size: usize,
    pub readme_markdown_factor: f64,
    pub lines_per_comment: f64,
    pub methods_per_comment: f64,
    pub test_ratio: f64,
    pub modularity_avg_method_size: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            big_readme_size: 1500,
            readme_markdown_factor: 1.08,
            lines_per_comment: 15.0,
            methods_per_comment: 1.0,
            test_ratio: 0.25,
            modularity_avg_method_size: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {
    pub min_commits: u64,
    pub min_contributors: u64,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            min_commits: 50,
            min_contributors: 7,
        }
    }
}

/// Retry and timeout policy applied around every collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 250,
            timeout_secs: 30,
        }
    }
}

impl CollectionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Exponential backoff; `attempt` is 1 for the first retry.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

/// Resolved, read-only grading configuration shared by every repository.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    pub top_mark: f64,
    pub weights: CategoryWeights,
    pub splits: Splits,
    pub bonuses: BonusWeights,
    pub thresholds: Thresholds,
    pub requirements: Requirements,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            top_mark: 10.0,
            weights: CategoryWeights::default(),
            splits: Splits::default(),
            bonuses: BonusWeights::default(),
            thresholds: Thresholds::default(),
            requirements: Requirements::default(),
        }
    }
}

impl WeightTable {
    /// Unscaled share a leaf module is worth when fully granted.
    pub fn leaf_share(&self, module: Module) -> f64 {
        let w = &self.weights;
        let s = &self.splits;
        let b = &self.bonuses;
        match module {
            Module::Readme => w.readme,
            Module::BuildExists => w.packaging * s.build_exists,
            Module::BuildFileOk => w.packaging * (1.0 - s.build_exists),
            Module::TestingExistence => w.testing * s.testing_existence,
            Module::TestingCoverage => w.testing * (1.0 - s.testing_existence),
            Module::CommentingMethodCoverage => w.commenting * (1.0 - s.commenting_line_coverage),
            Module::CommentingLineCoverage => w.commenting * s.commenting_line_coverage,
            Module::Checkstyle => w.checkstyle,
            Module::Spotbugs => w.spotbugs,
            Module::Ci => w.ci,
            Module::Modularity => w.modularity,
            Module::BigReadme => b.big_readme,
            Module::ReadmeUsesMarkdown => b.readme_uses_markdown,
            Module::LicenceFile => b.licence_file,
            Module::ContributingFile => b.contributing_file,
            Module::GithubFeatures => b.github_features,
        }
    }

    /// Maximum displayable score of a leaf module.
    pub fn leaf_max(&self, module: Module) -> f64 {
        self.leaf_share(module) * self.top_mark
    }

    /// Maximum displayable score of a top-level category.
    pub fn category_max(&self, category: Category) -> f64 {
        self.weights.get(category) * self.top_mark
    }
}

impl GraderConfig {
    pub fn top_mark(&self) -> f64 {
        self.grading
            .as_ref()
            .and_then(|grading| grading.top_mark)
            .unwrap_or(10.0)
    }

    pub fn category_weights(&self) -> CategoryWeights {
        self.weights
            .as_ref()
            .and_then(CategoryWeights::from_map)
            .unwrap_or_default()
    }

    pub fn splits(&self) -> Splits {
        let defaults = Splits::default();
        match &self.splits {
            Some(splits) => Splits {
                build_exists: splits.build_exists.unwrap_or(defaults.build_exists),
                testing_existence: splits
                    .testing_existence
                    .unwrap_or(defaults.testing_existence),
                commenting_line_coverage: splits
                    .commenting_line_coverage
                    .unwrap_or(defaults.commenting_line_coverage),
            },
            None => defaults,
        }
    }

    pub fn bonus_weights(&self) -> BonusWeights {
        let defaults = BonusWeights::default();
        match &self.bonuses {
            Some(bonuses) => BonusWeights {
                big_readme: *bonuses.get("big_readme").unwrap_or(&defaults.big_readme),
                readme_uses_markdown: *bonuses
                    .get("readme_uses_markdown")
                    .unwrap_or(&defaults.readme_uses_markdown),
                licence_file: *bonuses.get("licence_file").unwrap_or(&defaults.licence_file),
                contributing_file: *bonuses
                    .get("contributing_file")
                    .unwrap_or(&defaults.contributing_file),
                github_features: *bonuses
                    .get("github_features")
                    .unwrap_or(&defaults.github_features),
            },
            None => defaults,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        let defaults = Thresholds::default();
        match &self.thresholds {
            Some(thresholds) => Thresholds {
                big_readme_size: thresholds
                    .big_readme_size
                    .unwrap_or(defaults.big_readme_size),
                readme_markdown_factor: thresholds
                    .readme_markdown_factor
                    .unwrap_or(defaults.readme_markdown_factor),
                lines_per_comment: thresholds
                    .lines_per_comment
                    .unwrap_or(defaults.lines_per_comment),
                methods_per_comment: thresholds
                    .methods_per_comment
                    .unwrap_or(defaults.methods_per_comment),
                test_ratio: thresholds.test_ratio.unwrap_or(defaults.test_ratio),
                modularity_avg_method_size: thresholds
                    .modularity_avg_method_size
                    .unwrap_or(defaults.modularity_avg_method_size),
            },
            None => defaults,
        }
    }

    pub fn requirements(&self) -> Requirements {
        let defaults = Requirements::default();
        match &self.requirements {
            Some(requirements) => Requirements {
                min_commits: requirements.min_commits.unwrap_or(defaults.min_commits),
                min_contributors: requirements
                    .min_contributors
                    .unwrap_or(defaults.min_contributors),
            },
            None => defaults,
        }
    }

    pub fn collection(&self) -> CollectionSettings {
        let defaults = CollectionSettings::default();
        match &self.collection {
            Some(collection) => CollectionSettings {
                max_retries: collection.max_retries.unwrap_or(defaults.max_retries),
                base_delay_ms: collection.base_delay_ms.unwrap_or(defaults.base_delay_ms),
                timeout_secs: collection.timeout_secs.unwrap_or(defaults.timeout_secs),
            },
            None => defaults,
        }
    }

    /// Resolve into the table handed to the scoring engine. Call `validate` first.
    pub fn weight_table(&self) -> WeightTable {
        WeightTable {
            top_mark: self.top_mark(),
            weights: self.category_weights(),
            splits: self.splits(),
            bonuses: self.bonus_weights(),
            thresholds: self.thresholds(),
            requirements: self.requirements(),
        }
    }

    pub fn validate(&self) -> Result<(), GradeError> {
        let top_mark = self.top_mark();
        if !top_mark.is_finite() || top_mark <= 0.0 {
            return Err(GradeError::ConfigParse(
                "grading.top_mark must be greater than 0".to_string(),
            ));
        }

        if let Some(weights) = &self.weights {
            let unknown = unknown_keys(weights, &WEIGHT_KEYS);
            if !unknown.is_empty() {
                return Err(GradeError::ConfigParse(format!(
                    "weights contains unknown key(s): {}",
                    unknown.join(", ")
                )));
            }
            let missing = WEIGHT_KEYS
                .iter()
                .filter(|key| !weights.contains_key(**key))
                .copied()
                .collect::<Vec<_>>();
            if !missing.is_empty() {
                return Err(GradeError::ConfigParse(format!(
                    "weights is missing required module(s): {}",
                    missing.join(", ")
                )));
            }
            if weights.values().any(|weight| !(0.0..=1.0).contains(weight)) {
                return Err(GradeError::ConfigParse(
                    "weights values must be between 0.0 and 1.0".to_string(),
                ));
            }
        }

        let weight_sum = self.category_weights().sum();
        if (weight_sum - 1.0).abs() > 0.001 {
            return Err(GradeError::ConfigParse(format!(
                "weights must sum to 1.0 (found {:.3})",
                weight_sum
            )));
        }

        let splits = self.splits();
        for (name, value) in [
            ("splits.build_exists", splits.build_exists),
            ("splits.testing_existence", splits.testing_existence),
            (
                "splits.commenting_line_coverage",
                splits.commenting_line_coverage,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GradeError::ConfigParse(format!(
                    "{name} must be between 0.0 and 1.0"
                )));
            }
        }

        if let Some(bonuses) = &self.bonuses {
            let unknown = unknown_keys(bonuses, &BONUS_KEYS);
            if !unknown.is_empty() {
                return Err(GradeError::ConfigParse(format!(
                    "bonuses contains unknown key(s): {}",
                    unknown.join(", ")
                )));
            }
            if bonuses.values().any(|bonus| !(0.0..=1.0).contains(bonus)) {
                return Err(GradeError::ConfigParse(
                    "bonuses values must be between 0.0 and 1.0".to_string(),
                ));
            }
        }

        let thresholds = self.thresholds();
        for (name, value) in [
            (
                "thresholds.readme_markdown_factor",
                thresholds.readme_markdown_factor,
            ),
            ("thresholds.lines_per_comment", thresholds.lines_per_comment),
            (
                "thresholds.methods_per_comment",
                thresholds.methods_per_comment,
            ),
            (
                "thresholds.modularity_avg_method_size",
                thresholds.modularity_avg_method_size,
            ),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GradeError::ConfigParse(format!(
                    "{name} must be greater than 0"
                )));
            }
        }
        if !thresholds.test_ratio.is_finite() || thresholds.test_ratio < 0.0 {
            return Err(GradeError::ConfigParse(
                "thresholds.test_ratio must not be negative".to_string(),
            ));
        }

        let collection = self.collection();
        if collection.timeout_secs == 0 {
            return Err(GradeError::ConfigParse(
                "collection.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if collection.max_retries > 10 {
            return Err(GradeError::ConfigParse(
                "collection.max_retries must be at most 10".to_string(),
            ));
        }

        Ok(())
    }
}

fn unknown_keys(map: &HashMap<String, f64>, allowed: &[&str]) -> Vec<String> {
    let mut unknown = map
        .keys()
        .filter(|key| !allowed.contains(&key.as_str()))
        .cloned()
        .collect::<Vec<_>>();
    unknown.sort();
    unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let cfg: GraderConfig = toml::from_str("").expect("empty config should parse");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.weight_table(), WeightTable::default());
    }

    #[test]
    fn default_weights_sum_to_one() {
        assert!((CategoryWeights::default().sum() - 1.0).abs() < 0.001);
    }

    #[test]
    fn leaf_shares_split_their_category() {
        let table = WeightTable::default();
        let packaging =
            table.leaf_share(Module::BuildExists) + table.leaf_share(Module::BuildFileOk);
        let testing = table.leaf_share(Module::TestingExistence)
            + table.leaf_share(Module::TestingCoverage);
        let commenting = table.leaf_share(Module::CommentingMethodCoverage)
            + table.leaf_share(Module::CommentingLineCoverage);
        assert!((packaging - 0.20).abs() < 1e-9);
        assert!((testing - 0.15).abs() < 1e-9);
        assert!((commenting - 0.10).abs() < 1e-9);
        assert!((table.leaf_max(Module::BuildExists) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[grading]
top_mark = 20.0

[weights]
readme = 0.05
packaging = 0.25
testing = 0.15
commenting = 0.10
checkstyle = 0.10
spotbugs = 0.10
ci = 0.10
modularity = 0.15

[splits]
build_exists = 0.4

[bonuses]
big_readme = 0.02

[thresholds]
test_ratio = 0.5

[requirements]
min_contributors = 4

[collection]
max_retries = 0
timeout_secs = 5
"#;
        let cfg: GraderConfig = toml::from_str(toml_str).expect("full config should parse");
        assert!(cfg.validate().is_ok());

        let table = cfg.weight_table();
        assert_eq!(table.top_mark, 20.0);
        assert_eq!(table.weights.packaging, 0.25);
        assert_eq!(table.splits.build_exists, 0.4);
        assert_eq!(table.splits.testing_existence, 0.3);
        assert_eq!(table.bonuses.big_readme, 0.02);
        assert_eq!(table.bonuses.licence_file, 0.01);
        assert_eq!(table.thresholds.test_ratio, 0.5);
        assert_eq!(table.requirements.min_contributors, 4);
        assert_eq!(table.requirements.min_commits, 50);
        assert_eq!(cfg.collection().max_retries, 0);
        assert_eq!(cfg.collection().timeout(), Duration::from_secs(5));
    }

    #[test]
    fn validate_rejects_invalid_weight_sum() {
        let toml_str = r#"
[weights]
readme = 0.9
packaging = 0.9
testing = 0.15
commenting = 0.10
checkstyle = 0.10
spotbugs = 0.10
ci = 0.10
modularity = 0.15
"#;
        let cfg: GraderConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("must sum to 1.0"));
    }

    #[test]
    fn validate_rejects_missing_required_module() {
        let toml_str = r#"
[weights]
readme = 0.30
packaging = 0.20
testing = 0.15
commenting = 0.10
checkstyle = 0.10
spotbugs = 0.15
"#;
        let cfg: GraderConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("missing required module"));
        assert!(err.to_string().contains("ci"));
        assert!(err.to_string().contains("modularity"));
    }

    #[test]
    fn validate_rejects_unknown_weight_keys() {
        let toml_str = r#"
[weights]
readme = 0.10
packaging = 0.20
testing = 0.15
commenting = 0.10
checkstyle = 0.10
spotbugs = 0.10
ci = 0.10
modularity = 0.15
documentation = 0.0
"#;
        let cfg: GraderConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("unknown key"));
        assert!(err.to_string().contains("documentation"));
    }

    #[test]
    fn validate_rejects_unknown_bonus_keys() {
        let toml_str = r#"
[bonuses]
stars = 0.05
"#;
        let cfg: GraderConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("bonuses contains unknown key"));
    }

    #[test]
    fn validate_rejects_out_of_range_split() {
        let toml_str = r#"
[splits]
testing_existence = 1.5
"#;
        let cfg: GraderConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("splits.testing_existence"));
    }

    #[test]
    fn validate_rejects_non_positive_top_mark_and_thresholds() {
        let cfg: GraderConfig =
            toml::from_str("[grading]\ntop_mark = 0.0\n").expect("config should parse");
        assert!(cfg.validate().is_err());

        let cfg: GraderConfig = toml::from_str("[thresholds]\nlines_per_comment = 0.0\n")
            .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("thresholds.lines_per_comment"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg: GraderConfig =
            toml::from_str("[collection]\ntimeout_secs = 0\n").expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("collection.timeout_secs"));
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let settings = CollectionSettings {
            max_retries: 3,
            base_delay_ms: 100,
            timeout_secs: 30,
        };
        assert_eq!(settings.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(settings.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(settings.delay_for_attempt(3), Duration::from_millis(400));
    }
}
