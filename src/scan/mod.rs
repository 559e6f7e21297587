//! Evidence collection: turns provider responses into a `RepositoryRecord`.

pub mod build;
pub mod ci;
pub mod java;
pub mod pom;
pub mod readme;
pub mod tree;

use crate::error::EvidenceResult;
use crate::external::{BuildRunner, StyleChecker};
use crate::provider::retry::with_retries;
use crate::provider::{RepositoryProvider, TreeEntry};
use crate::types::config::CollectionSettings;
use crate::types::record::{CodeMetrics, Readme, RepositoryRecord, SourceFile};
use pom::SchemaValidator;
use tracing::{debug, info, warn};
use tree::TreeIndex;

const CONTRIBUTING_DIRS: [&str; 3] = ["", ".github", "docs"];

/// Handles to everything collection talks to, constructed once per run.
pub struct Collaborators<'a> {
    pub provider: &'a dyn RepositoryProvider,
    pub schema_validator: &'a dyn SchemaValidator,
    pub style_checker: Option<&'a dyn StyleChecker>,
    pub build_runner: Option<&'a dyn BuildRunner>,
    pub settings: CollectionSettings,
}

/// Per-repository collection state. Failed calls are retried, then recorded
/// as evidence gaps and treated as absent evidence.
pub struct Collector<'a> {
    pub address: &'a str,
    pub provider: &'a dyn RepositoryProvider,
    pub schema_validator: &'a dyn SchemaValidator,
    pub style_checker: Option<&'a dyn StyleChecker>,
    pub build_runner: Option<&'a dyn BuildRunner>,
    settings: CollectionSettings,
    gaps: Vec<String>,
}

impl<'a> Collector<'a> {
    pub fn new(address: &'a str, collaborators: &Collaborators<'a>) -> Self {
        Self {
            address,
            provider: collaborators.provider,
            schema_validator: collaborators.schema_validator,
            style_checker: collaborators.style_checker,
            build_runner: collaborators.build_runner,
            settings: collaborators.settings,
            gaps: Vec::new(),
        }
    }

    pub fn attempt<T, F>(&mut self, call: &str, operation: F) -> Option<T>
    where
        F: FnMut() -> EvidenceResult<T>,
    {
        match with_retries(&self.settings, call, operation) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(address = self.address, call, error = %err, "evidence unavailable");
                self.gaps.push(format!("{call}: {err}"));
                None
            }
        }
    }

    pub fn into_gaps(self) -> Vec<String> {
        self.gaps
    }
}

pub fn collect(address: &str, collaborators: &Collaborators<'_>) -> RepositoryRecord {
    info!(address, provider = collaborators.provider.name(), "collecting evidence");
    let provider = collaborators.provider;
    let mut collector = Collector::new(address, collaborators);
    let mut record = RepositoryRecord::empty(address);

    let entries = collector
        .attempt("list_tree", || provider.list_tree(address))
        .unwrap_or_default();
    let index = TreeIndex::new(entries);
    debug!(address, files = index.files().count(), "indexed tree");

    record.readme = collector
        .attempt("get_readme", || provider.get_readme(address))
        .flatten()
        .map(|decoded| {
            let raw = readme::strip_markdown(&decoded);
            Readme { decoded, raw }
        });
    record.licence_present = collector
        .attempt("get_licence", || provider.get_licence(address))
        .flatten()
        .is_some();
    record.contributing_present = contributing_present(&mut collector, &index);

    if let Some(located) = build::locate(&mut collector, &index) {
        record.uses_checkstyle = build::declares_tool(&located.text, "checkstyle");
        record.uses_spotbugs = build::declares_tool(&located.text, "spotbugs");
        record.build = Some(build::assess(&mut collector, located));
    }

    record.source_files = collect_sources(&mut collector, &index);

    record.ci_detected = ci::ci_config_present(&index)
        || collector
            .attempt("get_ci_indicators", || provider.get_ci_indicators(address))
            .map(|indicators| indicators.action_runs > 0)
            .unwrap_or(false);
    record.uses_github_features = ci::feature_files_present(&index)
        || collector
            .attempt("get_feature_usage", || provider.get_feature_usage(address))
            .map(|usage| usage.any())
            .unwrap_or(false);

    record.commit_count = collector
        .attempt("get_commit_count", || provider.get_commit_count(address))
        .unwrap_or(0);
    record.contributor_count = collector
        .attempt("get_contributor_count", || provider.get_contributor_count(address))
        .unwrap_or(0);
    record.branch_count = collector
        .attempt("get_branch_count", || provider.get_branch_count(address))
        .unwrap_or(0);

    record.evidence_gaps = collector.into_gaps();
    record
}

fn contributing_present(collector: &mut Collector<'_>, index: &TreeIndex) -> bool {
    if index.is_empty() {
        let provider = collector.provider;
        let address = collector.address;
        return collector
            .attempt("get_file CONTRIBUTING.md", || {
                provider.get_file(address, "CONTRIBUTING.md")
            })
            .flatten()
            .is_some();
    }
    CONTRIBUTING_DIRS.iter().any(|dir| {
        index.children(dir).iter().any(|entry| {
            entry.is_file() && entry.name().to_ascii_lowercase().starts_with("contributing")
        })
    })
}

fn collect_sources(collector: &mut Collector<'_>, index: &TreeIndex) -> Vec<SourceFile> {
    let mut sources = Vec::new();
    for entry in index.files() {
        let name = entry.name();
        if !java::is_java_file(name) || entry.size == 0 {
            continue;
        }
        let is_test = java::is_test_name(name);
        let metrics = if is_test {
            None
        } else {
            measure(collector, entry)
        };
        sources.push(SourceFile {
            name: name.to_string(),
            path: entry.path.clone(),
            is_test,
            metrics,
        });
    }
    sources
}

fn measure(collector: &mut Collector<'_>, entry: &TreeEntry) -> Option<CodeMetrics> {
    let provider = collector.provider;
    let address = collector.address;
    let content = collector
        .attempt(&format!("get_file {}", entry.path), || {
            provider.get_file(address, &entry.path)
        })
        .flatten()?;

    let style_error_count = match collector.style_checker {
        Some(checker) => collector
            .attempt(&format!("run_style_check {}", entry.path), || {
                checker.run_style_check(&content, entry.name())
            })
            .unwrap_or(0),
        None => 0,
    };

    Some(CodeMetrics {
        line_count: java::count_lines(&content),
        method_count: java::count_methods(&content),
        comment_count: java::count_comments(&content),
        style_error_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvidenceError;
    use crate::external::BuildOutcome;
    use crate::provider::fake::FakeProvider;
    use crate::types::record::BuildKind;
    use pom::StructuralValidator;
    use std::cell::Cell;

    const POM: &str = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <build><plugins><plugin><artifactId>maven-checkstyle-plugin</artifactId></plugin></plugins></build>
</project>"#;

    fn settings() -> CollectionSettings {
        CollectionSettings {
            max_retries: 1,
            base_delay_ms: 1,
            timeout_secs: 1,
        }
    }

    fn collaborators<'a>(provider: &'a FakeProvider, validator: &'a StructuralValidator) -> Collaborators<'a> {
        Collaborators {
            provider,
            schema_validator: validator,
            style_checker: None,
            build_runner: None,
            settings: settings(),
        }
    }

    struct CountingChecker;

    impl StyleChecker for CountingChecker {
        fn run_style_check(&self, source_text: &str, _identifier: &str) -> EvidenceResult<u32> {
            Ok(source_text.matches('\t').count() as u32)
        }
    }

    struct FailingGradle {
        runs: Cell<u32>,
    }

    impl BuildRunner for FailingGradle {
        fn run_build(&self, _kind: BuildKind, _text: &str, _project: &str) -> EvidenceResult<BuildOutcome> {
            self.runs.set(self.runs.get() + 1);
            Ok(BuildOutcome {
                success: false,
                stderr: "Plugin [id: 'nope'] was not found".to_string(),
            })
        }
    }

    #[test]
    fn collects_root_pom_and_sources() {
        let provider = FakeProvider {
            readme: Some("# Demo\n\nA project.".to_string()),
            licence: Some("MIT".to_string()),
            commits: 12,
            contributors: 2,
            branches: 1,
            ..FakeProvider::default()
        }
        .with_file("pom.xml", POM)
        .with_file("CONTRIBUTING.md", "Be nice.")
        .with_file("src/main/java/App.java", "class App {\n\tvoid run() {\n\t}\n}\n")
        .with_file("src/test/java/AppTest.java", "class AppTest {}\n")
        .with_file("src/main/java/Empty.java", "")
        .with_file(".travis.yml", "language: java");
        let validator = StructuralValidator;
        let checker = CountingChecker;
        let mut collaborators = collaborators(&provider, &validator);
        collaborators.style_checker = Some(&checker);

        let record = collect("owner/demo", &collaborators);

        let build = record.build.as_ref().expect("pom should be found");
        assert_eq!(build.kind, BuildKind::Maven);
        assert_eq!(build.path, "pom.xml");
        assert!(build.well_formed);
        assert!(record.uses_checkstyle);
        assert!(!record.uses_spotbugs);
        assert!(record.licence_present);
        assert!(record.contributing_present);
        assert!(record.ci_detected);
        assert_eq!(record.readme.as_ref().and_then(|r| r.raw.as_deref()), Some(" Demo\n\nA project."));

        assert_eq!(record.source_files.len(), 2);
        let app = record
            .non_test_files()
            .next()
            .expect("App.java should be a source file");
        let metrics = app.metrics.expect("App.java should be measured");
        assert_eq!(metrics.line_count, 4);
        assert_eq!(metrics.method_count, 1);
        assert_eq!(metrics.style_error_count, 2);
        assert_eq!(record.test_files().count(), 1);
        assert_eq!(record.commit_count, 12);
        assert!(record.evidence_gaps.is_empty());
    }

    #[test]
    fn nested_build_is_found_when_root_has_none() {
        let provider = FakeProvider {
            dirs: vec!["docs".to_string(), "app".to_string()],
            ..FakeProvider::default()
        }
        .with_file("app/build.gradle", "plugins { id 'java' }");
        let validator = StructuralValidator;
        let gradle = FailingGradle { runs: Cell::new(0) };
        let mut collaborators = collaborators(&provider, &validator);
        collaborators.build_runner = Some(&gradle);

        let record = collect("owner/nested", &collaborators);

        let build = record.build.as_ref().expect("nested gradle build should be found");
        assert_eq!(build.kind, BuildKind::GradleGroovy);
        assert_eq!(build.path, "app/build.gradle");
        assert!(!build.well_formed);
        assert!(build
            .failure_output
            .as_deref()
            .is_some_and(|stderr| stderr.contains("not found")));
        assert_eq!(gradle.runs.get(), 1);
    }

    #[test]
    fn root_gradle_wins_over_nested_pom() {
        let provider = FakeProvider::default()
            .with_file("build.gradle", "plugins { id 'java' }")
            .with_file("app/pom.xml", POM);
        let validator = StructuralValidator;

        let record = collect("owner/mixed", &collaborators(&provider, &validator));

        let build = record.build.as_ref().expect("root gradle build should be found");
        assert_eq!(build.kind, BuildKind::GradleGroovy);
        assert_eq!(build.path, "build.gradle");
    }

    #[test]
    fn root_pom_wins_over_root_kotlin_gradle() {
        let provider = FakeProvider::default()
            .with_file("build.gradle.kts", "plugins { java }")
            .with_file("pom.xml", POM);
        let validator = StructuralValidator;

        let record = collect("owner/both", &collaborators(&provider, &validator));

        let build = record.build.as_ref().expect("root pom should be found");
        assert_eq!(build.kind, BuildKind::Maven);
        assert_eq!(build.path, "pom.xml");
        assert!(build.well_formed);
    }

    #[test]
    fn failing_calls_become_evidence_gaps() {
        let provider = FakeProvider {
            fail_tree: true,
            fail_commits: true,
            contributors: 9,
            ..FakeProvider::default()
        };
        let validator = StructuralValidator;
        let record = collect("owner/flaky", &collaborators(&provider, &validator));

        assert_eq!(record.commit_count, 0);
        assert_eq!(record.contributor_count, 9);
        assert!(record.build.is_none());
        assert_eq!(record.evidence_gaps.len(), 2);
        assert!(record.evidence_gaps[0].starts_with("list_tree"));
        assert!(record.evidence_gaps[1].starts_with("get_commit_count"));
    }

    #[test]
    fn empty_repository_yields_empty_record() {
        let provider = FakeProvider::default();
        let validator = StructuralValidator;
        let record = collect("owner/empty", &collaborators(&provider, &validator));
        assert_eq!(record, RepositoryRecord::empty("owner/empty"));
    }

    #[test]
    fn retryable_errors_are_retried_once_per_setting() {
        let provider = FakeProvider {
            fail_commits: true,
            ..FakeProvider::default()
        };
        let validator = StructuralValidator;
        let collaborators = collaborators(&provider, &validator);
        let mut collector = Collector::new("owner/retry", &collaborators);
        let attempts = Cell::new(0);
        let result: Option<u64> = collector.attempt("get_commit_count", || {
            attempts.set(attempts.get() + 1);
            Err(EvidenceError::Status {
                code: 503,
                url: String::new(),
            })
        });
        assert!(result.is_none());
        assert_eq!(attempts.get(), 2);
        assert_eq!(collector.into_gaps().len(), 1);
    }
}
