use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuildKind {
    Maven,
    GradleGroovy,
    GradleKotlin,
}

impl BuildKind {
    /// Search order; the first kind found wins.
    pub const SEARCH_ORDER: [BuildKind; 3] = [
        BuildKind::Maven,
        BuildKind::GradleGroovy,
        BuildKind::GradleKotlin,
    ];

    pub fn descriptor_name(self) -> &'static str {
        match self {
            Self::Maven => "pom.xml",
            Self::GradleGroovy => "build.gradle",
            Self::GradleKotlin => "build.gradle.kts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Maven => "Maven",
            Self::GradleGroovy => "Gradle - Groovy",
            Self::GradleKotlin => "Gradle - Kotlin",
        }
    }
}

impl fmt::Display for BuildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readme {
    pub decoded: String,
    /// Markdown-stripped text; `None` when it could not be produced.
    pub raw: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildDescriptor {
    pub kind: BuildKind,
    pub path: String,
    #[serde(skip)]
    pub descriptor_text: String,
    pub well_formed: bool,
    /// Build tool output kept when a Gradle build failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_output: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CodeMetrics {
    pub line_count: u32,
    pub method_count: u32,
    pub comment_count: u32,
    pub style_error_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFile {
    pub name: String,
    pub path: String,
    pub is_test: bool,
    /// Measured for non-test files whose content could be fetched.
    pub metrics: Option<CodeMetrics>,
}

/// Everything known about one repository, built once by the collection stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryRecord {
    pub address: String,
    pub readme: Option<Readme>,
    pub licence_present: bool,
    pub contributing_present: bool,
    pub build: Option<BuildDescriptor>,
    pub uses_checkstyle: bool,
    pub uses_spotbugs: bool,
    pub source_files: Vec<SourceFile>,
    pub ci_detected: bool,
    pub uses_github_features: bool,
    pub commit_count: u64,
    pub contributor_count: u64,
    pub branch_count: u64,
    /// Collaborator calls that failed and were treated as absent evidence.
    pub evidence_gaps: Vec<String>,
}

impl RepositoryRecord {
    /// A record with no evidence at all.
    pub fn empty(address: &str) -> Self {
        Self {
            address: address.to_string(),
            readme: None,
            licence_present: false,
            contributing_present: false,
            build: None,
            uses_checkstyle: false,
            uses_spotbugs: false,
            source_files: Vec::new(),
            ci_detected: false,
            uses_github_features: false,
            commit_count: 0,
            contributor_count: 0,
            branch_count: 0,
            evidence_gaps: Vec::new(),
        }
    }

    pub fn test_files(&self) -> impl Iterator<Item = &SourceFile> {
        self.source_files.iter().filter(|file| file.is_test)
    }

    pub fn non_test_files(&self) -> impl Iterator<Item = &SourceFile> {
        self.source_files.iter().filter(|file| !file.is_test)
    }
}
