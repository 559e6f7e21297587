use super::pom::MAVEN_POM_4_0_0;
use super::tree::TreeIndex;
use super::Collector;
use crate::types::record::{BuildDescriptor, BuildKind};
use tracing::{info, warn};

/// Case-insensitive mention of a plugin anywhere in the descriptor.
pub fn declares_tool(descriptor_text: &str, tool: &str) -> bool {
    descriptor_text
        .to_ascii_lowercase()
        .contains(&tool.to_ascii_lowercase())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedBuild {
    pub kind: BuildKind,
    pub path: String,
    pub text: String,
}

/// Root-level descriptors win over nested ones; within each pass the kinds
/// are tried in `BuildKind::SEARCH_ORDER`.
pub fn locate(collector: &mut Collector<'_>, index: &TreeIndex) -> Option<LocatedBuild> {
    let provider = collector.provider;
    let address = collector.address;

    for kind in BuildKind::SEARCH_ORDER {
        let name = kind.descriptor_name();
        if !index.is_empty() && !index.has_file(name) {
            continue;
        }
        let found = collector
            .attempt(&format!("get_file {name}"), || provider.get_file(address, name))
            .flatten();
        if let Some(text) = found {
            return Some(LocatedBuild {
                kind,
                path: name.to_string(),
                text,
            });
        }
    }

    for kind in BuildKind::SEARCH_ORDER {
        let Some(entry) = index.find_first_named(kind.descriptor_name()) else {
            continue;
        };
        let path = entry.path.clone();
        let found = collector
            .attempt(&format!("get_file {path}"), || provider.get_file(address, &path))
            .flatten();
        if let Some(text) = found {
            return Some(LocatedBuild { kind, path, text });
        }
    }
    None
}

pub fn assess(collector: &mut Collector<'_>, located: LocatedBuild) -> BuildDescriptor {
    let address = collector.address;
    let LocatedBuild { kind, path, text } = located;

    let (well_formed, failure_output) = match kind {
        BuildKind::Maven => {
            let valid = collector
                .schema_validator
                .validate_xml(&text, &MAVEN_POM_4_0_0);
            if !valid {
                warn!(address, path = %path, "maven descriptor failed schema validation");
            }
            (valid, None)
        }
        BuildKind::GradleGroovy | BuildKind::GradleKotlin => match collector.build_runner {
            Some(runner) => {
                match collector.attempt("run_build", || runner.run_build(kind, &text, address)) {
                    Some(outcome) if outcome.success => (true, None),
                    Some(outcome) => {
                        warn!(address, path = %path, "{kind} build failed");
                        (false, Some(outcome.stderr))
                    }
                    None => (false, None),
                }
            }
            None => {
                info!(address, "no build runner configured; {kind} descriptor left unverified");
                (false, None)
            }
        },
    };

    BuildDescriptor {
        kind,
        path,
        descriptor_text: text,
        well_formed,
        failure_output,
    }
}
