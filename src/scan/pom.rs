//! Structural validation of Maven project descriptors.
//!
//! The check covers what makes a POM unusable to Maven at the document
//! level: well-formed XML, a single `project` root in the POM namespace, and
//! only known top-level sections, each at most once.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashSet;

/// Shape a document root must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlSchema {
    pub root: &'static str,
    pub namespace: Option<&'static str>,
    /// Allowed direct children of the root, each at most once.
    pub children: &'static [&'static str],
}

pub const MAVEN_POM_4_0_0: XmlSchema = XmlSchema {
    root: "project",
    namespace: Some("http://maven.apache.org/POM/4.0.0"),
    children: &[
        "modelVersion",
        "parent",
        "groupId",
        "artifactId",
        "version",
        "packaging",
        "name",
        "description",
        "url",
        "inceptionYear",
        "organization",
        "licenses",
        "developers",
        "contributors",
        "mailingLists",
        "prerequisites",
        "modules",
        "scm",
        "issueManagement",
        "ciManagement",
        "distributionManagement",
        "properties",
        "dependencyManagement",
        "dependencies",
        "repositories",
        "pluginRepositories",
        "build",
        "reports",
        "reporting",
        "profiles",
    ],
};

pub trait SchemaValidator {
    /// `false` for anything malformed or off-schema; never an error.
    fn validate_xml(&self, text: &str, schema: &XmlSchema) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl SchemaValidator for StructuralValidator {
    fn validate_xml(&self, text: &str, schema: &XmlSchema) -> bool {
        validate(text, schema).is_ok()
    }
}

fn validate(text: &str, schema: &XmlSchema) -> Result<(), String> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut seen_root = false;
    let mut sections = HashSet::new();

    loop {
        match reader.read_event().map_err(|err| err.to_string())? {
            Event::Start(ref start) => {
                check_element(start, depth, &mut seen_root, &mut sections, schema)?;
                depth += 1;
            }
            Event::Empty(ref start) => {
                check_element(start, depth, &mut seen_root, &mut sections, schema)?;
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced end tag".to_string())?;
            }
            Event::Text(ref text) if depth <= 1 && !text.iter().all(u8::is_ascii_whitespace) => {
                return Err("character data outside a section".to_string());
            }
            Event::CData(_) if depth <= 1 => {
                return Err("character data outside a section".to_string());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err("document ended inside an element".to_string());
    }
    if !seen_root {
        return Err("no root element".to_string());
    }
    Ok(())
}

fn check_element(
    start: &BytesStart<'_>,
    depth: usize,
    seen_root: &mut bool,
    sections: &mut HashSet<String>,
    schema: &XmlSchema,
) -> Result<(), String> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    match depth {
        0 => {
            if *seen_root {
                return Err("more than one root element".to_string());
            }
            *seen_root = true;
            if name != schema.root {
                return Err(format!("root element is {name}, expected {}", schema.root));
            }
            if let Some(expected) = schema.namespace {
                let declared = namespace_of(start)?;
                if declared.as_deref() != Some(expected) {
                    return Err(format!("root namespace is not {expected}"));
                }
            }
            Ok(())
        }
        1 => {
            if !schema.children.contains(&name.as_str()) {
                return Err(format!("unexpected section {name}"));
            }
            if !sections.insert(name.clone()) {
                return Err(format!("duplicate section {name}"));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn namespace_of(start: &BytesStart<'_>) -> Result<Option<String>, String> {
    let prefix = start
        .name()
        .prefix()
        .map(|prefix| String::from_utf8_lossy(prefix.as_ref()).into_owned());
    let wanted = match &prefix {
        Some(prefix) => format!("xmlns:{prefix}"),
        None => "xmlns".to_string(),
    };
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| err.to_string())?;
        if attribute.key.as_ref() == wanted.as_bytes() {
            return Ok(Some(String::from_utf8_lossy(&attribute.value).into_owned()));
        }
    }
    Ok(None)
}
