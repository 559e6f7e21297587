use super::manifest::MANIFEST_FILE;
use super::writer::CSV_FILE;
use crate::error::{GradeError, Result};
use std::fs;
use std::path::{Component, Path};

/// Read a repository list: one `owner/name` per line, `#` comments and blank lines skipped.
pub fn read_addresses(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(GradeError::PathNotFound(path.display().to_string()));
    }
    let raw = fs::read_to_string(path)?;
    parse_addresses(&raw)
}

pub fn parse_addresses(raw: &str) -> Result<Vec<String>> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            validate_address(line)?;
            Ok(line.trim_end_matches('/').to_string())
        })
        .collect()
}

/// Addresses double as result directory names: exactly `owner/name`, plain
/// segments only, never shadowing a top-level results file.
pub fn validate_address(address: &str) -> Result<()> {
    let parsed = Path::new(address);
    if parsed.is_absolute() {
        return Err(GradeError::InvalidAddress(format!(
            "absolute path rejected: {address}"
        )));
    }
    if !parsed
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(GradeError::InvalidAddress(format!(
            "path traversal rejected: {address}"
        )));
    }
    let segments = parsed.components().count();
    if segments != 2 {
        return Err(GradeError::InvalidAddress(format!(
            "expected owner/name, found {segments} segment(s): {address}"
        )));
    }
    if parsed.starts_with(CSV_FILE) || parsed.starts_with(MANIFEST_FILE) {
        return Err(GradeError::InvalidAddress(format!(
            "address collides with a results file: {address}"
        )));
    }
    Ok(())
}
