use crate::error::{GradeError, Result};
use crate::types::config::GraderConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "repograde.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/repograde/config.toml";

/// Global, then working-directory, then explicit config; later layers win.
/// Every layer is optional except an explicitly requested file.
pub fn load_config(cwd: &Path, explicit: Option<&Path>) -> Result<GraderConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(cwd, explicit, global.as_deref())
}

pub(crate) fn load_config_with_global(
    cwd: &Path,
    explicit: Option<&Path>,
    global_path: Option<&Path>,
) -> Result<GraderConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(GradeError::ConfigNotFound(path.display().to_string()));
        }
    }

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &cwd.join(DEFAULT_CONFIG_FILE))?;
    if let Some(path) = explicit {
        merge_file_if_exists(&mut merged, path)?;
    }

    merged
        .try_into()
        .map_err(|e: toml::de::Error| GradeError::ConfigParse(e.to_string()))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| GradeError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_files_resolve_to_defaults() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with_global(dir.path(), None, None).expect("load should not fail");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.top_mark(), 10.0);
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = TempDir::new().expect("temp dir should be created");
        let err = load_config_with_global(dir.path(), Some(&dir.path().join("nope.toml")), None)
            .expect_err("missing explicit config should fail");
        assert!(err.is_config());
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn layers_merge_in_order() {
        let cwd = TempDir::new().expect("cwd temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");
        let explicit_path = cwd.path().join("ci.toml");

        fs::write(
            &global_path,
            r#"
[grading]
top_mark = 20.0

[requirements]
min_commits = 10
min_contributors = 2
"#,
        )
        .expect("global config should write");
        fs::write(
            cwd.path().join(DEFAULT_CONFIG_FILE),
            r#"
[requirements]
min_commits = 30

[collection]
max_retries = 0
"#,
        )
        .expect("local config should write");
        fs::write(
            &explicit_path,
            r#"
[grading]
top_mark = 100.0
"#,
        )
        .expect("explicit config should write");

        let cfg = load_config_with_global(cwd.path(), Some(&explicit_path), Some(&global_path))
            .expect("load should succeed");

        assert_eq!(cfg.top_mark(), 100.0);
        assert_eq!(cfg.requirements().min_commits, 30);
        assert_eq!(cfg.requirements().min_contributors, 2);
        assert_eq!(cfg.collection().max_retries, 0);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let cwd = TempDir::new().expect("temp dir should be created");
        fs::write(cwd.path().join(DEFAULT_CONFIG_FILE), "[weights\nreadme = ")
            .expect("broken config should write");
        let err = load_config_with_global(cwd.path(), None, None).expect_err("parse should fail");
        assert!(err.is_config());
    }
}
