use crate::error::Result;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub generated_at: String,
    pub version: String,
    pub repositories: usize,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
}

impl RunManifest {
    /// Hash every file as it is on disk now; paths are stored relative to `root`.
    pub fn collect(root: &Path, repositories: usize, files: &[PathBuf]) -> Result<Self> {
        let mut entries = Vec::with_capacity(files.len());
        for path in files {
            let bytes = fs::read(path)?;
            entries.push(ManifestFile {
                path: path
                    .strip_prefix(root)
                    .unwrap_or(path.as_path())
                    .to_string_lossy()
                    .replace('\\', "/"),
                sha256: sha256_hex(&bytes),
            });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(Self {
            generated_at: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            repositories,
            files: entries,
        })
    }
}

pub fn write_manifest(root: &Path, manifest: &RunManifest) -> Result<PathBuf> {
    let out_path = root.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&out_path, json)?;
    Ok(out_path)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn manifest_hashes_files_relative_to_root() {
        let tmp = TempDir::new().expect("temp dir should create");
        let file = tmp.path().join("owner/repo/results.txt");
        fs::create_dir_all(file.parent().expect("file should have a parent"))
            .expect("dirs should create");
        fs::write(&file, "abc").expect("file should write");

        let manifest = RunManifest::collect(tmp.path(), 1, &[file]).expect("manifest should build");
        assert_eq!(manifest.files.len(), 1);
        assert_eq!(manifest.files[0].path, "owner/repo/results.txt");
        assert_eq!(
            manifest.files[0].sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(manifest.version, env!("CARGO_PKG_VERSION"));

        let written = write_manifest(tmp.path(), &manifest).expect("manifest should write");
        let raw = fs::read_to_string(written).expect("manifest should read");
        assert!(raw.contains("\"repositories\": 1"));
    }
}
