use super::addresses::validate_address;
use super::manifest::{write_manifest, RunManifest};
use crate::error::Result;
use crate::report::{csv, render, OutputFormat};
use crate::types::config::WeightTable;
use crate::types::report::GradeReport;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CSV_FILE: &str = "result.csv";
pub const BUILD_FAILURE_FILE: &str = "gradle_build_failure_info.txt";
const KEEP_FILE: &str = ".gitkeep";

/// Owns the results directory for one batch run.
#[derive(Debug)]
pub struct ResultsWriter {
    root: PathBuf,
    format: OutputFormat,
    written: Vec<PathBuf>,
    repositories: usize,
}

impl ResultsWriter {
    /// Prepare `root` and start a fresh CSV with its header line.
    pub fn create(root: &Path, format: OutputFormat, clean: bool) -> Result<Self> {
        fs::create_dir_all(root)?;
        if clean {
            clean_results(root)?;
        }

        let csv_path = root.join(CSV_FILE);
        fs::write(&csv_path, csv::header_line())?;
        debug!(path = %csv_path.display(), "started results sheet");

        Ok(Self {
            root: root.to_path_buf(),
            format,
            written: vec![csv_path],
            repositories: 0,
        })
    }

    /// Write the per-repository report and append its CSV row.
    pub fn write_report(&mut self, report: &GradeReport, table: &WeightTable) -> Result<PathBuf> {
        validate_address(&report.address)?;
        let dir = self.root.join(&report.address);
        fs::create_dir_all(&dir)?;

        let report_path = dir.join(self.format.file_name());
        fs::write(&report_path, render(report, table, self.format)?)?;
        self.remember(report_path.clone());

        if let Some(stderr) = &report.build_failure_output {
            let failure_path = dir.join(BUILD_FAILURE_FILE);
            fs::write(
                &failure_path,
                format!("{}\n[WARNING] Build failed:\n{stderr}\n", report.address),
            )?;
            self.remember(failure_path);
        }

        let mut sheet = OpenOptions::new()
            .append(true)
            .open(self.root.join(CSV_FILE))?;
        sheet.write_all(csv::to_csv_row(report).as_bytes())?;

        self.repositories += 1;
        debug!(address = %report.address, path = %report_path.display(), "wrote report");
        Ok(report_path)
    }

    /// Write the run manifest covering every file this writer produced.
    pub fn finish(self) -> Result<PathBuf> {
        let manifest = RunManifest::collect(&self.root, self.repositories, &self.written)?;
        let path = write_manifest(&self.root, &manifest)?;
        info!(
            repositories = self.repositories,
            path = %path.display(),
            "results written"
        );
        Ok(path)
    }

    fn remember(&mut self, path: PathBuf) {
        if !self.written.contains(&path) {
            self.written.push(path);
        }
    }
}

/// Remove previous results, keeping any `.gitkeep` at the top level.
pub fn clean_results(root: &Path) -> Result<()> {
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_name() == KEEP_FILE {
            continue;
        }
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    info!(path = %root.display(), "cleaned previous results");
    Ok(())
}
