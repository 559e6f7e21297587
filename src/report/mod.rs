pub mod csv;
pub mod json;
pub mod text;

use crate::error::GradeError;
use crate::types::config::WeightTable;
use crate::types::report::GradeReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// File name the rendered report is stored under.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Text => "results.txt",
            Self::Json => "results.json",
        }
    }
}

pub fn render(
    report: &GradeReport,
    table: &WeightTable,
    format: OutputFormat,
) -> Result<String, GradeError> {
    match format {
        OutputFormat::Text => Ok(text::to_text(report, table)),
        OutputFormat::Json => json::to_json(report, table).map_err(GradeError::Json),
    }
}
