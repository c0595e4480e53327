use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::csv::export_csv;
use crate::export::fs_utils::ensure_writable;
use crate::export::json::export_json;
use crate::export::model::WeeklyReport;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Write `report` to `file`. Returns false when there was nothing to
    /// export and no file was written.
    pub fn export(
        report: &WeeklyReport,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<bool> {
        let path = Path::new(file);

        if report.is_empty() {
            warning(format!("No records found for site '{}'.", report.site));
            return Ok(false);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(report, path)?,
            ExportFormat::Json => export_json(report, path)?,
        }
        tracing::debug!(format = format.as_str(), file, "report exported");

        Ok(true)
    }
}
