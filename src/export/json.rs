use crate::errors::AppResult;
use crate::export::{WeeklyReport, notify_export_success};
use crate::ui::messages::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// The whole report, weeks nested, pretty-printed.
pub(crate) fn export_json(report: &WeeklyReport, path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;

    notify_export_success("JSON", path);
    Ok(())
}
