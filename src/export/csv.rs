use crate::errors::AppResult;
use crate::export::{WeeklyReport, notify_export_success};
use crate::ui::messages::info;
use std::path::Path;

/// One row per daily record, header included via serde.
pub(crate) fn export_csv(report: &WeeklyReport, path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)?;
    for row in report.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
