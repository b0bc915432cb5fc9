//! One-shot persistence of the aggregate report.

use crate::model::AggregateReport;
use std::path::Path;
use tracing::info;

/// Write the finalized report as pretty JSON. Called exactly once per run;
/// the tabular summary is derived from the same in-memory report, never
/// re-read from this file.
pub fn write_report(report: &AggregateReport, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_string_pretty(report)?)?;
    info!(path = %out.display(), "report written");
    Ok(())
}
