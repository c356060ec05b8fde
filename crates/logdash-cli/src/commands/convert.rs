use anyhow::Result;
use logdash_core::export::{CsvExporter, ExportSummary};
use logdash_core::log::LogFormat;
use std::path::Path;

/// Default output file of the `csv` command
pub const DEFAULT_CSV_OUTPUT: &str = "nginx_access.csv";

pub fn execute(file: &Path, output: &Path, format: LogFormat) -> Result<ExportSummary> {
    tracing::info!("Converting {} log to CSV: {}", format, file.display());

    let summary = CsvExporter::new(format).export_file(file, output)?;

    println!(
        "✓ Wrote {} rows to {} ({} lines could not be parsed)",
        summary.rows_written,
        output.display(),
        summary.lines_rejected
    );

    Ok(summary)
}
