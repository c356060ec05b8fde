use crate::log::{LineParser, LogFormat, LogReader};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Column names of the exported table
pub const CSV_HEADER: [&str; 8] = [
    "IP",
    "User",
    "Time",
    "Request",
    "Status",
    "BytesSent",
    "Referer",
    "UserAgent",
];

/// Counts from one conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub rows_written: u64,
    pub lines_rejected: u64,
}

/// Converts raw log lines into CSV rows, one per successfully parsed line
///
/// A line must parse exactly as it would for analysis, but no time window or
/// truncation is applied; fields are copied as they appear in the log.
pub struct CsvExporter {
    parser: LineParser,
}

impl CsvExporter {
    pub fn new(format: LogFormat) -> Self {
        Self {
            parser: LineParser::new(format),
        }
    }

    pub fn export<R: BufRead, W: Write>(&self, reader: R, writer: W) -> Result<ExportSummary> {
        let mut csv = csv::Writer::from_writer(writer);
        let mut summary = ExportSummary::default();

        csv.write_record(CSV_HEADER)?;

        for line in LogReader::new(reader) {
            let line = line?;
            let Some(fields) = self.parser.captures(&line) else {
                tracing::warn!("Failed to parse line: {}", line);
                summary.lines_rejected += 1;
                continue;
            };
            if let Err(err) = self.parser.convert(&fields) {
                tracing::warn!("Failed to parse line ({}): {}", err, line);
                summary.lines_rejected += 1;
                continue;
            }

            let request = fields.request_line();
            csv.write_record([
                fields.ip,
                fields.ip,
                fields.time,
                request.as_str(),
                fields.status,
                fields.bytes,
                fields.referer.unwrap_or("-"),
                fields.user_agent,
            ])?;
            summary.rows_written += 1;
        }

        csv.flush()?;
        Ok(summary)
    }

    /// Convert `input` into a CSV file at `output`, replacing it if present
    pub fn export_file(&self, input: &Path, output: &Path) -> Result<ExportSummary> {
        tracing::debug!(
            "Converting {} to CSV at {}",
            input.display(),
            output.display()
        );

        let reader = BufReader::new(File::open(input)?);
        let writer = File::create(output)?;
        let summary = self.export(reader, writer)?;

        tracing::info!(
            "Conversion completed. CSV file saved to: {} ({} rows, {} lines rejected)",
            output.display(),
            summary.rows_written,
            summary.lines_rejected
        );

        Ok(summary)
    }
}
