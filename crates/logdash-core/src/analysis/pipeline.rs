use super::{AggregationEngine, RankingReporter, Report, ScanStats};
use crate::config::AnalysisConfig;
use crate::filter::TimeWindow;
use crate::log::{LineError, LineParser, LogReader};
use crate::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// What happened to a single input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Accepted,
    OutsideWindow,
    Skipped(LineError),
}

/// One sequential pass: parse, filter by window, aggregate
///
/// Each analyzer owns a fresh set of aggregates. Callers that want to stop
/// early simply stop feeding lines and call [`LogAnalyzer::finish`].
pub struct LogAnalyzer {
    parser: LineParser,
    window: TimeWindow,
    engine: AggregationEngine,
    stats: ScanStats,
}

impl LogAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            parser: LineParser::new(config.format),
            window: config.window,
            engine: AggregationEngine::new(),
            stats: ScanStats::default(),
        }
    }

    pub fn ingest_line(&mut self, line: &str) -> LineOutcome {
        self.stats.lines_read += 1;

        let entry = match self.parser.parse(line) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!("Skipping line {}: {}", self.stats.lines_read, err);
                match err {
                    LineError::NoMatch(_) => self.stats.no_match += 1,
                    LineError::Timestamp(_) => self.stats.bad_timestamp += 1,
                    LineError::Numeric { .. } => self.stats.bad_number += 1,
                }
                return LineOutcome::Skipped(err);
            }
        };

        if !self.window.accepts(&entry) {
            self.stats.outside_window += 1;
            return LineOutcome::OutsideWindow;
        }

        self.engine.ingest(entry);
        self.stats.accepted += 1;
        LineOutcome::Accepted
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Rank the aggregates and hand back the finished report
    pub fn finish(self) -> Report {
        let aggregates = self.engine.finish();
        let report = RankingReporter::default().rank(&aggregates, &self.window, self.stats);

        tracing::info!(
            "Analysis complete: {} of {} lines accepted ({} outside window, {} skipped)",
            self.stats.accepted,
            self.stats.lines_read,
            self.stats.outside_window,
            self.stats.skipped()
        );

        report
    }
}

/// Analyze every line of `reader`; a read error aborts without a report
pub fn analyze_reader<R: BufRead>(reader: R, config: &AnalysisConfig) -> Result<Report> {
    tracing::debug!(
        "Analyzing {} log lines in window {}",
        config.format,
        config.window
    );

    let mut analyzer = LogAnalyzer::new(config);
    for line in LogReader::new(reader) {
        analyzer.ingest_line(&line?);
    }

    Ok(analyzer.finish())
}

/// Open and analyze an access log on disk
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<Report> {
    tracing::info!("Analyzing access log: {}", path.display());
    analyze_reader(BufReader::new(File::open(path)?), config)
}
