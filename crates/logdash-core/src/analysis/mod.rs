mod aggregate;
pub mod format;
mod pipeline;
mod ranking;

pub use aggregate::{AggregationEngine, Aggregates, TopLatency};
pub use pipeline::{LineOutcome, LogAnalyzer, analyze_file, analyze_reader};
pub use ranking::{RankingReporter, SUCCESS_STATUS};

use crate::log::LogEntry;
use serde::{Deserialize, Serialize};

/// Length of every ranked view and of the slowest-request list
pub const TOP_N: usize = 10;

/// Finished, read-only result of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub window: String,
    pub total_requests: u64,
    pub total_requests_formatted: String,
    pub requests_per_second: Vec<SecondBucket>,
    pub requests_per_minute: Vec<RankedCount<String>>,
    pub top_request_uris: Vec<RankedCount<String>>,
    pub top_user_agents: Vec<RankedCount<String>>,
    pub status_codes: Vec<RankedCount<u16>>,
    pub status_code_breakdown: Vec<StatusBreakdown>,
    pub slowest_requests: Vec<LogEntry>,
    pub scan: ScanStats,
}

impl Report {
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A key and how many accepted entries it was seen in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCount<K> {
    pub key: K,
    pub count: u64,
}

/// One of the busiest seconds, with its request targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondBucket {
    pub timestamp: String,
    pub count: u64,
    pub uris: Vec<RankedCount<String>>,
}

/// Request targets answered with one non-success status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub status: u16,
    pub total: u64,
    pub uris: Vec<RankedCount<String>>,
}

/// Line-level bookkeeping for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub lines_read: u64,
    pub accepted: u64,
    pub outside_window: u64,
    pub no_match: u64,
    pub bad_timestamp: u64,
    pub bad_number: u64,
}

impl ScanStats {
    pub fn skipped(&self) -> u64 {
        self.no_match + self.bad_timestamp + self.bad_number
    }
}
