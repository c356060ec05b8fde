use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One parsed access-log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub ip: String,
    /// Currently the same value as `ip`; logs carry no authenticated user
    pub user_id: String,
    pub timestamp: DateTime<FixedOffset>,
    pub method: String,
    /// Request target, truncated to [`super::MAX_TARGET_LEN`] characters
    pub request_uri: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_size: Option<u64>,
    pub user_agent: String,
    /// Response latency in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
}

impl LogEntry {
    /// Latency used for ranking; formats without a latency field rank as zero
    pub fn latency(&self) -> f64 {
        self.response_time.unwrap_or(0.0)
    }
}

/// Line grammar selected for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `<ip> - [<time>] "<request>" <status> <bytes> - "<user-agent>" - <latency>`
    #[default]
    Timed,
    /// nginx/Apache combined: `<ip> <ident> <user> [<time>] "<request>" <status> <bytes> "<referer>" "<user-agent>"`
    Combined,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Timed => "timed",
            LogFormat::Combined => "combined",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "timed" | "a" => Ok(LogFormat::Timed),
            "combined" | "b" => Ok(LogFormat::Combined),
            other => Err(crate::Error::UnknownFormat(other.to_string())),
        }
    }
}
