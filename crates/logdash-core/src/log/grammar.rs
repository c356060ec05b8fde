use super::types::{LogEntry, LogFormat};
use chrono::DateTime;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use thiserror::Error;

/// chrono format of the bracketed timestamp, e.g. `19/Feb/2024:00:05:00 +0700`
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Longest request target kept on a [`LogEntry`], marker included
pub const MAX_TARGET_LEN: usize = 100;

const TRUNCATION_MARKER: &str = "...";

lazy_static! {
    static ref TIMED_PATTERN: Regex = Regex::new(
        r#"^(?P<ip>\S+) - \[(?P<time>[^\]]+)\] "(?P<method>\S+) (?P<target>\S+) (?P<protocol>\S+)" (?P<status>\S+) (?P<bytes>\S+) - "(?P<agent>[^"]+)" - (?P<latency>\S+)$"#
    )
    .unwrap();
    static ref COMBINED_PATTERN: Regex = Regex::new(
        r#"^(?P<ip>\S+) \S+ \S+ \[(?P<time>[^\]]+)\] "(?P<method>\S+) (?P<target>\S+) (?P<protocol>\S+)" (?P<status>\S+) (?P<bytes>\S+) "(?P<referer>[^"]*)" "(?P<agent>[^"]+)""#
    )
    .unwrap();
}

/// Why a line did not become a [`LogEntry`]. None of these fail a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("line does not match the {0} grammar")]
    NoMatch(LogFormat),

    #[error("unparsable timestamp '{0}'")]
    Timestamp(String),

    #[error("invalid {field} value '{value}'")]
    Numeric { field: &'static str, value: String },
}

/// Borrowed captures of one grammar-matching line, before any conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFields<'a> {
    pub ip: &'a str,
    pub time: &'a str,
    pub method: &'a str,
    pub target: &'a str,
    pub protocol: &'a str,
    pub status: &'a str,
    pub bytes: &'a str,
    pub referer: Option<&'a str>,
    pub user_agent: &'a str,
    pub latency: Option<&'a str>,
}

impl<'a> RawFields<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        let field = |name: &str| caps.name(name).map(|m| m.as_str());

        Some(Self {
            ip: field("ip")?,
            time: field("time")?,
            method: field("method")?,
            target: field("target")?,
            protocol: field("protocol")?,
            status: field("status")?,
            bytes: field("bytes")?,
            referer: field("referer"),
            user_agent: field("agent")?,
            latency: field("latency"),
        })
    }

    /// The request line as it appeared between the quotes
    pub fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.target, self.protocol)
    }
}

/// Matches raw lines against one fixed grammar
#[derive(Debug, Clone)]
pub struct LineParser {
    format: LogFormat,
}

impl LineParser {
    pub fn new(format: LogFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    fn pattern(&self) -> &'static Regex {
        match self.format {
            LogFormat::Timed => &TIMED_PATTERN,
            LogFormat::Combined => &COMBINED_PATTERN,
        }
    }

    /// Match a line without converting any field
    pub fn captures<'a>(&self, line: &'a str) -> Option<RawFields<'a>> {
        let caps = self.pattern().captures(line)?;
        RawFields::from_captures(&caps)
    }

    /// Parse a line into a typed entry
    ///
    /// Status and byte count must be plain digit runs; the latency falls back
    /// to `0.0` when it is not a number. The combined grammar carries neither
    /// a size nor a latency on the entry.
    pub fn parse(&self, line: &str) -> Result<LogEntry, LineError> {
        let fields = self.captures(line).ok_or(LineError::NoMatch(self.format))?;
        self.convert(&fields)
    }

    /// Convert already captured fields into a typed entry
    pub fn convert(&self, fields: &RawFields<'_>) -> Result<LogEntry, LineError> {
        let timestamp = DateTime::parse_from_str(fields.time, TIMESTAMP_FORMAT)
            .map_err(|_| LineError::Timestamp(fields.time.to_string()))?;

        let status = parse_digits(fields.status)
            .and_then(|code| u16::try_from(code).ok())
            .ok_or_else(|| LineError::Numeric {
                field: "status",
                value: fields.status.to_string(),
            })?;

        let response_size = match self.format {
            LogFormat::Timed => Some(parse_digits(fields.bytes).ok_or_else(|| {
                LineError::Numeric {
                    field: "bytes",
                    value: fields.bytes.to_string(),
                }
            })?),
            LogFormat::Combined => None,
        };

        Ok(LogEntry {
            ip: fields.ip.to_string(),
            user_id: fields.ip.to_string(),
            timestamp,
            method: fields.method.to_string(),
            request_uri: truncate_target(fields.target, MAX_TARGET_LEN),
            status,
            response_size,
            user_agent: fields.user_agent.to_string(),
            response_time: fields.latency.map(parse_latency),
        })
    }
}

/// Accumulate an unsigned decimal digit by digit; `None` on any non-digit or overflow
fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }

    s.chars().try_fold(0u64, |acc, c| {
        let digit = c.to_digit(10)?;
        acc.checked_mul(10)?.checked_add(u64::from(digit))
    })
}

fn parse_latency(s: &str) -> f64 {
    match s.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => {
            tracing::debug!("Unparsable latency '{}', counting as 0.0", s);
            0.0
        }
    }
}

/// Cut `s` to `max` characters, the last three replaced by `...`
pub fn truncate_target(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }

    let keep = max.saturating_sub(TRUNCATION_MARKER.len());
    let mut truncated: String = s.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
