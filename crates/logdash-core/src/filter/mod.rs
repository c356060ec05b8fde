use crate::log::LogEntry;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of window bounds on the command line and in report labels
pub const WINDOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Inclusive time range an entry must fall into to be counted
///
/// Bounds are wall-clock times. An entry is compared using its own local
/// time (the offset written in the log line), so a window of
/// `2024-02-19 00:00:00` to `2024-02-19 01:00:00` selects the first hour of
/// the 19th as the server saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Build a window, rejecting one that ends before it starts
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> crate::Result<Self> {
        if end < start {
            return Err(crate::Error::InvalidWindow(format!(
                "end {} is before start {}",
                end.format(WINDOW_FORMAT),
                start.format(WINDOW_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds in `YYYY-MM-DD HH:MM:SS` form
    pub fn parse(start: &str, end: &str) -> crate::Result<Self> {
        let start = parse_bound("start", start)?;
        let end = parse_bound("end", end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Check whether an entry lies inside the window, both ends included
    pub fn accepts(&self, entry: &LogEntry) -> bool {
        let local = entry.timestamp.naive_local();
        local >= self.start && local <= self.end
    }

    /// Human-readable `start - end` label
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format(WINDOW_FORMAT),
            self.end.format(WINDOW_FORMAT)
        )
    }
}

fn parse_bound(name: &str, value: &str) -> crate::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), WINDOW_FORMAT).map_err(|e| {
        crate::Error::InvalidWindow(format!(
            "invalid {} '{}' (expected YYYY-MM-DD HH:MM:SS): {}",
            name, value, e
        ))
    })
}
