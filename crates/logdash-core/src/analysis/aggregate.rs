use crate::log::LogEntry;
use chrono::{NaiveDateTime, Timelike};
use std::collections::HashMap;

use super::TOP_N;

/// Every counter maintained over one ingestion pass
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    pub total: u64,
    pub per_second: HashMap<NaiveDateTime, u64>,
    pub per_minute: HashMap<NaiveDateTime, u64>,
    pub per_uri: HashMap<String, u64>,
    pub per_user_agent: HashMap<String, u64>,
    pub per_status: HashMap<u16, u64>,
    pub uris_per_second: HashMap<NaiveDateTime, HashMap<String, u64>>,
    pub uris_per_status: HashMap<u16, HashMap<String, u64>>,
    pub slowest: TopLatency,
}

/// Bounded list of the highest-latency entries seen so far, slowest first
#[derive(Debug, Clone)]
pub struct TopLatency {
    capacity: usize,
    entries: Vec<LogEntry>,
}

impl TopLatency {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    /// Keep `entry` if the list has room or it beats the current last place
    ///
    /// The sort is stable, so among equal latencies earlier entries stay ahead.
    pub fn offer(&mut self, entry: LogEntry) {
        let qualifies = self.entries.len() < self.capacity
            || self
                .entries
                .last()
                .is_some_and(|last| entry.latency() > last.latency());

        if !qualifies {
            return;
        }

        self.entries.push(entry);
        self.entries
            .sort_by(|a, b| b.latency().total_cmp(&a.latency()));
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TopLatency {
    fn default() -> Self {
        Self::new(TOP_N)
    }
}

/// Folds accepted entries into [`Aggregates`]
#[derive(Debug, Default)]
pub struct AggregationEngine {
    aggregates: Aggregates,
}

impl AggregationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one accepted entry in every structure
    pub fn ingest(&mut self, entry: LogEntry) {
        let agg = &mut self.aggregates;
        let second = truncate_to_second(entry.timestamp.naive_local());
        let minute = truncate_to_minute(second);

        agg.total += 1;
        *agg.per_second.entry(second).or_insert(0) += 1;
        *agg.per_minute.entry(minute).or_insert(0) += 1;
        *agg.per_uri.entry(entry.request_uri.clone()).or_insert(0) += 1;
        *agg.per_user_agent
            .entry(entry.user_agent.clone())
            .or_insert(0) += 1;
        *agg.per_status.entry(entry.status).or_insert(0) += 1;

        *agg.uris_per_second
            .entry(second)
            .or_default()
            .entry(entry.request_uri.clone())
            .or_insert(0) += 1;

        *agg.uris_per_status
            .entry(entry.status)
            .or_default()
            .entry(entry.request_uri.clone())
            .or_insert(0) += 1;

        agg.slowest.offer(entry);
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn finish(self) -> Aggregates {
        self.aggregates
    }
}

fn truncate_to_second(t: NaiveDateTime) -> NaiveDateTime {
    t.with_nanosecond(0).unwrap_or(t)
}

fn truncate_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0).unwrap_or(t)
}
