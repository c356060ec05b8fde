use super::format::{THOUSANDS_SEPARATOR, group_thousands};
use super::{Aggregates, RankedCount, Report, ScanStats, SecondBucket, StatusBreakdown, TOP_N};
use crate::filter::TimeWindow;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::hash::Hash;

/// Status left out of the per-status request breakdown
pub const SUCCESS_STATUS: u16 = 200;

const SECOND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Turns finished aggregates into ordered, bounded views
///
/// Every view is sorted by count descending; equal counts are ordered by key
/// ascending (chronological for time buckets, numeric for status codes).
pub struct RankingReporter {
    limit: usize,
}

impl RankingReporter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.min(TOP_N),
        }
    }

    /// Build the report for one run; `scan` is carried through unchanged
    pub fn rank(&self, aggregates: &Aggregates, window: &TimeWindow, scan: ScanStats) -> Report {
        tracing::debug!("Ranking {} accepted entries", aggregates.total);

        let requests_per_second = rank_counts(&aggregates.per_second, self.limit)
            .into_iter()
            .map(|ranked| SecondBucket {
                timestamp: ranked.key.format(SECOND_FORMAT).to_string(),
                count: ranked.count,
                uris: aggregates
                    .uris_per_second
                    .get(&ranked.key)
                    .map(|uris| rank_counts(uris, usize::MAX))
                    .unwrap_or_default(),
            })
            .collect();

        Report {
            window: window.label(),
            total_requests: aggregates.total,
            total_requests_formatted: group_thousands(aggregates.total, THOUSANDS_SEPARATOR),
            requests_per_second,
            requests_per_minute: format_times(
                rank_counts(&aggregates.per_minute, self.limit),
                MINUTE_FORMAT,
            ),
            top_request_uris: rank_counts(&aggregates.per_uri, self.limit),
            top_user_agents: rank_counts(&aggregates.per_user_agent, self.limit),
            status_codes: rank_counts(&aggregates.per_status, self.limit),
            status_code_breakdown: status_breakdown(&aggregates.uris_per_status),
            slowest_requests: aggregates.slowest.entries().to_vec(),
            scan,
        }
    }
}

impl Default for RankingReporter {
    fn default() -> Self {
        Self::new(TOP_N)
    }
}

/// Sort a count map by count descending then key ascending, keeping `limit` rows
fn rank_counts<K>(counts: &HashMap<K, u64>, limit: usize) -> Vec<RankedCount<K>>
where
    K: Clone + Ord + Hash,
{
    let mut ranked: Vec<RankedCount<K>> = counts
        .iter()
        .map(|(key, &count)| RankedCount {
            key: key.clone(),
            count,
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    ranked.truncate(limit);
    ranked
}

fn format_times(ranked: Vec<RankedCount<NaiveDateTime>>, fmt: &str) -> Vec<RankedCount<String>> {
    ranked
        .into_iter()
        .map(|r| RankedCount {
            key: r.key.format(fmt).to_string(),
            count: r.count,
        })
        .collect()
}

fn status_breakdown(uris_per_status: &HashMap<u16, HashMap<String, u64>>) -> Vec<StatusBreakdown> {
    let mut breakdown: Vec<StatusBreakdown> = uris_per_status
        .iter()
        .filter(|(status, _)| **status != SUCCESS_STATUS)
        .map(|(&status, uris)| StatusBreakdown {
            status,
            total: uris.values().sum(),
            uris: rank_counts(uris, usize::MAX),
        })
        .collect();

    breakdown.sort_by_key(|b| b.status);
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AggregationEngine;
    use crate::log::{LineParser, LogFormat};

    fn window() -> TimeWindow {
        TimeWindow::parse("2024-02-19 00:00:00", "2024-02-19 23:59:59").unwrap()
    }

    fn ingest(engine: &mut AggregationEngine, time: &str, uri: &str, status: u16, agent: &str) {
        let line = format!(
            r#"10.0.0.1 - [19/Feb/2024:{} +0700] "GET {} HTTP/1.1" {} 512 - "{}" - 0.100"#,
            time, uri, status, agent
        );
        engine.ingest(LineParser::new(LogFormat::Timed).parse(&line).unwrap());
    }

    #[test]
    fn test_rank_counts_tie_break_by_key() {
        let counts: HashMap<String, u64> = [("/c", 2), ("/a", 2), ("/b", 5), ("/d", 1)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let ranked = rank_counts(&counts, 3);
        let keys: Vec<&str> = ranked.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn test_views_are_bounded_and_sorted() {
        let mut engine = AggregationEngine::new();
        for i in 0..15 {
            for _ in 0..=i {
                ingest(&mut engine, &format!("00:{:02}:00", i), &format!("/p{}", i), 200, "ua");
            }
        }

        let report =
            RankingReporter::default().rank(engine.aggregates(), &window(), ScanStats::default());

        assert_eq!(report.total_requests, 120);
        assert_eq!(report.total_requests_formatted, "120");
        assert_eq!(report.top_request_uris.len(), 10);
        assert_eq!(report.top_request_uris[0].key, "/p14");
        assert_eq!(report.top_request_uris[0].count, 15);
        assert_eq!(report.requests_per_second.len(), 10);
        assert_eq!(report.requests_per_second[0].timestamp, "2024-02-19 00:14:00");
        assert_eq!(report.requests_per_minute.len(), 10);
        assert_eq!(report.requests_per_minute[0].key, "2024-02-19 00:14");
        assert_eq!(report.top_user_agents.len(), 1);

        for view in [&report.top_request_uris, &report.requests_per_minute] {
            assert!(view.windows(2).all(|w| w[0].count >= w[1].count));
        }
    }

    #[test]
    fn test_second_bucket_carries_uri_breakdown() {
        let mut engine = AggregationEngine::new();
        ingest(&mut engine, "00:05:00", "/a", 200, "ua");
        ingest(&mut engine, "00:05:00", "/b", 200, "ua");
        ingest(&mut engine, "00:05:00", "/b", 200, "ua");
        ingest(&mut engine, "00:06:00", "/a", 200, "ua");

        let report =
            RankingReporter::default().rank(engine.aggregates(), &window(), ScanStats::default());
        let busiest = &report.requests_per_second[0];

        assert_eq!(busiest.timestamp, "2024-02-19 00:05:00");
        assert_eq!(busiest.count, 3);
        assert_eq!(
            busiest.uris,
            vec![
                RankedCount { key: "/b".to_string(), count: 2 },
                RankedCount { key: "/a".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_status_breakdown_excludes_success() {
        let mut engine = AggregationEngine::new();
        ingest(&mut engine, "00:05:00", "/ok", 200, "ua");
        ingest(&mut engine, "00:05:01", "/missing", 404, "ua");
        ingest(&mut engine, "00:05:02", "/missing", 404, "ua");
        ingest(&mut engine, "00:05:03", "/boom", 500, "ua");
        ingest(&mut engine, "00:05:04", "/moved", 301, "ua");

        let report =
            RankingReporter::default().rank(engine.aggregates(), &window(), ScanStats::default());

        let codes: Vec<u16> = report.status_code_breakdown.iter().map(|b| b.status).collect();
        assert_eq!(codes, vec![301, 404, 500]);
        assert_eq!(report.status_code_breakdown[1].total, 2);

        assert_eq!(report.status_codes[0].key, 404);
        assert_eq!(report.status_codes[0].count, 2);
        // 200, 301 and 500 tie at one request each
        let tied: Vec<u16> = report.status_codes[1..].iter().map(|r| r.key).collect();
        assert_eq!(tied, vec![200, 301, 500]);
    }

    #[test]
    fn test_scan_stats_are_carried_into_report() {
        let mut engine = AggregationEngine::new();
        ingest(&mut engine, "00:05:00", "/a", 200, "ua");
        let scan = ScanStats {
            lines_read: 4,
            accepted: 1,
            outside_window: 1,
            no_match: 2,
            ..ScanStats::default()
        };

        let report = RankingReporter::default().rank(engine.aggregates(), &window(), scan);

        assert_eq!(report.total_requests, 1);
        assert_eq!(report.scan, scan);
        assert_eq!(report.scan.skipped(), 2);
    }

    #[test]
    fn test_empty_aggregates() {
        let engine = AggregationEngine::new();
        let report =
            RankingReporter::default().rank(engine.aggregates(), &window(), ScanStats::default());

        assert_eq!(report.total_requests, 0);
        assert_eq!(report.total_requests_formatted, "0");
        assert!(report.requests_per_second.is_empty());
        assert!(report.status_code_breakdown.is_empty());
        assert!(report.slowest_requests.is_empty());
    }
}
