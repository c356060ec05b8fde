use logdash_core::AnalysisConfig;
use logdash_core::analysis::Report;
use logdash_core::log::LogFormat;
use std::path::PathBuf;

/// Helper to get path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn first_hour(format: LogFormat) -> AnalysisConfig {
    AnalysisConfig::from_bounds(format, "2024-02-19 00:00:00", "2024-02-19 01:00:00").unwrap()
}

/// Test that analyze_log reads an access log and returns ranked results
#[test]
fn test_analyze_log_returns_totals() {
    // Arrange
    let fixture = fixture_path("access_timed.log");

    // Act
    let result = logdash_cli::commands::analyze::analyze_log(&fixture, &first_hour(LogFormat::Timed));

    // Assert
    assert!(result.is_ok(), "Should successfully analyze access log");

    let report: Report = result.unwrap();
    assert_eq!(report.total_requests, 5);
    assert_eq!(report.scan.lines_read, 8);
    assert_eq!(report.scan.outside_window, 1);
    assert_eq!(report.scan.skipped(), 2);
}

/// Test that every ranked view is ordered by count with key tie-break
#[test]
fn test_analyze_log_rankings() {
    let report = logdash_cli::commands::analyze::analyze_log(
        &fixture_path("access_timed.log"),
        &first_hour(LogFormat::Timed),
    )
    .unwrap();

    assert_eq!(report.requests_per_second[0].timestamp, "2024-02-19 00:05:00");
    assert_eq!(report.requests_per_second[0].count, 2);
    assert_eq!(report.requests_per_second[0].uris[0].key, "/a");

    assert_eq!(report.requests_per_minute[0].key, "2024-02-19 00:05");
    assert_eq!(report.requests_per_minute[0].count, 3);

    assert_eq!(report.top_request_uris[0].key, "/a");
    assert_eq!(report.top_request_uris[0].count, 2);
    // Remaining targets tie at one request and sort by name
    let tied: Vec<&str> = report.top_request_uris[1..]
        .iter()
        .map(|r| r.key.as_str())
        .collect();
    assert_eq!(tied, vec!["/api/report", "/login", "/missing"]);

    assert_eq!(report.top_user_agents[0].key, "ua1");
    assert_eq!(report.top_user_agents[0].count, 3);

    assert_eq!(report.status_codes[0].key, 200);
    assert_eq!(report.status_codes[0].count, 2);
}

/// Test that the non-200 breakdown and slowest requests are populated
#[test]
fn test_analyze_log_failures_and_latency() {
    let report = logdash_cli::commands::analyze::analyze_log(
        &fixture_path("access_timed.log"),
        &first_hour(LogFormat::Timed),
    )
    .unwrap();

    let codes: Vec<u16> = report.status_code_breakdown.iter().map(|b| b.status).collect();
    assert_eq!(codes, vec![302, 404, 500]);

    assert_eq!(report.slowest_requests.len(), 5);
    assert_eq!(report.slowest_requests[0].request_uri, "/api/report");
    assert_eq!(report.slowest_requests[0].response_time, Some(2.5));
    assert_eq!(report.slowest_requests[4].request_uri, "/missing");
}

/// Test the combined grammar against its own fixture
#[test]
fn test_analyze_combined_log() {
    let config = AnalysisConfig::from_bounds(
        LogFormat::Combined,
        "2024-02-19 10:00:00",
        "2024-02-19 11:00:00",
    )
    .unwrap();

    let report =
        logdash_cli::commands::analyze::analyze_log(&fixture_path("access_combined.log"), &config)
            .unwrap();

    assert_eq!(report.total_requests, 3);
    assert_eq!(report.top_user_agents[0].key, "Mozilla/5.0 (X11; Linux x86_64)");
    assert_eq!(report.top_user_agents[0].count, 2);
    assert_eq!(report.slowest_requests.len(), 3);
    assert!(report.slowest_requests.iter().all(|e| e.response_time.is_none()));
}

/// Test that the wrong grammar skips every line without failing
#[test]
fn test_analyze_with_wrong_grammar() {
    let report = logdash_cli::commands::analyze::analyze_log(
        &fixture_path("access_combined.log"),
        &first_hour(LogFormat::Timed),
    )
    .unwrap();

    assert_eq!(report.total_requests, 0);
    assert_eq!(report.scan.no_match, 3);
}

/// Test that a missing input file is reported as an error
#[test]
fn test_analyze_missing_file() {
    let result = logdash_cli::commands::analyze::analyze_log(
        &fixture_path("does-not-exist.log"),
        &first_hour(LogFormat::Timed),
    );
    assert!(result.is_err());
}
