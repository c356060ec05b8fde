use crate::OutputFormat;
use anyhow::Result;
use logdash_core::AnalysisConfig;
use logdash_core::analysis::{RankedCount, Report, analyze_file};
use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

/// Analyze an access log and return the ranked report
pub fn analyze_log(file: &Path, config: &AnalysisConfig) -> Result<Report> {
    tracing::debug!("Reading access log: {}", file.display());
    Ok(analyze_file(file, config)?)
}

pub fn execute(file: &Path, config: &AnalysisConfig, format: OutputFormat) -> Result<()> {
    tracing::info!("Analyzing access log: {}", file.display());

    let report = analyze_log(file, config)?;

    tracing::debug!("Printing report as {}", format.as_str());
    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report)?,
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

fn output_pretty(report: &Report) {
    use console::style;

    println!("\n{}", style("Access Log Analysis Report").bold().cyan());
    println!("{}", style("==========================").cyan());

    println!("\n{}", style("Summary:").bold());
    println!("  Date Range:        {}", report.window);
    println!("  Total Requests:    {}", report.total_requests_formatted);
    println!("  Lines Read:        {}", report.scan.lines_read);
    println!("  Outside Window:    {}", report.scan.outside_window);
    println!("  Skipped Lines:     {}", report.scan.skipped());

    if !report.requests_per_second.is_empty() {
        println!("\n{}", style("Busiest Seconds:").bold());
        for (i, bucket) in report.requests_per_second.iter().enumerate() {
            println!("  {}. {} - {} requests", i + 1, bucket.timestamp, bucket.count);
            for uri in &bucket.uris {
                println!("       {} x {}", uri.count, uri.key);
            }
        }
    }

    print_ranked("Busiest Minutes:", &report.requests_per_minute);
    print_ranked("Top Request URIs:", &report.top_request_uris);
    print_ranked("Top User Agents:", &report.top_user_agents);
    print_ranked("Status Codes:", &report.status_codes);

    if !report.status_code_breakdown.is_empty() {
        println!("\n{}", style("Non-200 Responses:").bold());
        for breakdown in &report.status_code_breakdown {
            println!(
                "  {} - {} requests",
                style(breakdown.status).yellow(),
                breakdown.total
            );
            for uri in &breakdown.uris {
                println!("       {} x {}", uri.count, uri.key);
            }
        }
    }

    if !report.slowest_requests.is_empty() {
        println!("\n{}", style("Slowest Requests:").bold());
        for (i, entry) in report.slowest_requests.iter().enumerate() {
            println!(
                "  {}. [{:.3} s] {} {} {} - {}",
                i + 1,
                entry.latency(),
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.method,
                entry.status,
                entry.request_uri
            );
        }
    }

    println!();
}

fn print_ranked<K: Display>(title: &str, rows: &[RankedCount<K>]) {
    if rows.is_empty() {
        return;
    }

    println!("\n{}", console::style(title).bold());
    for (i, row) in rows.iter().enumerate() {
        println!("  {}. {} - {}", i + 1, row.key, row.count);
    }
}

fn output_json(report: &Report) -> Result<()> {
    println!("{}", report.to_json_pretty()?);
    Ok(())
}

fn output_table(report: &Report) -> Result<()> {
    let mut out = csv::Writer::from_writer(io::stdout());
    write_table(report, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Flatten the ranked views into `section,key,count` rows
pub fn write_table<W: Write>(report: &Report, out: &mut csv::Writer<W>) -> Result<()> {
    out.write_record(["section", "key", "count"])?;
    out.write_record(["total", "requests", report.total_requests.to_string().as_str()])?;

    for bucket in &report.requests_per_second {
        out.write_record([
            "second",
            bucket.timestamp.as_str(),
            bucket.count.to_string().as_str(),
        ])?;
    }
    table_rows(out, "minute", &report.requests_per_minute)?;
    table_rows(out, "uri", &report.top_request_uris)?;
    table_rows(out, "user_agent", &report.top_user_agents)?;
    table_rows(out, "status", &report.status_codes)?;

    Ok(())
}

fn table_rows<W: Write, K: Display>(
    out: &mut csv::Writer<W>,
    section: &str,
    rows: &[RankedCount<K>],
) -> Result<()> {
    for row in rows {
        out.write_record([
            section,
            row.key.to_string().as_str(),
            row.count.to_string().as_str(),
        ])?;
    }
    Ok(())
}
