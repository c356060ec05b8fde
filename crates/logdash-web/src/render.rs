use logdash_core::analysis::{RankedCount, Report};
use maud::{DOCTYPE, Markup, html};
use std::fmt::Display;

const TAILWIND_CSS: &str = "https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css";
const CELL: &str = "border border-blue-500 px-4 py-2";

/// Render a report as a standalone HTML dashboard
pub fn render_dashboard(report: &Report) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Access Log Analysis Dashboard" }
                link href=(TAILWIND_CSS) rel="stylesheet";
            }
            body class="bg-gray-100" {
                div class="container mx-auto p-4" {
                    h1 class="text-3xl font-bold text-blue-700 mt-8 mb-4" { "Log Analysis Dashboard" }
                    h2 class="text-2xl font-bold text-blue-700 mb-4" { "Date Range: " (report.window) }
                    p class="mb-4 font-bold" { "Total Requests: " (report.total_requests_formatted) }

                    (section_title(&format!("Top 10 Requests Per Second for {}", report.window)))
                    table class="border border-collapse border-blue-500 w-full" {
                        (header_row(&["Timestamp", "Request", "RequestURIs (Grouped)"]))
                        @for bucket in &report.requests_per_second {
                            tr {
                                td class=(CELL) { (bucket.timestamp) }
                                td class=(CELL) { (bucket.count) }
                                td class=(CELL) { (nested_uri_table(&bucket.uris)) }
                            }
                        }
                    }

                    (section_title("Top 10 RequestURIs"))
                    (count_table("RequestURI", &report.top_request_uris))

                    (section_title("Top 10 Requests Per Minute"))
                    (count_table("Minute", &report.requests_per_minute))

                    (section_title("Top 10 User Agents"))
                    (count_table("User Agent", &report.top_user_agents))

                    (section_title("HTTP Status Codes"))
                    (count_table("Status Code", &report.status_codes))

                    (section_title("RequestURIs by Non-200 Status Code"))
                    table class="border border-collapse border-blue-500 w-full" {
                        (header_row(&["Status Code", "Requests", "RequestURIs"]))
                        @for breakdown in &report.status_code_breakdown {
                            tr {
                                td class=(CELL) { (breakdown.status) }
                                td class=(CELL) { (breakdown.total) }
                                td class=(CELL) { (nested_uri_table(&breakdown.uris)) }
                            }
                        }
                    }

                    (section_title("Top 10 Response Times"))
                    table class="border border-collapse border-blue-500 w-full" {
                        (header_row(&[
                            "Timestamp",
                            "IP",
                            "RequestURI",
                            "Status",
                            "Response Size",
                            "User Agent",
                            "Response Time (s)",
                        ]))
                        @for entry in &report.slowest_requests {
                            tr {
                                td class=(CELL) { (entry.timestamp.format("%Y-%m-%d %H:%M:%S %z").to_string()) }
                                td class=(CELL) { (entry.ip) }
                                td class=(CELL) { (entry.request_uri) }
                                td class=(CELL) { (entry.status) }
                                td class=(CELL) { (response_size(entry.response_size)) }
                                td class=(CELL) { (entry.user_agent) }
                                td class=(CELL) { (format!("{:.3}", entry.latency())) }
                            }
                        }
                    }
                }
            }
        }
    }
    .into_string()
}

fn response_size(size: Option<u64>) -> String {
    size.map_or_else(|| "-".to_string(), |n| n.to_string())
}

fn section_title(title: &str) -> Markup {
    html! {
        h3 class="text-xl font-bold text-blue-700 mt-8 mb-4" { (title) }
    }
}

fn header_row(columns: &[&str]) -> Markup {
    html! {
        tr class="bg-blue-200" {
            @for column in columns {
                th class=(CELL) { (*column) }
            }
        }
    }
}

fn count_table<K: Display>(label: &str, rows: &[RankedCount<K>]) -> Markup {
    html! {
        table class="border border-collapse border-blue-500 w-full" {
            (header_row(&[label, "Request"]))
            @for row in rows {
                tr {
                    td class=(CELL) { (row.key.to_string()) }
                    td class=(CELL) { (row.count) }
                }
            }
        }
    }
}

fn nested_uri_table(uris: &[RankedCount<String>]) -> Markup {
    html! {
        table class="border border-collapse border-blue-500 w-full" {
            tr class="bg-blue-100" {
                th class=(CELL) { "RequestURI" }
                th class=(CELL) { "Request" }
            }
            @for uri in uris {
                tr {
                    td class=(CELL) { (uri.key) }
                    td class=(CELL) { (uri.count) }
                }
            }
        }
    }
}
