use anyhow::{Context, Result};
use logdash_core::AnalysisConfig;
use logdash_core::analysis::analyze_file;
use logdash_web::render_dashboard;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Render the HTML dashboard for an access log
pub fn render_report(file: &Path, config: &AnalysisConfig) -> Result<String> {
    let report = analyze_file(file, config)?;
    Ok(render_dashboard(&report))
}

pub fn execute(file: &Path, config: &AnalysisConfig, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Building dashboard for: {}", file.display());

    let html = render_report(file, config)?;

    if let Some(output_path) = output {
        tracing::debug!("Writing dashboard to: {}", output_path.display());
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        println!("✓ Dashboard written to {}", output_path.display());
    } else {
        tracing::debug!("Writing dashboard to stdout");
        let mut stdout = io::stdout();
        stdout.write_all(html.as_bytes())?;
        stdout.write_all(b"\n")?;
    }

    Ok(())
}
