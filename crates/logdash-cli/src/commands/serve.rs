use anyhow::Result;
use logdash_core::AnalysisConfig;
use logdash_web::DashboardServer;
use std::net::SocketAddr;
use std::path::Path;

pub fn execute(file: &Path, config: AnalysisConfig, addr: SocketAddr) -> Result<()> {
    tracing::info!("Starting dashboard server on {}", addr);

    if !file.is_file() {
        tracing::warn!(
            "{} is not a readable file yet; requests will fail until it exists",
            file.display()
        );
    }

    println!("✓ Server is running on http://{}", addr);
    println!("  Log file:    {}", file.display());
    println!("  Date range:  {}", config.window);
    println!();
    println!("Press Ctrl+C to stop...");

    let server = DashboardServer::new(addr, file.to_path_buf(), config);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.run())?;

    println!("✅ Server stopped");
    Ok(())
}
