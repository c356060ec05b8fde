use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use logdash_cli::OutputFormat;
use logdash_cli::commands;
use logdash_core::AnalysisConfig;
use logdash_core::log::LogFormat;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logdash")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Analyze web-server access logs and build a traffic dashboard",
    long_about = "logdash parses access-log lines, keeps the ones inside a time window, and \
                  ranks the busiest seconds, minutes, request targets, user agents and status \
                  codes alongside the slowest requests."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format for `analyze`
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

/// Time window and grammar shared by the analysis commands
#[derive(Args, Debug)]
struct WindowArgs {
    /// Start of the time window, inclusive (YYYY-MM-DD HH:MM:SS)
    #[arg(long, env = "LOGDASH_START")]
    start: String,

    /// End of the time window, inclusive (YYYY-MM-DD HH:MM:SS)
    #[arg(long, env = "LOGDASH_END")]
    end: String,

    /// Log line grammar (timed, combined)
    #[arg(long, env = "LOGDASH_LOG_FORMAT", default_value = "timed")]
    log_format: LogFormat,
}

impl WindowArgs {
    fn config(&self) -> Result<AnalysisConfig> {
        Ok(AnalysisConfig::from_bounds(
            self.log_format,
            &self.start,
            &self.end,
        )?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print ranked statistics for an access log
    Analyze {
        /// Path to the access log
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Render the HTML dashboard for an access log
    Report {
        /// Path to the access log
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        window: WindowArgs,

        /// Write the dashboard to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert an access log to CSV (no time filtering)
    Csv {
        /// Path to the access log
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to the output CSV file
        #[arg(short, long, default_value = commands::convert::DEFAULT_CSV_OUTPUT)]
        output: PathBuf,

        /// Log line grammar (timed, combined)
        #[arg(long, env = "LOGDASH_LOG_FORMAT", default_value = "timed")]
        log_format: LogFormat,
    },

    /// Serve the dashboard over HTTP, re-analyzing the log on every request
    Serve {
        /// Path to the access log
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        window: WindowArgs,

        /// Address to listen on
        #[arg(long, env = "LOGDASH_ADDR", default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Execute the command
    match cli.command {
        Commands::Analyze { file, window } => {
            commands::analyze::execute(&file, &window.config()?, cli.format)
        }
        Commands::Report {
            file,
            window,
            output,
        } => commands::report::execute(&file, &window.config()?, output),
        Commands::Csv {
            file,
            output,
            log_format,
        } => commands::convert::execute(&file, &output, log_format).map(|_| ()),
        Commands::Serve { file, window, addr } => {
            commands::serve::execute(&file, window.config()?, addr)
        }
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("logdash=debug,logdash_cli=debug,logdash_core=debug,logdash_web=debug")
    } else {
        EnvFilter::new("logdash=info,logdash_cli=info,logdash_core=warn,logdash_web=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
