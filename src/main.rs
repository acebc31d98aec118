//! CLI entry point for the bike rental dashboard.
//!
//! Provides subcommands for rendering the dashboard for a date range,
//! exploring ranges interactively, and exporting the derived tables.

use anyhow::{Context, Result};
use bike_dashboard::config::DashboardConfig;
use bike_dashboard::explore;
use bike_dashboard::output::{OutputFormat, export_tables, print_pretty, render};
use bike_dashboard::parser::parse_date;
use bike_dashboard::session::DashboardSession;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bike_dashboard")]
#[command(about = "Hourly and weather usage dashboard for bike rental data", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Path or URL of the rental CSV (overrides DASHBOARD_SOURCE)
    #[arg(short, long, global = true, value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// JSON file mapping weather codes to labels (overrides DASHBOARD_LABELS)
    #[arg(short, long, global = true)]
    labels: Option<PathBuf>,
}

#[derive(Args)]
struct RangeArgs {
    /// First date to include (YYYY-MM-DD, defaults to the earliest date)
    #[arg(long, value_parser = parse_date_arg)]
    start: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD, defaults to the latest date)
    #[arg(long, value_parser = parse_date_arg)]
    end: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the dashboard for a date range
    Show {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Read date ranges from stdin and re-render after each one
    Explore {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Write the hourly and weather tables for a date range as CSV
    Export {
        #[command(flatten)]
        range: RangeArgs,

        /// Directory to write hourly_usage.csv and weather_effect.csv into
        #[arg(short, long, default_value = "dashboard_export")]
        output_dir: PathBuf,
    },
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = DashboardConfig::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"))
        .to_path_buf();
    let log_file_name = config
        .log_file
        .file_name()
        .unwrap_or(OsStr::new("bike_dashboard.log"))
        .to_os_string();

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if let Some(source) = cli.source.source {
        config.source = source;
    }
    if let Some(labels) = cli.source.labels {
        config.labels_path = Some(labels);
    }

    let session = DashboardSession::load(&config).await?;
    let report = session.dataset().report();
    info!(
        source = %config.source,
        rows_read = report.rows_read,
        accepted_pct = report.accepted_pct(),
        "Dataset loaded"
    );

    match cli.command {
        Commands::Show { range, format } => {
            let range = session
                .range(range.start, range.end)
                .context("invalid date range")?;
            let view = session.render(range)?;
            print_pretty(&view);
            println!("{}", render(&view, format)?);
        }
        Commands::Explore { format } => {
            let stdin = io::stdin();
            explore::run(&session, stdin.lock(), io::stdout(), format)?;
        }
        Commands::Export { range, output_dir } => {
            let range = session
                .range(range.start, range.end)
                .context("invalid date range")?;
            let view = session.render(range)?;
            let (hourly, weather) = export_tables(&output_dir, &view)?;
            println!("{}\n{}", hourly.display(), weather.display());
        }
    }

    Ok(())
}
