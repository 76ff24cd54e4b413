use anyhow::{Context, Result};
use clap::Parser;
use hive_client::HiveApi;
use reward_scanner::report::elapsed_line;
use reward_scanner::{scan, HiveFeed};
use rewarder_core::{ErrorReporter, ScanConfig};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "commentrewarder", version)]
#[command(
    about = "Report recent Hive posts that share rewards with a beneficiary account",
    long_about = None
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Look-back window in hours
    #[arg(long)]
    hours: Option<i64>,

    /// Beneficiary account to look for
    #[arg(long)]
    account: Option<String>,

    /// Minimum beneficiary weight in basis points
    #[arg(long)]
    min_weight: Option<u16>,

    /// API node URL, in priority order (repeatable, replaces the configured list)
    #[arg(long = "endpoint")]
    endpoints: Vec<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides RUST_LOG
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ScanConfig::default(),
        };

        if let Some(hours) = self.hours {
            config.window_hours = hours;
        }
        if let Some(account) = self.account {
            config.beneficiary_account = account;
        }
        if let Some(min_weight) = self.min_weight {
            config.min_beneficiary_weight = min_weight;
        }
        if !self.endpoints.is_empty() {
            config.endpoints = self.endpoints;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = log_file;
        }

        config.validate()?;
        Ok(config)
    }
}

fn log_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

fn init_logging(config: &ScanConfig, level: Option<&str>) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("opening log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(level))
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = cli.log_level.clone();
    let config = cli.into_config()?;
    init_logging(&config, log_level.as_deref())?;

    tracing::info!("Starting commentrewarder scan for @{}", config.beneficiary_account);
    let start = Instant::now();
    let reporter = ErrorReporter::new();

    match HiveApi::connect(&config) {
        Ok(api) => {
            let feed = HiveFeed::new(api, &config);
            let report = scan(&feed, &config, chrono::Utc::now().naive_utc()).await;

            for line in report.render(&config) {
                println!("{}", line);
            }
            if let Err(e) = &report.outcome {
                reporter.report_error(e);
            }

            let metrics = feed.api().metrics().get_metrics().await;
            tracing::info!(
                "{} API requests, {} unavailable responses, {} qualifying posts",
                metrics.total_requests,
                metrics.unavailable_responses,
                report.lines.len()
            );
            for (endpoint, stats) in &metrics.requests_by_endpoint {
                tracing::debug!(
                    "{}: {} requests, {} unavailable, {} failed, {:?} average",
                    endpoint,
                    stats.request_count,
                    stats.unavailable_count,
                    stats.error_count,
                    stats.average_response_time()
                );
            }
            match feed.api().metrics().export_metrics().await {
                Ok(json) => tracing::debug!("API metrics: {}", json),
                Err(e) => tracing::warn!("Could not export API metrics: {}", e),
            }
        }
        Err(e) => reporter.report_error(&e),
    }

    println!("{}", elapsed_line(start.elapsed()));
    Ok(())
}
