//! Log Chain Reader
//!
//! Verifies hash-chained workload logs repeatedly for a bounded duration.
//! Exits 0 when every pass over every log verified, 1 when any violation or
//! I/O error was seen, and 2 on invalid arguments.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use logchain::config::{load_config_file, AppConfig};
use logchain::session::{
    ExitStatus, FileSource, SessionConfig, SessionReport, SessionRunner, SourceOutcome,
};
use logchain::{LogChainError, MalformedLinePolicy};

#[derive(Parser, Debug)]
#[command(name = "logreader")]
#[command(about = "logreader validation script")]
#[command(version)]
struct Cli {
    /// Filepath of a log file to read and verify ("-" reads stdin)
    #[arg(required = true, value_name = "LOGFILE")]
    logfile: Vec<String>,

    /// Time duration in minutes you want to run this [default is 5 minutes]
    #[arg(short = 't', long, value_name = "T", allow_negative_numbers = true)]
    duration: Option<i64>,

    /// Set log level to DEBUG
    #[arg(short, long)]
    debug: bool,

    /// Suppress output except errors
    #[arg(short, long, conflicts_with = "debug")]
    quiet: bool,

    /// Pause between verification passes, in milliseconds
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// What a malformed line means for the next link: carry-forward or break-chain
    #[arg(long, value_name = "POLICY")]
    policy: Option<MalformedLinePolicy>,

    /// YAML settings file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the JSON session report to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let app_config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitStatus::InvalidArguments.into();
        }
    };

    init_tracing(app_config.debug, cli.quiet);

    match run(&cli, &app_config) {
        Ok(status) => status.into(),
        Err(e) => {
            error!("{:#}", e);
            match e.downcast_ref::<LogChainError>() {
                Some(err) if err.is_config_error() => ExitStatus::InvalidArguments.into(),
                _ => ExitStatus::Failure.into(),
            }
        }
    }
}

/// Environment, then config file, then command line
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load().context("Failed to load configuration from environment")?;

    if let Some(path) = &cli.config {
        let file = load_config_file(path)
            .with_context(|| format!("Failed to load configuration file {:?}", path))?;
        config.merge_file(file);
    }

    if let Some(duration) = cli.duration {
        config.duration_minutes = duration;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.pass_interval_ms = interval_ms;
    }
    if let Some(policy) = cli.policy {
        config.malformed_policy = policy;
    }
    config.debug |= cli.debug;

    if config.duration_minutes < 0 {
        anyhow::bail!("negative time duration specified");
    }

    Ok(config)
}

fn init_tracing(debug: bool, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else if debug {
        "logchain=debug,logreader=debug"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn run(cli: &Cli, config: &AppConfig) -> Result<ExitStatus> {
    let session_config = SessionConfig::new(cli.logfile.clone(), config.duration_minutes)
        .with_pass_interval(config.pass_interval())
        .with_policy(config.malformed_policy);

    info!(
        "Verifying {} log file(s) for {} minute(s), malformed lines: {}",
        session_config.sources.len(),
        session_config.duration_minutes,
        session_config.policy
    );

    let runner = SessionRunner::new(session_config, FileSource)?;
    let report = runner.run();

    for outcome in &report.last_pass {
        match outcome {
            SourceOutcome::Verified(verdict) => info!("{}", verdict.summary()),
            SourceOutcome::IoError { source, message } => {
                error!("{}: unreadable ({})", source, message)
            }
        }
    }

    if let Some(path) = &cli.report {
        write_report(&report, path)?;
    }

    Ok(report.exit_status())
}

fn write_report(report: &SessionReport, path: &Path) -> Result<()> {
    let json = report.to_json()?;
    std::fs::write(path, json).with_context(|| format!("Failed to write report to {:?}", path))?;
    info!("Session report written to {:?}", path);
    Ok(())
}
