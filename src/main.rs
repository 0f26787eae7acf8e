//! CloudSave Dashboard - Entry Point
//!
//! Interactive mode takes over the terminal and shows the simulation panel.
//! Headless mode performs a single run and prints the panel as text.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use cloudsave_dashboard::backend::BackendClient;
use cloudsave_dashboard::core::config::DashboardConfig;
use cloudsave_dashboard::core::error::Result;
use cloudsave_dashboard::ui::{run_interactive, run_once};

/// CloudSave AI Dashboard - run a simulated cold call and inspect the outcome
#[derive(Parser, Debug)]
#[command(name = "cloudsave-dashboard")]
#[command(about = "Trigger a simulated cold call on the bot server and show its outcome")]
struct Args {
    /// TOML config file (defaults apply for anything it leaves out)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Run endpoint, overrides the config file
    #[arg(long)]
    endpoint: Option<String>,

    /// Log file for interactive mode, overrides the config file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Perform one run, print the result and exit
    #[arg(long)]
    headless: bool,

    /// With --headless, print only the outcome JSON
    #[arg(long, requires = "headless")]
    json: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(endpoint) = args.endpoint.clone() {
        config.endpoint = endpoint;
    }
    if let Some(log_file) = args.log_file.clone() {
        config.log_file = log_file;
    }
    config.validate()?;

    init_tracing(&config, args.headless)?;
    tracing::info!(endpoint = %config.endpoint, headless = args.headless, "CloudSave dashboard starting");

    let rt = Runtime::new()?;
    let client = BackendClient::from_config(&config);

    if args.headless {
        return Ok(run_headless(&rt, &client, args.json));
    }

    run_interactive(&config, client, rt.handle().clone())?;
    tracing::info!("CloudSave dashboard exiting");
    Ok(ExitCode::SUCCESS)
}

/// One run, printed to stdout
fn run_headless(rt: &Runtime, client: &BackendClient, json_only: bool) -> ExitCode {
    let report = rt.block_on(run_once(client, json_only));

    print!("{}", report.stdout);
    if let Some(status) = &report.stderr {
        eprintln!("{}", status);
    }

    if report.failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// `RUST_LOG` wins over the configured level. Interactive mode logs to a
/// file because the panel owns the terminal.
fn init_tracing(config: &DashboardConfig, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .init();
    }
    Ok(())
}
