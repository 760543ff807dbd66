//! Calltone - earnings-call tone dashboard client
//!
//! A CLI tool that fetches pre-computed sentiment and strategic-focus
//! analysis of quarterly earnings-call transcripts from an HTTP backend
//! and renders it as a dashboard report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, backend failure, etc.)

mod backend;
mod cli;
mod config;
mod derive;
mod models;
mod report;
mod session;

use anyhow::{Context, Result};
use backend::BackendClient;
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use session::DashboardSession;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Calltone v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Operation failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .calltone.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".calltone.toml");

    if path.exists() {
        eprintln!("⚠️  .calltone.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .calltone.toml")?;

    println!("✅ Created .calltone.toml with default settings.");
    println!("   Edit it to customize backend URL, ticker, and report options.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Dispatch the requested operation. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let client = BackendClient::new(
        &config.backend.url,
        config.backend.timeout_seconds,
        config.backend.use_cache,
    )?;

    if args.health {
        return run_health(&client, &args).await;
    }
    if args.clear_cache {
        return run_clear_cache(&client, &args).await;
    }
    if args.transcripts {
        return run_transcripts(&client, &config, &args).await;
    }
    if args.collect {
        return run_collect(&client, &config, &args).await;
    }

    run_analyze(&client, &config, &args).await
}

/// Default operation: fetch analysis, derive the view, write the report.
async fn run_analyze(client: &BackendClient, config: &Config, args: &Args) -> Result<i32> {
    let ticker = &config.analysis.ticker;
    let quarters = config.analysis.quarters;

    println!("📡 Backend: {}", client.base_url());
    println!("🔎 Analyzing {} over {} quarters...", ticker, quarters);
    if !config.backend.use_cache {
        println!("   Cache bypass requested; the backend will re-run the full analysis.");
    }

    let mut session = DashboardSession::new();

    let spinner = request_spinner("Waiting for backend analysis...", args.quiet);
    let result = session.analyze(client, ticker, quarters).await;
    finish_spinner(spinner);

    // A failed attempt is terminal; re-running the command is the retry
    let from_cache = result?;
    let data = session
        .snapshot()
        .context("Analysis succeeded but no snapshot was recorded")?;

    let view = derive::build_view(data, config.report.top_themes);

    println!("\n📝 Generating report...");

    let metadata = report::ReportMetadata {
        backend_url: client.base_url().to_string(),
        from_cache,
        generated_at: Utc::now(),
    };
    let options = report::ReportOptions {
        include_narratives: config.report.include_narratives,
        include_transcripts: config.report.include_transcripts,
    };

    let output = match args.format {
        OutputFormat::Markdown => {
            report::generate_markdown_report(data, &view, &metadata, &options)
        }
        OutputFormat::Json => report::generate_json_report(&view)?,
    };

    let output_path = &config.general.output;
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path))?;

    println!("\n📊 Dashboard Summary:");
    println!("{}", report::terminal_summary(&view, from_cache));
    println!("\n✅ Done! Report saved to: {}", output_path);

    Ok(0)
}

/// Handle --collect: trigger transcript collection on the backend.
async fn run_collect(client: &BackendClient, config: &Config, args: &Args) -> Result<i32> {
    let ticker = &config.analysis.ticker;
    let quarters = config.analysis.quarters;

    println!("📥 Collecting transcripts for {} ({} quarters)...", ticker, quarters);

    let mut session = DashboardSession::new();

    let spinner = request_spinner("Waiting for backend collection...", args.quiet);
    let result = session.collect(client, ticker, quarters).await;
    finish_spinner(spinner);

    let message = result?;
    println!("\n✅ {}", message);

    Ok(0)
}

/// Handle --transcripts: fetch and print the raw transcript payload.
async fn run_transcripts(client: &BackendClient, config: &Config, args: &Args) -> Result<i32> {
    let ticker = &config.analysis.ticker;
    let quarters = config.analysis.quarters;

    let spinner = request_spinner("Fetching transcripts...", args.quiet);
    let result = client.transcripts(ticker, quarters).await;
    finish_spinner(spinner);

    let payload = result?;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(0)
}

/// Handle --clear-cache.
async fn run_clear_cache(client: &BackendClient, args: &Args) -> Result<i32> {
    let mut session = DashboardSession::new();

    let spinner = request_spinner("Clearing backend cache...", args.quiet);
    let result = session.clear_cache(client).await;
    finish_spinner(spinner);

    let message = result?;
    println!("✅ {}", message);

    Ok(0)
}

/// Handle --health: print the backend liveness payload.
async fn run_health(client: &BackendClient, args: &Args) -> Result<i32> {
    let spinner = request_spinner("Checking backend health...", args.quiet);
    let result = client.health().await;
    finish_spinner(spinner);

    match result {
        Ok(payload) => {
            println!("✅ Backend is reachable at {}", client.base_url());
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(0)
        }
        Err(e) => {
            warn!("Health check failed: {}", e);
            eprintln!("❌ {}", e);
            Ok(1)
        }
    }
}

/// Spinner shown while a backend request is in flight.
fn request_spinner(message: &str, quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));

    Some(spinner)
}

fn finish_spinner(spinner: Option<ProgressBar>) {
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .calltone.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
