use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use friday_agent::config::LogFormat;
use friday_agent::session::RealtimeClient;
use friday_agent::tools::{
    DuckDuckGo, OpenMeteoApi, SearchTool, SystemStatusTool, TimeTool, WeatherTool,
};
use friday_agent::{check, Config, Orchestrator, SseTransport, ToolRegistry};

/// Friday - voice-driven personal assistant worker
#[derive(Parser)]
#[command(name = "friday", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv); overrides `LOG_LEVEL`
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check environment, bridge and smart-home REST reachability
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Best effort; a missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("fatal: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config, cli.verbose) {
        eprintln!("fatal: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing once from logging config and CLI verbosity
fn init_logging(config: &Config, verbose: u8) -> anyhow::Result<()> {
    let filter = match verbose {
        0 => EnvFilter::new(&config.logging.level),
        1 => EnvFilter::new("info,friday_agent=debug"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if let Some(path) = &config.logging.file_path {
        let file = Arc::new(open_log_file(path)?);
        let builder = builder.with_ansi(false).with_writer(move || Arc::clone(&file));
        match config.logging.format {
            LogFormat::Full => builder.init(),
            LogFormat::Compact => builder.compact().init(),
            LogFormat::Pretty => builder.pretty().init(),
        }
    } else {
        match config.logging.format {
            LogFormat::Full => builder.init(),
            LogFormat::Compact => builder.compact().init(),
            LogFormat::Pretty => builder.pretty().init(),
        }
    }

    Ok(())
}

/// Open the log file for appending, creating parent directories as needed.
///
/// Appending keeps history across restarts; the supervisor owns rotation.
fn open_log_file(path: &str) -> std::io::Result<std::fs::File> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

async fn run(command: Option<Command>, config: Config) -> anyhow::Result<()> {
    match command {
        Some(Command::Check) => run_check(&config).await,
        None => run_worker(config).await,
    }
}

/// Run the health check and map the outcome to the exit code
async fn run_check(config: &Config) -> anyhow::Result<()> {
    let report = check::run(config).await;
    print!("{}", report.render());

    if report.passed() {
        Ok(())
    } else {
        anyhow::bail!("health check failed");
    }
}

/// Run the long-lived worker: one session, bridge-first
async fn run_worker(config: Config) -> anyhow::Result<()> {
    let registry = ToolRegistry::new()
        .with(Arc::new(WeatherTool::new(Arc::new(OpenMeteoApi::new()?))))
        .with(Arc::new(SearchTool::new(Arc::new(DuckDuckGo::new()?))))
        .with(Arc::new(TimeTool::new()))
        .with(Arc::new(SystemStatusTool::new()));

    let transport = SseTransport::new(Duration::from_secs(config.bridge.timeout_secs))?;
    let mut session = RealtimeClient::new(&config.engine)?;

    let orchestrator = Orchestrator::new(config, registry);
    orchestrator.run(&transport, &mut session).await?;

    // The engine owns the conversation from here; hold the process open until
    // the supervisor stops it
    tracing::info!("worker running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");

    Ok(())
}
