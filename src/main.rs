use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use linewatch::{diagnostics_table, logging, status_line, DiagnosticsReport, Overrides, Settings};
use linewatch_monitor::Monitor;

#[derive(Parser, Debug)]
#[command(name = "linewatch")]
#[command(about = "Reachability doctor for the voice line and radio manager API")]
struct Args {
    /// Path to a config file (TOML, YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API base URL (e.g. "http://localhost:8060")
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    /// Per-probe timeout for checks (e.g. "3s", "500ms")
    #[arg(long, global = true)]
    probe_timeout: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Monitor connectivity and print every status change (default)
    Watch,
    /// Run one probe chain; exit status 0 when the backend is reachable
    Check,
    /// Probe every endpoint with the diagnostics timeout
    Diagnose {
        /// Export the results to a JSON file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logging::init(args.log_level.as_deref())?;

    let overrides = Overrides {
        base_url: args.base_url,
        probe_timeout: args.probe_timeout,
    };
    let settings = Settings::load(args.config.as_deref(), &overrides)?;

    let rt = tokio::runtime::Runtime::new()?;

    match args.command.unwrap_or(Command::Watch) {
        Command::Watch => rt.block_on(run_watch(&settings)),
        Command::Check => rt.block_on(run_check(&settings)),
        Command::Diagnose { export } => rt.block_on(run_diagnose(&settings, export)),
    }
}

/// Print a status line per snapshot change until Ctrl-C
async fn run_watch(settings: &Settings) -> Result<ExitCode> {
    let monitor = settings.monitor_builder().spawn()?;
    let mut updates = monitor.subscribe();

    println!("Watching {}...", settings.base_url);
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if !state.is_checking {
                    println!("{}", status_line(&state));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping monitor");
                break;
            }
        }
    }

    monitor.stop();
    Ok(ExitCode::SUCCESS)
}

/// Run a single chain and report it
async fn run_check(settings: &Settings) -> Result<ExitCode> {
    let monitor = settings.monitor_builder().build()?;

    let reachable = monitor.retry_connection().await;
    let state = monitor.state();
    println!("{}", status_line(&state));

    if !reachable {
        print!("{}", diagnostics_table(&state.diagnostics));
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Sweep every endpoint and optionally export the results
async fn run_diagnose(settings: &Settings, export: Option<PathBuf>) -> Result<ExitCode> {
    let monitor: Monitor = settings.monitor_builder().build()?;

    let results = monitor.detailed_diagnostics().await;
    print!("{}", diagnostics_table(&results));

    let report = DiagnosticsReport::new(&settings.base_url, results);
    if let Some(path) = export {
        report.export(&path)?;
        println!("Exported diagnostics to: {}", path.display());
    }

    Ok(if report.summary.reachable {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
