use std::{io, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use client_core::{
    shadowed_bindings, Dispatcher, Endpoint, HttpTransport, Interrupt, Session, StartupError,
};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::{load_settings, Overrides};
use console::ConsoleReporter;

/// Drive a networked controller emulator from the terminal.
#[derive(Parser, Debug)]
#[command(name = "switch-remote", version)]
struct Args {
    /// Device address: host, host:port, or http URL
    #[arg(long, short)]
    address: Option<String>,
    /// How long tapped buttons stay pressed, in milliseconds
    #[arg(long)]
    hold_ms: Option<u64>,
    /// Per-request timeout, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Settings file (defaults to ./remote.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    let result = runtime.block_on(run(args));
    // the stdin reader may still be parked on a blocking read
    runtime.shutdown_background();
    result
}

fn init_tracing(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<ExitCode> {
    let settings = load_settings(args.config.as_deref())?.with_overrides(Overrides {
        device_addr: args.address,
        request_timeout_secs: args.timeout_secs,
        hold_ms: args.hold_ms,
    });
    info!(?settings, "loaded settings");

    let endpoint = Endpoint::from_address(&settings.device_addr, &settings.endpoint_path)
        .context("invalid device address")?;
    let transport = HttpTransport::new(endpoint.clone(), settings.request_timeout)
        .context("failed to build HTTP client")?;
    let dispatcher = Dispatcher::new(transport);

    for (token, command) in shadowed_bindings() {
        warn!(token, %command, "binding is unreachable; an earlier binding owns this token");
    }

    let (interrupt_handle, interrupt) = Interrupt::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => interrupt_handle.trigger(),
            Err(error) => warn!(%error, "failed to listen for ctrl-c"),
        }
    });

    console::print_banner(&mut io::stdout(), &endpoint)?;
    let reporter = ConsoleReporter::new(io::stdout());
    let mut session = match Session::connect(dispatcher, settings.hold, reporter, interrupt).await
    {
        Ok(session) => session,
        Err(StartupError::Unreachable(probe_error)) => {
            console::print_probe_failure(&mut io::stderr(), &probe_error)?;
            return Ok(ExitCode::FAILURE);
        }
        Err(StartupError::Interrupted) => {
            info!("interrupted during startup probe");
            println!("\ninterrupted");
            return Ok(ExitCode::FAILURE);
        }
    };
    console::print_connected(&mut io::stdout())?;

    let summary = session.run(BufReader::new(tokio::io::stdin())).await;
    info!(?summary, "session finished");
    println!("bye");
    Ok(ExitCode::SUCCESS)
}
