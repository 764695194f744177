//! Debug1C - Main Entry Point
//!
//! Loads settings, wires the adapters into the exchange use case and runs
//! the requested command. The command's status is printed to stdout as
//! JSON; diagnostics go to stderr.

mod cli;
mod report;

use std::process::ExitCode;

use clap::Parser;
use debug1c_application::RunExchange;
use debug1c_infrastructure::{AppSettings, SettingsError};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::report::StatusReport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let report = match run(cli).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Failed to load settings");
            StatusReport::failure("SETTINGS_ERROR", e.to_string())
        }
    };

    println!("{}", report.to_json());
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(cli: Cli) -> Result<StatusReport, SettingsError> {
    let settings = AppSettings::load(cli.config.as_deref())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        document_root = %settings.site.document_root.display(),
        site_url = %settings.site.site_url,
        "Starting debug1c"
    );

    let exchange = RunExchange::new(settings.transport_factory(), settings.exchange_services()?);

    let result = match cli.command {
        Command::Init(args) => {
            let (raw, credentials) = args.into_request();
            exchange.init(raw, credentials).await
        }
        Command::Silence(args) => exchange.silence(args.into()).await,
        Command::Prepare => exchange.prepare().await,
    };

    Ok(StatusReport::from(&result))
}
