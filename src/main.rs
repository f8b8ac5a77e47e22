//! Dossier CLI entrypoint for the archives-room desk.

use std::io::{self, Write};
use std::process::ExitCode;

use dossier::{DeskError, DossierConfig, OperationMode, ScanForm};
use ortho_config::OrthoConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), DeskError> {
    init_tracing()?;
    let config = load_config()?;
    config.validate()?;

    match config.operation_mode() {
        OperationMode::MarkPulled => cli::scan::run(&config, ScanForm::Pulled).await,
        OperationMode::MarkReturned => cli::scan::run(&config, ScanForm::Returned).await,
        OperationMode::PatientAction => cli::dashboard::run(&config).await,
        OperationMode::Watch => cli::watch::run(&config).await,
        OperationMode::Summary => cli::summary::run(&config).await,
    }
}

/// Installs the log subscriber. `RUST_LOG` overrides the `dossier=info`
/// default.
fn init_tracing() -> Result<(), DeskError> {
    let directive = "dossier=info"
        .parse()
        .map_err(|error| DeskError::Configuration {
            message: format!("invalid log directive: {error}"),
        })?;

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(directive))
        .with(fmt::layer().with_writer(io::stderr))
        .try_init()
        .map_err(|error| DeskError::Configuration {
            message: format!("failed to install log subscriber: {error}"),
        })
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`DeskError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<DossierConfig, DeskError> {
    DossierConfig::load().map_err(|error| DeskError::Configuration {
        message: error.to_string(),
    })
}
