//! CLI operation mode handlers.
//!
//! This module contains the implementations for different operation modes:
//! - [`summary`]: Load every queue once and print a summary
//! - [`scan`]: Mark one identifier as pulled or returned
//! - [`dashboard`]: Run one patient dashboard action
//! - [`watch`]: Poll the queues and read desk commands from stdin
//!
//! Output formatting utilities are in [`output`].

use std::sync::Arc;

use dossier::{
    ArchivesRoom, ConsoleNotifier, DeskError, DossierConfig, HttpArchivesGateway,
    NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink,
};

pub mod dashboard;
pub mod output;
pub mod scan;
pub mod summary;
pub mod watch;

/// Builds the HTTP gateway described by the configuration.
///
/// # Errors
///
/// Returns [`DeskError::Configuration`] or [`DeskError::InvalidUrl`] when the
/// server settings are incomplete or malformed.
pub fn build_gateway(config: &DossierConfig) -> Result<Arc<HttpArchivesGateway>, DeskError> {
    HttpArchivesGateway::new(config.gateway_settings()?).map(Arc::new)
}

/// Chooses the telemetry sink: JSON lines on stderr when enabled.
pub fn telemetry_sink(config: &DossierConfig) -> Arc<dyn TelemetrySink> {
    if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    }
}

/// Builds a desk that reports to the console.
///
/// # Errors
///
/// Propagates gateway and desk settings failures.
pub fn build_room(config: &DossierConfig) -> Result<ArchivesRoom, DeskError> {
    let gateway = build_gateway(config)?;
    let room = ArchivesRoom::new(gateway, Arc::new(ConsoleNotifier), config.desk_settings()?)
        .with_telemetry(telemetry_sink(config));
    Ok(room)
}
