//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.dossier.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `DOSSIER_SERVER_URL`, `DOSSIER_USERNAME`,
//!    `DOSSIER_PASSWORD`, ...
//! 4. **Command-line arguments** – `--server-url`/`-s`, `--username`/`-u`, ...
//!
//! # Configuration File
//!
//! ```toml
//! server_url = "https://emr.example.org/mirebalais"
//! username = "archivist"
//! password = "secret"
//! poll_interval_secs = 20
//! selection_policy = "preserve"
//! cancel_behaviour = "hide"
//! ```

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::archives::endpoint::ServerUrl;
use crate::archives::error::DeskError;
use crate::archives::gateway::{Credentials, HttpGatewaySettings};
use crate::desk::{CancelBehaviour, DeskSettings, PatientAction};
use crate::queue::SelectionPolicy;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 20;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SELECTION_POLICY: &str = "preserve";
const DEFAULT_CANCEL_BEHAVIOUR: &str = "hide";

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Mark the record for one identifier as pulled, then exit.
    MarkPulled,
    /// Mark the record for one identifier as returned, then exit.
    MarkReturned,
    /// Run one patient dashboard action, then exit.
    PatientAction,
    /// Poll the queues and read desk commands from stdin until EOF.
    Watch,
    /// Load every queue once and print a summary.
    Summary,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `DOSSIER_SERVER_URL` or `--server-url`: Root URL of the web application
/// - `DOSSIER_USERNAME` or `--username`: Basic-auth account
/// - `DOSSIER_PASSWORD` or `--password`: Basic-auth password
/// - `DOSSIER_LOCATION_ID` or `--location-id`: Location for patient actions
///
/// # Example
///
/// ```no_run
/// use dossier::DossierConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = DossierConfig::load().expect("failed to load configuration");
/// let server = config.require_server_url().expect("server URL required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "DOSSIER",
    discovery(
        dotfile_name = ".dossier.toml",
        config_file_name = "dossier.toml",
        app_name = "dossier"
    )
)]
pub struct DossierConfig {
    /// Root URL of the web application hosting the archives room.
    ///
    /// Can be provided via:
    /// - CLI: `--server-url <URL>` or `-s <URL>`
    /// - Environment: `DOSSIER_SERVER_URL`
    /// - Config file: `server_url = "..."`
    #[ortho_config(cli_short = 's')]
    pub server_url: Option<String>,

    /// Account used for HTTP basic authentication.
    #[ortho_config(cli_short = 'u')]
    pub username: Option<String>,

    /// Password used for HTTP basic authentication.
    ///
    /// Prefer `DOSSIER_PASSWORD` or the config file over the CLI so the
    /// password does not end up in shell history.
    #[ortho_config()]
    pub password: Option<String>,

    /// Seconds between automatic queue refreshes in watch mode.
    ///
    /// Defaults to 20 seconds.
    #[ortho_config()]
    pub poll_interval_secs: u64,

    /// Per-request timeout, in seconds.
    ///
    /// Defaults to 10 seconds.
    #[ortho_config()]
    pub request_timeout_secs: u64,

    /// Whether a reload keeps selections by request id (`preserve`) or
    /// clears them (`reset`).
    #[ortho_config()]
    pub selection_policy: String,

    /// Whether a cancelled request is hidden locally (`hide`) or every queue
    /// is reloaded (`reload`).
    #[ortho_config()]
    pub cancel_behaviour: String,

    /// Location used by patient dashboard actions.
    #[ortho_config(cli_short = 'l')]
    pub location_id: Option<String>,

    /// Patient targeted by `patient_action`.
    #[ortho_config(cli_short = 'i')]
    pub patient_id: Option<String>,

    /// Patient dashboard action to run: `request-record`,
    /// `create-dossier-number`, `print-id-card-label` or
    /// `print-record-label`.
    #[ortho_config(cli_short = 'd')]
    pub patient_action: Option<String>,

    /// Identifier to mark as pulled.
    #[ortho_config()]
    pub mark_pulled: Option<String>,

    /// Identifier to mark as returned.
    #[ortho_config()]
    pub mark_returned: Option<String>,

    /// Keeps polling and reads desk commands from stdin.
    ///
    /// Note: Environment variable `DOSSIER_WATCH` is not supported because
    /// `ortho_config` does not load boolean values from the environment.
    #[ortho_config(cli_short = 'w')]
    pub watch: bool,

    /// Confirms every dialog without asking.
    #[ortho_config(cli_short = 'y')]
    pub assume_yes: bool,

    /// Writes telemetry events to stderr as JSON lines.
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for DossierConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            username: None,
            password: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            selection_policy: DEFAULT_SELECTION_POLICY.to_owned(),
            cancel_behaviour: DEFAULT_CANCEL_BEHAVIOUR.to_owned(),
            location_id: None,
            patient_id: None,
            patient_action: None,
            mark_pulled: None,
            mark_returned: None,
            watch: false,
            assume_yes: false,
            telemetry: false,
        }
    }
}

fn configuration_error(message: impl Into<String>) -> DeskError {
    DeskError::Configuration {
        message: message.into(),
    }
}

impl DossierConfig {
    /// Determines the operation mode based on provided configuration.
    ///
    /// One-shot scans win over patient actions, which win over watch mode;
    /// with none of them set the queues are summarised once.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.mark_pulled.is_some() {
            OperationMode::MarkPulled
        } else if self.mark_returned.is_some() {
            OperationMode::MarkReturned
        } else if self.patient_action.is_some() {
            OperationMode::PatientAction
        } else if self.watch {
            OperationMode::Watch
        } else {
            OperationMode::Summary
        }
    }

    /// Checks that the configured values are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Configuration`] when two one-shot modes are
    /// requested together, when a policy name is unknown, or when the poll
    /// interval is zero.
    pub fn validate(&self) -> Result<(), DeskError> {
        if self.mark_pulled.is_some() && self.mark_returned.is_some() {
            return Err(configuration_error(
                "--mark-pulled and --mark-returned cannot be used together",
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(configuration_error(
                "poll_interval_secs must be at least 1",
            ));
        }
        self.selection_policy()?;
        self.cancel_behaviour()?;
        self.patient_action()?;
        Ok(())
    }

    /// Parses the configured server URL.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Configuration`] when no URL is configured and
    /// [`DeskError::InvalidUrl`] when it cannot be parsed.
    pub fn require_server_url(&self) -> Result<ServerUrl, DeskError> {
        let raw = self
            .server_url
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                configuration_error("server URL is required (use --server-url or -s)")
            })?;
        ServerUrl::parse(raw)
    }

    /// Basic-auth credentials, when configured.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Configuration`] when only one of username and
    /// password is set.
    pub fn credentials(&self) -> Result<Option<Credentials>, DeskError> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok(Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(configuration_error(
                "a password is required when a username is set (use DOSSIER_PASSWORD)",
            )),
            (None, Some(_)) => Err(configuration_error(
                "a username is required when a password is set (use --username or -u)",
            )),
        }
    }

    /// Settings for the HTTP gateway.
    ///
    /// # Errors
    ///
    /// Propagates [`DossierConfig::require_server_url`] and
    /// [`DossierConfig::credentials`] failures.
    pub fn gateway_settings(&self) -> Result<HttpGatewaySettings, DeskError> {
        let mut settings = HttpGatewaySettings::new(self.require_server_url()?);
        settings.credentials = self.credentials()?;
        settings.timeout = Duration::from_secs(self.request_timeout_secs);
        Ok(settings)
    }

    /// Parsed selection policy.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Configuration`] for unknown names.
    pub fn selection_policy(&self) -> Result<SelectionPolicy, DeskError> {
        SelectionPolicy::from_config(&self.selection_policy).ok_or_else(|| {
            configuration_error(format!(
                "unknown selection_policy `{}` (expected `preserve` or `reset`)",
                self.selection_policy
            ))
        })
    }

    /// Parsed cancel behaviour.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Configuration`] for unknown names.
    pub fn cancel_behaviour(&self) -> Result<CancelBehaviour, DeskError> {
        CancelBehaviour::from_config(&self.cancel_behaviour).ok_or_else(|| {
            configuration_error(format!(
                "unknown cancel_behaviour `{}` (expected `hide` or `reload`)",
                self.cancel_behaviour
            ))
        })
    }

    /// Behavioural settings for the desk.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Configuration`] for unknown policy names.
    pub fn desk_settings(&self) -> Result<DeskSettings, DeskError> {
        Ok(DeskSettings {
            selection_policy: self.selection_policy()?,
            cancel_behaviour: self.cancel_behaviour()?,
            poll_interval: Duration::from_secs(self.poll_interval_secs.max(1)),
        })
    }

    /// Parsed patient dashboard action, when one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Configuration`] for unknown action names.
    pub fn patient_action(&self) -> Result<Option<PatientAction>, DeskError> {
        self.patient_action
            .as_deref()
            .map(|label| {
                PatientAction::from_label(label).ok_or_else(|| {
                    configuration_error(format!("unknown patient action `{label}`"))
                })
            })
            .transpose()
    }

    /// Patient and location targeted by a patient action.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Configuration`] when either is missing.
    pub fn require_patient_target(&self) -> Result<(&str, &str), DeskError> {
        match (&self.patient_id, &self.location_id) {
            (Some(patient), Some(location)) => Ok((patient.as_str(), location.as_str())),
            (None, _) => Err(configuration_error(
                "a patient id is required (use --patient-id or -i)",
            )),
            (_, None) => Err(configuration_error(
                "a location id is required (use --location-id or -l)",
            )),
        }
    }
}

#[cfg(test)]
mod tests;
