//! One-shot patient dashboard action.

use std::io::{self, BufReader};
use std::sync::Arc;

use dossier::{
    ActionOutcome, AutoConfirm, ConfirmationDialog, ConsoleNotifier, DeskError, DossierConfig,
    PatientDashboard, PromptDialog,
};

use super::build_gateway;

/// Runs the configured patient action.
///
/// Requesting a paper record asks on stderr for confirmation unless
/// `--assume-yes` is set.
///
/// # Errors
///
/// Returns configuration failures and the remote failure.
pub async fn run(config: &DossierConfig) -> Result<(), DeskError> {
    let Some(action) = config.patient_action()? else {
        return Err(DeskError::Configuration {
            message: "a patient action is required (use --patient-action or -d)".to_owned(),
        });
    };
    let (patient_id, location_id) = config.require_patient_target()?;

    let dialog: Arc<dyn ConfirmationDialog> = if config.assume_yes {
        Arc::new(AutoConfirm)
    } else {
        Arc::new(PromptDialog::new(BufReader::new(io::stdin()), io::stderr()))
    };
    let mut dashboard = PatientDashboard::new(build_gateway(config)?, Arc::new(ConsoleNotifier), dialog);

    match dashboard.run(action, patient_id, location_id).await? {
        ActionOutcome::Completed => Ok(()),
        ActionOutcome::Skipped => {
            tracing::info!(%action, "patient action not confirmed");
            Ok(())
        }
    }
}
