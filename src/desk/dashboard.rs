//! Per-patient paper record actions from the patient dashboard.

use std::fmt;
use std::sync::Arc;

use super::controller::ActionOutcome;
use super::dialog::{ConfirmationDialog, DialogRequest, DialogSlot, with_confirmation};
use crate::archives::error::DeskError;
use crate::archives::gateway::PatientDashboardGateway;
use crate::notify::Notifier;

/// The patient dashboard actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientAction {
    /// Ask the archives to send the patient's record to a location.
    RequestPaperRecord,
    /// Create a dossier number for a patient without one.
    CreateDossierNumber,
    /// Print an ID card label.
    PrintIdCardLabel,
    /// Print a paper record label.
    PrintPaperRecordLabel,
}

impl PatientAction {
    /// Command-line spelling of the action.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RequestPaperRecord => "request-record",
            Self::CreateDossierNumber => "create-dossier-number",
            Self::PrintIdCardLabel => "print-id-card-label",
            Self::PrintPaperRecordLabel => "print-record-label",
        }
    }

    /// Parses [`PatientAction::label`].
    #[must_use]
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim() {
            "request-record" => Some(Self::RequestPaperRecord),
            "create-dossier-number" => Some(Self::CreateDossierNumber),
            "print-id-card-label" => Some(Self::PrintIdCardLabel),
            "print-record-label" => Some(Self::PrintPaperRecordLabel),
            _ => None,
        }
    }

    const fn default_message(self) -> &'static str {
        match self {
            Self::RequestPaperRecord => "Paper record requested",
            Self::CreateDossierNumber => "Dossier number created",
            Self::PrintIdCardLabel => "ID card label printed",
            Self::PrintPaperRecordLabel => "Paper record label printed",
        }
    }
}

impl fmt::Display for PatientAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Runs patient dashboard actions and reports their outcome.
pub struct PatientDashboard {
    gateway: Arc<dyn PatientDashboardGateway>,
    notifier: Arc<dyn Notifier>,
    dialog: Arc<dyn ConfirmationDialog>,
    dialog_slot: DialogSlot,
}

impl PatientDashboard {
    /// Creates a dashboard.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn PatientDashboardGateway>,
        notifier: Arc<dyn Notifier>,
        dialog: Arc<dyn ConfirmationDialog>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            dialog,
            dialog_slot: DialogSlot::default(),
        }
    }

    /// Runs one action for a patient at a location.
    ///
    /// Blank ids are skipped without contacting the server. Requesting a
    /// paper record asks for confirmation first.
    ///
    /// # Errors
    ///
    /// Returns the remote failure, including a `success: false` reply from a
    /// print action, after an error notification.
    pub async fn run(
        &mut self,
        action: PatientAction,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionOutcome, DeskError> {
        let (patient_id, location_id) = (patient_id.trim(), location_id.trim());
        if patient_id.is_empty() || location_id.is_empty() {
            tracing::debug!(%action, "patient action skipped: missing patient or location");
            return Ok(ActionOutcome::Skipped);
        }

        if action == PatientAction::RequestPaperRecord {
            let request = DialogRequest::request_paper_record(patient_id, location_id);
            if !with_confirmation(&mut self.dialog_slot, self.dialog.as_ref(), request) {
                return Ok(ActionOutcome::Skipped);
            }
        }

        let result = match action {
            PatientAction::RequestPaperRecord => {
                self.gateway
                    .request_paper_record(patient_id, location_id)
                    .await
            }
            PatientAction::CreateDossierNumber => {
                self.gateway
                    .create_dossier_number(patient_id, location_id)
                    .await
            }
            PatientAction::PrintIdCardLabel => {
                self.gateway
                    .print_id_card_label(patient_id, location_id)
                    .await
            }
            PatientAction::PrintPaperRecordLabel => {
                self.gateway
                    .print_paper_record_label(patient_id, location_id)
                    .await
            }
        };

        match result {
            Ok(reply) => {
                tracing::info!(%action, patient_id, location_id, "patient action succeeded");
                self.notifier
                    .success(&reply.message_or(action.default_message()));
                Ok(ActionOutcome::Completed)
            }
            Err(error) => {
                tracing::warn!(%action, %error, "patient action failed");
                self.notifier.error(&error.to_string());
                Err(error)
            }
        }
    }
}
