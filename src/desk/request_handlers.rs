//! Handlers for the mutating archives-room actions.

use super::controller::ActionOutcome;
use super::dialog::{DialogRequest, with_confirmation};
use super::scan::ScanForm;
use super::{ArchivesRoom, CancelBehaviour};
use crate::archives::endpoint::{AssignmentKind, QueueKind};
use crate::archives::error::DeskError;
use crate::archives::models::{MergeRequestId, RequestId};
use crate::telemetry::TelemetryEvent;

impl ArchivesRoom {
    /// Assigns the selected requests of the pull or create queue to the
    /// current user.
    ///
    /// The control stays disabled while the batch is in flight and is
    /// re-enabled whatever the outcome. On success the assigned queue is
    /// reloaded and the submitted rows are hidden.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::ControlDisabled`] while a previous batch is in
    /// flight and [`DeskError::EmptySelection`] when nothing is selected;
    /// neither reaches the server. Remote failures are returned after an
    /// error notification.
    pub async fn assign_selected(
        &mut self,
        kind: AssignmentKind,
    ) -> Result<ActionOutcome, DeskError> {
        let control = *self.batch_control(kind);
        if !control.is_enabled() {
            return Err(DeskError::ControlDisabled {
                control: control.name().to_owned(),
            });
        }

        let source = kind.source();
        let request_ids = self.queue(source).selected_ids();
        if request_ids.is_empty() {
            return Err(DeskError::EmptySelection {
                queue: source.label().to_owned(),
            });
        }

        self.batch_control_mut(kind).disable();
        let result = self.gateway.assign_requests(kind, &request_ids).await;
        self.batch_control_mut(kind).enable();

        let reply = result.map_err(|error| self.report_failure(control.name(), error))?;

        tracing::info!(
            queue = source.label(),
            count = request_ids.len(),
            "requests assigned"
        );
        self.notifier
            .success(&reply.message_or("Paper record requests assigned"));
        self.telemetry.record(TelemetryEvent::RequestsAssigned {
            queue: source.label().to_owned(),
            count: request_ids.len(),
        });

        // The queue has already notified the user of a failed reload.
        if let Err(error) = self.reload_queue(kind.target()).await {
            tracing::debug!(
                queue = kind.target().label(),
                %error,
                "assigned queue reload failed after assignment"
            );
        }

        let queue = self.queue_mut(source);
        for request_id in &request_ids {
            queue.hide(request_id);
        }

        Ok(ActionOutcome::Completed)
    }

    /// Cancels one request after the user confirms.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after an error notification.
    pub async fn cancel_request(
        &mut self,
        queue: QueueKind,
        request_id: &RequestId,
    ) -> Result<ActionOutcome, DeskError> {
        let Some(record) = self.queue(queue).find_visible(request_id) else {
            tracing::debug!(queue = queue.label(), %request_id, "cancel of unknown or hidden request ignored");
            return Ok(ActionOutcome::Skipped);
        };

        let request = DialogRequest::cancel_request(request_id, Some(record.patient_name.as_str()));
        if !with_confirmation(&mut self.dialog_slot, self.dialog.as_ref(), request) {
            return Ok(ActionOutcome::Skipped);
        }

        let reply = self
            .gateway
            .mark_as_cancelled(request_id)
            .await
            .map_err(|error| self.report_failure("cancel-request", error))?;

        tracing::info!(queue = queue.label(), %request_id, "request cancelled");
        match self.settings.cancel_behaviour {
            CancelBehaviour::Hide => {
                self.queue_mut(queue).hide(request_id);
            }
            CancelBehaviour::Reload => {
                self.refresh_all_queues().await;
            }
        }
        self.notifier
            .success(&reply.message_or(&format!("Request {request_id} cancelled")));

        Ok(ActionOutcome::Completed)
    }

    /// Records that the paper records of a merge request were merged and
    /// drops the entry from the merge queue.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after an error notification; the entry is
    /// kept.
    pub async fn confirm_merge(
        &mut self,
        merge_id: &MergeRequestId,
    ) -> Result<ActionOutcome, DeskError> {
        let reply = self
            .gateway
            .mark_as_merged(merge_id)
            .await
            .map_err(|error| self.report_failure("mergeId", error))?;

        if !self.merges.remove(merge_id) {
            tracing::debug!(%merge_id, "merged entry was not in the merge queue");
        }
        tracing::info!(%merge_id, "paper records marked as merged");
        self.notifier
            .success(&reply.message_or("Paper records marked as merged"));

        Ok(ActionOutcome::Completed)
    }

    /// Prints the form label of an assigned pull request.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after an error notification.
    pub async fn print_label(
        &mut self,
        request_id: &RequestId,
    ) -> Result<ActionOutcome, DeskError> {
        let reply = self
            .gateway
            .print_label(request_id)
            .await
            .map_err(|error| self.report_failure("print-label", error))?;

        self.notifier.success(&reply.message_or("Label printed"));
        Ok(ActionOutcome::Completed)
    }

    /// Prints the label set of an assigned create request.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after an error notification.
    pub async fn print_label_set(
        &mut self,
        request_id: &RequestId,
    ) -> Result<ActionOutcome, DeskError> {
        let reply = self
            .gateway
            .print_paper_record_label_set(request_id)
            .await
            .map_err(|error| self.report_failure("print-label-set", error))?;

        self.notifier.success(&reply.message_or("Label set printed"));
        Ok(ActionOutcome::Completed)
    }

    /// Submits the identifier typed into a scan form.
    ///
    /// A blank identifier is skipped without contacting the server. Otherwise
    /// the input is cleared whatever the outcome, and a success refreshes
    /// every queue before the server's message is shown.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after an error notification.
    pub async fn submit_scan(&mut self, form: ScanForm) -> Result<ActionOutcome, DeskError> {
        let Some(identifier) = self.scan_forms.identifier(form) else {
            tracing::debug!(form = form.action_name(), "blank identifier ignored");
            return Ok(ActionOutcome::Skipped);
        };

        let result = match form {
            ScanForm::Pulled => self.gateway.mark_as_sent(&identifier).await,
            ScanForm::Returned => self.gateway.mark_as_returned(&identifier).await,
        };
        self.scan_forms.clear(form);

        let reply = result.map_err(|error| self.report_failure(form.action_name(), error))?;

        tracing::info!(form = form.action_name(), %identifier, "scan accepted");
        self.refresh_all_queues().await;
        let fallback = match form {
            ScanForm::Pulled => format!("Record {identifier} marked as pulled"),
            ScanForm::Returned => format!("Record {identifier} marked as returned"),
        };
        self.notifier.success(&reply.message_or(&fallback));

        Ok(ActionOutcome::Completed)
    }

    fn report_failure(&self, action: &str, error: DeskError) -> DeskError {
        tracing::warn!(action, %error, "desk action failed");
        self.notifier.error(&error.to_string());
        error
    }
}
