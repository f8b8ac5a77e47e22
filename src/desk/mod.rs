//! The archives-room desk: queues, controls, and the handlers that tie them
//! to the server.
//!
//! [`ArchivesRoom`] is the composition root. It owns the four request queues,
//! the merge queue, the scan forms, and the two batch-assign controls, and it
//! holds the gateway, notifier, telemetry sink, and confirmation dialog every
//! handler needs. Handlers take `&mut self` and run to completion, so state is
//! only ever touched by one handler at a time.

mod controller;
mod dashboard;
pub mod dialog;
mod refresh_handlers;
mod request_handlers;
mod runner;
pub mod scan;

use std::sync::Arc;
use std::time::Duration;

pub use controller::{ActionBuilder, ActionOutcome, ActionRegistry, BatchControl, DeskAction};
pub use dashboard::{PatientAction, PatientDashboard};
pub use dialog::{
    AutoConfirm, ConfirmationDialog, DeclineAll, DialogChoice, DialogRequest, DialogSlot,
    PromptDialog, with_confirmation,
};
pub use refresh_handlers::RefreshReport;
pub use runner::run;
pub use scan::{ScanForm, ScanForms};

use crate::archives::endpoint::{AssignmentKind, QueueKind};
use crate::archives::gateway::ArchivesRoomGateway;
use crate::notify::Notifier;
use crate::queue::{MergeQueue, RequestQueue, SelectionPolicy};
use crate::telemetry::{NoopTelemetrySink, TelemetrySink};

/// Default period between automatic refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// What happens to a row after its request is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelBehaviour {
    /// Hide the row until the next refresh.
    #[default]
    Hide,
    /// Refresh every queue straight away.
    Reload,
}

impl CancelBehaviour {
    /// Parses the configuration spelling (`hide` or `reload`).
    #[must_use]
    pub fn from_config(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hide" => Some(Self::Hide),
            "reload" => Some(Self::Reload),
            _ => None,
        }
    }
}

/// Behavioural settings of the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeskSettings {
    /// Applied by every request queue on reload.
    pub selection_policy: SelectionPolicy,
    /// Applied after a successful cancellation.
    pub cancel_behaviour: CancelBehaviour,
    /// Period of the automatic refresh.
    pub poll_interval: Duration,
}

impl Default for DeskSettings {
    fn default() -> Self {
        Self {
            selection_policy: SelectionPolicy::default(),
            cancel_behaviour: CancelBehaviour::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Composition root of the archives-room view.
pub struct ArchivesRoom {
    gateway: Arc<dyn ArchivesRoomGateway>,
    notifier: Arc<dyn Notifier>,
    telemetry: Arc<dyn TelemetrySink>,
    dialog: Arc<dyn ConfirmationDialog>,
    settings: DeskSettings,
    pull: RequestQueue,
    create: RequestQueue,
    assigned_pull: RequestQueue,
    assigned_create: RequestQueue,
    merges: MergeQueue,
    dialog_slot: DialogSlot,
    scan_forms: ScanForms,
    assign_to_pull: BatchControl,
    assign_to_create: BatchControl,
}

impl ArchivesRoom {
    /// Creates a desk with empty queues, no telemetry, and a dialog that
    /// declines everything.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn ArchivesRoomGateway>,
        notifier: Arc<dyn Notifier>,
        settings: DeskSettings,
    ) -> Self {
        let policy = settings.selection_policy;
        Self {
            gateway,
            notifier,
            telemetry: Arc::new(NoopTelemetrySink),
            dialog: Arc::new(DeclineAll),
            settings,
            pull: RequestQueue::new(QueueKind::Pull, policy),
            create: RequestQueue::new(QueueKind::Create, policy),
            assigned_pull: RequestQueue::new(QueueKind::AssignedPull, policy),
            assigned_create: RequestQueue::new(QueueKind::AssignedCreate, policy),
            merges: MergeQueue::default(),
            dialog_slot: DialogSlot::default(),
            scan_forms: ScanForms::default(),
            assign_to_pull: BatchControl::new(AssignmentKind::Pull.control_name()),
            assign_to_create: BatchControl::new(AssignmentKind::Create.control_name()),
        }
    }

    /// Replaces the telemetry sink.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Replaces the confirmation dialog.
    #[must_use]
    pub fn with_dialog(mut self, dialog: Arc<dyn ConfirmationDialog>) -> Self {
        self.dialog = dialog;
        self
    }

    /// Settings the desk was built with.
    #[must_use]
    pub const fn settings(&self) -> &DeskSettings {
        &self.settings
    }

    /// One request queue.
    #[must_use]
    pub const fn queue(&self, kind: QueueKind) -> &RequestQueue {
        match kind {
            QueueKind::Pull => &self.pull,
            QueueKind::Create => &self.create,
            QueueKind::AssignedPull => &self.assigned_pull,
            QueueKind::AssignedCreate => &self.assigned_create,
        }
    }

    /// One request queue, for row gestures.
    pub const fn queue_mut(&mut self, kind: QueueKind) -> &mut RequestQueue {
        match kind {
            QueueKind::Pull => &mut self.pull,
            QueueKind::Create => &mut self.create,
            QueueKind::AssignedPull => &mut self.assigned_pull,
            QueueKind::AssignedCreate => &mut self.assigned_create,
        }
    }

    /// The merge queue.
    #[must_use]
    pub const fn merge_queue(&self) -> &MergeQueue {
        &self.merges
    }

    /// Scan form state.
    #[must_use]
    pub const fn scan_forms(&self) -> &ScanForms {
        &self.scan_forms
    }

    /// Scan form state, for typing and tab switches.
    pub const fn scan_forms_mut(&mut self) -> &mut ScanForms {
        &mut self.scan_forms
    }

    /// The control that submits one kind of assignment.
    #[must_use]
    pub const fn batch_control(&self, kind: AssignmentKind) -> &BatchControl {
        match kind {
            AssignmentKind::Pull => &self.assign_to_pull,
            AssignmentKind::Create => &self.assign_to_create,
        }
    }

    /// Mutable access to a batch control.
    pub const fn batch_control_mut(&mut self, kind: AssignmentKind) -> &mut BatchControl {
        match kind {
            AssignmentKind::Pull => &mut self.assign_to_pull,
            AssignmentKind::Create => &mut self.assign_to_create,
        }
    }

    /// Dialog currently on screen.
    #[must_use]
    pub const fn open_dialog(&self) -> Option<&DialogRequest> {
        self.dialog_slot.current()
    }
}
