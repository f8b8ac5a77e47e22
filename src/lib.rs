//! Dossier library crate for the archives-room paper-record desk.
//!
//! Archivists work four request queues (records to pull, records to create,
//! and the assigned variants of both) plus a list of pending merges. The
//! library keeps a client-side view-model for each list, reconciles it with
//! the server on every reload, and drives the assign, cancel, scan, and
//! print workflows through the [`ArchivesRoom`] controller.

pub mod archives;
pub mod config;
pub mod desk;
pub mod notify;
pub mod queue;
pub mod telemetry;

pub use archives::{
    ActionReply, AssignmentKind, DeskError, HttpArchivesGateway, MergeRequest, MergeRequestId,
    QueueKind, RecordRequest, RequestId,
};
pub use config::{DossierConfig, OperationMode};
pub use desk::{
    ActionOutcome, ActionRegistry, ArchivesRoom, AutoConfirm, CancelBehaviour,
    ConfirmationDialog, DeclineAll, DeskAction, DeskSettings, PatientAction, PatientDashboard,
    PromptDialog, RefreshReport, ScanForm, run,
};
pub use notify::{ConsoleNotifier, Notification, Notifier, TracingNotifier};
pub use queue::{MergeQueue, RequestQueue, SelectionPolicy};
pub use telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink};
