//! Gateways for the archives-room and patient-dashboard fragment actions.
//!
//! The traits describe the remote contract; [`HttpArchivesGateway`] is the
//! `reqwest` implementation used at runtime. Tests substitute mocks or the
//! fakes in `test_support`.

mod client;
mod error_mapping;
mod http_utils;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use client::{Credentials, HttpArchivesGateway, HttpGatewaySettings};

use async_trait::async_trait;

use super::endpoint::{AssignmentKind, QueueKind};
use super::error::DeskError;
use super::models::{ActionReply, MergeRequest, MergeRequestId, RecordRequest, RequestId};

/// Gateway for the archives-room queues and their mutating actions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArchivesRoomGateway: Send + Sync {
    /// Fetch the current contents of one request queue.
    async fn fetch_requests(&self, queue: QueueKind) -> Result<Vec<RecordRequest>, DeskError>;

    /// Fetch the pending merge requests.
    async fn fetch_merge_requests(&self) -> Result<Vec<MergeRequest>, DeskError>;

    /// Assign a batch of requests to the current user.
    async fn assign_requests(
        &self,
        kind: AssignmentKind,
        request_ids: &[RequestId],
    ) -> Result<ActionReply, DeskError>;

    /// Mark the pending request for a scanned identifier as sent.
    async fn mark_as_sent(&self, identifier: &str) -> Result<ActionReply, DeskError>;

    /// Mark sent requests for a scanned identifier as returned.
    async fn mark_as_returned(&self, identifier: &str) -> Result<ActionReply, DeskError>;

    /// Cancel one request.
    async fn mark_as_cancelled(&self, request_id: &RequestId) -> Result<ActionReply, DeskError>;

    /// Record that two paper records were physically merged.
    async fn mark_as_merged(&self, merge_id: &MergeRequestId) -> Result<ActionReply, DeskError>;

    /// Print a form label for an assigned pull request.
    async fn print_label(&self, request_id: &RequestId) -> Result<ActionReply, DeskError>;

    /// Print the label set for an assigned create request.
    async fn print_paper_record_label_set(
        &self,
        request_id: &RequestId,
    ) -> Result<ActionReply, DeskError>;
}

/// Gateway for the per-patient actions offered on the patient dashboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientDashboardGateway: Send + Sync {
    /// Request the patient's paper record be sent to a location.
    async fn request_paper_record(
        &self,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError>;

    /// Create a dossier number for a patient without one.
    async fn create_dossier_number(
        &self,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError>;

    /// Print an ID card label at the location's label printer.
    async fn print_id_card_label(
        &self,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError>;

    /// Print a paper record label at the location's label printer.
    async fn print_paper_record_label(
        &self,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError>;
}

#[cfg(test)]
mod tests;
