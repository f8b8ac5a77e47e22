//! In-memory gateway for tests that need scripted server state.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{ArchivesRoomGateway, PatientDashboardGateway};
use crate::archives::endpoint::{AssignmentKind, QueueKind};
use crate::archives::error::DeskError;
use crate::archives::models::{
    ActionReply, MergeRequest, MergeRequestId, RecordRequest, RequestId,
};

/// A call observed by [`FakeArchivesGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `fetch_requests` for a queue.
    FetchRequests(QueueKind),
    /// `fetch_merge_requests`.
    FetchMergeRequests,
    /// `assign_requests` with the submitted ids.
    AssignRequests {
        /// Pull or create assignment.
        kind: AssignmentKind,
        /// Submitted ids, in order.
        request_ids: Vec<RequestId>,
    },
    /// `mark_as_sent` with the scanned identifier.
    MarkAsSent(String),
    /// `mark_as_returned` with the scanned identifier.
    MarkAsReturned(String),
    /// `mark_as_cancelled`.
    MarkAsCancelled(RequestId),
    /// `mark_as_merged`.
    MarkAsMerged(MergeRequestId),
    /// `print_label`.
    PrintLabel(RequestId),
    /// `print_paper_record_label_set`.
    PrintPaperRecordLabelSet(RequestId),
    /// Any of the patient dashboard actions.
    PatientAction {
        /// Remote action name.
        action: &'static str,
        /// Patient the action targets.
        patient_id: String,
        /// Location the action targets.
        location_id: String,
    },
}

impl GatewayCall {
    /// Returns true for calls that change server state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::FetchRequests(_) | Self::FetchMergeRequests)
    }
}

#[derive(Debug, Default)]
struct FakeState {
    queues: HashMap<QueueKind, Vec<RecordRequest>>,
    merges: Vec<MergeRequest>,
    failing_queues: HashSet<QueueKind>,
    fail_merges: bool,
    action_failure: Option<DeskError>,
    reply_message: Option<String>,
    calls: Vec<GatewayCall>,
}

/// Gateway backed by in-memory queues.
///
/// Successful mutations reply with the configured message and do not change
/// the queues; tests move records between queues explicitly with
/// [`FakeArchivesGateway::set_queue`].
#[derive(Debug, Default)]
pub struct FakeArchivesGateway {
    state: Mutex<FakeState>,
}

impl FakeArchivesGateway {
    /// Creates a gateway with empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds a queue.
    #[must_use]
    pub fn with_queue(self, kind: QueueKind, records: Vec<RecordRequest>) -> Self {
        self.set_queue(kind, records);
        self
    }

    /// Seeds the merge queue.
    #[must_use]
    pub fn with_merges(self, merges: Vec<MergeRequest>) -> Self {
        self.state().merges = merges;
        self
    }

    /// Replaces a queue's server-side contents.
    pub fn set_queue(&self, kind: QueueKind, records: Vec<RecordRequest>) {
        self.state().queues.insert(kind, records);
    }

    /// Makes fetches of one queue fail with a network error.
    pub fn fail_queue(&self, kind: QueueKind) {
        self.state().failing_queues.insert(kind);
    }

    /// Makes merge fetches fail with a network error.
    pub fn fail_merges(&self) {
        self.state().fail_merges = true;
    }

    /// Makes every mutating action fail with `error`.
    pub fn fail_actions(&self, error: DeskError) {
        self.state().action_failure = Some(error);
    }

    /// Sets the message returned by successful mutating actions.
    pub fn reply_with(&self, message: impl Into<String>) {
        self.state().reply_message = Some(message.into());
    }

    /// Every call observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().calls.clone()
    }

    /// Number of calls that change server state.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.is_mutation())
            .count()
    }

    /// Number of fetches of one queue.
    #[must_use]
    pub fn fetch_count(&self, kind: QueueKind) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| **call == GatewayCall::FetchRequests(kind))
            .count()
    }

    fn mutate(&self, call: GatewayCall) -> Result<ActionReply, DeskError> {
        let mut state = self.state();
        state.calls.push(call);
        if let Some(error) = state.action_failure.clone() {
            return Err(error);
        }
        Ok(ActionReply {
            success: None,
            message: state.reply_message.clone(),
        })
    }

    fn patient_action(
        &self,
        action: &'static str,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError> {
        self.mutate(GatewayCall::PatientAction {
            action,
            patient_id: patient_id.to_owned(),
            location_id: location_id.to_owned(),
        })
    }
}

fn unreachable_server() -> DeskError {
    DeskError::Network {
        message: "connection refused".to_owned(),
    }
}

#[async_trait]
impl ArchivesRoomGateway for FakeArchivesGateway {
    async fn fetch_requests(&self, queue: QueueKind) -> Result<Vec<RecordRequest>, DeskError> {
        let mut state = self.state();
        state.calls.push(GatewayCall::FetchRequests(queue));
        if state.failing_queues.contains(&queue) {
            return Err(unreachable_server());
        }
        Ok(state.queues.get(&queue).cloned().unwrap_or_default())
    }

    async fn fetch_merge_requests(&self) -> Result<Vec<MergeRequest>, DeskError> {
        let mut state = self.state();
        state.calls.push(GatewayCall::FetchMergeRequests);
        if state.fail_merges {
            return Err(unreachable_server());
        }
        Ok(state.merges.clone())
    }

    async fn assign_requests(
        &self,
        kind: AssignmentKind,
        request_ids: &[RequestId],
    ) -> Result<ActionReply, DeskError> {
        self.mutate(GatewayCall::AssignRequests {
            kind,
            request_ids: request_ids.to_vec(),
        })
    }

    async fn mark_as_sent(&self, identifier: &str) -> Result<ActionReply, DeskError> {
        self.mutate(GatewayCall::MarkAsSent(identifier.to_owned()))
    }

    async fn mark_as_returned(&self, identifier: &str) -> Result<ActionReply, DeskError> {
        self.mutate(GatewayCall::MarkAsReturned(identifier.to_owned()))
    }

    async fn mark_as_cancelled(&self, request_id: &RequestId) -> Result<ActionReply, DeskError> {
        self.mutate(GatewayCall::MarkAsCancelled(request_id.clone()))
    }

    async fn mark_as_merged(&self, merge_id: &MergeRequestId) -> Result<ActionReply, DeskError> {
        self.mutate(GatewayCall::MarkAsMerged(merge_id.clone()))
    }

    async fn print_label(&self, request_id: &RequestId) -> Result<ActionReply, DeskError> {
        self.mutate(GatewayCall::PrintLabel(request_id.clone()))
    }

    async fn print_paper_record_label_set(
        &self,
        request_id: &RequestId,
    ) -> Result<ActionReply, DeskError> {
        self.mutate(GatewayCall::PrintPaperRecordLabelSet(request_id.clone()))
    }
}

#[async_trait]
impl PatientDashboardGateway for FakeArchivesGateway {
    async fn request_paper_record(
        &self,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError> {
        self.patient_action("requestPaperRecord", patient_id, location_id)
    }

    async fn create_dossier_number(
        &self,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError> {
        self.patient_action("createDossierNumber", patient_id, location_id)
    }

    async fn print_id_card_label(
        &self,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError> {
        self.patient_action("printIdCardLabel", patient_id, location_id)
    }

    async fn print_paper_record_label(
        &self,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError> {
        self.patient_action("printPaperRecordLabel", patient_id, location_id)
    }
}
