//! View-model for the pending merge requests.

use crate::archives::error::DeskError;
use crate::archives::gateway::ArchivesRoomGateway;
use crate::archives::models::{MergeRequest, MergeRequestId};
use crate::notify::Notifier;

/// Observable list of merge requests. Has no selection semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeQueue {
    requests: Vec<MergeRequest>,
}

impl MergeQueue {
    /// Creates a queue seeded with merge requests.
    #[must_use]
    pub const fn with_requests(requests: Vec<MergeRequest>) -> Self {
        Self { requests }
    }

    /// Merge requests in server order.
    #[must_use]
    pub fn requests(&self) -> &[MergeRequest] {
        &self.requests
    }

    /// Number of pending merge requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns true when nothing is waiting to be merged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Replaces the whole list.
    pub fn apply_snapshot(&mut self, incoming: Vec<MergeRequest>) {
        self.requests = incoming;
    }

    /// Drops the entry for a merge that was just confirmed, without asking
    /// the server.
    ///
    /// Returns `false` when no entry has the id.
    pub fn remove(&mut self, merge_id: &MergeRequestId) -> bool {
        let before = self.requests.len();
        self.requests
            .retain(|request| &request.merge_request_id != merge_id);
        self.requests.len() != before
    }

    /// Reloads the merge requests from the server.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after emitting one error notification; the
    /// current list is kept.
    pub async fn load(
        &mut self,
        gateway: &dyn ArchivesRoomGateway,
        notifier: &dyn Notifier,
    ) -> Result<usize, DeskError> {
        match gateway.fetch_merge_requests().await {
            Ok(requests) => {
                self.apply_snapshot(requests);
                Ok(self.requests.len())
            }
            Err(error) => {
                tracing::warn!(%error, "merge queue reload failed");
                notifier.error(&error.to_string());
                Err(error)
            }
        }
    }
}
