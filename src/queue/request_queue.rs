//! View-model for one pull, create, or assigned request queue.

use std::collections::HashSet;

use crate::archives::endpoint::QueueKind;
use crate::archives::error::DeskError;
use crate::archives::gateway::ArchivesRoomGateway;
use crate::archives::models::{RecordRequest, RequestId};
use crate::notify::Notifier;

/// What happens to selection flags when a reload replaces the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Records whose id was selected before the reload stay selected.
    #[default]
    PreserveById,
    /// Every reloaded record starts unselected.
    Reset,
}

impl SelectionPolicy {
    /// Parses the configuration spelling (`preserve` or `reset`).
    #[must_use]
    pub fn from_config(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "preserve" => Some(Self::PreserveById),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

/// Result of replacing a queue's contents with a fresh snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapshotSummary {
    /// Number of records after the replace.
    pub record_count: usize,
    /// Records whose id was not present before.
    pub added: usize,
    /// Records present before but absent from the snapshot.
    pub removed: usize,
    /// Selections carried over by id.
    pub preserved_selections: usize,
}

/// Observable list of paper record requests for one queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestQueue {
    kind: QueueKind,
    records: Vec<RecordRequest>,
    selection_policy: SelectionPolicy,
}

impl RequestQueue {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new(kind: QueueKind, selection_policy: SelectionPolicy) -> Self {
        Self {
            kind,
            records: Vec::new(),
            selection_policy,
        }
    }

    /// Creates a queue seeded with records, using the default selection
    /// policy.
    #[must_use]
    pub fn with_records(kind: QueueKind, records: Vec<RecordRequest>) -> Self {
        Self {
            kind,
            records,
            selection_policy: SelectionPolicy::default(),
        }
    }

    /// Queue this view-model displays.
    #[must_use]
    pub const fn kind(&self) -> QueueKind {
        self.kind
    }

    /// Selection policy applied on reload.
    #[must_use]
    pub const fn selection_policy(&self) -> SelectionPolicy {
        self.selection_policy
    }

    /// All records in server order, hidden ones included.
    #[must_use]
    pub fn records(&self) -> &[RecordRequest] {
        &self.records
    }

    /// Number of records, hidden ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the queue holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn find(&self, request_id: &RequestId) -> Option<&RecordRequest> {
        self.records
            .iter()
            .find(|record| &record.request_id == request_id)
    }

    /// Looks up a record that is still shown. Hidden rows are not
    /// actionable until the next reload brings them back.
    #[must_use]
    pub fn find_visible(&self, request_id: &RequestId) -> Option<&RecordRequest> {
        self.find(request_id).filter(|record| record.visible)
    }

    fn find_mut(&mut self, request_id: &RequestId) -> Option<&mut RecordRequest> {
        self.records
            .iter_mut()
            .find(|record| &record.request_id == request_id)
    }

    fn find_visible_mut(&mut self, request_id: &RequestId) -> Option<&mut RecordRequest> {
        self.find_mut(request_id).filter(|record| record.visible)
    }

    /// Flips the selection flag of a record and clears its hover flag, as a
    /// click on a hovered row does.
    ///
    /// Returns `false` when no shown record has the id.
    pub fn toggle_selection(&mut self, request_id: &RequestId) -> bool {
        let Some(record) = self.find_visible_mut(request_id) else {
            return false;
        };
        record.hovered = false;
        record.selected = !record.selected;
        true
    }

    /// Marks a record as hovered.
    ///
    /// Returns `false` when no shown record has the id.
    pub fn hover(&mut self, request_id: &RequestId) -> bool {
        self.set_hovered(request_id, true)
    }

    /// Clears a record's hover flag.
    ///
    /// Returns `false` when no shown record has the id.
    pub fn unhover(&mut self, request_id: &RequestId) -> bool {
        self.set_hovered(request_id, false)
    }

    fn set_hovered(&mut self, request_id: &RequestId, hovered: bool) -> bool {
        let Some(record) = self.find_visible_mut(request_id) else {
            return false;
        };
        record.hovered = hovered;
        true
    }

    /// Records currently selected, in list order.
    #[must_use]
    pub fn selected_requests(&self) -> Vec<&RecordRequest> {
        self.records.iter().filter(|record| record.selected).collect()
    }

    /// Ids of the selected records, in list order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<RequestId> {
        self.records
            .iter()
            .filter(|record| record.selected)
            .map(|record| record.request_id.clone())
            .collect()
    }

    /// Records currently hovered, in list order.
    #[must_use]
    pub fn hovered_requests(&self) -> Vec<&RecordRequest> {
        self.records.iter().filter(|record| record.hovered).collect()
    }

    /// Returns true when at least one record is selected, which enables the
    /// batch controls.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.records.iter().any(|record| record.selected)
    }

    /// Hides a record until the next reload. Hidden records are also
    /// deselected so they cannot ride along in a later batch.
    ///
    /// Returns `false` when no record has the id.
    pub fn hide(&mut self, request_id: &RequestId) -> bool {
        let Some(record) = self.find_mut(request_id) else {
            return false;
        };
        record.visible = false;
        record.selected = false;
        record.hovered = false;
        true
    }

    /// Records that are still shown.
    pub fn visible_records(&self) -> impl Iterator<Item = &RecordRequest> {
        self.records.iter().filter(|record| record.visible)
    }

    /// Visible records ordered by creation time; records without a usable
    /// timestamp keep their server order after the dated ones.
    #[must_use]
    pub fn records_by_time_requested(&self) -> Vec<&RecordRequest> {
        let mut ordered: Vec<&RecordRequest> = self.visible_records().collect();
        ordered.sort_by_key(|record| (record.sort_key().is_none(), record.sort_key()));
        ordered
    }

    /// Replaces the whole list with a fresh snapshot.
    ///
    /// Under [`SelectionPolicy::PreserveById`] records whose id was selected
    /// before the replace come back selected; every other flag starts at its
    /// default.
    pub fn apply_snapshot(&mut self, incoming: Vec<RecordRequest>) -> SnapshotSummary {
        let existing_ids: HashSet<RequestId> = self
            .records
            .iter()
            .map(|record| record.request_id.clone())
            .collect();
        let selected_ids: HashSet<RequestId> = match self.selection_policy {
            SelectionPolicy::PreserveById => self.selected_ids().into_iter().collect(),
            SelectionPolicy::Reset => HashSet::new(),
        };

        let mut fresh = incoming;
        let mut preserved_selections = 0;
        for record in &mut fresh {
            record.selected = selected_ids.contains(&record.request_id);
            record.hovered = false;
            record.visible = true;
            if record.selected {
                preserved_selections += 1;
            }
        }

        let incoming_ids: HashSet<&RequestId> =
            fresh.iter().map(|record| &record.request_id).collect();
        let added = incoming_ids
            .iter()
            .filter(|id| !existing_ids.contains(**id))
            .count();
        let removed = existing_ids
            .iter()
            .filter(|id| !incoming_ids.contains(id))
            .count();

        self.records = fresh;

        SnapshotSummary {
            record_count: self.records.len(),
            added,
            removed,
            preserved_selections,
        }
    }

    /// Reloads the queue from the server.
    ///
    /// On failure the current list is kept and exactly one error
    /// notification is emitted before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the gateway error unchanged.
    pub async fn load(
        &mut self,
        gateway: &dyn ArchivesRoomGateway,
        notifier: &dyn Notifier,
    ) -> Result<SnapshotSummary, DeskError> {
        match gateway.fetch_requests(self.kind).await {
            Ok(records) => {
                let summary = self.apply_snapshot(records);
                tracing::debug!(
                    queue = self.kind.label(),
                    records = summary.record_count,
                    added = summary.added,
                    removed = summary.removed,
                    "queue reloaded"
                );
                Ok(summary)
            }
            Err(error) => {
                tracing::warn!(queue = self.kind.label(), %error, "queue reload failed");
                notifier.error(&error.to_string());
                Err(error)
            }
        }
    }
}

#[cfg(test)]
#[path = "request_queue_tests.rs"]
mod tests;
