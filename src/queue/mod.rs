//! Queue view-models for the archives room.
//!
//! Each view-model exclusively owns one list of records and reconciles it
//! against the server with a full-replace `load()`. Derived views such as
//! [`RequestQueue::selected_requests`] are computed from the current list on
//! every call, so they can never drift from the flags they summarise.

mod merge_queue;
mod request_queue;

pub use merge_queue::MergeQueue;
pub use request_queue::{RequestQueue, SelectionPolicy, SnapshotSummary};
