//! Client layer for the archives-room fragment actions.
//!
//! The server exposes one JSON endpoint per queue and one form-encoded action
//! per mutation. This module parses those replies into typed models, maps
//! transport and HTTP failures into [`DeskError`], and hides the wire details
//! behind the [`ArchivesRoomGateway`] and [`PatientDashboardGateway`] traits.

pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod models;

pub use endpoint::{AssignmentKind, FragmentAction, QueueKind, ServerUrl};
pub use error::DeskError;
pub use gateway::{
    ArchivesRoomGateway, Credentials, HttpArchivesGateway, HttpGatewaySettings,
    PatientDashboardGateway,
};
pub use models::{ActionReply, MergeRequest, MergeRequestId, RecordRequest, RequestId};

#[cfg(test)]
pub use gateway::{MockArchivesRoomGateway, MockPatientDashboardGateway};
