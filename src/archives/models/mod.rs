//! Data models for paper record requests and merge requests.
//!
//! Types prefixed with `Api` are internal deserialisation targets mirroring
//! the server's JSON; they convert into the public domain types that the
//! queue view-models own. View flags (`selected`, `hovered`, `visible`) live
//! on the domain type and always start at their defaults when a record is
//! built from the wire.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Opaque identifier of a paper record request.
///
/// The server emits numeric ids, but the client never does arithmetic on
/// them, so both JSON numbers and strings are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(String);

impl RequestId {
    /// Creates an identifier from any displayable value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as sent over the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        OpaqueId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
    }
}

/// Opaque identifier of a merge request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MergeRequestId(String);

impl MergeRequestId {
    /// Creates an identifier from any displayable value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as sent over the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MergeRequestId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MergeRequestId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        OpaqueId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OpaqueId {
    Number(i64),
    Text(String),
}

impl OpaqueId {
    fn into_string(self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value,
        }
    }
}

/// Machine-sortable timestamp accompanying a display date.
///
/// The server serialises dates either as epoch milliseconds or as ISO 8601
/// text depending on its JSON configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SortableTimestamp {
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    /// ISO 8601 / RFC 3339 text.
    Text(String),
}

impl SortableTimestamp {
    /// Converts the timestamp to UTC, returning `None` when it cannot be
    /// interpreted.
    #[must_use]
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(millis) => DateTime::from_timestamp_millis(*millis),
            Self::Text(text) => DateTime::parse_from_rfc3339(text)
                .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z"))
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
        }
    }
}

/// A pull or create request for a paper record, as displayed in a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRequest {
    /// Request identifier, unique within one queue snapshot.
    pub request_id: RequestId,
    /// Formatted patient name.
    pub patient_name: String,
    /// Primary patient identifier, when the server includes it.
    pub patient_id: Option<String>,
    /// Identifier of the paper folder (dossier number).
    pub dossier_number: String,
    /// Location the record should be sent to.
    pub send_to_location: String,
    /// Display form of the time the request was created.
    pub time_requested: String,
    /// Sortable form of the time the request was created.
    pub time_requested_sortable: Option<SortableTimestamp>,
    /// Location the record was last sent to (pull-type records only).
    pub location_last_sent: Option<String>,
    /// Display date the record was last sent (pull-type records only).
    pub date_last_sent: Option<String>,
    /// Whether the clerk has selected this record for a batch action.
    pub selected: bool,
    /// Whether the pointer is over this record.
    pub hovered: bool,
    /// Whether the record is still shown; cleared after assignment or
    /// cancellation until the next reload.
    pub visible: bool,
}

impl RecordRequest {
    /// Builds a record with default view flags.
    #[must_use]
    pub fn new(
        request_id: RequestId,
        patient_name: impl Into<String>,
        dossier_number: impl Into<String>,
        send_to_location: impl Into<String>,
        time_requested: impl Into<String>,
    ) -> Self {
        Self {
            request_id,
            patient_name: patient_name.into(),
            patient_id: None,
            dossier_number: dossier_number.into(),
            send_to_location: send_to_location.into(),
            time_requested: time_requested.into(),
            time_requested_sortable: None,
            location_last_sent: None,
            date_last_sent: None,
            selected: false,
            hovered: false,
            visible: true,
        }
    }

    /// Returns the sortable creation time, when it can be interpreted.
    #[must_use]
    pub fn sort_key(&self) -> Option<DateTime<Utc>> {
        self.time_requested_sortable
            .as_ref()
            .and_then(SortableTimestamp::to_utc)
    }
}

/// A pending consolidation of two duplicate patient records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Merge request identifier.
    pub merge_request_id: MergeRequestId,
    /// Name on the surviving record.
    pub preferred_name: String,
    /// Dossier number of the surviving record.
    pub preferred_identifier: String,
    /// Name on the record merged away.
    pub not_preferred_name: String,
    /// Dossier number of the record merged away.
    pub not_preferred_identifier: String,
    /// Display form of the creation date.
    pub date_created: String,
    /// Sortable form of the creation date.
    pub date_created_sortable: Option<SortableTimestamp>,
}

/// Reply body of a mutating fragment action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActionReply {
    /// Explicit success flag; absent on most archives-room actions.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub success: Option<bool>,
    /// Human-readable outcome message.
    #[serde(default)]
    pub message: Option<String>,
}

impl ActionReply {
    /// Returns the message or the supplied fallback.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback.to_owned())
    }
}

/// Accepts `true`, `"true"`, `false`, `"false"`, or null.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(flag)) => Some(flag),
        Some(serde_json::Value::String(text)) => text.parse::<bool>().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiRecordRequest {
    pub(crate) request_id: RequestId,
    #[serde(default)]
    pub(crate) patient: Option<String>,
    #[serde(default)]
    pub(crate) patient_identifier: Option<String>,
    #[serde(default)]
    pub(crate) identifier: Option<String>,
    #[serde(default)]
    pub(crate) request_location: Option<String>,
    #[serde(default)]
    pub(crate) date_created: Option<String>,
    #[serde(default)]
    pub(crate) date_created_sortable: Option<SortableTimestamp>,
    #[serde(default)]
    pub(crate) date_last_sent: Option<String>,
    #[serde(default)]
    pub(crate) location_last_sent: Option<String>,
}

impl From<ApiRecordRequest> for RecordRequest {
    fn from(api: ApiRecordRequest) -> Self {
        Self {
            request_id: api.request_id,
            patient_name: api.patient.unwrap_or_default(),
            patient_id: api.patient_identifier,
            dossier_number: api.identifier.unwrap_or_default(),
            send_to_location: api.request_location.unwrap_or_default(),
            time_requested: api.date_created.unwrap_or_default(),
            time_requested_sortable: api.date_created_sortable,
            location_last_sent: api.location_last_sent,
            date_last_sent: api.date_last_sent,
            selected: false,
            hovered: false,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiMergeRequest {
    pub(crate) merge_request_id: MergeRequestId,
    #[serde(default)]
    pub(crate) preferred_name: Option<String>,
    #[serde(default)]
    pub(crate) preferred_identifier: Option<String>,
    #[serde(default)]
    pub(crate) not_preferred_name: Option<String>,
    #[serde(default)]
    pub(crate) not_preferred_identifier: Option<String>,
    #[serde(default)]
    pub(crate) date_created: Option<String>,
    #[serde(default)]
    pub(crate) date_created_sortable: Option<SortableTimestamp>,
}

impl From<ApiMergeRequest> for MergeRequest {
    fn from(api: ApiMergeRequest) -> Self {
        Self {
            merge_request_id: api.merge_request_id,
            preferred_name: api.preferred_name.unwrap_or_default(),
            preferred_identifier: api.preferred_identifier.unwrap_or_default(),
            not_preferred_name: api.not_preferred_name.unwrap_or_default(),
            not_preferred_identifier: api.not_preferred_identifier.unwrap_or_default(),
            date_created: api.date_created.unwrap_or_default(),
            date_created_sortable: api.date_created_sortable,
        }
    }
}
