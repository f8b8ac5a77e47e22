//! `reqwest` implementation of the fragment action gateways.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::error_mapping::{map_decode_error, map_http_error, map_transport_error};
use super::http_utils::extract_failure_message;
use super::{ArchivesRoomGateway, PatientDashboardGateway};
use crate::archives::endpoint::{AssignmentKind, FragmentAction, QueueKind, ServerUrl};
use crate::archives::error::DeskError;
use crate::archives::models::{
    ActionReply, ApiMergeRequest, ApiRecordRequest, MergeRequest, MergeRequestId, RecordRequest,
    RequestId,
};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP basic credentials attached to every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings for [`HttpArchivesGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpGatewaySettings {
    /// Root of the web application hosting the fragment actions.
    pub server: ServerUrl,
    /// Optional basic-auth credentials.
    pub credentials: Option<Credentials>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpGatewaySettings {
    /// Creates settings with no credentials and the default timeout.
    #[must_use]
    pub const fn new(server: ServerUrl) -> Self {
        Self {
            server,
            credentials: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Gateway that calls the fragment actions over HTTP.
#[derive(Debug, Clone)]
pub struct HttpArchivesGateway {
    client: Client,
    server: ServerUrl,
    credentials: Option<Credentials>,
}

impl HttpArchivesGateway {
    /// Builds a gateway from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Configuration`] when the HTTP client cannot be
    /// constructed.
    pub fn new(settings: HttpGatewaySettings) -> Result<Self, DeskError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|error| DeskError::Configuration {
                message: format!("failed to configure HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            server: settings.server,
            credentials: settings.credentials,
        })
    }

    fn authorise(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(credentials) => {
                builder.basic_auth(&credentials.username, Some(&credentials.password))
            }
            None => builder,
        }
    }

    async fn send(&self, action: FragmentAction, builder: RequestBuilder) -> Result<String, DeskError> {
        let operation = action.name();
        tracing::debug!(action = operation, "calling fragment action");

        let response = self
            .authorise(builder)
            .send()
            .await
            .map_err(|error| map_transport_error(operation, &error))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| map_transport_error(operation, &error))?;

        if !status.is_success() {
            tracing::warn!(action = operation, %status, "fragment action failed");
            return Err(map_http_error(
                operation,
                status,
                extract_failure_message(&body),
            ));
        }

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, action: FragmentAction) -> Result<T, DeskError> {
        let url = self.server.action_url(action)?;
        let body = self.send(action, self.client.get(url)).await?;
        serde_json::from_str(&body).map_err(|error| map_decode_error(action.name(), &error))
    }

    async fn post_action(
        &self,
        action: FragmentAction,
        params: &[(&str, String)],
    ) -> Result<ActionReply, DeskError> {
        let url = self.server.action_url(action)?;
        let body = self
            .send(action, self.client.post(url).form(params))
            .await?;

        let reply = if body.trim().is_empty() {
            ActionReply::default()
        } else {
            serde_json::from_str::<ActionReply>(&body)
                .map_err(|error| map_decode_error(action.name(), &error))?
        };

        if reply.success == Some(false) {
            return Err(DeskError::ActionRejected {
                message: reply.message_or(&format!("{} was not successful", action.name())),
            });
        }

        Ok(reply)
    }

    async fn post_patient_action(
        &self,
        action: FragmentAction,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError> {
        self.post_action(
            action,
            &[
                ("patientId", patient_id.to_owned()),
                ("locationId", location_id.to_owned()),
            ],
        )
        .await
    }
}

#[async_trait]
impl ArchivesRoomGateway for HttpArchivesGateway {
    async fn fetch_requests(&self, queue: QueueKind) -> Result<Vec<RecordRequest>, DeskError> {
        let records: Vec<ApiRecordRequest> = self.get_json(queue.fetch_action()).await?;
        Ok(records.into_iter().map(RecordRequest::from).collect())
    }

    async fn fetch_merge_requests(&self) -> Result<Vec<MergeRequest>, DeskError> {
        let merges: Vec<ApiMergeRequest> =
            self.get_json(FragmentAction::GetOpenRecordsToMerge).await?;
        Ok(merges.into_iter().map(MergeRequest::from).collect())
    }

    async fn assign_requests(
        &self,
        kind: AssignmentKind,
        request_ids: &[RequestId],
    ) -> Result<ActionReply, DeskError> {
        let params: Vec<(&str, String)> = request_ids
            .iter()
            .map(|id| ("requestId[]", id.as_str().to_owned()))
            .collect();
        self.post_action(kind.action(), &params).await
    }

    async fn mark_as_sent(&self, identifier: &str) -> Result<ActionReply, DeskError> {
        self.post_action(
            FragmentAction::MarkPaperRecordRequestAsSent,
            &[("identifier", identifier.to_owned())],
        )
        .await
    }

    async fn mark_as_returned(&self, identifier: &str) -> Result<ActionReply, DeskError> {
        self.post_action(
            FragmentAction::MarkPaperRecordRequestAsReturned,
            &[("identifier", identifier.to_owned())],
        )
        .await
    }

    async fn mark_as_cancelled(&self, request_id: &RequestId) -> Result<ActionReply, DeskError> {
        self.post_action(
            FragmentAction::MarkPaperRecordRequestAsCancelled,
            &[("requestId", request_id.as_str().to_owned())],
        )
        .await
    }

    async fn mark_as_merged(&self, merge_id: &MergeRequestId) -> Result<ActionReply, DeskError> {
        self.post_action(
            FragmentAction::MarkPaperRecordsAsMerged,
            &[("mergeId", merge_id.as_str().to_owned())],
        )
        .await
    }

    async fn print_label(&self, request_id: &RequestId) -> Result<ActionReply, DeskError> {
        self.post_action(
            FragmentAction::PrintLabel,
            &[("requestId", request_id.as_str().to_owned())],
        )
        .await
    }

    async fn print_paper_record_label_set(
        &self,
        request_id: &RequestId,
    ) -> Result<ActionReply, DeskError> {
        self.post_action(
            FragmentAction::PrintPaperRecordLabelSet,
            &[("requestId", request_id.as_str().to_owned())],
        )
        .await
    }
}

#[async_trait]
impl PatientDashboardGateway for HttpArchivesGateway {
    async fn request_paper_record(
        &self,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError> {
        self.post_patient_action(FragmentAction::RequestPaperRecord, patient_id, location_id)
            .await
    }

    async fn create_dossier_number(
        &self,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError> {
        self.post_patient_action(FragmentAction::CreateDossierNumber, patient_id, location_id)
            .await
    }

    async fn print_id_card_label(
        &self,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError> {
        self.post_patient_action(FragmentAction::PrintIdCardLabel, patient_id, location_id)
            .await
    }

    async fn print_paper_record_label(
        &self,
        patient_id: &str,
        location_id: &str,
    ) -> Result<ActionReply, DeskError> {
        self.post_patient_action(FragmentAction::PrintPaperRecordLabel, patient_id, location_id)
            .await
    }
}
