//! Fragment action names and URL construction.
//!
//! Every remote call addresses a fragment action of the form
//! `{server}/{provider}/{fragment}/{action}.action`.

use std::fmt;

use url::Url;

use super::error::DeskError;

const PROVIDER: &str = "paperrecord";
const ARCHIVES_ROOM: &str = "archivesRoom";
const REQUEST_PAPER_RECORD: &str = "requestPaperRecord";

/// The four request queues shown in the archives room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    /// Open requests to pull an existing record.
    Pull,
    /// Open requests to create a new record.
    Create,
    /// Pull requests assigned to archive staff.
    AssignedPull,
    /// Create requests assigned to archive staff.
    AssignedCreate,
}

impl QueueKind {
    /// Every request queue, in refresh order.
    pub const ALL: [Self; 4] = [
        Self::Pull,
        Self::Create,
        Self::AssignedCreate,
        Self::AssignedPull,
    ];

    /// Returns the action that lists this queue.
    #[must_use]
    pub const fn fetch_action(self) -> FragmentAction {
        match self {
            Self::Pull => FragmentAction::GetOpenRecordsToPull,
            Self::Create => FragmentAction::GetOpenRecordsToCreate,
            Self::AssignedPull => FragmentAction::GetAssignedRecordsToPull,
            Self::AssignedCreate => FragmentAction::GetAssignedRecordsToCreate,
        }
    }

    /// Returns the short label used in messages and command lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pull => "pull",
            Self::Create => "create",
            Self::AssignedPull => "assigned-pull",
            Self::AssignedCreate => "assigned-create",
        }
    }

    /// Parses a label produced by [`QueueKind::label`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "pull" => Some(Self::Pull),
            "create" => Some(Self::Create),
            "assigned-pull" => Some(Self::AssignedPull),
            "assigned-create" => Some(Self::AssignedCreate),
            _ => None,
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Batch assignment from an open queue into its assigned counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentKind {
    /// Assign open pull requests.
    Pull,
    /// Assign open create requests.
    Create,
}

impl AssignmentKind {
    /// Queue the selection is taken from.
    #[must_use]
    pub const fn source(self) -> QueueKind {
        match self {
            Self::Pull => QueueKind::Pull,
            Self::Create => QueueKind::Create,
        }
    }

    /// Queue that receives the assigned requests.
    #[must_use]
    pub const fn target(self) -> QueueKind {
        match self {
            Self::Pull => QueueKind::AssignedPull,
            Self::Create => QueueKind::AssignedCreate,
        }
    }

    /// Action that performs the assignment.
    #[must_use]
    pub const fn action(self) -> FragmentAction {
        match self {
            Self::Pull => FragmentAction::AssignPullRequests,
            Self::Create => FragmentAction::AssignCreateRequests,
        }
    }

    /// Name of the control that triggers this assignment.
    #[must_use]
    pub const fn control_name(self) -> &'static str {
        match self {
            Self::Pull => "assign-to-pull-button",
            Self::Create => "assign-to-create-button",
        }
    }
}

/// Remote fragment actions used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentAction {
    /// Lists open pull requests.
    GetOpenRecordsToPull,
    /// Lists open create requests.
    GetOpenRecordsToCreate,
    /// Lists assigned pull requests.
    GetAssignedRecordsToPull,
    /// Lists assigned create requests.
    GetAssignedRecordsToCreate,
    /// Lists pending merge requests.
    GetOpenRecordsToMerge,
    /// Assigns pull requests to the current user.
    AssignPullRequests,
    /// Assigns create requests to the current user.
    AssignCreateRequests,
    /// Marks the request for a scanned identifier as sent.
    MarkPaperRecordRequestAsSent,
    /// Marks sent requests for a scanned identifier as returned.
    MarkPaperRecordRequestAsReturned,
    /// Cancels one request.
    MarkPaperRecordRequestAsCancelled,
    /// Marks a merge request as physically merged.
    MarkPaperRecordsAsMerged,
    /// Prints a form label for an assigned pull request.
    PrintLabel,
    /// Prints the full label set for an assigned create request.
    PrintPaperRecordLabelSet,
    /// Requests a patient's paper record from the dashboard.
    RequestPaperRecord,
    /// Creates a dossier number for a patient.
    CreateDossierNumber,
    /// Prints a patient ID card label.
    PrintIdCardLabel,
    /// Prints a paper record label for a patient.
    PrintPaperRecordLabel,
}

impl FragmentAction {
    /// Returns the fragment hosting this action.
    #[must_use]
    pub const fn fragment(self) -> &'static str {
        match self {
            Self::RequestPaperRecord
            | Self::CreateDossierNumber
            | Self::PrintIdCardLabel
            | Self::PrintPaperRecordLabel => REQUEST_PAPER_RECORD,
            _ => ARCHIVES_ROOM,
        }
    }

    /// Returns the action name as the server knows it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetOpenRecordsToPull => "getOpenRecordsToPull",
            Self::GetOpenRecordsToCreate => "getOpenRecordsToCreate",
            Self::GetAssignedRecordsToPull => "getAssignedRecordsToPull",
            Self::GetAssignedRecordsToCreate => "getAssignedRecordsToCreate",
            Self::GetOpenRecordsToMerge => "getOpenRecordsToMerge",
            Self::AssignPullRequests => "assignPullRequests",
            Self::AssignCreateRequests => "assignCreateRequests",
            Self::MarkPaperRecordRequestAsSent => "markPaperRecordRequestAsSent",
            Self::MarkPaperRecordRequestAsReturned => "markPaperRecordRequestAsReturned",
            Self::MarkPaperRecordRequestAsCancelled => "markPaperRecordRequestAsCancelled",
            Self::MarkPaperRecordsAsMerged => "markPaperRecordsAsMerged",
            Self::PrintLabel => "printLabel",
            Self::PrintPaperRecordLabelSet => "printPaperRecordLabelSet",
            Self::RequestPaperRecord => "requestPaperRecord",
            Self::CreateDossierNumber => "createDossierNumber",
            Self::PrintIdCardLabel => "printIdCardLabel",
            Self::PrintPaperRecordLabel => "printPaperRecordLabel",
        }
    }
}

/// Base URL of the web application hosting the fragment actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerUrl(Url);

impl ServerUrl {
    /// Parses the web application root, e.g. `https://emr.example.org/openmrs`.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::InvalidUrl`] when the value is not an absolute
    /// HTTP(S) URL.
    pub fn parse(raw: &str) -> Result<Self, DeskError> {
        let mut parsed =
            Url::parse(raw.trim()).map_err(|error| DeskError::InvalidUrl(error.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DeskError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        if !parsed.path().ends_with('/') {
            let with_slash = format!("{}/", parsed.path());
            parsed.set_path(&with_slash);
        }
        parsed.set_query(None);
        parsed.set_fragment(None);

        Ok(Self(parsed))
    }

    /// Returns the URL of a fragment action.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::InvalidUrl`] if the joined URL is malformed.
    pub fn action_url(&self, action: FragmentAction) -> Result<Url, DeskError> {
        let relative = format!("{PROVIDER}/{}/{}.action", action.fragment(), action.name());
        self.0
            .join(&relative)
            .map_err(|error| DeskError::InvalidUrl(error.to_string()))
    }

    /// Returns the normalised base URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{AssignmentKind, DeskError, FragmentAction, QueueKind, ServerUrl};

    #[rstest]
    #[case::without_trailing_slash("https://emr.example.org/openmrs")]
    #[case::with_trailing_slash("https://emr.example.org/openmrs/")]
    fn action_urls_live_under_the_web_application(#[case] raw: &str) {
        let server = ServerUrl::parse(raw).expect("server URL should parse");

        let url = server
            .action_url(FragmentAction::GetOpenRecordsToPull)
            .expect("action URL should build");

        assert_eq!(
            url.as_str(),
            "https://emr.example.org/openmrs/paperrecord/archivesRoom/getOpenRecordsToPull.action"
        );
    }

    #[rstest]
    fn dashboard_actions_use_the_request_fragment() {
        let server = ServerUrl::parse("http://localhost:8080/openmrs").expect("should parse");

        let url = server
            .action_url(FragmentAction::PrintIdCardLabel)
            .expect("action URL should build");

        assert_eq!(
            url.path(),
            "/openmrs/paperrecord/requestPaperRecord/printIdCardLabel.action"
        );
    }

    #[rstest]
    #[case::relative("emr.example.org/openmrs")]
    #[case::ftp("ftp://emr.example.org/openmrs")]
    fn rejects_unusable_server_urls(#[case] raw: &str) {
        let result = ServerUrl::parse(raw);

        assert!(
            matches!(result, Err(DeskError::InvalidUrl(_))),
            "expected InvalidUrl, got {result:?}"
        );
    }

    #[rstest]
    #[case(AssignmentKind::Pull, QueueKind::Pull, QueueKind::AssignedPull)]
    #[case(AssignmentKind::Create, QueueKind::Create, QueueKind::AssignedCreate)]
    fn assignments_move_requests_into_their_assigned_queue(
        #[case] kind: AssignmentKind,
        #[case] source: QueueKind,
        #[case] target: QueueKind,
    ) {
        assert_eq!(kind.source(), source);
        assert_eq!(kind.target(), target);
    }

    #[rstest]
    fn queue_labels_round_trip() {
        for kind in QueueKind::ALL {
            assert_eq!(QueueKind::from_label(kind.label()), Some(kind));
        }
    }
}
