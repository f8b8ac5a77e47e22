//! Tests for the HTTP gateway against a mock fragment action server.

use rstest::{fixture, rstest};
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_string, body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{
    ArchivesRoomGateway, Credentials, HttpArchivesGateway, HttpGatewaySettings,
    PatientDashboardGateway,
};
use crate::archives::endpoint::{AssignmentKind, QueueKind, ServerUrl};
use crate::archives::error::DeskError;
use crate::archives::models::{MergeRequestId, RequestId};

const ARCHIVES_ROOM: &str = "/openmrs/paperrecord/archivesRoom";

struct GatewayFixture {
    server: MockServer,
    gateway: HttpArchivesGateway,
    runtime: Runtime,
}

impl GatewayFixture {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn mount(&self, mock: Mock) {
        self.block_on(mock.mount(&self.server));
    }
}

#[fixture]
fn gateway_fixture() -> GatewayFixture {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    let server_url = ServerUrl::parse(&format!("{}/openmrs", server.uri()))
        .expect("mock server URL should parse");
    let gateway =
        HttpArchivesGateway::new(HttpGatewaySettings::new(server_url)).expect("should build");
    GatewayFixture {
        server,
        gateway,
        runtime,
    }
}

#[rstest]
fn fetch_requests_parses_the_pull_queue(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path(format!("{ARCHIVES_ROOM}/getOpenRecordsToPull.action")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "requestId": 1,
                    "patient": "Alex",
                    "patientIdentifier": "Y2A4G4",
                    "identifier": "A001",
                    "requestLocation": "Mirebalais",
                    "dateCreated": "12:34 01/05",
                    "dateCreatedSortable": 1_367_411_640_000_i64,
                    "dateLastSent": "09:00 30/04",
                    "locationLastSent": "Lacoline"
                },
                {
                    "requestId": 2,
                    "patient": "Mark",
                    "identifier": "A021",
                    "requestLocation": "Lacoline",
                    "dateCreated": "12:35 01/05"
                }
            ]))),
    );

    let records = gateway_fixture
        .block_on(gateway_fixture.gateway.fetch_requests(QueueKind::Pull))
        .expect("fetch should succeed");

    let ids: Vec<&str> = records.iter().map(|r| r.request_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    let first = records.first().expect("should have first record");
    assert_eq!(first.location_last_sent.as_deref(), Some("Lacoline"));
}

#[rstest]
#[case(QueueKind::Create, "getOpenRecordsToCreate")]
#[case(QueueKind::AssignedPull, "getAssignedRecordsToPull")]
#[case(QueueKind::AssignedCreate, "getAssignedRecordsToCreate")]
fn fetch_requests_uses_the_queue_endpoint(
    gateway_fixture: GatewayFixture,
    #[case] queue: QueueKind,
    #[case] action: &str,
) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path(format!("{ARCHIVES_ROOM}/{action}.action")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1),
    );

    let records = gateway_fixture
        .block_on(gateway_fixture.gateway.fetch_requests(queue))
        .expect("fetch should succeed");

    assert!(records.is_empty());
}

#[rstest]
fn fetch_merge_requests_parses_pairs(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path(format!("{ARCHIVES_ROOM}/getOpenRecordsToMerge.action")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "mergeRequestId": 9,
                "preferredName": "Mark Smith",
                "preferredIdentifier": "A021",
                "notPreferredIdentifier": "A099",
                "notPreferredName": "Marc Smith",
                "dateCreated": "01/05 12:34",
                "dateCreatedSortable": 1_367_411_640_000_i64
            }]))),
    );

    let merges = gateway_fixture
        .block_on(gateway_fixture.gateway.fetch_merge_requests())
        .expect("fetch should succeed");

    assert_eq!(merges.len(), 1);
    let merge = merges.first().expect("should have merge request");
    assert_eq!(merge.merge_request_id, MergeRequestId::new("9"));
    assert_eq!(merge.not_preferred_identifier, "A099");
}

#[rstest]
fn assign_requests_sends_every_id(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path(format!("{ARCHIVES_ROOM}/assignPullRequests.action")))
            .and(body_string("requestId%5B%5D=3&requestId%5B%5D=5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": "true", "message": "Records assigned" })),
            )
            .expect(1),
    );

    let reply = gateway_fixture
        .block_on(gateway_fixture.gateway.assign_requests(
            AssignmentKind::Pull,
            &[RequestId::new("3"), RequestId::new("5")],
        ))
        .expect("assignment should succeed");

    assert_eq!(reply.message.as_deref(), Some("Records assigned"));
}

#[rstest]
fn mark_as_sent_posts_the_identifier(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path(format!(
                "{ARCHIVES_ROOM}/markPaperRecordRequestAsSent.action"
            )))
            .and(body_string_contains("identifier=A000123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "message": "Requested by" })),
            )
            .expect(1),
    );

    let reply = gateway_fixture
        .block_on(gateway_fixture.gateway.mark_as_sent("A000123"))
        .expect("mark as sent should succeed");

    assert_eq!(reply.message.as_deref(), Some("Requested by"));
}

#[rstest]
fn failure_results_surface_the_global_error(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path(format!(
                "{ARCHIVES_ROOM}/markPaperRecordRequestAsReturned.action"
            )))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "failure": "true",
                "globalErrors": ["No paper record exists with that identifier"]
            }))),
    );

    let result = gateway_fixture.block_on(gateway_fixture.gateway.mark_as_returned("Z999"));

    assert_eq!(
        result,
        Err(DeskError::Api {
            status: 400,
            message: "No paper record exists with that identifier".to_owned(),
        })
    );
}

#[rstest]
fn cancellation_accepts_an_empty_success_body(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path(format!(
                "{ARCHIVES_ROOM}/markPaperRecordRequestAsCancelled.action"
            )))
            .and(body_string("requestId=44"))
            .respond_with(ResponseTemplate::new(200)),
    );

    let reply = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .mark_as_cancelled(&RequestId::new("44")),
        )
        .expect("cancel should succeed");

    assert!(reply.message.is_none());
}

#[rstest]
fn merge_confirmation_posts_the_merge_id(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path(format!("{ARCHIVES_ROOM}/markPaperRecordsAsMerged.action")))
            .and(body_string("mergeId=9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Ok" })))
            .expect(1),
    );

    let reply = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .mark_as_merged(&MergeRequestId::new("9")),
        )
        .expect("merge should succeed");

    assert_eq!(reply.message.as_deref(), Some("Ok"));
}

#[rstest]
fn unsuccessful_print_replies_become_rejections(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path(
                "/openmrs/paperrecord/requestPaperRecord/printIdCardLabel.action",
            ))
            .and(body_string("patientId=7&locationId=3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Unable to print label"
            }))),
    );

    let result = gateway_fixture.block_on(gateway_fixture.gateway.print_id_card_label("7", "3"));

    assert_eq!(
        result,
        Err(DeskError::ActionRejected {
            message: "Unable to print label".to_owned(),
        })
    );
}

#[rstest]
fn unauthorised_responses_map_to_authentication(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path(format!("{ARCHIVES_ROOM}/getOpenRecordsToMerge.action")))
            .respond_with(ResponseTemplate::new(401)),
    );

    let result = gateway_fixture.block_on(gateway_fixture.gateway.fetch_merge_requests());

    assert!(
        matches!(result, Err(DeskError::Authentication { .. })),
        "expected Authentication, got {result:?}"
    );
}

#[rstest]
fn malformed_queue_bodies_map_to_decode_errors(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path(format!("{ARCHIVES_ROOM}/getOpenRecordsToPull.action")))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>")),
    );

    let result = gateway_fixture.block_on(gateway_fixture.gateway.fetch_requests(QueueKind::Pull));

    assert!(
        matches!(result, Err(DeskError::Decode { .. })),
        "expected Decode, got {result:?}"
    );
}

#[rstest]
fn credentials_are_sent_as_basic_auth() {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    let server_url = ServerUrl::parse(&format!("{}/openmrs", server.uri())).expect("should parse");
    let mut settings = HttpGatewaySettings::new(server_url);
    settings.credentials = Some(Credentials {
        username: "clerk".to_owned(),
        password: "secret".to_owned(),
    });
    let gateway = HttpArchivesGateway::new(settings).expect("should build");

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path(format!("{ARCHIVES_ROOM}/getOpenRecordsToMerge.action")))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server),
    );

    let merges = runtime
        .block_on(gateway.fetch_merge_requests())
        .expect("authorised fetch should succeed");

    assert!(merges.is_empty());
}

#[rstest]
fn credentials_debug_output_hides_the_password() {
    let credentials = Credentials {
        username: "clerk".to_owned(),
        password: "secret".to_owned(),
    };

    let rendered = format!("{credentials:?}");

    assert!(!rendered.contains("secret"), "password leaked: {rendered}");
}
