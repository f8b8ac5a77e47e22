//! End-to-end desk tests against a mock archives-room server.

use std::sync::Arc;

use dossier::archives::gateway::HttpGatewaySettings;
use dossier::archives::ServerUrl;
use dossier::notify::test_support::RecordingNotifier;
use dossier::{
    ActionOutcome, ArchivesRoom, AssignmentKind, DeskSettings, HttpArchivesGateway, QueueKind,
    RequestId,
};
use serde_json::json;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARCHIVES_ROOM: &str = "/openmrs/paperrecord/archivesRoom";

fn action_path(action: &str) -> String {
    format!("{ARCHIVES_ROOM}/{action}.action")
}

async fn mount_list(server: &MockServer, action: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(action_path(action)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_empty_lists(server: &MockServer, actions: &[&str]) {
    for action in actions {
        mount_list(server, action, json!([])).await;
    }
}

fn room_for(server: &MockServer) -> (ArchivesRoom, Arc<RecordingNotifier>) {
    let server_url = ServerUrl::parse(&format!("{}/openmrs", server.uri()))
        .unwrap_or_else(|error| panic!("mock server URL should parse: {error}"));
    let gateway = HttpArchivesGateway::new(HttpGatewaySettings::new(server_url))
        .unwrap_or_else(|error| panic!("gateway should build: {error}"));
    let notifier = Arc::new(RecordingNotifier::default());
    let room = ArchivesRoom::new(
        Arc::new(gateway),
        Arc::clone(&notifier) as _,
        DeskSettings::default(),
    );
    (room, notifier)
}

#[tokio::test]
async fn refresh_loads_every_queue_from_the_server() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        "getOpenRecordsToPull",
        json!([
            { "requestId": 1, "patient": "Alex", "identifier": "A001",
              "requestLocation": "Lacoline", "dateCreated": "10:00 01/05" },
            { "requestId": 2, "patient": "Mark", "identifier": "A002",
              "requestLocation": "Mirebalais", "dateCreated": "10:05 01/05" }
        ]),
    )
    .await;
    mount_list(
        &server,
        "getOpenRecordsToMerge",
        json!([
            { "mergeRequestId": 9, "preferredName": "Alex", "preferredIdentifier": "A001",
              "notPreferredName": "Alexander", "notPreferredIdentifier": "A099",
              "dateCreated": "09:00 01/05" }
        ]),
    )
    .await;
    mount_empty_lists(
        &server,
        &[
            "getOpenRecordsToCreate",
            "getAssignedRecordsToPull",
            "getAssignedRecordsToCreate",
        ],
    )
    .await;
    let (mut room, notifier) = room_for(&server);

    let report = room.refresh_all_queues().await;

    assert!(report.is_complete(), "unexpected failures: {report:?}");
    assert_eq!(room.queue(QueueKind::Pull).len(), 2);
    assert!(room.queue(QueueKind::Create).is_empty());
    assert_eq!(room.merge_queue().len(), 1);
    assert!(notifier.notifications().is_empty());
}

#[tokio::test]
async fn server_error_on_one_queue_is_reported_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(action_path("getOpenRecordsToCreate")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_empty_lists(
        &server,
        &[
            "getOpenRecordsToPull",
            "getAssignedRecordsToPull",
            "getAssignedRecordsToCreate",
            "getOpenRecordsToMerge",
        ],
    )
    .await;
    let (mut room, notifier) = room_for(&server);

    let report = room.refresh_all_queues().await;

    assert_eq!(report.failed, vec![QueueKind::Create.label()]);
    assert_eq!(notifier.errors().len(), 1);
}

#[tokio::test]
async fn assigning_posts_selected_ids_and_reloads_the_assigned_queue() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        "getOpenRecordsToPull",
        json!([
            { "requestId": 3, "patient": "Alex", "identifier": "A003",
              "requestLocation": "Lacoline", "dateCreated": "10:00 01/05" },
            { "requestId": 5, "patient": "Mark", "identifier": "A005",
              "requestLocation": "Lacoline", "dateCreated": "10:05 01/05" }
        ]),
    )
    .await;
    mount_list(
        &server,
        "getAssignedRecordsToPull",
        json!([
            { "requestId": 5, "patient": "Mark", "identifier": "A005",
              "requestLocation": "Lacoline", "dateCreated": "10:05 01/05" }
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(action_path("assignPullRequests")))
        .and(body_string("requestId%5B%5D=5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    let (mut room, notifier) = room_for(&server);
    room.reload_queue(QueueKind::Pull)
        .await
        .unwrap_or_else(|error| panic!("pull queue should load: {error}"));
    assert!(room.queue_mut(QueueKind::Pull).toggle_selection(&RequestId::new("5")));

    let outcome = room
        .assign_selected(AssignmentKind::Pull)
        .await
        .unwrap_or_else(|error| panic!("assignment should succeed: {error}"));

    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(room.queue(QueueKind::AssignedPull).len(), 1);
    let still_shown: Vec<_> = room
        .queue(QueueKind::Pull)
        .visible_records()
        .map(|record| record.request_id.clone())
        .collect();
    assert_eq!(still_shown, vec![RequestId::new("3")]);
    assert_eq!(notifier.successes().len(), 1);
}
