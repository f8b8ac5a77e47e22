//! Tests for action parsing, batch controls, and dispatch routing.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::{ActionOutcome, ActionRegistry, BatchControl, DeskAction};
use crate::archives::endpoint::{AssignmentKind, QueueKind};
use crate::archives::error::DeskError;
use crate::archives::gateway::MockArchivesRoomGateway;
use crate::archives::models::{MergeRequestId, RecordRequest, RequestId};
use crate::desk::scan::ScanForm;
use crate::desk::{ArchivesRoom, DeskSettings};
use crate::notify::test_support::RecordingNotifier;

#[fixture]
fn registry() -> ActionRegistry {
    ActionRegistry::new()
}

#[rstest]
#[case::pulled("mark-as-pulled A001", DeskAction::MarkAsPulled { identifier: "A001".to_owned() })]
#[case::pulled_blank("mark-as-pulled", DeskAction::MarkAsPulled { identifier: String::new() })]
#[case::returned("mark-as-returned  B002 ", DeskAction::MarkAsReturned { identifier: "B002".to_owned() })]
#[case::assign_pull("assign-to-pull", DeskAction::Assign(AssignmentKind::Pull))]
#[case::assign_create("assign-to-create", DeskAction::Assign(AssignmentKind::Create))]
#[case::merge("mergeId 12", DeskAction::ConfirmMerge(MergeRequestId::new("12")))]
#[case::cancel(
    "cancel-request assigned-pull 7",
    DeskAction::CancelRequest { queue: QueueKind::AssignedPull, request_id: RequestId::new("7") }
)]
#[case::print("print-label 3", DeskAction::PrintLabel(RequestId::new("3")))]
#[case::print_set("print-label-set 4", DeskAction::PrintLabelSet(RequestId::new("4")))]
#[case::select(
    "select create 5",
    DeskAction::Select { queue: QueueKind::Create, request_id: RequestId::new("5") }
)]
#[case::hover(
    "hover pull 5",
    DeskAction::Hover { queue: QueueKind::Pull, request_id: RequestId::new("5") }
)]
#[case::unhover(
    "unhover pull 5",
    DeskAction::Unhover { queue: QueueKind::Pull, request_id: RequestId::new("5") }
)]
#[case::refresh("refresh", DeskAction::Refresh)]
fn parses_every_registered_action(
    registry: ActionRegistry,
    #[case] line: &str,
    #[case] expected: DeskAction,
) {
    assert_eq!(registry.parse_line(line), Ok(expected));
}

#[rstest]
fn registers_the_twelve_action_names(registry: ActionRegistry) {
    assert_eq!(
        registry.names(),
        vec![
            "assign-to-create",
            "assign-to-pull",
            "cancel-request",
            "hover",
            "mark-as-pulled",
            "mark-as-returned",
            "mergeId",
            "print-label",
            "print-label-set",
            "refresh",
            "select",
            "unhover",
        ]
    );
}

#[rstest]
fn unknown_names_have_no_builder(registry: ActionRegistry) {
    assert!(registry.lookup("delete-everything").is_none());
    assert!(registry.lookup("mergeid").is_none());
}

#[rstest]
#[case::empty("")]
#[case::unknown("shred A001")]
#[case::missing_id("print-label")]
#[case::extra_args("refresh now")]
#[case::bad_queue("select merge 5")]
#[case::missing_queue("cancel-request 7")]
fn rejects_malformed_lines(registry: ActionRegistry, #[case] line: &str) {
    assert!(matches!(
        registry.parse_line(line),
        Err(DeskError::InvalidCommand { .. })
    ));
}

#[rstest]
fn batch_control_toggles() {
    let mut control = BatchControl::new("assign-to-pull-button");
    assert!(control.is_enabled());

    control.disable();
    assert!(!control.is_enabled());

    control.enable();
    assert!(control.is_enabled());
    assert_eq!(control.name(), "assign-to-pull-button");
}

fn room_with(gateway: MockArchivesRoomGateway) -> ArchivesRoom {
    ArchivesRoom::new(
        Arc::new(gateway),
        Arc::new(RecordingNotifier::default()),
        DeskSettings::default(),
    )
}

#[tokio::test]
async fn row_gestures_touch_only_local_state() {
    let mut room = room_with(MockArchivesRoomGateway::new());
    room.queue_mut(QueueKind::Pull).apply_snapshot(vec![
        RecordRequest::new(RequestId::new("1"), "Alex", "A001", "Lacoline", "10:00"),
        RecordRequest::new(RequestId::new("2"), "Mark", "A002", "Lacoline", "10:05"),
    ]);

    room.dispatch(DeskAction::Hover {
        queue: QueueKind::Pull,
        request_id: RequestId::new("1"),
    })
    .await
    .expect("hover should succeed");
    let outcome = room
        .dispatch(DeskAction::Select {
            queue: QueueKind::Pull,
            request_id: RequestId::new("2"),
        })
        .await
        .expect("select should succeed");

    assert_eq!(outcome, ActionOutcome::Completed);
    let pull = room.queue(QueueKind::Pull);
    assert_eq!(pull.selected_ids(), vec![RequestId::new("2")]);
    assert_eq!(pull.hovered_requests().len(), 1);
}

#[tokio::test]
async fn gesture_on_unknown_row_is_skipped() {
    let mut room = room_with(MockArchivesRoomGateway::new());

    let outcome = room
        .dispatch(DeskAction::Select {
            queue: QueueKind::Create,
            request_id: RequestId::new("404"),
        })
        .await
        .expect("unknown row is not an error");

    assert_eq!(outcome, ActionOutcome::Skipped);
}

#[tokio::test]
async fn key_down_routes_focus_to_the_visible_form() {
    let mut room = room_with(MockArchivesRoomGateway::new());
    room.dispatch(DeskAction::ShowScanForm(ScanForm::Returned))
        .await
        .expect("tab switch should succeed");

    let letter = room
        .dispatch(DeskAction::KeyDown(u32::from(b'K')))
        .await
        .expect("key press should succeed");
    assert_eq!(letter, ActionOutcome::Completed);
    assert_eq!(room.scan_forms().focused(), Some(ScanForm::Returned));

    let escape = room
        .dispatch(DeskAction::KeyDown(27))
        .await
        .expect("key press should succeed");
    assert_eq!(escape, ActionOutcome::Skipped);
}

#[tokio::test]
async fn scanned_identifier_is_sent_trimmed() {
    let mut gateway = MockArchivesRoomGateway::new();
    gateway
        .expect_mark_as_sent()
        .with(eq("A001"))
        .times(1)
        .returning(|_| Ok(crate::archives::models::ActionReply::default()));
    gateway
        .expect_fetch_requests()
        .times(4)
        .returning(|_| Ok(Vec::new()));
    gateway
        .expect_fetch_merge_requests()
        .times(1)
        .returning(|| Ok(Vec::new()));
    let mut room = room_with(gateway);

    let outcome = room
        .dispatch(DeskAction::MarkAsPulled {
            identifier: " A001\n".to_owned(),
        })
        .await
        .expect("scan should succeed");

    assert_eq!(outcome, ActionOutcome::Completed);
}
