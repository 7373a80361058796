#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{by_folder, by_order, memory_controller, note, FailingConnector, NoteController};
use livefetch_core::core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_CHANGE_COUNT, FIELD_DURATION_MS,
    FIELD_ERR_CODE, FIELD_GENERATION, FIELD_REQUEST_ID, FIELD_ROW_COUNT, FIELD_SECTION_COUNT,
    FIELD_TOKEN,
};
use livefetch_core::logging_facility::test_capture::init_test_capture;
use livefetch_core::ChangeDetector;
use livefetch_engine::{ResultsController, StoreConnector};

#[tokio::test]
async fn test_fetch_and_refresh_log_start_and_end() {
    let capture = init_test_capture();
    let (store, controller) = memory_controller(vec![note("log-a", "X", 1)]);

    controller.perform_fetch(by_order()).await.unwrap();
    store.upsert(note("log-b", "X", 2)).await;
    controller.refresh().await.unwrap();

    capture.assert_event_exists("perform_fetch", EVENT_START);
    capture.assert_event_exists("perform_fetch", EVENT_END);

    // events from other tests share the buffer; find this refresh by its
    // single insert
    let ends = capture.events_for("refresh", EVENT_END);
    let ours = ends
        .iter()
        .find(|e| {
            e.field(FIELD_CHANGE_COUNT) == Some("1") && e.field(FIELD_GENERATION) == Some("2")
        })
        .expect("refresh end event with one change");
    assert!(ours.field(FIELD_REQUEST_ID).is_some());
    assert!(ours.field(FIELD_TOKEN).is_some());
    assert!(ours.field(FIELD_DURATION_MS).is_some());
}

#[tokio::test]
async fn test_connector_failure_logs_error_code() {
    let capture = init_test_capture();
    let connector: Arc<dyn StoreConnector<common::Note>> = Arc::new(FailingConnector);
    let controller: NoteController =
        ResultsController::new(connector, by_folder(), ChangeDetector::by_eq());

    controller.perform_fetch(by_order()).await.unwrap_err();

    let errors = capture.events_for("perform_fetch", EVENT_END_ERROR);
    assert!(errors
        .iter()
        .any(|e| e.field(FIELD_ERR_CODE) == Some("ERR_CONNECTOR_FAILURE")));
}

#[tokio::test]
async fn test_snapshot_sizes_logged_at_debug() {
    let capture = init_test_capture();
    let (_store, controller) = memory_controller(vec![
        note("size-a", "P", 1),
        note("size-b", "Q", 1),
        note("size-c", "Q", 2),
        note("size-d", "R", 1),
        note("size-e", "R", 2),
        note("size-f", "S", 1),
        note("size-g", "T", 1),
    ]);

    controller.perform_fetch(by_order()).await.unwrap();

    // seven rows in five sections is unique to this test
    assert!(
        capture.count_events(|e| e.level == tracing::Level::DEBUG
            && e.field(FIELD_SECTION_COUNT) == Some("5")
            && e.field(FIELD_ROW_COUNT) == Some("7"))
            >= 1
    );
}
