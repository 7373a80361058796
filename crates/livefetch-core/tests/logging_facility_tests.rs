#![allow(clippy::unwrap_used, clippy::expect_used)]

use livefetch_core::core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use livefetch_core::errors::FetchError;
use livefetch_core::logging_facility::test_capture::init_test_capture;
use livefetch_core::{log_op_end, log_op_error, log_op_start};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events = capture.events_for(op_name, EVENT_START);
    assert!(
        !start_events.is_empty(),
        "Should have captured at least one start event"
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events = capture.events_for(op_name, EVENT_END);
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = FetchError::DuplicateIdentity {
        id: "a".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events = capture.events_for(op_name, EVENT_END_ERROR);
    assert_eq!(error_events.len(), 1, "Should have exactly one error event");

    let error_event = &error_events[0];
    assert_eq!(error_event.field("err.code"), Some("ERR_DUPLICATE_IDENTITY"));
    assert_eq!(error_event.field("err.kind"), Some("DuplicateIdentity"));
    assert!(matches!(err, FetchError::DuplicateIdentity { .. }));
}

#[test]
fn test_extra_fields_are_captured() {
    let capture = init_test_capture();
    let op_name = "test_extra_fields_unique_4";

    log_op_start!(op_name, token = 7u64);
    log_op_end!(op_name, duration_ms = 1, generation = 3u64, change_count = 2u64);

    let start = capture.events_for(op_name, EVENT_START);
    assert_eq!(start[0].field("token"), Some("7"));

    let end = capture.events_for(op_name, EVENT_END);
    assert_eq!(end[0].field("generation"), Some("3"));
    assert_eq!(end[0].field("change_count"), Some("2"));
}
