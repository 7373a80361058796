//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Fetch cycle identifiers
pub const FIELD_TOKEN: &str = "token";
pub const FIELD_GENERATION: &str = "generation";

// Snapshot sizes
pub const FIELD_SECTION_COUNT: &str = "section_count";
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_CHANGE_COUNT: &str = "change_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_SUPERSEDED: &str = "superseded";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        // Verify all constants are non-empty
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_EVENT.is_empty());
        assert!(!FIELD_DURATION_MS.is_empty());
        assert!(!FIELD_REQUEST_ID.is_empty());
        assert!(!FIELD_TOKEN.is_empty());
        assert!(!FIELD_GENERATION.is_empty());
        assert!(!FIELD_SECTION_COUNT.is_empty());
        assert!(!FIELD_ROW_COUNT.is_empty());
        assert!(!FIELD_CHANGE_COUNT.is_empty());
        assert!(!FIELD_ERR_KIND.is_empty());
        assert!(!FIELD_ERR_CODE.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        let events = [EVENT_START, EVENT_END, EVENT_END_ERROR, EVENT_SUPERSEDED];
        for (i, a) in events.iter().enumerate() {
            for b in events.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
