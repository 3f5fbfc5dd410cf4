//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent between the logging macros,
//! the error facility and test assertions.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Resolution entities
pub const FIELD_REPOSITORY: &str = "repository";
pub const FIELD_NAMESPACE: &str = "namespace";
pub const FIELD_FRAMEWORK: &str = "framework";
pub const FIELD_FRAMEWORK_VERSION: &str = "framework_version";

// Collection sizes
pub const FIELD_REPO_COUNT: &str = "repo_count";
pub const FIELD_CANDIDATE_COUNT: &str = "candidate_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
