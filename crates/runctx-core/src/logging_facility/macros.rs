//! Lifecycle event macros
//!
//! Every event carries `component`, `op` and `event`; extra fields are passed
//! through to `tracing` unchanged. The expansion names
//! `runctx_core_types::schema`, so callers need that crate as a dependency.

/// `start` event for an operation
///
/// ```
/// # use runctx_core::log_op_start;
/// log_op_start!("resolve_context_init");
/// log_op_start!("resolve_context_init", run_id = "r1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = runctx_core_types::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// `end` event for an operation that succeeded
///
/// ```
/// # use runctx_core::log_op_end;
/// log_op_end!("mandatory_resources", duration_ms = 3, candidate_count = 1);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = runctx_core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// `end_error` event carrying the error's kind and stable code
///
/// `$err` is anything convertible into `ExError`, usually a `ResolveError`.
///
/// ```
/// # use runctx_core::{log_op_error, ResolveError};
/// log_op_error!(
///     "optional_resources",
///     ResolveError::not_supported("optional_resources"),
///     duration_ms = 0
/// );
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = ::core::convert::Into::into($err);
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = runctx_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}
