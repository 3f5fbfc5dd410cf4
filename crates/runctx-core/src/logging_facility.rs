//! Structured logging
//!
//! `init(profile)` installs the subscriber once per process. The
//! `log_op_start!`, `log_op_end!` and `log_op_error!` macros emit the
//! lifecycle events, with field names from `runctx_core_types::schema`.
//!
//! ```rust
//! use runctx_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Only the resolve context emits lifecycle events (`start`/`end`/`end_error`).
//! Selector, locator and repositories log at debug level.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
