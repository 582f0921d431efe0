//! Command entry points shared by the binaries
//!
//! Each command writes its report to the given writer and returns an error
//! for every outcome that should end the process with status 1.

pub mod check;
pub mod compare;

pub use check::{run_check, CHECK_PASSED_MESSAGE, CHECK_REGRESSION_MESSAGE};
pub use compare::{run_compare, split_arguments};

/// One-line error text for the final status line, including every
/// `anyhow` context layer down to the root cause.
pub fn error_message(err: &anyhow::Error) -> String {
    format!("{:#}", err)
}
