//! Failure reporting.
//!
//! The engine hands every runtime failure to a [`FailureReporter`] before it
//! returns the error. Terminating the process is left to reporters living in
//! binaries; the library only ships one that leaves the error to the caller.

use tracing::debug;

use crate::error::ParseError;

pub trait FailureReporter {
    fn report_failure(&self, error: &ParseError);
}

/// Leaves the failure to the caller, which receives it as an `Err`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThrowingReporter;

impl FailureReporter for ThrowingReporter {
    fn report_failure(&self, error: &ParseError) {
        debug!(code = error.exit_code(), %error, "returning parse failure to caller");
    }
}
