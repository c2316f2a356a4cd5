use std::process;

use strictargs_core::{FailureReporter, ParseError};

/// Prints the failure and exits with its category code.
#[derive(Debug, Clone)]
pub struct ExitReporter {
    tool: String,
}

impl ExitReporter {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }
}

impl FailureReporter for ExitReporter {
    fn report_failure(&self, error: &ParseError) {
        eprintln!("error: {error}");
        if let ParseError::Command { command, .. } = error {
            eprintln!("Run '{} help {command}' to see its options.", self.tool);
        }
        process::exit(error.exit_code());
    }
}
