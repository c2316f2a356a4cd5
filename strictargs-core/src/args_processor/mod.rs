//! Token-level argument processing.
//!
//! [`matcher`] finds a single flag in a token list and extracts its value;
//! [`ArgsProcessor`] runs the matcher for every flag of a command and
//! validates the leftovers.

pub mod matcher;
mod processor;

pub use matcher::{match_all, match_flag, FlagMatch};
pub use processor::{ArgsProcessor, ProcessedArgs};
