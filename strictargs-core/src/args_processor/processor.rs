//! Argument reduction for a single command.
//!
//! The processor strips every declared flag of a command from the tokens that
//! follow the command name, then checks what is left over.

use tracing::debug;

use super::matcher::match_all;
use crate::command::Command;
use crate::error::CommandError;
use crate::parsed::ParsedFlags;

/// What a command's arguments reduce to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedArgs {
    pub flags: ParsedFlags,
    pub positional_args: Vec<String>,
}

/// Processor for the arguments of one declared command
pub struct ArgsProcessor<'a> {
    command: &'a Command,
}

impl<'a> ArgsProcessor<'a> {
    pub fn new(command: &'a Command) -> Self {
        Self { command }
    }

    /// Match the command's flags in declaration order and validate the
    /// leftovers.
    ///
    /// Any leftover token starting with `-` is an unrecognized flag. Other
    /// leftovers become positional arguments, which the command must allow.
    pub fn process_args(&self, tokens: &[String]) -> Result<ProcessedArgs, CommandError> {
        let (flags, remaining) = match_all(self.command.flags(), tokens)?;

        if let Some(flag) = remaining.iter().find(|token| token.starts_with('-')) {
            return Err(CommandError::UnrecognizedFlag {
                command: self.command.name().to_string(),
                flag: flag.clone(),
            });
        }

        if !remaining.is_empty() && !self.command.allows_positional_args() {
            return Err(CommandError::UnexpectedPositionalArgs {
                command: self.command.name().to_string(),
                args: remaining,
            });
        }

        debug!(
            command = self.command.name(),
            present = flags.present().count(),
            positional = remaining.len(),
            "processed command arguments"
        );
        Ok(ProcessedArgs {
            flags,
            positional_args: remaining,
        })
    }
}
