//! Command listeners.

use crate::parsed::ParsedCommand;

/// Receives a command once it has been parsed successfully.
///
/// `args` is the full raw invocation, including the two leading program
/// tokens. Returning an error stops notification; listeners that already ran
/// are not rolled back.
pub trait CommandListener {
    fn on_command(&mut self, command: &ParsedCommand, args: &[String]) -> anyhow::Result<()>;
}

impl<F> CommandListener for F
where
    F: FnMut(&ParsedCommand, &[String]) -> anyhow::Result<()>,
{
    fn on_command(&mut self, command: &ParsedCommand, args: &[String]) -> anyhow::Result<()> {
        self(command, args)
    }
}
