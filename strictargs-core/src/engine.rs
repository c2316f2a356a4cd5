//! The dispatch engine.
//!
//! [`StrictArgs`] holds the global flags, the commands and their listeners,
//! and turns a raw invocation into a notified command:
//!
//! 1. drop the two program tokens; nothing left prints the command listing
//! 2. strip the global flags
//! 3. look up the command named by the next token
//! 4. reduce the command's own flags and positional arguments
//! 5. `--help` reroutes to the help command for the matched command
//! 6. run the hooks, then the command's listeners, in registration order
//!
//! Every parse builds fresh [`ParsedCommand`] values, so an engine can parse
//! any number of invocations.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

use anyhow::{anyhow, bail};
use tracing::{debug, info, warn};

use crate::args_processor::match_all;
use crate::command::{Command, CommandConfig, HELP_COMMAND};
use crate::error::{DeclarationError, ParseError};
use crate::flag::{Flag, FlagConfig, HELP_FLAG};
use crate::help::{CliInfo, HelpRenderer, PlainRenderer};
use crate::listener::CommandListener;
use crate::parsed::ParsedCommand;
use crate::reporter::{FailureReporter, ThrowingReporter};

/// Number of leading tokens that identify the program rather than its
/// arguments (interpreter and script, or binary path and name).
const PROGRAM_TOKENS: usize = 2;

/// What a successful parse did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// No arguments were given; the command listing was printed
    Info,
    /// `--help` was given; help for `command` was printed instead of running it
    Help { command: String },
    /// `command` was parsed and its listeners notified
    Dispatched { command: String },
}

/// Strict command-line parser and dispatcher.
pub struct StrictArgs {
    name: String,
    description: Option<String>,
    global_flags: Vec<Flag>,
    commands: Vec<Command>,
    listeners: HashMap<String, Vec<Box<dyn CommandListener>>>,
    hooks: Vec<Box<dyn CommandListener>>,
    reporter: Box<dyn FailureReporter>,
    renderer: Box<dyn HelpRenderer>,
    output: Box<dyn Write>,
}

impl fmt::Debug for StrictArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let commands: Vec<&str> = self.commands.iter().map(Command::name).collect();
        let global_flags: Vec<&str> = self.global_flags.iter().map(Flag::name).collect();
        f.debug_struct("StrictArgs")
            .field("name", &self.name)
            .field("commands", &commands)
            .field("global_flags", &global_flags)
            .finish_non_exhaustive()
    }
}

impl StrictArgs {
    /// Create an engine carrying the built-in `help` command and `--help`
    /// switch.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            global_flags: vec![Flag::help()],
            commands: vec![Command::help()],
            listeners: HashMap::new(),
            hooks: Vec::new(),
            reporter: Box::new(ThrowingReporter),
            renderer: Box::new(PlainRenderer),
            output: Box::new(io::stdout()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_reporter(mut self, reporter: impl FailureReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn with_renderer(mut self, renderer: impl HelpRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Where help and info text is written. Defaults to stdout.
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Commands in registration order, built-ins first.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.name() == name)
    }

    /// Global flags in registration order, built-ins first.
    pub fn global_flags(&self) -> &[Flag] {
        &self.global_flags
    }

    pub fn global_flag(&self, name: &str) -> Option<&Flag> {
        self.global_flags.iter().find(|flag| flag.name() == name)
    }

    pub fn info(&self) -> CliInfo<'_> {
        CliInfo {
            name: &self.name,
            description: self.description.as_deref(),
            commands: &self.commands,
            global_flags: &self.global_flags,
        }
    }

    /// Register a command. None of its flags may clash with a global flag.
    pub fn register_command(&mut self, config: CommandConfig) -> Result<&Command, DeclarationError> {
        let command = Command::new(config)?;
        if self.command(command.name()).is_some() {
            return Err(DeclarationError::DuplicateCommand(command.name().to_string()));
        }
        if let Some(flag) = command
            .flags()
            .iter()
            .find(|flag| self.global_flag(flag.name()).is_some())
        {
            return Err(DeclarationError::DuplicateGlobalFlag(flag.name().to_string()));
        }

        debug!(command = command.name(), flags = command.flags().len(), "registered command");
        self.commands.push(command);
        Ok(&self.commands[self.commands.len() - 1])
    }

    /// Register a global flag. It may not clash with any other global flag or
    /// with a flag of an already registered command.
    pub fn register_global_flag(&mut self, config: FlagConfig) -> Result<&Flag, DeclarationError> {
        let flag = Flag::new(config)?;
        if self.global_flag(flag.name()).is_some() {
            return Err(DeclarationError::DuplicateGlobalFlag(flag.name().to_string()));
        }
        if let Some(command) = self
            .commands
            .iter()
            .find(|command| command.flag(flag.name()).is_some())
        {
            return Err(DeclarationError::DuplicateCommandFlag {
                flag: flag.name().to_string(),
                command: command.name().to_string(),
            });
        }

        debug!(flag = %flag.full_name(), "registered global flag");
        self.global_flags.push(flag);
        Ok(&self.global_flags[self.global_flags.len() - 1])
    }

    /// Attach a listener to a registered command.
    pub fn add_command_listener(
        &mut self,
        command: &str,
        listener: impl CommandListener + 'static,
    ) -> Result<(), DeclarationError> {
        if self.command(command).is_none() {
            return Err(DeclarationError::UnknownCommand(command.to_string()));
        }
        self.listeners
            .entry(command.to_string())
            .or_default()
            .push(Box::new(listener));
        Ok(())
    }

    /// Attach a hook that runs before the listeners of every command.
    pub fn add_hook(&mut self, hook: impl CommandListener + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Parse a full invocation and notify listeners.
    ///
    /// `args` includes the two leading program tokens, as in
    /// `std::env::args()` of an interpreted script. Failures are handed to
    /// the reporter before being returned.
    pub fn parse(&mut self, args: &[String]) -> Result<ParseOutcome, ParseError> {
        let result = self.run(args);
        if let Err(error) = &result {
            warn!(code = error.exit_code(), %error, "parse failed");
            self.reporter.report_failure(error);
        }
        result
    }

    /// Parse the current process arguments.
    ///
    /// A native binary only gets one program token, so the binary path is
    /// repeated to fill the second slot.
    pub fn parse_env(&mut self) -> Result<ParseOutcome, ParseError> {
        let mut args: Vec<String> = std::env::args().collect();
        let program = args.first().cloned().unwrap_or_else(|| self.name.clone());
        args.insert(0, program);
        self.parse(&args)
    }

    fn run(&mut self, args: &[String]) -> Result<ParseOutcome, ParseError> {
        let tokens = args.get(PROGRAM_TOKENS..).unwrap_or_default();
        if tokens.is_empty() {
            let text = self.renderer.render_info(&self.info());
            self.output.write_all(text.as_bytes())?;
            self.output.flush()?;
            return Ok(ParseOutcome::Info);
        }

        let (globals, tokens) = match_all(&self.global_flags, tokens).map_err(ParseError::GlobalFlags)?;

        let Some(command_name) = tokens.first() else {
            return Err(ParseError::NoCommandSpecified { tool: self.name.clone() });
        };
        let command = self
            .command(command_name)
            .ok_or_else(|| ParseError::UnrecognizedCommand {
                command: command_name.clone(),
                tool: self.name.clone(),
            })?;

        let processed = command.parse(&tokens[1..]).map_err(|error| ParseError::Command {
            command: command.name().to_string(),
            error,
        })?;
        let parsed = ParsedCommand::new(command, processed, globals);

        if parsed.globals().is_present(HELP_FLAG) {
            return self.reroute_to_help(parsed, args);
        }

        info!(command = parsed.name(), "dispatching command");
        self.notify(&parsed, args)?;
        Ok(ParseOutcome::Dispatched { command: parsed.name().to_string() })
    }

    /// Run the help command as if invoked as `help <command>`. The matched
    /// command's own listeners are skipped.
    fn reroute_to_help(&mut self, parsed: ParsedCommand, args: &[String]) -> Result<ParseOutcome, ParseError> {
        let help = self
            .command(HELP_COMMAND)
            .ok_or_else(|| ParseError::UnrecognizedCommand {
                command: HELP_COMMAND.to_string(),
                tool: self.name.clone(),
            })?;
        let processed = help
            .parse(&[parsed.name().to_string()])
            .map_err(|error| ParseError::Command { command: HELP_COMMAND.to_string(), error })?;
        let help_parsed = ParsedCommand::new(help, processed, parsed.globals().clone());

        info!(command = parsed.name(), "rerouting to help");
        self.notify(&help_parsed, args)?;
        Ok(ParseOutcome::Help { command: parsed.name().to_string() })
    }

    fn notify(&mut self, parsed: &ParsedCommand, args: &[String]) -> Result<(), ParseError> {
        let failed = |error: anyhow::Error| ParseError::Listener { command: parsed.name().to_string(), error };

        for hook in &mut self.hooks {
            hook.on_command(parsed, args).map_err(failed)?;
        }
        if parsed.name() == HELP_COMMAND {
            self.print_command_help(parsed).map_err(failed)?;
        }
        if let Some(listeners) = self.listeners.get_mut(parsed.name()) {
            debug!(command = parsed.name(), count = listeners.len(), "notifying listeners");
            for listener in listeners {
                listener.on_command(parsed, args).map_err(failed)?;
            }
        }
        Ok(())
    }

    /// Built-in behaviour of the help command.
    fn print_command_help(&mut self, parsed: &ParsedCommand) -> anyhow::Result<()> {
        let Some(target) = parsed.args()?.first() else {
            bail!("No command specified. Please specify one with \"help <commandname>\".");
        };
        let command = self
            .command(target)
            .ok_or_else(|| anyhow!("Cannot find command with name '{target}'."))?;

        let text = self.renderer.render_command_help(&self.info(), command);
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }
}
