//! Error types for strictargs.
//!
//! Declaration errors are programmer errors and come back from registration
//! calls. Everything else is raised while parsing an invocation and ends up in
//! a [`ParseError`], which carries the exit code for its failure category.

use thiserror::Error;

/// Raised while declaring flags and commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// Names must be non-empty and cannot start with `-` or contain
    /// whitespace or `=`
    #[error("Invalid name '{0}': names cannot be empty, start with '-', or contain whitespace or '='")]
    InvalidName(String),

    /// The name is taken by a built-in command or flag
    #[error("'{0}' is a reserved name and cannot be declared")]
    ReservedName(String),

    /// Switch flags have no value, so a default does nothing
    #[error("Cannot build flag '{0}': it is a switch, so a default value has no effect")]
    SwitchWithDefault(String),

    #[error("Command of name '{0}' already registered")]
    DuplicateCommand(String),

    #[error("Flag '{0}' already registered globally")]
    DuplicateGlobalFlag(String),

    #[error("Flag '{flag}' already registered in the {command} command")]
    DuplicateCommandFlag { flag: String, command: String },

    /// A listener was attached to a command that was never registered
    #[error("Cannot add a listener for unknown command '{0}'")]
    UnknownCommand(String),
}

/// Raised by the flag matcher. Flags are named by their full textual form,
/// e.g. `--open` or `-port`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlagError {
    #[error("Required flag '{0}' was not specified")]
    RequiredFlagMissing(String),

    #[error("No value was given for flag '{0}'")]
    MissingFlagValue(String),
}

/// Raised while reducing the arguments of a single command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Flag(#[from] FlagError),

    #[error("Unrecognized flag '{flag}' for command '{command}'")]
    UnrecognizedFlag { command: String, flag: String },

    #[error("Command '{command}' does not accept arguments, got {args:?}")]
    UnexpectedPositionalArgs { command: String, args: Vec<String> },
}

/// Raised when reading values out of a parsed command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Cannot get the value of flag '{0}', it is not a value flag")]
    NotAValueFlag(String),

    #[error("No flag named '{0}' was declared")]
    UnknownFlag(String),

    #[error("Command '{0}' does not accept positional arguments")]
    PositionalArgsNotAllowed(String),
}

/// Exit codes, one per runtime failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    NoCommandSpecified = 1,
    UnrecognizedCommand = 2,
    FailedToParseGlobalFlags = 3,
    FailedToParseCommand = 4,
    ListenerFailed = 5,
    OutputFailed = 6,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Failure of a full [`StrictArgs::parse`](crate::StrictArgs::parse) run.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("No command specified. Run '{tool}' without arguments to list the available commands")]
    NoCommandSpecified { tool: String },

    #[error("Unrecognized command '{command}' for {tool}")]
    UnrecognizedCommand { command: String, tool: String },

    #[error("Failed to parse global flags: {0}")]
    GlobalFlags(FlagError),

    #[error("Failed to parse command '{command}': {error}")]
    Command { command: String, error: CommandError },

    /// A hook or listener returned an error during notification
    #[error("Listener for command '{command}' failed: {error:#}")]
    Listener { command: String, error: anyhow::Error },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl ParseError {
    /// The failure category of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::NoCommandSpecified { .. } => ErrorCode::NoCommandSpecified,
            ParseError::UnrecognizedCommand { .. } => ErrorCode::UnrecognizedCommand,
            ParseError::GlobalFlags(_) => ErrorCode::FailedToParseGlobalFlags,
            ParseError::Command { .. } => ErrorCode::FailedToParseCommand,
            ParseError::Listener { .. } => ErrorCode::ListenerFailed,
            ParseError::Output(_) => ErrorCode::OutputFailed,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.code().as_i32()
    }
}
