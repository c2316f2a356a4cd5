//! Strict, declarative command-line parsing.
//!
//! Declare commands and flags up front, then hand the engine a raw argument
//! vector. Anything that wasn't declared (an unknown command, an unknown
//! flag, a stray positional argument) is an error rather than being ignored.
//!
//! ```no_run
//! use strictargs_core::{CommandConfig, FlagConfig, ParsedCommand, StrictArgs};
//!
//! let mut cli = StrictArgs::new("fake-cli").with_description("A fake CLI.");
//! cli.register_command(
//!     CommandConfig::new("start", "Starts the webserver.")
//!         .flag(FlagConfig::value("port", "Port to listen on.").with_default("8080"))
//!         .flag(FlagConfig::switch("open", "Open a browser.")),
//! )?;
//! cli.add_command_listener(
//!     "start",
//!     |command: &ParsedCommand, _args: &[String]| -> anyhow::Result<()> {
//!         println!("port {}", command.get("port")?);
//!         Ok(())
//!     },
//! )?;
//! cli.parse_env()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod args_processor;
mod command;
mod engine;
mod error;
mod flag;
pub mod help;
mod listener;
mod manifest;
mod parsed;
mod reporter;

pub use args_processor::{ArgsProcessor, FlagMatch, ProcessedArgs};
pub use command::{Command, CommandConfig, HELP_COMMAND};
pub use engine::{ParseOutcome, StrictArgs};
pub use error::{AccessError, CommandError, DeclarationError, ErrorCode, FlagError, ParseError};
pub use flag::{Flag, FlagConfig, FlagKind, HELP_FLAG, RESERVED_NAMES};
pub use help::{CliInfo, HelpRenderer, PlainRenderer};
pub use listener::CommandListener;
pub use manifest::{CliManifest, CliSection, ManifestError};
pub use parsed::{ParsedCommand, ParsedFlag, ParsedFlags};
pub use reporter::{FailureReporter, ThrowingReporter};
