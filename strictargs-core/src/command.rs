//! Command declarations.

use serde::{Deserialize, Serialize};

use crate::args_processor::{ArgsProcessor, ProcessedArgs};
use crate::error::{CommandError, DeclarationError};
use crate::flag::{validate_name, Flag, FlagConfig};

/// Name of the built-in help command.
pub const HELP_COMMAND: &str = "help";

/// User-facing description of a command, as written in code or in a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Single word, no whitespace, e.g. `run`
    pub name: String,

    /// One-line summary shown in the command listing
    #[serde(default)]
    pub description: String,

    /// Shown by `help <command>`; falls back to `description`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,

    /// Replaces the generated `<name> [args...] [options...]` syntax line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax_hint: Option<String>,

    #[serde(default)]
    pub allow_positional_args: bool,

    #[serde(default)]
    pub flags: Vec<FlagConfig>,
}

impl CommandConfig {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn long_description(mut self, long_description: impl Into<String>) -> Self {
        self.long_description = Some(long_description.into());
        self
    }

    pub fn syntax_hint(mut self, syntax_hint: impl Into<String>) -> Self {
        self.syntax_hint = Some(syntax_hint.into());
        self
    }

    pub fn allow_positional_args(mut self) -> Self {
        self.allow_positional_args = true;
        self
    }

    pub fn flag(mut self, flag: FlagConfig) -> Self {
        self.flags.push(flag);
        self
    }
}

/// A validated command declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    name: String,
    description: String,
    long_description: String,
    syntax_hint: Option<String>,
    allow_positional_args: bool,
    flags: Vec<Flag>,
    #[serde(skip)]
    builtin: bool,
}

impl Command {
    /// Build a command and all of its flags.
    ///
    /// Fails when the command name is malformed or reserved, when any flag
    /// fails to build, or when two flags share a name.
    pub fn new(config: CommandConfig) -> Result<Self, DeclarationError> {
        validate_name(&config.name)?;

        let mut flags: Vec<Flag> = Vec::with_capacity(config.flags.len());
        for flag_config in config.flags {
            let flag = Flag::new(flag_config)?;
            if flags.iter().any(|existing| existing.name() == flag.name()) {
                return Err(DeclarationError::DuplicateCommandFlag {
                    flag: flag.name().to_string(),
                    command: config.name,
                });
            }
            flags.push(flag);
        }

        let long_description = config
            .long_description
            .unwrap_or_else(|| config.description.clone());

        Ok(Self {
            name: config.name,
            description: config.description,
            long_description,
            syntax_hint: config.syntax_hint,
            allow_positional_args: config.allow_positional_args,
            flags,
            builtin: false,
        })
    }

    /// The `help <command>` command every engine carries.
    pub(crate) fn help() -> Self {
        let description = "Prints out information about a specified command.".to_string();
        Self {
            name: HELP_COMMAND.to_string(),
            long_description: description.clone(),
            description,
            syntax_hint: Some("help <command>".to_string()),
            allow_positional_args: true,
            flags: Vec::new(),
            builtin: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    pub fn syntax_hint(&self) -> Option<&str> {
        self.syntax_hint.as_deref()
    }

    pub fn allows_positional_args(&self) -> bool {
        self.allow_positional_args
    }

    /// Flags in declaration order.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn flag(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|flag| flag.name() == name)
    }

    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Reduce the tokens that followed this command's name.
    pub fn parse(&self, tokens: &[String]) -> Result<ProcessedArgs, CommandError> {
        ArgsProcessor::new(self).process_args(tokens)
    }
}
