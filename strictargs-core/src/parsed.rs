//! Per-invocation parse results.
//!
//! Declarations stay untouched while parsing; everything learned from one
//! invocation lives in these values and is handed to listeners.

use serde::Serialize;

use crate::args_processor::{FlagMatch, ProcessedArgs};
use crate::command::Command;
use crate::error::AccessError;
use crate::flag::Flag;

/// A declared flag together with what the matcher found for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedFlag {
    flag: Flag,
    #[serde(flatten)]
    matched: FlagMatch,
}

impl ParsedFlag {
    pub fn new(flag: Flag, matched: FlagMatch) -> Self {
        Self { flag, matched }
    }

    pub fn name(&self) -> &str {
        self.flag.name()
    }

    pub fn flag(&self) -> &Flag {
        &self.flag
    }

    pub fn matched(&self) -> &FlagMatch {
        &self.matched
    }

    pub fn is_present(&self) -> bool {
        self.matched.present
    }

    /// Value of a value flag: the matched value, or the declared default
    /// when the flag was not passed.
    pub fn get(&self) -> Result<&str, AccessError> {
        if self.flag.is_switch() {
            return Err(AccessError::NotAValueFlag(self.flag.name().to_string()));
        }
        Ok(self
            .matched
            .value
            .as_deref()
            .unwrap_or_else(|| self.flag.default_value()))
    }
}

/// Parsed flags of one scope, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedFlags {
    entries: Vec<ParsedFlag>,
}

impl ParsedFlags {
    pub(crate) fn push(&mut self, flag: ParsedFlag) {
        self.entries.push(flag);
    }

    pub fn find(&self, name: &str) -> Option<&ParsedFlag> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    /// `false` for names that were never declared.
    pub fn is_present(&self, name: &str) -> bool {
        self.find(name).is_some_and(ParsedFlag::is_present)
    }

    pub fn get(&self, name: &str) -> Result<&str, AccessError> {
        self.find(name)
            .ok_or_else(|| AccessError::UnknownFlag(name.to_string()))?
            .get()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParsedFlag> {
        self.entries.iter()
    }

    /// Only the flags that were passed.
    pub fn present(&self) -> impl Iterator<Item = &ParsedFlag> {
        self.entries.iter().filter(|entry| entry.is_present())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A fully parsed command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCommand {
    name: String,
    flags: ParsedFlags,
    globals: ParsedFlags,
    positional_args: Vec<String>,
    #[serde(skip)]
    allow_positional_args: bool,
}

impl ParsedCommand {
    pub fn new(command: &Command, processed: ProcessedArgs, globals: ParsedFlags) -> Self {
        Self {
            name: command.name().to_string(),
            flags: processed.flags,
            globals,
            positional_args: processed.positional_args,
            allow_positional_args: command.allows_positional_args(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The command's own flags.
    pub fn flags(&self) -> &ParsedFlags {
        &self.flags
    }

    /// Global flags of the same invocation.
    pub fn globals(&self) -> &ParsedFlags {
        &self.globals
    }

    /// Looks in the command's flags first, then in the globals.
    pub fn is_present(&self, name: &str) -> bool {
        self.flags.is_present(name) || self.globals.is_present(name)
    }

    /// Looks in the command's flags first, then in the globals.
    pub fn get(&self, name: &str) -> Result<&str, AccessError> {
        match self.flags.find(name).or_else(|| self.globals.find(name)) {
            Some(flag) => flag.get(),
            None => Err(AccessError::UnknownFlag(name.to_string())),
        }
    }

    /// Leftover arguments. Fails for commands that don't accept them.
    pub fn args(&self) -> Result<&[String], AccessError> {
        if !self.allow_positional_args {
            return Err(AccessError::PositionalArgsNotAllowed(self.name.clone()));
        }
        Ok(&self.positional_args)
    }
}
