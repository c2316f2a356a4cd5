//! Flag declarations.
//!
//! A [`Flag`] is the immutable, validated form of a [`FlagConfig`]. Whether a
//! flag was passed on a given invocation is never stored on the declaration;
//! it comes back from the matcher as a [`FlagMatch`](crate::FlagMatch).

use serde::{Deserialize, Serialize};

use crate::error::DeclarationError;

/// Names no user declaration may take. Commands and flags share this list.
pub const RESERVED_NAMES: &[&str] = &["help"];

/// Name of the built-in global help switch.
pub const HELP_FLAG: &str = "help";

/// How a flag is written and whether it carries a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    /// Presence only, written `--name`
    #[default]
    Switch,
    /// Carries a string, written `-name value`, `-name=value` or `-name="value"`
    Value,
}

impl FlagKind {
    /// Dashes that precede the flag name on the command line.
    pub fn dashes(self) -> &'static str {
        match self {
            FlagKind::Switch => "--",
            FlagKind::Value => "-",
        }
    }
}

/// User-facing description of a flag, as written in code or in a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagConfig {
    /// Name without the leading dashes, typically kebab-case
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Fail the parse when the flag is absent
    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub kind: FlagKind,

    /// Fallback value for value flags. Switches must leave this unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl FlagConfig {
    pub fn switch(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn value(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: FlagKind::Value,
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A validated flag declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    name: String,
    description: String,
    kind: FlagKind,
    required: bool,
    default: String,
    #[serde(skip)]
    builtin: bool,
}

impl Flag {
    /// Build a flag from its config.
    ///
    /// Fails when the name is malformed or reserved, or when a switch
    /// declares a default.
    pub fn new(config: FlagConfig) -> Result<Self, DeclarationError> {
        validate_name(&config.name)?;
        if config.kind == FlagKind::Switch && config.default.is_some() {
            return Err(DeclarationError::SwitchWithDefault(config.name));
        }

        Ok(Self {
            name: config.name,
            description: config.description,
            kind: config.kind,
            required: config.required,
            default: config.default.unwrap_or_default(),
            builtin: false,
        })
    }

    /// The global `--help` switch every engine carries.
    pub(crate) fn help() -> Self {
        Self {
            name: HELP_FLAG.to_string(),
            description: "If specified along with a valid command, prints out help for that command."
                .to_string(),
            kind: FlagKind::Switch,
            required: false,
            default: String::new(),
            builtin: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    pub fn is_switch(&self) -> bool {
        self.kind == FlagKind::Switch
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Declared default; empty when none was given.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// The flag as it appears on the command line, e.g. `--open` or `-port`.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.kind.dashes(), self.name)
    }
}

/// Check a command or flag name against the naming rules and the reserved
/// list.
pub(crate) fn validate_name(name: &str) -> Result<(), DeclarationError> {
    if name.is_empty()
        || name.starts_with('-')
        || name.contains('=')
        || name.chars().any(char::is_whitespace)
    {
        return Err(DeclarationError::InvalidName(name.to_string()));
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(DeclarationError::ReservedName(name.to_string()));
    }
    Ok(())
}
