//! CLI manifests.
//!
//! A whole CLI can be declared in TOML instead of code:
//!
//! ```toml
//! [cli]
//! name = "fake-cli"
//! description = "A fake CLI tool."
//!
//! [[global_flags]]
//! name = "verbose"
//! description = "Print more."
//!
//! [[commands]]
//! name = "start"
//! description = "Starts the webserver."
//! allow_positional_args = true
//!
//! [[commands.flags]]
//! name = "port"
//! kind = "value"
//! default = "8080"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::CommandConfig;
use crate::engine::StrictArgs;
use crate::error::DeclarationError;
use crate::flag::FlagConfig;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid manifest: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid declaration: {0}")]
    Declaration(#[from] DeclarationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliManifest {
    pub cli: CliSection,
    #[serde(default)]
    pub global_flags: Vec<FlagConfig>,
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliSection {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CliManifest {
    pub fn from_toml_str(source: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Register everything the manifest declares on a fresh engine. Global
    /// flags are registered before commands.
    pub fn build(&self) -> Result<StrictArgs, ManifestError> {
        let mut engine = StrictArgs::new(&self.cli.name);
        if let Some(description) = &self.cli.description {
            engine = engine.with_description(description);
        }
        for flag in &self.global_flags {
            engine.register_global_flag(flag.clone())?;
        }
        for command in &self.commands {
            engine.register_command(command.clone())?;
        }
        Ok(engine)
    }
}
