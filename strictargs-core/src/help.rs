//! Help and info text.
//!
//! The engine only decides *when* help is shown. What it looks like is up to
//! a [`HelpRenderer`]; [`PlainRenderer`] is the uncoloured default.

use crate::command::Command;
use crate::flag::{Flag, FlagKind};

/// Read-only view of everything a CLI declares.
#[derive(Debug, Clone, Copy)]
pub struct CliInfo<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    /// In registration order, built-ins first
    pub commands: &'a [Command],
    pub global_flags: &'a [Flag],
}

pub trait HelpRenderer {
    /// Listing shown when the tool runs without arguments.
    fn render_info(&self, cli: &CliInfo<'_>) -> String;

    /// Text shown by `help <command>` or `<command> --help`.
    fn render_command_help(&self, cli: &CliInfo<'_>, command: &Command) -> String;
}

/// Syntax line for the whole tool.
pub fn cli_syntax(cli: &CliInfo<'_>) -> String {
    format!("{} <command> [<args>...]", cli.name)
}

/// Syntax line for one command, honouring its syntax hint.
pub fn command_syntax(cli: &CliInfo<'_>, command: &Command) -> String {
    match command.syntax_hint() {
        Some(hint) => format!("{} {}", cli.name, hint),
        None => format!("{} {} [args...] [options...]", cli.name, command.name()),
    }
}

/// How a flag is written in an option listing.
pub fn flag_usage(flag: &Flag) -> String {
    match flag.kind() {
        FlagKind::Switch => flag.full_name(),
        FlagKind::Value => format!("{}[= ]<value>", flag.full_name()),
    }
}

/// Description plus `(required)` / `(default: x)` notes.
pub fn flag_summary(flag: &Flag) -> String {
    let mut summary = flag.description().to_string();
    if flag.is_required() {
        summary.push_str(" (required)");
    }
    if !flag.default_value().is_empty() {
        summary.push_str(&format!(" (default: {})", flag.default_value()));
    }
    summary.trim_start().to_string()
}

/// Plain two-column text, no colours.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl PlainRenderer {
    fn columns(rows: &[(String, String)]) -> String {
        let width = rows.iter().map(|(left, _)| left.chars().count()).max().unwrap_or(0);
        rows.iter()
            .map(|(left, right)| format!("  {left:<width$}  {right}").trim_end().to_string() + "\n")
            .collect()
    }

    fn flag_rows(flags: &[Flag]) -> Vec<(String, String)> {
        flags
            .iter()
            .map(|flag| (flag_usage(flag), flag_summary(flag)))
            .collect()
    }
}

impl HelpRenderer for PlainRenderer {
    fn render_info(&self, cli: &CliInfo<'_>) -> String {
        let mut output = format!("{}\n\n", cli_syntax(cli));
        if let Some(description) = cli.description.filter(|d| !d.is_empty()) {
            output.push_str(&format!("{description}\n\n"));
        }
        output.push_str("Available commands:\n\n");

        let rows: Vec<(String, String)> = cli
            .commands
            .iter()
            .map(|command| (command.name().to_string(), command.description().to_string()))
            .collect();
        output.push_str(&Self::columns(&rows));
        output
    }

    fn render_command_help(&self, cli: &CliInfo<'_>, command: &Command) -> String {
        let mut output = format!("{}\n\n{}\n", command_syntax(cli, command), command.long_description());

        if !command.flags().is_empty() {
            output.push_str("\nAvailable options:\n\n");
            output.push_str(&Self::columns(&Self::flag_rows(command.flags())));
        }
        if !cli.global_flags.is_empty() {
            output.push_str("\nGlobal options:\n\n");
            output.push_str(&Self::columns(&Self::flag_rows(cli.global_flags)));
        }
        output
    }
}
