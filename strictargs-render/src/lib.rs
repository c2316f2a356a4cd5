//! Coloured terminal help for strictargs.

use ansi_term::Colour::{Blue, Cyan, Yellow};
use ansi_term::Style;
use strictargs_core::help::{cli_syntax, command_syntax, flag_summary, flag_usage};
use strictargs_core::{CliInfo, Command, Flag, HelpRenderer};

mod table;
pub use table::{Cell, Table, TableStyle};

/// Widest a description column gets before it is truncated.
const DESCRIPTION_MAX_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy)]
pub struct CliRenderer {
    style: TableStyle,
    colored: bool,
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            style: TableStyle::Borderless,
            colored: true,
        }
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Turn ANSI styling on or off, e.g. when output is not a terminal.
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.colored && !text.is_empty() {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        format!("{}\n\n", self.paint(Yellow.bold(), text))
    }

    fn table(&self) -> Table {
        let mut table = Table::new(self.style);
        table.set_column_max_width(1, Some(DESCRIPTION_MAX_WIDTH));
        table
    }

    fn flag_table(&self, flags: &[Flag]) -> String {
        let mut table = self.table();
        for flag in flags {
            table.add_row(vec![
                Cell::new(self.paint(Cyan.normal(), &flag_usage(flag))),
                Cell::new(self.paint(Style::new().dimmed(), &flag_summary(flag))),
            ]);
        }
        table.render()
    }
}

impl HelpRenderer for CliRenderer {
    fn render_info(&self, cli: &CliInfo<'_>) -> String {
        let mut output = format!("{}\n\n", self.paint(Blue.bold(), &cli_syntax(cli)));
        if let Some(description) = cli.description.filter(|d| !d.is_empty()) {
            output.push_str(&format!("{description}\n\n"));
        }
        output.push_str(&self.heading("Available commands:"));

        let mut table = self.table();
        for command in cli.commands {
            table.add_row(vec![
                Cell::new(self.paint(Cyan.bold(), command.name())),
                Cell::new(command.description()),
            ]);
        }
        output.push_str(&table.render());
        output
    }

    fn render_command_help(&self, cli: &CliInfo<'_>, command: &Command) -> String {
        let mut output = format!(
            "{}\n\n{}\n",
            self.paint(Blue.bold(), &command_syntax(cli, command)),
            command.long_description()
        );

        if !command.flags().is_empty() {
            output.push('\n');
            output.push_str(&self.heading("Available options:"));
            output.push_str(&self.flag_table(command.flags()));
        }
        if !cli.global_flags.is_empty() {
            output.push('\n');
            output.push_str(&self.heading("Global options:"));
            output.push_str(&self.flag_table(cli.global_flags));
        }
        output
    }
}
