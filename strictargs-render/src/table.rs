// ANSI color codes
const BORDER_COLOR: &str = "\x1B[38;5;67m"; // Steel blue
const RESET: &str = "\x1B[0m";

/// Indent of a borderless table
const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStyle {
    /// Aligned columns, no rules. Used for option and command listings.
    #[default]
    Borderless,
    /// Box-drawn rules around every cell
    Bordered,
}

/// One table cell. The text may already carry ANSI styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell(pub String);

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub(crate) fn strip_ansi(text: &str) -> String {
        let mut result = String::new();
        let mut chars = text.chars();

        while let Some(c) = chars.next() {
            if c == '\x1B' {
                // Skip until the terminating 'm'
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    fn truncate_text(text: &str, max_width: usize) -> String {
        if max_width == 0 || Self::strip_ansi(text).chars().count() <= max_width {
            return text.to_string();
        }

        // Keep max_width-1 visible chars to leave room for the ellipsis
        let mut result = String::new();
        let mut current_width = 0;
        let mut in_ansi = false;

        for c in text.chars() {
            if c == '\x1B' {
                in_ansi = true;
                result.push(c);
            } else if in_ansi {
                result.push(c);
                in_ansi = c != 'm';
            } else if current_width < max_width - 1 {
                result.push(c);
                current_width += 1;
            } else if current_width == max_width - 1 {
                result.push('…');
                current_width += 1;
            }
        }
        result
    }

    /// Visible width, ignoring escape sequences.
    pub fn width(&self) -> usize {
        Self::strip_ansi(&self.0).chars().count()
    }

    pub fn render(&self, max_width: Option<usize>) -> String {
        match max_width {
            Some(max) => Self::truncate_text(&self.0, max),
            None => self.0.clone(),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
    column_widths: Vec<usize>,
    column_max_widths: Vec<Option<usize>>,
    style: TableStyle,
}

impl Table {
    pub fn new(style: TableStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn set_column_max_width(&mut self, column: usize, max_width: Option<usize>) {
        if column >= self.column_max_widths.len() {
            self.column_max_widths.resize(column + 1, None);
        }
        self.column_max_widths[column] = max_width;
        if let (Some(max), Some(width)) = (max_width, self.column_widths.get_mut(column)) {
            *width = (*width).min(max);
        }
    }

    pub fn add_row(&mut self, row: Vec<Cell>) {
        for (i, cell) in row.iter().enumerate() {
            if i >= self.column_widths.len() {
                self.column_widths.push(0);
            }
            if i >= self.column_max_widths.len() {
                self.column_max_widths.push(None);
            }
            let width = match self.column_max_widths[i] {
                Some(max) => cell.width().min(max),
                None => cell.width(),
            };
            self.column_widths[i] = self.column_widths[i].max(width);
        }
        self.rows.push(row);
    }

    fn max_width(&self, column: usize) -> Option<usize> {
        self.column_max_widths.get(column).copied().flatten()
    }

    fn pad_cell(text: &str, width: usize) -> String {
        let text_width = Cell::strip_ansi(text).chars().count();
        format!("{}{}", text, " ".repeat(width.saturating_sub(text_width)))
    }

    fn render_separator(&self, left: &str, middle: &str, right: &str) -> String {
        let parts: Vec<String> = self
            .column_widths
            .iter()
            .map(|width| "─".repeat(width + 2))
            .collect();
        format!("{BORDER_COLOR}{left}{}{right}{RESET}\n", parts.join(middle))
    }

    fn render_borderless(&self) -> String {
        let mut output = String::new();
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| Self::pad_cell(&cell.render(self.max_width(i)), self.column_widths[i]))
                .collect();
            output.push_str(INDENT);
            output.push_str(cells.join("  ").trim_end());
            output.push('\n');
        }
        output
    }

    fn render_bordered(&self) -> String {
        let bar = format!("{BORDER_COLOR}│{RESET}");
        let mut output = self.render_separator("┌", "┬", "┐");

        for (i, row) in self.rows.iter().enumerate() {
            let cells: Vec<String> = self
                .column_widths
                .iter()
                .enumerate()
                .map(|(column, width)| {
                    let text = row
                        .get(column)
                        .map(|cell| cell.render(self.max_width(column)))
                        .unwrap_or_default();
                    format!(" {} ", Self::pad_cell(&text, *width))
                })
                .collect();
            output.push_str(&format!("{bar}{}{bar}\n", cells.join(&bar)));

            if i < self.rows.len() - 1 {
                output.push_str(&self.render_separator("├", "┼", "┤"));
            }
        }

        output.push_str(&self.render_separator("└", "┴", "┘"));
        output
    }

    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        match self.style {
            TableStyle::Borderless => self.render_borderless(),
            TableStyle::Bordered => self.render_bordered(),
        }
    }
}
