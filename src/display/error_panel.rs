//! Error panel written to stderr when a command fails

use crate::core::classify::{CliFailure, ErrorCategory};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use crossterm::style::Stylize;
use std::io::Write;

const PANEL_WIDTH: u16 = 60;

#[derive(Debug, Clone, Copy)]
pub struct ErrorPanel {
    use_colors: bool,
}

impl ErrorPanel {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Bordered panel titled with the failure category, followed by the hint line.
    pub fn render(&self, failure: &CliFailure) -> String {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_width(PANEL_WIDTH);

        let title = Cell::new(failure.title());
        let title = if self.use_colors {
            title.add_attribute(Attribute::Bold).fg(Color::Red)
        } else {
            title
        };
        table.set_header(vec![title]);
        table.add_row(vec![Cell::new(self.body(failure))]);

        let mut output = table.to_string();
        if let Some(hint) = &failure.hint {
            let line = format!("Hint: {}", hint);
            output.push('\n');
            if self.use_colors {
                output.push_str(&line.dim().to_string());
            } else {
                output.push_str(&line);
            }
        }
        output
    }

    pub fn print(&self, failure: &CliFailure) {
        let mut stderr = std::io::stderr().lock();
        // Nothing sensible is left to report to if stderr itself is gone.
        let _ = writeln!(stderr, "{}", self.render(failure));
    }

    fn body(&self, failure: &CliFailure) -> String {
        match &failure.category {
            ErrorCategory::Validation(errors) if self.use_colors && !errors.is_empty() => errors
                .iter()
                .map(|e| format!("  {}: {}", e.location.as_str().bold(), e.message))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => failure.message.clone(),
        }
    }
}
