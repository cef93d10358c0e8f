use crate::api::models::Pagination;
use crate::display::format::{Column, Record, extract, format_value, to_document};
use crate::error::DisplayError;
use clap::ValueEnum;
use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets};
use crossterm::style::Stylize;
use serde_json::Value;
use std::io::Write;

/// How successful command output is presented on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-oriented tables
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Block-style YAML
    Yaml,
}

/// Renders records in the selected [`OutputFormat`].
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    format: OutputFormat,
    use_colors: bool,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            use_colors: true,
        }
    }

    /// Set color usage
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a list of records, one row per record.
    ///
    /// The "Showing X of Y total" footer is only produced in table mode and
    /// only when pagination is known.
    pub fn render_list<T: Record>(
        &self,
        items: &[T],
        columns: &[Column],
        pagination: Option<&Pagination>,
    ) -> Result<String, DisplayError> {
        match self.format {
            OutputFormat::Table => Ok(self.list_table(items, columns, pagination)),
            OutputFormat::Json | OutputFormat::Yaml => {
                let documents = items
                    .iter()
                    .map(|item| to_document(item))
                    .collect::<Result<Vec<_>, _>>()?;
                self.structured(&Value::Array(documents))
            }
        }
    }

    /// Render a single record as a key/value view.
    pub fn render_detail(&self, item: &dyn Record, fields: &[Column]) -> Result<String, DisplayError> {
        match self.format {
            OutputFormat::Table if !fields.is_empty() => Ok(self.detail_table(item, fields)),
            // No declared fields means no meaningful key/value table.
            OutputFormat::Table => pretty_json(&to_document(item)?),
            OutputFormat::Json | OutputFormat::Yaml => self.structured(&to_document(item)?),
        }
    }

    pub fn print_list<T: Record>(
        &self,
        items: &[T],
        columns: &[Column],
        pagination: Option<&Pagination>,
    ) -> Result<(), DisplayError> {
        write_stdout(&self.render_list(items, columns, pagination)?)
    }

    pub fn print_detail(&self, item: &dyn Record, fields: &[Column]) -> Result<(), DisplayError> {
        write_stdout(&self.render_detail(item, fields)?)
    }

    /// Write text as-is, e.g. a CSV export, whatever the output format.
    pub fn print_raw(&self, text: &str) -> Result<(), DisplayError> {
        write_stdout(text.trim_end_matches('\n'))
    }

    fn list_table<T: Record>(
        &self,
        items: &[T],
        columns: &[Column],
        pagination: Option<&Pagination>,
    ) -> String {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(columns.iter().map(|column| {
            let cell = Cell::new(column.header);
            if self.use_colors {
                cell.add_attribute(Attribute::Bold)
            } else {
                cell
            }
        }));

        for item in items {
            table.add_row(
                columns
                    .iter()
                    .map(|column| Cell::new(format_value(&extract(item, column.path)))),
            );
        }

        let mut output = table.to_string();
        if let Some(pagination) = pagination {
            let footer = format!("Showing {} of {} total", items.len(), pagination.total_count);
            output.push('\n');
            output.push_str(&self.dimmed(footer));
        }
        output
    }

    fn detail_table(&self, item: &dyn Record, fields: &[Column]) -> String {
        let mut table = Table::new();
        table.load_preset(presets::NOTHING);
        table.set_content_arrangement(ContentArrangement::Dynamic);

        for field in fields {
            let key = Cell::new(field.header);
            let key = if self.use_colors {
                key.add_attribute(Attribute::Bold)
            } else {
                key
            };
            table.add_row(vec![key, Cell::new(format_value(&extract(item, field.path)))]);
        }

        table.to_string()
    }

    fn structured(&self, document: &Value) -> Result<String, DisplayError> {
        match self.format {
            OutputFormat::Yaml => Ok(serde_yaml::to_string(document)?.trim_end().to_string()),
            _ => pretty_json(document),
        }
    }

    fn dimmed(&self, text: String) -> String {
        if self.use_colors {
            text.dim().to_string()
        } else {
            text
        }
    }
}

fn pretty_json(document: &Value) -> Result<String, DisplayError> {
    Ok(serde_json::to_string_pretty(document)?)
}

fn write_stdout(rendered: &str) -> Result<(), DisplayError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered).map_err(|e| DisplayError::TerminalOutput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::format::LooseRecord;
    use serde_json::json;

    const COLUMNS: [Column; 2] = [Column::new("ID", "id"), Column::new("Name", "name")];

    fn items() -> Vec<Value> {
        vec![
            json!({"id": "p_1", "name": "Starter", "is_archived": false}),
            json!({"id": "p_2", "name": null, "is_archived": true}),
        ]
    }

    fn plain(format: OutputFormat) -> Renderer {
        Renderer::new(format).with_colors(false)
    }

    fn pagination(total_count: u64) -> Pagination {
        Pagination {
            total_count,
            max_page: 3,
        }
    }

    #[test]
    fn test_table_list_with_pagination_footer() {
        let output = plain(OutputFormat::Table)
            .render_list(&items(), &COLUMNS, Some(&pagination(50)))
            .expect("render");

        assert!(output.contains("ID"));
        assert!(output.contains("Name"));
        assert!(output.contains("p_1"));
        assert!(output.contains("Starter"));
        assert!(output.contains("p_2"));
        assert!(output.lines().any(|line| line.contains("p_2") && line.contains('-')));
        assert_eq!(output.lines().last(), Some("Showing 2 of 50 total"));
    }

    #[test]
    fn test_table_list_without_pagination_has_no_footer() {
        let output = plain(OutputFormat::Table)
            .render_list(&items(), &COLUMNS, None)
            .expect("render");
        assert!(!output.contains("Showing"));
    }

    #[test]
    fn test_json_list_is_raw_and_has_no_footer() {
        let output = plain(OutputFormat::Json)
            .render_list(&items(), &COLUMNS, Some(&pagination(50)))
            .expect("render");

        assert!(!output.contains("Showing"));
        let parsed: Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(parsed, Value::Array(items()));
        assert!(output.contains("\n  {\n    \"id\": \"p_1\""));
    }

    #[test]
    fn test_yaml_detail_keeps_insertion_order() {
        let item = json!({"zeta": 1, "alpha": true, "tags": ["a", "b"]});
        let output = plain(OutputFormat::Yaml)
            .render_detail(&item, &COLUMNS)
            .expect("render");

        assert_eq!(output, "zeta: 1\nalpha: true\ntags:\n- a\n- b");
    }

    #[test]
    fn test_table_detail_is_humanized() {
        let item = json!({
            "id": "c_1",
            "email": "a@example.com",
            "created_at": "2024-01-02T03:04:05Z",
            "verified": true,
        });
        let fields = [
            Column::new("ID", "id"),
            Column::new("Created", "created_at"),
            Column::new("Verified", "verified"),
            Column::new("Name", "name"),
        ];
        let output = plain(OutputFormat::Table)
            .render_detail(&item, &fields)
            .expect("render");

        assert!(output.contains("2024-01-02 03:04"));
        assert!(output.lines().any(|line| line.contains("Verified") && line.contains("Yes")));
        assert!(output.lines().any(|line| line.contains("Name") && line.contains('-')));
        assert!(!output.contains("a@example.com"));
    }

    #[test]
    fn test_table_detail_without_fields_falls_back_to_json() {
        let record = LooseRecord::new()
            .with("environment", "production")
            .with("authenticated", false);
        let output = plain(OutputFormat::Table)
            .render_detail(&record, &[])
            .expect("render");

        let parsed: Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(parsed, json!({"environment": "production", "authenticated": false}));
    }

    #[test]
    fn test_json_detail_is_not_humanized() {
        let item = json!({"active": true, "deleted_at": null});
        let output = plain(OutputFormat::Json)
            .render_detail(&item, &COLUMNS)
            .expect("render");
        assert_eq!(output, "{\n  \"active\": true,\n  \"deleted_at\": null\n}");
    }
}
