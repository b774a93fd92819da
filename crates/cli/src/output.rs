//! Output formatting for CLI

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use loginsuite_e2e::embed::short_commit;
use loginsuite_e2e::RunSummary;

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;

    /// Lines printed below the table in human-readable formats.
    fn details(&self) -> Vec<String> {
        Vec::new()
    }
}

impl TableDisplay for RunSummary {
    fn headers() -> Vec<&'static str> {
        vec!["Total", "Passed", "Failed", "Skipped", "Duration", "Branch", "Commit"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.total.to_string(),
            self.passed.to_string(),
            self.failed.to_string(),
            self.skipped.to_string(),
            self.duration.clone(),
            self.branch.clone(),
            short_commit(&self.commit),
        ]
    }

    fn details(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .failed_tests
            .iter()
            .map(|t| format!("  ✗ {}", t))
            .collect();
        if !lines.is_empty() {
            lines.insert(0, "Failed tests:".to_string());
        }
        if let Some(url) = &self.report_url {
            lines.push(format!("Report: {}", url));
        }
        lines
    }
}

/// Render a single item
pub fn render_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(T::headers());
            table.add_row(item.row());

            let mut out = table.to_string();
            for line in item.details() {
                out.push('\n');
                out.push_str(&line);
            }
            out
        }
        OutputFormat::Json => serde_json::to_string_pretty(item).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(item).unwrap_or_default(),
        OutputFormat::Plain => {
            let row = item.row();
            let mut lines: Vec<String> = T::headers()
                .iter()
                .zip(row.iter())
                .map(|(header, value)| format!("{}: {}", header, value))
                .collect();
            lines.extend(item.details());
            lines.join("\n")
        }
    }
}

/// Print a single item
pub fn print_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) {
    println!("{}", render_item(item, format));
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}
