use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

use crate::error::ProxyError;
use crate::services::proxy::{Outcome, ProxyStats};

pub struct DisplayFormatter;

impl DisplayFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_header(&self, text: &str) -> String {
        format!("\n=== {} ===", text.bright_white().bold())
    }

    pub fn format_outcome(&self, outcome: Outcome) -> String {
        match outcome {
            Outcome::Hit => "[HIT] ".green().to_string(),
            Outcome::Miss => "[MISS]".yellow().to_string(),
        }
    }

    pub fn format_response(&self, response: &str, outcome: Outcome) -> String {
        format!("{} {}", self.format_outcome(outcome), response)
    }

    pub fn format_error(&self, error: &ProxyError) -> String {
        format!("[DENIED] {}", error).red().to_string()
    }

    pub fn format_stats_table(&self, stats: &ProxyStats, cached_entries: usize) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        table.add_row(Row::new(vec![
            Cell::new("Metric").style_spec("b"),
            Cell::new("Value").style_spec("b"),
        ]));

        let rows = [
            ("Hits", stats.hits.to_string()),
            ("Misses", stats.misses.to_string()),
            ("Denials", stats.denials.to_string()),
            ("Stored entries", cached_entries.to_string()),
        ];
        for (label, value) in rows {
            table.add_row(Row::new(vec![Cell::new(label), Cell::new(&value)]));
        }

        table.to_string()
    }
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new()
    }
}
