//! Table formatting utilities for CLI list commands
//!
//! Every list command builds [`TableRow`]s of typed [`CellValue`]s and hands
//! them to a [`TableFormatter`], which renders TSV (colored on a terminal),
//! CSV, Markdown, or bare keys. JSON and YAML output is produced by the
//! commands themselves from the underlying records.

use chrono::{DateTime, Local, NaiveDate, Utc};
use console::style;
use rust_decimal::Decimal;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::entities::production_order::OrderStatus;

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Entity ID (truncated, cyan colored)
    Id(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Money or cost, always shown with two decimals
    Money(Decimal),
    /// Measured quantity shown as stored
    Measure(Decimal),
    /// Production order status with color coding
    Status(OrderStatus),
    /// Yes/no flag
    Flag(bool),
    Date(NaiveDate),
    /// DateTime displayed as local date only
    Created(DateTime<Utc>),
    Number(i64),
    Empty,
}

impl CellValue {
    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => {
                let display = if id.len() > 16 {
                    format!("{}...", &id[..13])
                } else {
                    id.clone()
                };
                format!("{:<width$}", style(&display).cyan(), width = width)
            }
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Money(_) | CellValue::Measure(_) | CellValue::Number(_) => {
                format!("{:>width$}", self.raw(), width = width)
            }
            CellValue::Status(status) => {
                let s = status.to_string();
                let styled = match status {
                    OrderStatus::Pending => style(&s).dim(),
                    OrderStatus::Approved => style(&s).white(),
                    OrderStatus::InProduction => style(&s).yellow(),
                    OrderStatus::QualityCheck => style(&s).magenta(),
                    OrderStatus::Completed => style(&s).green(),
                    OrderStatus::Cancelled => style(&s).red().dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Flag(b) => {
                let styled = if *b {
                    style("yes").green()
                } else {
                    style("no").dim()
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Date(_) | CellValue::Created(_) => {
                format!("{:<width$}", self.raw(), width = width)
            }
            CellValue::Empty => format!("{:<width$}", "-", width = width),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) => escape_csv(s),
            other => other.raw(),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Flag(true) => "**yes**".to_string(),
            CellValue::Empty => "-".to_string(),
            other => other.raw(),
        };
        raw.replace('|', "\\|")
    }

    /// Get raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) => s.clone(),
            CellValue::Money(d) => format!("{:.2}", d.round_dp(2)),
            CellValue::Measure(d) => d.normalize().to_string(),
            CellValue::Status(status) => status.to_string(),
            CellValue::Flag(b) => String::from(if *b { "yes" } else { "no" }),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Created(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                local.format("%Y-%m-%d").to_string()
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Id(id) => id.len().min(16),
            CellValue::Status(status) => status.to_string().len(),
            CellValue::Flag(_) => 3,
            CellValue::Date(_) | CellValue::Created(_) => 10,
            CellValue::Empty => 1,
            other => other.raw().len(),
        }
    }
}

/// Column definition with header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values, identified by the record's natural key
pub struct TableRow {
    pub key: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            show_summary: true,
        }
    }

    /// Omit the trailing "N record(s) found" line
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.show_summary = !quiet;
        self
    }

    /// Output rows in the specified format
    pub fn output<I>(&self, rows: I, format: OutputFormat)
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();

        match format {
            OutputFormat::Csv => self.output_csv(&rows),
            OutputFormat::Md => self.output_md(&rows),
            OutputFormat::Id => {
                for row in &rows {
                    println!("{}", row.key);
                }
            }
            _ => self.output_tsv(&rows),
        }
    }

    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                col.header
                    .len()
                    .max(max_content.saturating_add(2))
                    .min(col.width)
            })
            .collect()
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.calculate_widths(rows);

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = w))
            .collect();
        println!("{}", header.join(" "));

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        println!("{}", "-".repeat(total_width));

        for row in rows {
            let parts: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, &w)| match row.get(col.key) {
                    Some(value) => value.format_tsv(w),
                    None => format!("{:<width$}", "-", width = w),
                })
                .collect();
            println!("{}", parts.join(" "));
        }

        if self.show_summary {
            println!();
            println!("{} {}(s) found.", style(rows.len()).cyan(), self.entity_name);
        }
    }

    fn output_csv(&self, rows: &[TableRow]) {
        let headers: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        println!("{}", headers.join(","));

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(|v| v.format_csv()).unwrap_or_default())
                .collect();
            println!("{}", values.join(","));
        }
    }

    fn output_md(&self, rows: &[TableRow]) {
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        println!("| {} |", headers.join(" | "));
        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        println!("|{}|", separators.join("|"));

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| {
                    row.get(col.key)
                        .map(|v| v.format_md())
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect();
            println!("| {} |", values.join(" | "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_text_format() {
        let cell = CellValue::Text("Hello World".to_string());
        assert!(cell.format_tsv(20).contains("Hello World"));
        assert_eq!(cell.format_csv(), "Hello World");
        assert_eq!(cell.format_md(), "Hello World");
    }

    #[test]
    fn test_money_has_two_decimals() {
        let cell = CellValue::Money("74.4".parse().unwrap());
        assert_eq!(cell.raw(), "74.40");
        let cell = CellValue::Money("111.141450".parse().unwrap());
        assert_eq!(cell.format_csv(), "111.14");
    }

    #[test]
    fn test_measure_is_normalized() {
        let cell = CellValue::Measure("280.0".parse().unwrap());
        assert_eq!(cell.raw(), "280");
        let cell = CellValue::Measure("265.50".parse().unwrap());
        assert_eq!(cell.raw(), "265.5");
    }

    #[test]
    fn test_status_format() {
        let cell = CellValue::Status(OrderStatus::InProduction);
        assert_eq!(cell.format_csv(), "in_production");
        assert_eq!(cell.format_md(), "in_production");
    }

    #[test]
    fn test_csv_escapes_text() {
        let cell = CellValue::Text("Premium Leather, Brown".to_string());
        assert_eq!(cell.format_csv(), "\"Premium Leather, Brown\"");
    }

    #[test]
    fn test_md_escapes_pipes() {
        let cell = CellValue::Text("a|b|c".to_string());
        assert_eq!(cell.format_md(), "a\\|b\\|c");
    }

    #[test]
    fn test_table_row_builder() {
        let row = TableRow::new("PRM-LTH-001")
            .cell("name", CellValue::Text("Premium Leather Boot".to_string()))
            .cell("price", CellValue::Money("249.99".parse().unwrap()));
        assert_eq!(row.key, "PRM-LTH-001");
        assert!(row.get("name").is_some());
        assert!(row.get("missing").is_none());
    }
}
