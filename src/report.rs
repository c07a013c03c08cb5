//! # Report
//!
//! $$
//! \text{PanelOutput} \mapsto \text{metrics} \oplus \text{payoff table} \oplus \text{notes}
//! $$
//!
//! Tabular rendering of panel output with prettytable.
use std::fmt::Write as _;

use prettytable::format;
use prettytable::Cell;
use prettytable::Row;
use prettytable::Table;

use crate::lab::PanelOutput;

/// A table cell before formatting.
#[derive(Clone, Debug, PartialEq)]
pub enum TableValue {
  Number(f64),
  Text(String),
}

impl TableValue {
  fn render(&self, decimals: usize) -> String {
    match self {
      TableValue::Number(v) => format!("{v:.decimals$}"),
      TableValue::Text(s) => s.clone(),
    }
  }
}

impl From<f64> for TableValue {
  fn from(v: f64) -> Self {
    TableValue::Number(v)
  }
}

impl From<&str> for TableValue {
  fn from(s: &str) -> Self {
    TableValue::Text(s.to_string())
  }
}

impl From<String> for TableValue {
  fn from(s: String) -> Self {
    TableValue::Text(s)
  }
}

/// Column headers plus rows of values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableSpec {
  pub headers: Vec<String>,
  pub rows: Vec<Vec<TableValue>>,
}

impl TableSpec {
  pub fn new(headers: &[&str]) -> Self {
    Self {
      headers: headers.iter().map(|h| h.to_string()).collect(),
      rows: Vec::new(),
    }
  }

  /// Build a table from parallel numeric columns; the shortest column wins.
  pub fn from_columns(headers: &[&str], columns: &[&[f64]]) -> Self {
    let n = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut table = Self::new(headers);
    for i in 0..n {
      table
        .rows
        .push(columns.iter().map(|c| TableValue::Number(c[i])).collect());
    }
    table
  }

  pub fn push_row(&mut self, row: Vec<TableValue>) {
    self.rows.push(row);
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  pub fn to_table(&self, decimals: usize) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(self.headers.iter().map(|h| Cell::new(h)).collect()));
    for row in &self.rows {
      table.add_row(Row::new(
        row.iter().map(|v| Cell::new(&v.render(decimals))).collect(),
      ));
    }
    table
  }
}

/// Full text report for a panel: header, metrics, data table and notes.
pub fn render_panel(output: &PanelOutput, decimals: usize) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "== {} ==", output.title);

  if !output.metrics.is_empty() {
    let mut metrics = Table::new();
    metrics.set_format(*format::consts::FORMAT_CLEAN);
    for metric in &output.metrics {
      metrics.add_row(Row::new(vec![
        Cell::new(&metric.label),
        Cell::new(&metric.value.render(decimals)),
      ]));
    }
    let _ = write!(out, "{metrics}");
  }

  if !output.table.is_empty() {
    let _ = write!(out, "{}", output.table.to_table(decimals));
  }

  for note in &output.notes {
    let _ = writeln!(out, "* {note}");
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lab::Metric;

  #[test]
  fn columns_become_rows() {
    let table = TableSpec::from_columns(&["Price", "P&L"], &[&[1.0, 2.0, 3.0], &[10.0, 20.0]]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[1], vec![TableValue::Number(2.0), TableValue::Number(20.0)]);
  }

  #[test]
  fn panel_report_contains_everything() {
    let output = PanelOutput {
      title: "Trading P&L".into(),
      metrics: vec![Metric::new("Contracts", 5.0)],
      charts: Vec::new(),
      table: TableSpec::from_columns(&["Price", "Long"], &[&[22_000.0], &[0.0]]),
      notes: vec!["Long gains when price rises".into()],
    };
    let text = render_panel(&output, 2);
    assert!(text.contains("== Trading P&L =="));
    assert!(text.contains("Contracts"));
    assert!(text.contains("5.00"));
    assert!(text.contains("22000.00"));
    assert!(text.contains("* Long gains when price rises"));
  }
}
