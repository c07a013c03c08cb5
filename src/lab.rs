//! # Lab
//!
//! $$
//! \text{inputs} \xrightarrow{\text{scenario}} \text{series} \xrightarrow{} (\text{chart}, \text{table})
//! $$
//!
//! The thirteen lessons of the futures lab. Each panel is an input struct
//! implementing [`PanelExt`](crate::traits::PanelExt); nothing is cached
//! between renders.
pub mod advanced;
pub mod cases;
pub mod fundamentals;
pub mod hedging;
pub mod market;

pub use advanced::AdvancedStrategy;
pub use cases::RealWorldCase;
pub use fundamentals::FuturesBasics;
pub use fundamentals::FuturesPricing;
pub use fundamentals::MarginCalls;
pub use fundamentals::TradingPnl;
pub use hedging::BasisConvergence;
pub use hedging::BasisRisk;
pub use hedging::HedgingBuilder;
pub use hedging::OptimalHedgeRatio;
pub use hedging::RollingFutures;
pub use market::MatchingSystem;

use crate::report::TableSpec;
use crate::report::TableValue;
use crate::visualization::ChartSpec;

/// Index futures lot size used throughout the lessons.
pub const DEFAULT_MULTIPLIER: u32 = 50;

/// Headline number shown above a chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
  pub label: String,
  pub value: TableValue,
}

impl Metric {
  pub fn new(label: &str, value: impl Into<TableValue>) -> Self {
    Self {
      label: label.into(),
      value: value.into(),
    }
  }
}

/// Everything a panel hands to the chart and table sinks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanelOutput {
  pub title: String,
  pub metrics: Vec<Metric>,
  pub charts: Vec<ChartSpec>,
  pub table: TableSpec,
  pub notes: Vec<String>,
}

impl PanelOutput {
  pub fn new(title: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      ..Self::default()
    }
  }

  pub fn metric(mut self, label: &str, value: impl Into<TableValue>) -> Self {
    self.metrics.push(Metric::new(label, value));
    self
  }

  /// Append a chart; panels may show several.
  pub fn chart(mut self, chart: ChartSpec) -> Self {
    self.charts.push(chart);
    self
  }

  pub fn table(mut self, table: TableSpec) -> Self {
    self.table = table;
    self
  }

  pub fn note(mut self, note: &str) -> Self {
    self.notes.push(note.into());
    self
  }

  /// Look up a metric by label.
  pub fn metric_value(&self, label: &str) -> Option<&TableValue> {
    self
      .metrics
      .iter()
      .find(|m| m.label == label)
      .map(|m| &m.value)
  }
}

/// Round half away from zero to `decimals` places, for display only.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
  let scale = 10f64.powi(decimals);
  (value * scale).round() / scale
}

pub(crate) fn to_percent(moves: &[f64]) -> Vec<f64> {
  moves.iter().map(|m| m * 100.0).collect()
}
