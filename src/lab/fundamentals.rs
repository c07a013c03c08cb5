//! Lessons 1-4: contract basics, carry pricing, margin and trading P&L.
use tracing::info;

use super::round_to;
use super::PanelOutput;
use super::DEFAULT_MULTIPLIER;
use crate::error::Result;
use crate::quant::pnl::price_ladder;
use crate::quant::pnl::FuturesPosition;
use crate::quant::pnl::MarginAccount;
use crate::quant::pnl::MarginStatus;
use crate::quant::pricing::CarryPricer;
use crate::quant::PositionSide;
use crate::report::TableSpec;
use crate::report::TableValue;
use crate::traits::PanelExt;
use crate::visualization::ChartSpec;

/// Lesson 1: per-unit payoff of a long futures around its entry price.
#[derive(Clone, Copy, Debug)]
pub struct FuturesBasics {
  pub entry: f64,
  pub half_width: f64,
  pub points: usize,
}

impl Default for FuturesBasics {
  fn default() -> Self {
    Self {
      entry: 22_000.0,
      half_width: 2_000.0,
      points: 8,
    }
  }
}

impl PanelExt for FuturesBasics {
  fn title(&self) -> String {
    "What is a Futures Contract?".into()
  }

  fn render(&self) -> Result<PanelOutput> {
    let prices = price_ladder(self.entry, self.half_width, self.points)?;
    let pnl: Vec<f64> = prices.iter().map(|p| p - self.entry).collect();

    Ok(
      PanelOutput::new(self.title())
        .chart(
          ChartSpec::new("Long futures payoff")
            .x_label("Price")
            .y_label("P&L")
            .line("P&L", prices.clone(), pnl.clone())
            .zero_line(),
        )
        .table(TableSpec::from_columns(&["Price", "P&L"], &[&prices, &pnl]))
        .note("A futures contract is an agreement to buy or sell an asset at a predetermined price on a future date.")
        .note("Key components: underlying asset, contract size, expiry, margin, mark-to-market."),
    )
  }
}

/// Lesson 2: discrete versus continuous cost-of-carry price.
#[derive(Clone, Copy, Debug)]
pub struct FuturesPricing {
  pub spot: f64,
  /// Annual rate as a fraction.
  pub rate: f64,
  /// Years to maturity.
  pub tau: f64,
}

impl Default for FuturesPricing {
  fn default() -> Self {
    Self {
      spot: 500.0,
      rate: 0.08,
      tau: 0.5,
    }
  }
}

impl PanelExt for FuturesPricing {
  fn title(&self) -> String {
    "Futures Pricing".into()
  }

  fn render(&self) -> Result<PanelOutput> {
    let pricer = CarryPricer::new(self.spot, self.rate, self.tau);
    let discrete = pricer.discrete()?;
    let continuous = pricer.continuous()?;

    let mut table = TableSpec::new(&["Method", "Futures"]);
    table.push_row(vec!["Discrete".into(), discrete.into()]);
    table.push_row(vec!["Continuous".into(), continuous.into()]);

    Ok(
      PanelOutput::new(self.title())
        .metric("Discrete pricing", round_to(discrete, 2))
        .metric("Continuous pricing", round_to(continuous, 2))
        .table(table),
    )
  }
}

/// Lesson 3: margin balance of a position marked across a price ladder.
#[derive(Clone, Copy, Debug)]
pub struct MarginCalls {
  pub side: PositionSide,
  pub entry: f64,
  pub contracts: u32,
  pub multiplier: u32,
  pub initial_margin: f64,
  pub maintenance_margin: f64,
  pub half_width: f64,
  pub points: usize,
}

impl Default for MarginCalls {
  fn default() -> Self {
    Self {
      side: PositionSide::Long,
      entry: 22_000.0,
      contracts: 5,
      multiplier: DEFAULT_MULTIPLIER,
      initial_margin: 150_000.0,
      maintenance_margin: 100_000.0,
      half_width: 2_000.0,
      points: 8,
    }
  }
}

impl PanelExt for MarginCalls {
  fn title(&self) -> String {
    "MTM & Margin Calls".into()
  }

  fn render(&self) -> Result<PanelOutput> {
    let prices = price_ladder(self.entry, self.half_width, self.points)?;
    let position = FuturesPosition::new(self.side, self.entry, self.contracts as f64, self.multiplier);
    let account = MarginAccount::new(self.initial_margin, self.maintenance_margin);
    let path = account.mark_to_market(&position, &prices)?;

    let calls = path
      .iter()
      .filter(|p| p.status == MarginStatus::MarginCall)
      .count();
    info!(side = %self.side, calls, "margin path marked");

    let balances: Vec<f64> = path.iter().map(|p| p.balance).collect();
    let mut table = TableSpec::new(&["Price", "Margin balance", "Status"]);
    for point in &path {
      table.push_row(vec![
        point.price.into(),
        point.balance.into(),
        TableValue::Text(point.status.to_string()),
      ]);
    }

    Ok(
      PanelOutput::new(self.title())
        .metric("Position", self.side.to_string())
        .metric("Margin calls", calls as f64)
        .chart(
          ChartSpec::new("Margin balance")
            .x_label("Price")
            .y_label("Balance")
            .line("Margin balance", prices, balances)
            .reference("Maintenance margin", self.maintenance_margin, true),
        )
        .table(table),
    )
  }
}

/// Lesson 4: long and short P&L side by side.
#[derive(Clone, Copy, Debug)]
pub struct TradingPnl {
  pub entry: f64,
  pub contracts: u32,
  pub multiplier: u32,
  pub half_width: f64,
  pub points: usize,
}

impl Default for TradingPnl {
  fn default() -> Self {
    Self {
      entry: 22_000.0,
      contracts: 5,
      multiplier: DEFAULT_MULTIPLIER,
      half_width: 2_000.0,
      points: 8,
    }
  }
}

impl PanelExt for TradingPnl {
  fn title(&self) -> String {
    "Trading P&L".into()
  }

  fn render(&self) -> Result<PanelOutput> {
    let prices = price_ladder(self.entry, self.half_width, self.points)?;
    let contracts = self.contracts as f64;
    let long = FuturesPosition::new(PositionSide::Long, self.entry, contracts, self.multiplier).pnl_path(&prices);
    let short = FuturesPosition::new(PositionSide::Short, self.entry, contracts, self.multiplier).pnl_path(&prices);

    Ok(
      PanelOutput::new(self.title())
        .chart(
          ChartSpec::new("Long vs short")
            .x_label("Price")
            .y_label("P&L")
            .line("Long", prices.clone(), long.clone())
            .line("Short", prices.clone(), short.clone()),
        )
        .table(TableSpec::from_columns(
          &["Price", "Long", "Short"],
          &[&prices, &long, &short],
        )),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn basics_payoff_is_zero_at_entry_band() {
    let out = FuturesBasics::default().render().unwrap();
    assert_eq!(out.table.len(), 8);
    assert_eq!(out.table.rows[0][1], TableValue::Number(-2_000.0));
    assert_eq!(out.table.rows[7][1], TableValue::Number(2_000.0));
  }

  #[test]
  fn pricing_metrics_are_rounded() {
    let out = FuturesPricing::default().render().unwrap();
    assert_eq!(
      out.metric_value("Discrete pricing"),
      Some(&TableValue::Number(519.62))
    );
    assert_eq!(
      out.metric_value("Continuous pricing"),
      Some(&TableValue::Number(520.41))
    );
  }

  #[test]
  fn margin_panel_flags_calls() {
    let out = MarginCalls::default().render().unwrap();
    assert_eq!(out.table.rows[0][2], TableValue::Text("MARGIN CALL".into()));
    assert_eq!(out.table.rows[7][2], TableValue::Text("OK".into()));
    let chart = &out.charts[0];
    assert_eq!(chart.reference_lines[0].y, 100_000.0);
  }

  #[test]
  fn trading_panel_mirrors_sides() {
    let out = TradingPnl::default().render().unwrap();
    let last = &out.table.rows[7];
    assert_eq!(last[1], TableValue::Number(500_000.0));
    assert_eq!(last[2], TableValue::Number(-500_000.0));
  }

  #[test]
  fn invalid_margin_levels_fail_render() {
    let panel = MarginCalls {
      maintenance_margin: 200_000.0,
      ..MarginCalls::default()
    };
    assert!(panel.render().is_err());
  }
}
