//! Lessons 5-9: hedge sizing, basis and rolling.
use tracing::info;

use super::round_to;
use super::to_percent;
use super::PanelOutput;
use super::DEFAULT_MULTIPLIER;
use crate::error::Result;
use crate::quant::basis::basis;
use crate::quant::basis::convergence_path;
use crate::quant::basis::market_structure;
use crate::quant::basis::CalendarSpread;
use crate::quant::hedge::compute_hedge_effectiveness;
use crate::quant::hedge::ExposureProfile;
use crate::quant::hedge::FuturesContractSpec;
use crate::quant::hedge::HedgeCalculator;
use crate::quant::hedge::MarketMoveScenario;
use crate::quant::HedgeMode;
use crate::report::TableSpec;
use crate::traits::PanelExt;
use crate::visualization::ChartSpec;

/// Lesson 5: portfolio hedged with index futures at a chosen ratio.
#[derive(Clone, Copy, Debug)]
pub struct HedgingBuilder {
  pub portfolio_value: f64,
  pub beta: f64,
  pub futures_price: f64,
  pub multiplier: u32,
  pub mode: HedgeMode,
  pub low_move: f64,
  pub high_move: f64,
  pub points: usize,
}

impl Default for HedgingBuilder {
  fn default() -> Self {
    Self {
      portfolio_value: 5_000_000.0,
      beta: 1.0,
      futures_price: 22_000.0,
      multiplier: DEFAULT_MULTIPLIER,
      mode: HedgeMode::Optimal,
      low_move: -0.1,
      high_move: 0.1,
      points: 20,
    }
  }
}

impl PanelExt for HedgingBuilder {
  fn title(&self) -> String {
    "Hedging Strategy Builder".into()
  }

  fn render(&self) -> Result<PanelOutput> {
    let calc = HedgeCalculator::new(
      ExposureProfile::new(self.portfolio_value, self.beta),
      FuturesContractSpec::new(self.futures_price, self.multiplier),
    )?;
    let scenario = MarketMoveScenario::linspace(self.low_move, self.high_move, self.points)?;
    let (order, series) = calc.run(self.mode, &scenario)?;
    info!(
      mode = %self.mode,
      optimal = calc.optimal_contracts(),
      contracts = order.contract_count,
      "hedge built"
    );

    let pct = scenario.percent();
    Ok(
      PanelOutput::new(self.title())
        .metric("Optimal contracts", round_to(calc.optimal_contracts(), 2))
        .metric("Hedge type", self.mode.to_string())
        .metric("Using contracts", round_to(order.contract_count, 2))
        .chart(
          ChartSpec::new("Unhedged vs hedged P&L")
            .x_label("Market move %")
            .y_label("P&L")
            .line("Unhedged", pct.clone(), series.unhedged.clone())
            .line("Hedged", pct.clone(), series.net.clone())
            .zero_line(),
        )
        .table(TableSpec::from_columns(
          &["Market move %", "Unhedged P&L", "Futures P&L", "Net hedged P&L"],
          &[&pct, &series.unhedged, &series.futures, &series.net],
        ))
        .note("Optimal hedge gives the flattest line")
        .note("Under hedge leaves the portfolio exposed")
        .note("Over hedge reverses the exposure")
        .note("At expiry futures and spot converge"),
    )
  }
}

/// Lesson 6: contract count only.
#[derive(Clone, Copy, Debug)]
pub struct OptimalHedgeRatio {
  pub portfolio_value: f64,
  pub beta: f64,
  pub futures_price: f64,
  pub multiplier: u32,
}

impl Default for OptimalHedgeRatio {
  fn default() -> Self {
    Self {
      portfolio_value: 5_000_000.0,
      beta: 1.0,
      futures_price: 22_000.0,
      multiplier: DEFAULT_MULTIPLIER,
    }
  }
}

impl PanelExt for OptimalHedgeRatio {
  fn title(&self) -> String {
    "Optimal Hedge Ratio".into()
  }

  fn render(&self) -> Result<PanelOutput> {
    let calc = HedgeCalculator::new(
      ExposureProfile::new(self.portfolio_value, self.beta),
      FuturesContractSpec::new(self.futures_price, self.multiplier),
    )?;
    let mut table = TableSpec::new(&["Hedge type", "Contracts"]);
    for mode in [HedgeMode::Under, HedgeMode::Optimal, HedgeMode::Over] {
      let order = calc.order(mode)?;
      table.push_row(vec![mode.to_string().into(), order.contract_count.into()]);
    }
    Ok(
      PanelOutput::new(self.title())
        .metric("Contracts", round_to(calc.optimal_contracts(), 2))
        .table(table)
        .note("N = beta x V / (F x multiplier)"),
    )
  }
}

/// Lesson 7: basis converging to zero and its effect on a hedged portfolio.
#[derive(Clone, Copy, Debug)]
pub struct BasisConvergence {
  pub spot: f64,
  pub futures: f64,
  pub days_to_expiry: usize,
  pub portfolio_value: f64,
  pub beta: f64,
  pub multiplier: u32,
  pub low_move: f64,
  pub high_move: f64,
  pub points: usize,
}

impl Default for BasisConvergence {
  fn default() -> Self {
    Self {
      spot: 22_000.0,
      futures: 22_150.0,
      days_to_expiry: 30,
      portfolio_value: 5_000_000.0,
      beta: 1.0,
      multiplier: DEFAULT_MULTIPLIER,
      low_move: -0.05,
      high_move: 0.05,
      points: 10,
    }
  }
}

impl BasisConvergence {
  /// Basis at each day until expiry.
  pub fn basis_path(&self) -> Result<(Vec<f64>, Vec<f64>)> {
    let path = convergence_path(basis(self.spot, self.futures), self.days_to_expiry)?;
    let days = (0..path.len()).map(|d| d as f64).collect();
    Ok((days, path))
  }
}

impl PanelExt for BasisConvergence {
  fn title(&self) -> String {
    "Basis & Convergence at Expiry".into()
  }

  fn render(&self) -> Result<PanelOutput> {
    let current_basis = basis(self.spot, self.futures);
    let (days, path) = self.basis_path()?;

    let calc = HedgeCalculator::new(
      ExposureProfile::new(self.portfolio_value, self.beta),
      FuturesContractSpec::new(self.futures, self.multiplier),
    )?;
    let scenario = MarketMoveScenario::linspace(self.low_move, self.high_move, self.points)?;
    let (_, series) = calc.run(HedgeMode::Optimal, &scenario)?;
    let pct = to_percent(scenario.moves());

    Ok(
      PanelOutput::new(self.title())
        .metric("Current basis (S - F)", current_basis)
        .metric("Market structure", market_structure(self.spot, self.futures).to_string())
        .metric("Hedge contracts", round_to(calc.optimal_contracts(), 2))
        .chart(
          ChartSpec::new("Basis converges to zero at expiry")
            .x_label("Days")
            .y_label("Basis")
            .line("Basis", days, path)
            .zero_line(),
        )
        .chart(
          ChartSpec::new("Effect of Convergence on Hedge")
            .x_label("Market move %")
            .y_label("P&L")
            .line("Unhedged", pct.clone(), series.unhedged.clone())
            .line("Hedged", pct.clone(), series.net.clone())
            .zero_line(),
        )
        .table(TableSpec::from_columns(
          &["Market move %", "Unhedged", "Hedged"],
          &[&pct, &series.unhedged, &series.net],
        ))
        .note("Basis = Spot - Futures")
        .note("Basis goes to 0 at expiry")
        .note("Hedge effectiveness improves as expiry nears")
        .note("Imperfect convergence creates basis risk"),
    )
  }
}

/// Lesson 8: effectiveness as a linear function of correlation.
#[derive(Clone, Copy, Debug)]
pub struct BasisRisk {
  pub correlation: f64,
}

impl Default for BasisRisk {
  fn default() -> Self {
    Self { correlation: 0.8 }
  }
}

impl PanelExt for BasisRisk {
  fn title(&self) -> String {
    "Basis Risk".into()
  }

  fn render(&self) -> Result<PanelOutput> {
    let effectiveness = compute_hedge_effectiveness(self.correlation)?;
    Ok(
      PanelOutput::new(self.title())
        .metric("Correlation", self.correlation)
        .metric("Effectiveness %", effectiveness),
    )
  }
}

/// Lesson 9: cost of rolling into the next contract.
#[derive(Clone, Copy, Debug)]
pub struct RollingFutures {
  pub near: f64,
  pub far: f64,
}

impl Default for RollingFutures {
  fn default() -> Self {
    Self {
      near: 22_000.0,
      far: 22_150.0,
    }
  }
}

impl PanelExt for RollingFutures {
  fn title(&self) -> String {
    "Rolling Hedge".into()
  }

  fn render(&self) -> Result<PanelOutput> {
    let spread = CalendarSpread::new(self.near, self.far)?;
    Ok(PanelOutput::new(self.title()).metric("Roll cost", spread.spread()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::report::TableValue;

  fn number(v: &TableValue) -> f64 {
    match v {
      TableValue::Number(n) => *n,
      TableValue::Text(t) => panic!("expected number, got {t}"),
    }
  }

  #[test]
  fn builder_reports_contracts_per_mode() {
    let out = HedgingBuilder::default().render().unwrap();
    assert_eq!(out.metric_value("Optimal contracts"), Some(&TableValue::Number(4.55)));
    assert_eq!(out.table.len(), 20);

    let under = HedgingBuilder {
      mode: HedgeMode::Under,
      ..HedgingBuilder::default()
    }
    .render()
    .unwrap();
    assert_eq!(under.metric_value("Using contracts"), Some(&TableValue::Number(2.27)));

    let over = HedgingBuilder {
      mode: HedgeMode::Over,
      ..HedgingBuilder::default()
    }
    .render()
    .unwrap();
    assert_eq!(over.metric_value("Using contracts"), Some(&TableValue::Number(6.82)));
  }

  #[test]
  fn optimal_builder_is_flat() {
    let out = HedgingBuilder::default().render().unwrap();
    for row in &out.table.rows {
      assert!(number(&row[3]).abs() < 1e-6);
    }
  }

  #[test]
  fn optimal_ratio_table_lists_three_modes() {
    let out = OptimalHedgeRatio::default().render().unwrap();
    assert_eq!(out.table.len(), 3);
    assert_eq!(out.table.rows[1][0], TableValue::Text("Optimal Hedge".into()));
  }

  #[test]
  fn convergence_panel() {
    let out = BasisConvergence::default().render().unwrap();
    assert_eq!(out.metric_value("Current basis (S - F)"), Some(&TableValue::Number(-150.0)));
    assert_eq!(
      out.metric_value("Market structure"),
      Some(&TableValue::Text("Contango (F > S)".into()))
    );
    assert_eq!(out.charts.len(), 2);
    let basis = &out.charts[0];
    assert_eq!(basis.series[0].y.len(), 30);
    assert_eq!(*basis.series[0].y.last().unwrap(), 0.0);
    assert_eq!(out.table.len(), 10);

    let effect = &out.charts[1];
    assert_eq!(effect.title, "Effect of Convergence on Hedge");
    let names: Vec<&str> = effect.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Unhedged", "Hedged"]);
    assert_eq!(effect.series[0].x.len(), 10);
    assert!(effect.series[1].y.iter().all(|net| net.abs() < 1e-6));
    assert!(effect.series[0].y.iter().any(|pnl| pnl.abs() > 1.0));
  }

  #[test]
  fn basis_risk_effectiveness() {
    let out = BasisRisk::default().render().unwrap();
    assert_eq!(out.metric_value("Effectiveness %"), Some(&TableValue::Number(80.0)));
    assert!(BasisRisk { correlation: 1.5 }.render().is_err());
  }

  #[test]
  fn roll_cost_metric() {
    let out = RollingFutures::default().render().unwrap();
    assert_eq!(out.metric_value("Roll cost"), Some(&TableValue::Number(150.0)));
  }
}
