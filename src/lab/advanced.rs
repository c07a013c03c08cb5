//! Lesson 12: advanced strategies lab.
use super::to_percent;
use super::PanelOutput;
use crate::error::Result;
use crate::quant::basis::CalendarSpread;
use crate::quant::hedge::generate_scenario;
use crate::quant::pnl::price_ladder;
use crate::quant::strategies::compare_strategies;
use crate::quant::strategies::cross_hedge;
use crate::quant::strategies::RollingHedge;
use crate::report::TableSpec;
use crate::traits::PanelExt;
use crate::visualization::ChartSpec;

const STRATEGY_POINTS: usize = 8;

#[derive(Clone, Copy, Debug)]
pub enum AdvancedStrategy {
  Directional { entry: f64 },
  CalendarSpread { near: f64, far: f64 },
  /// Imperfect hedge through a correlated contract.
  CrossHedging { correlation: f64, exposure: f64 },
  /// Gaussian period P&L, fresh noise on each render unless seeded.
  RollingHedge(RollingHedge),
  StrategyComparison { entry: f64 },
}

impl AdvancedStrategy {
  pub fn directional() -> Self {
    Self::Directional { entry: 22_000.0 }
  }

  pub fn calendar_spread() -> Self {
    Self::CalendarSpread {
      near: 22_000.0,
      far: 22_200.0,
    }
  }

  pub fn cross_hedging() -> Self {
    Self::CrossHedging {
      correlation: 0.7,
      exposure: 1_000_000.0,
    }
  }

  pub fn rolling_hedge() -> Self {
    Self::RollingHedge(RollingHedge::new(1_000_000.0, 6, None))
  }

  pub fn strategy_comparison() -> Self {
    Self::StrategyComparison { entry: 22_000.0 }
  }
}

impl PanelExt for AdvancedStrategy {
  fn title(&self) -> String {
    let title = match self {
      Self::Directional { .. } => "Directional Trade",
      Self::CalendarSpread { .. } => "Calendar Spread",
      Self::CrossHedging { .. } => "Imperfect Hedge Simulation",
      Self::RollingHedge(_) => "Multi-period Rolling Hedge",
      Self::StrategyComparison { .. } => "Compare Strategies",
    };
    title.into()
  }

  fn render(&self) -> Result<PanelOutput> {
    match *self {
      Self::Directional { entry } => {
        let prices = price_ladder(entry, 2_000.0, STRATEGY_POINTS)?;
        let pnl: Vec<f64> = prices.iter().map(|p| p - entry).collect();
        Ok(
          PanelOutput::new(self.title())
            .chart(
              ChartSpec::new("Directional payoff")
                .x_label("Price")
                .y_label("P&L")
                .line("P&L", prices.clone(), pnl.clone())
                .zero_line(),
            )
            .table(TableSpec::from_columns(&["Price", "P&L"], &[&prices, &pnl])),
        )
      }
      Self::CalendarSpread { near, far } => {
        let (prices, pnl) = CalendarSpread::new(near, far)?.payoff_ladder(1_000.0, STRATEGY_POINTS)?;
        Ok(
          PanelOutput::new(self.title())
            .chart(
              ChartSpec::new("Calendar spread payoff")
                .x_label("Price")
                .y_label("P&L")
                .line("P&L", prices.clone(), pnl.clone()),
            )
            .table(TableSpec::from_columns(&["Price", "P&L"], &[&prices, &pnl])),
        )
      }
      Self::CrossHedging {
        correlation,
        exposure,
      } => {
        let moves = generate_scenario(-0.1, 0.1, STRATEGY_POINTS)?;
        let profile = cross_hedge(exposure, correlation, &moves)?;
        let pct = to_percent(&moves);
        Ok(
          PanelOutput::new(self.title())
            .metric("Correlation", correlation)
            .chart(
              ChartSpec::new("Cross hedge")
                .x_label("Move %")
                .y_label("P&L")
                .line("Unhedged", pct.clone(), profile.unhedged.clone())
                .line("Hedged", pct.clone(), profile.hedged.clone()),
            )
            .table(TableSpec::from_columns(
              &["Move%", "Unhedged", "Hedged"],
              &[&pct, &profile.unhedged, &profile.hedged],
            )),
        )
      }
      Self::RollingHedge(hedge) => {
        let path = hedge.simulate()?;
        let periods: Vec<f64> = (0..path.pnl.len()).map(|p| p as f64).collect();
        Ok(
          PanelOutput::new(self.title())
            .chart(
              ChartSpec::new("Cumulative Hedge P&L")
                .x_label("Period")
                .y_label("P&L")
                .line("Cumulative", periods.clone(), path.cumulative.clone()),
            )
            .table(TableSpec::from_columns(
              &["Period", "PnL", "Cumulative"],
              &[&periods, &path.pnl, &path.cumulative],
            )),
        )
      }
      Self::StrategyComparison { entry } => {
        let prices = price_ladder(entry, 2_000.0, STRATEGY_POINTS)?;
        let cmp = compare_strategies(entry, &prices)?;
        Ok(
          PanelOutput::new(self.title())
            .chart(
              ChartSpec::new("Directional vs calendar")
                .x_label("Price")
                .y_label("P&L")
                .line("Directional", prices.clone(), cmp.directional.clone())
                .line("Calendar", prices.clone(), cmp.calendar.clone()),
            )
            .table(TableSpec::from_columns(
              &["Price", "Directional", "Calendar"],
              &[&prices, &cmp.directional, &cmp.calendar],
            )),
        )
      }
    }
  }
}
