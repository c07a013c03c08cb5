//! Lesson 11: real-world hedging and trading desks.
use super::round_to;
use super::to_percent;
use super::PanelOutput;
use super::DEFAULT_MULTIPLIER;
use crate::error::ensure_positive;
use crate::error::Result;
use crate::quant::basis::carry_arbitrage_pnl;
use crate::quant::basis::CalendarSpread;
use crate::quant::hedge::generate_scenario;
use crate::quant::hedge::ExposureProfile;
use crate::quant::hedge::FuturesContractSpec;
use crate::quant::hedge::HedgeCalculator;
use crate::quant::hedge::MarketMoveScenario;
use crate::quant::pricing::fair_value;
use crate::quant::strategies::currency_hedge;
use crate::quant::strategies::fuel_hedge;
use crate::quant::strategies::producer_revenue;
use crate::quant::strategies::HedgeProfile;
use crate::quant::HedgeMode;
use crate::report::TableSpec;
use crate::traits::PanelExt;
use crate::visualization::ChartSpec;

const CASE_POINTS: usize = 8;

#[derive(Clone, Copy, Debug)]
pub enum RealWorldCase {
  /// Fund shorting index futures with beta one.
  EquityPortfolio {
    portfolio_value: f64,
    futures_price: f64,
    multiplier: u32,
  },
  /// Airline hedging a share of its fuel bill.
  AirlineFuel { exposure: f64, hedge_ratio: f64 },
  /// Exporter selling USD receivables forward.
  ExporterCurrency { exposure: f64, rate: f64 },
  /// Producer revenue before hedging.
  CommodityProducer { quantity: f64, price: f64 },
  CalendarSpreadDesk { near: f64, far: f64 },
  /// Cash-and-carry arbitrage.
  ArbitrageDesk { spot: f64, futures: f64, rate: f64 },
}

impl RealWorldCase {
  pub fn equity_portfolio() -> Self {
    Self::EquityPortfolio {
      portfolio_value: 5_000_000.0,
      futures_price: 22_000.0,
      multiplier: DEFAULT_MULTIPLIER,
    }
  }

  pub fn airline_fuel() -> Self {
    Self::AirlineFuel {
      exposure: 10_000_000.0,
      hedge_ratio: 0.7,
    }
  }

  pub fn exporter_currency() -> Self {
    Self::ExporterCurrency {
      exposure: 1_000_000.0,
      rate: 83.0,
    }
  }

  pub fn commodity_producer() -> Self {
    Self::CommodityProducer {
      quantity: 1_000.0,
      price: 5_000.0,
    }
  }

  pub fn calendar_spread_desk() -> Self {
    Self::CalendarSpreadDesk {
      near: 22_000.0,
      far: 22_200.0,
    }
  }

  pub fn arbitrage_desk() -> Self {
    Self::ArbitrageDesk {
      spot: 1_000.0,
      futures: 1_050.0,
      rate: 0.08,
    }
  }
}

fn profile_panel(title: String, x_label: &str, x: Vec<f64>, profile: &HedgeProfile) -> PanelOutput {
  PanelOutput::new(title)
    .chart(
      ChartSpec::new("Unhedged vs hedged")
        .x_label(x_label)
        .y_label("P&L")
        .line("Unhedged", x.clone(), profile.unhedged.clone())
        .line("Hedged", x.clone(), profile.hedged.clone()),
    )
    .table(TableSpec::from_columns(
      &[x_label, "Unhedged", "Hedged"],
      &[&x, &profile.unhedged, &profile.hedged],
    ))
}

impl PanelExt for RealWorldCase {
  fn title(&self) -> String {
    let title = match self {
      Self::EquityPortfolio { .. } => "Equity Portfolio Hedge",
      Self::AirlineFuel { .. } => "Airline Fuel Hedge",
      Self::ExporterCurrency { .. } => "Exporter Currency Hedge",
      Self::CommodityProducer { .. } => "Commodity Producer Hedge",
      Self::CalendarSpreadDesk { .. } => "Calendar Spread Desk",
      Self::ArbitrageDesk { .. } => "Cash-and-Carry Arbitrage",
    };
    title.into()
  }

  fn render(&self) -> Result<PanelOutput> {
    match *self {
      Self::EquityPortfolio {
        portfolio_value,
        futures_price,
        multiplier,
      } => {
        let calc = HedgeCalculator::new(
          ExposureProfile::new(portfolio_value, 1.0),
          FuturesContractSpec::new(futures_price, multiplier),
        )?;
        let scenario = MarketMoveScenario::linspace(-0.1, 0.1, CASE_POINTS)?;
        let (_, series) = calc.run(HedgeMode::Optimal, &scenario)?;
        let profile = HedgeProfile {
          moves: series.moves,
          unhedged: series.unhedged,
          hedged: series.net,
        };
        Ok(
          profile_panel(self.title(), "Market Move %", scenario.percent(), &profile)
            .metric("Contracts to short", round_to(calc.optimal_contracts(), 1)),
        )
      }
      Self::AirlineFuel {
        exposure,
        hedge_ratio,
      } => {
        let moves = generate_scenario(-0.2, 0.2, CASE_POINTS)?;
        let profile = fuel_hedge(exposure, hedge_ratio, &moves)?;
        Ok(
          profile_panel(self.title(), "Fuel price change %", to_percent(&moves), &profile)
            .metric("Hedge %", hedge_ratio * 100.0),
        )
      }
      Self::ExporterCurrency { exposure, rate } => {
        ensure_positive("rate", rate)?;
        let moves = generate_scenario(-5.0, 5.0, CASE_POINTS)?;
        let profile = currency_hedge(exposure, &moves)?;
        Ok(
          profile_panel(self.title(), "FX move", moves, &profile)
            .metric("Current rate", rate)
            .note("Selling currency futures locks today's rate, so the hedged line is flat"),
        )
      }
      Self::CommodityProducer { quantity, price } => {
        let moves = generate_scenario(-0.2, 0.2, CASE_POINTS)?;
        let revenue = producer_revenue(quantity, price, &moves)?;
        let pct = to_percent(&moves);
        Ok(
          PanelOutput::new(self.title())
            .chart(
              ChartSpec::new("Revenue")
                .x_label("Price change %")
                .y_label("Revenue")
                .line("Revenue", pct.clone(), revenue.clone()),
            )
            .table(TableSpec::from_columns(
              &["Price change %", "Revenue"],
              &[&pct, &revenue],
            )),
        )
      }
      Self::CalendarSpreadDesk { near, far } => {
        let spread = CalendarSpread::new(near, far)?;
        let (prices, pnl) = spread.payoff_ladder(1_000.0, CASE_POINTS)?;
        Ok(
          PanelOutput::new(self.title())
            .metric("Spread", spread.spread())
            .chart(
              ChartSpec::new("Spread payoff")
                .x_label("Price")
                .y_label("Spread P&L")
                .line("Spread P&L", prices.clone(), pnl.clone()),
            )
            .table(TableSpec::from_columns(&["Price", "Spread P&L"], &[&prices, &pnl])),
        )
      }
      Self::ArbitrageDesk {
        spot,
        futures,
        rate,
      } => {
        let fair = fair_value(spot, rate)?;
        ensure_positive("futures", futures)?;
        let prices = generate_scenario(spot - 200.0, spot + 200.0, CASE_POINTS)?;
        let pnl: Vec<f64> = prices
          .iter()
          .map(|&p| carry_arbitrage_pnl(futures, p))
          .collect();
        Ok(
          PanelOutput::new(self.title())
            .metric("Fair value", round_to(fair, 2))
            .chart(
              ChartSpec::new("Carry payoff")
                .x_label("Price")
                .y_label("P&L")
                .line("P&L", prices.clone(), pnl.clone()),
            )
            .table(TableSpec::from_columns(&["Price", "P&L"], &[&prices, &pnl])),
        )
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::report::TableValue;

  #[test]
  fn every_case_renders_with_defaults() {
    let cases = [
      RealWorldCase::equity_portfolio(),
      RealWorldCase::airline_fuel(),
      RealWorldCase::exporter_currency(),
      RealWorldCase::commodity_producer(),
      RealWorldCase::calendar_spread_desk(),
      RealWorldCase::arbitrage_desk(),
    ];
    for case in cases {
      let out = case.render().unwrap();
      assert_eq!(out.title, case.title());
      assert_eq!(out.table.len(), CASE_POINTS);
    }
  }

  #[test]
  fn equity_case_contracts() {
    let out = RealWorldCase::equity_portfolio().render().unwrap();
    assert_eq!(out.metric_value("Contracts to short"), Some(&TableValue::Number(4.5)));
  }

  #[test]
  fn arbitrage_fair_value() {
    let out = RealWorldCase::arbitrage_desk().render().unwrap();
    assert_eq!(out.metric_value("Fair value"), Some(&TableValue::Number(1080.0)));
    assert_eq!(out.table.rows[0][1], TableValue::Number(250.0));
  }

  #[test]
  fn airline_rejects_ratio_above_one() {
    let case = RealWorldCase::AirlineFuel {
      exposure: 1.0,
      hedge_ratio: 1.2,
    };
    assert!(case.render().is_err());
  }
}
