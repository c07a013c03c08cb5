//! # P&L
//!
//! $$
//! \Pi = \pm (P - P_0)\,N\,M,\qquad B = B_0 + \Pi
//! $$
//!
//! Futures position P&L and mark-to-market margin balances.
use std::fmt::Display;

use impl_new_derive::ImplNew;

use super::PositionSide;
use crate::error::ensure_finite;
use crate::error::ensure_positive;
use crate::error::LabError;
use crate::error::Result;
use crate::quant::hedge::generate_scenario;

/// A futures position opened at `entry`.
#[derive(ImplNew, Clone, Copy, Debug)]
pub struct FuturesPosition {
  pub side: PositionSide,
  /// Entry price
  pub entry: f64,
  /// Number of contracts held
  pub contracts: f64,
  /// Units per contract
  pub multiplier: u32,
}

impl FuturesPosition {
  /// P&L when the futures trade at `price`.
  #[must_use]
  pub fn pnl(&self, price: f64) -> f64 {
    self.side.sign() * (price - self.entry) * self.contracts * self.multiplier as f64
  }

  /// P&L at each price on the ladder.
  pub fn pnl_path(&self, prices: &[f64]) -> Vec<f64> {
    prices.iter().map(|&p| self.pnl(p)).collect()
  }

  fn validate(&self) -> Result<()> {
    ensure_positive("entry", self.entry)?;
    ensure_finite("contracts", self.contracts)?;
    if self.multiplier == 0 {
      return Err(LabError::invalid("multiplier", "0 must be positive"));
    }
    Ok(())
  }
}

/// `(price - entry)·contracts·multiplier`, negated for a short.
pub fn position_pnl(
  side: PositionSide,
  entry: f64,
  price: f64,
  contracts: f64,
  multiplier: u32,
) -> f64 {
  FuturesPosition::new(side, entry, contracts, multiplier).pnl(price)
}

/// `points` prices evenly spaced over `entry ± half_width`.
pub fn price_ladder(entry: f64, half_width: f64, points: usize) -> Result<Vec<f64>> {
  ensure_finite("entry", entry)?;
  ensure_positive("half_width", half_width)?;
  generate_scenario(entry - half_width, entry + half_width, points)
}

/// Margin account state after marking to a price.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MarginStatus {
  Ok,
  /// Balance fell below the maintenance level.
  MarginCall,
}

impl Display for MarginStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      MarginStatus::Ok => write!(f, "OK"),
      MarginStatus::MarginCall => write!(f, "MARGIN CALL"),
    }
  }
}

/// One marked price on a margin path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarginPoint {
  pub price: f64,
  pub pnl: f64,
  pub balance: f64,
  pub status: MarginStatus,
}

/// Initial and maintenance margin levels for an account.
#[derive(ImplNew, Clone, Copy, Debug)]
pub struct MarginAccount {
  pub initial: f64,
  pub maintenance: f64,
}

impl MarginAccount {
  fn validate(&self) -> Result<()> {
    ensure_positive("initial_margin", self.initial)?;
    ensure_finite("maintenance_margin", self.maintenance)?;
    if self.maintenance < 0.0 || self.maintenance > self.initial {
      return Err(LabError::invalid(
        "maintenance_margin",
        format!(
          "{} must lie between 0 and the initial margin {}",
          self.maintenance, self.initial
        ),
      ));
    }
    Ok(())
  }

  /// Mark the position to each price and flag balances under maintenance.
  pub fn mark_to_market(&self, position: &FuturesPosition, prices: &[f64]) -> Result<Vec<MarginPoint>> {
    self.validate()?;
    position.validate()?;
    Ok(
      prices
        .iter()
        .map(|&price| {
          let pnl = position.pnl(price);
          let balance = self.initial + pnl;
          let status = if balance < self.maintenance {
            MarginStatus::MarginCall
          } else {
            MarginStatus::Ok
          };
          MarginPoint {
            price,
            pnl,
            balance,
            status,
          }
        })
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  #[test]
  fn long_position_gains_on_rally() {
    let pnl = position_pnl(PositionSide::Long, 22_000.0, 24_000.0, 5.0, 50);
    assert_eq!(pnl, 500_000.0);
  }

  #[test]
  fn short_position_mirrors_long() {
    let long = FuturesPosition::new(PositionSide::Long, 500.0, 1.0, 10);
    let short = FuturesPosition::new(PositionSide::Short, 500.0, 1.0, 10);
    assert_eq!(short.pnl(520.0), -200.0);
    assert_eq!(long.pnl(520.0), 200.0);
  }

  #[test]
  fn ladder_spans_entry() {
    let prices = price_ladder(22_000.0, 2_000.0, 8).unwrap();
    assert_eq!(prices.len(), 8);
    assert_eq!(prices[0], 20_000.0);
    assert_eq!(prices[7], 24_000.0);
    assert!(price_ladder(22_000.0, -1.0, 8).is_err());
    assert!(price_ladder(22_000.0, 0.0, 8).is_err());
  }

  #[test]
  fn margin_call_below_maintenance() {
    let account = MarginAccount::new(150_000.0, 100_000.0);
    let position = FuturesPosition::new(PositionSide::Long, 22_000.0, 5.0, 50);
    let path = account
      .mark_to_market(&position, &[20_000.0, 21_800.0, 22_000.0, 24_000.0])
      .unwrap();

    assert_relative_eq!(path[0].balance, -350_000.0);
    assert_eq!(path[0].status, MarginStatus::MarginCall);
    assert_relative_eq!(path[1].balance, 100_000.0);
    assert_eq!(path[1].status, MarginStatus::Ok);
    assert_eq!(path[2].status, MarginStatus::Ok);
    assert_relative_eq!(path[3].balance, 650_000.0);
  }

  #[test]
  fn short_margin_calls_on_rally() {
    let account = MarginAccount::new(150_000.0, 100_000.0);
    let position = FuturesPosition::new(PositionSide::Short, 22_000.0, 5.0, 50);
    let path = account.mark_to_market(&position, &[21_000.0, 23_000.0]).unwrap();
    assert_eq!(path[0].status, MarginStatus::Ok);
    assert_eq!(path[1].status, MarginStatus::MarginCall);
  }

  #[test]
  fn maintenance_above_initial_is_rejected() {
    let account = MarginAccount::new(100_000.0, 150_000.0);
    let position = FuturesPosition::new(PositionSide::Long, 22_000.0, 5.0, 50);
    assert!(account.mark_to_market(&position, &[22_000.0]).is_err());
  }
}
