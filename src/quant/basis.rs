//! # Basis
//!
//! $$
//! b_t = S_t - F_t,\qquad b_T = 0
//! $$
//!
//! Basis, curve shape, convergence and the spread trades built on them.
use super::MarketStructure;
use crate::error::ensure_finite;
use crate::error::ensure_positive;
use crate::error::LabError;
use crate::error::Result;
use crate::quant::hedge::generate_scenario;

/// Spot minus futures.
#[must_use]
pub fn basis(spot: f64, futures: f64) -> f64 {
  spot - futures
}

/// Contango when futures trade above spot, backwardation when below.
pub fn market_structure(spot: f64, futures: f64) -> MarketStructure {
  if futures > spot {
    MarketStructure::Contango
  } else if futures < spot {
    MarketStructure::Backwardation
  } else {
    MarketStructure::Flat
  }
}

/// Basis shrinking linearly to zero over `days` observations, expiry included.
pub fn convergence_path(initial_basis: f64, days: usize) -> Result<Vec<f64>> {
  ensure_finite("basis", initial_basis)?;
  if days < 2 {
    return Err(LabError::invalid("days", format!("{days} must be at least 2")));
  }
  let last = (days - 1) as f64;
  Ok(
    (0..days)
      .map(|d| initial_basis * (days - 1 - d) as f64 / last)
      .collect(),
  )
}

/// Cost of rolling from the near contract into the next one.
#[must_use]
pub fn roll_cost(near: f64, far: f64) -> f64 {
  far - near
}

/// Calendar spread payoff: the initial spread less the near leg's move.
#[must_use]
pub fn calendar_spread_pnl(near: f64, far: f64, price: f64) -> f64 {
  (far - near) - (price - near)
}

/// Cash-and-carry payoff of a short futures locked at `futures` against spot `price`.
#[must_use]
pub fn carry_arbitrage_pnl(futures: f64, price: f64) -> f64 {
  futures - price
}

/// Near/far contract pair used by the roll and calendar lessons.
#[derive(Clone, Copy, Debug)]
pub struct CalendarSpread {
  pub near: f64,
  pub far: f64,
}

impl CalendarSpread {
  pub fn new(near: f64, far: f64) -> Result<Self> {
    ensure_positive("near", near)?;
    ensure_positive("far", far)?;
    Ok(Self { near, far })
  }

  pub fn spread(&self) -> f64 {
    roll_cost(self.near, self.far)
  }

  pub fn payoff(&self, prices: &[f64]) -> Vec<f64> {
    prices
      .iter()
      .map(|&p| calendar_spread_pnl(self.near, self.far, p))
      .collect()
  }

  /// Payoff across `near ± half_width`.
  pub fn payoff_ladder(&self, half_width: f64, points: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    let prices = generate_scenario(self.near - half_width, self.near + half_width, points)?;
    let pnl = self.payoff(&prices);
    Ok((prices, pnl))
  }
}
