//! # Strategies
//!
//! $$
//! \Pi_{\text{hedged}}(m) = E\,m\,(1-h),\qquad
//! C_k = \sum_{i\le k} \varepsilon_i,\ \varepsilon_i \sim \mathcal N(0, (0.02E)^2)
//! $$
//!
//! Payoff profiles for the real-world cases and the advanced strategy lab.
use impl_new_derive::ImplNew;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Distribution;
use rand_distr::Normal;
use tracing::debug;

use crate::error::ensure_finite;
use crate::error::ensure_in_range;
use crate::error::ensure_positive;
use crate::error::LabError;
use crate::error::Result;

/// Period P&L volatility of the rolling hedge, as a fraction of exposure.
pub const ROLLING_PNL_VOL: f64 = 0.02;

/// Premium of the far leg over entry in the strategy comparison.
pub const CALENDAR_PREMIUM: f64 = 200.0;

/// Exposure P&L with and without the hedge, aligned by move.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HedgeProfile {
  pub moves: Vec<f64>,
  pub unhedged: Vec<f64>,
  pub hedged: Vec<f64>,
}

/// Fuel buyer hedging `hedge_ratio` of the exposure: hedged = `E·m·(1-h)`.
pub fn fuel_hedge(exposure: f64, hedge_ratio: f64, moves: &[f64]) -> Result<HedgeProfile> {
  ensure_finite("exposure", exposure)?;
  ensure_in_range("hedge_ratio", hedge_ratio, 0.0, 1.0)?;
  let unhedged: Vec<f64> = moves.iter().map(|m| exposure * m).collect();
  let hedged = unhedged.iter().map(|u| u * (1.0 - hedge_ratio)).collect();
  Ok(HedgeProfile {
    moves: moves.to_vec(),
    unhedged,
    hedged,
  })
}

/// Exporter locking the rate with currency futures: the hedged leg is flat.
pub fn currency_hedge(exposure: f64, fx_moves: &[f64]) -> Result<HedgeProfile> {
  ensure_finite("exposure", exposure)?;
  Ok(HedgeProfile {
    moves: fx_moves.to_vec(),
    unhedged: fx_moves.iter().map(|m| exposure * m).collect(),
    hedged: vec![0.0; fx_moves.len()],
  })
}

/// Producer revenue `Q·P·(1+m)` across price moves.
pub fn producer_revenue(quantity: f64, price: f64, moves: &[f64]) -> Result<Vec<f64>> {
  ensure_finite("quantity", quantity)?;
  ensure_positive("price", price)?;
  Ok(moves.iter().map(|m| quantity * price * (1.0 + m)).collect())
}

/// Cross hedge with an imperfectly correlated contract: hedged = `E·m·(1-ρ)`.
pub fn cross_hedge(exposure: f64, correlation: f64, moves: &[f64]) -> Result<HedgeProfile> {
  ensure_finite("exposure", exposure)?;
  ensure_in_range("correlation", correlation, 0.0, 1.0)?;
  let unhedged: Vec<f64> = moves.iter().map(|m| exposure * m).collect();
  let hedged = unhedged.iter().map(|u| u * (1.0 - correlation)).collect();
  Ok(HedgeProfile {
    moves: moves.to_vec(),
    unhedged,
    hedged,
  })
}

/// Directional long versus calendar spread payoff over a price ladder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrategyComparison {
  pub prices: Vec<f64>,
  pub directional: Vec<f64>,
  pub calendar: Vec<f64>,
}

pub fn compare_strategies(entry: f64, prices: &[f64]) -> Result<StrategyComparison> {
  ensure_positive("entry", entry)?;
  Ok(StrategyComparison {
    prices: prices.to_vec(),
    directional: prices.iter().map(|p| p - entry).collect(),
    calendar: prices
      .iter()
      .map(|p| (entry + CALENDAR_PREMIUM) - (p - entry))
      .collect(),
  })
}

/// Multi-period rolling hedge with Gaussian period P&L.
///
/// Without a seed every run draws fresh noise.
#[derive(ImplNew, Clone, Copy, Debug)]
pub struct RollingHedge {
  /// Hedged exposure
  pub exposure: f64,
  /// Number of roll periods
  pub periods: usize,
  /// RNG seed, `None` for entropy
  pub seed: Option<u64>,
}

/// Per-period and cumulative P&L of a [`RollingHedge`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RollingHedgePath {
  pub pnl: Vec<f64>,
  pub cumulative: Vec<f64>,
}

impl RollingHedge {
  pub fn simulate(&self) -> Result<RollingHedgePath> {
    ensure_positive("exposure", self.exposure)?;
    if self.periods == 0 {
      return Err(LabError::invalid("periods", "0 must be positive"));
    }
    let normal = Normal::new(0.0, self.exposure * ROLLING_PNL_VOL)
      .map_err(|e| LabError::invalid("exposure", e.to_string()))?;
    let mut rng = match self.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };

    let pnl: Vec<f64> = (0..self.periods).map(|_| normal.sample(&mut rng)).collect();
    let cumulative = pnl
      .iter()
      .scan(0.0, |acc, x| {
        *acc += x;
        Some(*acc)
      })
      .collect();
    debug!(periods = self.periods, seeded = self.seed.is_some(), "rolling hedge simulated");
    Ok(RollingHedgePath { pnl, cumulative })
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  #[test]
  fn fuel_hedge_keeps_unhedged_share() {
    let profile = fuel_hedge(10_000_000.0, 0.7, &[-0.2, 0.0, 0.2]).unwrap();
    assert_relative_eq!(profile.unhedged[2], 2_000_000.0, epsilon = 1e-6);
    assert_relative_eq!(profile.hedged[2], 600_000.0, epsilon = 1e-6);
    assert_eq!(profile.hedged[1], 0.0);
    assert!(fuel_hedge(1.0, 1.5, &[0.1]).is_err());
  }

  #[test]
  fn currency_hedge_is_flat() {
    let profile = currency_hedge(1_000_000.0, &[-5.0, 5.0]).unwrap();
    assert_eq!(profile.unhedged, vec![-5_000_000.0, 5_000_000.0]);
    assert_eq!(profile.hedged, vec![0.0, 0.0]);
  }

  #[test]
  fn producer_revenue_scales_with_price() {
    let revenue = producer_revenue(1_000.0, 5_000.0, &[-0.2, 0.0, 0.2]).unwrap();
    assert_relative_eq!(revenue[0], 4_000_000.0, epsilon = 1e-6);
    assert_eq!(revenue[1], 5_000_000.0);
    assert_relative_eq!(revenue[2], 6_000_000.0, epsilon = 1e-6);
  }

  #[test]
  fn perfect_correlation_flattens_cross_hedge() {
    let profile = cross_hedge(1_000_000.0, 1.0, &[-0.1, 0.1]).unwrap();
    assert!(profile.hedged.iter().all(|h| *h == 0.0));
    let profile = cross_hedge(1_000_000.0, 0.0, &[-0.1, 0.1]).unwrap();
    assert_eq!(profile.hedged, profile.unhedged);
  }

  #[test]
  fn strategy_comparison_at_entry() {
    let cmp = compare_strategies(22_000.0, &[22_000.0, 23_000.0]).unwrap();
    assert_eq!(cmp.directional, vec![0.0, 1_000.0]);
    assert_eq!(cmp.calendar, vec![22_200.0, 21_200.0]);
  }

  #[test]
  fn seeded_rolling_hedge_is_reproducible() {
    let hedge = RollingHedge::new(1_000_000.0, 6, Some(7));
    let a = hedge.simulate().unwrap();
    let b = hedge.simulate().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.pnl.len(), 6);
    assert_relative_eq!(a.cumulative[5], a.pnl.iter().sum::<f64>(), epsilon = 1e-6);
  }

  #[test]
  fn rolling_hedge_rejects_empty_horizon() {
    assert!(RollingHedge::new(1_000_000.0, 0, None).simulate().is_err());
    assert!(RollingHedge::new(0.0, 6, None).simulate().is_err());
  }
}
