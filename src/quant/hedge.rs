//! # Hedge
//!
//! $$
//! N^\*=\frac{\beta V}{F M},\qquad
//! \Pi_{\text{net}}(m)=V\beta m-N M F m
//! $$
//!
//! Hedge payoff and effectiveness calculator shared by every hedging lesson.
use impl_new_derive::ImplNew;
use tracing::debug;

use super::HedgeMode;
use super::PositionSide;
use crate::error::ensure_finite;
use crate::error::ensure_in_range;
use crate::error::ensure_positive;
use crate::error::LabError;
use crate::error::Result;

/// Exposure being hedged.
#[derive(ImplNew, Clone, Copy, Debug, PartialEq)]
pub struct ExposureProfile {
  /// Portfolio value in currency units.
  pub notional_value: f64,
  /// Beta or correlation of the exposure against the futures underlying.
  pub sensitivity_coefficient: f64,
}

/// Futures contract used as the hedge instrument.
#[derive(ImplNew, Clone, Copy, Debug, PartialEq)]
pub struct FuturesContractSpec {
  /// Current futures price.
  pub reference_price: f64,
  /// Units of the underlying per contract.
  pub multiplier: u32,
}

impl FuturesContractSpec {
  /// Currency value of one contract at the reference price.
  pub fn contract_value(&self) -> f64 {
    self.reference_price * self.multiplier as f64
  }

  fn validate(&self) -> Result<()> {
    ensure_positive("reference_price", self.reference_price)?;
    if self.multiplier == 0 {
      return Err(LabError::invalid("multiplier", "0 must be positive"));
    }
    Ok(())
  }
}

/// Futures position taken against the exposure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HedgeOrder {
  /// Unrounded number of contracts.
  pub contract_count: f64,
  pub direction: PositionSide,
}

impl HedgeOrder {
  /// A short hedge, the usual way to protect a long portfolio.
  pub fn short(contract_count: f64) -> Self {
    Self {
      contract_count,
      direction: PositionSide::Short,
    }
  }

  pub fn long(contract_count: f64) -> Self {
    Self {
      contract_count,
      direction: PositionSide::Long,
    }
  }
}

/// Evenly spaced relative market moves, e.g. `-0.1 ..= 0.1`.
#[derive(Clone, Debug, PartialEq)]
pub struct MarketMoveScenario {
  moves: Vec<f64>,
}

impl MarketMoveScenario {
  /// See [`generate_scenario`].
  pub fn linspace(low: f64, high: f64, point_count: usize) -> Result<Self> {
    generate_scenario(low, high, point_count).map(|moves| Self { moves })
  }

  /// Wrap an existing sequence of moves. Used for noisy or hand-picked paths.
  pub fn from_moves(moves: Vec<f64>) -> Result<Self> {
    if moves.is_empty() {
      return Err(LabError::invalid("moves", "scenario must not be empty"));
    }
    for m in &moves {
      ensure_finite("moves", *m)?;
    }
    Ok(Self { moves })
  }

  pub fn moves(&self) -> &[f64] {
    &self.moves
  }

  /// Moves expressed in percent, as displayed on chart axes.
  pub fn percent(&self) -> Vec<f64> {
    self.moves.iter().map(|m| m * 100.0).collect()
  }

  pub fn len(&self) -> usize {
    self.moves.len()
  }

  pub fn is_empty(&self) -> bool {
    self.moves.is_empty()
  }
}

/// Unhedged, futures and net P&L aligned by scenario index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PnLSeries {
  pub moves: Vec<f64>,
  pub unhedged: Vec<f64>,
  pub futures: Vec<f64>,
  pub net: Vec<f64>,
}

impl PnLSeries {
  pub fn len(&self) -> usize {
    self.moves.len()
  }

  pub fn is_empty(&self) -> bool {
    self.moves.is_empty()
  }

  /// `(move, unhedged, futures, net)` per scenario point.
  pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
    self
      .moves
      .iter()
      .zip(&self.unhedged)
      .zip(&self.futures)
      .zip(&self.net)
      .map(|(((m, u), f), n)| (*m, *u, *f, *n))
  }

  /// Largest absolute net P&L across the scenario; a flat hedge gives ~0.
  pub fn max_abs_net(&self) -> f64 {
    self.net.iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
  }

  /// Largest absolute unhedged P&L across the scenario.
  pub fn max_abs_unhedged(&self) -> f64 {
    self.unhedged.iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
  }
}

/// Number of contracts that neutralises the exposure: `βV / (F·M)`.
pub fn compute_optimal_contracts(
  exposure: &ExposureProfile,
  contract: &FuturesContractSpec,
) -> Result<f64> {
  contract.validate()?;
  ensure_finite("notional_value", exposure.notional_value)?;
  ensure_finite("sensitivity_coefficient", exposure.sensitivity_coefficient)?;

  let contracts =
    (exposure.sensitivity_coefficient * exposure.notional_value) / contract.contract_value();
  debug!(
    notional = exposure.notional_value,
    sensitivity = exposure.sensitivity_coefficient,
    contract_value = contract.contract_value(),
    contracts,
    "optimal contract count"
  );
  Ok(contracts)
}

/// Scale the optimal contract count by the chosen hedge mode.
pub fn apply_hedge_ratio(optimal: f64, mode: HedgeMode) -> Result<f64> {
  ensure_finite("optimal", optimal)?;
  if let HedgeMode::Custom(factor) = mode {
    ensure_positive("custom_factor", factor)?;
  }
  Ok(optimal * mode.factor())
}

/// `point_count` evenly spaced values from `low` to `high`, both inclusive.
///
/// Each point is `low·(n-1-i)/(n-1) + high·i/(n-1)`. The weights are formed
/// first so wide bounds never overflow, and a symmetric range with an odd
/// point count hits `0.0` exactly at its centre.
pub fn generate_scenario(low: f64, high: f64, point_count: usize) -> Result<Vec<f64>> {
  ensure_finite("low_fraction", low)?;
  ensure_finite("high_fraction", high)?;
  if point_count < 2 {
    return Err(LabError::invalid(
      "point_count",
      format!("{point_count} must be at least 2"),
    ));
  }
  if low >= high {
    return Err(LabError::invalid(
      "low_fraction",
      format!("{low} must be below high bound {high}"),
    ));
  }

  let last = point_count - 1;
  let span = last as f64;
  Ok(
    (0..point_count)
      .map(|i| match i {
        0 => low,
        i if i == last => high,
        i => low * ((last - i) as f64 / span) + high * (i as f64 / span),
      })
      .collect(),
  )
}

/// Unhedged, futures and net P&L for every move in the scenario.
///
/// A short order earns `-N·M·F·m`, so it profits when the market falls.
pub fn compute_pnl_series(
  exposure: &ExposureProfile,
  contract: &FuturesContractSpec,
  order: &HedgeOrder,
  scenario: &MarketMoveScenario,
) -> Result<PnLSeries> {
  contract.validate()?;
  ensure_finite("notional_value", exposure.notional_value)?;
  ensure_finite("sensitivity_coefficient", exposure.sensitivity_coefficient)?;
  ensure_finite("contract_count", order.contract_count)?;

  let exposure_per_move = exposure.notional_value * exposure.sensitivity_coefficient;
  let hedge_per_move =
    order.direction.sign() * order.contract_count * contract.multiplier as f64 * contract.reference_price;

  let mut series = PnLSeries {
    moves: Vec::with_capacity(scenario.len()),
    unhedged: Vec::with_capacity(scenario.len()),
    futures: Vec::with_capacity(scenario.len()),
    net: Vec::with_capacity(scenario.len()),
  };
  for &m in scenario.moves() {
    let unhedged = exposure_per_move * m;
    let futures = hedge_per_move * m;
    series.moves.push(m);
    series.unhedged.push(unhedged);
    series.futures.push(futures);
    series.net.push(unhedged + futures);
  }
  Ok(series)
}

/// Effectiveness in percent, modelled as `correlation × 100`.
pub fn compute_hedge_effectiveness(correlation: f64) -> Result<f64> {
  ensure_in_range("correlation", correlation, 0.0, 1.0)?;
  Ok(correlation * 100.0)
}

/// Validated exposure/contract pair that produces hedge orders and payoffs.
#[derive(Clone, Copy, Debug)]
pub struct HedgeCalculator {
  exposure: ExposureProfile,
  contract: FuturesContractSpec,
  optimal: f64,
}

impl HedgeCalculator {
  pub fn new(exposure: ExposureProfile, contract: FuturesContractSpec) -> Result<Self> {
    let optimal = compute_optimal_contracts(&exposure, &contract)?;
    Ok(Self {
      exposure,
      contract,
      optimal,
    })
  }

  pub fn exposure(&self) -> &ExposureProfile {
    &self.exposure
  }

  pub fn contract(&self) -> &FuturesContractSpec {
    &self.contract
  }

  pub fn optimal_contracts(&self) -> f64 {
    self.optimal
  }

  /// Short hedge sized by `mode`.
  pub fn order(&self, mode: HedgeMode) -> Result<HedgeOrder> {
    apply_hedge_ratio(self.optimal, mode).map(HedgeOrder::short)
  }

  pub fn pnl_series(&self, order: &HedgeOrder, scenario: &MarketMoveScenario) -> Result<PnLSeries> {
    compute_pnl_series(&self.exposure, &self.contract, order, scenario)
  }

  /// Order for `mode` and its payoff across `scenario` in one call.
  pub fn run(&self, mode: HedgeMode, scenario: &MarketMoveScenario) -> Result<(HedgeOrder, PnLSeries)> {
    let order = self.order(mode)?;
    let series = self.pnl_series(&order, scenario)?;
    Ok((order, series))
  }
}
