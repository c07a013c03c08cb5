//! # Quant
//!
//! $$
//! \Pi(m) = V\beta m - N\,M\,F\,m
//! $$
//!
//! Closed-form futures arithmetic used by the lab panels.
use std::fmt::Display;

pub mod basis;
pub mod hedge;
pub mod order_book;
pub mod pnl;
pub mod pricing;
pub mod strategies;

/// Direction of a futures position.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum PositionSide {
  #[default]
  Long,
  Short,
}

impl PositionSide {
  /// `+1` for long, `-1` for short.
  pub fn sign(self) -> f64 {
    match self {
      PositionSide::Long => 1.0,
      PositionSide::Short => -1.0,
    }
  }
}

impl Display for PositionSide {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PositionSide::Long => write!(f, "Long"),
      PositionSide::Short => write!(f, "Short"),
    }
  }
}

/// How much of the optimal contract count is actually traded.
#[derive(Default, Clone, Copy, PartialEq, Debug)]
pub enum HedgeMode {
  #[default]
  Optimal,
  /// Half of the optimal count.
  Under,
  /// One and a half times the optimal count.
  Over,
  /// Caller supplied scaling factor, must be positive.
  Custom(f64),
}

impl HedgeMode {
  /// Multiplier applied to the optimal contract count.
  pub fn factor(self) -> f64 {
    match self {
      HedgeMode::Optimal => 1.0,
      HedgeMode::Under => 0.5,
      HedgeMode::Over => 1.5,
      HedgeMode::Custom(factor) => factor,
    }
  }
}

impl Display for HedgeMode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      HedgeMode::Optimal => write!(f, "Optimal Hedge"),
      HedgeMode::Under => write!(f, "Under Hedge"),
      HedgeMode::Over => write!(f, "Over Hedge"),
      HedgeMode::Custom(factor) => write!(f, "Custom Hedge (x{factor})"),
    }
  }
}

/// Shape of the futures curve relative to spot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MarketStructure {
  /// Futures above spot.
  Contango,
  /// Futures below spot.
  Backwardation,
  Flat,
}

impl Display for MarketStructure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      MarketStructure::Contango => write!(f, "Contango (F > S)"),
      MarketStructure::Backwardation => write!(f, "Backwardation (F < S)"),
      MarketStructure::Flat => write!(f, "Flat (F = S)"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hedge_mode_factors() {
    assert_eq!(HedgeMode::Optimal.factor(), 1.0);
    assert_eq!(HedgeMode::Under.factor(), 0.5);
    assert_eq!(HedgeMode::Over.factor(), 1.5);
    assert_eq!(HedgeMode::Custom(0.8).factor(), 0.8);
  }

  #[test]
  fn side_sign() {
    assert_eq!(PositionSide::Long.sign(), 1.0);
    assert_eq!(PositionSide::Short.sign(), -1.0);
  }
}
