//! # Pricing
//!
//! $$
//! F_{\text{disc}} = S(1+r)^{T},\qquad F_{\text{cont}} = S e^{rT}
//! $$
//!
//! Cost-of-carry fair value of a futures contract.
use impl_new_derive::ImplNew;

use crate::error::ensure_finite;
use crate::error::ensure_positive;
use crate::error::LabError;
use crate::error::Result;

/// Cost-of-carry pricer for a non-dividend underlying.
#[derive(ImplNew, Clone, Copy, Debug)]
pub struct CarryPricer {
  /// Spot price
  pub s: f64,
  /// Annual interest rate as a fraction
  pub r: f64,
  /// Time to maturity in years
  pub tau: f64,
}

impl CarryPricer {
  fn validate(&self) -> Result<()> {
    ensure_positive("spot", self.s)?;
    ensure_finite("rate", self.r)?;
    ensure_finite("tau", self.tau)?;
    if self.tau < 0.0 {
      return Err(LabError::invalid("tau", format!("{} must not be negative", self.tau)));
    }
    Ok(())
  }

  /// Annually compounded carry: `S(1+r)^T`.
  pub fn discrete(&self) -> Result<f64> {
    self.validate()?;
    if self.r <= -1.0 {
      return Err(LabError::invalid("rate", format!("{} must be above -1", self.r)));
    }
    Ok(self.s * (1.0 + self.r).powf(self.tau))
  }

  /// Continuously compounded carry: `S·e^{rT}`.
  pub fn continuous(&self) -> Result<f64> {
    self.validate()?;
    Ok(self.s * (self.r * self.tau).exp())
  }

  /// Basis implied by the continuous fair value, `S - F`.
  pub fn carry_basis(&self) -> Result<f64> {
    Ok(self.s - self.continuous()?)
  }
}

/// One-period fair value `S(1+r)` used by the cash-and-carry desk.
pub fn fair_value(spot: f64, rate: f64) -> Result<f64> {
  CarryPricer::new(spot, rate, 1.0).discrete()
}
