//! # Error
//!
//! $$
//! \text{input} \notin \mathcal D \;\Rightarrow\; \text{reject before computation}
//! $$
//!
use thiserror::Error;

/// Errors raised by the lab calculations and their output sinks.
#[derive(Debug, Error)]
pub enum LabError {
  /// An input fell outside the domain of the formula it feeds.
  #[error("invalid input for `{field}`: {reason}")]
  InvalidDomainInput { field: &'static str, reason: String },

  /// The configuration file could not be read or parsed.
  #[error("configuration error: {0}")]
  Config(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, LabError>;

impl LabError {
  pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
    Self::InvalidDomainInput {
      field,
      reason: reason.into(),
    }
  }
}

/// Reject anything that is not a finite, strictly positive number.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64> {
  if !value.is_finite() {
    return Err(LabError::invalid(field, format!("{value} is not finite")));
  }
  if value <= 0.0 {
    return Err(LabError::invalid(field, format!("{value} must be positive")));
  }
  Ok(value)
}

/// Reject NaN and infinities; the sign is left to the caller.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
  if value.is_finite() {
    Ok(value)
  } else {
    Err(LabError::invalid(field, format!("{value} is not finite")))
  }
}

/// Reject values outside the closed interval `[lo, hi]`.
pub(crate) fn ensure_in_range(field: &'static str, value: f64, lo: f64, hi: f64) -> Result<f64> {
  ensure_finite(field, value)?;
  if value < lo || value > hi {
    return Err(LabError::invalid(
      field,
      format!("{value} is outside [{lo}, {hi}]"),
    ));
  }
  Ok(value)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn positive_guard_rejects_zero_and_nan() {
    assert!(ensure_positive("price", 0.0).is_err());
    assert!(ensure_positive("price", -1.0).is_err());
    assert!(ensure_positive("price", f64::NAN).is_err());
    assert_eq!(ensure_positive("price", 2.5).unwrap(), 2.5);
  }

  #[test]
  fn range_guard_is_inclusive() {
    assert!(ensure_in_range("correlation", 0.0, 0.0, 1.0).is_ok());
    assert!(ensure_in_range("correlation", 1.0, 0.0, 1.0).is_ok());
    assert!(ensure_in_range("correlation", 1.0001, 0.0, 1.0).is_err());
  }

  #[test]
  fn message_names_the_field() {
    let err = ensure_positive("multiplier", 0.0).unwrap_err();
    assert_eq!(
      err.to_string(),
      "invalid input for `multiplier`: 0 must be positive"
    );
  }
}
