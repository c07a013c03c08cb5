//! # Config
//!
//! $$
//! \text{TOML} \to \text{LabConfig},\quad \text{missing keys} \mapsto \text{defaults}
//! $$
//!
//! Lab-wide defaults loaded from an optional TOML file.
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::error::LabError;
use crate::error::Result;
use crate::lab::DEFAULT_MULTIPLIER;

/// Top-level configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
  /// Heading used on reports and the certificate.
  pub title: String,
  /// Units per index futures contract.
  pub contract_multiplier: u32,
  /// Decimal places in printed tables.
  pub table_decimals: usize,
  pub price_ladder: PriceLadderConfig,
  pub hedge_scenario: ScenarioConfig,
  pub margin: MarginConfig,
  pub quiz: QuizConfig,
}

impl Default for LabConfig {
  fn default() -> Self {
    Self {
      title: "Futures Trading & Hedging Lab".into(),
      contract_multiplier: DEFAULT_MULTIPLIER,
      table_decimals: 2,
      price_ladder: PriceLadderConfig::default(),
      hedge_scenario: ScenarioConfig::default(),
      margin: MarginConfig::default(),
      quiz: QuizConfig::default(),
    }
  }
}

/// Prices shown around an entry level.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PriceLadderConfig {
  pub half_width: f64,
  pub points: usize,
}

impl Default for PriceLadderConfig {
  fn default() -> Self {
    Self {
      half_width: 2_000.0,
      points: 8,
    }
  }
}

/// Market moves for the hedging builder, as fractions.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
  pub low: f64,
  pub high: f64,
  pub points: usize,
}

impl Default for ScenarioConfig {
  fn default() -> Self {
    Self {
      low: -0.1,
      high: 0.1,
      points: 20,
    }
  }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MarginConfig {
  pub initial: f64,
  pub maintenance: f64,
}

impl Default for MarginConfig {
  fn default() -> Self {
    Self {
      initial: 150_000.0,
      maintenance: 100_000.0,
    }
  }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QuizConfig {
  /// Minimum score for a certificate.
  pub pass_mark: u32,
  /// Printed on the certificate when set.
  pub instructor: Option<String>,
  /// Where the workbook and certificate are written.
  pub output_dir: PathBuf,
}

impl Default for QuizConfig {
  fn default() -> Self {
    Self {
      pass_mark: 5,
      instructor: None,
      output_dir: PathBuf::from("."),
    }
  }
}

impl LabConfig {
  pub fn from_toml_str(s: &str) -> Result<Self> {
    let config: Self = toml::from_str(s).map_err(|e| LabError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  /// Read a config file. A missing path yields the defaults.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let Some(path) = path else {
      return Ok(Self::default());
    };
    let text = std::fs::read_to_string(path)
      .map_err(|e| LabError::Config(format!("{}: {e}", path.display())))?;
    let config = Self::from_toml_str(&text)?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
  }

  fn validate(&self) -> Result<()> {
    if self.contract_multiplier == 0 {
      return Err(LabError::Config("contract_multiplier must be positive".into()));
    }
    if self.price_ladder.points < 2 || self.hedge_scenario.points < 2 {
      return Err(LabError::Config("point counts must be at least 2".into()));
    }
    if self.hedge_scenario.low >= self.hedge_scenario.high {
      return Err(LabError::Config("hedge_scenario.low must be below hedge_scenario.high".into()));
    }
    if self.price_ladder.half_width <= 0.0 {
      return Err(LabError::Config("price_ladder.half_width must be positive".into()));
    }
    if self.quiz.pass_mark > 10 {
      return Err(LabError::Config("quiz.pass_mark cannot exceed 10".into()));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_file_is_default() {
    assert_eq!(LabConfig::from_toml_str("").unwrap(), LabConfig::default());
  }

  #[test]
  fn partial_override() {
    let config = LabConfig::from_toml_str(
      r#"
        contract_multiplier = 25

        [hedge_scenario]
        points = 11

        [quiz]
        instructor = "Dr. Rao"
      "#,
    )
    .unwrap();
    assert_eq!(config.contract_multiplier, 25);
    assert_eq!(config.hedge_scenario.points, 11);
    assert_eq!(config.hedge_scenario.low, -0.1);
    assert_eq!(config.quiz.instructor.as_deref(), Some("Dr. Rao"));
    assert_eq!(config.quiz.pass_mark, 5);
  }

  #[test]
  fn unknown_keys_are_rejected() {
    assert!(matches!(
      LabConfig::from_toml_str("multipler = 50"),
      Err(LabError::Config(_))
    ));
  }

  #[test]
  fn invalid_values_are_rejected() {
    assert!(LabConfig::from_toml_str("contract_multiplier = 0").is_err());
    assert!(LabConfig::from_toml_str("[hedge_scenario]\nlow = 0.2\nhigh = 0.1").is_err());
    assert!(LabConfig::from_toml_str("[hedge_scenario]\nlow = 0.1\nhigh = 0.1").is_err());
    assert!(LabConfig::from_toml_str("[price_ladder]\nhalf_width = 0.0").is_err());
  }

  #[test]
  fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lab.toml");
    std::fs::write(&path, "title = \"Desk Training\"\n").unwrap();
    let config = LabConfig::load(Some(&path)).unwrap();
    assert_eq!(config.title, "Desk Training");
    assert!(LabConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    assert_eq!(LabConfig::load(None).unwrap(), LabConfig::default());
  }
}
