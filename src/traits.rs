//! # Traits
//!
//! $$
//! \text{Panel}:\ \text{inputs} \to (\text{metrics}, \text{chart}, \text{table})
//! $$
//!
use crate::error::Result;
use crate::lab::PanelOutput;

/// A lesson panel: a plain input struct that recomputes everything on render.
pub trait PanelExt {
  /// Heading shown above the panel.
  fn title(&self) -> String;

  /// Validate inputs and compute metrics, chart and table.
  fn render(&self) -> Result<PanelOutput>;
}
