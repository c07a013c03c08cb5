//! Lesson 10: exchange matching.
use super::PanelOutput;
use crate::error::Result;
use crate::quant::order_book::simulate_matching;
use crate::report::TableSpec;
use crate::traits::PanelExt;

#[derive(Clone, Copy, Debug)]
pub struct MatchingSystem {
  pub buy_orders: u32,
  pub sell_orders: u32,
  /// Common limit price of every order.
  pub price: f64,
}

impl Default for MatchingSystem {
  fn default() -> Self {
    Self {
      buy_orders: 60,
      sell_orders: 50,
      price: 22_000.0,
    }
  }
}

impl PanelExt for MatchingSystem {
  fn title(&self) -> String {
    "Matching Engine".into()
  }

  fn render(&self) -> Result<PanelOutput> {
    let summary = simulate_matching(self.buy_orders, self.sell_orders, self.price)?;
    let mut table = TableSpec::new(&["Side", "Orders", "Unfilled"]);
    table.push_row(vec![
      "Buy".into(),
      (summary.buy_orders as f64).into(),
      (summary.unfilled_buys as f64).into(),
    ]);
    table.push_row(vec![
      "Sell".into(),
      (summary.sell_orders as f64).into(),
      (summary.unfilled_sells as f64).into(),
    ]);
    Ok(
      PanelOutput::new(self.title())
        .metric("Trades executed", summary.trades_executed as f64)
        .table(table)
        .note("Orders at the same price match in arrival order"),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::report::TableValue;

  #[test]
  fn trades_are_the_smaller_side() {
    let out = MatchingSystem::default().render().unwrap();
    assert_eq!(out.metric_value("Trades executed"), Some(&TableValue::Number(50.0)));
    assert_eq!(out.table.rows[0][2], TableValue::Number(10.0));
  }
}
