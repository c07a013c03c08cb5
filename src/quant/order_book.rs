//! # Order Book
//!
//! $$
//! q_{\text{traded}} = \min\!\left(q_{\text{taker}},\ \sum_{p \le p^\*} q_{\text{maker}}(p)\right)
//! $$
//!
//! Price-time priority matching for futures lots, used by the exchange
//! matching lesson.
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::VecDeque;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::error::ensure_positive;
use crate::error::LabError;
use crate::error::Result;

/// Price key with a total order so it can live in a `BTreeMap`.
pub type Price = OrderedFloat<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderSide {
  Buy,
  Sell,
}

impl OrderSide {
  fn opposite(self) -> Self {
    match self {
      OrderSide::Buy => OrderSide::Sell,
      OrderSide::Sell => OrderSide::Buy,
    }
  }
}

/// Resting limit order, in whole contracts.
#[derive(Debug, Clone)]
pub struct RestingOrder {
  pub id: u64,
  pub side: OrderSide,
  pub price: f64,
  pub lots: u32,
  /// Arrival sequence; lower wins at equal price.
  pub seq: u64,
}

/// Fill between an incoming order and a resting one.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
  pub taker_side: OrderSide,
  pub price: f64,
  pub lots: u32,
  pub taker_id: u64,
  pub maker_id: u64,
}

#[derive(Default)]
pub struct OrderBook {
  bids: BTreeMap<Price, VecDeque<RestingOrder>>,
  asks: BTreeMap<Price, VecDeque<RestingOrder>>,
  index: HashMap<u64, (OrderSide, Price)>,
  next_id: u64,
}

impl OrderBook {
  pub fn new() -> Self {
    Self::default()
  }

  /// Submit a limit order. Whatever crosses trades immediately, the rest rests.
  pub fn add_order(&mut self, side: OrderSide, price: f64, lots: u32) -> Result<(u64, Vec<Fill>)> {
    ensure_positive("price", price)?;
    if lots == 0 {
      return Err(LabError::invalid("lots", "0 must be positive"));
    }
    let id = self.next_id();
    let (fills, remaining) = self.sweep(side, id, lots, Some(price));

    if remaining > 0 {
      let key = Price::from(price);
      let book = match side {
        OrderSide::Buy => &mut self.bids,
        OrderSide::Sell => &mut self.asks,
      };
      book.entry(key).or_default().push_back(RestingOrder {
        id,
        side,
        price,
        lots: remaining,
        seq: id,
      });
      self.index.insert(id, (side, key));
    }
    Ok((id, fills))
  }

  /// Market order: consume contra liquidity until filled or the book is empty.
  /// Returns the order id, its fills and the unfilled lots.
  pub fn execute_order(&mut self, side: OrderSide, lots: u32) -> Result<(u64, Vec<Fill>, u32)> {
    if lots == 0 {
      return Err(LabError::invalid("lots", "0 must be positive"));
    }
    let id = self.next_id();
    let (fills, remaining) = self.sweep(side, id, lots, None);
    Ok((id, fills, remaining))
  }

  pub fn cancel_order(&mut self, id: u64) -> bool {
    let Some((side, price)) = self.index.remove(&id) else {
      return false;
    };
    let book = match side {
      OrderSide::Buy => &mut self.bids,
      OrderSide::Sell => &mut self.asks,
    };
    if let Some(queue) = book.get_mut(&price) {
      queue.retain(|o| o.id != id);
      if queue.is_empty() {
        book.remove(&price);
      }
    }
    true
  }

  /// Best bid price and the lots resting there.
  pub fn best_bid(&self) -> Option<(f64, u32)> {
    let (&price, queue) = self.bids.iter().next_back()?;
    Some((price.into_inner(), queue.iter().map(|o| o.lots).sum()))
  }

  pub fn best_ask(&self) -> Option<(f64, u32)> {
    let (&price, queue) = self.asks.iter().next()?;
    Some((price.into_inner(), queue.iter().map(|o| o.lots).sum()))
  }

  /// Total resting lots on one side.
  pub fn open_interest(&self, side: OrderSide) -> u32 {
    let book = match side {
      OrderSide::Buy => &self.bids,
      OrderSide::Sell => &self.asks,
    };
    book.values().flatten().map(|o| o.lots).sum()
  }

  fn next_id(&mut self) -> u64 {
    self.next_id += 1;
    self.next_id
  }

  /// Match `lots` against the opposite side, best price first, down to `limit`.
  fn sweep(&mut self, side: OrderSide, taker_id: u64, mut lots: u32, limit: Option<f64>) -> (Vec<Fill>, u32) {
    let contra = match side.opposite() {
      OrderSide::Buy => &mut self.bids,
      OrderSide::Sell => &mut self.asks,
    };
    let levels: Vec<Price> = match side {
      OrderSide::Buy => contra.keys().copied().collect(),
      OrderSide::Sell => contra.keys().rev().copied().collect(),
    };

    let mut fills = Vec::new();
    for level in levels {
      if lots == 0 {
        break;
      }
      let crosses = match (side, limit) {
        (_, None) => true,
        (OrderSide::Buy, Some(limit)) => level.into_inner() <= limit,
        (OrderSide::Sell, Some(limit)) => level.into_inner() >= limit,
      };
      if !crosses {
        break;
      }
      let Some(queue) = contra.get_mut(&level) else {
        continue;
      };
      while lots > 0 {
        let Some(maker) = queue.front_mut() else {
          break;
        };
        let traded = lots.min(maker.lots);
        lots -= traded;
        maker.lots -= traded;
        fills.push(Fill {
          taker_side: side,
          price: maker.price,
          lots: traded,
          taker_id,
          maker_id: maker.id,
        });
        if maker.lots == 0 {
          let maker_id = maker.id;
          queue.pop_front();
          self.index.remove(&maker_id);
        }
      }
      if queue.is_empty() {
        contra.remove(&level);
      }
    }
    debug!(taker_id, fills = fills.len(), unfilled = lots, "order swept");
    (fills, lots)
  }
}

/// Outcome of the matching lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingSummary {
  pub buy_orders: u32,
  pub sell_orders: u32,
  /// Number of one-lot trades printed.
  pub trades_executed: u32,
  pub unfilled_buys: u32,
  pub unfilled_sells: u32,
}

/// Send `buy_orders` one-lot bids, then `sell_orders` one-lot offers, all at
/// `price`. Every offer that finds a bid trades, so trades = `min(buys, sells)`.
pub fn simulate_matching(buy_orders: u32, sell_orders: u32, price: f64) -> Result<MatchingSummary> {
  let mut book = OrderBook::new();
  for _ in 0..buy_orders {
    book.add_order(OrderSide::Buy, price, 1)?;
  }
  let mut trades_executed = 0;
  for _ in 0..sell_orders {
    let (_, fills) = book.add_order(OrderSide::Sell, price, 1)?;
    trades_executed += fills.iter().map(|f| f.lots).sum::<u32>();
  }
  Ok(MatchingSummary {
    buy_orders,
    sell_orders,
    trades_executed,
    unfilled_buys: book.open_interest(OrderSide::Buy),
    unfilled_sells: book.open_interest(OrderSide::Sell),
  })
}
