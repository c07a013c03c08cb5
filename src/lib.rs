//! # Futures Lab
//!
//! $$
//! N^\* = \frac{\beta V}{F \cdot m}
//! $$
//!
//! Futures trading and hedging lessons: closed-form pricing, P&L, margin,
//! hedge sizing and basis, a small matching engine, and a graded quiz.
pub mod config;
pub mod error;
pub mod lab;
pub mod quant;
pub mod quiz;
pub mod report;
pub mod traits;
pub mod visualization;

pub use error::LabError;
pub use error::Result;
pub use quant::hedge::HedgeCalculator;
pub use traits::PanelExt;
