use approx::assert_relative_eq;
use futures_lab::quant::hedge::apply_hedge_ratio;
use futures_lab::quant::hedge::compute_hedge_effectiveness;
use futures_lab::quant::hedge::compute_optimal_contracts;
use futures_lab::quant::hedge::generate_scenario;
use futures_lab::quant::hedge::ExposureProfile;
use futures_lab::quant::hedge::FuturesContractSpec;
use futures_lab::quant::hedge::HedgeCalculator;
use futures_lab::quant::hedge::MarketMoveScenario;
use futures_lab::quant::HedgeMode;
use proptest::prelude::*;

proptest! {
  #[test]
  fn optimal_contracts_cover_notional(
    price in 1.0f64..100_000.0,
    multiplier in 1u32..1_000,
    notional in 1.0f64..1e9,
  ) {
    let contracts = compute_optimal_contracts(
      &ExposureProfile::new(notional, 1.0),
      &FuturesContractSpec::new(price, multiplier),
    )
    .unwrap();
    let covered = contracts * price * multiplier as f64;
    prop_assert!((covered - notional).abs() <= notional * 1e-12);
  }

  #[test]
  fn zero_move_is_exactly_flat(
    notional in 1.0f64..1e9,
    beta in 0.0f64..2.0,
    price in 1.0f64..100_000.0,
    half_range in 0.001f64..0.5,
    half_points in 1usize..50,
  ) {
    let calc = HedgeCalculator::new(
      ExposureProfile::new(notional, beta),
      FuturesContractSpec::new(price, 50),
    )
    .unwrap();
    let scenario = MarketMoveScenario::linspace(-half_range, half_range, 2 * half_points + 1).unwrap();
    let (_, series) = calc.run(HedgeMode::Optimal, &scenario).unwrap();
    let mid = half_points;
    prop_assert_eq!(series.moves[mid], 0.0);
    prop_assert_eq!(series.unhedged[mid], 0.0);
    prop_assert_eq!(series.futures[mid], 0.0);
    prop_assert_eq!(series.net[mid], 0.0);
  }

  #[test]
  fn optimal_hedge_never_widens_the_loss(
    notional in 1.0f64..1e9,
    beta in 0.1f64..2.0,
    price in 1.0f64..100_000.0,
    multiplier in 1u32..500,
  ) {
    let calc = HedgeCalculator::new(
      ExposureProfile::new(notional, beta),
      FuturesContractSpec::new(price, multiplier),
    )
    .unwrap();
    let scenario = MarketMoveScenario::linspace(-0.2, 0.2, 21).unwrap();
    let (_, series) = calc.run(HedgeMode::Optimal, &scenario).unwrap();
    for (_, unhedged, _, net) in series.rows() {
      prop_assert!(net.abs() <= unhedged.abs() + notional * beta * 1e-12);
    }
  }

  #[test]
  fn ratio_modes_scale_the_optimal(optimal in 0.0f64..1e6) {
    let full = apply_hedge_ratio(optimal, HedgeMode::Optimal).unwrap();
    prop_assert_eq!(apply_hedge_ratio(optimal, HedgeMode::Under).unwrap(), 0.5 * full);
    prop_assert_eq!(apply_hedge_ratio(optimal, HedgeMode::Over).unwrap(), 1.5 * full);
  }

  #[test]
  fn effectiveness_is_monotone(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    prop_assert!(compute_hedge_effectiveness(lo).unwrap() <= compute_hedge_effectiveness(hi).unwrap());
  }

  #[test]
  fn scenario_spans_bounds(low in -1.0f64..0.0, width in 0.001f64..2.0, points in 2usize..200) {
    let high = low + width;
    let moves = generate_scenario(low, high, points).unwrap();
    prop_assert_eq!(moves.len(), points);
    prop_assert_eq!(moves[0], low);
    prop_assert_eq!(moves[points - 1], high);
    prop_assert!(moves.windows(2).all(|w| w[0] <= w[1] + 1e-12));
  }

  #[test]
  fn wide_symmetric_scenario_is_finite(bound in 1e300f64..1.7e308, half_points in 1usize..100) {
    let points = 2 * half_points + 1;
    let moves = generate_scenario(-bound, bound, points).unwrap();
    prop_assert!(moves.iter().all(|m| m.is_finite()));
    prop_assert_eq!(moves[half_points], 0.0);
    prop_assert_eq!(moves[0], -bound);
    prop_assert_eq!(moves[points - 1], bound);
  }

  #[test]
  fn equal_bounds_are_rejected(bound in -1.0f64..1.0, points in 2usize..50) {
    prop_assert!(generate_scenario(bound, bound, points).is_err());
  }
}

#[test]
fn effectiveness_endpoints() {
  assert_eq!(compute_hedge_effectiveness(0.0).unwrap(), 0.0);
  assert_eq!(compute_hedge_effectiveness(1.0).unwrap(), 100.0);
  assert!(compute_hedge_effectiveness(1.01).is_err());
  assert!(compute_hedge_effectiveness(-0.01).is_err());
}

#[test]
fn index_hedge_example() {
  let calc = HedgeCalculator::new(
    ExposureProfile::new(5_000_000.0, 1.0),
    FuturesContractSpec::new(22_000.0, 50),
  )
  .unwrap();
  assert_relative_eq!(calc.optimal_contracts(), 4.545_454_545_454_545, epsilon = 1e-12);
  assert_relative_eq!(calc.order(HedgeMode::Under).unwrap().contract_count, 2.272_727_272_727_272_5, epsilon = 1e-12);
  assert_relative_eq!(calc.order(HedgeMode::Over).unwrap().contract_count, 6.818_181_818_181_818, epsilon = 1e-12);
}

#[test]
fn three_point_scenario() {
  let scenario = MarketMoveScenario::linspace(-0.1, 0.1, 3).unwrap();
  assert_eq!(scenario.moves(), &[-0.1, 0.0, 0.1]);
  let calc = HedgeCalculator::new(
    ExposureProfile::new(5_000_000.0, 1.0),
    FuturesContractSpec::new(22_000.0, 50),
  )
  .unwrap();
  let (_, series) = calc.run(HedgeMode::Optimal, &scenario).unwrap();
  assert_eq!(series.net[1], 0.0);
}

#[test]
fn invalid_inputs_are_rejected() {
  let exposure = ExposureProfile::new(1_000_000.0, 1.0);
  assert!(compute_optimal_contracts(&exposure, &FuturesContractSpec::new(0.0, 50)).is_err());
  assert!(compute_optimal_contracts(&exposure, &FuturesContractSpec::new(100.0, 0)).is_err());
  assert!(apply_hedge_ratio(1.0, HedgeMode::Custom(0.0)).is_err());
  assert!(generate_scenario(0.1, -0.1, 5).is_err());
  assert!(generate_scenario(0.1, 0.1, 5).is_err());
  assert!(generate_scenario(-0.1, 0.1, 1).is_err());
  assert!(generate_scenario(f64::NAN, 0.1, 5).is_err());
}
