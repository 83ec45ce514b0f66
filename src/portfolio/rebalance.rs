//! # Rebalancing Simulator
//!
//! Walks a daily return series holding a fixed-target-weight portfolio:
//! weights drift with relative asset performance, and on every period-marker
//! change a proportional transaction cost is charged before the weights snap
//! back to target. The walk is inherently sequential — each step depends on
//! the drifted weights and cumulative value of the previous one.

use chrono::Datelike;
use chrono::NaiveDate;

use crate::error::AnalysisError;

use super::series::Series;
use super::types::RebalanceFrequency;

const RETURN_EPS: f64 = 1e-15;

/// Period marker for a date under the given cadence, `None` when the cadence
/// never triggers.
fn period_marker(frequency: RebalanceFrequency, date: NaiveDate) -> Option<i32> {
  let year = date.year();
  let month = date.month() as i32;

  match frequency {
    RebalanceFrequency::Monthly => Some(year * 12 + month),
    RebalanceFrequency::Quarterly => Some(year * 4 + (month - 1) / 3),
    RebalanceFrequency::Yearly => Some(year),
    RebalanceFrequency::None => None,
  }
}

/// Simulate a rebalanced portfolio over aligned per-instrument daily returns.
///
/// The value path starts at 1.0 on the first return date; that row only
/// seeds the rebalance marker. The output is the `pct_change` of the value
/// path, one observation shorter than the input.
pub fn simulate_rebalanced(
  returns: &[Series],
  target_weights: &[f64],
  frequency: RebalanceFrequency,
  transaction_cost: f64,
) -> Result<Series, AnalysisError> {
  let first = returns
    .first()
    .ok_or_else(|| AnalysisError::data("no return series supplied"))?;
  let n = first.len();

  if returns.len() != target_weights.len() {
    return Err(AnalysisError::validation(
      "weight vector length must match the number of return series",
    ));
  }
  if n < 2 {
    return Err(AnalysisError::data(
      "fewer than 2 return periods available for simulation",
    ));
  }
  if returns.iter().any(|r| r.len() != n) {
    return Err(AnalysisError::data(
      "return series are not aligned to a common length",
    ));
  }

  let dates = &first.dates;
  let mut weights = target_weights.to_vec();
  let mut value = vec![1.0; n];
  let mut marker = period_marker(frequency, dates[0]);

  for t in 1..n {
    let mut portfolio_return = 0.0;
    for (i, r) in returns.iter().enumerate() {
      portfolio_return += weights[i] * r.values[t];
    }
    value[t] = value[t - 1] * (1.0 + portfolio_return);

    // Drift: asset values diverge, so weights renormalize implicitly.
    let gross = 1.0 + portfolio_return;
    if gross.abs() > RETURN_EPS {
      for (i, r) in returns.iter().enumerate() {
        weights[i] = weights[i] * (1.0 + r.values[t]) / gross;
      }
    }

    if let (Some(current), Some(last)) = (period_marker(frequency, dates[t]), marker) {
      if current != last {
        let turnover: f64 = weights
          .iter()
          .zip(target_weights.iter())
          .map(|(w, target)| (w - target).abs())
          .sum();
        value[t] *= 1.0 - transaction_cost * turnover;

        weights.copy_from_slice(target_weights);
        marker = Some(current);
      }
    }
  }

  Ok(Series::new(dates.clone(), value).pct_change())
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use chrono::NaiveDate;

  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  fn daily_series(dates: &[NaiveDate], values: &[f64]) -> Series {
    Series::new(dates.to_vec(), values.to_vec())
  }

  /// Drift-only walk computed by hand for cross-checking.
  fn drift_only(returns: &[Series], target: &[f64]) -> Vec<f64> {
    let n = returns[0].len();
    let mut w = target.to_vec();
    let mut value = vec![1.0; n];

    for t in 1..n {
      let pr: f64 = returns.iter().zip(&w).map(|(r, wi)| wi * r.values[t]).sum();
      value[t] = value[t - 1] * (1.0 + pr);
      for (i, r) in returns.iter().enumerate() {
        w[i] = w[i] * (1.0 + r.values[t]) / (1.0 + pr);
      }
    }

    value
  }

  #[test]
  fn none_frequency_never_charges_costs() {
    let dates: Vec<NaiveDate> = (2..=31)
      .map(|day| d(2024, 1, day))
      .chain((1..=28).map(|day| d(2024, 2, day)))
      .collect();

    let a = daily_series(&dates, &vec![0.01; dates.len()]);
    let b = daily_series(&dates, &vec![-0.002; dates.len()]);
    let target = [0.7, 0.3];

    // A punitive cost rate must not matter when no trigger ever fires.
    let out = simulate_rebalanced(
      &[a.clone(), b.clone()],
      &target,
      RebalanceFrequency::None,
      0.5,
    )
    .unwrap();

    let expected = drift_only(&[a, b], &target);
    for (t, got) in out.values.iter().enumerate() {
      let want = expected[t + 1] / expected[t] - 1.0;
      assert_relative_eq!(got, &want, epsilon = 1e-12);
    }
  }

  #[test]
  fn identical_assets_make_rebalancing_free() {
    let dates: Vec<NaiveDate> = (2..=30).map(|day| d(2024, 1, day)).chain(
      (1..=28).map(|day| d(2024, 2, day)),
    )
    .collect();

    // Identical returns: weights never drift, so every rebalance is a no-op
    // and any cadence matches the drift-only walk even with zero cost.
    let r = vec![0.003; dates.len()];
    let a = daily_series(&dates, &r);
    let b = daily_series(&dates, &r);
    let target = [0.5, 0.5];

    let none = simulate_rebalanced(
      &[a.clone(), b.clone()],
      &target,
      RebalanceFrequency::None,
      0.0,
    )
    .unwrap();
    let monthly = simulate_rebalanced(
      &[a, b],
      &target,
      RebalanceFrequency::Monthly,
      0.0,
    )
    .unwrap();

    for (x, y) in none.values.iter().zip(monthly.values.iter()) {
      assert_relative_eq!(x, y, epsilon = 1e-12);
    }
  }

  #[test]
  fn month_boundary_applies_turnover_cost_once() {
    let dates = vec![d(2024, 1, 30), d(2024, 1, 31), d(2024, 2, 1), d(2024, 2, 2)];

    // One asset doubles relative to the other so weights drift hard before
    // the February trigger.
    let a = daily_series(&dates, &[0.0, 0.10, 0.0, 0.0]);
    let b = daily_series(&dates, &[0.0, -0.10, 0.0, 0.0]);
    let target = [0.5, 0.5];
    let cost = 0.01;

    let out = simulate_rebalanced(
      &[a.clone(), b.clone()],
      &target,
      RebalanceFrequency::Monthly,
      cost,
    )
    .unwrap();

    // After Jan 31: pr = 0, weights drift to [0.55, 0.45].
    // Feb 1 return is zero, so the whole Feb 1 move is the cost charge.
    let turnover = 0.1;
    assert_relative_eq!(out.values[0], 0.0, epsilon = 1e-12);
    assert_relative_eq!(out.values[1], -(cost * turnover), epsilon = 1e-12);
    // Weights were reset; the flat Feb 2 day is flat again.
    assert_relative_eq!(out.values[2], 0.0, epsilon = 1e-12);
  }

  #[test]
  fn output_is_one_shorter_than_input() {
    let dates: Vec<NaiveDate> = (2..=11).map(|day| d(2024, 3, day)).collect();
    let a = daily_series(&dates, &vec![0.001; 10]);

    let out = simulate_rebalanced(&[a], &[1.0], RebalanceFrequency::None, 0.0).unwrap();
    assert_eq!(out.len(), 9);
    assert_eq!(out.dates.first().copied(), Some(d(2024, 3, 3)));
  }

  #[test]
  fn misaligned_inputs_are_rejected() {
    let a = daily_series(&[d(2024, 1, 2), d(2024, 1, 3)], &[0.01, 0.01]);
    let b = daily_series(&[d(2024, 1, 2)], &[0.01]);

    assert!(simulate_rebalanced(&[a.clone(), b], &[0.5, 0.5], RebalanceFrequency::None, 0.0).is_err());
    assert!(simulate_rebalanced(&[a], &[0.5, 0.5], RebalanceFrequency::None, 0.0).is_err());
    assert!(simulate_rebalanced(&[], &[], RebalanceFrequency::None, 0.0).is_err());
  }
}
