//! # Performance Metrics
//!
//! $$
//! \text{CAGR} = \left(\frac{V_T}{V_0}\right)^{1/\text{years}} - 1
//! $$
//!
//! Risk and performance statistics derived from a periodic return series.
//! Degenerate ratios (zero volatility, zero drawdown, no negative returns,
//! zero benchmark variance) substitute 0 instead of propagating NaN.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::Datelike;
use statrs::statistics::Statistics;

use super::series::Series;
use super::types::PerformanceMetrics;

/// Trading periods per year used for annualization.
pub const TRADING_DAYS: f64 = 252.0;

const DAYS_PER_YEAR: f64 = 365.25;

/// Percentile with linear interpolation between order statistics.
fn percentile(values: &[f64], p: f64) -> f64 {
  let mut sorted = values.to_vec();
  sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

  let n = sorted.len();
  if n == 1 {
    return sorted[0];
  }

  let rank = p / 100.0 * (n - 1) as f64;
  let lo = rank.floor() as usize;
  let hi = (lo + 1).min(n - 1);
  let frac = rank - lo as f64;

  sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Compounded return per calendar year.
fn yearly_returns(returns: &Series) -> Vec<f64> {
  let mut growth: BTreeMap<i32, f64> = BTreeMap::new();
  for (date, r) in returns.dates.iter().zip(returns.values.iter()) {
    *growth.entry(date.year()).or_insert(1.0) *= 1.0 + r;
  }

  growth.into_values().map(|g| g - 1.0).collect()
}

/// Compute the metric bundle for a return series.
///
/// `benchmark` enables beta when it has the same length as `returns`.
/// Returns `None` below 2 observations.
pub fn compute_metrics(
  returns: &Series,
  benchmark: Option<&Series>,
  risk_free_rate: f64,
) -> Option<PerformanceMetrics> {
  let n = returns.len();
  if n < 2 {
    return None;
  }

  let values = returns.values.as_slice();
  let cumulative = returns.cumulative(1.0);

  let total_days = (returns.dates[n - 1] - returns.dates[0]).num_days() as f64;
  let total_years = if total_days > 0.0 {
    total_days / DAYS_PER_YEAR
  } else {
    0.0
  };

  let cagr = if total_years > 0.0 {
    (cumulative.values[n - 1] / cumulative.values[0]).powf(1.0 / total_years) - 1.0
  } else {
    0.0
  };

  let std = values.std_dev();
  let annual_volatility = std * TRADING_DAYS.sqrt();

  let mut peak = f64::NEG_INFINITY;
  let mut max_drawdown = 0.0_f64;
  for &v in &cumulative.values {
    peak = peak.max(v);
    max_drawdown = max_drawdown.min((v - peak) / peak);
  }

  let calmar_ratio = if max_drawdown != 0.0 {
    cagr / max_drawdown.abs()
  } else {
    0.0
  };

  let sharpe_ratio = if std > 0.0 {
    let excess_mean = values
      .iter()
      .map(|r| r - risk_free_rate / TRADING_DAYS)
      .sum::<f64>()
      / n as f64;
    excess_mean / std * TRADING_DAYS.sqrt()
  } else {
    0.0
  };

  let negatives: Vec<f64> = values.iter().copied().filter(|r| *r < 0.0).collect();
  let sortino_ratio = if negatives.len() >= 2 {
    let downside = negatives.as_slice().std_dev() * TRADING_DAYS.sqrt();
    if downside > 0.0 {
      (cagr - risk_free_rate) / downside
    } else {
      0.0
    }
  } else {
    0.0
  };

  let var_95 = percentile(values, 5.0) * TRADING_DAYS.sqrt();

  let beta = benchmark.and_then(|bench| {
    if bench.len() != n {
      return None;
    }
    let bench_values = bench.values.as_slice();
    let bench_var = bench_values.population_variance();
    if bench_var != 0.0 {
      Some(values.covariance(bench_values) / bench_var)
    } else {
      Some(0.0)
    }
  });

  let by_year = yearly_returns(returns);
  let best_year = by_year.iter().copied().fold(f64::NEG_INFINITY, f64::max);
  let worst_year = by_year.iter().copied().fold(f64::INFINITY, f64::min);

  let win_rate = values.iter().filter(|r| **r > 0.0).count() as f64 / n as f64;

  Some(PerformanceMetrics {
    cagr,
    annual_volatility,
    max_drawdown,
    calmar_ratio,
    sharpe_ratio,
    sortino_ratio,
    var_95,
    best_year,
    worst_year,
    win_rate,
    beta,
  })
}
