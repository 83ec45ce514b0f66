//! # Return Statistics
//!
//! $$
//! \hat r = \left(\prod_t (1+r_t)\right)^{p/n} - 1
//! $$
//!
//! Helpers turning aligned price series into the annualized return vector
//! and covariance matrix the frontier sampler scores against.

use ndarray::Array2;
use statrs::statistics::Statistics;

use crate::error::AnalysisError;

use super::series::Series;
use super::types::Instrument;

/// Periods per year for monthly-resampled return series.
pub const MONTHLY_PERIODS: f64 = 12.0;

/// Convert aligned price series into periodic return series.
///
/// Errors when any instrument ends up with fewer than 2 return periods,
/// which is the minimum for covariance estimation.
pub fn return_matrix(prices: &[Series]) -> Result<Vec<Series>, AnalysisError> {
  if prices.is_empty() {
    return Err(AnalysisError::data("no price series supplied"));
  }

  let returns: Vec<Series> = prices.iter().map(Series::pct_change).collect();
  for r in &returns {
    if r.len() < 2 {
      return Err(AnalysisError::data(
        "fewer than 2 return periods available after alignment",
      ));
    }
  }

  Ok(returns)
}

/// Normalize instrument weights to sum to 1.
pub fn normalized_weights(instruments: &[Instrument]) -> Result<Vec<f64>, AnalysisError> {
  if instruments.is_empty() {
    return Err(AnalysisError::validation("empty instrument set"));
  }

  let total: f64 = instruments.iter().map(|i| i.weight).sum();
  if total <= 0.0 {
    return Err(AnalysisError::validation(
      "instrument weights must sum to a positive value",
    ));
  }

  Ok(instruments.iter().map(|i| i.weight / total).collect())
}

/// Annualized compounded return per instrument.
pub fn annualized_returns(
  returns: &[Series],
  periods_per_year: f64,
) -> Result<Vec<f64>, AnalysisError> {
  returns
    .iter()
    .map(|r| {
      let n = r.len();
      if n < 2 {
        return Err(AnalysisError::data(
          "fewer than 2 return periods available",
        ));
      }
      let growth: f64 = r.values.iter().map(|x| 1.0 + x).product();
      Ok(growth.powf(periods_per_year / n as f64) - 1.0)
    })
    .collect()
}

/// Subtract each instrument's annual expense ratio from its annualized return.
///
/// `ter` is quoted in percent; the drag applied is `ter / 100`.
pub fn expense_adjusted_returns(annual: &[f64], instruments: &[Instrument]) -> Vec<f64> {
  annual
    .iter()
    .zip(instruments.iter())
    .map(|(r, inst)| r - inst.ter / 100.0)
    .collect()
}

/// Annualized sample covariance matrix of periodic returns.
pub fn annualized_covariance(
  returns: &[Series],
  periods_per_year: f64,
) -> Result<Array2<f64>, AnalysisError> {
  let n = returns.len();
  for r in returns {
    if r.len() < 2 {
      return Err(AnalysisError::data(
        "fewer than 2 return periods available",
      ));
    }
  }

  let mut cov = Array2::<f64>::zeros((n, n));
  for i in 0..n {
    for j in i..n {
      let c = returns[i]
        .values
        .as_slice()
        .covariance(returns[j].values.as_slice())
        * periods_per_year;
      cov[[i, j]] = c;
      cov[[j, i]] = c;
    }
  }

  Ok(cov)
}

/// Fixed-weight per-period portfolio return, `w · r_t`.
///
/// Inputs are assumed aligned; dates are taken from the first series.
pub fn weighted_returns(returns: &[Series], weights: &[f64]) -> Series {
  let n_periods = returns.first().map(|r| r.len()).unwrap_or(0);

  let values = (0..n_periods)
    .map(|t| {
      weights
        .iter()
        .zip(returns.iter())
        .map(|(w, r)| w * r.values[t])
        .sum()
    })
    .collect();

  let dates = returns
    .first()
    .map(|r| r.dates.clone())
    .unwrap_or_default();

  Series::new(dates, values)
}
