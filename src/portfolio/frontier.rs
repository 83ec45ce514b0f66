//! # Frontier Sampler
//!
//! $$
//! \text{Sharpe}(\mathbf{w}) = \frac{\mathbf{w}^\top \mu - r_f}{\sqrt{\mathbf{w}^\top \Sigma \mathbf{w}}}
//! $$
//!
//! Approximates the efficient frontier by scoring random weight vectors
//! instead of solving the quadratic program: no solver, no matrix inversion,
//! and degenerate covariance matrices are tolerated by construction.

use std::cmp::Ordering;

use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;
use ndarray::Zip;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use ndarray_stats::QuantileExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::debug;

use crate::error::AnalysisError;

use super::types::FrontierConfig;
use super::types::FrontierResult;
use super::types::RankedPortfolio;

const VOL_EPS: f64 = 1e-15;

/// Draw a `num × n` weight matrix: componentwise Uniform(0,1), then each row
/// L1-normalized.
///
/// This reproduces the uniform-then-normalize draw deliberately. It is not a
/// uniform sampler over the simplex and over-weights balanced portfolios.
fn sample_weight_matrix(num: usize, n: usize, rng: &mut StdRng) -> Array2<f64> {
  let mut weights = Array2::random_using((num, n), Uniform::new(0.0, 1.0), rng);
  let sums = weights.sum_axis(Axis(1)).insert_axis(Axis(1));
  weights /= &sums;
  weights
}

/// Evenly spaced interior points of `[min, max]`, excluding both endpoints.
fn interior_targets(min: f64, max: f64, k: usize) -> Vec<f64> {
  Array1::linspace(min, max, k + 2)
    .iter()
    .skip(1)
    .take(k)
    .copied()
    .collect()
}

/// Sample candidate portfolios and select the frontier representatives.
///
/// Output order is `Efficient 1..k` (ascending volatility targets) followed
/// by `Max Sharpe`, `Min Volatility` and `Max Return`.
pub fn sample_frontier(
  tickers: &[String],
  mu: &Array1<f64>,
  cov: &Array2<f64>,
  config: &FrontierConfig,
) -> Result<FrontierResult, AnalysisError> {
  let n = tickers.len();
  if n < 2 {
    return Err(AnalysisError::validation(
      "at least 2 instruments are required for frontier analysis",
    ));
  }
  if mu.len() != n || cov.shape() != [n, n] {
    return Err(AnalysisError::validation(
      "return vector and covariance matrix must match the instrument count",
    ));
  }
  if config.num_portfolios == 0 {
    return Err(AnalysisError::validation(
      "num_portfolios must be positive",
    ));
  }

  let mut rng = match config.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };

  debug!(
    candidates = config.num_portfolios,
    assets = n,
    "sampling candidate portfolios"
  );

  let weights = sample_weight_matrix(config.num_portfolios, n, &mut rng);
  let num = config.num_portfolios;

  let rets = weights.dot(mu);
  let sigma_w = weights.dot(cov);

  let mut vols = Array1::<f64>::zeros(num);
  Zip::from(&mut vols)
    .and(sigma_w.rows())
    .and(weights.rows())
    .par_for_each(|v, sw, w| {
      *v = sw.dot(&w).max(0.0).sqrt();
    });

  let risk_free = config.risk_free_rate;
  let sharpes = Zip::from(&rets).and(&vols).map_collect(|&r, &v| {
    if v > VOL_EPS {
      (r - risk_free) / v
    } else {
      0.0
    }
  });

  let max_sharpe_idx = sharpes
    .argmax()
    .map_err(|_| AnalysisError::data("candidate scores are not comparable"))?;
  let min_vol_idx = vols
    .argmin()
    .map_err(|_| AnalysisError::data("candidate volatilities are not comparable"))?;
  let max_ret_idx = rets
    .argmax()
    .map_err(|_| AnalysisError::data("candidate returns are not comparable"))?;

  // Ascending-volatility order with a running best-return prefix, so each
  // target lookup is a binary search plus O(1).
  let mut order: Vec<usize> = (0..num).collect();
  order.par_sort_by(|&a, &b| vols[a].partial_cmp(&vols[b]).unwrap_or(Ordering::Equal));

  let mut prefix_best = Vec::with_capacity(num);
  let mut best = order[0];
  for &idx in &order {
    if rets[idx] > rets[best] {
      best = idx;
    }
    prefix_best.push(best);
  }

  let min_vol = vols[order[0]];
  let max_vol = vols[order[num - 1]];

  let make = |label: String, idx: usize| RankedPortfolio {
    label,
    weights: weights.row(idx).to_vec(),
    annual_return: rets[idx],
    annual_volatility: vols[idx],
    sharpe_ratio: sharpes[idx],
  };

  let mut portfolios = Vec::with_capacity(config.num_efficient_portfolios + 3);
  for (i, target) in interior_targets(min_vol, max_vol, config.num_efficient_portfolios)
    .into_iter()
    .enumerate()
  {
    let pos = order.partition_point(|&idx| vols[idx] <= target);
    let chosen = if pos == 0 { max_ret_idx } else { prefix_best[pos - 1] };
    portfolios.push(make(format!("Efficient {}", i + 1), chosen));
  }

  portfolios.push(make("Max Sharpe".to_string(), max_sharpe_idx));
  portfolios.push(make("Min Volatility".to_string(), min_vol_idx));
  portfolios.push(make("Max Return".to_string(), max_ret_idx));

  debug!(selected = portfolios.len(), "frontier selection complete");

  Ok(FrontierResult {
    tickers: tickers.to_vec(),
    portfolios,
    config: config.clone(),
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::arr1;
  use ndarray::arr2;

  use super::*;

  fn three_asset_inputs() -> (Vec<String>, Array1<f64>, Array2<f64>) {
    let tickers = vec!["AAA".to_string(), "BBB".to_string(), "CCC".to_string()];
    let mu = arr1(&[0.08, 0.05, 0.12]);
    let cov = arr2(&[
      [0.040, 0.006, 0.010],
      [0.006, 0.010, 0.002],
      [0.010, 0.002, 0.090],
    ]);
    (tickers, mu, cov)
  }

  fn seeded_config(num: usize) -> FrontierConfig {
    FrontierConfig {
      num_portfolios: num,
      risk_free_rate: 0.02,
      num_efficient_portfolios: 3,
      seed: Some(42),
    }
  }

  #[test]
  fn sampled_weights_stay_on_the_simplex() {
    let mut rng = StdRng::seed_from_u64(7);
    let w = sample_weight_matrix(500, 4, &mut rng);

    for row in w.rows() {
      let sum: f64 = row.sum();
      assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
      for &x in row {
        assert!((0.0..=1.0).contains(&x));
      }
    }
  }

  #[test]
  fn interior_targets_split_the_volatility_range_evenly() {
    let targets = interior_targets(0.05, 0.25, 3);

    assert_eq!(targets.len(), 3);
    assert_relative_eq!(targets[0], 0.10, epsilon = 1e-12);
    assert_relative_eq!(targets[1], 0.15, epsilon = 1e-12);
    assert_relative_eq!(targets[2], 0.20, epsilon = 1e-12);
  }

  #[test]
  fn selection_is_ordered_and_labeled() {
    let (tickers, mu, cov) = three_asset_inputs();
    let result = sample_frontier(&tickers, &mu, &cov, &seeded_config(5_000)).unwrap();

    let labels: Vec<&str> = result.portfolios.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec![
      "Efficient 1",
      "Efficient 2",
      "Efficient 3",
      "Max Sharpe",
      "Min Volatility",
      "Max Return",
    ]);

    for p in &result.portfolios {
      assert_relative_eq!(p.weights.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }
  }

  #[test]
  fn key_portfolios_dominate_on_their_axis() {
    let (tickers, mu, cov) = three_asset_inputs();
    let result = sample_frontier(&tickers, &mu, &cov, &seeded_config(5_000)).unwrap();

    let min_vol = result
      .portfolios
      .iter()
      .find(|p| p.label == "Min Volatility")
      .unwrap();
    let max_ret = result
      .portfolios
      .iter()
      .find(|p| p.label == "Max Return")
      .unwrap();

    for p in &result.portfolios {
      assert!(min_vol.annual_volatility <= p.annual_volatility + 1e-12);
      assert!(max_ret.annual_return >= p.annual_return - 1e-12);
    }
  }

  #[test]
  fn seeded_runs_are_reproducible() {
    let (tickers, mu, cov) = three_asset_inputs();
    let a = sample_frontier(&tickers, &mu, &cov, &seeded_config(2_000)).unwrap();
    let b = sample_frontier(&tickers, &mu, &cov, &seeded_config(2_000)).unwrap();

    for (pa, pb) in a.portfolios.iter().zip(b.portfolios.iter()) {
      assert_eq!(pa.label, pb.label);
      assert_eq!(pa.weights, pb.weights);
      assert_eq!(pa.sharpe_ratio, pb.sharpe_ratio);
    }
  }

  #[test]
  fn fewer_than_two_instruments_is_rejected() {
    let tickers = vec!["AAA".to_string()];
    let mu = arr1(&[0.08]);
    let cov = arr2(&[[0.04]]);

    let err = sample_frontier(&tickers, &mu, &cov, &seeded_config(100)).unwrap_err();
    assert!(matches!(err, AnalysisError::Validation(_)));
  }

  #[test]
  fn zero_covariance_yields_finite_scores() {
    let tickers = vec!["AAA".to_string(), "BBB".to_string()];
    let mu = arr1(&[0.05, 0.05]);
    let cov = Array2::zeros((2, 2));

    let result = sample_frontier(&tickers, &mu, &cov, &seeded_config(500)).unwrap();
    for p in &result.portfolios {
      assert!(p.sharpe_ratio.is_finite());
      assert_eq!(p.annual_volatility, 0.0);
    }
  }
}
