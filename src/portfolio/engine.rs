//! # Analysis Engine
//!
//! High-level orchestration: price series in, frontier/backtest results out.
//! Retrieval stays behind [`PriceSeriesProvider`] so the engine itself never
//! performs I/O.

use chrono::NaiveDate;
use ndarray::Array1;
use tracing::debug;
use tracing::info;

use crate::error::AnalysisError;

use super::data::MONTHLY_PERIODS;
use super::data::annualized_covariance;
use super::data::annualized_returns;
use super::data::expense_adjusted_returns;
use super::data::normalized_weights;
use super::data::return_matrix;
use super::frontier::sample_frontier;
use super::metrics::compute_metrics;
use super::rebalance::simulate_rebalanced;
use super::series::Series;
use super::series::align;
use super::types::BacktestConfig;
use super::types::BacktestResult;
use super::types::FrontierConfig;
use super::types::FrontierResult;
use super::types::Instrument;

/// Collaborator contract for historical price retrieval.
///
/// Implementations return one daily close series per ticker, in ticker
/// order, and fail with [`AnalysisError::Retrieval`] when any ticker yields
/// no rows.
pub trait PriceSeriesProvider {
  /// Fetch daily close series for `tickers` over `[start, end]`.
  fn fetch_price_series(
    &self,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<Series>, AnalysisError>;
}

/// Single entry-point engine for frontier and backtest workflows.
#[derive(Clone, Debug, Default)]
pub struct AnalysisEngine {
  frontier_config: FrontierConfig,
  backtest_config: BacktestConfig,
}

impl AnalysisEngine {
  /// Construct an engine with explicit configuration.
  pub fn new(frontier_config: FrontierConfig, backtest_config: BacktestConfig) -> Self {
    Self {
      frontier_config,
      backtest_config,
    }
  }

  /// Borrow the frontier configuration.
  pub fn frontier_config(&self) -> &FrontierConfig {
    &self.frontier_config
  }

  /// Borrow the backtest configuration.
  pub fn backtest_config(&self) -> &BacktestConfig {
    &self.backtest_config
  }

  /// Approximate the efficient frontier for `instruments`.
  ///
  /// `prices` holds one daily close series per instrument, in instrument
  /// order. The frontier path resamples to month-end prices, so annualized
  /// statistics use 12 periods per year.
  pub fn efficient_frontier(
    &self,
    instruments: &[Instrument],
    prices: &[Series],
  ) -> Result<FrontierResult, AnalysisError> {
    if instruments.len() < 2 {
      return Err(AnalysisError::validation(
        "at least 2 instruments are required for frontier analysis",
      ));
    }
    if prices.len() != instruments.len() {
      return Err(AnalysisError::validation(
        "one price series per instrument is required",
      ));
    }

    info!(
      instruments = instruments.len(),
      candidates = self.frontier_config.num_portfolios,
      "running efficient frontier analysis"
    );

    let monthly: Vec<Series> = prices.iter().map(Series::resample_month_end).collect();
    let aligned = align(&monthly)?;
    let returns = return_matrix(&aligned)?;
    debug!(periods = returns[0].len(), "aligned monthly return series");

    let annual = annualized_returns(&returns, MONTHLY_PERIODS)?;
    let annual = expense_adjusted_returns(&annual, instruments);
    let cov = annualized_covariance(&returns, MONTHLY_PERIODS)?;

    let tickers: Vec<String> = instruments.iter().map(|i| i.ticker.clone()).collect();
    sample_frontier(&tickers, &Array1::from(annual), &cov, &self.frontier_config)
  }

  /// Backtest `portfolio` against `benchmark` over their common date range.
  ///
  /// Both sides are simulated with the same rebalancing cadence and
  /// transaction cost; the portfolio bundle carries beta against the
  /// benchmark when both return series end up the same length.
  pub fn backtest(
    &self,
    portfolio: &[Instrument],
    portfolio_prices: &[Series],
    benchmark: &[Instrument],
    benchmark_prices: &[Series],
  ) -> Result<BacktestResult, AnalysisError> {
    if portfolio.is_empty() || benchmark.is_empty() {
      return Err(AnalysisError::validation(
        "portfolio and benchmark must each hold at least one instrument",
      ));
    }
    if portfolio_prices.len() != portfolio.len() || benchmark_prices.len() != benchmark.len() {
      return Err(AnalysisError::validation(
        "one price series per instrument is required",
      ));
    }

    let config = &self.backtest_config;
    info!(
      instruments = portfolio.len(),
      frequency = ?config.rebalance_frequency,
      "running rebalancing backtest"
    );

    let aligned_portfolio = align(portfolio_prices)?;
    let aligned_benchmark = align(benchmark_prices)?;

    // Clip both sides to the common range for a fair comparison; dates are
    // not intersected across the two sides.
    let (start, end) = common_range(&aligned_portfolio[0], &aligned_benchmark[0])?;
    let clipped_portfolio: Vec<Series> =
      aligned_portfolio.iter().map(|s| s.clip(start, end)).collect();
    let clipped_benchmark: Vec<Series> =
      aligned_benchmark.iter().map(|s| s.clip(start, end)).collect();

    let portfolio_returns = return_matrix(&clipped_portfolio)?;
    let benchmark_returns = return_matrix(&clipped_benchmark)?;
    debug!(
      periods = portfolio_returns[0].len(),
      "aligned daily return series"
    );

    let portfolio_weights = normalized_weights(portfolio)?;
    let benchmark_weights = normalized_weights(benchmark)?;

    let simulated_portfolio = simulate_rebalanced(
      &portfolio_returns,
      &portfolio_weights,
      config.rebalance_frequency,
      config.transaction_cost,
    )?;
    let simulated_benchmark = simulate_rebalanced(
      &benchmark_returns,
      &benchmark_weights,
      config.rebalance_frequency,
      config.transaction_cost,
    )?;

    let portfolio_cumulative = simulated_portfolio.cumulative(config.initial_investment);
    let benchmark_cumulative = simulated_benchmark.cumulative(config.initial_investment);

    let portfolio_metrics = compute_metrics(
      &simulated_portfolio,
      Some(&simulated_benchmark),
      config.risk_free_rate,
    );
    let benchmark_metrics = compute_metrics(&simulated_benchmark, None, config.risk_free_rate);

    let final_portfolio_value = portfolio_cumulative
      .values
      .last()
      .copied()
      .unwrap_or(config.initial_investment);
    let final_benchmark_value = benchmark_cumulative
      .values
      .last()
      .copied()
      .unwrap_or(config.initial_investment);

    Ok(BacktestResult {
      portfolio_metrics,
      benchmark_metrics,
      portfolio_cumulative,
      benchmark_cumulative,
      final_portfolio_value,
      final_benchmark_value,
      start,
      end,
    })
  }

  /// Fetch prices through `provider` and run [`AnalysisEngine::efficient_frontier`].
  pub fn efficient_frontier_from<P: PriceSeriesProvider>(
    &self,
    provider: &P,
    instruments: &[Instrument],
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<FrontierResult, AnalysisError> {
    let tickers: Vec<String> = instruments.iter().map(|i| i.ticker.clone()).collect();
    let prices = provider.fetch_price_series(&tickers, start, end)?;
    self.efficient_frontier(instruments, &prices)
  }

  /// Fetch prices through `provider` and run [`AnalysisEngine::backtest`].
  pub fn backtest_from<P: PriceSeriesProvider>(
    &self,
    provider: &P,
    portfolio: &[Instrument],
    benchmark: &[Instrument],
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<BacktestResult, AnalysisError> {
    let portfolio_tickers: Vec<String> = portfolio.iter().map(|i| i.ticker.clone()).collect();
    let benchmark_tickers: Vec<String> = benchmark.iter().map(|i| i.ticker.clone()).collect();

    let portfolio_prices = provider.fetch_price_series(&portfolio_tickers, start, end)?;
    let benchmark_prices = provider.fetch_price_series(&benchmark_tickers, start, end)?;

    self.backtest(portfolio, &portfolio_prices, benchmark, &benchmark_prices)
  }
}

fn common_range(portfolio: &Series, benchmark: &Series) -> Result<(NaiveDate, NaiveDate), AnalysisError> {
  let start = portfolio
    .first_date()
    .into_iter()
    .chain(benchmark.first_date())
    .max()
    .ok_or_else(|| AnalysisError::data("empty price series after alignment"))?;
  let end = portfolio
    .last_date()
    .into_iter()
    .chain(benchmark.last_date())
    .min()
    .ok_or_else(|| AnalysisError::data("empty price series after alignment"))?;

  if start > end {
    return Err(AnalysisError::data(
      "portfolio and benchmark date ranges do not overlap",
    ));
  }

  Ok((start, end))
}
