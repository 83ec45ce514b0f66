//! # Portfolio Types
//!
//! Shared input/output containers for frontier sampling and backtesting.

use chrono::NaiveDate;
use impl_new_derive::ImplNew;

use super::series::Series;

/// A weighted instrument in a portfolio definition.
#[derive(ImplNew, Clone, Debug)]
pub struct Instrument {
  /// Ticker symbol.
  pub ticker: String,
  /// Target weight (fraction, normalized against the portfolio total before use).
  pub weight: f64,
  /// Total expense ratio, annual, in percent (e.g. `0.07` for 7 bps).
  pub ter: f64,
}

/// Periodic rebalancing cadence.
///
/// Unrecognized strings parse to [`RebalanceFrequency::None`]: an unknown
/// cadence never triggers instead of failing the request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RebalanceFrequency {
  Monthly,
  #[default]
  Quarterly,
  Yearly,
  /// Never rebalance; weights drift for the whole horizon.
  None,
}

impl RebalanceFrequency {
  /// Parse a cadence from string.
  pub fn from_str(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "monthly" => Self::Monthly,
      "quarterly" => Self::Quarterly,
      "yearly" | "annual" | "annually" => Self::Yearly,
      _ => Self::None,
    }
  }
}

/// Configuration for the efficient frontier sampler.
#[derive(Clone, Debug)]
pub struct FrontierConfig {
  /// Number of random candidate portfolios to draw.
  pub num_portfolios: usize,
  /// Annual risk-free rate used in Sharpe scoring.
  pub risk_free_rate: f64,
  /// Number of interior efficient portfolios to select.
  pub num_efficient_portfolios: usize,
  /// Seed for the weight sampler; `None` seeds from entropy.
  pub seed: Option<u64>,
}

impl Default for FrontierConfig {
  fn default() -> Self {
    Self {
      num_portfolios: 100_000,
      risk_free_rate: 0.02,
      num_efficient_portfolios: 3,
      seed: None,
    }
  }
}

/// Configuration for the rebalancing backtest.
#[derive(Clone, Debug)]
pub struct BacktestConfig {
  /// Starting capital the cumulative value paths are scaled by.
  pub initial_investment: f64,
  /// Rebalancing cadence applied to portfolio and benchmark alike.
  pub rebalance_frequency: RebalanceFrequency,
  /// Proportional transaction cost per unit of turnover (e.g. `0.001`).
  pub transaction_cost: f64,
  /// Annual risk-free rate used by the metric bundle.
  pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
  fn default() -> Self {
    Self {
      initial_investment: 10_000.0,
      rebalance_frequency: RebalanceFrequency::Quarterly,
      transaction_cost: 0.001,
      risk_free_rate: 0.02,
    }
  }
}

/// A selected representative portfolio on the sampled frontier.
#[derive(Clone, Debug)]
pub struct RankedPortfolio {
  /// `"Efficient i"`, `"Max Sharpe"`, `"Min Volatility"` or `"Max Return"`.
  pub label: String,
  /// Weights, positionally aligned with the instrument list.
  pub weights: Vec<f64>,
  /// Annualized expected return.
  pub annual_return: f64,
  /// Annualized volatility (standard deviation).
  pub annual_volatility: f64,
  /// Sharpe ratio `(return - risk_free) / volatility`.
  pub sharpe_ratio: f64,
}

/// Output of a frontier sampling run.
#[derive(Clone, Debug)]
pub struct FrontierResult {
  /// Instrument tickers, in weight order.
  pub tickers: Vec<String>,
  /// Selected portfolios: `Efficient 1..k`, then Max Sharpe, Min Volatility, Max Return.
  pub portfolios: Vec<RankedPortfolio>,
  /// The configuration the run used.
  pub config: FrontierConfig,
}

impl FrontierResult {
  /// Ticker-to-weight pairs for one selected portfolio.
  pub fn weights_by_ticker<'a>(&'a self, portfolio: &'a RankedPortfolio) -> Vec<(&'a str, f64)> {
    self
      .tickers
      .iter()
      .map(String::as_str)
      .zip(portfolio.weights.iter().copied())
      .collect()
  }
}

/// Scalar risk/performance statistics for one return series.
#[derive(Clone, Copy, Debug, Default)]
pub struct PerformanceMetrics {
  /// Compound annual growth rate.
  pub cagr: f64,
  /// Annualized volatility.
  pub annual_volatility: f64,
  /// Maximum drawdown (non-positive fraction).
  pub max_drawdown: f64,
  /// CAGR over absolute max drawdown.
  pub calmar_ratio: f64,
  /// Annualized Sharpe ratio.
  pub sharpe_ratio: f64,
  /// Downside-deviation Sharpe variant.
  pub sortino_ratio: f64,
  /// Annualized 95% value at risk.
  pub var_95: f64,
  /// Best calendar-year compounded return.
  pub best_year: f64,
  /// Worst calendar-year compounded return.
  pub worst_year: f64,
  /// Fraction of periods with positive return.
  pub win_rate: f64,
  /// Beta against the benchmark, when one was supplied.
  pub beta: Option<f64>,
}

/// Output of a rebalancing backtest.
#[derive(Clone, Debug)]
pub struct BacktestResult {
  /// Portfolio metric bundle; `None` below 2 return observations.
  pub portfolio_metrics: Option<PerformanceMetrics>,
  /// Benchmark metric bundle.
  pub benchmark_metrics: Option<PerformanceMetrics>,
  /// Portfolio value path, scaled by the initial investment.
  pub portfolio_cumulative: Series,
  /// Benchmark value path, scaled by the initial investment.
  pub benchmark_cumulative: Series,
  /// Final portfolio value.
  pub final_portfolio_value: f64,
  /// Final benchmark value.
  pub final_benchmark_value: f64,
  /// First date of the common analysis range.
  pub start: NaiveDate,
  /// Last date of the common analysis range.
  pub end: NaiveDate,
}
