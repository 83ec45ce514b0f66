//! # Portfolio
//!
//! $$
//! \sigma_p^2 = \mathbf{w}^\top \Sigma \mathbf{w}
//! $$
//!
//! Efficient frontier sampling, rebalancing simulation and performance
//! metrics over dated price series.

pub mod data;
pub mod engine;
pub mod frontier;
pub mod metrics;
pub mod rebalance;
pub mod series;
pub mod types;

pub use data::annualized_covariance;
pub use data::annualized_returns;
pub use data::expense_adjusted_returns;
pub use data::normalized_weights;
pub use data::return_matrix;
pub use data::weighted_returns;
pub use engine::AnalysisEngine;
pub use engine::PriceSeriesProvider;
pub use frontier::sample_frontier;
pub use metrics::compute_metrics;
pub use rebalance::simulate_rebalanced;
pub use series::Series;
pub use series::align;
pub use types::BacktestConfig;
pub use types::BacktestResult;
pub use types::FrontierConfig;
pub use types::FrontierResult;
pub use types::Instrument;
pub use types::PerformanceMetrics;
pub use types::RankedPortfolio;
pub use types::RebalanceFrequency;
