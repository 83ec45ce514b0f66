//! # Portfolio Allocation & Backtesting
//!
//! `frontier-rs` computes investment portfolio allocations from historical
//! price series and backtests fixed-weight portfolios against a benchmark.
//!
//! ## Modules
//!
//! | Module        | Description                                                                  |
//! |---------------|------------------------------------------------------------------------------|
//! | [`portfolio`] | The quantitative engine: return statistics, frontier sampler, rebalancing simulator, performance metrics. |
//! | [`error`]     | The [`error::AnalysisError`] taxonomy shared by the engine.                  |
//!
//! ## Design
//!
//! The efficient frontier is approximated by scoring random weight vectors
//! against annualized return/covariance statistics rather than by quadratic
//! optimization. This keeps the engine free of solvers and matrix inversion
//! and tolerant of degenerate covariance matrices. Candidate scoring is
//! vectorized and parallel via `ndarray` + `rayon`; the rebalancing walk is
//! sequential because every step depends on the drifted weights of the
//! previous one.
//!
//! Price retrieval is a collaborator concern: implement
//! [`portfolio::PriceSeriesProvider`] over your data source and hand the
//! engine daily close series.

pub mod error;
pub mod portfolio;

pub use error::AnalysisError;
