//! Error types for portfolio analysis.

use thiserror::Error;

/// Analysis error type.
#[derive(Error, Debug)]
pub enum AnalysisError {
  /// Input shape is unusable (too few instruments, empty weight set, ...).
  #[error("validation error: {0}")]
  Validation(String),

  /// No usable price/return data after alignment.
  #[error("data error: {0}")]
  Data(String),

  /// The price series provider failed to deliver rows.
  #[error("retrieval error: {0}")]
  Retrieval(String),
}

impl AnalysisError {
  /// Build a [`AnalysisError::Validation`] from anything displayable.
  pub fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }

  /// Build a [`AnalysisError::Data`] from anything displayable.
  pub fn data(msg: impl Into<String>) -> Self {
    Self::Data(msg.into())
  }
}
