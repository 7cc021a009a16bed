// File: crates/chart-engine/src/error.rs
// Summary: Error taxonomy for validation, degenerate domains and contract violations.

use thiserror::Error;

/// Reasons an input dataset is rejected before any scale or geometry work.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidData {
    #[error("series list is empty")]
    EmptySeriesList,

    #[error("series '{id}' has no points")]
    EmptySeries { id: String },

    #[error("series '{id}' is not sorted by x at index {index}")]
    Unsorted { id: String, index: usize },

    #[error("series '{id}' has a non-finite y value at index {index}")]
    NonFinite { id: String, index: usize },

    #[error("series id '{id}' appears more than once")]
    DuplicateId { id: String },

    #[error("row list is empty")]
    EmptyRows,

    #[error("row '{category}' has a non-finite value")]
    NonFiniteRow { category: String },

    #[error("row '{category}' is missing numeric field '{field}'")]
    MissingField { category: String, field: String },

    #[error("drawable area must be positive (got {width}x{height})")]
    Dimensions { width: f64, height: f64 },
}

/// Common error type for the chart engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(#[from] InvalidData),

    #[error("degenerate domain [{lo}, {hi}]")]
    DegenerateDomain { lo: f64, hi: f64 },

    #[error("contract violation: {0}")]
    ContractViolation(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias using the engine's error.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Report a programmer error.
///
/// Always logged. Panics when built with the `strict-contracts` feature,
/// otherwise hands back an error the caller is expected to log and skip.
pub(crate) fn contract_violation(message: impl Into<String>) -> ChartError {
    let message = message.into();
    tracing::error!(%message, "contract violation");
    if cfg!(feature = "strict-contracts") {
        panic!("contract violation: {message}");
    }
    ChartError::ContractViolation(message)
}
