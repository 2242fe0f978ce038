use thiserror::Error;

/// Errors surfaced by the analytics engine and the service layer.
///
/// Every variant except `Repository` describes a caller-input or data-state
/// condition; none of them is transient and nothing here is retried.
/// Repository failures pass through unchanged.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Malformed or contradictory parameters (bad date range, too few
    /// comparison subjects, zero lookback).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A lookback or subject count exceeds its documented cap. Never
    /// silently clamped.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// Trend analysis requires at least two populated days.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// The referenced location has no registration.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unexpected failure from the snapshot repository, propagated as-is.
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
