//! Error types for the strength engine.

use thiserror::Error;

/// Top-level engine error.
#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Data provider errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Bars out of order: {current} does not follow {previous}")]
    UnorderedBars {
        previous: chrono::NaiveDate,
        current: chrono::NaiveDate,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient history: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Indicator-set and scoring errors.
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Indicator set '{0}' has no indicators")]
    EmptyIndicatorSet(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("Indicator '{0}' is three-way and needs a neutral label")]
    MissingNeutralLabel(String),
}

/// Strategy price errors.
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Non-finite {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} {value} is outside the decimal range")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for engine operations.
pub type PulseResult<T> = Result<T, PulseError>;
