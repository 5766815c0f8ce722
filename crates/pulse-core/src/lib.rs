//! Core types and traits for the strength engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries)
//! - Per-bar indicator snapshots and the augmented indicator frame
//! - Institutional trade-flow records and the derived flow flags
//! - Core traits for indicators and the external data providers

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DataError, IndicatorError, PricingError, PulseError, PulseResult, ScoringError};
pub use traits::*;
pub use types::*;
