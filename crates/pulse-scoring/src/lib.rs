//! Strength scoring.
//!
//! Each indicator in an [`IndicatorSet`] evaluates a predicate over the
//! latest two rows of an [`IndicatorFrame`](pulse_core::IndicatorFrame)
//! and the institutional flow flags. The [`ScoringEngine`] turns the
//! resulting verdicts into a 0-100 score and a [`Rating`].

pub mod engine;
pub mod indicator;
pub mod registry;
pub mod set;
pub mod verdict;

pub use engine::{score_from_states, Rating, ScoreResult, ScoringEngine};
pub use indicator::IndicatorId;
pub use registry::{PresetInfo, PresetRegistry, COMPACT, FULL, STANDARD};
pub use set::{IndicatorDescriptor, IndicatorLabels, IndicatorSet};
pub use verdict::{IndicatorVerdict, Signal, Verdict};
