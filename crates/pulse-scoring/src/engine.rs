//! Composite strength score.

use std::fmt;

use pulse_core::types::{AugmentedBar, IndicatorFrame, InstitutionalFlow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::set::IndicatorSet;
use crate::verdict::IndicatorVerdict;

/// Coarse rating derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// Score of 70 or more
    Strong,
    /// Score from 50 up to 70
    Stable,
    /// Score below 50
    Weak,
}

impl Rating {
    pub const STRONG_THRESHOLD: u8 = 70;
    pub const STABLE_THRESHOLD: u8 = 50;

    pub fn from_score(score: u8) -> Self {
        if score >= Self::STRONG_THRESHOLD {
            Self::Strong
        } else if score >= Self::STABLE_THRESHOLD {
            Self::Stable
        } else {
            Self::Weak
        }
    }

    /// Canonical comment for the rating.
    pub fn comment(&self) -> &'static str {
        match self {
            Self::Strong => "Strong structure: trend and momentum agree, buyers in control",
            Self::Stable => "Stable: constructive but mixed, wait for confirmation",
            Self::Weak => "Weak: sellers in control, stay defensive",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Stable => "stable",
            Self::Weak => "weak",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 0 to 100
    pub score: u8,
    pub rating: Rating,
    pub comment: String,
    /// Name of the indicator set used
    pub indicator_set: String,
    pub verdicts: Vec<IndicatorVerdict>,
}

impl ScoreResult {
    /// Number of fully bullish verdicts.
    pub fn bullish_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.state() == 1.0).count()
    }
}

/// `round(100 * mean(states))`, halves rounded away from zero.
///
/// States outside `[0, 1]` are clamped; an empty slice scores 0.
pub fn score_from_states(states: &[f64]) -> u8 {
    if states.is_empty() {
        return 0;
    }
    let total: f64 = states.iter().map(|s| s.clamp(0.0, 1.0)).sum();
    (100.0 * total / states.len() as f64).round().clamp(0.0, 100.0) as u8
}

/// Scores the latest row of an augmented series against an indicator set.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    set: IndicatorSet,
}

impl ScoringEngine {
    pub fn new(set: IndicatorSet) -> Self {
        Self { set }
    }

    pub fn indicator_set(&self) -> &IndicatorSet {
        &self.set
    }

    /// Score the current row.
    pub fn score(
        &self,
        current: &AugmentedBar,
        previous: &AugmentedBar,
        flow: Option<&InstitutionalFlow>,
    ) -> ScoreResult {
        let verdicts: Vec<IndicatorVerdict> = self
            .set
            .descriptors()
            .iter()
            .map(|descriptor| IndicatorVerdict {
                id: descriptor.id,
                name: descriptor.id.name().to_string(),
                verdict: descriptor.verdict(descriptor.id.evaluate(current, previous, flow)),
            })
            .collect();

        let states: Vec<f64> = verdicts.iter().map(IndicatorVerdict::state).collect();
        let score = score_from_states(&states);
        let rating = Rating::from_score(score);

        debug!(
            set = self.set.name(),
            score,
            rating = %rating,
            flow_available = flow.is_some(),
            "scored snapshot"
        );

        ScoreResult {
            score,
            rating,
            comment: rating.comment().to_string(),
            indicator_set: self.set.name().to_string(),
            verdicts,
        }
    }

    /// Score the latest row of a frame.
    pub fn score_frame(
        &self,
        frame: &IndicatorFrame,
        flow: Option<&InstitutionalFlow>,
    ) -> ScoreResult {
        self.score(frame.current(), frame.previous(), flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::IndicatorId;
    use crate::registry::{PresetRegistry, COMPACT, FULL, STANDARD};
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use pulse_core::types::{Bar, BarSeries, IndicatorSnapshot};
    use pulse_indicators::IndicatorEngine;

    fn engine(preset: &str) -> ScoringEngine {
        let set = PresetRegistry::new().get(preset).unwrap().clone();
        ScoringEngine::new(set)
    }

    fn row(close: f64, indicators: IndicatorSnapshot) -> AugmentedBar {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        AugmentedBar {
            bar: Bar::new(date, close, close, close, close, 1_000.0),
            indicators,
        }
    }

    fn rising_frame() -> IndicatorFrame {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..80)
            .map(|i| {
                let close = 100.0 + i as f64;
                Bar::new(start + Duration::days(i), close, close + 1.0, close - 1.0, close, 1_000.0)
            })
            .collect();
        let series = BarSeries::new("UP", bars).unwrap();
        IndicatorEngine::default().compute(&series).unwrap()
    }

    #[test]
    fn test_score_from_states() {
        assert_eq!(score_from_states(&[1.0, 1.0, 1.0]), 100);
        assert_eq!(score_from_states(&[0.0, 0.0]), 0);
        assert_eq!(score_from_states(&[1.0, 0.5, 0.0]), 50);
        assert_eq!(score_from_states(&[1.0, 0.0, 0.0]), 33);
        assert_eq!(score_from_states(&[1.0, 1.0, 0.0]), 67);
        assert_eq!(score_from_states(&[]), 0);
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(Rating::from_score(100), Rating::Strong);
        assert_eq!(Rating::from_score(70), Rating::Strong);
        assert_eq!(Rating::from_score(69), Rating::Stable);
        assert_eq!(Rating::from_score(50), Rating::Stable);
        assert_eq!(Rating::from_score(49), Rating::Weak);
        assert_eq!(Rating::from_score(0), Rating::Weak);
    }

    #[test]
    fn test_uptrend_trend_state() {
        let frame = rising_frame();
        let result = engine(FULL).score_frame(&frame, None);

        let trend = result
            .verdicts
            .iter()
            .find(|v| v.id == IndicatorId::Trend)
            .unwrap();
        assert_eq!(trend.state(), 1.0);
        assert_eq!(result.verdicts.len(), 25);
    }

    #[test]
    fn test_missing_flow_scores_bearish() {
        let frame = rising_frame();
        let engine = engine(FULL);

        let without = engine.score_frame(&frame, None);
        let with_flow = engine.score_frame(&frame, Some(&InstitutionalFlow::new(true, true, true)));

        for verdict in without.verdicts.iter().filter(|v| v.id.uses_flow()) {
            assert_eq!(verdict.state(), 0.0);
        }
        assert!(without.score <= with_flow.score);
        assert_eq!(with_flow.bullish_count(), without.bullish_count() + 3);
    }

    #[test]
    fn test_verdict_order_follows_set() {
        let result = engine(COMPACT).score_frame(&rising_frame(), None);
        let ids: Vec<IndicatorId> = result.verdicts.iter().map(|v| v.id).collect();

        assert_eq!(ids[0], IndicatorId::Trend);
        assert_eq!(ids[6], IndicatorId::InstitutionalConsensus);
        assert_eq!(result.indicator_set, COMPACT);
    }

    #[test]
    fn test_band_neutral_contributes_half() {
        let set = IndicatorSet::from_ids("bands", &[IndicatorId::BandPosition]).unwrap();
        let engine = ScoringEngine::new(set);
        let snapshot = IndicatorSnapshot {
            ma20: 98.0,
            bb_up: 102.0,
            ..IndicatorSnapshot::splat(1.0)
        };
        let current = row(101.0, snapshot);

        let result = engine.score(&current, &current, None);
        assert_eq!(result.score, 50);
        assert_eq!(result.rating, Rating::Stable);
        assert_eq!(result.verdicts[0].verdict.label(), "Between MA20 and upper band");
    }

    #[test]
    fn test_deterministic() {
        let frame = rising_frame();
        let engine = engine(STANDARD);
        let flow = InstitutionalFlow::new(true, false, true);

        assert_eq!(engine.score_frame(&frame, Some(&flow)), engine.score_frame(&frame, Some(&flow)));
    }

    #[test]
    fn test_comment_matches_rating() {
        let result = engine(FULL).score_frame(&rising_frame(), None);
        assert_eq!(result.comment, result.rating.comment());
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded(states in prop::collection::vec(prop::sample::select(vec![0.0, 0.5, 1.0]), 1..40)) {
            let score = score_from_states(&states);
            let all_bullish = score_from_states(&vec![1.0; states.len()]);
            let all_bearish = score_from_states(&vec![0.0; states.len()]);

            prop_assert_eq!(all_bullish, 100);
            prop_assert_eq!(all_bearish, 0);
            prop_assert!(all_bearish <= score && score <= all_bullish);
        }

        #[test]
        fn prop_score_is_monotonic(states in prop::collection::vec(0.0f64..=1.0, 1..40), index in 0usize..40) {
            let mut raised = states.clone();
            let i = index % raised.len();
            raised[i] = 1.0;
            prop_assert!(score_from_states(&raised) >= score_from_states(&states));
        }
    }
}
