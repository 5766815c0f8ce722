//! Indicator outcomes.

use serde::{Deserialize, Serialize};

use crate::indicator::IndicatorId;

/// Raw outcome of an indicator predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Bullish,
    Neutral,
    Bearish,
}

impl Signal {
    /// Two-way outcome of a comparison.
    pub fn from_condition(condition: bool) -> Self {
        if condition {
            Self::Bullish
        } else {
            Self::Bearish
        }
    }

    /// Score contribution: 1.0, 0.5 or 0.0.
    pub fn state(&self) -> f64 {
        match self {
            Self::Bullish => 1.0,
            Self::Neutral => 0.5,
            Self::Bearish => 0.0,
        }
    }
}

/// An outcome with its display label attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "label", rename_all = "snake_case")]
pub enum Verdict {
    Bullish(String),
    Neutral(String),
    Bearish(String),
}

impl Verdict {
    pub fn signal(&self) -> Signal {
        match self {
            Self::Bullish(_) => Signal::Bullish,
            Self::Neutral(_) => Signal::Neutral,
            Self::Bearish(_) => Signal::Bearish,
        }
    }

    pub fn state(&self) -> f64 {
        self.signal().state()
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Bullish(label) | Self::Neutral(label) | Self::Bearish(label) => label,
        }
    }
}

/// One indicator's verdict inside a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorVerdict {
    pub id: IndicatorId,
    /// Display name
    pub name: String,
    pub verdict: Verdict,
}

impl IndicatorVerdict {
    pub fn state(&self) -> f64 {
        self.verdict.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_states() {
        assert_eq!(Signal::Bullish.state(), 1.0);
        assert_eq!(Signal::Neutral.state(), 0.5);
        assert_eq!(Signal::Bearish.state(), 0.0);
        assert_eq!(Signal::from_condition(f64::NAN > 0.0), Signal::Bearish);
    }

    #[test]
    fn test_verdict_serializes_tagged() {
        let verdict = Verdict::Neutral("Between MA20 and upper band".to_string());
        let json = serde_json::to_value(&verdict).unwrap();

        assert_eq!(json["signal"], "neutral");
        assert_eq!(json["label"], "Between MA20 and upper band");
        assert_eq!(verdict.state(), 0.5);
    }
}
