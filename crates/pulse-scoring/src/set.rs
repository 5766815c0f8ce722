//! Versioned indicator-set configuration.

use pulse_core::error::ScoringError;
use serde::{Deserialize, Serialize};

use crate::indicator::IndicatorId;
use crate::verdict::{Signal, Verdict};

/// Display labels for each outcome of an indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorLabels {
    pub bullish: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral: Option<String>,
    pub bearish: String,
}

impl IndicatorLabels {
    pub fn two_way(bullish: impl Into<String>, bearish: impl Into<String>) -> Self {
        Self {
            bullish: bullish.into(),
            neutral: None,
            bearish: bearish.into(),
        }
    }

    pub fn three_way(
        bullish: impl Into<String>,
        neutral: impl Into<String>,
        bearish: impl Into<String>,
    ) -> Self {
        Self {
            bullish: bullish.into(),
            neutral: Some(neutral.into()),
            bearish: bearish.into(),
        }
    }
}

/// One entry of an indicator set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorDescriptor {
    pub id: IndicatorId,
    pub labels: IndicatorLabels,
}

impl IndicatorDescriptor {
    /// Descriptor with the built-in labels.
    pub fn new(id: IndicatorId) -> Self {
        Self {
            id,
            labels: id.default_labels(),
        }
    }

    pub fn with_labels(id: IndicatorId, labels: IndicatorLabels) -> Self {
        Self { id, labels }
    }

    /// Attach the matching label to an outcome.
    pub fn verdict(&self, signal: Signal) -> Verdict {
        match signal {
            Signal::Bullish => Verdict::Bullish(self.labels.bullish.clone()),
            Signal::Neutral => {
                Verdict::Neutral(self.labels.neutral.clone().unwrap_or_default())
            }
            Signal::Bearish => Verdict::Bearish(self.labels.bearish.clone()),
        }
    }
}

#[derive(Deserialize)]
struct IndicatorSetDef {
    name: String,
    #[serde(default = "default_version")]
    version: u32,
    descriptors: Vec<IndicatorDescriptor>,
}

fn default_version() -> u32 {
    1
}

/// An ordered, named and versioned list of indicators.
///
/// Never empty, and every three-way indicator carries a neutral label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndicatorSetDef")]
pub struct IndicatorSet {
    name: String,
    version: u32,
    descriptors: Vec<IndicatorDescriptor>,
}

impl IndicatorSet {
    /// Create a validated set.
    pub fn new(
        name: impl Into<String>,
        version: u32,
        descriptors: Vec<IndicatorDescriptor>,
    ) -> Result<Self, ScoringError> {
        let name = name.into();
        if descriptors.is_empty() {
            return Err(ScoringError::EmptyIndicatorSet(name));
        }
        if let Some(missing) = descriptors
            .iter()
            .find(|d| d.id.is_three_way() && d.labels.neutral.is_none())
        {
            return Err(ScoringError::MissingNeutralLabel(missing.id.to_string()));
        }

        Ok(Self {
            name,
            version,
            descriptors,
        })
    }

    pub(crate) fn new_unchecked(
        name: String,
        version: u32,
        descriptors: Vec<IndicatorDescriptor>,
    ) -> Self {
        Self {
            name,
            version,
            descriptors,
        }
    }

    /// Set of indicators with their built-in labels.
    pub fn from_ids(name: impl Into<String>, ids: &[IndicatorId]) -> Result<Self, ScoringError> {
        Self::new(name, 1, ids.iter().copied().map(IndicatorDescriptor::new).collect())
    }

    /// Set parsed from configured identifier strings.
    pub fn from_names<S: AsRef<str>>(
        name: impl Into<String>,
        ids: &[S],
    ) -> Result<Self, ScoringError> {
        let ids = ids
            .iter()
            .map(|id| id.as_ref().parse())
            .collect::<Result<Vec<IndicatorId>, _>>()?;
        Self::from_ids(name, &ids)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn descriptors(&self) -> &[IndicatorDescriptor] {
        &self.descriptors
    }

    pub fn ids(&self) -> impl Iterator<Item = IndicatorId> + '_ {
        self.descriptors.iter().map(|d| d.id)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl TryFrom<IndicatorSetDef> for IndicatorSet {
    type Error = ScoringError;

    fn try_from(def: IndicatorSetDef) -> Result<Self, Self::Error> {
        Self::new(def.name, def.version, def.descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_rejected() {
        let err = IndicatorSet::from_ids("empty", &[]).unwrap_err();
        assert!(matches!(err, ScoringError::EmptyIndicatorSet(name) if name == "empty"));
    }

    #[test]
    fn test_three_way_needs_neutral_label() {
        let descriptor = IndicatorDescriptor::with_labels(
            IndicatorId::BandPosition,
            IndicatorLabels::two_way("up", "down"),
        );

        let err = IndicatorSet::new("custom", 1, vec![descriptor]).unwrap_err();
        assert!(matches!(err, ScoringError::MissingNeutralLabel(_)));
    }

    #[test]
    fn test_from_names_keeps_order() {
        let set = IndicatorSet::from_names("custom", &["rsi_strength", "trend"]).unwrap();

        assert_eq!(set.ids().collect::<Vec<_>>(), vec![IndicatorId::RsiStrength, IndicatorId::Trend]);
        assert_eq!(set.version(), 1);
        assert!(IndicatorSet::from_names("custom", &["nope"]).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"name": "bad", "descriptors": []}"#;
        assert!(serde_json::from_str::<IndicatorSet>(json).is_err());

        let json = r#"{
            "name": "mine",
            "version": 3,
            "descriptors": [
                {"id": "trend", "labels": {"bullish": "Up", "bearish": "Down"}}
            ]
        }"#;
        let set: IndicatorSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.version(), 3);
        assert_eq!(set.descriptors()[0].verdict(Signal::Bullish), Verdict::Bullish("Up".into()));
    }
}
