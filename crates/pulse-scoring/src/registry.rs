//! Built-in indicator-set presets.

use std::collections::HashMap;

use pulse_core::error::ScoringError;
use serde::{Deserialize, Serialize};

use crate::indicator::IndicatorId;
use crate::set::{IndicatorDescriptor, IndicatorSet};

pub const FULL: &str = "full";
pub const STANDARD: &str = "standard";
pub const COMPACT: &str = "compact";

const STANDARD_IDS: [IndicatorId; 12] = [
    IndicatorId::Trend,
    IndicatorId::MaAlignment,
    IndicatorId::BandPosition,
    IndicatorId::KdCross,
    IndicatorId::MacdHistogram,
    IndicatorId::RsiStrength,
    IndicatorId::ObvTrend,
    IndicatorId::VolumeRatio,
    IndicatorId::RocMomentum,
    IndicatorId::RangePosition,
    IndicatorId::TrustBuying,
    IndicatorId::ForeignBuying,
];

const COMPACT_IDS: [IndicatorId; 7] = [
    IndicatorId::Trend,
    IndicatorId::BandPosition,
    IndicatorId::KdCross,
    IndicatorId::MacdHistogram,
    IndicatorId::RsiStrength,
    IndicatorId::VolumeRatio,
    IndicatorId::InstitutionalConsensus,
];

/// Information about a registered preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: String,
    pub description: String,
    pub version: u32,
    pub indicators: Vec<IndicatorId>,
}

struct Preset {
    description: String,
    set: IndicatorSet,
}

/// Registry of named indicator sets.
pub struct PresetRegistry {
    presets: HashMap<String, Preset>,
}

impl PresetRegistry {
    /// Create a registry holding the built-in presets.
    pub fn new() -> Self {
        let mut registry = Self {
            presets: HashMap::new(),
        };

        registry.insert_builtin(
            FULL,
            "Every trend, momentum, volume, position and flow check",
            &IndicatorId::ALL,
        );
        registry.insert_builtin(
            STANDARD,
            "Core trend and momentum checks with trust and foreign flow",
            &STANDARD_IDS,
        );
        registry.insert_builtin(
            COMPACT,
            "Quick read: trend, bands, KD, MACD, RSI, volume and consensus",
            &COMPACT_IDS,
        );

        registry
    }

    /// The built-in set holding every indicator.
    pub fn full() -> IndicatorSet {
        built_in(FULL, &IndicatorId::ALL)
    }

    fn insert_builtin(&mut self, name: &str, description: &str, ids: &[IndicatorId]) {
        let set = built_in(name, ids);
        self.presets.insert(
            name.to_string(),
            Preset {
                description: description.to_string(),
                set,
            },
        );
    }

    /// Add or replace a named set.
    pub fn register(&mut self, set: IndicatorSet, description: impl Into<String>) {
        self.presets.insert(
            set.name().to_string(),
            Preset {
                description: description.into(),
                set,
            },
        );
    }

    /// List all presets, sorted by name.
    pub fn list(&self) -> Vec<PresetInfo> {
        let mut infos: Vec<PresetInfo> = self
            .presets
            .iter()
            .map(|(name, preset)| PresetInfo {
                name: name.clone(),
                description: preset.description.clone(),
                version: preset.set.version(),
                indicators: preset.set.ids().collect(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Get a preset by name.
    pub fn get(&self, name: &str) -> Option<&IndicatorSet> {
        self.presets.get(name).map(|p| &p.set)
    }

    /// Check if a preset exists.
    pub fn exists(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// All preset names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve the set to score with.
    ///
    /// A custom id list takes precedence over the preset name.
    pub fn resolve<S: AsRef<str>>(
        &self,
        preset: &str,
        custom: Option<&[S]>,
    ) -> Result<IndicatorSet, ScoringError> {
        match custom {
            Some(ids) => IndicatorSet::from_names("custom", ids),
            None => self
                .get(preset)
                .cloned()
                .ok_or_else(|| ScoringError::UnknownPreset(preset.to_string())),
        }
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in sets use default labels, which always satisfy validation.
fn built_in(name: &str, ids: &[IndicatorId]) -> IndicatorSet {
    IndicatorSet::new_unchecked(
        name.to_string(),
        1,
        ids.iter().copied().map(IndicatorDescriptor::new).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_list() {
        let registry = PresetRegistry::new();
        let presets = registry.list();

        assert_eq!(presets.len(), 3);
        assert_eq!(registry.names(), vec![COMPACT, FULL, STANDARD]);
    }

    #[test]
    fn test_preset_sizes() {
        let registry = PresetRegistry::new();

        assert_eq!(registry.get(FULL).unwrap().len(), 25);
        assert_eq!(registry.get(STANDARD).unwrap().len(), 12);
        assert_eq!(registry.get(COMPACT).unwrap().len(), 7);
        assert!(registry.get("unknown").is_none());
        assert_eq!(&PresetRegistry::full(), registry.get(FULL).unwrap());
    }

    #[test]
    fn test_presets_are_valid_sets() {
        let registry = PresetRegistry::new();

        for name in registry.names() {
            let set = registry.get(name).unwrap();
            let rebuilt = IndicatorSet::new(set.name(), set.version(), set.descriptors().to_vec());
            assert!(rebuilt.is_ok(), "preset {} failed validation", name);
        }
    }

    #[test]
    fn test_resolve() {
        let registry = PresetRegistry::new();

        let set = registry.resolve::<String>(STANDARD, None).unwrap();
        assert_eq!(set.name(), STANDARD);

        let custom = vec!["trend".to_string(), "kd_cross".to_string()];
        let set = registry.resolve(STANDARD, Some(custom.as_slice())).unwrap();
        assert_eq!(set.name(), "custom");
        assert_eq!(set.len(), 2);

        let ids = ["trend", "rsi_strength", "macd_histogram"];
        let set = registry.resolve(FULL, Some(ids.as_slice())).unwrap();
        assert_eq!(set.ids().nth(2), Some(IndicatorId::MacdHistogram));

        let err = registry.resolve::<String>("nope", None).unwrap_err();
        assert!(matches!(err, ScoringError::UnknownPreset(_)));
    }

    #[test]
    fn test_register() {
        let mut registry = PresetRegistry::new();
        let set = IndicatorSet::from_ids("trend_only", &[IndicatorId::Trend]).unwrap();
        registry.register(set, "Single trend check");

        assert!(registry.exists("trend_only"));
        assert_eq!(registry.list().len(), 4);
    }
}
