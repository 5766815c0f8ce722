//! Strategy price constants.

use pulse_core::error::PricingError;
use serde::{Deserialize, Serialize};

use crate::tick::TickRule;

/// Constants for the price rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingParams {
    /// ATR multiple between entry and stop-loss
    pub risk_multiplier: f64,
    /// Reward per unit of risk
    pub reward_ratio: f64,
    /// Entry as a fraction of close when the close is above the upper band
    pub pullback_discount: f64,
    /// Lower bound on ATR as a fraction of close
    pub min_atr_pct: Option<f64>,
    pub tick_rule: TickRule,
}

impl Default for PricingParams {
    fn default() -> Self {
        Self {
            risk_multiplier: 2.2,
            reward_ratio: 2.0,
            pullback_discount: 0.98,
            min_atr_pct: None,
            tick_rule: TickRule::default(),
        }
    }
}

impl PricingParams {
    pub fn validate(&self) -> Result<(), PricingError> {
        if !(self.risk_multiplier > 0.0) || !self.risk_multiplier.is_finite() {
            return Err(PricingError::InvalidParameter(
                "risk_multiplier must be positive".into(),
            ));
        }
        if !(self.reward_ratio > 0.0) || !self.reward_ratio.is_finite() {
            return Err(PricingError::InvalidParameter(
                "reward_ratio must be positive".into(),
            ));
        }
        if !(self.pullback_discount > 0.0 && self.pullback_discount <= 1.0) {
            return Err(PricingError::InvalidParameter(
                "pullback_discount must be in (0, 1]".into(),
            ));
        }
        if let Some(pct) = self.min_atr_pct {
            if !(pct >= 0.0 && pct < 1.0) {
                return Err(PricingError::InvalidParameter(
                    "min_atr_pct must be in [0, 1)".into(),
                ));
            }
        }
        self.tick_rule.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PricingParams::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_params() {
        let params = PricingParams {
            reward_ratio: 0.0,
            ..PricingParams::default()
        };
        assert!(params.validate().is_err());

        let params = PricingParams {
            pullback_discount: 1.2,
            ..PricingParams::default()
        };
        assert!(params.validate().is_err());

        let params = PricingParams {
            min_atr_pct: Some(-0.1),
            ..PricingParams::default()
        };
        assert!(params.validate().is_err());
    }
}
