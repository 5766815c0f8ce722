//! Entry, stop-loss and take-profit rules.

use pulse_core::error::PricingError;
use pulse_core::types::AugmentedBar;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::params::PricingParams;

/// Which entry rule applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryBranch {
    /// Close at or below the upper band: midpoint of MA20 and BB_up
    BandMidpoint,
    /// Close above the upper band: discounted close
    Pullback,
}

/// Prices before tick rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawStrategyPrices {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Tick-aligned strategy prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPrices {
    pub entry: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub raw: RawStrategyPrices,
    pub branch: EntryBranch,
}

/// Derives strategy prices from the latest augmented bar.
#[derive(Debug, Clone, Default)]
pub struct PriceRuleEngine {
    params: PricingParams,
}

impl PriceRuleEngine {
    /// Create an engine with validated parameters.
    pub fn new(params: PricingParams) -> Result<Self, PricingError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &PricingParams {
        &self.params
    }

    /// Strategy prices for a bar.
    pub fn compute(&self, row: &AugmentedBar) -> Result<StrategyPrices, PricingError> {
        let indicators = &row.indicators;
        let (raw, branch) =
            self.raw_prices(row.bar.close, indicators.atr, indicators.ma20, indicators.bb_up)?;

        let rule = &self.params.tick_rule;
        let entry = to_decimal("entry", raw.entry)?;
        let prices = StrategyPrices {
            entry: rule.round_anchored(entry, entry),
            stop_loss: rule.round_anchored(to_decimal("stop_loss", raw.stop_loss)?, entry),
            take_profit: rule.round_anchored(to_decimal("take_profit", raw.take_profit)?, entry),
            raw,
            branch,
        };

        debug!(
            entry = %prices.entry,
            stop_loss = %prices.stop_loss,
            take_profit = %prices.take_profit,
            ?branch,
            "computed strategy prices"
        );
        Ok(prices)
    }

    /// Unrounded prices and the entry branch taken.
    ///
    /// An undefined or non-positive ATR counts as zero, which collapses the
    /// stop and target onto the entry.
    pub fn raw_prices(
        &self,
        close: f64,
        atr: f64,
        ma20: f64,
        bb_up: f64,
    ) -> Result<(RawStrategyPrices, EntryBranch), PricingError> {
        ensure_finite("close", close)?;
        ensure_finite("ma20", ma20)?;
        ensure_finite("bb_up", bb_up)?;

        let p = &self.params;
        let mut atr = if atr.is_finite() && atr > 0.0 {
            atr
        } else {
            warn!(atr, close, "ATR unavailable, stop-loss collapses to entry");
            0.0
        };
        if let Some(pct) = p.min_atr_pct {
            atr = atr.max(close.abs() * pct);
        }

        let (entry, branch) = if close <= bb_up {
            ((ma20 + bb_up) / 2.0, EntryBranch::BandMidpoint)
        } else {
            (close * p.pullback_discount, EntryBranch::Pullback)
        };
        let stop_loss = entry - atr * p.risk_multiplier;
        let take_profit = entry + (entry - stop_loss) * p.reward_ratio;

        Ok((
            RawStrategyPrices {
                entry,
                stop_loss,
                take_profit,
            },
            branch,
        ))
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), PricingError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PricingError::NonFinite { field, value })
    }
}

/// Finite values beyond `Decimal`'s range (about 7.9e28) are rejected.
fn to_decimal(field: &'static str, value: f64) -> Result<Decimal, PricingError> {
    Decimal::try_from(value).map_err(|_| PricingError::OutOfRange { field, value })
}
