//! Exchange tick-size rounding.

use pulse_core::error::PricingError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Rounding unit for prices below `below`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickBand {
    /// Exclusive upper bound; `None` for the last band
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<Decimal>,
    pub unit: Decimal,
}

impl TickBand {
    pub fn new(below: Option<Decimal>, unit: Decimal) -> Self {
        Self { below, unit }
    }
}

/// Ordered price bands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickTable {
    bands: Vec<TickBand>,
}

impl TickTable {
    /// Build a table, checking that bounds ascend and end unbounded.
    pub fn new(bands: Vec<TickBand>) -> Result<Self, PricingError> {
        let table = Self { bands };
        table.validate()?;
        Ok(table)
    }

    /// Taiwan Stock Exchange equity table.
    pub fn taiwan() -> Self {
        Self {
            bands: vec![
                TickBand::new(Some(dec!(10)), dec!(0.01)),
                TickBand::new(Some(dec!(50)), dec!(0.05)),
                TickBand::new(Some(dec!(100)), dec!(0.1)),
                TickBand::new(Some(dec!(500)), dec!(0.5)),
                TickBand::new(Some(dec!(1000)), dec!(1)),
                TickBand::new(None, dec!(5)),
            ],
        }
    }

    pub fn bands(&self) -> &[TickBand] {
        &self.bands
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        let Some((last, rest)) = self.bands.split_last() else {
            return Err(PricingError::InvalidParameter("tick table has no bands".into()));
        };
        if last.below.is_some() {
            return Err(PricingError::InvalidParameter(
                "last tick band must be unbounded".into(),
            ));
        }
        if self.bands.iter().any(|b| b.unit <= Decimal::ZERO) {
            return Err(PricingError::InvalidParameter(
                "tick units must be positive".into(),
            ));
        }

        let mut previous: Option<Decimal> = None;
        for band in rest {
            let Some(bound) = band.below else {
                return Err(PricingError::InvalidParameter(
                    "only the last tick band may be unbounded".into(),
                ));
            };
            if previous.is_some_and(|p| bound <= p) {
                return Err(PricingError::InvalidParameter(
                    "tick band bounds must ascend".into(),
                ));
            }
            previous = Some(bound);
        }
        Ok(())
    }

    /// Unit for the band containing `price`.
    pub fn unit_for(&self, price: Decimal) -> Decimal {
        self.bands
            .iter()
            .find(|band| band.below.map_or(true, |bound| price < bound))
            .map(|band| band.unit)
            .unwrap_or(Decimal::ONE)
    }
}

impl Default for TickTable {
    fn default() -> Self {
        Self::taiwan()
    }
}

/// How prices are aligned to ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickRule {
    /// One unit for a whole price set, taken from the band of its entry
    EntryBanded {
        #[serde(default)]
        table: TickTable,
    },
    /// Unit chosen per price from a banded table
    Banded {
        #[serde(default)]
        table: TickTable,
    },
    /// One unit for every price
    Flat { unit: Decimal },
}

impl Default for TickRule {
    fn default() -> Self {
        TickRule::EntryBanded {
            table: TickTable::taiwan(),
        }
    }
}

impl TickRule {
    /// Unit for `price` when it is the anchor of its own set.
    pub fn unit_for(&self, price: Decimal) -> Decimal {
        self.unit_anchored(price, price)
    }

    /// Unit for `price` within a set anchored at `entry`.
    pub fn unit_anchored(&self, price: Decimal, entry: Decimal) -> Decimal {
        match self {
            TickRule::EntryBanded { table } => table.unit_for(entry),
            TickRule::Banded { table } => table.unit_for(price),
            TickRule::Flat { unit } => *unit,
        }
    }

    /// Round to the nearest unit, halves away from zero.
    pub fn round(&self, price: Decimal) -> Decimal {
        round_to_unit(price, self.unit_for(price))
    }

    /// Round a price belonging to the set whose entry is `entry`.
    pub fn round_anchored(&self, price: Decimal, entry: Decimal) -> Decimal {
        round_to_unit(price, self.unit_anchored(price, entry))
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        match self {
            TickRule::EntryBanded { table } | TickRule::Banded { table } => table.validate(),
            TickRule::Flat { unit } if *unit <= Decimal::ZERO => Err(
                PricingError::InvalidParameter("flat tick unit must be positive".into()),
            ),
            TickRule::Flat { .. } => Ok(()),
        }
    }
}

fn round_to_unit(price: Decimal, unit: Decimal) -> Decimal {
    if unit <= Decimal::ZERO {
        return price;
    }
    (price / unit).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * unit
}
