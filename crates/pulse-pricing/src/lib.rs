//! Strategy price rules.
//!
//! Entry, stop-loss and take-profit prices derived from the latest bar and
//! its indicators, then aligned to the exchange tick-size table.

pub mod engine;
pub mod params;
pub mod tick;

pub use engine::{EntryBranch, PriceRuleEngine, RawStrategyPrices, StrategyPrices};
pub use params::PricingParams;
pub use tick::{TickBand, TickRule, TickTable};
