//! Institutional trade-flow types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of large market participant reported by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FlowCategory {
    InvestmentTrust,
    ForeignInstitutional,
    Dealer,
    DealerHedging,
    ForeignDealer,
    Other(String),
}

impl FlowCategory {
    /// Parse a provider label. Matching ignores case, underscores and dashes.
    pub fn parse(label: &str) -> Self {
        let normalized = label.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "investment trust" | "trust" | "投信" => Self::InvestmentTrust,
            "foreign institutional" | "foreign investor" | "foreign" | "外資" | "外資及陸資" => {
                Self::ForeignInstitutional
            }
            "dealer" | "dealer self" | "自營商" => Self::Dealer,
            "dealer hedging" | "自營商避險" => Self::DealerHedging,
            "foreign dealer self" | "foreign dealer" => Self::ForeignDealer,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    /// Canonical label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::InvestmentTrust => "investment trust",
            Self::ForeignInstitutional => "foreign institutional",
            Self::Dealer => "dealer",
            Self::DealerHedging => "dealer hedging",
            Self::ForeignDealer => "foreign dealer",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for FlowCategory {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<FlowCategory> for String {
    fn from(category: FlowCategory) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for FlowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day's net buy amount for one participant category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub date: NaiveDate,
    pub category: FlowCategory,
    /// Buy value minus sell value
    pub net_buy_amount: f64,
}

impl FlowRecord {
    pub fn new(date: NaiveDate, category: FlowCategory, net_buy_amount: f64) -> Self {
        Self {
            date,
            category,
            net_buy_amount,
        }
    }
}

/// Institutional buying flags derived from recent flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstitutionalFlow {
    /// Investment trusts were net buyers over the short window
    pub trust_buying: bool,
    /// Foreign institutions were net buyers over the long window
    pub foreign_buying: bool,
    /// All categories combined were net buyers over the short window
    pub institutional_consensus: bool,
}

impl InstitutionalFlow {
    pub fn new(trust_buying: bool, foreign_buying: bool, institutional_consensus: bool) -> Self {
        Self {
            trust_buying,
            foreign_buying,
            institutional_consensus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(FlowCategory::parse("Investment_Trust"), FlowCategory::InvestmentTrust);
        assert_eq!(FlowCategory::parse("Foreign_Investor"), FlowCategory::ForeignInstitutional);
        assert_eq!(FlowCategory::parse("外資"), FlowCategory::ForeignInstitutional);
        assert_eq!(FlowCategory::parse("Dealer_Hedging"), FlowCategory::DealerHedging);
        assert_eq!(
            FlowCategory::parse("Mystery Fund"),
            FlowCategory::Other("Mystery Fund".to_string())
        );
    }

    #[test]
    fn test_category_serde_uses_labels() {
        let json = serde_json::to_string(&FlowCategory::InvestmentTrust).unwrap();
        assert_eq!(json, "\"investment trust\"");

        let parsed: FlowCategory = serde_json::from_str("\"Foreign_Investor\"").unwrap();
        assert_eq!(parsed, FlowCategory::ForeignInstitutional);
    }
}
