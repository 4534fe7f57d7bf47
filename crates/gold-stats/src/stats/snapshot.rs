//! Public stats response and how it is composed

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chain::constants::GOLD_MINT;
use crate::fees::FeeSnapshot;
use crate::history::WindowTotals;
use crate::store::{DistributionRecord, DistributionStatus, ProtocolSettings};

/// Percentages published when nothing is stored
pub mod defaults {
    pub const MINIMUM_HOLDER_PERCENTAGE: &str = "0.5";
    pub const MEDIUM_HOLDER_MIN_PERCENTAGE: &str = "0.1";
    pub const MAJOR_HOLDERS_PERCENTAGE: &str = "70";
    pub const MEDIUM_HOLDERS_PERCENTAGE: &str = "20";
    pub const BUYBACK_PERCENTAGE: &str = "20";
    pub const GOLD_DISTRIBUTION_PERCENTAGE: &str = "70";
    pub const BURN_PERCENTAGE: &str = "30";
}

/// Response of `/api/public/stats`
///
/// Field names and presence are stable. Every number is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_distributions: u64,
    pub total_gold_distributed: f64,
    pub total_gold_major_holders: f64,
    pub total_gold_medium_holders: f64,
    pub total_token_buyback: f64,
    pub total_fees_claimed: f64,
    pub total_protocol_fees: f64,
    pub fees_converted_to_gold: f64,
    pub fees_collected_on_chain: f64,
    pub total_burned: f64,
    pub gold_mint: String,
    pub token_mint: Option<String>,
    pub last_distribution: Option<DateTime<Utc>>,
    pub minimum_holder_percentage: String,
    pub medium_holder_min_percentage: String,
    pub major_holders_percentage: String,
    pub medium_holders_percentage: String,
    pub buyback_percentage: String,
    pub gold_distribution_percentage: String,
    pub burn_percentage: String,
}

/// Sums over stored distribution records
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistributionTotals {
    pub completed: u64,
    pub gold_major_holders: Decimal,
    pub gold_medium_holders: Decimal,
    pub token_buyback: Decimal,
    pub fees_claimed: Decimal,
    pub burned: Decimal,
    pub last_distribution: Option<DateTime<Utc>>,
}

impl DistributionTotals {
    /// Reduce records given newest first
    pub fn from_records(records: &[DistributionRecord]) -> Self {
        let mut totals = Self {
            last_distribution: records.first().map(|r| r.timestamp),
            ..Default::default()
        };
        for record in records {
            if record.status == DistributionStatus::Completed {
                totals.completed += 1;
            }
            totals.gold_major_holders += record.gold_purchased;
            totals.gold_medium_holders += record.gold_for_medium_holders.unwrap_or_default();
            totals.token_buyback += record.token_buyback.unwrap_or_default();
            totals.fees_claimed += record.total_fees_collected;
            totals.burned += record.fees_for_burn;
        }
        totals
    }
}

/// Persisted side of the stats; absent when no store is configured
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoredFigures {
    pub totals: DistributionTotals,
    pub settings: Option<ProtocolSettings>,
}

/// On-chain side of the stats
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChainFigures {
    pub fees: FeeSnapshot,
    pub window: WindowTotals,
}

impl StatsSnapshot {
    pub fn compose(
        stored: Option<&StoredFigures>,
        chain: &ChainFigures,
        token_mint: Option<String>,
    ) -> Self {
        let fees_converted_to_gold = finite_or_zero(chain.window.inbound.ui_amount());
        let settings = stored.and_then(|s| s.settings.as_ref());
        let percentage = |value: Option<Decimal>, default: &str| {
            value.map(|v| v.normalize().to_string()).unwrap_or_else(|| default.to_string())
        };

        let (totals, total_gold_distributed) = match stored {
            Some(stored) => {
                let totals = &stored.totals;
                let gold = totals.gold_major_holders + totals.gold_medium_holders;
                (totals.clone(), to_finite(gold))
            }
            None => (DistributionTotals::default(), fees_converted_to_gold),
        };

        Self {
            total_distributions: totals.completed,
            total_gold_distributed,
            total_gold_major_holders: to_finite(totals.gold_major_holders),
            total_gold_medium_holders: to_finite(totals.gold_medium_holders),
            total_token_buyback: to_finite(totals.token_buyback),
            total_fees_claimed: to_finite(totals.fees_claimed),
            total_protocol_fees: finite_or_zero(chain.fees.sol),
            fees_converted_to_gold,
            fees_collected_on_chain: finite_or_zero(chain.window.fee_claims_sol()),
            total_burned: to_finite(totals.burned),
            gold_mint: settings
                .and_then(|s| s.gold_mint.clone())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GOLD_MINT.to_string()),
            token_mint,
            last_distribution: totals.last_distribution,
            minimum_holder_percentage: percentage(
                settings.and_then(|s| s.minimum_holder_percentage),
                defaults::MINIMUM_HOLDER_PERCENTAGE,
            ),
            medium_holder_min_percentage: percentage(
                settings.and_then(|s| s.medium_holder_min_percentage),
                defaults::MEDIUM_HOLDER_MIN_PERCENTAGE,
            ),
            major_holders_percentage: percentage(
                settings.and_then(|s| s.major_holders_percentage),
                defaults::MAJOR_HOLDERS_PERCENTAGE,
            ),
            medium_holders_percentage: percentage(
                settings.and_then(|s| s.medium_holders_percentage),
                defaults::MEDIUM_HOLDERS_PERCENTAGE,
            ),
            buyback_percentage: percentage(
                settings.and_then(|s| s.buyback_percentage),
                defaults::BUYBACK_PERCENTAGE,
            ),
            gold_distribution_percentage: percentage(
                settings.and_then(|s| s.gold_distribution_percentage),
                defaults::GOLD_DISTRIBUTION_PERCENTAGE,
            ),
            burn_percentage: percentage(
                settings.and_then(|s| s.burn_percentage),
                defaults::BURN_PERCENTAGE,
            ),
        }
    }
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn to_finite(value: Decimal) -> f64 {
    finite_or_zero(value.to_f64().unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::AggregateTotal;
    use uuid::Uuid;

    fn record(gold: &str, status: DistributionStatus, day: u32) -> DistributionRecord {
        DistributionRecord {
            id: Uuid::new_v4(),
            timestamp: format!("2025-01-{:02}T00:00:00Z", day).parse().unwrap(),
            total_fees_collected: "1".parse().unwrap(),
            fees_for_gold: "0.7".parse().unwrap(),
            fees_for_medium_holders: None,
            fees_for_buyback: None,
            fees_for_burn: "0.3".parse().unwrap(),
            gold_purchased: gold.parse().unwrap(),
            gold_for_medium_holders: Some("0.5".parse().unwrap()),
            token_buyback: None,
            gold_price_at_purchase: None,
            holders_count: 3,
            medium_holders_count: None,
            status,
            tx_signature: None,
        }
    }

    fn chain_with_gold(base_units: u128) -> ChainFigures {
        ChainFigures {
            fees: FeeSnapshot::from_lamports(1_500_000_000),
            window: WindowTotals {
                inbound: AggregateTotal {
                    base_units,
                    decimals: Some(6),
                },
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_without_store_uses_defaults() {
        let snapshot = StatsSnapshot::compose(None, &chain_with_gold(2_500_000), Some("Mint".into()));

        assert_eq!(snapshot.total_distributions, 0);
        assert_eq!(snapshot.total_protocol_fees, 1.5);
        assert_eq!(snapshot.fees_converted_to_gold, 2.5);
        assert_eq!(snapshot.total_gold_distributed, 2.5);
        assert_eq!(snapshot.total_burned, 0.0);
        assert_eq!(snapshot.token_mint.as_deref(), Some("Mint"));
        assert_eq!(snapshot.gold_mint, GOLD_MINT.to_string());
        assert_eq!(snapshot.last_distribution, None);
        assert_eq!(snapshot.buyback_percentage, "20");
        assert_eq!(snapshot.minimum_holder_percentage, "0.5");
    }

    #[test]
    fn test_with_store_reduces_records() {
        let records = vec![
            record("2", DistributionStatus::Pending, 3),
            record("1.25", DistributionStatus::Completed, 2),
            record("0.75", DistributionStatus::Completed, 1),
        ];
        let stored = StoredFigures {
            totals: DistributionTotals::from_records(&records),
            settings: Some(ProtocolSettings {
                buyback_percentage: Some("10".parse().unwrap()),
                ..Default::default()
            }),
        };
        let snapshot = StatsSnapshot::compose(Some(&stored), &chain_with_gold(1_000_000), None);

        assert_eq!(snapshot.total_distributions, 2);
        assert_eq!(snapshot.total_gold_major_holders, 4.0);
        assert_eq!(snapshot.total_gold_medium_holders, 1.5);
        assert_eq!(snapshot.total_gold_distributed, 5.5);
        assert_eq!(snapshot.fees_converted_to_gold, 1.0);
        assert_eq!(snapshot.total_fees_claimed, 3.0);
        assert_eq!(snapshot.last_distribution, Some(records[0].timestamp));
        assert_eq!(snapshot.buyback_percentage, "10");
        assert_eq!(snapshot.burn_percentage, "30");
    }

    #[test]
    fn test_serialized_field_names() {
        let snapshot = StatsSnapshot::compose(None, &ChainFigures::default(), None);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["totalProtocolFees"], 0.0);
        assert_eq!(json["feesConvertedToGold"], 0.0);
        assert!(json["tokenMint"].is_null());
        assert!(json["lastDistribution"].is_null());
        assert_eq!(json["goldDistributionPercentage"], "70");
    }

    #[test]
    fn test_non_finite_collapses_to_zero() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(1.25), 1.25);
    }
}
