//! Royalty estimates from a platform distribution.

use chart_core::{PayoutTable, PlatformStreamDistribution};
use rust_decimal::Decimal;
use serde::Serialize;

/// Earnings credited by one platform.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlatformRoyalty {
    pub platform: String,
    pub streams: u64,
    pub usd: Decimal,
}

/// Per-platform and total earnings, rounded to cents.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoyaltyEstimate {
    pub per_platform: Vec<PlatformRoyalty>,
    pub total_usd: Decimal,
}

/// Price a distribution with the payout table.
///
/// Platforms missing from the table are paid at the `Other` rate.
///
/// Example:
/// 1,000 Spotify streams at $0.004 => $4.00
pub fn estimate_royalties(dist: &PlatformStreamDistribution, rates: &PayoutTable) -> RoyaltyEstimate {
    let per_platform: Vec<PlatformRoyalty> = dist
        .iter()
        .map(|p| PlatformRoyalty {
            platform: p.platform.clone(),
            streams: p.streams,
            usd: (Decimal::from(p.streams) * rates.rate_for(&p.platform)).round_dp(2),
        })
        .collect();
    let total_usd = per_platform.iter().map(|p| p.usd).sum();
    RoyaltyEstimate {
        per_platform,
        total_usd,
    }
}
