//! Promotion impact estimates.
//!
//! Spend has diminishing returns: multiplier = 1 + reach × ln(1 + budget/1000),
//! capped at [`MAX_PROMOTION_MULTIPLIER`].

use crate::EngineError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upper bound on the stream multiplier any campaign can reach.
pub const MAX_PROMOTION_MULTIPLIER: f64 = 3.0;

/// Where the promotion budget is spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionChannel {
    SocialMedia,
    Radio,
    Playlist,
    MusicVideo,
}

impl PromotionChannel {
    /// Reach factor scaling the log-budget term.
    pub fn reach(self) -> f64 {
        match self {
            PromotionChannel::SocialMedia => 0.15,
            PromotionChannel::Radio => 0.25,
            PromotionChannel::Playlist => 0.35,
            PromotionChannel::MusicVideo => 0.30,
        }
    }
}

/// Expected effect of a campaign on a release's streams.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PromotionEstimate {
    pub multiplier: f64,
    pub extra_streams: u64,
}

/// Estimate the stream uplift of spending `budget_usd` on a channel.
///
/// Example:
/// let e = estimate_promotion(10_000, Decimal::ZERO, PromotionChannel::Radio).unwrap();
/// assert_eq!(e.extra_streams, 0);
pub fn estimate_promotion(
    base_streams: u64,
    budget_usd: Decimal,
    channel: PromotionChannel,
) -> Result<PromotionEstimate, EngineError> {
    if budget_usd < Decimal::ZERO {
        return Err(EngineError::InvalidBudget);
    }
    let budget = budget_usd.to_f64().ok_or(EngineError::NonFinite)?;
    let multiplier =
        (1.0 + channel.reach() * (1.0 + budget / 1000.0).ln()).min(MAX_PROMOTION_MULTIPLIER);
    if !multiplier.is_finite() {
        return Err(EngineError::NonFinite);
    }
    let extra = (base_streams as f64 * (multiplier - 1.0)).floor();
    Ok(PromotionEstimate {
        multiplier,
        extra_streams: extra.clamp(0.0, u64::MAX as f64) as u64,
    })
}
