#![deny(warnings)]

//! Chart models: scoring, ranking and stream-distribution helpers.
//!
//! This crate provides the pure computations behind the in-game charts:
//! - Score blending of base metrics with performance bonuses and seeded jitter
//! - Stable ranking into positioned charts, diffed against last week's snapshot
//! - Artist trend derivation
//! - Splitting a song's streams across platforms
//! - Royalty and promotion-impact estimates

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub mod distribution;
pub mod promotion;
pub mod ranking;
pub mod royalties;
pub mod scoring;
pub mod trend;

pub use distribution::{distribute_song, distribute_streams};
pub use promotion::{estimate_promotion, PromotionChannel, PromotionEstimate};
pub use ranking::{album_chart, artist_rankings, rank_artists, rank_chart, song_chart};
pub use royalties::{estimate_royalties, RoyaltyEstimate};
pub use scoring::{ScoredArtist, ScoredCandidate};
pub use trend::{roll_trend, trend_between};

/// Errors produced by the estimate helpers. Ranking and distribution never fail.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// Budgets must be non-negative.
    #[error("invalid promotion budget")]
    InvalidBudget,
    /// Numeric conversion to floating point failed.
    #[error("non-finite numeric conversion")]
    NonFinite,
}

/// Deterministic RNG used for every chart roll.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
