#![deny(warnings)]

//! Core domain models and invariants for the rap career charts.
//!
//! This crate defines serializable types shared by the chart engine and the
//! weekly runtime, along with validation helpers guarding basic invariants.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Platforms carried by the default market-share table, in display order.
pub const CANONICAL_PLATFORMS: [&str; 8] = [
    "Spotify",
    "YouTube Music",
    "iTunes",
    "SoundCloud",
    "Amazon Music",
    "Deezer",
    "Tidal",
    "Other",
];

/// Name of the catch-all platform used when a platform has no table entry.
pub const OTHER_PLATFORM: &str = "Other";

/// How a release or artist is performing this cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceType {
    /// Breakout hit.
    Viral,
    /// Returning after a slump.
    Comeback,
    /// Underperforming release.
    Flop,
    /// Nothing notable.
    #[default]
    Normal,
}

impl PerformanceType {
    /// Multiplicative score bonus applied when ranking.
    pub fn bonus(self) -> f64 {
        match self {
            PerformanceType::Viral => 3.0,
            PerformanceType::Comeback => 1.5,
            PerformanceType::Flop => 0.5,
            PerformanceType::Normal => 1.0,
        }
    }
}

/// A single released track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    /// Display name of the performing artist.
    pub artist: String,
    /// Total streams across all platforms.
    pub streams: u64,
    /// Popularity ratio in [0,1].
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub performance: PerformanceType,
    /// Whether the player released it.
    #[serde(default)]
    pub is_player: bool,
}

/// A released album; charted on its total streams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub streams: u64,
    #[serde(default)]
    pub track_count: u16,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub performance: PerformanceType,
    #[serde(default)]
    pub is_player: bool,
}

/// An artist competing on the listener rankings, AI-controlled or the player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub monthly_listeners: u64,
    /// Popularity ratio in [0,1]; drives the trend roll for unranked artists.
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub performance: PerformanceType,
    #[serde(default)]
    pub is_player: bool,
}

/// Everything that can chart in a given week.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub songs: Vec<Song>,
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub artists: Vec<Artist>,
}

/// Direction an artist is moving on the rankings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Same,
}

/// Position change of a chart entry relative to last week.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Movement {
    /// Not on last week's chart.
    New,
    Up(u32),
    Down(u32),
    Same,
}

impl Movement {
    /// Compare a current position against an optional previous one.
    pub fn between(previous: Option<u32>, current: u32) -> Self {
        match previous {
            None => Movement::New,
            Some(p) if p > current => Movement::Up(p - current),
            Some(p) if p < current => Movement::Down(current - p),
            Some(_) => Movement::Same,
        }
    }
}

/// A positioned song or album chart row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// 1-based rank after sorting on `score`.
    pub position: u32,
    pub previous_position: Option<u32>,
    /// Best position ever reached, this week included.
    pub peak_position: u32,
    pub weeks_on_chart: u32,
    pub is_player: bool,
    /// Ranking key; not shown to the player.
    pub score: f64,
}

impl ChartEntry {
    pub fn movement(&self) -> Movement {
        Movement::between(self.previous_position, self.position)
    }
}

/// A positioned artist on the monthly-listener rankings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtistRank {
    pub id: String,
    pub name: String,
    /// Monthly listeners after scoring.
    pub score: f64,
    pub trend: Trend,
    pub rank: u32,
    pub previous_rank: Option<u32>,
    pub is_player: bool,
}

/// Streams credited to one platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStreams {
    pub platform: String,
    pub streams: u64,
}

/// Per-platform breakdown of a song's total streams.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStreamDistribution {
    pub platforms: Vec<PlatformStreams>,
}

impl PlatformStreamDistribution {
    /// Sum of all platform counts.
    pub fn total(&self) -> u64 {
        self.platforms.iter().map(|p| p.streams).sum()
    }

    /// Streams for a platform, matched by exact name.
    pub fn get(&self, platform: &str) -> Option<u64> {
        self.platforms
            .iter()
            .find(|p| p.platform == platform)
            .map(|p| p.streams)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformStreams> {
        self.platforms.iter()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

/// Baseline share of listening for one platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketShare {
    pub platform: String,
    pub share: f64,
}

/// Baseline market-share table. Shares need not sum to 1; they are
/// renormalized over the requested platforms before use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketShareTable {
    pub shares: Vec<MarketShare>,
}

impl MarketShareTable {
    pub fn share_of(&self, platform: &str) -> Option<f64> {
        self.shares
            .iter()
            .find(|s| s.platform == platform)
            .map(|s| s.share)
    }

    /// Share used for platforms missing from the table: the `Other` entry,
    /// or the mean share when there is none.
    pub fn fallback_share(&self) -> f64 {
        if let Some(other) = self.share_of(OTHER_PLATFORM) {
            return other;
        }
        if self.shares.is_empty() {
            return 0.0;
        }
        self.shares.iter().map(|s| s.share).sum::<f64>() / self.shares.len() as f64
    }
}

impl Default for MarketShareTable {
    fn default() -> Self {
        let shares = [0.55, 0.28, 0.12, 0.05, 0.10, 0.03, 0.02, 0.08];
        Self {
            shares: CANONICAL_PLATFORMS
                .iter()
                .zip(shares)
                .map(|(p, share)| MarketShare {
                    platform: (*p).to_string(),
                    share,
                })
                .collect(),
        }
    }
}

/// Payout for one platform in USD per stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayoutRate {
    pub platform: String,
    pub usd_per_stream: Decimal,
}

/// Royalty rates per platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayoutTable {
    pub rates: Vec<PayoutRate>,
}

impl PayoutTable {
    /// Rate for a platform, falling back to `Other`, then zero.
    pub fn rate_for(&self, platform: &str) -> Decimal {
        let find = |name: &str| {
            self.rates
                .iter()
                .find(|r| r.platform == name)
                .map(|r| r.usd_per_stream)
        };
        find(platform)
            .or_else(|| find(OTHER_PLATFORM))
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for PayoutTable {
    fn default() -> Self {
        // Thousandths of a cent: 40 = $0.0040.
        let rates: [i64; 8] = [40, 80, 100, 30, 40, 64, 125, 20];
        Self {
            rates: CANONICAL_PLATFORMS
                .iter()
                .zip(rates)
                .map(|(p, r)| PayoutRate {
                    platform: (*p).to_string(),
                    usd_per_stream: Decimal::new(r, 4),
                })
                .collect(),
        }
    }
}

/// Closed range a uniform jitter factor is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JitterRange {
    pub min: f64,
    pub max: f64,
}

/// Tunables for chart scoring and platform distribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Maximum rows kept on song and album charts.
    pub chart_size: usize,
    pub song_jitter: JitterRange,
    pub artist_jitter: JitterRange,
    /// Platforms songs are distributed over, in display order.
    pub platforms: Vec<String>,
    pub market_shares: MarketShareTable,
    /// Floor applied to every platform count.
    pub min_platform_streams: u64,
    pub bias_min: f64,
    pub bias_max: f64,
    /// Amplitude of the sinusoidal per-platform jitter.
    pub jitter_amplitude: f64,
    pub payout_rates: PayoutTable,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            chart_size: 100,
            song_jitter: JitterRange { min: 0.8, max: 1.2 },
            artist_jitter: JitterRange {
                min: 0.75,
                max: 1.25,
            },
            platforms: CANONICAL_PLATFORMS.iter().map(|p| p.to_string()).collect(),
            market_shares: MarketShareTable::default(),
            min_platform_streams: 10,
            bias_min: 0.6,
            bias_max: 1.4,
            jitter_amplitude: 0.4,
            payout_rates: PayoutTable::default(),
        }
    }
}

/// Where an entry stood on a previous chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub position: u32,
    pub peak_position: u32,
    pub weeks_on_chart: u32,
}

/// Last week's chart, kept so the next chart can be diffed against it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub week: u32,
    pub week_of: NaiveDate,
    pub entries: BTreeMap<String, SnapshotEntry>,
}

impl ChartSnapshot {
    /// Capture a positioned chart.
    pub fn of_entries(week: u32, week_of: NaiveDate, entries: &[ChartEntry]) -> Self {
        Self {
            week,
            week_of,
            entries: entries
                .iter()
                .map(|e| {
                    (
                        e.id.clone(),
                        SnapshotEntry {
                            position: e.position,
                            peak_position: e.peak_position,
                            weeks_on_chart: e.weeks_on_chart,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Capture artist rankings; weeks and peak are tracked the same way.
    pub fn of_ranks(
        week: u32,
        week_of: NaiveDate,
        ranks: &[ArtistRank],
        previous: Option<&ChartSnapshot>,
    ) -> Self {
        let entries = ranks
            .iter()
            .map(|r| {
                let prior = previous.and_then(|p| p.get(&r.id));
                let entry = SnapshotEntry {
                    position: r.rank,
                    peak_position: prior.map_or(r.rank, |p| p.peak_position.min(r.rank)),
                    weeks_on_chart: prior.map_or(1, |p| p.weeks_on_chart + 1),
                };
                (r.id.clone(), entry)
            })
            .collect();
        Self {
            week,
            week_of,
            entries,
        }
    }

    pub fn get(&self, id: &str) -> Option<&SnapshotEntry> {
        self.entries.get(id)
    }
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Identifiers and names must be non-blank.
    #[error("blank identifier or name")]
    Blank,
    /// Two roster entries of the same kind share an id.
    #[error("duplicate id: {0}")]
    DuplicateId(String),
    /// Popularity ratio must lie within [0, 1].
    #[error("popularity {0} is outside [0,1]")]
    PopularityOutOfRange(f64),
    /// Numeric field must be finite.
    #[error("non-finite numeric value encountered")]
    NonFinite,
    /// Jitter and bias ranges must be positive with min <= max.
    #[error("invalid range [{0}, {1}]")]
    InvalidRange(f64, f64),
    /// Market shares must be finite and non-negative.
    #[error("invalid market share for {0}")]
    InvalidShare(String),
    /// Payout rates must be non-negative.
    #[error("negative payout rate for {0}")]
    NegativePayout(String),
    /// Charts must hold at least one row.
    #[error("chart size must be > 0")]
    ZeroChartSize,
}

fn validate_name(s: &str) -> Result<(), ValidationError> {
    if s.trim().is_empty() {
        return Err(ValidationError::Blank);
    }
    Ok(())
}

fn validate_popularity(p: f64) -> Result<(), ValidationError> {
    if !p.is_finite() {
        return Err(ValidationError::NonFinite);
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(ValidationError::PopularityOutOfRange(p));
    }
    Ok(())
}

fn validate_range(min: f64, max: f64) -> Result<(), ValidationError> {
    if !(min.is_finite() && max.is_finite()) {
        return Err(ValidationError::NonFinite);
    }
    if min <= 0.0 || min > max {
        return Err(ValidationError::InvalidRange(min, max));
    }
    Ok(())
}

/// Validate a song.
pub fn validate_song(s: &Song) -> Result<(), ValidationError> {
    validate_name(&s.id)?;
    validate_name(&s.title)?;
    validate_popularity(s.popularity)
}

/// Validate an album.
pub fn validate_album(a: &Album) -> Result<(), ValidationError> {
    validate_name(&a.id)?;
    validate_name(&a.title)?;
    validate_popularity(a.popularity)
}

/// Validate an artist.
pub fn validate_artist(a: &Artist) -> Result<(), ValidationError> {
    validate_name(&a.id)?;
    validate_name(&a.name)?;
    validate_popularity(a.popularity)
}

fn check_unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), ValidationError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

/// Validate a roster, including id uniqueness per kind.
pub fn validate_roster(r: &Roster) -> Result<(), ValidationError> {
    for s in &r.songs {
        validate_song(s)?;
    }
    for a in &r.albums {
        validate_album(a)?;
    }
    for a in &r.artists {
        validate_artist(a)?;
    }
    check_unique(r.songs.iter().map(|s| s.id.as_str()))?;
    check_unique(r.albums.iter().map(|a| a.id.as_str()))?;
    check_unique(r.artists.iter().map(|a| a.id.as_str()))
}

/// Validate chart tunables.
pub fn validate_config(c: &ChartConfig) -> Result<(), ValidationError> {
    if c.chart_size == 0 {
        return Err(ValidationError::ZeroChartSize);
    }
    validate_range(c.song_jitter.min, c.song_jitter.max)?;
    validate_range(c.artist_jitter.min, c.artist_jitter.max)?;
    validate_range(c.bias_min, c.bias_max)?;
    if !c.jitter_amplitude.is_finite() {
        return Err(ValidationError::NonFinite);
    }
    // 1 + amplitude must stay positive or factors could go negative.
    if !(0.0..1.0).contains(&c.jitter_amplitude) {
        return Err(ValidationError::InvalidRange(
            -c.jitter_amplitude,
            c.jitter_amplitude,
        ));
    }
    for p in &c.platforms {
        validate_name(p)?;
    }
    for s in &c.market_shares.shares {
        if !s.share.is_finite() || s.share < 0.0 {
            return Err(ValidationError::InvalidShare(s.platform.clone()));
        }
    }
    for r in &c.payout_rates.rates {
        if r.usd_per_stream < Decimal::ZERO {
            return Err(ValidationError::NegativePayout(r.platform.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn song(id: &str) -> Song {
        Song {
            id: id.to_string(),
            title: format!("Track {id}"),
            artist: "MC Test".to_string(),
            streams: 1_000,
            popularity: 0.5,
            performance: PerformanceType::Normal,
            is_player: false,
        }
    }

    #[test]
    fn performance_bonus_table() {
        assert_eq!(PerformanceType::Viral.bonus(), 3.0);
        assert_eq!(PerformanceType::Comeback.bonus(), 1.5);
        assert_eq!(PerformanceType::Flop.bonus(), 0.5);
        assert_eq!(PerformanceType::Normal.bonus(), 1.0);
    }

    #[test]
    fn song_defaults_from_json() {
        let s: Song = serde_json::from_str(
            r#"{"id":"s1","title":"Intro","artist":"Lil Test","streams":42}"#,
        )
        .unwrap();
        assert_eq!(s.performance, PerformanceType::Normal);
        assert!(!s.is_player);
        assert_eq!(s.popularity, 0.0);
    }

    #[test]
    fn performance_serializes_snake_case() {
        let s = serde_json::to_string(&PerformanceType::Comeback).unwrap();
        assert_eq!(s, "\"comeback\"");
    }

    #[test]
    fn movement_between_positions() {
        assert_eq!(Movement::between(None, 4), Movement::New);
        assert_eq!(Movement::between(Some(9), 4), Movement::Up(5));
        assert_eq!(Movement::between(Some(2), 4), Movement::Down(2));
        assert_eq!(Movement::between(Some(4), 4), Movement::Same);
    }

    #[test]
    fn canonical_shares_need_renormalizing() {
        let t = MarketShareTable::default();
        let sum: f64 = t.shares.iter().map(|s| s.share).sum();
        assert!((sum - 1.23).abs() < 1e-9);
        assert_eq!(t.share_of("Spotify"), Some(0.55));
        assert_eq!(t.fallback_share(), 0.08);
    }

    #[test]
    fn fallback_share_without_other_is_mean() {
        let t = MarketShareTable {
            shares: vec![
                MarketShare {
                    platform: "A".into(),
                    share: 0.2,
                },
                MarketShare {
                    platform: "B".into(),
                    share: 0.4,
                },
            ],
        };
        assert!((t.fallback_share() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn payout_rate_falls_back_to_other() {
        let t = PayoutTable::default();
        assert_eq!(t.rate_for("Spotify"), Decimal::new(40, 4));
        assert_eq!(t.rate_for("Napster"), Decimal::new(20, 4));
    }

    #[test]
    fn duplicate_song_ids_rejected() {
        let r = Roster {
            songs: vec![song("a"), song("a")],
            ..Default::default()
        };
        assert_eq!(
            validate_roster(&r),
            Err(ValidationError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn default_config_is_valid() {
        validate_config(&ChartConfig::default()).unwrap();
    }

    #[test]
    fn inverted_jitter_range_rejected() {
        let c = ChartConfig {
            song_jitter: JitterRange { min: 1.2, max: 0.8 },
            ..Default::default()
        };
        assert_eq!(
            validate_config(&c),
            Err(ValidationError::InvalidRange(1.2, 0.8))
        );
    }

    #[test]
    fn config_roundtrip_with_partial_json() {
        let c: ChartConfig = serde_json::from_str(r#"{"chart_size": 50}"#).unwrap();
        assert_eq!(c.chart_size, 50);
        assert_eq!(c.min_platform_streams, 10);
        assert_eq!(c.platforms.len(), CANONICAL_PLATFORMS.len());
    }

    #[test]
    fn snapshot_of_ranks_tracks_peak_and_weeks() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let rank = |r: u32| ArtistRank {
            id: "a1".into(),
            name: "Big Test".into(),
            score: 1.0,
            trend: Trend::Same,
            rank: r,
            previous_rank: None,
            is_player: false,
        };
        let w1 = ChartSnapshot::of_ranks(1, date, &[rank(2)], None);
        let w2 = ChartSnapshot::of_ranks(2, date, &[rank(5)], Some(&w1));
        let e = w2.get("a1").unwrap();
        assert_eq!(e.position, 5);
        assert_eq!(e.peak_position, 2);
        assert_eq!(e.weeks_on_chart, 2);
    }

    proptest! {
        #[test]
        fn popularity_in_unit_interval_is_valid(p in 0.0f64..=1.0) {
            let mut s = song("x");
            s.popularity = p;
            prop_assert!(validate_song(&s).is_ok());
        }

        #[test]
        fn popularity_above_one_is_invalid(p in 1.0001f64..100.0) {
            let mut s = song("x");
            s.popularity = p;
            prop_assert!(validate_song(&s).is_err());
        }
    }
}
