//! Chart ranking.
//!
//! Candidates are sorted descending on score with a stable sort, so ties keep
//! their insertion order, and positions are the 1-based index after sorting.
//! Movement comes from last week's snapshot, never from a fresh roll.

use crate::scoring::{score_album, score_artist, score_song, ScoredArtist, ScoredCandidate};
use crate::trend::{roll_trend, trend_between};
use chart_core::{Album, Artist, ArtistRank, ChartConfig, ChartEntry, ChartSnapshot, Song};
use rand::Rng;
use tracing::debug;

fn sanitize(score: f64) -> f64 {
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

/// Rank scored songs or albums into a chart, keeping at most `limit` rows.
///
/// Only `previous` is consulted for history. An entry missing from it counts
/// as new, including one re-entering after dropping off an earlier chart: it
/// shows as [`Movement::New`](chart_core::Movement::New) with
/// `weeks_on_chart` back at 1 and its peak taken from this week alone.
pub fn rank_chart(
    mut candidates: Vec<ScoredCandidate>,
    limit: Option<usize>,
    previous: Option<&ChartSnapshot>,
) -> Vec<ChartEntry> {
    for c in &mut candidates {
        c.score = sanitize(c.score);
    }
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    if let Some(limit) = limit {
        candidates.truncate(limit);
    }
    candidates
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            let position = i as u32 + 1;
            let prior = previous.and_then(|p| p.get(&c.id));
            ChartEntry {
                id: c.id,
                title: c.title,
                artist: c.artist,
                position,
                previous_position: prior.map(|p| p.position),
                peak_position: prior.map_or(position, |p| p.peak_position.min(position)),
                weeks_on_chart: prior.map_or(1, |p| p.weeks_on_chart + 1),
                is_player: c.is_player,
                score: c.score,
            }
        })
        .collect()
}

/// Rank scored artists. Artists ranked last week trend by their real rank
/// change; everyone else gets a popularity-tier roll.
pub fn rank_artists<R: Rng + ?Sized>(
    mut scored: Vec<ScoredArtist>,
    previous: Option<&ChartSnapshot>,
    rng: &mut R,
) -> Vec<ArtistRank> {
    for a in &mut scored {
        a.score = sanitize(a.score);
    }
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
        .into_iter()
        .enumerate()
        .map(|(i, a)| {
            let rank = i as u32 + 1;
            let previous_rank = previous.and_then(|p| p.get(&a.id)).map(|p| p.position);
            let trend = match previous_rank {
                Some(prev) => trend_between(prev, rank),
                None => roll_trend(a.popularity, rng.gen::<f64>()),
            };
            ArtistRank {
                id: a.id,
                name: a.name,
                score: a.score,
                trend,
                rank,
                previous_rank,
                is_player: a.is_player,
            }
        })
        .collect()
}

/// Score and rank songs into the weekly song chart.
pub fn song_chart<R: Rng + ?Sized>(
    songs: &[Song],
    config: &ChartConfig,
    previous: Option<&ChartSnapshot>,
    rng: &mut R,
) -> Vec<ChartEntry> {
    let scored: Vec<_> = songs
        .iter()
        .map(|s| score_song(s, config.song_jitter, &mut *rng))
        .collect();
    let chart = rank_chart(scored, Some(config.chart_size), previous);
    debug!(candidates = songs.len(), charted = chart.len(), "song chart ranked");
    chart
}

/// Score and rank albums into the weekly album chart.
pub fn album_chart<R: Rng + ?Sized>(
    albums: &[Album],
    config: &ChartConfig,
    previous: Option<&ChartSnapshot>,
    rng: &mut R,
) -> Vec<ChartEntry> {
    let scored: Vec<_> = albums
        .iter()
        .map(|a| score_album(a, config.song_jitter, &mut *rng))
        .collect();
    let chart = rank_chart(scored, Some(config.chart_size), previous);
    debug!(candidates = albums.len(), charted = chart.len(), "album chart ranked");
    chart
}

/// Score and rank every artist; the ranking is not truncated.
pub fn artist_rankings<R: Rng + ?Sized>(
    artists: &[Artist],
    config: &ChartConfig,
    previous: Option<&ChartSnapshot>,
    rng: &mut R,
) -> Vec<ArtistRank> {
    let scored: Vec<_> = artists
        .iter()
        .map(|a| score_artist(a, config.artist_jitter, &mut *rng))
        .collect();
    let ranks = rank_artists(scored, previous, rng);
    debug!(artists = ranks.len(), "artist rankings ranked");
    ranks
}
