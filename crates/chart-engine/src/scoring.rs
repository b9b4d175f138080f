//! Score blending for chart candidates.
//!
//! score = base metric × performance bonus × uniform jitter.

use chart_core::{Album, Artist, JitterRange, PerformanceType, Song};
use rand::Rng;

/// A song or album with its ranking key computed.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredCandidate {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub is_player: bool,
    pub score: f64,
}

/// An artist with its ranking key computed.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredArtist {
    pub id: String,
    pub name: String,
    pub popularity: f64,
    pub is_player: bool,
    pub score: f64,
}

/// Draw a jitter factor uniformly from the closed range.
///
/// An inverted range is swapped rather than panicking.
pub fn jitter_factor<R: Rng + ?Sized>(rng: &mut R, range: JitterRange) -> f64 {
    let (lo, hi) = if range.min <= range.max {
        (range.min, range.max)
    } else {
        (range.max, range.min)
    };
    if !(lo.is_finite() && hi.is_finite()) {
        return 1.0;
    }
    rng.gen_range(lo..=hi)
}

/// Blend a base metric with a performance bonus and a jitter factor.
/// Non-finite results collapse to zero.
pub fn blend(base: u64, performance: PerformanceType, jitter: f64) -> f64 {
    let s = base as f64 * performance.bonus() * jitter;
    if s.is_finite() && s > 0.0 {
        s
    } else {
        0.0
    }
}

pub fn score_song<R: Rng + ?Sized>(song: &Song, range: JitterRange, rng: &mut R) -> ScoredCandidate {
    let jitter = jitter_factor(rng, range);
    ScoredCandidate {
        id: song.id.clone(),
        title: song.title.clone(),
        artist: song.artist.clone(),
        is_player: song.is_player,
        score: blend(song.streams, song.performance, jitter),
    }
}

pub fn score_album<R: Rng + ?Sized>(
    album: &Album,
    range: JitterRange,
    rng: &mut R,
) -> ScoredCandidate {
    let jitter = jitter_factor(rng, range);
    ScoredCandidate {
        id: album.id.clone(),
        title: album.title.clone(),
        artist: album.artist.clone(),
        is_player: album.is_player,
        score: blend(album.streams, album.performance, jitter),
    }
}

pub fn score_artist<R: Rng + ?Sized>(
    artist: &Artist,
    range: JitterRange,
    rng: &mut R,
) -> ScoredArtist {
    let jitter = jitter_factor(rng, range);
    ScoredArtist {
        id: artist.id.clone(),
        name: artist.name.clone(),
        popularity: artist.popularity,
        is_player: artist.is_player,
        score: blend(artist.monthly_listeners, artist.performance, jitter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeded_rng;
    use proptest::prelude::*;

    const SONG_RANGE: JitterRange = JitterRange { min: 0.8, max: 1.2 };

    fn song(streams: u64, performance: PerformanceType) -> Song {
        Song {
            id: "s".into(),
            title: "Cold Open".into(),
            artist: "Young Fixture".into(),
            streams,
            popularity: 0.5,
            performance,
            is_player: true,
        }
    }

    #[test]
    fn blend_applies_bonus() {
        assert_eq!(blend(1000, PerformanceType::Viral, 1.0), 3000.0);
        assert_eq!(blend(1000, PerformanceType::Flop, 1.0), 500.0);
        assert_eq!(blend(0, PerformanceType::Viral, 1.1), 0.0);
    }

    #[test]
    fn blend_non_finite_is_zero() {
        assert_eq!(blend(1000, PerformanceType::Normal, f64::NAN), 0.0);
        assert_eq!(blend(1000, PerformanceType::Normal, f64::INFINITY), 0.0);
    }

    #[test]
    fn degenerate_range_is_exact() {
        let mut rng = seeded_rng(1);
        let f = jitter_factor(&mut rng, JitterRange { min: 1.0, max: 1.0 });
        assert_eq!(f, 1.0);
    }

    #[test]
    fn seeded_scores_repeat() {
        let s = song(10_000, PerformanceType::Comeback);
        let a = score_song(&s, SONG_RANGE, &mut seeded_rng(7));
        let b = score_song(&s, SONG_RANGE, &mut seeded_rng(7));
        assert_eq!(a, b);
        assert!(a.is_player);
    }

    proptest! {
        #[test]
        fn song_score_within_jitter_bounds(streams in 0u64..10_000_000, seed in any::<u64>()) {
            let s = song(streams, PerformanceType::Viral);
            let scored = score_song(&s, SONG_RANGE, &mut seeded_rng(seed));
            let base = streams as f64 * 3.0;
            prop_assert!(scored.score >= base * 0.8 - 1e-6);
            prop_assert!(scored.score <= base * 1.2 + 1e-6);
        }

        #[test]
        fn inverted_range_still_bounded(seed in any::<u64>()) {
            let f = jitter_factor(&mut seeded_rng(seed), JitterRange { min: 1.25, max: 0.75 });
            prop_assert!((0.75..=1.25).contains(&f));
        }
    }
}
