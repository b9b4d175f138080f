//! Per-platform stream distribution.
//!
//! A song's total streams are split over platforms by weighting each
//! platform's renormalized market share with a bias derived from the song's
//! title and artist plus a sinusoidal jitter. Both terms are pure functions of
//! their inputs, so the same song always gets the same breakdown. Raw values
//! are floored at a minimum, made unique by incrementing, rescaled toward the
//! total, then reconciled so they sum to it exactly.

use chart_core::{ChartConfig, MarketShareTable, PlatformStreamDistribution, PlatformStreams, Song};
use tracing::debug;

/// Sum of the UTF-16 code units of a string.
pub fn char_code_sum(s: &str) -> u64 {
    s.encode_utf16().map(u64::from).sum()
}

/// Seed shared by every platform of one song.
pub fn entity_seed(title: &str, artist: &str) -> u64 {
    char_code_sum(title) + char_code_sum(artist)
}

/// Platform bias in `[min, max)`, from the seed and the platform's name.
pub fn platform_bias(seed: u64, platform: &str, index: usize, min: f64, max: f64) -> f64 {
    let h = seed.wrapping_add(char_code_sum(platform).wrapping_mul(index as u64 + 1)) % 100;
    min + (max - min) * h as f64 / 100.0
}

/// Sinusoidal jitter in `[-amplitude, amplitude]`.
pub fn platform_jitter(seed: u64, index: usize, amplitude: f64) -> f64 {
    let i = index as f64;
    (seed as f64 * (i + 1.0) + i).sin() * amplitude
}

/// Shares for the requested platforms, renormalized to sum to 1.
///
/// Platforms missing from the table take the table's fallback share. If the
/// shares sum to zero every platform gets an equal slice.
pub fn normalized_shares(table: &MarketShareTable, platforms: &[String]) -> Vec<f64> {
    let raw: Vec<f64> = platforms
        .iter()
        .map(|p| {
            let s = table.share_of(p).unwrap_or_else(|| table.fallback_share());
            if s.is_finite() {
                s.max(0.0)
            } else {
                0.0
            }
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    if sum > 0.0 {
        raw.iter().map(|s| s / sum).collect()
    } else {
        vec![1.0 / platforms.len() as f64; platforms.len()]
    }
}

fn bump_unique(mut value: u64, taken: &[u64]) -> u64 {
    while taken.contains(&value) {
        value += 1;
    }
    value
}

/// Smallest total that `n` unique counts starting at `floor` can add up to.
pub fn min_distributable(n: usize, floor: u64) -> u64 {
    let n = n as u64;
    floor * n + n * n.saturating_sub(1) / 2
}

/// Move unique, floored counts onto `total`. A deficit goes to the largest
/// count; a surplus is taken from the largest counts first, each staying above
/// the next smaller one. Counts that cannot shrink further form the ladder
/// `floor, floor + 1, ...`.
fn reconcile(values: &mut [u64], total: u64, floor: u64) {
    let sum: u64 = values.iter().sum();
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].cmp(&values[a]));
    if sum < total {
        if let Some(&top) = order.first() {
            values[top] += total - sum;
        }
        return;
    }
    let mut surplus = sum - total;
    // Each pass keeps the descending order strict, so `order` stays valid.
    while surplus > 0 {
        let before = surplus;
        for (rank, &i) in order.iter().enumerate() {
            if surplus == 0 {
                break;
            }
            let min = match order.get(rank + 1) {
                Some(&next) => values[next] + 1,
                None => floor,
            };
            let take = surplus.min(values[i].saturating_sub(min));
            values[i] -= take;
            surplus -= take;
        }
        if surplus == before {
            break;
        }
    }
}

/// Split `total` streams of one song across `platforms`.
///
/// Every platform gets at least `config.min_platform_streams` and no two
/// platforms share a count. The counts sum to exactly `total` whenever it is at
/// least [`min_distributable`]; below that they sum to that minimum.
pub fn distribute_streams(
    title: &str,
    artist: &str,
    total: u64,
    platforms: &[String],
    config: &ChartConfig,
) -> PlatformStreamDistribution {
    if platforms.is_empty() {
        return PlatformStreamDistribution::default();
    }
    let seed = entity_seed(title, artist);
    let shares = normalized_shares(&config.market_shares, platforms);
    let floor = config.min_platform_streams;

    let mut raw: Vec<u64> = Vec::with_capacity(platforms.len());
    for (i, (platform, share)) in platforms.iter().zip(&shares).enumerate() {
        let bias = platform_bias(seed, platform, i, config.bias_min, config.bias_max);
        let jitter = platform_jitter(seed, i, config.jitter_amplitude);
        let factor = (share * bias * (1.0 + jitter)).max(0.0);
        let value = (total as f64 * factor).floor() as u64;
        raw.push(bump_unique(value.max(floor), &raw));
    }

    let raw_sum: u64 = raw.iter().sum();
    let adjustment = if raw_sum == 0 {
        1.0
    } else {
        total as f64 / raw_sum as f64
    };

    let mut adjusted: Vec<u64> = Vec::with_capacity(raw.len());
    for r in &raw {
        let scaled = (*r as f64 * adjustment).floor() as u64;
        adjusted.push(bump_unique(scaled.max(floor), &adjusted));
    }
    reconcile(&mut adjusted, total, floor);

    let dist = PlatformStreamDistribution {
        platforms: platforms
            .iter()
            .zip(adjusted)
            .map(|(p, streams)| PlatformStreams {
                platform: p.clone(),
                streams,
            })
            .collect(),
    };
    debug!(
        title,
        total,
        distributed = dist.total(),
        adjustment,
        "streams distributed"
    );
    dist
}

/// Distribute a song's streams over the configured platforms.
pub fn distribute_song(song: &Song, config: &ChartConfig) -> PlatformStreamDistribution {
    distribute_streams(
        &song.title,
        &song.artist,
        song.streams,
        &config.platforms,
        config,
    )
}
