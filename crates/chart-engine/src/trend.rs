//! Artist trend classification.

use chart_core::Trend;

/// Classify a trend from a uniform roll in [0,1) using the popularity tier.
///
/// - popularity > 0.8: 40% same, 40% up, 20% down
/// - 0.5 < popularity <= 0.8: a third each of up, same, down
/// - popularity <= 0.5: 40% down, 30% same, 30% up
pub fn roll_trend(popularity: f64, roll: f64) -> Trend {
    let p = if popularity.is_finite() {
        popularity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if p > 0.8 {
        if roll < 0.4 {
            Trend::Same
        } else if roll < 0.8 {
            Trend::Up
        } else {
            Trend::Down
        }
    } else if p > 0.5 {
        if roll < 1.0 / 3.0 {
            Trend::Up
        } else if roll < 2.0 / 3.0 {
            Trend::Same
        } else {
            Trend::Down
        }
    } else if roll < 0.4 {
        Trend::Down
    } else if roll < 0.7 {
        Trend::Same
    } else {
        Trend::Up
    }
}

/// Trend from an actual rank change; a smaller rank number is a climb.
pub fn trend_between(previous_rank: u32, rank: u32) -> Trend {
    match rank.cmp(&previous_rank) {
        std::cmp::Ordering::Less => Trend::Up,
        std::cmp::Ordering::Greater => Trend::Down,
        std::cmp::Ordering::Equal => Trend::Same,
    }
}
