//! Seeded generation of AI rapper rosters.

use chart_core::{Album, Artist, PerformanceType, Roster, Song};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const NAME_PREFIXES: &[&str] = &[
    "Lil", "Young", "Big", "MC", "Kid", "Saint", "Yung", "DJ", "Lord", "Baby",
];

pub const NAME_CORES: &[&str] = &[
    "Meridian", "Vandal", "Static", "Cassette", "Reign", "Halo", "Ledger", "Cipher", "Mirage",
    "Voltage", "Granite", "Echo", "Saturn", "Velvet", "Rogue", "Nimbus",
];

pub const TITLE_WORDS: &[&str] = &[
    "Midnight", "Paper", "Crown", "Skyline", "Rewind", "Gold", "Concrete", "Prayer", "Signal",
    "Pressure", "Neon", "Ghost", "Engine", "Summer", "Static", "Heavy", "Northside", "Dream",
];

/// (performance, weight)
const PERFORMANCE_WEIGHTS: &[(PerformanceType, u32)] = &[
    (PerformanceType::Normal, 70),
    (PerformanceType::Flop, 15),
    (PerformanceType::Comeback, 10),
    (PerformanceType::Viral, 5),
];

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn pick_performance<R: Rng + ?Sized>(rng: &mut R) -> PerformanceType {
    let total: u32 = PERFORMANCE_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for (p, w) in PERFORMANCE_WEIGHTS {
        if roll < *w {
            return *p;
        }
        roll -= w;
    }
    PerformanceType::Normal
}

fn title<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, TITLE_WORDS), pick(rng, TITLE_WORDS))
}

/// Generate a roster of `n_ai` AI artists plus the player, each with one to
/// three songs and an occasional album. The player starts small.
pub fn generate_roster(seed: u64, n_ai: usize, player_name: &str) -> Roster {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut roster = Roster::default();

    for i in 0..=n_ai {
        let is_player = i == 0;
        let (id, name) = if is_player {
            ("player".to_string(), player_name.to_string())
        } else {
            (
                format!("ai-{i}"),
                format!("{} {}", pick(&mut rng, NAME_PREFIXES), pick(&mut rng, NAME_CORES)),
            )
        };
        // Log-uniform between 10^4 and 10^6.7 listeners; the player below 10^5.
        let exponent = if is_player {
            rng.gen_range(4.0..5.0)
        } else {
            rng.gen_range(4.0..6.7)
        };
        let monthly_listeners = 10f64.powf(exponent) as u64;
        let popularity = ((exponent - 4.0) / 2.7f64).clamp(0.0, 1.0);
        let performance = pick_performance(&mut rng);

        let n_songs = rng.gen_range(1..=3);
        for s in 0..n_songs {
            let streams = (monthly_listeners as f64 * rng.gen_range(0.5..3.0)) as u64;
            roster.songs.push(Song {
                id: format!("{id}-s{s}"),
                title: title(&mut rng),
                artist: name.clone(),
                streams,
                popularity,
                performance: pick_performance(&mut rng),
                is_player,
            });
        }
        if rng.gen_bool(0.4) {
            let track_count: u16 = rng.gen_range(8..=16);
            roster.albums.push(Album {
                id: format!("{id}-a0"),
                title: title(&mut rng),
                artist: name.clone(),
                streams: monthly_listeners * u64::from(track_count),
                track_count,
                popularity,
                performance,
                is_player,
            });
        }
        roster.artists.push(Artist {
            id,
            name,
            monthly_listeners,
            popularity,
            performance,
            is_player,
        });
    }
    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_roster() {
        assert_eq!(
            generate_roster(9, 12, "Lil Rookie"),
            generate_roster(9, 12, "Lil Rookie")
        );
    }

    #[test]
    fn roster_shape_and_validity() {
        let r = generate_roster(1, 20, "Lil Rookie");
        assert_eq!(r.artists.len(), 21);
        assert!(r.songs.len() >= 21 && r.songs.len() <= 63);
        let players: Vec<_> = r.artists.iter().filter(|a| a.is_player).collect();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Lil Rookie");
        assert!(players[0].monthly_listeners < 100_000);
        chart_core::validate_roster(&r).unwrap();
    }

    #[test]
    fn performance_weights_cover_all_rolls() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let viral = (0..2_000)
            .filter(|_| pick_performance(&mut rng) == PerformanceType::Viral)
            .count();
        assert!(viral > 20 && viral < 250);
    }
}
