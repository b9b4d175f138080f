#![deny(warnings)]

//! ECS runtime advancing the charts week by week.
//!
//! The world holds the roster, the chart config, a seeded RNG and last week's
//! chart snapshots. Each week re-scores every candidate and diffs the new
//! charts against the stored snapshots, so movement reflects real history.

use bevy_ecs::prelude::*;
use chart_core::{ArtistRank, ChartConfig, ChartEntry, ChartSnapshot, Roster};
use chart_engine::{album_chart, artist_rankings, seeded_rng, song_chart};
use chrono::{Days, NaiveDate};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

pub mod roster;

pub use roster::generate_roster;

/// Chart tunables.
#[derive(Resource, Clone, Debug)]
pub struct ChartSettings(pub ChartConfig);

/// Releases and artists eligible to chart.
#[derive(Resource, Clone, Debug)]
pub struct RosterState(pub Roster);

/// RNG behind every jitter and trend roll.
#[derive(Resource)]
pub struct ChartRng(pub ChaCha8Rng);

/// Week counter; week 0 means no chart has run yet.
#[derive(Resource, Clone, Copy, Debug)]
pub struct ChartClock {
    pub week: u32,
    pub start: NaiveDate,
}

impl ChartClock {
    pub fn week_of(&self) -> NaiveDate {
        let days = 7 * u64::from(self.week.saturating_sub(1));
        self.start.checked_add_days(Days::new(days)).unwrap_or(self.start)
    }
}

/// Last recorded chart of each kind.
#[derive(Resource, Clone, Debug, Default)]
pub struct ChartHistory {
    pub songs: Option<ChartSnapshot>,
    pub albums: Option<ChartSnapshot>,
    pub artists: Option<ChartSnapshot>,
}

/// Charts computed in the current week.
#[derive(Resource, Clone, Debug, Default)]
pub struct CurrentCharts {
    pub songs: Vec<ChartEntry>,
    pub albums: Vec<ChartEntry>,
    pub artists: Vec<ArtistRank>,
}

/// Everything published for one chart week.
#[derive(Clone, Debug, Serialize)]
pub struct WeeklyCharts {
    pub week: u32,
    pub week_of: NaiveDate,
    pub songs: Vec<ChartEntry>,
    pub albums: Vec<ChartEntry>,
    pub artists: Vec<ArtistRank>,
}

impl WeeklyCharts {
    /// Best song chart position held by the player this week.
    pub fn player_best_song(&self) -> Option<&ChartEntry> {
        self.songs.iter().find(|e| e.is_player)
    }

    pub fn player_rank(&self) -> Option<&ArtistRank> {
        self.artists.iter().find(|a| a.is_player)
    }
}

/// Build a world ready to run chart weeks from `start`.
pub fn init_world(roster: Roster, config: ChartConfig, seed: u64, start: NaiveDate) -> World {
    let mut world = World::new();
    world.insert_resource(ChartSettings(config));
    world.insert_resource(RosterState(roster));
    world.insert_resource(ChartRng(seeded_rng(seed)));
    world.insert_resource(ChartClock { week: 0, start });
    world.insert_resource(ChartHistory::default());
    world.insert_resource(CurrentCharts::default());
    world
}

/// Swap the roster, e.g. after the player releases a track. History is kept.
pub fn set_roster(world: &mut World, roster: Roster) {
    world.insert_resource(RosterState(roster));
}

fn advance_clock(mut clock: ResMut<ChartClock>) {
    clock.week += 1;
}

fn rank_songs(
    settings: Res<ChartSettings>,
    roster: Res<RosterState>,
    history: Res<ChartHistory>,
    mut rng: ResMut<ChartRng>,
    mut current: ResMut<CurrentCharts>,
) {
    current.songs = song_chart(
        &roster.0.songs,
        &settings.0,
        history.songs.as_ref(),
        &mut rng.0,
    );
}

fn rank_albums(
    settings: Res<ChartSettings>,
    roster: Res<RosterState>,
    history: Res<ChartHistory>,
    mut rng: ResMut<ChartRng>,
    mut current: ResMut<CurrentCharts>,
) {
    current.albums = album_chart(
        &roster.0.albums,
        &settings.0,
        history.albums.as_ref(),
        &mut rng.0,
    );
}

fn rank_artists(
    settings: Res<ChartSettings>,
    roster: Res<RosterState>,
    history: Res<ChartHistory>,
    mut rng: ResMut<ChartRng>,
    mut current: ResMut<CurrentCharts>,
) {
    current.artists = artist_rankings(
        &roster.0.artists,
        &settings.0,
        history.artists.as_ref(),
        &mut rng.0,
    );
}

fn record_history(
    clock: Res<ChartClock>,
    current: Res<CurrentCharts>,
    mut history: ResMut<ChartHistory>,
) {
    let week_of = clock.week_of();
    let artists =
        ChartSnapshot::of_ranks(clock.week, week_of, &current.artists, history.artists.as_ref());
    history.songs = Some(ChartSnapshot::of_entries(clock.week, week_of, &current.songs));
    history.albums = Some(ChartSnapshot::of_entries(clock.week, week_of, &current.albums));
    history.artists = Some(artists);
    info!(
        week = clock.week,
        %week_of,
        songs = current.songs.len(),
        albums = current.albums.len(),
        artists = current.artists.len(),
        "chart week recorded"
    );
}

/// Schedule running one chart week.
pub fn chart_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            advance_clock,
            rank_songs,
            rank_albums,
            rank_artists,
            record_history,
        )
            .chain(),
    );
    schedule
}

fn published(world: &World) -> WeeklyCharts {
    let clock = world.resource::<ChartClock>();
    let current = world.resource::<CurrentCharts>();
    WeeklyCharts {
        week: clock.week,
        week_of: clock.week_of(),
        songs: current.songs.clone(),
        albums: current.albums.clone(),
        artists: current.artists.clone(),
    }
}

/// Run `weeks` chart weeks, returning each week's charts in order.
pub fn run_weeks(world: &mut World, weeks: u32) -> Vec<WeeklyCharts> {
    let mut schedule = chart_schedule();
    let mut out = Vec::with_capacity(weeks as usize);
    for _ in 0..weeks {
        schedule.run(world);
        out.push(published(world));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_core::{Movement, Trend};
    use std::path::PathBuf;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    fn demo_roster() -> Roster {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/rosters/demo.yaml");
        chart_config::load_roster(path).unwrap()
    }

    #[test]
    fn world_creates() {
        let world = init_world(Roster::default(), ChartConfig::default(), 1, start());
        assert_eq!(world.resource::<ChartClock>().week, 0);
    }

    #[test]
    fn empty_roster_runs_empty_charts() {
        let mut world = init_world(Roster::default(), ChartConfig::default(), 1, start());
        let weeks = run_weeks(&mut world, 2);
        assert_eq!(weeks.len(), 2);
        assert!(weeks[1].songs.is_empty());
        assert!(weeks[1].artists.is_empty());
    }

    #[test]
    fn weeks_advance_dates() {
        let mut world = init_world(demo_roster(), ChartConfig::default(), 7, start());
        let weeks = run_weeks(&mut world, 3);
        assert_eq!(weeks[0].week, 1);
        assert_eq!(weeks[0].week_of, start());
        assert_eq!(weeks[2].week, 3);
        assert_eq!(weeks[2].week_of, NaiveDate::from_ymd_opt(2024, 1, 19).unwrap());
    }

    #[test]
    fn second_week_diffs_against_first() {
        let mut world = init_world(demo_roster(), ChartConfig::default(), 7, start());
        let weeks = run_weeks(&mut world, 2);
        let (w1, w2) = (&weeks[0], &weeks[1]);
        assert!(w1.songs.iter().all(|e| e.movement() == Movement::New));
        for e in &w2.songs {
            let before = w1.songs.iter().find(|p| p.id == e.id).unwrap();
            assert_eq!(e.previous_position, Some(before.position));
            assert_eq!(e.weeks_on_chart, 2);
            assert_eq!(e.peak_position, before.position.min(e.position));
        }
        for a in &w2.artists {
            let before = w1.artists.iter().find(|p| p.id == a.id).unwrap();
            assert_eq!(a.previous_rank, Some(before.rank));
            let expected = match a.rank.cmp(&before.rank) {
                std::cmp::Ordering::Less => Trend::Up,
                std::cmp::Ordering::Greater => Trend::Down,
                std::cmp::Ordering::Equal => Trend::Same,
            };
            assert_eq!(a.trend, expected);
        }
    }

    #[test]
    fn same_seed_same_run() {
        let a = run_weeks(&mut init_world(demo_roster(), ChartConfig::default(), 42, start()), 3);
        let b = run_weeks(&mut init_world(demo_roster(), ChartConfig::default(), 42, start()), 3);
        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }

    #[test]
    fn new_release_enters_as_new() {
        let mut roster = demo_roster();
        let mut world = init_world(roster.clone(), ChartConfig::default(), 5, start());
        run_weeks(&mut world, 1);
        roster.songs.push(chart_core::Song {
            id: "s-new".into(),
            title: "Debut Drop".into(),
            artist: "Lil Rookie".into(),
            streams: 9_000_000,
            popularity: 0.4,
            performance: chart_core::PerformanceType::Viral,
            is_player: true,
        });
        set_roster(&mut world, roster);
        let weeks = run_weeks(&mut world, 1);
        let entry = weeks[0].player_best_song().unwrap();
        assert_eq!(entry.id, "s-new");
        assert_eq!(entry.position, 1);
        assert_eq!(entry.movement(), Movement::New);
    }

    #[test]
    fn generated_roster_respects_chart_size() {
        let roster = generate_roster(3, 80, "Lil Rookie");
        let cfg = ChartConfig {
            chart_size: 25,
            ..Default::default()
        };
        let mut world = init_world(roster, cfg, 3, start());
        let weeks = run_weeks(&mut world, 1);
        assert_eq!(weeks[0].songs.len(), 25);
        assert_eq!(weeks[0].artists.len(), 81);
        assert!(weeks[0].player_rank().is_some());
    }
}
