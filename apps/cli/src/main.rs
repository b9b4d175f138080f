#![deny(warnings)]

//! Headless CLI: run chart weeks over a roster and print the results.

use anyhow::{anyhow, bail, Context, Result};
use chart_core::{ChartConfig, ChartEntry, Movement, Roster, Trend};
use chart_engine::{estimate_promotion, estimate_royalties, PromotionChannel};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    roster: Option<PathBuf>,
    generate: Option<usize>,
    weeks: Option<u32>,
    seed: Option<u64>,
    song: Option<String>,
    promo_budget: Option<Decimal>,
    json: bool,
    version: bool,
}

fn value<T>(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = it.next().with_context(|| format!("{flag} needs a value"))?;
    raw.parse()
        .map_err(|e| anyhow!("invalid value for {flag}: {raw:?} ({e})"))
}

fn parse_args_from(argv: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    let mut it = argv.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = Some(value(&mut it, "--config")?),
            "--roster" => args.roster = Some(value(&mut it, "--roster")?),
            "--generate" => args.generate = Some(value(&mut it, "--generate")?),
            "--weeks" => args.weeks = Some(value(&mut it, "--weeks")?),
            "--seed" => args.seed = Some(value(&mut it, "--seed")?),
            "--song" => args.song = Some(value(&mut it, "--song")?),
            "--promo" => args.promo_budget = Some(value(&mut it, "--promo")?),
            "--json" => args.json = true,
            "--version" => args.version = true,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

fn parse_args() -> Result<Args> {
    parse_args_from(std::env::args().skip(1))
}

fn movement_label(e: &ChartEntry) -> String {
    match e.movement() {
        Movement::New => "NEW".to_string(),
        Movement::Up(n) => format!("+{n}"),
        Movement::Down(n) => format!("-{n}"),
        Movement::Same => "=".to_string(),
    }
}

fn trend_label(t: Trend) -> &'static str {
    match t {
        Trend::Up => "up",
        Trend::Down => "down",
        Trend::Same => "same",
    }
}

fn print_chart(name: &str, entries: &[ChartEntry], rows: usize) {
    println!("  {name}");
    for e in entries.iter().take(rows) {
        let marker = if e.is_player { "*" } else { " " };
        println!(
            "  {marker}{:>3}. {:<5} {} - {} (peak {}, {} wk)",
            e.position,
            movement_label(e),
            e.title,
            e.artist,
            e.peak_position,
            e.weeks_on_chart
        );
    }
}

fn load_roster(args: &Args) -> Result<Roster> {
    if let Some(n) = args.generate {
        return Ok(chart_runtime::generate_roster(
            args.seed.unwrap_or(42),
            n,
            "Lil Rookie",
        ));
    }
    let path = args
        .roster
        .clone()
        .unwrap_or_else(|| PathBuf::from("assets/rosters/demo.yaml"));
    chart_config::load_roster(&path).with_context(|| format!("loading {}", path.display()))
}

fn song_report(roster: &Roster, config: &ChartConfig, id: &str, budget: Option<Decimal>) -> Result<()> {
    let song = roster
        .songs
        .iter()
        .find(|s| s.id == id)
        .with_context(|| format!("no song with id {id}"))?;
    let dist = chart_engine::distribute_song(song, config);
    let royalties = estimate_royalties(&dist, &config.payout_rates);
    println!("{} - {} | {} streams", song.title, song.artist, song.streams);
    for r in &royalties.per_platform {
        println!("  {:<14} {:>12}  ${}", r.platform, r.streams, r.usd);
    }
    println!("  {:<14} {:>12}  ${}", "total", dist.total(), royalties.total_usd);
    if let Some(budget) = budget {
        for channel in [
            PromotionChannel::SocialMedia,
            PromotionChannel::Radio,
            PromotionChannel::Playlist,
            PromotionChannel::MusicVideo,
        ] {
            let e = estimate_promotion(song.streams, budget, channel)?;
            println!(
                "  promo {:?}: x{:.2} (+{} streams)",
                channel, e.multiplier, e.extra_streams
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args()?;
    if args.version {
        println!(
            "rap-charts {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(?args, "starting CLI");

    let config = match &args.config {
        Some(path) => chart_config::load_config(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ChartConfig::default(),
    };
    let roster = load_roster(&args)?;

    if let Some(id) = &args.song {
        return song_report(&roster, &config, id, args.promo_budget);
    }

    let weeks = args.weeks.unwrap_or(1);
    let start = NaiveDate::from_ymd_opt(2024, 1, 5).context("invalid start date")?;
    let mut world = chart_runtime::init_world(roster, config, args.seed.unwrap_or(42), start);
    let charts = chart_runtime::run_weeks(&mut world, weeks);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&charts)?);
        return Ok(());
    }
    for week in &charts {
        println!("Week {} | {}", week.week, week.week_of);
        print_chart("Hot Songs", &week.songs, 10);
        print_chart("Top Albums", &week.albums, 5);
        println!("  Artists");
        for a in week.artists.iter().take(10) {
            let marker = if a.is_player { "*" } else { " " };
            println!(
                "  {marker}{:>3}. {} ({:.0} listeners, {})",
                a.rank,
                a.name,
                a.score,
                trend_label(a.trend)
            );
        }
    }
    Ok(())
}
