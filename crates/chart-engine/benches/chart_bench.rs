use chart_core::{ChartConfig, PerformanceType, Song};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn build_songs(n: usize) -> Vec<Song> {
    let performances = [
        PerformanceType::Normal,
        PerformanceType::Viral,
        PerformanceType::Flop,
        PerformanceType::Comeback,
    ];
    (0..n)
        .map(|i| Song {
            id: format!("s{i}"),
            title: format!("Track {i}"),
            artist: format!("Artist {}", i % 40),
            streams: 10_000 + (i as u64 * 7_919) % 2_000_000,
            popularity: (i % 100) as f64 / 100.0,
            performance: performances[i % performances.len()],
            is_player: i == 0,
        })
        .collect()
}

fn bench_song_chart(c: &mut Criterion) {
    let songs = build_songs(1_000);
    let cfg = ChartConfig::default();
    c.bench_function("song chart 1000 candidates", |b| {
        b.iter(|| {
            let mut rng = chart_engine::seeded_rng(42);
            black_box(chart_engine::song_chart(&songs, &cfg, None, &mut rng))
        })
    });
}

fn bench_distribution(c: &mut Criterion) {
    let songs = build_songs(100);
    let cfg = ChartConfig::default();
    c.bench_function("distribute 100 songs x 8 platforms", |b| {
        b.iter(|| {
            for s in &songs {
                black_box(chart_engine::distribute_song(s, &cfg));
            }
        })
    });
}

criterion_group!(benches, bench_song_chart, bench_distribution);
criterion_main!(benches);
