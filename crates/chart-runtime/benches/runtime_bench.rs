use chart_core::ChartConfig;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_weeks(c: &mut Criterion) {
    let roster = chart_runtime::generate_roster(42, 200, "Lil Rookie");
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    c.bench_function("chart 200 artists x 52 weeks", |b| {
        b.iter(|| {
            let mut world =
                chart_runtime::init_world(roster.clone(), ChartConfig::default(), 42, start);
            black_box(chart_runtime::run_weeks(&mut world, 52))
        })
    });
}

fn bench_week(c: &mut Criterion) {
    let roster = chart_runtime::generate_roster(7, 200, "Lil Rookie");
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let mut world = chart_runtime::init_world(roster, ChartConfig::default(), 7, start);
    let mut schedule = chart_runtime::chart_schedule();
    c.bench_function("chart_week", |b| {
        b.iter(|| {
            schedule.run(&mut world);
        })
    });
}

criterion_group!(benches, bench_weeks, bench_week);
criterion_main!(benches);
