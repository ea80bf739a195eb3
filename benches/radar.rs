use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use football_radar::dataset::Datasets;
use football_radar::layout::compute_layout;
use football_radar::metrics::MetricSpec;
use football_radar::radar::{self, RadarInput};
use football_radar::selection::{self, SelectionQuery};

fn synthetic_cohort(metrics: usize, players: usize) -> (Vec<MetricSpec>, Vec<Vec<f64>>) {
    let specs = (0..metrics)
        .map(|i| MetricSpec {
            id: format!("m{i}"),
            label: format!("Metric {i}"),
        })
        .collect();
    let values = (0..metrics)
        .map(|m| {
            (0..players)
                .map(|p| ((p * 7 + m * 13) % 50) as f64 / 10.0)
                .collect()
        })
        .collect();
    (specs, values)
}

fn bench_layout(c: &mut Criterion) {
    let (specs, cohort) = synthetic_cohort(12, 400);
    let focal: Vec<Option<f64>> = cohort.iter().map(|v| v.first().copied()).collect();
    c.bench_function("compute_layout_12x400", |b| {
        b.iter(|| {
            let layout = compute_layout(
                black_box("Player"),
                black_box(&specs),
                black_box(&cohort),
                black_box(&focal),
            )
            .unwrap();
            black_box(layout.len());
        })
    });
}

fn bench_compose(c: &mut Criterion) {
    let mut dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.push("tests");
    dir.push("fixtures");
    let ds = Datasets::load(&dir).expect("fixture datasets");
    let query = SelectionQuery::new("Premier League", "Arsenal", "Bukayo Saka", 5);
    let sel = selection::select(&ds, &query).expect("selection");
    let input = RadarInput::from_selection(&sel, 1);

    let mut group = c.benchmark_group("chart");
    group.sample_size(10);
    group.bench_function("compose_fixture_chart", |b| {
        b.iter(|| {
            let chart = radar::compose(black_box(&input)).unwrap();
            black_box(chart.image.width());
        })
    });
    group.finish();
}

criterion_group!(radar_benches, bench_layout, bench_compose);
criterion_main!(radar_benches);
