//! Run these benches with `cargo bench --bench refresh -- --verbose`
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use metfor::{Celsius, HectoPascal, Knots};
use tephigram::{
    BarbStyle, DrawingSurface, LineStyleOverride, RecordingSurface, Tephigram, TephigramConfig,
    Viewport, WindBarbSet,
};

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(100)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(refresh_benches);

criterion_group!(
    name = refresh_benches;
    config = build_tester();
    targets = refresh_bench
);

const SOUNDING: [(f64, f64, f64, f64); 8] = [
    (1000.0, 24.0, 2.0, 135.0),
    (950.0, 20.8, 8.0, 160.0),
    (850.0, 14.4, 15.0, 200.0),
    (700.0, 2.4, 23.0, 230.0),
    (500.0, -16.9, 38.0, 250.0),
    (400.0, -29.7, 55.0, 260.0),
    (300.0, -45.1, 72.0, 265.0),
    (250.0, -53.9, 80.0, 270.0),
];

fn build_diagram() -> Tephigram<RecordingSurface> {
    let surface = RecordingSurface::new(Viewport::new((0.0, 700.0), (0.0, 700.0)));
    let mut tpg = Tephigram::new(surface, TephigramConfig::new()).unwrap();

    let pt: Vec<_> = SOUNDING
        .iter()
        .map(|&(p, t, _, _)| (HectoPascal(p), Celsius(t)))
        .collect();
    let handle = tpg.plot(&pt, &LineStyleOverride::new()).unwrap();

    let winds = SOUNDING
        .iter()
        .map(|&(p, _, s, d)| (Knots(s), d, HectoPascal(p)));
    tpg.barbs(handle, WindBarbSet::new(winds, BarbStyle::new()).unwrap())
        .unwrap();

    tpg.add_isobars().unwrap();
    tpg.add_wet_adiabats().unwrap();
    tpg.add_mixing_ratios().unwrap();
    tpg
}

fn refresh_bench(c: &mut Criterion) {
    let mut tpg = build_diagram();
    let center = tpg.surface().viewport().center();
    let close = Viewport::new(
        (center.x - 10.0, center.x + 10.0),
        (center.y - 10.0, center.y + 10.0),
    );

    // Zooming in toggles every group and replaces the grid lines. A fresh diagram each pass keeps
    // the recording surface from growing.
    c.bench_function("refresh_zoom_in", |b| {
        b.iter_batched(
            build_diagram,
            |mut tpg| criterion::black_box(tpg.set_viewport(close)),
            BatchSize::LargeInput,
        );
    });

    c.bench_function("refresh_steady", |b| {
        b.iter(|| criterion::black_box(tpg.refresh()));
    });
}
