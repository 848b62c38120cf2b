use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use bandpulse_audio::{
    config::AnalyzerConfig, fetcher::DummyFetcher, AudioAnalyser, SpectrumReducer,
};

fn benchmark(c: &mut Criterion) {
    let reducer = SpectrumReducer::default();
    let spectrum: Vec<f32> = (0..512).map(|i| (i as f32 * 0.37).sin().abs()).collect();

    c.bench_function("reduce", |b| {
        b.iter(|| reducer.reduce(black_box(&spectrum)).unwrap())
    });

    let mut analyser = AudioAnalyser::new(DummyFetcher::new(), AnalyzerConfig::default()).unwrap();
    c.bench_function("on_tick", |b| b.iter(|| analyser.on_tick().unwrap().amplitude));
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
