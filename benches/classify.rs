use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::DynamicImage;

use codescan::classify::classify;
use codescan::classify::signal::SignalStats;
use codescan::tools::synth_bar_pattern;

fn bench_signal_measure(c: &mut Criterion) {
    let img = synth_bar_pattern(640, 480, 2, 7, 42);

    c.bench_function("signal_measure_640x480", |b| {
        b.iter(|| SignalStats::measure(black_box(&img), black_box(128)))
    });
}

fn bench_classify_bars(c: &mut Criterion) {
    let img = DynamicImage::ImageLuma8(synth_bar_pattern(640, 160, 2, 7, 42));

    c.bench_function("classify_bars_640x160", |b| {
        b.iter(|| classify(black_box(&img)))
    });
}

criterion_group!(benches, bench_signal_measure, bench_classify_bars);
criterion_main!(benches);
