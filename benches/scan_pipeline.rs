use criterion::{Criterion, black_box, criterion_group, criterion_main};

use codescan::Scanner;
use codescan::tools::{blank, png_bytes, render_qr};

fn bench_scan_clean_qr(c: &mut Criterion) {
    let img = render_qr("benchmark payload", 8, 32).unwrap();
    let bytes = png_bytes(&img).unwrap();
    let scanner = Scanner::new();

    c.bench_function("scan_clean_qr", |b| {
        b.iter(|| scanner.scan(black_box(&bytes)))
    });
}

fn bench_scan_blank_worst_case(c: &mut Criterion) {
    // Nothing to find: every variant and every region runs to exhaustion.
    let bytes = png_bytes(&blank(512, 512)).unwrap();
    let scanner = Scanner::new();

    c.bench_function("scan_blank_512", |b| {
        b.iter(|| scanner.scan(black_box(&bytes)))
    });
}

criterion_group!(benches, bench_scan_clean_qr, bench_scan_blank_worst_case);
criterion_main!(benches);
