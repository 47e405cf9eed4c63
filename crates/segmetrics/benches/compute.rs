use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use segmetrics::core::PixelBuffer;
use segmetrics::{HausdorffMethod, MetricsConfig, MetricsEngine};

const SIZE: usize = 512;

fn ring(cx: f64, cy: f64, r0: f64, r1: f64, inside: u8, outside: u8) -> PixelBuffer {
    PixelBuffer::from_fn(SIZE, SIZE, |x, y| {
        let d = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
        if (r0..=r1).contains(&d) {
            inside
        } else {
            outside
        }
    })
    .expect("ring")
}

fn bench_compute(c: &mut Criterion) {
    let original = ring(256.0, 256.0, 60.0, 180.0, 190, 40);
    let candidate = ring(258.0, 255.0, 62.0, 178.0, 255, 0);
    let truth = ring(256.0, 256.0, 60.0, 180.0, 255, 0);

    let mut group = c.benchmark_group("compute_512");
    group.sample_size(20);
    group.bench_function("no_ground_truth", |b| {
        let engine = MetricsEngine::default();
        b.iter(|| {
            engine
                .compute(black_box(&original.view()), black_box(&candidate.view()), None)
                .expect("metrics")
        })
    });
    for method in [HausdorffMethod::BruteForce, HausdorffMethod::KdTree] {
        let engine = MetricsEngine::new(MetricsConfig::default().with_hausdorff(method));
        group.bench_with_input(
            BenchmarkId::new("ground_truth", format!("{method:?}")),
            &method,
            |b, _| {
                b.iter(|| {
                    engine
                        .compute(
                            black_box(&original.view()),
                            black_box(&candidate.view()),
                            Some(&truth.view()),
                        )
                        .expect("metrics")
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_compute);
criterion_main!(benches);
