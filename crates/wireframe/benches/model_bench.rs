//! Criterion benchmarks for the model's uniqueness checks.
//! Focus sizes: n in {10, 100, 1000} elements.
//! The insert path is O(n) per element (scan) and O(P!) per comparison.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use wireframe::{Face, Model, Point};

fn random_point(rng: &mut StdRng) -> Point<3> {
    Point::new([
        rng.gen_range(-10.0..10.0),
        rng.gen_range(-10.0..10.0),
        rng.gen_range(-10.0..10.0),
    ])
}

fn random_model(n: usize, seed: u64) -> Model<3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut model = Model::new("bench");
    while model.faces().len() < n {
        let (a, b, c) = (
            random_point(&mut rng),
            random_point(&mut rng),
            random_point(&mut rng),
        );
        // Rejections (coincident or duplicate) are simply redrawn.
        let _ = model.add_face(a, b, c);
        let _ = model.add_line(a, b);
    }
    model
}

fn bench_model(c: &mut Criterion) {
    let mut group = c.benchmark_group("model");
    for &n in &[10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("add_face_scan", n), &n, |b, &n| {
            let mut rng = StdRng::seed_from_u64(91);
            b.iter_batched(
                || (random_model(n, 90), random_point(&mut rng)),
                |(mut model, p)| {
                    let _ = model.add_face(p, Point::new([11.0, 0.0, 0.0]), Point::new([0.0, 11.0, 0.0]));
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("collect_points", n), &n, |b, &n| {
            let model = random_model(n, 92);
            b.iter(|| model.collect_points().len())
        });

        group.bench_with_input(BenchmarkId::new("statistics", n), &n, |b, &n| {
            let model = random_model(n, 93);
            b.iter(|| model.statistics())
        });
    }
    group.finish();

    c.bench_function("face_is_same_reversed", |b| {
        let mut rng = StdRng::seed_from_u64(94);
        let pts = [
            random_point(&mut rng),
            random_point(&mut rng),
            random_point(&mut rng),
        ];
        let f1 = Face::from_points(pts).unwrap();
        let f2 = Face::from_points([pts[2], pts[1], pts[0]]).unwrap();
        b.iter(|| f1.is_same(&f2))
    });
}

criterion_group!(benches, bench_model);
criterion_main!(benches);
