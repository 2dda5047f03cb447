use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use geopart::algebra::Vector;
use geopart::geometry::partition::{morton_curve_partition, recursive_coord_bisection};

fn lattice(side: usize) -> Vec<Vector<f64, 2>> {
    (0..side * side)
        .map(|i| Vector::from_array([(i % side) as f64, (i / side) as f64]))
        .collect()
}

fn bench_rcb(c: &mut Criterion) {
    let mut group = c.benchmark_group("recursive_coord_bisection");
    for side in [32usize, 64, 128] {
        let points = lattice(side);
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &points, |b, points| {
            let mut parts = vec![0usize; points.len()];
            b.iter(|| recursive_coord_bisection(points, &mut parts, 8, 0));
        });
    }
    group.finish();
}

fn bench_morton_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("morton_curve_partition");
    for side in [32usize, 64, 128] {
        let points = lattice(side);
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &points, |b, points| {
            let mut parts = vec![0usize; points.len()];
            b.iter(|| morton_curve_partition(points, &mut parts, 8, 0));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rcb, bench_morton_partition);
criterion_main!(benches);
