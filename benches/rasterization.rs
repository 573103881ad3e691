//! Rasterization performance suite
//!
//! Measures the three hot paths of a gridding run on seeded random point
//! clouds:
//!
//! 1. Delaunay triangulation through the default engine
//! 2. Scan conversion of the triangles into a grid (value and uncertainty)
//! 3. Unique edge extraction
//!
//! Point counts are kept small enough for CI. Seeds are fixed so runs are
//! comparable across commits.

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::hint::black_box;
use trigrid::prelude::*;

/// Point counts used by every benchmark group
const COUNTS: &[usize] = &[100, 1_000, 10_000];

const SEED: u64 = 0x7219_0001;

fn random_points(count: usize, seed: u64) -> PointStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = PointStore::new(PointLayout::XYZHV);
    for _ in 0..count {
        let x = rng.random_range(0.0..100.0);
        let y = rng.random_range(0.0..100.0);
        let z = rng.random_range(-10.0..10.0);
        let h = rng.random_range(0.0..1.0);
        let v = rng.random_range(0.0..0.5);
        points
            .push(&[x, y, z, h, v])
            .expect("benchmark point store has room");
    }
    points
}

fn header() -> GridHeader {
    let region = Region::new(0.0, 100.0, 0.0, 100.0).expect("valid benchmark region");
    GridHeader::new(region, 0.25, 0.25, Registration::Gridline).expect("valid benchmark grid")
}

fn bench_triangulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulate");
    for &count in COUNTS {
        let points = random_points(count, SEED.wrapping_add(count as u64));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, points| {
            b.iter(|| DelaunatorEngine.triangulate(black_box(points)));
        });
    }
    group.finish();
}

fn bench_rasterize(c: &mut Criterion) {
    let header = header();
    let slopes = Grid::filled(header, 0.1);

    for quantity in [RasterQuantity::Value, RasterQuantity::Uncertainty] {
        let mut group = c.benchmark_group(format!("rasterize_{quantity}"));
        group.sample_size(20);
        for &count in COUNTS {
            let points = random_points(count, SEED.wrapping_add(count as u64));
            let triangles = DelaunatorEngine
                .triangulate(&points)
                .expect("random points triangulate");
            let rasterizer = TriangleRasterizer::new(&points, quantity, Some(&slopes))
                .expect("benchmark points carry every field");

            group.throughput(Throughput::Elements(triangles.len() as u64));
            group.bench_with_input(BenchmarkId::from_parameter(count), &triangles, |b, triangles| {
                b.iter(|| {
                    let mut grid = Grid::filled(header, f32::NAN);
                    rasterizer
                        .rasterize(black_box(triangles), &mut grid)
                        .expect("aligned slope grid");
                    grid
                });
            });

            #[cfg(feature = "parallel")]
            group.bench_with_input(BenchmarkId::new("parallel", count), &triangles, |b, triangles| {
                b.iter(|| {
                    let mut grid = Grid::filled(header, f32::NAN);
                    rasterizer
                        .rasterize_parallel(black_box(triangles), &mut grid)
                        .expect("aligned slope grid");
                    grid
                });
            });
        }
        group.finish();
    }
}

fn bench_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_unique_edges");
    for &count in COUNTS {
        let points = random_points(count, SEED.wrapping_add(count as u64));
        let triangles = DelaunatorEngine
            .triangulate(&points)
            .expect("random points triangulate");
        group.throughput(Throughput::Elements(triangles.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &triangles, |b, triangles| {
            b.iter(|| extract_unique_edges(black_box(triangles)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_triangulate, bench_rasterize, bench_edges);
criterion_main!(benches);
