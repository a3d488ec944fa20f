//! Benchmarks for superquadric meshing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use superquad_mesher::{
    mesh_batch, MesherConfig, ParallelConfig, ShapeParameters, SuperquadricMesher,
};

fn bench_single_shape(c: &mut Criterion) {
    let shapes = [
        ("sphere", ShapeParameters::default()),
        ("cube", ShapeParameters::new([1.0, 1.0, 1.0], [0.1, 0.1, 0.1])),
        (
            "bent_taper",
            ShapeParameters::new([0.5, 0.5, 2.0], [0.8, 1.0, 1.0])
                .with_tapering([0.4, -0.2])
                .with_bending([0.3, 0.0, 0.2, 1.0, 0.0, 0.0]),
        ),
    ];
    let resolutions = [20, 40, 62];

    let mut group = c.benchmark_group("mesh_superquadric");

    for (name, base) in &shapes {
        for &resolution in &resolutions {
            let params = base.clone().with_resolution(resolution);
            group.bench_with_input(BenchmarkId::new(*name, resolution), &params, |b, params| {
                let mesher = SuperquadricMesher::default();
                b.iter(|| black_box(mesher.mesh(black_box(params))));
            });
        }
    }

    group.finish();
}

fn bench_subdivision(c: &mut Criterion) {
    let params = ShapeParameters::new([1.0, 1.0, 1.0], [0.2, 0.2, 0.2]).with_resolution(50);
    let mut group = c.benchmark_group("curvature_subdivision");

    for subdivide in [false, true] {
        let mesher = SuperquadricMesher::new(MesherConfig::default().with_subdivision(subdivide));
        group.bench_with_input(BenchmarkId::new("subdivide", subdivide), &params, |b, params| {
            b.iter(|| black_box(mesher.mesh(black_box(params))));
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let shapes: Vec<ShapeParameters> = (0..16)
        .map(|i| {
            let e = 0.2 + 0.1 * i as f64;
            ShapeParameters::new([1.0, 1.5, 2.0], [e, e, 1.0]).with_resolution(40)
        })
        .collect();
    let mesher = SuperquadricMesher::default();

    let mut group = c.benchmark_group("mesh_batch");
    group.bench_function("sequential", |b| {
        let config = ParallelConfig::sequential();
        b.iter(|| black_box(mesh_batch(&shapes, &mesher, &config).unwrap()));
    });
    group.bench_function("parallel", |b| {
        let config = ParallelConfig::default();
        b.iter(|| black_box(mesh_batch(&shapes, &mesher, &config).unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_single_shape, bench_subdivision, bench_batch);
criterion_main!(benches);
