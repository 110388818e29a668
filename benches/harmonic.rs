//! Benchmarks for the harmonic mapping pipeline.

use criterion::{criterion_group, criterion_main, Criterion};
use unfurl::prelude::*;
use nalgebra::Point3;

fn create_grid(n: usize) -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    // Create grid vertices
    for j in 0..=n {
        for i in 0..=n {
            vertices.push([i as f32, j as f32, 0.0]);
        }
    }

    // Create triangles
    for j in 0..n {
        for i in 0..n {
            let v00 = (j * (n + 1) + i) as u32;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1) as u32;
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    (vertices, faces)
}

fn bench_mesh_construction(c: &mut Criterion) {
    let (vertices, faces) = create_grid(10);
    let positions: Vec<Point3<f64>> = vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    c.bench_function("build_grid_10x10", |b| {
        b.iter(|| {
            let mesh: HalfEdgeMesh = build_from_triangles(&positions, &faces).unwrap();
            mesh
        });
    });
}

fn bench_boundary_trace(c: &mut Criterion) {
    let (vertices, faces) = create_grid(50);
    let positions: Vec<Point3<f64>> = vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();
    let mesh = build_from_triangles(&positions, &faces).unwrap();

    c.bench_function("trace_boundary_50x50", |b| {
        b.iter(|| trace_boundary(&mesh).unwrap());
    });
}

fn bench_harmonic_map(c: &mut Criterion) {
    for n in [10, 25, 50] {
        let (vertices, faces) = create_grid(n);
        c.bench_function(&format!("harmonic_map_{n}x{n}"), |b| {
            b.iter(|| harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap());
        });
    }
}

criterion_group!(
    benches,
    bench_mesh_construction,
    bench_boundary_trace,
    bench_harmonic_map
);
criterion_main!(benches);
