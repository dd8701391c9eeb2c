use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lumengrid::config::{PlaneConfig, SphereConfig};
use lumengrid::field::normalize;
use lumengrid::screen::Resolution;

const SIDES: [usize; 3] = [200, 400, 800];

fn benchmark_planar(c: &mut Criterion) {
    let mut group = c.benchmark_group("planar_illumination");

    for side in SIDES {
        let mut scene = PlaneConfig::default()
            .validate()
            .expect("default plane config is valid");
        scene.resolution = Resolution::new(side, side);

        group.bench_with_input(BenchmarkId::from_parameter(side), &scene, |b, scene| {
            b.iter(|| black_box(scene).compute().unwrap());
        });
    }

    group.finish();
}

fn benchmark_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("sphere_shading");
    group.sample_size(20);

    for side in SIDES {
        let mut scene = SphereConfig::default()
            .validate()
            .expect("default sphere config is valid");
        scene.resolution = Resolution::new(side, side);

        group.bench_with_input(BenchmarkId::from_parameter(side), &scene, |b, scene| {
            b.iter(|| black_box(scene).compute().unwrap());
        });
    }

    group.finish();
}

fn benchmark_normalize(c: &mut Criterion) {
    let field = PlaneConfig::default()
        .validate()
        .and_then(|scene| scene.compute())
        .expect("default plane renders");

    c.bench_function("normalize_default_plane", |b| {
        b.iter(|| normalize(black_box(&field)));
    });
}

criterion_group!(benches, benchmark_planar, benchmark_sphere, benchmark_normalize);
criterion_main!(benches);
