use std::hint::black_box;
use std::time::Instant;

use cityloop_kernel::{Aabb, ColliderIndex};
use glam::Vec3;

fn make_index(count: usize, spacing: f32) -> ColliderIndex {
    let mut index = ColliderIndex::new();
    let side = (count as f32).sqrt().ceil() as usize;
    for i in 0..count {
        let x = (i % side) as f32 * spacing;
        let z = (i / side) as f32 * spacing;
        index.push(Aabb::from_footprint(x, z, Vec3::new(8.0, 30.0, 8.0), 0.0));
    }
    index
}

fn bench_query(count: usize, iterations: usize) {
    let index = make_index(count, 20.0);
    let mut rng = fastrand::Rng::with_seed(7);
    let extent = (count as f32).sqrt() * 20.0;

    let start = Instant::now();
    let mut hits = 0usize;
    for _ in 0..iterations {
        let p = Vec3::new(rng.f32() * extent, 0.0, rng.f32() * extent);
        if index.query(black_box(p)) {
            hits += 1;
        }
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  query ({count} colliders, {iterations} iters, {hits} hits): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_translate(count: usize, iterations: usize) {
    let mut index = make_index(count, 20.0);

    let start = Instant::now();
    for i in 0..iterations {
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        index.translate_all(black_box(416.0 * sign), black_box(0.0));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  translate_all ({count} colliders, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Collider Index Benchmarks ===\n");

    println!("Point query:");
    bench_query(100, 100_000);
    bench_query(1000, 10_000);
    bench_query(10_000, 1000);

    println!("\nBulk translate:");
    bench_translate(100, 10_000);
    bench_translate(1000, 1000);
    bench_translate(10_000, 100);

    println!("\n=== Done ===");
}
