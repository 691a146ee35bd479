use std::hint::black_box;
use std::time::Instant;

use cityloop_common::{Color, Transform, WorldShift};
use cityloop_kernel::{Aabb, ColliderIndex, EntityKind, RenderPayload, World};
use cityloop_stream::WorldWrapper;
use glam::Vec3;

const CHUNK: f32 = 416.0;

fn make_scene(count: usize) -> (World, ColliderIndex) {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut world = World::new();
    let mut colliders = ColliderIndex::new();
    for _ in 0..count {
        let x = rng.f32() * CHUNK - CHUNK / 2.0;
        let z = rng.f32() * CHUNK - CHUNK / 2.0;
        world.spawn(
            EntityKind::Building,
            Transform::from_position(Vec3::new(x, 10.0, z)),
            RenderPayload::Box {
                size: Vec3::new(8.0, 20.0, 8.0),
                color: Color::WHITE,
            },
        );
        colliders.push(Aabb::from_footprint(x, z, Vec3::new(8.0, 20.0, 8.0), 0.0));
    }
    (world, colliders)
}

fn bench_check(iterations: usize) {
    let wrapper = WorldWrapper::new(CHUNK).expect("valid chunk size");
    let mut rng = fastrand::Rng::with_seed(1);

    let start = Instant::now();
    let mut wraps = 0usize;
    for _ in 0..iterations {
        let p = Vec3::new(rng.f32() * 600.0 - 300.0, 0.0, rng.f32() * 600.0 - 300.0);
        if wrapper.check(black_box(p)).is_some() {
            wraps += 1;
        }
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  check ({iterations} iters, {wraps} wraps): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_apply(count: usize, iterations: usize) {
    let (mut world, mut colliders) = make_scene(count);
    let mut wrapper = WorldWrapper::new(CHUNK).expect("valid chunk size");

    let start = Instant::now();
    for i in 0..iterations {
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        let participants: &mut [&mut dyn WorldShift] = &mut [&mut world, &mut colliders];
        wrapper.apply(black_box(Vec3::new(CHUNK * sign, 0.0, 0.0)), participants);
        world.drain_events();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  apply ({count} entities + colliders, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== World Wrap Benchmarks ===\n");

    println!("Wrap check:");
    bench_check(1_000_000);

    println!("\nWrap apply:");
    bench_apply(100, 10_000);
    bench_apply(1000, 1000);
    bench_apply(10_000, 100);

    println!("\n=== Done ===");
}
