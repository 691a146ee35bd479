use std::hint::black_box;
use std::time::Instant;

use cityloop_citygen::{CityConfig, CityLayoutGenerator};
use cityloop_kernel::{ColliderIndex, World};

fn bench_generate(city_size: u32, iterations: usize) {
    let generator = CityLayoutGenerator::new(CityConfig {
        city_size,
        seed: Some(1),
        ..CityConfig::default()
    })
    .expect("valid bench config");

    let start = Instant::now();
    let mut buildings = 0;
    for _ in 0..iterations {
        let mut rng = generator.rng();
        let layout = generator.generate(black_box(&mut rng));
        buildings = layout.buildings.len();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  generate ({city_size}x{city_size} blocks, {buildings} buildings, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_populate(city_size: u32, iterations: usize) {
    let generator = CityLayoutGenerator::new(CityConfig {
        city_size,
        seed: Some(1),
        ..CityConfig::default()
    })
    .expect("valid bench config");
    let mut rng = generator.rng();
    let layout = generator.generate(&mut rng);

    let start = Instant::now();
    for _ in 0..iterations {
        let mut world = World::new();
        let mut colliders = ColliderIndex::new();
        black_box(layout.populate(&mut world, &mut colliders));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  populate ({city_size}x{city_size} blocks, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== City Generation Benchmarks ===\n");

    println!("Layout generation:");
    bench_generate(8, 1000);
    bench_generate(32, 100);
    bench_generate(128, 10);

    println!("\nScene population:");
    bench_populate(8, 1000);
    bench_populate(32, 100);

    println!("\n=== Done ===");
}
