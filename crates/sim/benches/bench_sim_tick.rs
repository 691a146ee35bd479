use std::hint::black_box;
use std::time::Instant;

use cityloop_input::{InputState, Key};
use cityloop_sim::{SimConfig, Simulation};

const DT: f32 = 1.0 / 60.0;

fn build(city_size: u32) -> Simulation {
    let mut config = SimConfig::default();
    config.city.city_size = city_size;
    config.city.seed = Some(42);
    Simulation::new(config).expect("default config is valid")
}

fn bench_tick(label: &str, city_size: u32, keys: &[Key], ticks: usize) {
    let mut sim = build(city_size);
    let mut input = InputState::new();
    for key in keys {
        input.key_down(*key);
        sim.tick(&mut input, DT);
    }

    let start = Instant::now();
    for _ in 0..ticks {
        black_box(sim.tick(&mut input, black_box(DT)));
    }
    let elapsed = start.elapsed();
    let per_tick = elapsed / ticks as u32;
    println!(
        "  {label} (city {city_size}, {} entities, {ticks} ticks): {per_tick:?}/tick, {} wraps",
        sim.world().entity_count(),
        sim.wrapper().wrap_count()
    );
}

fn main() {
    println!("=== Simulation Tick Benchmarks ===\n");

    println!("Idle:");
    bench_tick("idle", 8, &[], 10_000);

    println!("\nWalking:");
    bench_tick("walk", 8, &[Key::KeyW], 10_000);
    bench_tick("walk", 16, &[Key::KeyW], 5_000);

    println!("\nDriving:");
    bench_tick("drive", 8, &[Key::KeyE, Key::KeyW], 10_000);

    println!("\n=== Done ===");
}
