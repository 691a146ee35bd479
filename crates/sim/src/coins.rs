use cityloop_citygen::CityGrid;
use cityloop_common::{EntityId, Transform};
use cityloop_kernel::{EntityKind, RenderPayload, World};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinConfig {
    pub count: u32,
    /// Horizontal distance at which the active agent collects a coin.
    pub pickup_radius: f32,
    /// Spin speed, radians per second.
    pub spin_rate: f32,
    /// Height of the coin centers above the street.
    pub height: f32,
    pub radius: f32,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            count: 30,
            pickup_radius: 1.5,
            spin_rate: 2.0,
            height: 1.0,
            radius: 0.5,
        }
    }
}

/// Collectible coins scattered over the streets.
///
/// Coins live in the `World` like any other entity, so chunk wrapping moves
/// them for free; the field only remembers which ids are still out there.
#[derive(Debug, Clone)]
pub struct CoinField {
    config: CoinConfig,
    remaining: Vec<EntityId>,
    total: u32,
    collected: u32,
    spin: f32,
}

impl CoinField {
    /// Spawn `config.count` coins on random street points.
    pub fn scatter(
        config: CoinConfig,
        grid: &CityGrid,
        rng: &mut fastrand::Rng,
        world: &mut World,
    ) -> Self {
        let mut remaining = Vec::with_capacity(config.count as usize);
        for _ in 0..config.count {
            let p = grid.random_street_point(rng);
            let id = world.spawn(
                EntityKind::Coin,
                Transform::from_position(Vec3::new(p.x, config.height, p.z)),
                RenderPayload::Coin {
                    radius: config.radius,
                },
            );
            remaining.push(id);
        }
        tracing::debug!(count = config.count, "coins scattered");
        Self {
            total: config.count,
            config,
            remaining,
            collected: 0,
            spin: 0.0,
        }
    }

    pub fn collected(&self) -> u32 {
        self.collected
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Counter line for the on-screen overlay.
    pub fn hud_text(&self) -> String {
        format!("Coins: {} / {}", self.collected, self.total)
    }

    /// Spin every coin and collect those within reach of `agent`.
    /// Returns how many were picked up this tick.
    pub fn update(&mut self, world: &mut World, agent: Vec3, dt: f32) -> u32 {
        self.spin = (self.spin + self.config.spin_rate * dt).rem_euclid(std::f32::consts::TAU);
        let reach_sq = self.config.pickup_radius * self.config.pickup_radius;
        let mut picked = 0;
        let spin = self.spin;

        self.remaining.retain(|id| {
            let Some(data) = world.get_mut(*id) else {
                return false;
            };
            let d = data.transform.position - agent;
            if d.x * d.x + d.z * d.z <= reach_sq {
                world.despawn(*id);
                picked += 1;
                return false;
            }
            data.transform = Transform::from_position_yaw(data.transform.position, spin);
            true
        });

        if picked > 0 {
            self.collected += picked;
            tracing::info!(
                collected = self.collected,
                total = self.total,
                "coin collected"
            );
        }
        picked
    }
}
