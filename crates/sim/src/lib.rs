//! The simulation loop: one `tick` advances input handling, locomotion,
//! coins, camera, world wrapping and lighting in a fixed order.
//!
//! # Invariants
//! - Exactly one agent is controlled at a time.
//! - Scene, colliders and both agents share one origin; a wrap moves all of
//!   them together.
//! - Optional assets may be missing at any tick; nothing depends on them.

mod coins;
mod config;
mod simulation;
mod slot;

pub use coins::{CoinConfig, CoinField};
pub use config::{ConfigError, SimConfig, TimingConfig};
pub use simulation::{SimError, Simulation, TickReport};
pub use slot::{AnimationClip, AssetSlot, CharacterRig};
