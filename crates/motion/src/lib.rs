//! Locomotion: the on-foot character, the drivable vehicle, and the state
//! machine that hands control between them.
//!
//! # Invariants
//! - Exactly one agent is controlled per tick; the other is parked or hidden.
//! - A move is committed only if its candidate position is collision-free.
//! - Integration uses the frame's `dt` directly; there is no fixed step.

pub mod character;
pub mod mode;
pub mod vehicle;

pub use character::{Character, CharacterConfig, CharacterStep};
pub use mode::{ControlMode, ModeSwitch, ModeTransition};
pub use vehicle::{Vehicle, VehicleConfig, VehicleControls, VehicleStep};
