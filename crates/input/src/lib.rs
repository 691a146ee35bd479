//! Input: host keyboard and pointer events captured into an explicit
//! `InputState` owned by the simulation loop.
//!
//! # Invariants
//! - Simulation logic reads actions, never host key codes.
//! - Only the latest state matters; nothing is queued between ticks.

pub mod action;
pub mod state;

pub use action::{Action, Key};
pub use state::{InputState, PointerCapture};
