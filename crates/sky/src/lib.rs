//! Day/night lighting.
//!
//! Lighting is a pure function of the cycle phase: a short keyframe table is
//! interpolated piecewise-linearly, and the sun sweeps a circle independent
//! of the table. Street lamps ease toward on or off based on sun intensity.

mod cycle;
mod lamps;

pub use cycle::{CycleError, DayNightCycle, Keyframe, LightingState, SkyConfig, default_keyframes};
pub use lamps::{LampConfig, LampDimmer};
