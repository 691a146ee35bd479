//! Shared types for the cityloop workspace: ids, transforms, colors, angle math,
//! and the `WorldShift` seam used by chunk wrapping.

pub mod math;
pub mod types;

pub use math::{heading_to_forward, lerp, wrap_angle};
pub use types::{Color, EntityId, Transform, WorldShift};
