//! World kernel: the scene registry every subsystem reads and the collider
//! index locomotion tests against.
//!
//! # Invariants
//! - All scene mutations flow through explicit operations on `World`.
//! - Colliders are append-only; the only bulk mutation is a rigid shift.
//! - Renderers read entity records and never mutate them.

pub mod collider;
pub mod payload;
pub mod world;

pub use collider::{Aabb, ColliderIndex};
pub use payload::{EntityKind, RenderPayload};
pub use world::{EntityData, World, WorldEvent};
