//! Streaming for a city that tiles forever.
//!
//! # Invariants
//! - The followed agent never strays more than half a chunk from the origin.
//! - A wrap translates every positioned thing by the same offset, so
//!   relative positions are preserved exactly.
//!
//! Instead of loading and unloading cells, the whole scene is re-centered:
//! the city tiles with a period of one chunk, so a one-chunk shift is
//! invisible to the player.

mod timer;
mod wrap;

pub use timer::{TickStats, TickTimer};
pub use wrap::{ChunkCoord, WorldWrapper, WrapError};
