//! City generation: a street lattice with buildings, street lights and props
//! scattered over its blocks.
//!
//! # Invariants
//! - Every building's collider is derived from the same numbers as its
//!   rendered box, so the two always agree.
//! - Buildings stay inside their block interior shrunk by the padding;
//!   nothing collidable ever touches a street.
//! - Randomness comes from an injected `fastrand::Rng`; a seed makes a
//!   generation pass reproducible, no seed means entropy.

mod config;
mod grid;
mod layout;

pub use config::{CityConfig, LayoutError};
pub use grid::{CellKind, CityGrid, GridCell, StreetAxis};
pub use layout::{Building, CityLayout, CityLayoutGenerator, PopulateStats, Prop, StreetRect};
