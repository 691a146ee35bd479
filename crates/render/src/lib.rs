//! Rendering adapter: the camera rig plus a renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the world; they never mutate it.
//! - The camera is a pure function of its target and angles, re-derived
//!   every tick rather than carried through world shifts.
//!
//! The actual rasterizer or path tracer lives outside this workspace. The
//! `Renderer` trait is its seam; `DebugTextRenderer` is the headless stand-in.

mod camera;
mod mode;
mod renderer;

pub use camera::{CameraConfig, CameraError, OrbitCamera};
pub use mode::RenderMode;
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
