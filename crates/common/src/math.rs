use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Wrap an angle difference into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Ground-plane forward vector for a yaw angle. Heading 0 faces +Z,
/// positive headings turn toward +X.
pub fn heading_to_forward(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}
