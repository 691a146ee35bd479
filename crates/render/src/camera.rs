use cityloop_common::wrap_angle;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CameraError {
    #[error("elevation limits must satisfy 0 < min ({min}) <= max ({max}) < pi/2")]
    ElevationLimits { min: f32, max: f32 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("near plane {near} must be closer than far plane {far}")]
    DepthRange { near: f32, far: f32 },
}

/// Third-person camera parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the look-at point.
    pub radius: f32,
    /// Starting azimuth, radians. Zero places the camera on the +Z side.
    pub azimuth: f32,
    /// Starting elevation above the horizon, radians.
    pub elevation: f32,
    pub min_elevation: f32,
    pub max_elevation: f32,
    /// Radians per pixel of pointer motion.
    pub sensitivity: f32,
    /// Look-at height above the character's feet.
    pub character_look_height: f32,
    /// Look-at height above the vehicle's origin.
    pub vehicle_look_height: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: 12.0,
            azimuth: 0.0,
            elevation: 0.35,
            min_elevation: 0.05,
            max_elevation: FRAC_PI_2 - 0.05,
            sensitivity: 0.0025,
            character_look_height: 1.6,
            vehicle_look_height: 1.0,
            fov_degrees: 60.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), CameraError> {
        let (min, max) = (self.min_elevation, self.max_elevation);
        if !(min > 0.0 && min <= max && max < FRAC_PI_2) {
            return Err(CameraError::ElevationLimits { min, max });
        }
        for (name, value) in [
            ("radius", self.radius),
            ("sensitivity", self.sensitivity),
            ("fov_degrees", self.fov_degrees),
            ("near", self.near),
        ] {
            if !(value > 0.0) {
                return Err(CameraError::NonPositive { name, value });
            }
        }
        if self.near >= self.far {
            return Err(CameraError::DepthRange {
                near: self.near,
                far: self.far,
            });
        }
        Ok(())
    }
}

fn elevation_limits(config: &CameraConfig) -> (f32, f32) {
    let (min, max) = (config.min_elevation, config.max_elevation);
    if min.is_finite() && max.is_finite() && min <= max {
        return (min, max);
    }
    let fallback = CameraConfig::default();
    tracing::warn!(min, max, "invalid elevation limits, using defaults");
    (fallback.min_elevation, fallback.max_elevation)
}

// NaN elevation lands on the lower limit.
fn clamp_elevation(elevation: f32, min: f32, max: f32) -> f32 {
    if elevation.is_nan() {
        min
    } else {
        elevation.clamp(min, max)
    }
}

/// Orbit camera around a movable target.
///
/// Holds only angles and the current target; the eye position is derived on
/// demand, so moving the target (or shifting the whole world) never leaves
/// the camera out of step.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub radius: f32,
    azimuth: f32,
    elevation: f32,
    min_elevation: f32,
    max_elevation: f32,
    sensitivity: f32,
    target: Vec3,
    look_height: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl OrbitCamera {
    /// Build from `config`. Elevation limits that fail validation fall back
    /// to the defaults so the clamp always has an ordered range.
    pub fn new(config: &CameraConfig) -> Self {
        let (min_elevation, max_elevation) = elevation_limits(config);
        Self {
            radius: config.radius,
            azimuth: wrap_angle(config.azimuth),
            elevation: clamp_elevation(config.elevation, min_elevation, max_elevation),
            min_elevation,
            max_elevation,
            sensitivity: config.sensitivity,
            target: Vec3::ZERO,
            look_height: config.character_look_height,
            fov: config.fov_degrees.to_radians(),
            aspect: 16.0 / 9.0,
            near: config.near,
            far: config.far,
        }
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Apply pointer motion in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.azimuth = wrap_angle(self.azimuth - dx * self.sensitivity);
        self.elevation = clamp_elevation(
            self.elevation + dy * self.sensitivity,
            self.min_elevation,
            self.max_elevation,
        );
    }

    /// Track a new target point with the given look-at height above it.
    pub fn follow(&mut self, target: Vec3, look_height: f32) {
        self.target = target;
        self.look_height = look_height;
    }

    pub fn look_at(&self) -> Vec3 {
        self.target + Vec3::new(0.0, self.look_height, 0.0)
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.look_at() + self.radius * Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az)
    }

    /// Viewport resize. Zero-height surfaces keep the previous aspect.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "ignoring degenerate viewport size");
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.look_at(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}
