use cityloop_common::{Transform, WorldShift, heading_to_forward, wrap_angle};
use cityloop_input::InputState;
use cityloop_kernel::ColliderIndex;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Driving parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub max_speed: f32,
    /// Most negative speed allowed; must be <= 0.
    pub reverse_max_speed: f32,
    pub acceleration: f32,
    /// Coasting deceleration toward rest when there is no throttle.
    pub deceleration: f32,
    /// Coasting speeds below this snap to exactly zero.
    pub stop_epsilon: f32,
    /// Distance between axles, used for the turn radius.
    pub wheel_base: f32,
    /// Steering angle at full lock, in radians.
    pub max_steering_angle: f32,
    pub wheel_radius: f32,
    /// Furthest the character may stand from the vehicle and still enter it.
    pub enter_distance: f32,
    /// How far to the vehicle's left the character is placed on exit.
    pub exit_offset: f32,
    pub ground_y: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_speed: 40.0,
            reverse_max_speed: -12.0,
            acceleration: 15.0,
            deceleration: 10.0,
            stop_epsilon: 0.05,
            wheel_base: 2.6,
            max_steering_angle: 0.5,
            wheel_radius: 0.4,
            enter_distance: 5.0,
            exit_offset: 3.0,
            ground_y: 0.0,
        }
    }
}

/// Driver intent for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleControls {
    /// +1 accelerate forward, -1 brake / reverse, 0 coast.
    pub throttle: f32,
    /// +1 full left, -1 full right.
    pub steering: f32,
}

impl VehicleControls {
    pub fn from_input(input: &InputState) -> Self {
        Self {
            throttle: input.forward_axis(),
            steering: -input.strafe_axis(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleStep {
    /// The candidate position hit a collider; the vehicle stopped dead.
    pub collided: bool,
    /// Heading change applied this tick.
    pub turned: f32,
}

/// The drivable car. Uses a bicycle model: heading changes at
/// `speed / turn_radius`, with `turn_radius = wheel_base / sin(steer_angle)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub position: Vec3,
    pub heading: f32,
    pub speed: f32,
    /// Last steering input in `[-1, 1]`.
    pub steering: f32,
    /// Accumulated wheel spin, radians.
    pub wheel_roll: f32,
    /// Visual yaw of the front wheels relative to the body.
    pub front_wheel_yaw: f32,
}

impl Vehicle {
    pub fn new(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            heading,
            speed: 0.0,
            steering: 0.0,
            wheel_roll: 0.0,
            front_wheel_yaw: 0.0,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_position_yaw(self.position, self.heading)
    }

    pub fn forward(&self) -> Vec3 {
        heading_to_forward(self.heading)
    }

    /// Point `distance` units to the vehicle's left, at its height.
    pub fn left_side(&self, distance: f32) -> Vec3 {
        let (sin, cos) = self.heading.sin_cos();
        self.position + Vec3::new(cos, 0.0, -sin) * distance
    }

    /// Horizontal distance to `point`.
    pub fn distance_xz(&self, point: Vec3) -> f32 {
        let d = point - self.position;
        (d.x * d.x + d.z * d.z).sqrt()
    }

    /// Bring the vehicle to rest without moving it.
    pub fn stop(&mut self) {
        self.speed = 0.0;
        self.steering = 0.0;
        self.front_wheel_yaw = 0.0;
    }

    fn integrate_speed(&mut self, config: &VehicleConfig, throttle: f32, dt: f32) {
        if throttle != 0.0 {
            self.speed += throttle * config.acceleration * dt;
        } else {
            let brake = config.deceleration * dt;
            if self.speed > 0.0 {
                self.speed = (self.speed - brake).max(0.0);
            } else if self.speed < 0.0 {
                self.speed = (self.speed + brake).min(0.0);
            }
            if self.speed.abs() < config.stop_epsilon {
                self.speed = 0.0;
            }
        }
        self.speed = self
            .speed
            .clamp(config.reverse_max_speed, config.max_speed);
    }

    /// Advance one tick of driving.
    pub fn update(
        &mut self,
        config: &VehicleConfig,
        controls: VehicleControls,
        colliders: &ColliderIndex,
        dt: f32,
    ) -> VehicleStep {
        let mut step = VehicleStep::default();
        self.integrate_speed(config, controls.throttle.clamp(-1.0, 1.0), dt);

        self.steering = controls.steering.clamp(-1.0, 1.0);
        let steer_angle = self.steering * config.max_steering_angle;
        self.front_wheel_yaw = steer_angle;
        let sin = steer_angle.sin();
        if self.speed != 0.0 && sin != 0.0 {
            let turn_radius = config.wheel_base / sin;
            let turned = self.speed / turn_radius * dt;
            self.heading = wrap_angle(self.heading + turned);
            step.turned = turned;
        }

        let candidate = self.position + self.forward() * self.speed * dt;
        if self.speed != 0.0 && colliders.query(candidate) {
            tracing::debug!(speed = self.speed, "vehicle hit a building");
            self.speed = 0.0;
            step.collided = true;
        } else {
            let travelled = self.speed * dt;
            self.position = candidate;
            self.wheel_roll =
                (self.wheel_roll + travelled / (TAU * config.wheel_radius) * TAU).rem_euclid(TAU);
        }
        self.position.y = config.ground_y;
        step
    }
}

impl WorldShift for Vehicle {
    fn shift(&mut self, offset: Vec3) {
        self.position += offset;
    }
}
