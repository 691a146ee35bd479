use cityloop_common::{Transform, WorldShift, wrap_angle};
use cityloop_input::{Action, InputState};
use cityloop_kernel::ColliderIndex;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// On-foot movement parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Walking speed in units per second.
    pub move_speed: f32,
    /// Rate at which the facing angle eases toward the movement direction.
    pub turn_smoothing: f32,
    /// Initial upward velocity of a jump.
    pub jump_velocity: f32,
    pub gravity: f32,
    /// Ground height for the character's feet.
    pub feet_y: f32,
    /// Below this height the character is considered lost and respawned.
    pub fall_limit: f32,
    /// Height the character is dropped from when respawned.
    pub respawn_height: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            move_speed: 10.0,
            turn_smoothing: 10.0,
            jump_velocity: 9.0,
            gravity: 25.0,
            feet_y: 0.0,
            fall_limit: -50.0,
            respawn_height: 5.0,
        }
    }
}

/// What happened during one on-foot update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterStep {
    pub moved: bool,
    /// Movement was requested but the candidate position collided.
    pub blocked: bool,
    pub jumped: bool,
    pub landed: bool,
    pub respawned: bool,
}

/// The on-foot agent. `position` is at the feet.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub position: Vec3,
    /// Facing angle about +Y; 0 faces +Z.
    pub heading: f32,
    pub velocity_y: f32,
    pub grounded: bool,
    /// Hidden while riding in the vehicle.
    pub visible: bool,
    /// Whether horizontal input was applied on the last update.
    pub walking: bool,
}

impl Character {
    pub fn new(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            heading,
            velocity_y: 0.0,
            grounded: true,
            visible: true,
            walking: false,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_position_yaw(self.position, self.heading)
    }

    /// Put the character on the ground at `position` (XZ), standing still.
    pub fn place_on_ground(&mut self, position: Vec3, config: &CharacterConfig) {
        self.position = Vec3::new(position.x, config.feet_y, position.z);
        self.velocity_y = 0.0;
        self.grounded = true;
        self.walking = false;
    }

    /// Camera-relative movement direction on the ground plane, unit length or
    /// zero. "Forward" points away from a camera orbiting at `camera_azimuth`.
    pub fn move_direction(input: &InputState, camera_azimuth: f32) -> Vec3 {
        let (sin, cos) = camera_azimuth.sin_cos();
        let forward = Vec3::new(-sin, 0.0, -cos);
        let right = Vec3::new(cos, 0.0, -sin);
        let dir = forward * input.forward_axis() + right * input.strafe_axis();
        dir.normalize_or_zero()
    }

    /// Advance one tick of on-foot control.
    ///
    /// `respawn_at` is used only if the character has fallen below the
    /// configured limit; the sim passes a point beside the vehicle.
    pub fn update(
        &mut self,
        config: &CharacterConfig,
        input: &InputState,
        camera_azimuth: f32,
        colliders: &ColliderIndex,
        respawn_at: Vec3,
        dt: f32,
    ) -> CharacterStep {
        let mut step = CharacterStep::default();

        let dir = Self::move_direction(input, camera_azimuth);
        self.walking = dir != Vec3::ZERO;
        if self.walking {
            let candidate = self.position + dir * config.move_speed * dt;
            if colliders.query(candidate) {
                step.blocked = true;
            } else {
                self.position.x = candidate.x;
                self.position.z = candidate.z;
                step.moved = true;
            }

            let target = dir.x.atan2(dir.z);
            let delta = wrap_angle(target - self.heading);
            self.heading = wrap_angle(self.heading + delta * config.turn_smoothing * dt);
        }

        if self.position.y < config.fall_limit {
            tracing::warn!(y = self.position.y, "character fell out of the world, respawning");
            self.position = Vec3::new(respawn_at.x, config.respawn_height, respawn_at.z);
            self.velocity_y = 0.0;
            self.grounded = false;
            step.respawned = true;
            return step;
        }

        if input.just_pressed(Action::Jump) && self.grounded {
            self.velocity_y = config.jump_velocity;
            self.grounded = false;
            step.jumped = true;
        }

        if !self.grounded {
            self.position.y += self.velocity_y * dt;
            self.velocity_y -= config.gravity * dt;
            if self.position.y <= config.feet_y {
                self.position.y = config.feet_y;
                self.velocity_y = 0.0;
                self.grounded = true;
                step.landed = true;
            }
        }

        step
    }
}

impl WorldShift for Character {
    fn shift(&mut self, offset: Vec3) {
        self.position += offset;
    }
}
