use crate::character::{Character, CharacterConfig};
use crate::vehicle::{Vehicle, VehicleConfig};
use serde::{Deserialize, Serialize};

/// Which agent the player is controlling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    #[default]
    OnFoot,
    InVehicle,
}

impl ControlMode {
    pub fn label(self) -> &'static str {
        match self {
            ControlMode::OnFoot => "on foot",
            ControlMode::InVehicle => "driving",
        }
    }
}

/// Outcome of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeTransition {
    Entered,
    Exited,
    /// The character was too far from the vehicle; nothing changed.
    TooFar { distance: f32 },
}

/// Enter / exit state machine for the vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSwitch {
    mode: ControlMode,
    enter_distance: f32,
    exit_offset: f32,
}

impl ModeSwitch {
    pub fn new(config: &VehicleConfig) -> Self {
        Self {
            mode: ControlMode::OnFoot,
            enter_distance: config.enter_distance,
            exit_offset: config.exit_offset,
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn is_driving(&self) -> bool {
        self.mode == ControlMode::InVehicle
    }

    /// Enter the vehicle if close enough, or step out of it on its left.
    ///
    /// Both directions leave the vehicle at rest. Entering hides the
    /// character; exiting puts it back on the ground facing the vehicle's
    /// heading.
    pub fn toggle(
        &mut self,
        character: &mut Character,
        vehicle: &mut Vehicle,
        character_config: &CharacterConfig,
    ) -> ModeTransition {
        match self.mode {
            ControlMode::OnFoot => {
                let distance = vehicle.distance_xz(character.position);
                if distance >= self.enter_distance {
                    tracing::debug!(distance, "vehicle out of reach");
                    return ModeTransition::TooFar { distance };
                }
                vehicle.stop();
                character.visible = false;
                character.walking = false;
                self.mode = ControlMode::InVehicle;
                tracing::info!("entered vehicle");
                ModeTransition::Entered
            }
            ControlMode::InVehicle => {
                vehicle.stop();
                let exit = vehicle.left_side(self.exit_offset);
                character.place_on_ground(exit, character_config);
                character.heading = vehicle.heading;
                character.visible = true;
                self.mode = ControlMode::OnFoot;
                tracing::info!(x = exit.x, z = exit.z, "exited vehicle");
                ModeTransition::Exited
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn setup(character_at: Vec3) -> (ModeSwitch, Character, Vehicle) {
        let config = VehicleConfig::default();
        (
            ModeSwitch::new(&config),
            Character::new(character_at, 0.0),
            Vehicle::new(Vec3::ZERO, 0.0),
        )
    }

    #[test]
    fn enter_within_reach() {
        let (mut m, mut c, mut v) = setup(Vec3::new(3.0, 0.0, 0.0));
        v.speed = 0.5;
        v.steering = -1.0;
        assert_eq!(m.toggle(&mut c, &mut v, &CharacterConfig::default()), ModeTransition::Entered);
        assert!(m.is_driving());
        assert!(!c.visible);
        assert_eq!(v.speed, 0.0);
    }

    #[test]
    fn too_far_is_a_no_op() {
        let (mut m, mut c, mut v) = setup(Vec3::new(0.0, 0.0, 8.0));
        let t = m.toggle(&mut c, &mut v, &CharacterConfig::default());
        assert_eq!(t, ModeTransition::TooFar { distance: 8.0 });
        assert_eq!(m.mode(), ControlMode::OnFoot);
        assert!(c.visible);
        assert_eq!(c.position, Vec3::new(0.0, 0.0, 8.0));
    }

    #[test]
    fn reach_is_strictly_below_enter_distance() {
        let reach = VehicleConfig::default().enter_distance;
        let (mut m, mut c, mut v) = setup(Vec3::new(reach, 0.0, 0.0));
        let t = m.toggle(&mut c, &mut v, &CharacterConfig::default());
        assert_eq!(t, ModeTransition::TooFar { distance: reach });
        assert!(!m.is_driving());

        c.position.x = reach - 0.01;
        assert_eq!(m.toggle(&mut c, &mut v, &CharacterConfig::default()), ModeTransition::Entered);
    }

    #[test]
    fn height_does_not_count_toward_reach() {
        let (mut m, mut c, mut v) = setup(Vec3::new(4.0, 3.0, 0.0));
        assert_eq!(m.toggle(&mut c, &mut v, &CharacterConfig::default()), ModeTransition::Entered);
    }

    #[test]
    fn exit_places_character_left_of_vehicle() {
        let (mut m, mut c, mut v) = setup(Vec3::new(1.0, 0.0, 1.0));
        let cc = CharacterConfig::default();
        m.toggle(&mut c, &mut v, &cc);
        v.position = Vec3::new(10.0, 0.0, 20.0);
        v.heading = std::f32::consts::FRAC_PI_2;
        v.speed = 25.0;

        assert_eq!(m.toggle(&mut c, &mut v, &cc), ModeTransition::Exited);
        assert_eq!(m.mode(), ControlMode::OnFoot);
        assert!(c.visible);
        assert_eq!(v.speed, 0.0);
        // Facing +X, left is -Z.
        assert!((c.position - Vec3::new(10.0, 0.0, 17.0)).length() < 1e-5);
        assert_eq!(c.heading, v.heading);
    }

    #[test]
    fn toggle_twice_round_trips() {
        let (mut m, mut c, mut v) = setup(Vec3::new(2.0, 0.0, 0.0));
        let cc = CharacterConfig::default();
        m.toggle(&mut c, &mut v, &cc);
        m.toggle(&mut c, &mut v, &cc);
        assert_eq!(m.mode(), ControlMode::OnFoot);
        assert!(c.visible);
        assert!(v.distance_xz(c.position) <= VehicleConfig::default().enter_distance);
        // And straight back in again.
        assert_eq!(m.toggle(&mut c, &mut v, &cc), ModeTransition::Entered);
    }
}
