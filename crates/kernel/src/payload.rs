use cityloop_common::Color;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// What an entity is, independent of how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Ground,
    Street,
    Building,
    StreetLight,
    Prop,
    Coin,
    Character,
    Vehicle,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Ground,
        EntityKind::Street,
        EntityKind::Building,
        EntityKind::StreetLight,
        EntityKind::Prop,
        EntityKind::Coin,
        EntityKind::Character,
        EntityKind::Vehicle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Ground => "ground",
            EntityKind::Street => "street",
            EntityKind::Building => "building",
            EntityKind::StreetLight => "street_light",
            EntityKind::Prop => "prop",
            EntityKind::Coin => "coin",
            EntityKind::Character => "character",
            EntityKind::Vehicle => "vehicle",
        }
    }
}

/// Renderer-facing description of an entity. The simulation writes these;
/// the rendering collaborator turns them into meshes, materials and lights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderPayload {
    /// Axis-aligned box centered on the transform position.
    Box { size: Vec3, color: Color },
    /// Flat rectangle in the XZ plane.
    Plane { size: Vec2, color: Color },
    Sphere {
        radius: f32,
        color: Color,
        reflective: bool,
    },
    PointLight {
        color: Color,
        intensity: f32,
        range: f32,
    },
    /// Externally loaded model, referenced by asset key.
    Model { asset: String },
    Coin { radius: f32 },
}

impl RenderPayload {
    /// Current light intensity, if this payload is a light.
    pub fn light_intensity(&self) -> Option<f32> {
        match self {
            RenderPayload::PointLight { intensity, .. } => Some(*intensity),
            _ => None,
        }
    }

    /// Set the intensity of a light payload. Returns false for non-lights.
    pub fn set_light_intensity(&mut self, value: f32) -> bool {
        match self {
            RenderPayload::PointLight { intensity, .. } => {
                *intensity = value;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_intensity_only_on_lights() {
        let mut light = RenderPayload::PointLight {
            color: Color::WHITE,
            intensity: 0.0,
            range: 20.0,
        };
        assert!(light.set_light_intensity(2.5));
        assert_eq!(light.light_intensity(), Some(2.5));

        let mut boxed = RenderPayload::Box {
            size: Vec3::ONE,
            color: Color::WHITE,
        };
        assert!(!boxed.set_light_intensity(1.0));
        assert_eq!(boxed.light_intensity(), None);
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<&str> = EntityKind::ALL.iter().map(|k| k.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), EntityKind::ALL.len());
    }
}
