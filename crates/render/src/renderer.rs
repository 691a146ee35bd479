use crate::camera::OrbitCamera;
use crate::mode::RenderMode;
use cityloop_common::Color;
use cityloop_kernel::{EntityKind, World};
use glam::Vec3;
use std::fmt::Write;

/// Everything a renderer needs besides the scene itself.
#[derive(Debug, Clone)]
pub struct RenderView {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub mode: RenderMode,
    /// Clear color; matches the fog color.
    pub background: Color,
    pub sun_position: Vec3,
    /// Overlay line drawn on top of the frame.
    pub hud: String,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
            mode: RenderMode::Raster,
            background: Color::BLACK,
            sun_position: Vec3::Y,
            hud: String::new(),
        }
    }
}

impl RenderView {
    pub fn from_camera(camera: &OrbitCamera, mode: RenderMode) -> Self {
        Self {
            eye: camera.eye(),
            target: camera.look_at(),
            fov_degrees: camera.fov.to_degrees(),
            mode,
            ..Self::default()
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads world state and a view, then produces output. It
/// never mutates the world.
pub trait Renderer {
    type Output;

    fn render(&self, world: &World, view: &RenderView) -> Self::Output;
}

/// Headless renderer producing a text summary of the frame.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// List every entity, not just per-kind counts.
    pub list_entities: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self {
            list_entities: true,
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &World, view: &RenderView) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame (tick={}, mode={}) ===",
            world.tick(),
            view.mode.label()
        );
        let _ = writeln!(out, "Entities: {}", world.entity_count());
        for kind in EntityKind::ALL {
            let n = world.count_kind(kind);
            if n > 0 {
                let _ = writeln!(out, "  {:<13} {}", kind.label(), n);
            }
        }
        let lit: f32 = world
            .iter_kind(EntityKind::StreetLight)
            .filter_map(|(_, e)| e.payload.light_intensity())
            .sum();
        let _ = writeln!(out, "Lamp output: {lit:.2}");
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );
        let [r, g, b] = view.background.to_array();
        let _ = writeln!(
            out,
            "Sky: background=({r:.2}, {g:.2}, {b:.2}) sun=({:.0}, {:.0}, {:.0})",
            view.sun_position.x, view.sun_position.y, view.sun_position.z
        );
        if !view.hud.is_empty() {
            let _ = writeln!(out, "HUD: {}", view.hud);
        }

        if self.list_entities {
            for (id, data) in world.entities() {
                if !data.visible {
                    continue;
                }
                let p = data.transform.position;
                let _ = writeln!(
                    out,
                    "  [{:.8}] {} pos=({:.2}, {:.2}, {:.2})",
                    id.0.to_string(),
                    data.kind.label(),
                    p.x,
                    p.y,
                    p.z
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityloop_common::Transform;
    use cityloop_kernel::RenderPayload;

    fn light(intensity: f32) -> RenderPayload {
        RenderPayload::PointLight {
            color: Color::WHITE,
            intensity,
            range: 10.0,
        }
    }

    #[test]
    fn empty_world() {
        let world = World::new();
        let output = DebugTextRenderer::new().render(&world, &RenderView::default());
        assert!(output.contains("tick=0"));
        assert!(output.contains("Entities: 0"));
        assert!(output.contains("mode=raster"));
    }

    #[test]
    fn counts_by_kind_and_lamp_output() {
        let mut world = World::new();
        world.spawn(EntityKind::StreetLight, Transform::default(), light(1.5));
        world.spawn(EntityKind::StreetLight, Transform::default(), light(0.5));
        world.spawn(
            EntityKind::Coin,
            Transform::from_position(Vec3::new(1.0, 2.0, 3.0)),
            RenderPayload::Coin { radius: 0.5 },
        );
        let view = RenderView {
            hud: "Coins: 0".into(),
            ..RenderView::default()
        };
        let output = DebugTextRenderer::new().render(&world, &view);
        assert!(output.contains("Entities: 3"));
        assert!(output.contains("street_light  2"));
        assert!(output.contains("Lamp output: 2.00"));
        assert!(output.contains("HUD: Coins: 0"));
        assert!(!output.contains("pos="));
    }

    #[test]
    fn verbose_lists_visible_entities() {
        let mut world = World::new();
        let shown = world.spawn(EntityKind::Vehicle, Transform::default(), light(0.0));
        let hidden = world.spawn(EntityKind::Character, Transform::default(), light(0.0));
        world.set_visible(hidden, false);
        let output = DebugTextRenderer::verbose().render(&world, &RenderView::default());
        assert!(output.contains("vehicle pos="));
        assert!(!output.contains("character pos="));
        assert!(world.get(shown).is_some());
    }

    #[test]
    fn view_from_camera() {
        let mut cam = OrbitCamera::default();
        cam.follow(Vec3::new(2.0, 0.0, 2.0), 1.0);
        let view = RenderView::from_camera(&cam, RenderMode::PathTraced);
        assert_eq!(view.target, Vec3::new(2.0, 1.0, 2.0));
        assert_eq!(view.eye, cam.eye());
        assert!((view.fov_degrees - 60.0).abs() < 1e-3);
        assert_eq!(view.mode, RenderMode::PathTraced);
    }
}
