use cityloop_common::WorldShift;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box. Invariant: `min <= max` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Build from two arbitrary corners; the result is always well-formed.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box standing on `base_y` with the given center (XZ) and full size.
    pub fn from_footprint(center_x: f32, center_z: f32, size: Vec3, base_y: f32) -> Self {
        let half = Vec3::new(size.x * 0.5, 0.0, size.z * 0.5);
        let center = Vec3::new(center_x, base_y, center_z);
        Self::from_corners(
            center - half,
            center + half + Vec3::new(0.0, size.y, 0.0),
        )
    }

    pub fn is_well_formed(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// Horizontal containment test, inclusive on the bounds. Height is ignored:
    /// agents are ground-level, so a footprint test is sufficient.
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// Flat, append-only list of building colliders.
///
/// Linear scan is fine at city scale (a few hundred boxes); the list is
/// only ever shifted in bulk by the chunk wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColliderIndex {
    boxes: Vec<Aabb>,
}

impl ColliderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a collider. Returns its index.
    pub fn push(&mut self, aabb: Aabb) -> usize {
        debug_assert!(aabb.is_well_formed(), "collider min must be <= max");
        self.boxes.push(aabb);
        self.boxes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Aabb> {
        self.boxes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aabb> {
        self.boxes.iter()
    }

    /// True if the point's horizontal projection lies inside any collider.
    pub fn query(&self, point: Vec3) -> bool {
        self.boxes.iter().any(|b| b.contains_xz(point))
    }

    /// Shift every collider by `(dx, 0, dz)` in place.
    pub fn translate_all(&mut self, dx: f32, dz: f32) {
        let offset = Vec3::new(dx, 0.0, dz);
        for b in &mut self.boxes {
            b.min += offset;
            b.max += offset;
        }
        tracing::trace!(dx, dz, count = self.boxes.len(), "colliders translated");
    }
}

impl WorldShift for ColliderIndex {
    fn shift(&mut self, offset: Vec3) {
        self.translate_all(offset.x, offset.z);
    }
}
