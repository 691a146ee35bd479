use cityloop_common::WorldShift;
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WrapError {
    #[error("chunk size must be positive and finite, got {0}")]
    BadChunkSize(f32),
}

/// Which virtual copy of the city the player is standing in.
///
/// The scene itself always sits around the origin; this counts the chunks
/// crossed in each direction since the start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Keeps a followed point within half a chunk of the origin by shifting the
/// whole scene back when it leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldWrapper {
    chunk_size: f32,
    chunk: ChunkCoord,
    wrap_count: u64,
}

impl WorldWrapper {
    pub fn new(chunk_size: f32) -> Result<Self, WrapError> {
        if !(chunk_size > 0.0 && chunk_size.is_finite()) {
            return Err(WrapError::BadChunkSize(chunk_size));
        }
        Ok(Self {
            chunk_size,
            chunk: ChunkCoord::default(),
            wrap_count: 0,
        })
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    /// Virtual chunk the followed point is in.
    pub fn chunk(&self) -> ChunkCoord {
        self.chunk
    }

    /// Number of wraps applied so far.
    pub fn wrap_count(&self) -> u64 {
        self.wrap_count
    }

    fn axis_offset(&self, coord: f32) -> f32 {
        if coord.abs() > self.chunk_size * 0.5 {
            -self.chunk_size * (coord / self.chunk_size).round()
        } else {
            0.0
        }
    }

    /// Offset that would bring `target` back within half a chunk of the
    /// origin, or `None` when it is already there. Y is never wrapped.
    pub fn check(&self, target: Vec3) -> Option<Vec3> {
        let offset = Vec3::new(self.axis_offset(target.x), 0.0, self.axis_offset(target.z));
        (offset != Vec3::ZERO).then_some(offset)
    }

    /// Shift every participant by `offset` and advance the chunk counter.
    pub fn apply(&mut self, offset: Vec3, participants: &mut [&mut dyn WorldShift]) {
        for p in participants.iter_mut() {
            p.shift(offset);
        }
        let chunks_x = -(offset.x / self.chunk_size).round() as i32;
        let chunks_z = -(offset.z / self.chunk_size).round() as i32;
        self.chunk.x += chunks_x;
        self.chunk.z += chunks_z;
        self.wrap_count += 1;
        tracing::debug!(
            dx = offset.x,
            dz = offset.z,
            chunk_x = self.chunk.x,
            chunk_z = self.chunk.z,
            "world wrapped"
        );
    }

    /// `check` then `apply`. Returns the offset applied, if any.
    pub fn wrap(
        &mut self,
        target: Vec3,
        participants: &mut [&mut dyn WorldShift],
    ) -> Option<Vec3> {
        let offset = self.check(target)?;
        self.apply(offset, participants);
        Some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityloop_common::{Color, Transform};
    use cityloop_kernel::{Aabb, ColliderIndex, EntityKind, RenderPayload, World};

    const CHUNK: f32 = 416.0;

    struct Point(Vec3);

    impl WorldShift for Point {
        fn shift(&mut self, offset: Vec3) {
            self.0 += offset;
        }
    }

    #[test]
    fn rejects_bad_chunk_size() {
        assert_eq!(WorldWrapper::new(0.0), Err(WrapError::BadChunkSize(0.0)));
        assert!(WorldWrapper::new(f32::NAN).is_err());
        assert!(WorldWrapper::new(-3.0).is_err());
    }

    #[test]
    fn no_wrap_inside_the_chunk() {
        let w = WorldWrapper::new(CHUNK).unwrap();
        assert_eq!(w.check(Vec3::ZERO), None);
        assert_eq!(w.check(Vec3::new(208.0, 50.0, -208.0)), None);
    }

    #[test]
    fn wraps_one_chunk_per_axis() {
        let w = WorldWrapper::new(CHUNK).unwrap();
        assert_eq!(w.check(Vec3::new(209.0, 0.0, 0.0)), Some(Vec3::new(-CHUNK, 0.0, 0.0)));
        assert_eq!(w.check(Vec3::new(0.0, 0.0, -209.0)), Some(Vec3::new(0.0, 0.0, CHUNK)));
        assert_eq!(
            w.check(Vec3::new(300.0, 7.0, -300.0)),
            Some(Vec3::new(-CHUNK, 0.0, CHUNK))
        );
    }

    #[test]
    fn large_overshoot_lands_in_bounds() {
        let mut w = WorldWrapper::new(CHUNK).unwrap();
        let mut p = Point(Vec3::new(1300.0, 0.0, -900.0));
        w.wrap(p.0, &mut [&mut p]);
        assert!(p.0.x.abs() <= CHUNK / 2.0);
        assert!(p.0.z.abs() <= CHUNK / 2.0);
        assert_eq!(w.chunk(), ChunkCoord::new(3, -2));
        assert_eq!(w.wrap_count(), 1);
    }

    #[test]
    fn apply_is_rigid_across_participants() {
        let mut rng = fastrand::Rng::with_seed(11);
        let mut world = World::new();
        let mut colliders = ColliderIndex::new();
        let mut ids = Vec::new();
        for _ in 0..50 {
            let x = rng.f32() * CHUNK - CHUNK / 2.0;
            let z = rng.f32() * CHUNK - CHUNK / 2.0;
            ids.push(world.spawn(
                EntityKind::Building,
                Transform::from_position(Vec3::new(x, 5.0, z)),
                RenderPayload::Box {
                    size: Vec3::splat(4.0),
                    color: Color::WHITE,
                },
            ));
            colliders.push(Aabb::from_footprint(x, z, Vec3::splat(4.0), 0.0));
        }
        let mut agent = Point(Vec3::new(210.0, 0.0, 3.0));
        let first_box = *colliders.get(0).unwrap();
        let first_pos = world.get(ids[0]).unwrap().transform.position;
        let gap = agent.0 - first_pos;

        let mut w = WorldWrapper::new(CHUNK).unwrap();
        let offset = w.wrap(agent.0, &mut [&mut world, &mut colliders, &mut agent]);
        assert_eq!(offset, Some(Vec3::new(-CHUNK, 0.0, 0.0)));

        let moved = world.get(ids[0]).unwrap().transform.position;
        assert_eq!(moved, first_pos + Vec3::new(-CHUNK, 0.0, 0.0));
        assert_eq!(*colliders.get(0).unwrap(), first_box.translated(Vec3::new(-CHUNK, 0.0, 0.0)));
        assert!(((agent.0 - moved) - gap).length() < 1e-3);
        assert_eq!(w.chunk(), ChunkCoord::new(1, 0));
    }

    #[test]
    fn walking_back_returns_to_start_chunk() {
        let mut w = WorldWrapper::new(CHUNK).unwrap();
        let mut p = Point(Vec3::new(-209.0, 0.0, 0.0));
        w.wrap(p.0, &mut [&mut p]);
        assert_eq!(w.chunk(), ChunkCoord::new(-1, 0));
        p.0.x = 209.0;
        w.wrap(p.0, &mut [&mut p]);
        assert_eq!(w.chunk(), ChunkCoord::new(0, 0));
        assert_eq!(w.wrap_count(), 2);
    }
}
