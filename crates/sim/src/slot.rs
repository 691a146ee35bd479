use cityloop_motion::Character;
use serde::Serialize;

/// An optional asset that may arrive at any tick, or never.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AssetSlot<T> {
    #[default]
    Pending,
    Ready(T),
    /// Loading failed; the dependent feature stays off for the session.
    Failed(String),
}

impl<T> AssetSlot<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            AssetSlot::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            AssetSlot::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AssetSlot::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AssetSlot::Pending)
    }

    /// Settle a pending slot. Returns false if it was already settled, in
    /// which case `result` is dropped.
    pub fn resolve(&mut self, name: &str, result: Result<T, String>) -> bool {
        if !self.is_pending() {
            tracing::debug!(asset = name, "asset already settled, ignoring");
            return false;
        }
        *self = match result {
            Ok(value) => {
                tracing::info!(asset = name, "asset loaded");
                AssetSlot::Ready(value)
            }
            Err(reason) => {
                tracing::warn!(asset = name, %reason, "asset failed to load");
                AssetSlot::Failed(reason)
            }
        };
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnimationClip {
    Idle,
    Walk,
    Jump,
}

/// Animated character model. Picks a clip from the character's state.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRig {
    pub asset: String,
    clip: AnimationClip,
    clip_time: f32,
}

impl CharacterRig {
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            clip: AnimationClip::Idle,
            clip_time: 0.0,
        }
    }

    pub fn clip(&self) -> AnimationClip {
        self.clip
    }

    /// Seconds since the current clip started.
    pub fn clip_time(&self) -> f32 {
        self.clip_time
    }

    /// Advance the animation. Returns true when the clip changed.
    pub fn update(&mut self, character: &Character, dt: f32) -> bool {
        let clip = if !character.grounded {
            AnimationClip::Jump
        } else if character.walking {
            AnimationClip::Walk
        } else {
            AnimationClip::Idle
        };
        if clip != self.clip {
            tracing::trace!(?clip, "character clip changed");
            self.clip = clip;
            self.clip_time = 0.0;
            return true;
        }
        self.clip_time += dt;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn slot_settles_once() {
        let mut slot: AssetSlot<u32> = AssetSlot::default();
        assert!(slot.get().is_none());
        assert!(slot.resolve("answer", Ok(42)));
        assert_eq!(slot.get(), Some(&42));
        assert!(!slot.resolve("answer", Err("late failure".into())));
        assert!(slot.is_ready());
    }

    #[test]
    fn failed_slot_stays_empty() {
        let mut slot: AssetSlot<u32> = AssetSlot::Pending;
        slot.resolve("model", Err("404".into()));
        assert_eq!(slot, AssetSlot::Failed("404".into()));
        assert!(slot.get_mut().is_none());
    }

    #[test]
    fn rig_follows_character_state() {
        let mut rig = CharacterRig::new("character.glb");
        let mut c = Character::new(Vec3::ZERO, 0.0);
        assert!(!rig.update(&c, 0.1));
        assert_eq!(rig.clip(), AnimationClip::Idle);
        assert!((rig.clip_time() - 0.1).abs() < 1e-6);

        c.walking = true;
        assert!(rig.update(&c, 0.1));
        assert_eq!(rig.clip(), AnimationClip::Walk);
        assert_eq!(rig.clip_time(), 0.0);

        c.grounded = false;
        rig.update(&c, 0.1);
        assert_eq!(rig.clip(), AnimationClip::Jump);
    }
}
