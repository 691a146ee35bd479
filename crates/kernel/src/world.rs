use crate::payload::{EntityKind, RenderPayload};
use cityloop_common::{EntityId, Transform, WorldShift};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A structural change to the scene.
///
/// Per-tick transform updates are not logged; the log carries what a
/// renderer or inspector needs to keep its own scene graph in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Entity was spawned with the given kind and transform.
    Spawned {
        id: EntityId,
        kind: EntityKind,
        transform: Transform,
    },
    /// Entity was despawned. Carries its last transform.
    Despawned {
        id: EntityId,
        kind: EntityKind,
        transform: Transform,
    },
    /// Every entity was translated by the same offset (chunk wrap).
    Shifted { offset: Vec3 },
    /// Simulation advanced one tick.
    Stepped { tick: u64 },
}

/// Capability-tagged entity record: what it is, where it is, how to draw it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityData {
    pub kind: EntityKind,
    pub transform: Transform,
    pub payload: RenderPayload,
    pub visible: bool,
}

/// The authoritative scene.
///
/// Every positioned thing the renderer draws lives here, so a single
/// `shift` moves all of them. Uses BTreeMap for deterministic iteration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    entities: BTreeMap<EntityId, EntityData>,
    tick: u64,
    #[serde(skip)]
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Create an empty world at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of entities in the world.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of entities of one kind.
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind == kind).count()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Read-only access to all entities.
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    /// Iterate entities of one kind.
    pub fn iter_kind(&self, kind: EntityKind) -> impl Iterator<Item = (&EntityId, &EntityData)> {
        self.entities.iter().filter(move |(_, e)| e.kind == kind)
    }

    /// Mutably iterate entities of one kind.
    pub fn iter_kind_mut(
        &mut self,
        kind: EntityKind,
    ) -> impl Iterator<Item = (&EntityId, &mut EntityData)> {
        self.entities.iter_mut().filter(move |(_, e)| e.kind == kind)
    }

    /// Spawn a visible entity. Returns its id.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        transform: Transform,
        payload: RenderPayload,
    ) -> EntityId {
        let id = EntityId::new();
        self.entities.insert(
            id,
            EntityData {
                kind,
                transform,
                payload,
                visible: true,
            },
        );
        self.event_log.push(WorldEvent::Spawned {
            id,
            kind,
            transform,
        });
        id
    }

    /// Remove an entity. Returns the data if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        let data = self.entities.remove(&id);
        if let Some(ref d) = data {
            self.event_log.push(WorldEvent::Despawned {
                id,
                kind: d.kind,
                transform: d.transform,
            });
        }
        data
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityData> {
        self.entities.get_mut(&id)
    }

    /// Overwrite an entity's transform. Returns false if it does not exist.
    pub fn set_transform(&mut self, id: EntityId, transform: Transform) -> bool {
        match self.entities.get_mut(&id) {
            Some(data) => {
                data.transform = transform;
                true
            }
            None => false,
        }
    }

    pub fn set_visible(&mut self, id: EntityId, visible: bool) -> bool {
        match self.entities.get_mut(&id) {
            Some(data) => {
                data.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Advance the tick counter.
    pub fn step(&mut self) {
        self.tick += 1;
        self.event_log.push(WorldEvent::Stepped { tick: self.tick });
    }

    /// Translate every entity by the same offset.
    pub fn translate_all(&mut self, offset: Vec3) {
        for data in self.entities.values_mut() {
            data.transform.position += offset;
        }
        self.event_log.push(WorldEvent::Shifted { offset });
    }
}

impl WorldShift for World {
    fn shift(&mut self, offset: Vec3) {
        self.translate_all(offset);
    }
}
