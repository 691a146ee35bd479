use serde::{Deserialize, Serialize};

/// Physical keys the simulation listens to. Hosts translate their native key
/// codes into this set; anything else maps to `Other` and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    KeyE,
    KeyP,
    Other,
}

/// A high-level action the simulation consumes.
///
/// Locomotion and mode switching read actions, never raw keys, so arrow
/// keys and WASD behave identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    Jump,
    /// Enter or leave the vehicle.
    ToggleVehicle,
    /// Switch between the raster and path-traced render paths.
    ToggleRenderMode,
}

impl Action {
    /// Default key binding. Returns `None` for unbound keys.
    pub fn from_key(key: Key) -> Option<Action> {
        match key {
            Key::KeyW | Key::ArrowUp => Some(Action::MoveForward),
            Key::KeyS | Key::ArrowDown => Some(Action::MoveBack),
            Key::KeyA | Key::ArrowLeft => Some(Action::MoveLeft),
            Key::KeyD | Key::ArrowRight => Some(Action::MoveRight),
            Key::Space => Some(Action::Jump),
            Key::KeyE => Some(Action::ToggleVehicle),
            Key::KeyP => Some(Action::ToggleRenderMode),
            Key::Other => None,
        }
    }

    /// Whether the action fires once per press rather than while held.
    pub fn is_edge_triggered(self) -> bool {
        matches!(
            self,
            Action::Jump | Action::ToggleVehicle | Action::ToggleRenderMode
        )
    }
}
