use crate::action::{Action, Key};
use glam::Vec2;
use std::collections::HashSet;

/// Pointer capture lifecycle. Pointer motion only steers the camera while
/// the pointer is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerCapture {
    #[default]
    Released,
    /// A click asked the host for capture; waiting for confirmation.
    Requested,
    Captured,
}

/// Latest keyboard and pointer state, written by host event handlers and
/// read once at the start of each simulation tick.
///
/// Held actions are level-triggered. Edge-triggered actions (jump, toggles)
/// are recorded once per physical press and cleared by `end_tick`.
#[derive(Debug, Default)]
pub struct InputState {
    held_keys: HashSet<Key>,
    pressed: HashSet<Action>,
    pointer_delta: Vec2,
    capture: PointerCapture,
    last_capture_error: Option<String>,
    released: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key-down event. Auto-repeat of an already held key is not a new press.
    pub fn key_down(&mut self, key: Key) {
        if self.released {
            return;
        }
        let newly_pressed = self.held_keys.insert(key);
        if !newly_pressed {
            return;
        }
        if let Some(action) = Action::from_key(key) {
            if action.is_edge_triggered() {
                self.pressed.insert(action);
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held_keys.remove(&key);
    }

    /// Whether any key bound to `action` is currently held.
    pub fn is_held(&self, action: Action) -> bool {
        self.held_keys
            .iter()
            .any(|k| Action::from_key(*k) == Some(action))
    }

    /// Whether `action` was pressed since the last `end_tick`.
    pub fn just_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// +1 forward, -1 back, 0 for neither or both.
    pub fn forward_axis(&self) -> f32 {
        axis(
            self.is_held(Action::MoveForward),
            self.is_held(Action::MoveBack),
        )
    }

    /// +1 right, -1 left, 0 for neither or both.
    pub fn strafe_axis(&self) -> f32 {
        axis(
            self.is_held(Action::MoveRight),
            self.is_held(Action::MoveLeft),
        )
    }

    /// Click on the render surface: ask the host to capture the pointer.
    pub fn request_capture(&mut self) {
        if self.capture == PointerCapture::Released && !self.released {
            self.capture = PointerCapture::Requested;
        }
    }

    pub fn capture_requested(&self) -> bool {
        self.capture == PointerCapture::Requested
    }

    /// Host notification that capture was gained or lost.
    pub fn capture_changed(&mut self, captured: bool) {
        self.capture = if captured && !self.released {
            PointerCapture::Captured
        } else {
            PointerCapture::Released
        };
        if !captured {
            self.pointer_delta = Vec2::ZERO;
        }
        tracing::debug!(capture = ?self.capture, "pointer capture changed");
    }

    /// Host notification that capture failed. Non-fatal.
    pub fn capture_error(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(%reason, "pointer capture failed");
        self.capture = PointerCapture::Released;
        self.last_capture_error = Some(reason);
    }

    pub fn capture(&self) -> PointerCapture {
        self.capture
    }

    pub fn is_captured(&self) -> bool {
        self.capture == PointerCapture::Captured
    }

    pub fn last_capture_error(&self) -> Option<&str> {
        self.last_capture_error.as_deref()
    }

    /// Raw pointer motion. Ignored unless the pointer is captured.
    pub fn pointer_moved(&mut self, dx: f32, dy: f32) {
        if self.is_captured() {
            self.pointer_delta += Vec2::new(dx, dy);
        }
    }

    /// Return and reset the motion accumulated since the last call.
    pub fn take_pointer_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.pointer_delta)
    }

    /// Clear edge-triggered presses. Called once at the end of each tick.
    pub fn end_tick(&mut self) {
        self.pressed.clear();
    }

    /// Drop all listeners' state: no further input is accepted.
    pub fn release(&mut self) {
        self.held_keys.clear();
        self.pressed.clear();
        self.pointer_delta = Vec2::ZERO;
        self.capture = PointerCapture::Released;
        self.released = true;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}
