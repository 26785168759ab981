// input.rs
use glam::Vec2;
use winit::event::*;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Per-frame control snapshot. Movement flags follow key state; the mouse
/// delta is single-use and cleared by whoever consumes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub move_fwd: bool,
    pub move_back: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub run: bool,
    pub mouse_moved: bool,
    pub mouse_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn any_movement(&self) -> bool {
        self.move_fwd || self.move_back || self.move_left || self.move_right
    }

    /// Adds pointer motion to the delta pending for this frame.
    pub fn record_mouse(&mut self, dx: f32, dy: f32) {
        if !self.mouse_moved {
            self.mouse_delta = Vec2::ZERO;
        }
        self.mouse_delta += Vec2::new(dx, dy);
        self.mouse_moved = true;
    }

    /// Hands out the pending delta at most once.
    pub fn take_mouse(&mut self) -> Option<Vec2> {
        if !self.mouse_moved {
            return None;
        }
        self.mouse_moved = false;
        Some(std::mem::take(&mut self.mouse_delta))
    }

    pub fn process_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(key), state, .. }, ..
            } => self.process_key(*key, *state == ElementState::Pressed),
            _ => false,
        }
    }

    pub fn process_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::KeyW => { self.move_fwd = pressed; true }
            KeyCode::KeyS => { self.move_back = pressed; true }
            KeyCode::KeyA => { self.move_left = pressed; true }
            KeyCode::KeyD => { self.move_right = pressed; true }
            KeyCode::ShiftLeft | KeyCode::ShiftRight => { self.run = pressed; true }
            _ => false,
        }
    }

    /// Drops held keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}
