//! Keyboard/mouse state polled once per frame.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Continuous movement actions held down between frames.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Action {
    WalkForward,
    WalkBackward,
    StrafeLeft,
    StrafeRight,
    RiseUp,
    RiseDown,
}

impl Action {
    fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyW => Some(Action::WalkForward),
            KeyCode::KeyS => Some(Action::WalkBackward),
            KeyCode::KeyA => Some(Action::StrafeLeft),
            KeyCode::KeyD => Some(Action::StrafeRight),
            KeyCode::KeyE => Some(Action::RiseUp),
            KeyCode::KeyQ => Some(Action::RiseDown),
            _ => None,
        }
    }
}

/// Pressed-action set plus mouse deltas accumulated since the last frame.
#[derive(Debug, Default)]
pub struct InputState {
    active: HashSet<Action>,
    mouse_dx: f64,
    mouse_dy: f64,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a keyboard event; unmapped keys are ignored.
    pub fn on_key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(action) = Action::from_key_code(code) else {
            return;
        };
        match event.state {
            ElementState::Pressed => {
                self.active.insert(action);
            }
            ElementState::Released => {
                self.active.remove(&action);
            }
        }
    }

    /// Accumulate a raw mouse-motion delta.
    pub fn on_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.mouse_dx += dx;
        self.mouse_dy += dy;
    }

    pub fn is_active(&self, action: Action) -> bool {
        self.active.contains(&action)
    }

    /// Signed strafe axis: +1 right, -1 left.
    pub fn strafe_axis(&self) -> f32 {
        axis(
            self.is_active(Action::StrafeRight),
            self.is_active(Action::StrafeLeft),
        )
    }

    /// Signed walk axis: +1 forward, -1 backward.
    pub fn walk_axis(&self) -> f32 {
        axis(
            self.is_active(Action::WalkForward),
            self.is_active(Action::WalkBackward),
        )
    }

    /// Signed rise axis: +1 up, -1 down.
    pub fn rise_axis(&self) -> f32 {
        axis(
            self.is_active(Action::RiseUp),
            self.is_active(Action::RiseDown),
        )
    }

    /// Drain the accumulated mouse delta for this frame.
    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        let delta = (self.mouse_dx as f32, self.mouse_dy as f32);
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
        delta
    }

    /// Forget held keys, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.active.clear();
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    (positive as i8 - negative as i8) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_combines_opposing_keys() {
        let mut input = InputState::new();
        assert_eq!(input.walk_axis(), 0.0);
        input.active.insert(Action::WalkForward);
        assert_eq!(input.walk_axis(), 1.0);
        input.active.insert(Action::WalkBackward);
        assert_eq!(input.walk_axis(), 0.0);
    }

    #[test]
    fn mouse_delta_accumulates_and_drains() {
        let mut input = InputState::new();
        input.on_mouse_motion(2.0, -1.0);
        input.on_mouse_motion(3.0, 1.5);
        assert_eq!(input.take_mouse_delta(), (5.0, 0.5));
        assert_eq!(input.take_mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn clear_releases_held_keys() {
        let mut input = InputState::new();
        input.active.insert(Action::RiseUp);
        input.clear();
        assert_eq!(input.rise_axis(), 0.0);
    }
}
