//! Held-key input buffer.
//!
//! Platform key events only ever touch the buffer through [`InputState::set_key`].
//! The frame scheduler reads it once per tick and applies the camera binding of
//! every key that is still held, so holding a key moves the camera continuously.

use std::{collections::BTreeSet, ops::ControlFlow};

use crate::camera::{CameraAction, MoveAxis};

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Escape,
    W,
    A,
    S,
    D,
    Q,
    E,
    I,
    J,
    K,
    L,
}

impl Key {
    /// Every key that carries a camera binding.
    pub const MOVEMENT: [Key; 10] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Q,
        Key::E,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
    ];

    /// Returns the camera effect of holding this key, if any.
    pub fn binding(self) -> Option<CameraAction> {
        use CameraAction::{Move, Turn};
        use MoveAxis::{Forward, Strafe, Vertical};

        let action = match self {
            Key::W => Move { axis: Forward, amount: 1.0 },
            Key::S => Move { axis: Forward, amount: -1.0 },
            Key::A => Move { axis: Strafe, amount: -1.0 },
            Key::D => Move { axis: Strafe, amount: 1.0 },
            Key::Q => Move { axis: Vertical, amount: -1.0 },
            Key::E => Move { axis: Vertical, amount: 1.0 },
            Key::I => Turn { yaw: 0.0, pitch: 1.0 },
            Key::K => Turn { yaw: 0.0, pitch: -1.0 },
            Key::J => Turn { yaw: -1.0, pitch: 0.0 },
            Key::L => Turn { yaw: 1.0, pitch: 0.0 },
            Key::Escape => return None,
        };
        Some(action)
    }
}

/// The set of keys currently held down.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    down: BTreeSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key edge. Returns [`ControlFlow::Break`] on the escape down-edge,
    /// which asks the caller to exit right away.
    pub fn set_key(&mut self, key: Key, pressed: bool) -> ControlFlow<()> {
        if pressed {
            if key == Key::Escape {
                log::info!("Escape pressed, exiting");
                return ControlFlow::Break(());
            }
            self.down.insert(key);
        } else {
            self.down.remove(&key);
        }
        ControlFlow::Continue(())
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Held keys in a fixed order.
    pub fn held(&self) -> impl Iterator<Item = Key> + '_ {
        self.down.iter().copied()
    }

    /// Camera actions for every held key, in the same order as [`InputState::held`].
    pub fn held_actions(&self) -> impl Iterator<Item = CameraAction> + '_ {
        self.held().filter_map(Key::binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    #[test]
    fn held_key_stays_pressed_until_released() {
        let mut input = InputState::new();
        assert!(!input.is_pressed(Key::W));
        assert_eq!(input.set_key(Key::W, true), ControlFlow::Continue(()));
        // Repeated down-edges change nothing.
        let _ = input.set_key(Key::W, true);
        assert!(input.is_pressed(Key::W));
        let _ = input.set_key(Key::W, false);
        assert!(!input.is_pressed(Key::W));
    }

    #[test]
    fn escape_requests_exit() {
        let mut input = InputState::new();
        assert_eq!(input.set_key(Key::Escape, true), ControlFlow::Break(()));
        assert!(!input.is_pressed(Key::Escape));
        assert_eq!(input.set_key(Key::Escape, false), ControlFlow::Continue(()));
    }

    #[test]
    fn only_escape_has_no_binding() {
        assert!(Key::Escape.binding().is_none());
        assert!(Key::MOVEMENT.iter().all(|key| key.binding().is_some()));
    }

    #[test]
    fn held_actions_follow_key_order() {
        let mut input = InputState::new();
        let _ = input.set_key(Key::L, true);
        let _ = input.set_key(Key::W, true);
        let held: Vec<_> = input.held().collect();
        assert_eq!(held, vec![Key::W, Key::L]);
        assert_eq!(input.held_actions().count(), 2);
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let mut input = InputState::new();
        let _ = input.set_key(Key::Q, true);
        let _ = input.set_key(Key::E, true);
        let mut camera = Camera::default();
        let before = camera.position();
        for action in input.held_actions() {
            camera.apply(action, 10.0);
        }
        assert!(camera.position().abs_diff_eq(before, 1e-5));
    }
}
