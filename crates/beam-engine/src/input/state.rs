use std::collections::HashSet;
use std::hash::Hash;

use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// What is held right now, as seen by the window.
///
/// Focus loss drops every held key and button so a release delivered to
/// another window cannot leave one stuck.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,
    /// Logical pixels; `None` while the pointer is outside the window.
    pub pointer_pos: Option<(f32, f32)>,
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match *ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = m,
            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }
            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((x, y)),
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = modifiers;
                track(&mut self.keys_down, key, state);
            }
            InputEvent::PointerButton(ev) => {
                self.modifiers = ev.modifiers;
                self.pointer_pos = Some((ev.x, ev.y));
                track(&mut self.buttons_down, ev.button, ev.state);
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

fn track<T: Eq + Hash>(held: &mut HashSet<T>, item: T, state: ButtonState) {
    match state {
        ButtonState::Pressed => {
            held.insert(item);
        }
        ButtonState::Released => {
            held.remove(&item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerButtonEvent;

    fn key(key: Key, state: ButtonState, modifiers: Modifiers) -> InputEvent {
        InputEvent::Key { key, state, modifiers, repeat: false }
    }

    #[test]
    fn key_press_and_release_track_held_set() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::Letter('S'), ButtonState::Pressed, Modifiers::default()));
        assert!(s.key_down(Key::Letter('S')));

        s.apply_event(&key(Key::Letter('S'), ButtonState::Released, Modifiers::default()));
        assert!(!s.key_down(Key::Letter('S')));
    }

    #[test]
    fn key_event_refreshes_modifiers() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::ArrowLeft, ButtonState::Released, Modifiers::CTRL));
        assert!(s.modifiers.ctrl);
        assert!(!s.modifiers.shift);
    }

    #[test]
    fn focus_loss_clears_held_input() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::Letter('A'), ButtonState::Pressed, Modifiers::default()));
        s.apply_event(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: ButtonState::Pressed,
            x: 1.0,
            y: 2.0,
            modifiers: Modifiers::default(),
        }));
        assert!(s.button_down(MouseButton::Left));
        assert!(!s.button_down(MouseButton::Right));

        s.apply_event(&InputEvent::Focused(false));
        assert!(!s.button_down(MouseButton::Left));
        assert!(s.keys_down.is_empty());
        assert!(s.buttons_down.is_empty());
        assert_eq!(s.pointer_pos, Some((1.0, 2.0)));
    }

    #[test]
    fn pointer_left_forgets_position() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerMoved { x: 3.0, y: 4.0 });
        s.apply_event(&InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }
}
