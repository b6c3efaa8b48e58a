/// Physical key, independent of keyboard layout.
///
/// Letters are reported as uppercase ASCII in [`Key::Letter`]; keys the game
/// has no name for carry the platform code in [`Key::Unknown`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Letter(char),
    Escape,
    Enter,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Shift,
    Control,
    Alt,
    Meta,
    Unknown(u32),
}

impl Key {
    /// `Key::Letter` for an ASCII letter in either case.
    pub fn letter(c: char) -> Option<Key> {
        c.is_ascii_alphabetic().then(|| Key::Letter(c.to_ascii_uppercase()))
    }
}

/// Press/release edge shared by keys and mouse buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
}

/// Mouse button edge at the last known pointer position (logical pixels).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: ButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

/// Window input, translated from the platform layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),
    Key {
        key: Key,
        state: ButtonState,
        modifiers: Modifiers,
        /// Auto-repeat from a held key.
        repeat: bool,
    },
    PointerMoved {
        x: f32,
        y: f32,
    },
    PointerButton(PointerButtonEvent),
    PointerLeft,
    Focused(bool),
}

impl InputEvent {
    /// Key event with no modifiers held.
    pub fn key(key: Key, state: ButtonState) -> Self {
        InputEvent::Key {
            key,
            state,
            modifiers: Modifiers::NONE,
            repeat: false,
        }
    }
}
