//! Keyboard and mouse input.
//!
//! The runtime turns winit events into [`InputEvent`]s, folds each one into
//! the window's [`InputState`] and then hands it to the app. No winit types
//! appear in this API.

pub(crate) mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, Modifiers, MouseButton, PointerButtonEvent};
