//! Window, GPU and sprite-rendering layer for the beam game.
//!
//! The game crate builds its scene out of [`scene::Sprite`]s backed by
//! [`render::Drawable`]s and renders them through a [`render::RenderBackend`];
//! [`window::Runtime`] owns the event loop that drives it.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod transform;
pub mod window;
