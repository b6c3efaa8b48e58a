//! Beam: buckets, walls, a laser and mirrors on a fixed 2D playfield.
//!
//! The game owns the sprite catalog, the input-driven transform state and
//! the frame driver; the engine supplies windowing, GPU and rendering.

pub mod catalog;
pub mod config;
pub mod controls;
pub mod frame;
pub mod game;
pub mod layout;
pub mod scene;

pub use config::{GameConfig, ProgramConfig};
pub use game::{Beam, Game};
