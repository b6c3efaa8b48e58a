//! The seam between the window runtime and the game.
//!
//! The runtime owns the event loop and calls into an [`App`]; each redraw the
//! app gets a [`FrameCtx`] to record and submit its frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
