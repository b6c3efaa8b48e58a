use anyhow::Result;

use crate::input::{InputEvent, InputState};
use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Whether the runtime keeps going after a callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Game-side callbacks, all invoked on the event-loop thread in event order.
pub trait App {
    /// Called once the window and GPU are ready, before the first frame.
    ///
    /// An error here aborts the runtime.
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> Result<()>;

    /// Called for each translated input event, after it was folded into `input`.
    fn on_input(&mut self, event: &InputEvent, input: &InputState) -> AppControl {
        let _ = (event, input);
        AppControl::Continue
    }

    /// Called after the surface was reconfigured (physical pixels).
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called once per redraw tick.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
