use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::InputState;
use crate::render::{RenderCtx, RenderTarget};

use super::app::AppControl;

pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

/// Handed to [`App::on_frame`](super::App::on_frame) once per redraw.
///
/// `'a` spans the callback; `'w` is how long the GPU surface borrows the window.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
}

impl FrameCtx<'_, '_> {
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        let size = self.gpu.size();
        RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            (size.width, size.height),
        )
    }

    /// Runs `draw` against the next swapchain image, then submits and presents it.
    ///
    /// Nothing is cleared here. A surface that cannot be acquired skips the
    /// frame, unless the failure is fatal, which asks the runtime to exit.
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    SurfaceErrorAction::Reconfigure | SurfaceErrorAction::Skip => AppControl::Continue,
                };
            }
        };

        let rctx = self.render_ctx();
        draw(&rctx, &mut RenderTarget::new(&mut frame.encoder, &frame.view, &frame.depth_view));

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);
        AppControl::Continue
    }
}
