use glam::Mat4;

use crate::paint::Rgb;

use super::drawable::{FillMode, Primitive};
use super::program::{ProgramHandle, ProgramSource};

/// One draw call: every vertex of a drawable, starting at index 0.
///
/// Fill mode travels with the call; backends must not carry it over to
/// later draws.
#[derive(Debug)]
pub struct DrawCall<'a, B> {
    pub primitive: Primitive,
    pub fill_mode: FillMode,
    pub vertex_count: u32,
    pub positions: &'a B,
    pub colors: &'a B,
}

/// Command surface the scene renders through.
///
/// A frame is `clear`, then any number of `use_program` / `set_mvp` / `draw`,
/// then `present`. A frame that is cleared but never presented is discarded.
pub trait RenderBackend {
    /// Handle to a GPU-resident vertex buffer.
    type Buffer: Clone;

    /// Compiles and links a program from vertex + fragment sources.
    ///
    /// Failures are logged and yield [`ProgramHandle::INVALID`]; draws issued
    /// while an invalid program is bound produce no output.
    fn compile_program(&mut self, source: &ProgramSource) -> ProgramHandle;

    /// One-time static upload of `[x, y, z]` / `[r, g, b]` vertex data.
    fn upload_vertices(&mut self, label: &str, data: &[[f32; 3]]) -> Self::Buffer;

    /// Clears color and depth, starting a new frame.
    fn clear(&mut self, color: Rgb);

    fn use_program(&mut self, program: ProgramHandle);

    /// Sets the model-view-projection matrix for subsequent draws.
    fn set_mvp(&mut self, mvp: Mat4);

    fn draw(&mut self, call: DrawCall<'_, Self::Buffer>);

    /// Finishes the frame and hands it to presentation.
    fn present(&mut self);
}
