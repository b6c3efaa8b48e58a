//! Recording backend that needs no GPU.
//!
//! Every command is appended to a log in call order; uploads are kept so
//! tests can inspect what would have reached GPU memory.

use glam::Mat4;

use crate::paint::Rgb;

use super::backend::{DrawCall, RenderBackend};
use super::drawable::{FillMode, Primitive};
use super::program::{ProgramHandle, ProgramSource};

/// Buffer handle: index into the backend's upload list.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct HeadlessBuffer(pub usize);

/// Snapshot of one draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub primitive: Primitive,
    pub fill_mode: FillMode,
    pub vertex_count: u32,
    pub positions: HeadlessBuffer,
    pub colors: HeadlessBuffer,
    /// Program bound when the draw was issued.
    pub program: ProgramHandle,
    /// Last matrix set before the draw.
    pub mvp: Mat4,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    Clear(Rgb),
    UseProgram(ProgramHandle),
    SetMvp(Mat4),
    Draw(RecordedDraw),
    Present,
}

#[derive(Debug, Clone)]
pub struct HeadlessUpload {
    pub label: String,
    pub data: Vec<[f32; 3]>,
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    commands: Vec<RecordedCommand>,
    uploads: Vec<HeadlessUpload>,
    programs: u32,
    fail_compile: bool,
    program: ProgramHandle,
    mvp: Mat4,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose program compilation always fails.
    pub fn failing_compile() -> Self {
        Self {
            fail_compile: true,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    pub fn uploads(&self) -> &[HeadlessUpload] {
        &self.uploads
    }

    /// Data behind an uploaded buffer.
    pub fn uploaded(&self, buffer: &HeadlessBuffer) -> Option<&[[f32; 3]]> {
        self.uploads.get(buffer.0).map(|u| u.data.as_slice())
    }

    /// Draw calls in submission order.
    pub fn draws(&self) -> Vec<&RecordedDraw> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RecordedCommand::Draw(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&RecordedCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Drops the command log; uploads are kept.
    pub fn clear_log(&mut self) {
        self.commands.clear();
    }
}

impl RenderBackend for HeadlessBackend {
    type Buffer = HeadlessBuffer;

    fn compile_program(&mut self, source: &ProgramSource) -> ProgramHandle {
        let diagnostics = source.diagnostics();
        if self.fail_compile || !diagnostics.is_empty() {
            for d in &diagnostics {
                log::error!("shader program '{}': {d}", source.label);
            }
            return ProgramHandle::INVALID;
        }

        self.programs += 1;
        ProgramHandle(self.programs)
    }

    fn upload_vertices(&mut self, label: &str, data: &[[f32; 3]]) -> HeadlessBuffer {
        self.uploads.push(HeadlessUpload {
            label: label.to_string(),
            data: data.to_vec(),
        });
        HeadlessBuffer(self.uploads.len() - 1)
    }

    fn clear(&mut self, color: Rgb) {
        self.commands.push(RecordedCommand::Clear(color));
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.program = program;
        self.commands.push(RecordedCommand::UseProgram(program));
    }

    fn set_mvp(&mut self, mvp: Mat4) {
        self.mvp = mvp;
        self.commands.push(RecordedCommand::SetMvp(mvp));
    }

    fn draw(&mut self, call: DrawCall<'_, HeadlessBuffer>) {
        self.commands.push(RecordedCommand::Draw(RecordedDraw {
            primitive: call.primitive,
            fill_mode: call.fill_mode,
            vertex_count: call.vertex_count,
            positions: *call.positions,
            colors: *call.colors,
            program: self.program,
            mvp: self.mvp,
        }));
    }

    fn present(&mut self) {
        self.commands.push(RecordedCommand::Present);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_hands_out_increasing_handles() {
        let mut b = HeadlessBackend::new();
        let src = ProgramSource::builtin();
        assert_eq!(b.compile_program(&src), ProgramHandle(1));
        assert_eq!(b.compile_program(&src), ProgramHandle(2));
    }

    #[test]
    fn failing_compile_returns_invalid_handle() {
        let mut b = HeadlessBackend::failing_compile();
        assert_eq!(b.compile_program(&ProgramSource::builtin()), ProgramHandle::INVALID);
    }

    #[test]
    fn draw_captures_bound_program_and_matrix() {
        let mut b = HeadlessBackend::new();
        let buf = b.upload_vertices("p", &[[0.0; 3]; 3]);
        let mvp = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 0.0));

        b.use_program(ProgramHandle(7));
        b.set_mvp(mvp);
        b.draw(DrawCall {
            primitive: Primitive::Triangles,
            fill_mode: FillMode::Fill,
            vertex_count: 3,
            positions: &buf,
            colors: &buf,
        });

        let draws = b.draws();
        assert_eq!(draws[0].program, ProgramHandle(7));
        assert_eq!(draws[0].mvp, mvp);
    }
}
