//! Per-frame routine and the Running/GameOver state machine.

use beam_engine::paint::Rgb;
use beam_engine::render::{ProgramHandle, RenderBackend};
use beam_engine::transform::{view_projection, Camera2D, Projection};
use glam::Mat4;

use crate::controls::TransformState;
use crate::layout::placements;
use crate::scene::{Scene, SceneError};

pub const CLEAR_COLOR: Rgb = Rgb::WHITE;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    Running,
    /// Terminal: frames clear and stop.
    GameOver,
}

#[derive(Debug)]
pub struct FrameDriver {
    phase: Phase,
    program: ProgramHandle,
    projection: Projection,
    camera: Camera2D,
    view_projection: Mat4,
}

impl FrameDriver {
    pub fn new(program: ProgramHandle) -> Self {
        let projection = Projection::default();
        let camera = Camera2D::default();
        Self {
            phase: Phase::Running,
            program,
            view_projection: view_projection(&projection, &camera),
            projection,
            camera,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    /// One-way switch to [`Phase::GameOver`].
    pub fn end_game(&mut self) {
        if self.phase == Phase::Running {
            log::info!("game over");
            self.phase = Phase::GameOver;
        }
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.projection.on_resize(width, height);
        self.view_projection = view_projection(&self.projection, &self.camera);
    }

    /// Clears, then (while running) places and draws the whole cast and presents.
    pub fn frame<R>(&mut self, backend: &mut R, scene: &mut Scene<R::Buffer>, state: &TransformState)
    where
        R: RenderBackend + ?Sized,
    {
        backend.clear(CLEAR_COLOR);
        if self.phase == Phase::GameOver {
            return;
        }

        backend.use_program(self.program);

        for p in placements(state) {
            let drawn = scene
                .catalog_mut()
                .update(p.category, p.name, |s| s.place(p.x, p.y, p.angle))
                .map_err(SceneError::from)
                .and_then(|()| scene.draw_sprite(backend, self.view_projection, p.category, p.name));

            if let Err(e) = drawn {
                log::error!("skipping {}/{}: {e}", p.category, p.name);
            }
        }

        backend.present();
    }
}
