//! Application state and its binding to the engine runtime.

use anyhow::Result;
use beam_engine::core::{App, AppControl, FrameCtx};
use beam_engine::input::{InputEvent, InputState};
use beam_engine::render::{GpuBackend, ProgramHandle, ProgramSource, RenderBackend, RenderCtx};

use crate::config::ProgramConfig;
use crate::controls::{map_input, Command, TransformState};
use crate::frame::FrameDriver;
use crate::layout::register_cast;
use crate::scene::Scene;

/// Everything the game mutates: sprites, transform scalars and frame phase.
///
/// Created once the backend exists and dropped with it.
#[derive(Debug)]
pub struct Game<B> {
    scene: Scene<B>,
    controls: TransformState,
    driver: FrameDriver,
}

impl<B: Clone> Game<B> {
    /// Compiles `program` (if any) and registers the cast.
    pub fn new<R>(backend: &mut R, program: Option<&ProgramSource>) -> Self
    where
        R: RenderBackend<Buffer = B> + ?Sized,
    {
        let program = program
            .map(|src| backend.compile_program(src))
            .unwrap_or(ProgramHandle::INVALID);
        if !program.is_valid() {
            log::warn!("no usable shader program; frames will clear but draw nothing");
        }

        let mut scene = Scene::new();
        register_cast(&mut scene, backend);
        log::info!("{} sprites registered", scene.catalog().total());

        Self {
            scene,
            controls: TransformState::default(),
            driver: FrameDriver::new(program),
        }
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> AppControl {
        match map_input(event) {
            Some(Command::Quit) => AppControl::Exit,
            Some(cmd) => {
                self.controls.apply(cmd);
                AppControl::Continue
            }
            None => AppControl::Continue,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.driver.on_resize(width, height);
    }

    pub fn frame<R>(&mut self, backend: &mut R)
    where
        R: RenderBackend<Buffer = B> + ?Sized,
    {
        self.driver.frame(backend, &mut self.scene, &self.controls);
    }

    pub fn end_game(&mut self) {
        self.driver.end_game();
    }

    pub fn controls(&self) -> &TransformState {
        &self.controls
    }

    pub fn scene(&self) -> &Scene<B> {
        &self.scene
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }
}

type GpuBuffer = <GpuBackend as RenderBackend>::Buffer;

struct Session {
    backend: GpuBackend,
    game: Game<GpuBuffer>,
}

/// Runtime-facing app; the session starts once the GPU is up.
pub struct Beam {
    program: ProgramConfig,
    session: Option<Session>,
}

impl Beam {
    pub fn new(program: ProgramConfig) -> Self {
        Self {
            program,
            session: None,
        }
    }
}

impl App for Beam {
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        let mut backend = GpuBackend::new(ctx);

        // Shader problems degrade to blank frames instead of aborting.
        let source = match self.program.load() {
            Ok(src) => Some(src),
            Err(e) => {
                log::error!("{e:#}");
                None
            }
        };

        let mut game = Game::new(&mut backend, source.as_ref());
        game.resize(ctx.size.0, ctx.size.1);

        self.session = Some(Session { backend, game });
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent, _input: &InputState) -> AppControl {
        match self.session.as_mut() {
            Some(s) => s.game.handle_input(event),
            None => AppControl::Continue,
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        if let Some(s) = self.session.as_mut() {
            s.game.resize(width, height);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(session) = self.session.as_mut() else {
            return AppControl::Continue;
        };

        session.game.frame(&mut session.backend);

        // Nothing presented (game over): keep the last image on screen.
        let Some(recording) = session.backend.take_frame() else {
            return AppControl::Continue;
        };

        let backend = &mut session.backend;
        ctx.render(|rctx, target| backend.encode(rctx, target, recording))
    }
}
