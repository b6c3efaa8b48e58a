use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputState;
use crate::render::RenderCtx;

/// Title and initial inner size of the single game window.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "beam".to_string(),
            initial_size: LogicalSize::new(1920.0, 1080.0),
        }
    }
}

pub struct Runtime;

impl Runtime {
    /// Opens the window, brings up the GPU and drives `app` until it exits
    /// or the window is closed.
    ///
    /// Fails with the first setup error (window, GPU or `App::on_start`).
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            lifecycle: Lifecycle::Pending,
            fatal: None,
        };

        event_loop
            .run_app(&mut driver)
            .context("winit event loop terminated with error")?;

        driver.fatal.map_or(Ok(()), Err)
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    window: Window,
    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowEntry {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        WindowEntryTryBuilder {
            input_state: InputState::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed"),
        }
        .try_build()
    }

    fn with_render_ctx<R>(&self, f: impl FnOnce(&RenderCtx<'_>) -> R) -> R {
        self.with_gpu(|gpu| {
            let size = gpu.size();
            f(&RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format(), (size.width, size.height)))
        })
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }
}

enum Lifecycle {
    /// Waiting for the first `resumed`.
    Pending,
    Running(WindowEntry),
    /// Exit was requested; no window is kept.
    Done,
}

struct Driver<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    lifecycle: Lifecycle,
    fatal: Option<anyhow::Error>,
}

impl<A: App> Driver<A> {
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.lifecycle = Lifecycle::Done;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.shutdown(event_loop);
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let entry = WindowEntry::open(event_loop, &self.config, self.gpu_init.clone())?;
        entry.with_render_ctx(|rctx| self.app.on_start(rctx))?;
        Ok(entry)
    }

    /// Folds the event into input state and lets the app react to it.
    fn dispatch_input(&mut self, event: &WindowEvent) -> AppControl {
        let Lifecycle::Running(entry) = &mut self.lifecycle else {
            return AppControl::Continue;
        };
        let app = &mut self.app;
        entry.with_mut(|fields| match translate_window_event(fields.window, fields.input_state, event) {
            Some(ev) => {
                fields.input_state.apply_event(&ev);
                app.on_input(&ev, fields.input_state)
            }
            None => AppControl::Continue,
        })
    }

    fn resize(&mut self, new_size: Option<PhysicalSize<u32>>) {
        let Lifecycle::Running(entry) = &mut self.lifecycle else {
            return;
        };
        let new_size = new_size.unwrap_or_else(|| entry.with_window(|w| w.inner_size()));

        let size = entry.with_gpu_mut(|gpu| {
            gpu.resize(new_size);
            gpu.size()
        });
        self.app.on_resize(size.width, size.height);
        entry.request_redraw();
    }

    fn redraw(&mut self, window_id: WindowId) -> AppControl {
        let Lifecycle::Running(entry) = &mut self.lifecycle else {
            return AppControl::Continue;
        };
        let app = &mut self.app;
        entry.with_mut(|fields| {
            app.on_frame(&mut FrameCtx {
                window: WindowCtx { id: window_id, window: fields.window },
                gpu: fields.gpu,
                input: fields.input_state,
            })
        })
    }
}

impl<A: App + 'static> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.lifecycle, Lifecycle::Pending) {
            return;
        }
        match self.start(event_loop) {
            Ok(entry) => {
                entry.request_redraw();
                self.lifecycle = Lifecycle::Running(entry);
            }
            Err(e) => self.fail(event_loop, e.context("failed to start")),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        match &self.lifecycle {
            Lifecycle::Pending => {}
            Lifecycle::Running(entry) => {
                // Continuous redraw; vsync paces it.
                event_loop.set_control_flow(ControlFlow::Poll);
                entry.request_redraw();
            }
            Lifecycle::Done => event_loop.exit(),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if matches!(self.lifecycle, Lifecycle::Done) {
            event_loop.exit();
            return;
        }

        if self.dispatch_input(&event) == AppControl::Exit {
            log::info!("exit requested by input");
            self.shutdown(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(size) => self.resize(Some(size)),
            WindowEvent::ScaleFactorChanged { .. } => self.resize(None),
            WindowEvent::RedrawRequested => {
                if self.redraw(window_id) == AppControl::Exit {
                    self.shutdown(event_loop);
                }
            }
            _ => {}
        }
    }
}
