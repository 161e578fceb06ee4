use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::translate_key_press;
use crate::render::{Renderer, RendererConfig};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub gpu: GpuInit,
    pub renderer: RendererConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "quadrant".to_string(),
            initial_size: LogicalSize::new(800.0, 800.0),
            gpu: GpuInit::default(),
            renderer: RendererConfig::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until it exits or the window closes.
    ///
    /// Errors during startup (window, GPU, shaders, `App::on_start`) are
    /// returned after the event loop stops.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.startup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Active {
    entry: WindowEntry,
    renderer: Renderer,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    app: A,

    active: Option<Active>,
    startup_error: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, app: A) -> Self {
        Self {
            config,
            app,
            active: None,
            startup_error: None,
            exit_requested: false,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Active> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.config.gpu.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let mut renderer = entry.with_gpu(|gpu| {
            Renderer::new(
                gpu.device(),
                gpu.queue(),
                gpu.surface_format(),
                self.config.renderer.clone(),
            )
        })?;

        self.app
            .on_start(&mut renderer)
            .context("application failed to start")?;

        entry.with_window(|w| w.request_redraw());
        Ok(Active { entry, renderer })
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.active.is_some() || self.exit_requested {
            return;
        }

        match self.start(event_loop) {
            Ok(active) => self.active = Some(active),
            Err(e) => {
                log::error!("{e:#}");
                self.startup_error = Some(e);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        if let Some(active) = &self.active {
            active.entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, active) = (&mut self.app, &mut self.active);
        let Some(Active { entry, renderer }) = active.as_mut() else {
            return;
        };

        let control = match &event {
            WindowEvent::CloseRequested => AppControl::Exit,

            WindowEvent::KeyboardInput { event, .. } => match translate_key_press(event) {
                Some(key) => {
                    log::debug!("key pressed: {key}");
                    app.on_key(key, renderer)
                }
                None => AppControl::Continue,
            },

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
                AppControl::Continue
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
                AppControl::Continue
            }

            WindowEvent::RedrawRequested => entry.with_mut(|fields| {
                let mut ctx = FrameCtx {
                    window: fields.window,
                    gpu: fields.gpu,
                    renderer,
                };
                app.on_frame(&mut ctx)
            }),

            _ => AppControl::Continue,
        };

        if control == AppControl::Exit {
            log::info!("exiting");
            self.active = None;
            self.request_exit(event_loop);
        }
    }
}
