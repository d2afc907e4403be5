//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]: it owns the window,
//! the renderer, the input trackers and the [`TickDriver`], and turns
//! `RedrawRequested` into fixed-step ticks followed by one draw.

use std::sync::Arc;

use driftfield_config::Config;
use driftfield_input::{
    Action, ActionResolver, InputBinding, InputMap, KeyboardState, MouseButtonBinding, PointerState,
};
use driftfield_render::{SceneRenderer, init_render_context_blocking};
use driftfield_sim::{Renderer, TickDriver};
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::error::AppError;
use crate::game_loop::GameLoop;
use crate::setup::render_settings;

pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            f64::from(config.window.width),
            f64::from(config.window.height),
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

pub struct AppState {
    config: Config,
    driver: TickDriver,
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
    game_loop: GameLoop,
    keyboard: KeyboardState,
    pointer: PointerState,
    input_map: InputMap,
    /// Set when the loop exits because of an error.
    failure: Option<AppError>,
}

impl AppState {
    pub fn new(config: Config, driver: TickDriver) -> Self {
        let mut input_map = InputMap::default_flight();
        let rejected = input_map.apply_overrides(&config.input.keybindings);
        if !rejected.is_empty() {
            warn!(rejected = ?rejected, "using default bindings for these actions");
        }
        let pointer = PointerState::new(config.window.width, config.window.height);
        Self {
            config,
            driver,
            window: None,
            renderer: None,
            game_loop: GameLoop::new(),
            keyboard: KeyboardState::new(),
            pointer,
            input_map,
            failure: None,
        }
    }

    pub fn driver(&self) -> &TickDriver {
        &self.driver
    }

    /// The error that ended the event loop, if any.
    pub fn take_failure(&mut self) -> Option<AppError> {
        self.failure.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);
        let size = window.inner_size();
        self.pointer.on_resize(size.width, size.height);

        let ctx = init_render_context_blocking(Arc::clone(&window), self.config.window.vsync)?;
        let mut renderer = SceneRenderer::new(ctx, render_settings(&self.config))?;
        renderer.prepare(self.driver.scene())?;
        self.driver.start();

        info!("Window ready at {}x{}", size.width, size.height);
        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn clicks_cycle_texture(&self, button: MouseButton) -> bool {
        MouseButtonBinding::from_winit(button).is_some_and(|b| {
            self.input_map
                .binds(Action::CycleTexture, InputBinding::MouseButton(b))
        })
    }

    /// Run the ticks owed since the last frame, then draw.
    fn redraw(&mut self) -> Result<(), AppError> {
        let input = ActionResolver::resolve(&self.input_map, &self.keyboard, &self.pointer);
        let driver = &mut self.driver;
        let steps = self.game_loop.tick(|| driver.tick(&input));
        if steps > 1 {
            debug!(steps, "caught up");
        }
        if let Some(renderer) = &mut self.renderer {
            renderer.draw(&self.driver.snapshot())?;
        }
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.initialize(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.pointer.on_resize(size.width, size.height);
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
                debug!("Resized to {}x{}", size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(code) = self.keyboard.process_event(&event)
                    && self.input_map.binds(Action::Quit, InputBinding::Key(code))
                {
                    info!("Quit pressed, shutting down");
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if self.pointer.on_button(button, state) && self.clicks_cycle_texture(button) {
                    self.driver.on_click();
                }
            }
            WindowEvent::Focused(false) => {
                self.keyboard.release_all();
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Create an event loop and run `driver` until the window closes.
pub fn run(config: Config, driver: TickDriver) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, driver);
    event_loop.run_app(&mut app)?;
    match app.take_failure() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
