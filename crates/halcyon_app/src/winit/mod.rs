//! Winit host.
//!
//! Opens a window, wires its events into a [`ViewerState`] and drives the
//! frame loop from `RedrawRequested`. Each executed frame requests the next
//! redraw through the viewer's redraw hook, so the loop keeps going for as
//! long as the scheduler is running.
//!
//! ```rust,ignore
//! struct Demo;
//!
//! impl ViewerHandler for Demo {
//!     fn init(viewer: &mut ViewerState) -> Self {
//!         presets::basic_lighting(viewer.scene_mut());
//!         Demo
//!     }
//! }
//!
//! fn main() -> halcyon::Result<()> {
//!     App::new().with_title("Demo").run::<Demo>()
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use halcyon_assets::{AssetLoader, FileAssetLoader};
use halcyon_core::{Error, FpsCounter, FrameTime, Result};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::settings::ViewerSettings;
use crate::viewer::ViewerState;

pub mod gpu;

pub use gpu::GpuSurface;

/// Application behavior plugged into the host.
pub trait ViewerHandler: Sized + 'static {
    /// Called once after the window and viewer exist.
    fn init(viewer: &mut ViewerState) -> Self;

    /// Called for each window event before the host handles it. Return
    /// `true` to consume the event.
    #[allow(unused_variables)]
    fn on_event(&mut self, viewer: &mut ViewerState, event: &WindowEvent) -> bool {
        false
    }

    /// Called before every frame with the previous frame's timing.
    #[allow(unused_variables)]
    fn update(&mut self, viewer: &mut ViewerState, last: &FrameTime) {}
}

/// Builder for the windowed viewer.
pub struct App {
    settings: ViewerSettings,
    asset_root: PathBuf,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            settings: ViewerSettings::default(),
            asset_root: PathBuf::from("."),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.settings.title = title.into();
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ViewerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Directory asset paths are resolved against.
    #[must_use]
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Runs the event loop on the current thread until the window closes.
    pub fn run<H: ViewerHandler>(self) -> Result<()> {
        let event_loop = EventLoop::new().map_err(|e| Error::EventLoop(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let loader: Arc<dyn AssetLoader> = Arc::new(FileAssetLoader::new(&self.asset_root));
        let mut runner = AppRunner::<H>::new(self.settings, loader);
        event_loop
            .run_app(&mut runner)
            .map_err(|e| Error::EventLoop(e.to_string()))
    }
}

struct AppRunner<H: ViewerHandler> {
    settings: ViewerSettings,
    loader: Arc<dyn AssetLoader>,

    window: Option<Arc<Window>>,
    viewer: Option<ViewerState>,
    user_state: Option<H>,

    fps: FpsCounter,
}

impl<H: ViewerHandler> AppRunner<H> {
    fn new(settings: ViewerSettings, loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            settings,
            loader,
            window: None,
            viewer: None,
            user_state: None,
            fps: FpsCounter::new(),
        }
    }

    fn create_viewer(&self, window: &Arc<Window>) -> Result<ViewerState> {
        log::info!("Initializing GPU surface...");
        let surface = pollster::block_on(GpuSurface::new(Arc::clone(window), self.settings.vsync))?;

        let size = window.inner_size().to_logical::<u32>(window.scale_factor());
        let settings = self.settings.clone().with_size(size.width, size.height);

        let mut viewer = ViewerState::new(settings, Box::new(surface), Arc::clone(&self.loader))?;
        viewer.set_scale_factor(window.scale_factor() as f32);

        let redraw_target = Arc::clone(window);
        viewer.set_redraw_hook(move || redraw_target.request_redraw());
        Ok(viewer)
    }

    fn run_frame(&mut self) {
        let (Some(viewer), Some(user_state)) = (&mut self.viewer, &mut self.user_state) else {
            return;
        };

        let last = viewer.clock().latest();
        user_state.update(viewer, &last);

        if let Some(time) = viewer.frame()
            && let Some(fps) = self.fps.update(time.delta)
        {
            log::info!("FPS: {fps:.1}");
        }
    }
}

impl<H: ViewerHandler> ApplicationHandler for AppRunner<H> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(&self.settings.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                f64::from(self.settings.width),
                f64::from(self.settings.height),
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut viewer = match self.create_viewer(&window) {
            Ok(viewer) => viewer,
            Err(e) => {
                log::error!("Fatal: {e}");
                event_loop.exit();
                return;
            }
        };

        self.user_state = Some(H::init(&mut viewer));
        self.viewer = Some(viewer);
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let (Some(window), Some(viewer), Some(user_state)) =
            (&self.window, &mut self.viewer, &mut self.user_state)
        else {
            return;
        };

        if user_state.on_event(viewer, &event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                viewer.dispose();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let logical = physical_size.to_logical::<u32>(window.scale_factor());
                viewer.resize(logical.width, logical.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                viewer.set_scale_factor(scale_factor as f32);
            }
            WindowEvent::RedrawRequested => self.run_frame(),
            _ => {}
        }
    }
}
