//! Halcyon App
//!
//! Ties the viewer together:
//!
//! - [`ViewerState`]: aggregate root owning clock, scene, camera, animation
//!   and loading, with the per-frame update sequence
//! - [`ViewportManager`]: logical/physical output size and camera aspect
//! - [`ShaderParameterUpdater`]: time-driven shader inputs
//! - [`FrameScheduler`]: run / pause / stop lifecycle
//! - [`RenderSurface`]: output abstraction, with [`HeadlessSurface`] for
//!   tests and a wgpu surface behind the `winit` feature
//! - [`ViewerSettings`] and [`init_logging`]

pub mod presets;
pub mod scheduler;
pub mod settings;
pub mod shader_params;
pub mod surface;
pub mod viewer;
pub mod viewport;

#[cfg(feature = "winit")]
pub mod winit;

pub use scheduler::{FrameScheduler, SchedulerState};
pub use settings::{PlaybackLoop, ViewerSettings, init_logging};
pub use shader_params::{
    DEFAULT_COLOR_PARAM, DEFAULT_TIME_PARAM, ShaderMode, ShaderParameterUpdater, oscillation_factor,
};
pub use surface::{FrameRecord, FrameView, HeadlessSurface, RenderSurface};
pub use viewer::ViewerState;
pub use viewport::ViewportManager;
