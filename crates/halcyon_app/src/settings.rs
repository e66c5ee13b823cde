//! Viewer configuration.
//!
//! ```rust,ignore
//! let settings = ViewerSettings::default()
//!     .with_title("Fractal")
//!     .with_size(1280, 720);
//!
//! // or from JSON, every field optional:
//! let settings = ViewerSettings::from_json_str(r#"{ "vsync": false, "time_scale": 0.5 }"#)?;
//! ```

use std::path::Path;

use glam::Vec4;
use halcyon_animation::LoopMode;
use halcyon_core::Result;
use serde::Deserialize;

/// Loop behavior of animation playback, as written in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackLoop {
    Once,
    #[default]
    Loop,
    PingPong,
}

impl From<PlaybackLoop> for LoopMode {
    fn from(value: PlaybackLoop) -> Self {
        match value {
            PlaybackLoop::Once => Self::Once,
            PlaybackLoop::Loop => Self::Loop,
            PlaybackLoop::PingPong => Self::PingPong,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Window title (winit host only).
    pub title: String,
    /// Initial logical window size.
    pub width: u32,
    pub height: u32,
    /// Present with vertical sync.
    pub vsync: bool,
    /// RGBA clear color used until a background is set.
    pub clear_color: [f32; 4],
    /// Multiplier applied to animation playback.
    pub time_scale: f32,
    /// Start animation playback as soon as mesh and clip are both loaded.
    pub auto_play: bool,
    pub loop_mode: PlaybackLoop,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            title: "Halcyon Viewer".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            time_scale: 1.0,
            auto_play: true,
            loop_mode: PlaybackLoop::Loop,
        }
    }
}

impl ViewerSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&text)?;
        log::info!("Loaded viewer settings from {}", path.as_ref().display());
        Ok(settings)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    #[must_use]
    pub fn with_clear_color(mut self, color: Vec4) -> Self {
        self.clear_color = color.to_array();
        self
    }

    #[must_use]
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    #[must_use]
    pub fn with_auto_play(mut self, auto_play: bool) -> Self {
        self.auto_play = auto_play;
        self
    }

    #[must_use]
    pub fn with_loop_mode(mut self, loop_mode: PlaybackLoop) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    #[inline]
    #[must_use]
    pub fn clear_color(&self) -> Vec4 {
        Vec4::from_array(self.clear_color)
    }
}

/// Initializes `env_logger` with an `info` default; `RUST_LOG` overrides it.
///
/// Safe to call more than once.
pub fn init_logging() {
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
    if result.is_ok() {
        log::debug!("Logging initialized");
    }
}
