//! Error Types
//!
//! The viewer distinguishes three classes of failure:
//!
//! - **Fatal initialization** ([`Error::SurfaceUnavailable`]): returned from
//!   construction; the frame loop is never started.
//! - **Asset load failures** ([`AssetError`]): reported and logged; the
//!   dependent component stays in its last valid state.
//! - **Degenerate viewports** are clamped and never surface as errors.
//!
//! All fallible public APIs return [`Result<T>`].

use thiserror::Error;

/// The main error type of the viewer.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Initialization Errors
    // ========================================================================
    /// No render surface could be created or configured.
    #[error("Render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The windowing backend failed.
    #[error("Window system error: {0}")]
    Window(String),

    /// The host event loop could not be created or exited abnormally.
    #[error("Event loop error: {0}")]
    EventLoop(String),

    // ========================================================================
    // Asset Errors
    // ========================================================================
    #[error(transparent)]
    Asset(#[from] AssetError),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Asynchronous asset load failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The requested asset does not exist.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The asset exists but could not be decoded.
    #[error("Asset format error: {0}")]
    Format(String),

    /// The asset decoded but its content is unusable.
    #[error("Invalid asset data: {0}")]
    InvalidData(String),

    /// Reading the asset failed.
    #[error("Asset IO error: {0}")]
    Io(String),

    /// The load was cancelled before completing.
    #[error("Asset load cancelled: {0}")]
    Cancelled(String),
}

impl AssetError {
    /// Maps an I/O error for `path`, keeping "not found" distinguishable.
    #[must_use]
    pub fn from_io(path: &str, err: &std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_string())
        } else {
            Self::Io(format!("{path}: {err}"))
        }
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
