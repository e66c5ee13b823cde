//! Halcyon Core
//!
//! Foundational pieces shared by every other crate of the viewer:
//!
//! - [`Clock`]: monotonic frame clock returning `(elapsed, delta)` per tick
//! - [`errors`]: the error taxonomy and the crate-wide [`Result`] alias
//! - [`FpsCounter`]: frame rate measurement for host loops

pub mod clock;
pub mod errors;
pub mod fps_counter;

pub use clock::{Clock, FrameTime, ManualTime, MonotonicTime, TimeSource};
pub use errors::{AssetError, Error, Result};
pub use fps_counter::FpsCounter;
