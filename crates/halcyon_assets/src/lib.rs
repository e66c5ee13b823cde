//! Asset Loading
//!
//! - [`AssetLoader`]: the collaborator the viewer requests meshes, clips and
//!   cubemaps from; [`FileAssetLoader`] reads them from disk
//! - [`LoadTasks`]: cooperative executor the frame loop polls
//! - [`CompletionQueue`]: hands finished loads back to the frame thread
//!
//! File reads and decoding run on a shared tokio blocking pool so they never
//! stall a frame.

pub mod completion;
pub mod cubemap;
pub mod file;
#[cfg(feature = "gltf")]
pub mod gltf_import;
pub mod loader;
mod runtime;
pub mod tasks;

pub use completion::{CompletionQueue, CompletionSender, LoadCompletion, RequestId};
pub use cubemap::{CubemapPaths, FaceImage, assemble_cubemap, decode_face};
pub use file::FileAssetLoader;
pub use loader::{AssetLoader, LoadedMesh};
pub use tasks::LoadTasks;
