use futures::future::BoxFuture;
use halcyon_animation::{AnimationClip, Skeleton};
use halcyon_core::AssetError;
use halcyon_scene::{CubemapData, MeshData};

use crate::cubemap::CubemapPaths;

/// Result of a mesh load: geometry summary plus whatever rig and clips the
/// file carried.
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    pub mesh: MeshData,
    pub skeleton: Option<Skeleton>,
    pub clips: Vec<AnimationClip>,
}

impl LoadedMesh {
    #[must_use]
    pub fn new(mesh: MeshData) -> Self {
        Self {
            mesh,
            skeleton: None,
            clips: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_skeleton(mut self, skeleton: Skeleton) -> Self {
        self.skeleton = Some(skeleton);
        self
    }
}

/// Source of asynchronously loaded assets.
///
/// Returned futures own everything they need, so they can be polled after
/// the loader itself is gone.
pub trait AssetLoader: Send + Sync {
    fn load_mesh(&self, path: &str) -> BoxFuture<'static, Result<LoadedMesh, AssetError>>;

    fn load_animation_clip(&self, path: &str) -> BoxFuture<'static, Result<AnimationClip, AssetError>>;

    fn load_cubemap(&self, paths: &CubemapPaths) -> BoxFuture<'static, Result<CubemapData, AssetError>>;
}
