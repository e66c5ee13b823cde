use std::path::{Path, PathBuf};

use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use halcyon_animation::AnimationClip;
use halcyon_core::AssetError;
use halcyon_scene::CubemapData;

use crate::cubemap::{CubemapPaths, FaceImage, assemble_cubemap, decode_face};
use crate::loader::{AssetLoader, LoadedMesh};
use crate::runtime::offload;

/// Loads assets from the local filesystem, relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileAssetLoader {
    root_path: PathBuf,
}

impl Default for FileAssetLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FileAssetLoader {
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root_path.join(path)
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

fn read_face(path: PathBuf) -> BoxFuture<'static, Result<FaceImage, AssetError>> {
    let label = path.display().to_string();
    offload(label.clone(), move || {
        let bytes = std::fs::read(&path).map_err(|e| AssetError::from_io(&label, &e))?;
        decode_face(&bytes, &label)
    })
    .boxed()
}

#[cfg(feature = "gltf")]
fn load_gltf_mesh(path: PathBuf) -> BoxFuture<'static, Result<LoadedMesh, AssetError>> {
    offload(path.display().to_string(), move || crate::gltf_import::load_mesh(&path)).boxed()
}

#[cfg(feature = "gltf")]
fn load_gltf_clip(path: PathBuf) -> BoxFuture<'static, Result<AnimationClip, AssetError>> {
    offload(path.display().to_string(), move || crate::gltf_import::load_clip(&path)).boxed()
}

#[cfg(not(feature = "gltf"))]
fn load_gltf_mesh(path: PathBuf) -> BoxFuture<'static, Result<LoadedMesh, AssetError>> {
    futures::future::ready(Err(AssetError::Format(format!(
        "{}: glTF support is not enabled. Enable it with `features = [\"gltf\"]`",
        path.display()
    ))))
    .boxed()
}

#[cfg(not(feature = "gltf"))]
fn load_gltf_clip(path: PathBuf) -> BoxFuture<'static, Result<AnimationClip, AssetError>> {
    futures::future::ready(Err(AssetError::Format(format!(
        "{}: glTF support is not enabled. Enable it with `features = [\"gltf\"]`",
        path.display()
    ))))
    .boxed()
}

fn unsupported<T: Send + 'static>(path: &Path) -> BoxFuture<'static, Result<T, AssetError>> {
    futures::future::ready(Err(AssetError::Format(format!(
        "{}: unsupported file type",
        path.display()
    ))))
    .boxed()
}

impl AssetLoader for FileAssetLoader {
    fn load_mesh(&self, path: &str) -> BoxFuture<'static, Result<LoadedMesh, AssetError>> {
        let path = self.resolve(path);
        match extension(&path).as_str() {
            "gltf" | "glb" => load_gltf_mesh(path),
            _ => unsupported(&path),
        }
    }

    fn load_animation_clip(&self, path: &str) -> BoxFuture<'static, Result<AnimationClip, AssetError>> {
        let path = self.resolve(path);
        match extension(&path).as_str() {
            "gltf" | "glb" => load_gltf_clip(path),
            _ => unsupported(&path),
        }
    }

    fn load_cubemap(&self, paths: &CubemapPaths) -> BoxFuture<'static, Result<CubemapData, AssetError>> {
        let faces: Vec<_> = paths.faces().iter().map(|p| read_face(self.resolve(p))).collect();

        async move {
            let decoded = try_join_all(faces).await?;
            let faces: [FaceImage; 6] = decoded
                .try_into()
                .map_err(|_| AssetError::InvalidData("Cube map requires 6 faces".to_string()))?;
            let cubemap = assemble_cubemap(faces)?;
            log::info!("Loaded cubemap: {}px faces", cubemap.face_size);
            Ok(cubemap)
        }
        .boxed()
    }
}
