use std::path::{Path, PathBuf};

use halcyon_core::AssetError;
use halcyon_scene::{CubeFace, CubemapData};

/// The six face images of a cubemap in `[+x, -x, +y, -y, +z, -z]` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubemapPaths {
    faces: [PathBuf; 6],
}

impl CubemapPaths {
    #[must_use]
    pub fn new(faces: [PathBuf; 6]) -> Self {
        Self { faces }
    }

    /// `dir/px.ext`, `dir/nx.ext`, ... `dir/nz.ext`.
    #[must_use]
    pub fn from_directory(dir: impl AsRef<Path>, ext: &str) -> Self {
        let dir = dir.as_ref();
        let ext = ext.trim_start_matches('.');
        Self {
            faces: CubeFace::ALL.map(|face| dir.join(format!("{}.{ext}", face.file_stem()))),
        }
    }

    #[must_use]
    pub fn face(&self, face: CubeFace) -> &Path {
        let index = CubeFace::ALL.iter().position(|f| *f == face).unwrap_or(0);
        &self.faces[index]
    }

    #[must_use]
    pub fn faces(&self) -> &[PathBuf; 6] {
        &self.faces
    }
}

/// One decoded RGBA8 face image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decodes an encoded image (PNG, JPEG, HDR) into RGBA8.
pub fn decode_face(bytes: &[u8], label: &str) -> Result<FaceImage, AssetError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| AssetError::Format(format!("{label}: {e}")))?;
    let rgba = image.to_rgba8();
    Ok(FaceImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// Combines six decoded faces, requiring square faces of one shared size.
pub fn assemble_cubemap(faces: [FaceImage; 6]) -> Result<CubemapData, AssetError> {
    let size = faces[0].width;
    if size == 0 {
        return Err(AssetError::InvalidData("Cube map face is empty".to_string()));
    }
    if faces.iter().any(|f| f.width != size || f.height != size) {
        return Err(AssetError::InvalidData(
            "Cube map images must be square and have same dimensions".to_string(),
        ));
    }
    let expected = (size as usize) * (size as usize) * 4;
    if faces.iter().any(|f| f.rgba.len() != expected) {
        return Err(AssetError::InvalidData(
            "Cube map face data does not match its dimensions".to_string(),
        ));
    }

    Ok(CubemapData {
        face_size: size,
        faces: faces.map(|f| f.rgba),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(size: u32) -> FaceImage {
        FaceImage {
            width: size,
            height: size,
            rgba: vec![255; (size * size * 4) as usize],
        }
    }

    #[test]
    fn mismatched_face_is_rejected() {
        let mut faces = [face(4), face(4), face(4), face(4), face(4), face(4)];
        faces[3] = face(2);
        assert!(matches!(assemble_cubemap(faces), Err(AssetError::InvalidData(_))));
    }

    #[test]
    fn garbage_bytes_are_a_format_error() {
        assert!(matches!(decode_face(b"not an image", "px.png"), Err(AssetError::Format(_))));
    }
}
