//! Scene background: a clear color or a six-face cubemap.

use std::sync::Arc;

use glam::{Vec3, Vec4};

/// Cubemap faces in upload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [Self; 6] = [
        Self::PositiveX,
        Self::NegativeX,
        Self::PositiveY,
        Self::NegativeY,
        Self::PositiveZ,
        Self::NegativeZ,
    ];

    /// Conventional file stem of the face image (`px`, `nx`, ...).
    #[must_use]
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::PositiveX => "px",
            Self::NegativeX => "nx",
            Self::PositiveY => "py",
            Self::NegativeY => "ny",
            Self::PositiveZ => "pz",
            Self::NegativeZ => "nz",
        }
    }
}

/// Decoded cubemap: six square RGBA8 faces of equal size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubemapData {
    pub face_size: u32,
    /// RGBA8 pixels per face, in [`CubeFace::ALL`] order.
    pub faces: [Vec<u8>; 6],
}

impl CubemapData {
    /// Mean color over all faces (sRGB-encoded, 0..1).
    #[must_use]
    pub fn average_color(&self) -> Vec3 {
        let mut sum = [0u64; 3];
        let mut count = 0u64;
        for face in &self.faces {
            for px in face.chunks_exact(4) {
                sum[0] += u64::from(px[0]);
                sum[1] += u64::from(px[1]);
                sum[2] += u64::from(px[2]);
                count += 1;
            }
        }
        if count == 0 {
            return Vec3::ZERO;
        }
        let scale = 1.0 / (count as f32 * 255.0);
        Vec3::new(sum[0] as f32, sum[1] as f32, sum[2] as f32) * scale
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// RGBA clear color.
    Color(Vec4),
    Cubemap(Arc<CubemapData>),
}

impl Default for Background {
    fn default() -> Self {
        Self::Color(Vec4::new(0.0, 0.0, 0.0, 1.0))
    }
}

impl Background {
    /// Color a surface without skybox support should clear to.
    #[must_use]
    pub fn clear_color(&self) -> Vec4 {
        match self {
            Self::Color(c) => *c,
            Self::Cubemap(cube) => cube.average_color().extend(1.0),
        }
    }
}
