use glam::Vec3;

/// Axis-aligned bounds in mesh space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Geometry produced by an external asset pipeline.
///
/// The viewer treats it as an opaque blob; only summary data is kept for
/// logging and framing.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertex_count: usize,
    pub index_count: usize,
    pub primitive_count: usize,
    pub bounds: BoundingBox,
}

impl MeshData {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertex_count: 0,
            index_count: 0,
            primitive_count: 0,
            bounds: BoundingBox::EMPTY,
        }
    }
}
