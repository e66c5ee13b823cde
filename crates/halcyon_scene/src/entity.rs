use std::borrow::Cow;
use std::sync::Arc;

use glam::Vec3;

use crate::mesh::MeshData;
use crate::params::{ParamValue, ShaderParameterSet};
use crate::shader::ShaderProgram;
use crate::transform::Transform;

/// Geometry reference of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Plane {
        width: f32,
        height: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Box {
        size: Vec3,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Externally loaded mesh.
    Mesh(Arc<MeshData>),
}

impl Geometry {
    #[must_use]
    pub fn plane(width: f32, height: f32) -> Self {
        Self::Plane {
            width,
            height,
            width_segments: 1,
            height_segments: 1,
        }
    }

    #[must_use]
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere {
            radius,
            width_segments: 32,
            height_segments: 16,
        }
    }

    /// Local-space extent: plane (w, h, 0), box size, sphere diameter, mesh bounds.
    #[must_use]
    pub fn extent(&self) -> Vec3 {
        match self {
            Self::Plane { width, height, .. } => Vec3::new(*width, *height, 0.0),
            Self::Box { size } => *size,
            Self::Sphere { radius, .. } => Vec3::splat(radius * 2.0),
            Self::Mesh(mesh) if !mesh.bounds.is_empty() => mesh.bounds.size(),
            Self::Mesh(_) => Vec3::ZERO,
        }
    }
}

/// Surface description: an optional custom program and its parameters.
///
/// Without a program the render surface uses its default shading with
/// `color` as the base color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub program: Option<ShaderProgram>,
    pub params: ShaderParameterSet,
}

impl Material {
    /// A plain colored material.
    #[must_use]
    pub fn color(color: Vec3) -> Self {
        Self {
            program: None,
            params: ShaderParameterSet::new().with("color", ParamValue::Color(color)),
        }
    }

    /// A material driven by a custom shader program.
    #[must_use]
    pub fn shader(program: ShaderProgram, params: ShaderParameterSet) -> Self {
        Self {
            program: Some(program),
            params,
        }
    }
}

/// A renderable unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: Cow<'static, str>,
    pub geometry: Geometry,
    pub material: Material,
    pub transform: Transform,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub visible: bool,
}

impl Entity {
    #[must_use]
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            name: Cow::Borrowed("Entity"),
            geometry,
            material,
            transform: Transform::IDENTITY,
            cast_shadow: false,
            receive_shadow: false,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &ShaderParameterSet {
        &self.material.params
    }

    #[inline]
    pub fn params_mut(&mut self) -> &mut ShaderParameterSet {
        &mut self.material.params
    }
}
