use glam::{Mat4, Vec3};

/// Smallest aspect ratio a camera accepts.
pub const MIN_ASPECT: f32 = f32::EPSILON;

/// Perspective camera with an eagerly cached projection matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov: f32,
    aspect: f32,
    pub near: f32,
    pub far: f32,

    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,

    projection_matrix: Mat4,
}

impl Camera {
    /// Creates a perspective camera. `fov_degrees` is the vertical field of view.
    #[must_use]
    pub fn new_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov: fov_degrees.to_radians(),
            aspect: sanitize_aspect(aspect, 1.0),
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            projection_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    #[inline]
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Sets the aspect ratio and recomputes the projection.
    ///
    /// Non-finite or non-positive values keep the current aspect ratio.
    pub fn set_aspect(&mut self, aspect: f32) {
        let sanitized = sanitize_aspect(aspect, self.aspect);
        if sanitized != aspect {
            log::debug!("Rejected aspect ratio {aspect}; keeping {sanitized}");
        }
        self.aspect = sanitized;
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        // glam's perspective_rh targets the wgpu/Vulkan [0, 1] depth range
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix()
    }
}

fn sanitize_aspect(aspect: f32, fallback: f32) -> f32 {
    if aspect.is_finite() && aspect >= MIN_ASPECT {
        aspect
    } else if fallback.is_finite() && fallback >= MIN_ASPECT {
        fallback
    } else {
        1.0
    }
}
