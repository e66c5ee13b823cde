use glam::Vec3;

/// Orthographic extents of a directional light's shadow camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowBounds {
    pub near: f32,
    pub far: f32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for ShadowBounds {
    fn default() -> Self {
        Self {
            near: 0.5,
            far: 500.0,
            left: -5.0,
            right: 5.0,
            top: 5.0,
            bottom: -5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowConfig {
    pub bias: f32,
    pub map_size: u32,
    pub bounds: ShadowBounds,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            bias: 0.0,
            map_size: 512,
            bounds: ShadowBounds::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub target: Vec3,
    /// `Some` when the light casts shadows.
    pub shadow: Option<ShadowConfig>,
}

impl DirectionalLight {
    /// Unit vector pointing from the light towards its target.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional(DirectionalLight),
    Ambient,
}

/// A light entity. Static after setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Linear RGB.
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32, position: Vec3, target: Vec3) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional(DirectionalLight {
                position,
                target,
                shadow: None,
            }),
        }
    }

    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Ambient,
        }
    }

    /// Enables shadow casting. Has no effect on ambient lights.
    #[must_use]
    pub fn with_shadow(mut self, config: ShadowConfig) -> Self {
        if let LightKind::Directional(dir) = &mut self.kind {
            dir.shadow = Some(config);
        } else {
            log::warn!("Ambient lights cannot cast shadows; shadow config ignored");
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn casts_shadow(&self) -> bool {
        matches!(self.kind, LightKind::Directional(DirectionalLight { shadow: Some(_), .. }))
    }
}
