//! Time-driven shader parameters.
//!
//! Each binding pairs an entity with a [`ShaderMode`]. Once per frame the
//! updater writes the mode's value for the current elapsed time into the
//! entity's parameter set.

use std::borrow::Cow;

use glam::Vec3;
use halcyon_scene::{EntityKey, ParamValue, SceneState};

/// Parameter the oscillation mode writes unless told otherwise.
pub const DEFAULT_COLOR_PARAM: &str = "sphereColor";
/// Parameter the elapsed-time mode writes unless told otherwise.
pub const DEFAULT_TIME_PARAM: &str = "timeElapsed";

/// Interpolation factor of the color oscillation: `0.5 + 0.5 * sin(elapsed)`.
#[inline]
#[must_use]
pub fn oscillation_factor(elapsed: f32) -> f32 {
    0.5 + 0.5 * elapsed.sin()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShaderMode {
    /// Color swinging between two endpoints with a period of 2π seconds.
    ColorOscillation {
        from: Vec3,
        to: Vec3,
        param: Cow<'static, str>,
    },
    /// Seconds since start, forwarded as is.
    ElapsedTime { param: Cow<'static, str> },
}

impl ShaderMode {
    #[must_use]
    pub fn color_oscillation(from: Vec3, to: Vec3) -> Self {
        Self::ColorOscillation {
            from,
            to,
            param: Cow::Borrowed(DEFAULT_COLOR_PARAM),
        }
    }

    #[must_use]
    pub fn elapsed_time() -> Self {
        Self::ElapsedTime {
            param: Cow::Borrowed(DEFAULT_TIME_PARAM),
        }
    }

    /// Overrides the target parameter name.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        match &mut self {
            Self::ColorOscillation { param, .. } | Self::ElapsedTime { param } => *param = name.into(),
        }
        self
    }

    #[must_use]
    pub fn param(&self) -> &str {
        self.param_key()
    }

    fn param_key(&self) -> &Cow<'static, str> {
        match self {
            Self::ColorOscillation { param, .. } | Self::ElapsedTime { param } => param,
        }
    }

    /// Value of this mode at `elapsed` seconds.
    #[must_use]
    pub fn evaluate(&self, elapsed: f32) -> ParamValue {
        match self {
            Self::ColorOscillation { from, to, .. } => {
                ParamValue::Color(from.lerp(*to, oscillation_factor(elapsed)))
            }
            Self::ElapsedTime { .. } => ParamValue::Scalar(elapsed),
        }
    }
}

#[derive(Debug, Default)]
pub struct ShaderParameterUpdater {
    bindings: Vec<(EntityKey, ShaderMode)>,
}

impl ShaderParameterUpdater {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, entity: EntityKey, mode: ShaderMode) {
        self.bindings.push((entity, mode));
    }

    /// Removes every binding of `entity`. Returns how many were removed.
    pub fn unbind(&mut self, entity: EntityKey) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|(key, _)| *key != entity);
        before - self.bindings.len()
    }

    #[must_use]
    pub fn bindings(&self) -> &[(EntityKey, ShaderMode)] {
        &self.bindings
    }

    /// Writes every bound parameter for `elapsed` seconds.
    ///
    /// Bindings whose entity has been removed are skipped.
    pub fn update(&self, elapsed: f32, scene: &mut SceneState) {
        for (key, mode) in &self.bindings {
            let Some(entity) = scene.entity_mut(*key) else {
                continue;
            };
            entity
                .params_mut()
                .set(mode.param_key().clone(), mode.evaluate(elapsed));
        }
    }
}
