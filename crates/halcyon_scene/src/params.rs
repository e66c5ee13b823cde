//! Shader Parameters
//!
//! A [`ShaderParameterSet`] maps uniform names to typed values. It is written
//! during setup and by the per-frame parameter updater, and read by the render
//! surface when it packs uniforms.

use std::borrow::Cow;

use glam::{Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;

/// A typed shader input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Scalar(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    /// Linear RGB.
    Color(Vec3),
}

impl ParamValue {
    /// Widens the value into a `vec4` slot, padding with zeros (alpha 1 for colors).
    #[must_use]
    pub fn to_vec4(self) -> Vec4 {
        match self {
            Self::Scalar(v) => Vec4::new(v, 0.0, 0.0, 0.0),
            Self::Vec2(v) => v.extend(0.0).extend(0.0),
            Self::Vec3(v) => v.extend(0.0),
            Self::Vec4(v) => v,
            Self::Color(c) => c.extend(1.0),
        }
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec2> for ParamValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Vec3> for ParamValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec4> for ParamValue {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}

/// Named shader inputs of one entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderParameterSet {
    values: FxHashMap<Cow<'static, str>, ParamValue>,
}

impl ShaderParameterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Inserts or replaces a value. Returns the previous value, if any.
    pub fn set(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.values.insert(name.into(), value.into())
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.values.get(name).copied()
    }

    /// Returns the value only if it is a scalar.
    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            ParamValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value only if it is a color.
    #[must_use]
    pub fn color(&self, name: &str) -> Option<Vec3> {
        match self.get(name)? {
            ParamValue::Color(c) => Some(c),
            _ => None,
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.values.remove(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_ref(), *v))
    }
}

/// Converts a `0xRRGGBB` sRGB hex color to linear RGB.
#[must_use]
pub fn color_from_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
