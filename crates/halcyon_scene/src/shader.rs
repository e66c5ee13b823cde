//! Shader programs as content-addressed assets.
//!
//! The viewer never interprets shader code. A [`ShaderProgram`] carries the
//! WGSL source, the ordered list of uniform names the host must supply, and
//! an xxh3 hash of both, which render surfaces use as a pipeline cache key.

use std::borrow::Cow;
use std::sync::Arc;

use xxhash_rust::xxh3::Xxh3;

#[derive(Debug)]
struct ProgramInner {
    label: Cow<'static, str>,
    source: Cow<'static, str>,
    uniforms: Vec<Cow<'static, str>>,
    hash: u64,
}

/// A WGSL program plus the uniform layout it expects.
///
/// Uniforms are packed in declaration order, one `vec4<f32>` per name.
/// Cloning is cheap.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    inner: Arc<ProgramInner>,
}

impl ShaderProgram {
    #[must_use]
    pub fn new<I, S>(
        label: impl Into<Cow<'static, str>>,
        source: impl Into<Cow<'static, str>>,
        uniforms: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        let source = source.into();
        let uniforms: Vec<Cow<'static, str>> = uniforms.into_iter().map(Into::into).collect();

        let mut hasher = Xxh3::new();
        hasher.update(source.as_bytes());
        for name in &uniforms {
            hasher.update(&[0]);
            hasher.update(name.as_bytes());
        }

        Self {
            inner: Arc::new(ProgramInner {
                label: label.into(),
                source,
                uniforms,
                hash: hasher.digest(),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.inner.source
    }

    #[inline]
    #[must_use]
    pub fn uniforms(&self) -> &[Cow<'static, str>] {
        &self.inner.uniforms
    }

    /// Content hash of source and uniform layout. The label is not included.
    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.inner.hash
    }
}

impl PartialEq for ShaderProgram {
    fn eq(&self, other: &Self) -> bool {
        self.hash() == other.hash()
    }
}

impl Eq for ShaderProgram {}
