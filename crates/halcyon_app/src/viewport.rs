//! Output surface sizing and camera aspect.

use glam::UVec2;
use halcyon_scene::Camera;

/// Tracks the logical window size and the device pixel density, and derives
/// the physical size the render surface is configured with.
///
/// Every resize reapplies the current density. A zero dimension never
/// reaches the surface and never changes the camera's aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportManager {
    logical_size: UVec2,
    scale_factor: f32,
    physical_size: UVec2,
}

impl ViewportManager {
    #[must_use]
    pub fn new(width: u32, height: u32, scale_factor: f32) -> Self {
        let scale_factor = sanitize_scale(scale_factor, 1.0);
        let logical_size = UVec2::new(width, height);
        Self {
            logical_size,
            scale_factor,
            physical_size: to_physical(logical_size, scale_factor).unwrap_or(UVec2::ONE),
        }
    }

    #[inline]
    #[must_use]
    pub fn logical_size(&self) -> UVec2 {
        self.logical_size
    }

    /// Size of the last configured output buffer, never zero in either axis.
    #[inline]
    #[must_use]
    pub fn physical_size(&self) -> UVec2 {
        self.physical_size
    }

    #[inline]
    #[must_use]
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Handles a window resize given in logical pixels.
    ///
    /// Updates the camera projection and returns the new physical size to
    /// configure the surface with, or `None` when the window is collapsed.
    pub fn on_resize(&mut self, width: u32, height: u32, camera: &mut Camera) -> Option<UVec2> {
        self.logical_size = UVec2::new(width, height);

        if width == 0 || height == 0 {
            log::debug!(
                "Viewport collapsed to {width}x{height}; keeping aspect {}",
                camera.aspect()
            );
            return None;
        }

        camera.set_aspect(width as f32 / height as f32);
        self.apply_scale()
    }

    /// Handles a device pixel density change. The logical size is unchanged.
    pub fn set_scale_factor(&mut self, scale_factor: f32) -> Option<UVec2> {
        let sanitized = sanitize_scale(scale_factor, self.scale_factor);
        if sanitized != scale_factor {
            log::debug!("Rejected scale factor {scale_factor}; keeping {sanitized}");
        }
        self.scale_factor = sanitized;
        self.apply_scale()
    }

    fn apply_scale(&mut self) -> Option<UVec2> {
        let physical = to_physical(self.logical_size, self.scale_factor)?;
        self.physical_size = physical;
        Some(physical)
    }
}

fn to_physical(logical: UVec2, scale_factor: f32) -> Option<UVec2> {
    if logical.x == 0 || logical.y == 0 {
        return None;
    }
    let scaled = (logical.as_vec2() * scale_factor).round().as_uvec2();
    Some(scaled.max(UVec2::ONE))
}

fn sanitize_scale(scale_factor: f32, fallback: f32) -> f32 {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        fallback
    }
}
