//! Viewport Tests
//!
//! Tests for:
//! - camera aspect tracking on resize
//! - physical size from logical size and pixel density
//! - collapsed (zero-sized) windows

use glam::UVec2;

use halcyon::app::ViewportManager;
use halcyon::scene::Camera;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn camera() -> Camera {
    Camera::new_perspective(60.0, 1.0, 1.0, 1000.0)
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn resize_updates_aspect_and_physical_size() {
    let mut camera = camera();
    let mut viewport = ViewportManager::new(100, 100, 1.0);

    let physical = viewport.on_resize(800, 600, &mut camera);
    assert_eq!(physical, Some(UVec2::new(800, 600)));
    assert!(approx(camera.aspect(), 800.0 / 600.0));
    assert_eq!(viewport.logical_size(), UVec2::new(800, 600));
}

#[test]
fn resize_recomputes_projection_eagerly() {
    let mut camera = camera();
    let before = camera.projection_matrix();
    let mut viewport = ViewportManager::new(100, 100, 1.0);

    viewport.on_resize(1920, 1080, &mut camera);
    assert_ne!(camera.projection_matrix(), before);

    let mut expected = camera.clone();
    expected.update_projection_matrix();
    assert_eq!(camera.projection_matrix(), expected.projection_matrix());
}

#[test]
fn zero_height_keeps_previous_aspect() {
    let mut camera = camera();
    let mut viewport = ViewportManager::new(800, 600, 1.0);
    viewport.on_resize(800, 600, &mut camera);

    assert_eq!(viewport.on_resize(800, 0, &mut camera), None);
    assert!(approx(camera.aspect(), 800.0 / 600.0));
    assert!(camera.aspect().is_finite());
    assert_eq!(viewport.physical_size(), UVec2::new(800, 600));
}

#[test]
fn zero_sized_initial_window_falls_back_to_one_pixel() {
    let viewport = ViewportManager::new(0, 0, 1.0);
    assert_eq!(viewport.physical_size(), UVec2::ONE);
}

#[test]
fn collapse_then_restore() {
    let mut camera = camera();
    let mut viewport = ViewportManager::new(800, 600, 1.0);

    let sizes: Vec<_> = [(800, 600), (0, 0), (1920, 1080)]
        .into_iter()
        .filter_map(|(w, h)| viewport.on_resize(w, h, &mut camera))
        .collect();

    assert_eq!(sizes, vec![UVec2::new(800, 600), UVec2::new(1920, 1080)]);
    assert!(approx(camera.aspect(), 1920.0 / 1080.0));
}

// ============================================================================
// Pixel Density
// ============================================================================

#[test]
fn density_is_reapplied_on_every_resize() {
    let mut camera = camera();
    let mut viewport = ViewportManager::new(800, 600, 2.0);
    assert_eq!(viewport.physical_size(), UVec2::new(1600, 1200));

    assert_eq!(viewport.on_resize(640, 480, &mut camera), Some(UVec2::new(1280, 960)));
    assert!(approx(camera.aspect(), 640.0 / 480.0));
}

#[test]
fn density_change_reconfigures_from_last_logical_size() {
    let mut camera = camera();
    let mut viewport = ViewportManager::new(800, 600, 1.0);
    viewport.on_resize(1000, 500, &mut camera);

    assert_eq!(viewport.set_scale_factor(1.5), Some(UVec2::new(1500, 750)));
    assert!(approx(viewport.scale_factor(), 1.5));
    assert!(approx(camera.aspect(), 2.0), "density must not change aspect");
}

#[test]
fn density_change_while_collapsed_is_deferred() {
    let mut camera = camera();
    let mut viewport = ViewportManager::new(800, 600, 1.0);
    viewport.on_resize(0, 600, &mut camera);

    assert_eq!(viewport.set_scale_factor(2.0), None);
    assert_eq!(viewport.on_resize(400, 300, &mut camera), Some(UVec2::new(800, 600)));
}
