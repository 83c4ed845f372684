//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default lower zoom bound.
pub const MIN_ZOOM: f64 = 0.1;
/// Default upper zoom bound.
pub const MAX_ZOOM: f64 = 5.0;
/// Default additive zoom step for zoom in/out commands.
pub const ZOOM_STEP: f64 = 0.1;

/// Camera manages the view transform for the canvas.
///
/// `to_screen(p) = p * zoom + pan` and `to_world(s) = (s - pan) / zoom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset in screen pixels.
    pub pan: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
    /// Additive step used by `zoom_in`/`zoom_out`.
    pub zoom_step: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom zoom bounds.
    pub fn with_bounds(min_zoom: f64, max_zoom: f64, zoom_step: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            zoom_step,
            ..Self::default()
        }
    }

    /// Get the affine transform that maps world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan)
    }

    /// Convert a world point to screen coordinates.
    pub fn to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.zoom + self.pan.x,
            world_point.y * self.zoom + self.pan.y,
        )
    }

    /// Convert a screen point to world coordinates.
    pub fn to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.pan.x) / self.zoom,
            (screen_point.y - self.pan.y) / self.zoom,
        )
    }

    /// Convert a length in screen pixels to world units at the current zoom.
    pub fn screen_len(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Set the zoom level, clamped to the allowed range. A non-finite or
    /// non-positive zoom falls back to 1.
    pub fn set_zoom(&mut self, zoom: f64) {
        let zoom = if zoom.is_finite() && zoom > 0.0 {
            zoom
        } else {
            log::warn!("unusable zoom {zoom}; using 1");
            1.0
        };
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Step the zoom up by the fixed increment.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.zoom_step);
    }

    /// Step the zoom down by the fixed increment.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.zoom_step);
    }

    /// Zoom the camera, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.to_world(screen_point);
        self.zoom = new_zoom;

        // Re-anchor so the world point under the cursor stays put.
        self.pan = Vec2::new(
            screen_point.x - world_point.x * self.zoom,
            screen_point.y - world_point.y * self.zoom,
        );
    }

    /// Reset camera to zoom 1 with no pan.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Fit the camera to show the given bounding box with a margin.
    ///
    /// Never zooms in past 100%.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, margin: f64) {
        if bounds.width() <= 0.0 && bounds.height() <= 0.0 {
            self.zoom = 1.0;
        } else {
            let available = Size::new(
                (viewport.width - margin * 2.0).max(1.0),
                (viewport.height - margin * 2.0).max(1.0),
            );
            let scale_x = available.width / bounds.width().max(f64::EPSILON);
            let scale_y = available.height / bounds.height().max(f64::EPSILON);
            self.zoom = scale_x.min(scale_y).min(1.0).clamp(self.min_zoom, self.max_zoom);
        }

        let bounds_center = bounds.center();
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        self.pan = Vec2::new(
            viewport_center.x - bounds_center.x * self.zoom,
            viewport_center.y - bounds_center.y * self.zoom,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.pan, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_to_world_identity() {
        let camera = Camera::new();
        let screen = Point::new(100.0, 200.0);
        let world = camera.to_world(screen);
        assert!((world.x - screen.x).abs() < f64::EPSILON);
        assert!((world.y - screen.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_to_world_with_pan_and_zoom() {
        let mut camera = Camera::new();
        camera.pan = Vec2::new(50.0, 100.0);
        camera.zoom = 2.0;
        let world = camera.to_world(Point::new(150.0, 300.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_transform_matches_to_screen() {
        let mut camera = Camera::new();
        camera.pan = Vec2::new(30.0, -20.0);
        camera.zoom = 1.5;
        let p = Point::new(12.0, 34.0);
        let a = camera.transform() * p;
        let b = camera.to_screen(p);
        assert!((a.x - b.x).abs() < 1e-10);
        assert!((a.y - b.y).abs() < 1e-10);
        let back = camera.inverse_transform() * b;
        assert!((back.x - p.x).abs() < 1e-10);
        assert!((back.y - p.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom_at(Point::ZERO, 0.001);
        assert!((camera.zoom - MIN_ZOOM).abs() < f64::EPSILON);

        camera.zoom_at(Point::ZERO, 1000.0);
        assert!((camera.zoom - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unusable_zoom_falls_back_to_one() {
        let mut camera = Camera::new();
        camera.set_zoom(f64::NAN);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
        camera.set_zoom(2.0);
        camera.set_zoom(-3.0);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
        camera.set_zoom(f64::INFINITY);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
        camera.zoom_at(Point::new(10.0, 10.0), f64::NAN);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
        assert_eq!(camera.pan, Vec2::ZERO);
    }

    #[test]
    fn test_zoom_at_keeps_cursor_fixed() {
        let mut camera = Camera::new();
        camera.pan = Vec2::new(13.0, -7.0);
        let cursor = Point::new(320.0, 240.0);
        let before = camera.to_world(cursor);
        camera.zoom_at(cursor, 1.1);
        let after = camera.to_world(cursor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_steps() {
        let mut camera = Camera::new();
        camera.zoom_in();
        assert!((camera.zoom - 1.1).abs() < 1e-9);
        camera.zoom_out();
        camera.zoom_out();
        assert!((camera.zoom - 0.9).abs() < 1e-9);
        camera.reset();
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
        assert_eq!(camera.pan, Vec2::ZERO);
    }

    #[test]
    fn test_fit_never_exceeds_one() {
        let mut camera = Camera::new();
        camera.fit_to_bounds(Rect::new(0.0, 0.0, 10.0, 10.0), Size::new(800.0, 600.0), 80.0);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
        // Centered
        let center = camera.to_screen(Point::new(5.0, 5.0));
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_large_scene_with_margin() {
        let mut camera = Camera::new();
        camera.fit_to_bounds(Rect::new(0.0, 0.0, 2000.0, 1000.0), Size::new(800.0, 600.0), 80.0);
        // (800 - 160) / 2000 = 0.32 vs (600 - 160) / 1000 = 0.44
        assert!((camera.zoom - 0.32).abs() < 1e-9);
        let top_left = camera.to_screen(Point::new(0.0, 0.0));
        assert!((top_left.x - 80.0).abs() < 1e-9);
    }
}
