//! Camera for pan/zoom between scene coordinates and viewport pixels.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Hard zoom range.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Additive step per scroll-wheel notch, and the wheel's own ceiling.
pub const WHEEL_ZOOM_STEP: f64 = 0.1;
pub const WHEEL_ZOOM_MAX: f64 = 3.0;

/// Multiplicative factor for the zoom in/out buttons.
pub const BUTTON_ZOOM_FACTOR: f64 = 1.25;

/// Padding and zoom ceiling when fitting all content.
pub const FIT_CONTENT_PADDING: f64 = 50.0;
pub const FIT_CONTENT_MAX_ZOOM: f64 = 2.0;

/// Padding and zoom ceiling when fitting the current selection.
pub const FIT_SELECTION_PADDING: f64 = 100.0;
pub const FIT_SELECTION_MAX_ZOOM: f64 = 3.0;

/// Camera state: pixel offset of the scene origin plus a uniform zoom.
///
/// A scene point `p` lands on the viewport at `p * zoom + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Viewport position of the scene origin, in pixels.
    pub offset: Vec2,
    /// Uniform scale factor.
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }

    /// Scene-to-viewport transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Convert a viewport pixel position to scene coordinates.
    pub fn to_scene(&self, pixel: Point) -> Point {
        Point::new(
            (pixel.x - self.offset.x) / self.zoom,
            (pixel.y - self.offset.y) / self.zoom,
        )
    }

    /// Convert a scene position to viewport pixels.
    pub fn to_pixel(&self, scene: Point) -> Point {
        Point::new(
            scene.x * self.zoom + self.offset.x,
            scene.y * self.zoom + self.offset.y,
        )
    }

    /// Pan by a pixel delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set the zoom, clamped to the hard range. The scene origin's pixel
    /// position is unchanged.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Zoom to `new_zoom` keeping the scene point under `pixel` fixed.
    pub fn zoom_about(&mut self, pixel: Point, new_zoom: f64) {
        let anchor = self.to_scene(pixel);
        self.zoom = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset = pixel.to_vec2() - anchor.to_vec2() * self.zoom;
    }

    /// Scroll-wheel zoom: one additive step per notch, anchored at the
    /// cursor, with its own lower ceiling.
    pub fn zoom_wheel(&mut self, cursor: Point, direction: f64) {
        let step = WHEEL_ZOOM_STEP * direction.signum();
        let target = (self.zoom + step).clamp(MIN_ZOOM, WHEEL_ZOOM_MAX);
        self.zoom_about(cursor, target);
    }

    /// Zoom-in button: multiplicative, not anchored.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * BUTTON_ZOOM_FACTOR);
    }

    /// Zoom-out button: multiplicative, not anchored.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / BUTTON_ZOOM_FACTOR);
    }

    /// Center `bounds` in the viewport at the largest zoom that fits with
    /// `padding` pixels on every side, capped at `max_zoom`.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64, max_zoom: f64) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return;
        }
        let available_w = (viewport.width - 2.0 * padding).max(1.0);
        let available_h = (viewport.height - 2.0 * padding).max(1.0);
        let scale_x = available_w / bounds.width();
        let scale_y = available_h / bounds.height();
        self.zoom = scale_x.min(scale_y).clamp(MIN_ZOOM, max_zoom);

        let center = bounds.center();
        self.offset = Vec2::new(
            viewport.width / 2.0 - center.x * self.zoom,
            viewport.height / 2.0 - center.y * self.zoom,
        );
    }

    /// Reset to the identity view.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}
