//! Rectangle element.

use super::{ElementId, ElementTrait, Style};
use kurbo::{BezPath, Point, Rect, RoundedRect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle, optionally with rounded corners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    /// Unique identifier.
    pub id: ElementId,
    /// Top-left corner in scene coordinates.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Corner radius (0 = sharp corners).
    #[serde(default)]
    pub corner_radius: f64,
    /// Rotation in degrees, applied about the center when rendering.
    #[serde(default)]
    pub rotation: f64,
    /// Visual style.
    pub style: Style,
}

impl Rectangle {
    /// Create a new rectangle with default style.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            corner_radius: 0.0,
            rotation: 0.0,
            style: Style::default(),
        }
    }

    /// Builder-style corner radius.
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }
}

impl ElementTrait for Rectangle {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        let bounds = self.bounds();
        if self.corner_radius > 0.0 {
            let radius = self
                .corner_radius
                .min(self.width / 2.0)
                .min(self.height / 2.0);
            RoundedRect::from_rect(bounds, radius).to_path(0.1)
        } else {
            bounds.to_path(0.1)
        }
    }

    fn style(&self) -> &Style {
        &self.style
    }

    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 60.0);
        let bounds = rect.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_inside() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 60.0);
        assert!(rect.hit_test(Point::new(50.0, 30.0), 0.0));
        assert!(!rect.hit_test(Point::new(150.0, 30.0), 0.0));
    }

    #[test]
    fn test_hit_test_tolerance() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 60.0);
        assert!(!rect.hit_test(Point::new(103.0, 30.0), 0.0));
        assert!(rect.hit_test(Point::new(103.0, 30.0), 5.0));
    }

    #[test]
    fn test_translate() {
        let mut rect = Rectangle::new(Point::new(10.0, 10.0), 50.0, 30.0);
        rect.translate(Vec2::new(50.0, 0.0));
        let bounds = rect.bounds();
        assert!((bounds.x0 - 60.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_corner_radius_clamped_in_path() {
        // A radius larger than half the short side must not fold the path over.
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 20.0).with_corner_radius(50.0);
        let path_bounds = rect.to_path().bounding_box();
        assert!((path_bounds.width() - 100.0).abs() < 1.0);
        assert!((path_bounds.height() - 20.0).abs() < 1.0);
    }
}
