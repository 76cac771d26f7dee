//! Circular ellipse element.

use super::{ElementId, ElementTrait, Style};
use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle, stored by the top-left corner of its bounding square.
///
/// Keeping the origin rather than the center gives every element the same
/// position semantics for alignment, snapping and import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ellipse {
    /// Unique identifier.
    pub id: ElementId,
    /// Top-left corner of the bounding square.
    pub position: Point,
    /// Radius in scene units.
    pub radius: f64,
    /// Rotation in degrees, applied about the center when rendering.
    #[serde(default)]
    pub rotation: f64,
    /// Visual style.
    pub style: Style,
}

impl Ellipse {
    /// Create a new circle with default style.
    pub fn new(position: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            radius,
            rotation: 0.0,
            style: Style::default(),
        }
    }

    /// Create a circle from its center point.
    pub fn from_center(center: Point, radius: f64) -> Self {
        Self::new(Point::new(center.x - radius, center.y - radius), radius)
    }

    /// The center of the circle.
    pub fn center(&self) -> Point {
        Point::new(self.position.x + self.radius, self.position.y + self.radius)
    }
}

impl ElementTrait for Ellipse {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let size = self.radius * 2.0;
        Rect::from_origin_size(self.position, (size, size))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let center = self.center();
        let dx = point.x - center.x;
        let dy = point.y - center.y;
        (dx * dx + dy * dy).sqrt() <= self.radius + tolerance
    }

    fn to_path(&self) -> BezPath {
        Circle::new(self.center(), self.radius).to_path(0.1)
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
    fn test_center_derivation() {
        let circle = Ellipse::new(Point::new(10.0, 10.0), 50.0);
        let center = circle.center();
        assert!((center.x - 60.0).abs() < f64::EPSILON);
        assert!((center.y - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_center_roundtrip() {
        let circle = Ellipse::from_center(Point::new(100.0, 100.0), 25.0);
        assert!((circle.position.x - 75.0).abs() < f64::EPSILON);
        assert!((circle.center().x - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_uses_distance() {
        let circle = Ellipse::from_center(Point::new(0.0, 0.0), 50.0);
        assert!(circle.hit_test(Point::new(30.0, 30.0), 0.0));
        // Inside the bounding square but outside the circle.
        assert!(!circle.hit_test(Point::new(45.0, 45.0), 0.0));
        assert!(circle.hit_test(Point::new(52.0, 0.0), 3.0));
    }

    #[test]
    fn test_bounds() {
        let circle = Ellipse::new(Point::new(0.0, 0.0), 50.0);
        let bounds = circle.bounds();
        assert!((bounds.width() - 100.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 100.0).abs() < f64::EPSILON);
    }
}
