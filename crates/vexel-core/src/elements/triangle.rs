//! Triangle element.

use super::{ElementId, ElementTrait, Style};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An isosceles triangle with the apex at the top-center of its box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Triangle {
    /// Unique identifier.
    pub id: ElementId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    /// Width of the base.
    pub width: f64,
    /// Height from base to apex.
    pub height: f64,
    /// Rotation in degrees, applied about the center when rendering.
    #[serde(default)]
    pub rotation: f64,
    /// Visual style.
    pub style: Style,
}

impl Triangle {
    /// Create a new triangle with default style.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            rotation: 0.0,
            style: Style::default(),
        }
    }

    /// The three vertices: apex, bottom-right, bottom-left.
    pub fn vertices(&self) -> [Point; 3] {
        let Point { x, y } = self.position;
        [
            Point::new(x + self.width / 2.0, y),
            Point::new(x + self.width, y + self.height),
            Point::new(x, y + self.height),
        ]
    }
}

impl ElementTrait for Triangle {
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
        let [apex, right, left] = self.vertices();
        let mut path = BezPath::new();
        path.move_to(apex);
        path.line_to(right);
        path.line_to(left);
        path.close_path();
        path
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
