//! Star element.

use super::{ElementId, ElementTrait, Style};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use uuid::Uuid;

/// A star polygon with alternating outer and inner vertices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    /// Unique identifier.
    pub id: ElementId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    /// Width of the bounding box.
    pub width: f64,
    /// Height of the bounding box.
    pub height: f64,
    /// Radius of the outer vertices.
    pub outer_radius: f64,
    /// Radius of the inner vertices.
    pub inner_radius: f64,
    /// Number of star points.
    pub points: u32,
    /// Rotation in degrees, applied about the center when rendering.
    #[serde(default)]
    pub rotation: f64,
    /// Visual style.
    pub style: Style,
}

impl Star {
    /// Create a five-pointed star with default geometry and style.
    pub fn new(position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: 100.0,
            height: 100.0,
            outer_radius: 50.0,
            inner_radius: 25.0,
            points: 5,
            rotation: 0.0,
            style: Style::default(),
        }
    }

    /// The center of the bounding box.
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    /// Alternating outer/inner vertices, starting from the topmost point.
    pub fn vertices(&self) -> Vec<Point> {
        let center = self.center();
        let count = self.points.max(2) as usize;
        let mut vertices = Vec::with_capacity(count * 2);
        for i in 0..count * 2 {
            let radius = if i % 2 == 0 {
                self.outer_radius
            } else {
                self.inner_radius
            };
            let angle = i as f64 * PI / count as f64 - PI / 2.0;
            vertices.push(Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
        vertices
    }

    /// Resize to a new box, scaling both radii to the smaller dimension.
    pub fn set_box(&mut self, origin: Point, width: f64, height: f64) {
        let ratio = if self.outer_radius > 0.0 {
            self.inner_radius / self.outer_radius
        } else {
            0.5
        };
        self.position = origin;
        self.width = width;
        self.height = height;
        self.outer_radius = width.min(height) / 2.0;
        self.inner_radius = self.outer_radius * ratio;
    }
}

impl ElementTrait for Star {
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
        let vertices = self.vertices();
        let mut path = BezPath::new();
        if let Some((first, rest)) = vertices.split_first() {
            path.move_to(*first);
            for vertex in rest {
                path.line_to(*vertex);
            }
            path.close_path();
        }
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
