//! Freehand path element.

use super::{ElementId, ElementTrait, Rgba, Style};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand polyline recorded from pointer samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreehandPath {
    /// Unique identifier.
    pub id: ElementId,
    /// Recorded sample points in scene coordinates.
    pub points: Vec<Point>,
    /// Brush diameter in scene units.
    pub brush_size: f64,
    /// Rotation in degrees, applied about the center when rendering.
    #[serde(default)]
    pub rotation: f64,
    /// Visual style. The stroke color is the brush color; fill is unused.
    pub style: Style,
}

impl FreehandPath {
    /// Create a path from initial samples.
    pub fn new(points: Vec<Point>, brush_size: f64) -> Self {
        let style = Style {
            fill: None,
            stroke_color: Rgba::new(0x2c, 0x3e, 0x50, 0xff),
            ..Style::default()
        };
        Self {
            id: Uuid::new_v4(),
            points,
            brush_size,
            rotation: 0.0,
            style,
        }
    }

    /// Append a sample, skipping points that did not move.
    pub fn push_point(&mut self, point: Point) {
        if let Some(last) = self.points.last() {
            if (point.x - last.x).abs() < f64::EPSILON && (point.y - last.y).abs() < f64::EPSILON {
                return;
            }
        }
        self.points.push(point);
    }
}

impl ElementTrait for FreehandPath {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for point in &self.points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        Rect::new(min_x, min_y, max_x, max_y)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = self.brush_size / 2.0 + tolerance;
        self.points.iter().any(|sample| {
            let dx = point.x - sample.x;
            let dy = point.y - sample.y;
            (dx * dx + dy * dy).sqrt() <= reach
        })
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((first, rest)) = self.points.split_first() {
            path.move_to(*first);
            for point in rest {
                path.line_to(*point);
            }
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
        for point in &mut self.points {
            *point += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_samples() {
        let path = FreehandPath::new(
            vec![
                Point::new(10.0, 40.0),
                Point::new(30.0, 10.0),
                Point::new(50.0, 25.0),
            ],
            10.0,
        );
        let bounds = path.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 50.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_near_sample() {
        let path = FreehandPath::new(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)], 10.0);
        assert!(path.hit_test(Point::new(2.0, 3.0), 0.0));
        assert!(!path.hit_test(Point::new(50.0, 20.0), 0.0));
    }

    #[test]
    fn test_push_point_skips_duplicates() {
        let mut path = FreehandPath::new(vec![Point::new(0.0, 0.0)], 10.0);
        path.push_point(Point::new(0.0, 0.0));
        assert_eq!(path.points.len(), 1);
        path.push_point(Point::new(1.0, 1.0));
        assert_eq!(path.points.len(), 2);
    }

    #[test]
    fn test_empty_path_bounds() {
        let path = FreehandPath::new(Vec::new(), 10.0);
        assert!(path.bounds().is_zero_area());
    }
}
