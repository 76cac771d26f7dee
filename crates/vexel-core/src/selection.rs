//! Selection handles and resize/rotate geometry.

use crate::elements::Element;
use kurbo::{Point, Rect};

/// On-screen handle square size in pixels; divide by zoom for scene units.
pub const HANDLE_SIZE: f64 = 8.0;

/// On-screen radius of the rotation handle in pixels.
pub const ROTATE_HANDLE_RADIUS: f64 = 10.0;

/// Gap between the selection top edge and the rotation handle, in pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 20.0;

/// Smallest width/height a resize may produce, in scene units.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// What a selection handle does when dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
    Rotate,
}

/// A handle with its scene position.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: Point,
}

/// Scene position of the rotation handle for a selection box.
pub fn rotation_handle_center(bounds: Rect, zoom: f64) -> Point {
    Point::new(bounds.center().x, bounds.y0 - ROTATE_HANDLE_OFFSET / zoom)
}

/// All handles for a selection box: four corners, four edge midpoints and
/// the rotation handle above the top edge.
pub fn selection_handles(bounds: Rect, zoom: f64) -> Vec<Handle> {
    let center = bounds.center();
    vec![
        Handle {
            kind: HandleKind::Corner(Corner::TopLeft),
            position: Point::new(bounds.x0, bounds.y0),
        },
        Handle {
            kind: HandleKind::Corner(Corner::TopRight),
            position: Point::new(bounds.x1, bounds.y0),
        },
        Handle {
            kind: HandleKind::Corner(Corner::BottomRight),
            position: Point::new(bounds.x1, bounds.y1),
        },
        Handle {
            kind: HandleKind::Corner(Corner::BottomLeft),
            position: Point::new(bounds.x0, bounds.y1),
        },
        Handle {
            kind: HandleKind::Edge(Edge::Top),
            position: Point::new(center.x, bounds.y0),
        },
        Handle {
            kind: HandleKind::Edge(Edge::Right),
            position: Point::new(bounds.x1, center.y),
        },
        Handle {
            kind: HandleKind::Edge(Edge::Bottom),
            position: Point::new(center.x, bounds.y1),
        },
        Handle {
            kind: HandleKind::Edge(Edge::Left),
            position: Point::new(bounds.x0, center.y),
        },
        Handle {
            kind: HandleKind::Rotate,
            position: rotation_handle_center(bounds, zoom),
        },
    ]
}

/// Find the handle under a scene point, if any. Handle extents shrink with
/// zoom so they stay a constant screen size.
pub fn handle_at_point(bounds: Rect, zoom: f64, point: Point) -> Option<HandleKind> {
    let half = HANDLE_SIZE / zoom / 2.0;
    for handle in selection_handles(bounds, zoom) {
        match handle.kind {
            HandleKind::Rotate => {
                if handle.position.distance(point) <= ROTATE_HANDLE_RADIUS / zoom {
                    return Some(handle.kind);
                }
            }
            _ => {
                if (point.x - handle.position.x).abs() <= half
                    && (point.y - handle.position.y).abs() <= half
                {
                    return Some(handle.kind);
                }
            }
        }
    }
    None
}

/// Angle of `point` around `center`, in degrees.
pub fn pointer_angle_degrees(center: Point, point: Point) -> f64 {
    (point - center).atan2().to_degrees()
}

/// Compute the bounds a drag produces: the grabbed handle follows the
/// pointer while the opposite corner or edge stays fixed. Sizes clamp at
/// [`MIN_ELEMENT_SIZE`]; with `keep_aspect` the axis that changed more
/// drives both.
pub fn resize_bounds(original: Rect, kind: HandleKind, target: Point, keep_aspect: bool) -> Rect {
    match kind {
        HandleKind::Rotate => original,
        HandleKind::Edge(edge) => match edge {
            Edge::Top => {
                let height = (original.y1 - target.y).max(MIN_ELEMENT_SIZE);
                Rect::new(original.x0, original.y1 - height, original.x1, original.y1)
            }
            Edge::Bottom => {
                let height = (target.y - original.y0).max(MIN_ELEMENT_SIZE);
                Rect::new(original.x0, original.y0, original.x1, original.y0 + height)
            }
            Edge::Left => {
                let width = (original.x1 - target.x).max(MIN_ELEMENT_SIZE);
                Rect::new(original.x1 - width, original.y0, original.x1, original.y1)
            }
            Edge::Right => {
                let width = (target.x - original.x0).max(MIN_ELEMENT_SIZE);
                Rect::new(original.x0, original.y0, original.x0 + width, original.y1)
            }
        },
        HandleKind::Corner(corner) => {
            let anchor = match corner {
                Corner::TopLeft => Point::new(original.x1, original.y1),
                Corner::TopRight => Point::new(original.x0, original.y1),
                Corner::BottomRight => Point::new(original.x0, original.y0),
                Corner::BottomLeft => Point::new(original.x1, original.y0),
            };
            let mut width = (target.x - anchor.x).abs().max(MIN_ELEMENT_SIZE);
            let mut height = (target.y - anchor.y).abs().max(MIN_ELEMENT_SIZE);

            if keep_aspect && original.width() > 0.0 && original.height() > 0.0 {
                let scale_x = width / original.width();
                let scale_y = height / original.height();
                let scale = if (scale_x - 1.0).abs() >= (scale_y - 1.0).abs() {
                    scale_x
                } else {
                    scale_y
                };
                width = (original.width() * scale).max(MIN_ELEMENT_SIZE);
                height = (original.height() * scale).max(MIN_ELEMENT_SIZE);
            }

            let x0 = if target.x < anchor.x { anchor.x - width } else { anchor.x };
            let y0 = if target.y < anchor.y { anchor.y - height } else { anchor.y };
            Rect::new(x0, y0, x0 + width, y0 + height)
        }
    }
}

/// Whether a resize gesture applies to this element at all.
pub fn is_resizable(element: &Element) -> bool {
    !matches!(element, Element::Text(_) | Element::Path(_))
}

/// Write resized bounds back into an element, per its own geometry.
/// Ellipses take the larger axis as their new diameter; stars rescale
/// their radii; text and freehand paths are left untouched.
pub fn apply_resize(element: &mut Element, bounds: Rect) {
    match element {
        Element::Rectangle(r) => {
            r.position = bounds.origin();
            r.width = bounds.width();
            r.height = bounds.height();
        }
        Element::Triangle(t) => {
            t.position = bounds.origin();
            t.width = bounds.width();
            t.height = bounds.height();
        }
        Element::Diamond(d) => {
            d.position = bounds.origin();
            d.width = bounds.width();
            d.height = bounds.height();
        }
        Element::Image(i) => {
            i.position = bounds.origin();
            i.width = bounds.width();
            i.height = bounds.height();
        }
        Element::Group(g) => {
            g.position = bounds.origin();
            g.width = bounds.width();
            g.height = bounds.height();
        }
        Element::Ellipse(e) => {
            e.position = bounds.origin();
            e.radius = bounds.width().max(bounds.height()) / 2.0;
        }
        Element::Star(s) => {
            s.set_box(bounds.origin(), bounds.width(), bounds.height());
        }
        Element::Text(_) | Element::Path(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Ellipse, Star, Text};

    #[test]
    fn test_nine_handles() {
        let handles = selection_handles(Rect::new(0.0, 0.0, 100.0, 50.0), 1.0);
        assert_eq!(handles.len(), 9);
        let rotate = handles
            .iter()
            .find(|h| h.kind == HandleKind::Rotate)
            .unwrap();
        assert!((rotate.position.x - 50.0).abs() < f64::EPSILON);
        assert!((rotate.position.y - (-ROTATE_HANDLE_OFFSET)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotation_handle_scales_with_zoom() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let center = rotation_handle_center(bounds, 2.0);
        assert!((center.y - (-10.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotation_handle_hits_to_its_drawn_radius() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let center = rotation_handle_center(bounds, 1.0);
        // The rim of the visible circle is still clickable; one unit past
        // it is not.
        let on_rim = Point::new(center.x + ROTATE_HANDLE_RADIUS, center.y);
        assert_eq!(handle_at_point(bounds, 1.0, on_rim), Some(HandleKind::Rotate));
        let past_rim = Point::new(center.x + ROTATE_HANDLE_RADIUS + 1.0, center.y);
        assert_ne!(handle_at_point(bounds, 1.0, past_rim), Some(HandleKind::Rotate));
    }

    #[test]
    fn test_handle_at_point_picks_corner() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let hit = handle_at_point(bounds, 1.0, Point::new(101.0, 51.0));
        assert_eq!(hit, Some(HandleKind::Corner(Corner::BottomRight)));

        let miss = handle_at_point(bounds, 1.0, Point::new(50.0, 25.0));
        assert_eq!(miss, None);
    }

    #[test]
    fn test_handle_hit_area_shrinks_with_zoom() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        // 3 scene units off the corner: inside at zoom 1, outside at zoom 4.
        let point = Point::new(103.0, 50.0);
        assert!(handle_at_point(bounds, 1.0, point).is_some());
        assert!(handle_at_point(bounds, 4.0, point).is_none());
    }

    #[test]
    fn test_resize_corner_keeps_anchor() {
        let original = Rect::new(10.0, 10.0, 110.0, 60.0);
        let resized = resize_bounds(
            original,
            HandleKind::Corner(Corner::BottomRight),
            Point::new(160.0, 110.0),
            false,
        );
        assert!((resized.x0 - 10.0).abs() < f64::EPSILON);
        assert!((resized.y0 - 10.0).abs() < f64::EPSILON);
        assert!((resized.width() - 150.0).abs() < f64::EPSILON);
        assert!((resized.height() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let original = Rect::new(0.0, 0.0, 100.0, 50.0);
        let resized = resize_bounds(
            original,
            HandleKind::Corner(Corner::BottomRight),
            Point::new(2.0, 1.0),
            false,
        );
        assert!((resized.width() - MIN_ELEMENT_SIZE).abs() < f64::EPSILON);
        assert!((resized.height() - MIN_ELEMENT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_edge_moves_one_axis() {
        let original = Rect::new(0.0, 0.0, 100.0, 50.0);
        let resized = resize_bounds(
            original,
            HandleKind::Edge(Edge::Right),
            Point::new(130.0, 999.0),
            false,
        );
        assert!((resized.width() - 130.0).abs() < f64::EPSILON);
        assert!((resized.height() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aspect_resize_uses_dominant_axis() {
        let original = Rect::new(0.0, 0.0, 100.0, 50.0);
        // Width doubled, height barely changed: width drives the scale.
        let resized = resize_bounds(
            original,
            HandleKind::Corner(Corner::BottomRight),
            Point::new(200.0, 52.0),
            true,
        );
        assert!((resized.width() - 200.0).abs() < f64::EPSILON);
        assert!((resized.height() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_resize_ellipse_takes_larger_axis() {
        let mut element = Element::Ellipse(Ellipse::new(Point::new(0.0, 0.0), 50.0));
        apply_resize(&mut element, Rect::new(0.0, 0.0, 80.0, 120.0));
        match element {
            Element::Ellipse(e) => assert!((e.radius - 60.0).abs() < f64::EPSILON),
            _ => panic!("Expected ellipse element"),
        }
    }

    #[test]
    fn test_apply_resize_star_preserves_radius_ratio() {
        let mut element = Element::Star(Star::new(Point::new(0.0, 0.0)));
        apply_resize(&mut element, Rect::new(0.0, 0.0, 200.0, 300.0));
        match element {
            Element::Star(s) => {
                assert!((s.outer_radius - 100.0).abs() < f64::EPSILON);
                assert!((s.inner_radius - 50.0).abs() < f64::EPSILON);
            }
            _ => panic!("Expected star element"),
        }
    }

    #[test]
    fn test_text_is_not_resizable() {
        let mut element = Element::Text(Text::new(Point::new(0.0, 0.0), "hello"));
        assert!(!is_resizable(&element));
        let before = element.bounds();
        apply_resize(&mut element, Rect::new(0.0, 0.0, 500.0, 500.0));
        assert_eq!(element.bounds(), before);
    }

    #[test]
    fn test_pointer_angle() {
        let center = Point::new(0.0, 0.0);
        assert!((pointer_angle_degrees(center, Point::new(10.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((pointer_angle_degrees(center, Point::new(0.0, 10.0)) - 90.0).abs() < 1e-9);
    }
}
