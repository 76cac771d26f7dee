//! Group element.

use super::{ElementId, ElementTrait, Style};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named frame over a set of member elements.
///
/// Members stay in the document and keep their absolute coordinates; the
/// group records their ids plus the union box captured at creation time.
/// Moving a group moves its members with it (handled at the scene level).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier.
    pub id: ElementId,
    /// Top-left corner of the frame.
    pub position: Point,
    /// Frame width.
    pub width: f64,
    /// Frame height.
    pub height: f64,
    /// Ids of the member elements.
    pub members: Vec<ElementId>,
    /// Rotation in degrees, applied about the center when rendering.
    #[serde(default)]
    pub rotation: f64,
    /// Visual style. Groups draw no fill or stroke of their own.
    pub style: Style,
}

impl Group {
    /// Create a group over `members` with the given union box.
    pub fn new(members: Vec<ElementId>, frame: Rect) -> Self {
        let style = Style {
            fill: None,
            stroke_width: 0.0,
            ..Style::default()
        };
        Self {
            id: Uuid::new_v4(),
            position: frame.origin(),
            width: frame.width(),
            height: frame.height(),
            members,
            rotation: 0.0,
            style,
        }
    }

    /// Whether the group contains the given element id.
    pub fn contains(&self, id: ElementId) -> bool {
        self.members.contains(&id)
    }
}

impl ElementTrait for Group {
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
        self.bounds().to_path(0.1)
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
