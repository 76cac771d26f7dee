//! Tool palette and the default elements each tool creates.

use crate::elements::{
    Diamond, Element, Ellipse, FreehandPath, Image, Rectangle, Star, Text, Triangle,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// The active tool. Select is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Pen,
    Eraser,
    Rectangle,
    Ellipse,
    Triangle,
    Diamond,
    Star,
    Text,
    Image,
}

impl ToolKind {
    /// Tools that rubber-band a new shape while the pointer is down.
    pub fn draws_shape(&self) -> bool {
        matches!(
            self,
            Self::Rectangle | Self::Ellipse | Self::Triangle | Self::Diamond | Self::Star
        )
    }

    /// Tools that place a finished element on press.
    pub fn places_element(&self) -> bool {
        matches!(self, Self::Text | Self::Image)
    }
}

/// Create the default element for a tool at a scene position. Select and
/// Eraser create nothing.
pub fn create_element(tool: ToolKind, at: Point) -> Option<Element> {
    match tool {
        ToolKind::Select | ToolKind::Eraser => None,
        ToolKind::Pen => Some(Element::Path(FreehandPath::new(vec![at], 10.0))),
        ToolKind::Rectangle => Some(Element::Rectangle(Rectangle::new(at, 100.0, 60.0))),
        ToolKind::Ellipse => Some(Element::Ellipse(Ellipse::new(at, 50.0))),
        ToolKind::Triangle => Some(Element::Triangle(Triangle::new(at, 100.0, 80.0))),
        ToolKind::Diamond => Some(Element::Diamond(Diamond::new(at, 80.0, 80.0))),
        ToolKind::Star => Some(Element::Star(Star::new(at))),
        ToolKind::Text => Some(Element::Text(Text::new(at, "Text"))),
        ToolKind::Image => Some(Element::Image(Image::placeholder(at))),
    }
}
