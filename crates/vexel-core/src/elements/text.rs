//! Text element.

use super::{ElementId, ElementTrait, Rgba, Style};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Approximate average glyph width as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Approximate line box height as a fraction of the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.3;

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Text decoration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A block of text anchored at its top-left corner.
///
/// Size is estimated from character counts so hit-testing and alignment do
/// not depend on a text layout engine; exact glyph placement happens at
/// render time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    /// Unique identifier.
    pub id: ElementId,
    /// Top-left corner in scene coordinates.
    pub position: Point,
    /// Text content; newlines separate lines.
    pub content: String,
    /// Font family name.
    pub font_family: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// Font weight.
    #[serde(default)]
    pub weight: FontWeight,
    /// Italic style.
    #[serde(default)]
    pub italic: bool,
    /// Decoration line.
    #[serde(default)]
    pub decoration: TextDecoration,
    /// Horizontal alignment within the measured box.
    #[serde(default)]
    pub align: TextAlign,
    /// Line spacing as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    /// Additional spacing between glyphs, in scene units.
    #[serde(default)]
    pub letter_spacing: f64,
    /// Rotation in degrees, applied about the center when rendering.
    #[serde(default)]
    pub rotation: f64,
    /// Visual style. The fill color is the glyph color.
    pub style: Style,
}

fn default_line_height() -> f64 {
    1.2
}

impl Text {
    /// Create a new text element with default typography.
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        let style = Style {
            // Glyphs take the default stroke color so new text is dark.
            fill: Some(Rgba::new(0x2c, 0x3e, 0x50, 0xff)),
            ..Style::default()
        };
        Self {
            id: Uuid::new_v4(),
            position,
            content: content.into(),
            font_family: "Arial".to_string(),
            font_size: 16.0,
            weight: FontWeight::Normal,
            italic: false,
            decoration: TextDecoration::None,
            align: TextAlign::Left,
            line_height: default_line_height(),
            letter_spacing: 0.0,
            rotation: 0.0,
            style,
        }
    }

    /// Estimate the rendered size from character counts.
    pub fn measured_size(&self) -> Size {
        let mut max_chars = 0usize;
        let mut lines = 0usize;
        for line in self.content.split('\n') {
            max_chars = max_chars.max(line.chars().count());
            lines += 1;
        }
        let width = (max_chars.max(1) as f64) * self.font_size * CHAR_WIDTH_FACTOR;
        let height = (lines.max(1) as f64) * self.font_size * LINE_HEIGHT_FACTOR;
        Size::new(width, height)
    }

    pub fn toggle_bold(&mut self) {
        self.weight = match self.weight {
            FontWeight::Normal => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Normal,
        };
    }

    pub fn toggle_italic(&mut self) {
        self.italic = !self.italic;
    }

    pub fn toggle_underline(&mut self) {
        self.decoration = match self.decoration {
            TextDecoration::Underline => TextDecoration::None,
            _ => TextDecoration::Underline,
        };
    }
}

impl ElementTrait for Text {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.measured_size())
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
