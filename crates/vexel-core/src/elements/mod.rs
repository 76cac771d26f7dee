//! Element definitions for the design document.

mod diamond;
mod ellipse;
mod group;
mod image;
mod path;
mod rectangle;
mod star;
mod text;
mod triangle;

pub use diamond::Diamond;
pub use ellipse::Ellipse;
pub use group::Group;
pub use image::{Image, ImageFilters, ImageFormat};
pub use path::FreehandPath;
pub use rectangle::Rectangle;
pub use star::Star;
pub use text::{FontWeight, Text, TextAlign, TextDecoration};
pub use triangle::Triangle;

use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` hex string.
    /// Returns None for anything else (including `transparent`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b, 255))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self::new(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Format as a `#rrggbb` hex string (alpha dropped).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Where the stroke sits relative to the element outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokePlacement {
    Inside,
    #[default]
    Center,
    Outside,
}

/// Compositing mode applied when drawing an element over the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// Map a CSS `mix-blend-mode` keyword to a blend mode.
    /// Unknown keywords fall back to Normal.
    pub fn from_css(name: &str) -> Self {
        match name {
            "multiply" => BlendMode::Multiply,
            "screen" => BlendMode::Screen,
            "overlay" => BlendMode::Overlay,
            "darken" => BlendMode::Darken,
            "lighten" => BlendMode::Lighten,
            "color-dodge" => BlendMode::ColorDodge,
            "color-burn" => BlendMode::ColorBurn,
            "hard-light" => BlendMode::HardLight,
            "soft-light" => BlendMode::SoftLight,
            "difference" => BlendMode::Difference,
            "exclusion" => BlendMode::Exclusion,
            "hue" => BlendMode::Hue,
            "saturation" => BlendMode::Saturation,
            "color" => BlendMode::Color,
            "luminosity" => BlendMode::Luminosity,
            _ => BlendMode::Normal,
        }
    }
}

/// Gradient kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

/// Gradient fill descriptor. Stops are spaced evenly across the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    pub kind: GradientKind,
    pub stops: Vec<Rgba>,
    /// Direction of a linear gradient, in degrees.
    pub angle: f64,
}

impl Default for GradientSpec {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            stops: vec![
                Rgba::new(0x34, 0x98, 0xdb, 0xff),
                Rgba::new(0xe7, 0x4c, 0x3c, 0xff),
            ],
            angle: 0.0,
        }
    }
}

/// Drop shadow descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowSpec {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: Rgba,
}

impl Default for ShadowSpec {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 4.0,
            blur: 8.0,
            color: Rgba::new(0, 0, 0, 77),
        }
    }
}

/// Style properties shared by all elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Fill color (None = transparent).
    pub fill: Option<Rgba>,
    /// Stroke color.
    pub stroke_color: Rgba,
    /// Stroke width.
    pub stroke_width: f64,
    /// Where the stroke sits relative to the outline.
    #[serde(default)]
    pub stroke_placement: StrokePlacement,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Compositing mode.
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// Gaussian blur radius in scene units (0 = sharp).
    #[serde(default)]
    pub blur: f64,
    /// Gradient fill; overrides `fill` when present.
    #[serde(default)]
    pub gradient: Option<GradientSpec>,
    /// Drop shadow.
    #[serde(default)]
    pub shadow: Option<ShadowSpec>,
    /// Hidden elements are skipped by rendering and hit-testing.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Locked elements cannot be moved, resized or rotated.
    #[serde(default)]
    pub locked: bool,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Style {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Color {
        apply_opacity(self.stroke_color.into(), self.opacity)
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill.map(|c| c.into())
    }

    /// Get the fill color with opacity applied.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        self.fill.map(|c| apply_opacity(c.into(), self.opacity))
    }
}

fn apply_opacity(color: Color, opacity: f64) -> Color {
    let rgba = color.to_rgba8();
    let alpha = (rgba.a as f64 * opacity.clamp(0.0, 1.0)) as u8;
    Color::from_rgba8(rgba.r, rgba.g, rgba.b, alpha)
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some(Rgba::new(0x34, 0x98, 0xdb, 0xff)),
            stroke_color: Rgba::new(0x2c, 0x3e, 0x50, 0xff),
            stroke_width: 2.0,
            stroke_placement: StrokePlacement::Center,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            blur: 0.0,
            gradient: None,
            shadow: None,
            visible: true,
            locked: false,
        }
    }
}

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Normalize an angle in degrees into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

/// Common trait for all elements.
pub trait ElementTrait {
    /// Get the unique identifier.
    fn id(&self) -> ElementId;

    /// Get the axis-aligned bounding box, ignoring rotation.
    fn bounds(&self) -> Rect;

    /// Check if a point (in scene coordinates) hits this element.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the outline path for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &Style;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut Style;

    /// Move the element by a delta in scene units.
    fn translate(&mut self, delta: Vec2);
}

/// Enum wrapper for all element types (for serialization and dispatch).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Element {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Triangle(Triangle),
    Diamond(Diamond),
    Star(Star),
    Path(FreehandPath),
    Text(Text),
    Image(Image),
    Group(Group),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Rectangle(e) => e.id(),
            Element::Ellipse(e) => e.id(),
            Element::Triangle(e) => e.id(),
            Element::Diamond(e) => e.id(),
            Element::Star(e) => e.id(),
            Element::Path(e) => e.id(),
            Element::Text(e) => e.id(),
            Element::Image(e) => e.id(),
            Element::Group(e) => e.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Element::Rectangle(e) => e.bounds(),
            Element::Ellipse(e) => e.bounds(),
            Element::Triangle(e) => e.bounds(),
            Element::Diamond(e) => e.bounds(),
            Element::Star(e) => e.bounds(),
            Element::Path(e) => e.bounds(),
            Element::Text(e) => e.bounds(),
            Element::Image(e) => e.bounds(),
            Element::Group(e) => e.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Element::Rectangle(e) => e.hit_test(point, tolerance),
            Element::Ellipse(e) => e.hit_test(point, tolerance),
            Element::Triangle(e) => e.hit_test(point, tolerance),
            Element::Diamond(e) => e.hit_test(point, tolerance),
            Element::Star(e) => e.hit_test(point, tolerance),
            Element::Path(e) => e.hit_test(point, tolerance),
            Element::Text(e) => e.hit_test(point, tolerance),
            Element::Image(e) => e.hit_test(point, tolerance),
            Element::Group(e) => e.hit_test(point, tolerance),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Element::Rectangle(e) => e.to_path(),
            Element::Ellipse(e) => e.to_path(),
            Element::Triangle(e) => e.to_path(),
            Element::Diamond(e) => e.to_path(),
            Element::Star(e) => e.to_path(),
            Element::Path(e) => e.to_path(),
            Element::Text(e) => e.to_path(),
            Element::Image(e) => e.to_path(),
            Element::Group(e) => e.to_path(),
        }
    }

    pub fn style(&self) -> &Style {
        match self {
            Element::Rectangle(e) => e.style(),
            Element::Ellipse(e) => e.style(),
            Element::Triangle(e) => e.style(),
            Element::Diamond(e) => e.style(),
            Element::Star(e) => e.style(),
            Element::Path(e) => e.style(),
            Element::Text(e) => e.style(),
            Element::Image(e) => e.style(),
            Element::Group(e) => e.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut Style {
        match self {
            Element::Rectangle(e) => e.style_mut(),
            Element::Ellipse(e) => e.style_mut(),
            Element::Triangle(e) => e.style_mut(),
            Element::Diamond(e) => e.style_mut(),
            Element::Star(e) => e.style_mut(),
            Element::Path(e) => e.style_mut(),
            Element::Text(e) => e.style_mut(),
            Element::Image(e) => e.style_mut(),
            Element::Group(e) => e.style_mut(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Element::Rectangle(e) => e.translate(delta),
            Element::Ellipse(e) => e.translate(delta),
            Element::Triangle(e) => e.translate(delta),
            Element::Diamond(e) => e.translate(delta),
            Element::Star(e) => e.translate(delta),
            Element::Path(e) => e.translate(delta),
            Element::Text(e) => e.translate(delta),
            Element::Image(e) => e.translate(delta),
            Element::Group(e) => e.translate(delta),
        }
    }

    /// Move the element so its bounding box origin lands at `origin`.
    pub fn set_origin(&mut self, origin: Point) {
        let current = self.bounds().origin();
        self.translate(Vec2::new(origin.x - current.x, origin.y - current.y));
    }

    /// Get the rotation angle in degrees, normalized to [0, 360).
    pub fn rotation(&self) -> f64 {
        match self {
            Element::Rectangle(e) => e.rotation,
            Element::Ellipse(e) => e.rotation,
            Element::Triangle(e) => e.rotation,
            Element::Diamond(e) => e.rotation,
            Element::Star(e) => e.rotation,
            Element::Path(e) => e.rotation,
            Element::Text(e) => e.rotation,
            Element::Image(e) => e.rotation,
            Element::Group(e) => e.rotation,
        }
    }

    /// Set the rotation angle in degrees (normalized into [0, 360)).
    pub fn set_rotation(&mut self, degrees: f64) {
        let normalized = normalize_degrees(degrees);
        match self {
            Element::Rectangle(e) => e.rotation = normalized,
            Element::Ellipse(e) => e.rotation = normalized,
            Element::Triangle(e) => e.rotation = normalized,
            Element::Diamond(e) => e.rotation = normalized,
            Element::Star(e) => e.rotation = normalized,
            Element::Path(e) => e.rotation = normalized,
            Element::Text(e) => e.rotation = normalized,
            Element::Image(e) => e.rotation = normalized,
            Element::Group(e) => e.rotation = normalized,
        }
    }

    /// Test if this element's bounding box overlaps a selection rectangle.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        rect.intersect(self.bounds()).area() > 0.0
    }

    /// Short name of the element kind, for logging and export.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Rectangle(_) => "rectangle",
            Element::Ellipse(_) => "ellipse",
            Element::Triangle(_) => "triangle",
            Element::Diamond(_) => "diamond",
            Element::Star(_) => "star",
            Element::Path(_) => "path",
            Element::Text(_) => "text",
            Element::Image(_) => "image",
            Element::Group(_) => "group",
        }
    }

    /// Regenerate the element's ID with a new unique identifier.
    /// Used when duplicating so copies do not collide with the source.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Element::Rectangle(e) => e.id = new_id,
            Element::Ellipse(e) => e.id = new_id,
            Element::Triangle(e) => e.id = new_id,
            Element::Diamond(e) => e.id = new_id,
            Element::Star(e) => e.id = new_id,
            Element::Path(e) => e.id = new_id,
            Element::Text(e) => e.id = new_id,
            Element::Image(e) => e.id = new_id,
            Element::Group(e) => e.id = new_id,
        }
    }

    /// Check if this element is a group.
    pub fn is_group(&self) -> bool {
        matches!(self, Element::Group(_))
    }

    /// Get the group if this element is a group.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Element::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Get the text if this element is a text element.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get the mutable text if this element is a text element.
    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get the image if this element is an image.
    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Element::Image(img) => Some(img),
            _ => None,
        }
    }

    /// Get the mutable image if this element is an image.
    pub fn as_image_mut(&mut self) -> Option<&mut Image> {
        match self {
            Element::Image(img) => Some(img),
            _ => None,
        }
    }
}
