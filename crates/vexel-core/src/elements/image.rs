//! Image element.

use super::{ElementId, ElementTrait, Rgba, Style};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest display dimension assigned to a freshly placed image.
pub const MAX_PLACED_DIMENSION: f64 = 500.0;

/// Encoded image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
    Gif,
    Svg,
}

impl ImageFormat {
    /// Detect the format from the first bytes of an encoded payload.
    pub fn from_magic_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else if bytes.starts_with(b"GIF8") {
            Some(ImageFormat::Gif)
        } else if bytes.starts_with(b"<svg") || bytes.starts_with(b"<?xml") {
            Some(ImageFormat::Svg)
        } else {
            None
        }
    }

    /// Detect the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::Webp),
            "gif" => Some(ImageFormat::Gif),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

/// Per-image color filters, as CSS-style percentages.
/// 100 is neutral for brightness/contrast/saturation; 0 is neutral for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFilters {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub grayscale: f64,
    pub sepia: f64,
    pub invert: f64,
}

impl Default for ImageFilters {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            grayscale: 0.0,
            sepia: 0.0,
            invert: 0.0,
        }
    }
}

impl ImageFilters {
    /// True when every filter is at its neutral value.
    pub fn is_identity(&self) -> bool {
        (self.brightness - 100.0).abs() < f64::EPSILON
            && (self.contrast - 100.0).abs() < f64::EPSILON
            && (self.saturation - 100.0).abs() < f64::EPSILON
            && self.grayscale.abs() < f64::EPSILON
            && self.sepia.abs() < f64::EPSILON
            && self.invert.abs() < f64::EPSILON
    }
}

/// A bitmap referenced by inline base64 data.
///
/// Decoding happens in the renderer's image cache; the element only carries
/// the encoded payload and display geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Unique identifier.
    pub id: ElementId,
    /// Top-left corner in scene coordinates.
    pub position: Point,
    /// Display width in scene units.
    pub width: f64,
    /// Display height in scene units.
    pub height: f64,
    /// Natural width of the source bitmap in pixels.
    pub source_width: u32,
    /// Natural height of the source bitmap in pixels.
    pub source_height: u32,
    /// Encoded format of the payload.
    pub format: ImageFormat,
    /// Base64-encoded source bytes; empty until an asset is attached.
    pub data_base64: String,
    /// Color filters applied at draw time.
    #[serde(default)]
    pub filters: ImageFilters,
    /// Rotation in degrees, applied about the center when rendering.
    #[serde(default)]
    pub rotation: f64,
    /// Visual style.
    pub style: Style,
}

impl Image {
    /// Create an image element without an attached payload.
    pub fn placeholder(position: Point) -> Self {
        let style = Style {
            fill: None,
            stroke_color: Rgba::new(0x2c, 0x3e, 0x50, 0x00),
            ..Style::default()
        };
        Self {
            id: Uuid::new_v4(),
            position,
            width: 200.0,
            height: 200.0,
            source_width: 0,
            source_height: 0,
            format: ImageFormat::Png,
            data_base64: String::new(),
            filters: ImageFilters::default(),
            rotation: 0.0,
            style,
        }
    }

    /// Attach an encoded payload with known natural dimensions.
    /// Display size starts at the natural size, capped by `fit_within`.
    pub fn attach(
        &mut self,
        format: ImageFormat,
        data_base64: String,
        source_width: u32,
        source_height: u32,
    ) {
        self.format = format;
        self.data_base64 = data_base64;
        self.source_width = source_width;
        self.source_height = source_height;
        self.width = source_width as f64;
        self.height = source_height as f64;
        self.fit_within(MAX_PLACED_DIMENSION);
    }

    /// Scale the display size down so neither dimension exceeds `max`.
    /// Aspect ratio is preserved; smaller images are left unchanged.
    pub fn fit_within(&mut self, max: f64) {
        if self.width <= max && self.height <= max {
            return;
        }
        let ratio = (max / self.width).min(max / self.height);
        self.width *= ratio;
        self.height *= ratio;
    }

    /// Whether an encoded payload is attached.
    pub fn has_data(&self) -> bool {
        !self.data_base64.is_empty()
    }
}

impl ElementTrait for Image {
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
