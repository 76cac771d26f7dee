//! Shallow SVG intake.
//!
//! Only `rect`, `circle` and `text` nodes are read, from anywhere in the
//! tree; transforms, paths and everything else are ignored. Good enough
//! for simple mockups, not a renderer.

use crate::convert::{placeholder_elements, parse_color_string, ImportedScene};
use crate::error::{ImportError, ImportResult};
use kurbo::{Point, Size};
use roxmltree::{Document, Node};
use vexel_core::elements::{Ellipse, Rectangle, Text};
use vexel_core::{Element, Rgba};

/// Import an SVG document as a flat list of elements.
pub fn import_svg(text: &str) -> ImportResult<ImportedScene> {
    let doc = Document::parse(text)
        .map_err(|err| ImportError::UnparsablePayload(format!("svg parse: {err}")))?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(ImportError::UnparsablePayload("not an svg document".to_string()));
    }

    let canvas_size = canvas_from_root(root);
    let mut elements = Vec::new();
    for node in root.descendants().filter(Node::is_element) {
        match node.tag_name().name() {
            "rect" => elements.push(convert_rect(node)),
            "circle" => elements.push(convert_circle(node)),
            "text" => elements.push(convert_text(node)),
            _ => {}
        }
    }

    if elements.is_empty() {
        log::info!("svg held no supported shapes, substituting a placeholder");
        elements = placeholder_elements();
    }

    Ok(ImportedScene {
        elements,
        canvas_size,
        assets: Vec::new(),
    })
}

fn canvas_from_root(root: Node) -> Size {
    let dimension = |name: &str| {
        root.attribute(name)
            .map(|value| value.trim().trim_end_matches("px"))
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|value| *value > 0.0)
    };
    if let (Some(width), Some(height)) = (dimension("width"), dimension("height")) {
        return Size::new(width, height);
    }
    if let Some(viewbox) = root.attribute("viewBox") {
        let parts: Vec<f64> = viewbox
            .split_whitespace()
            .filter_map(|part| part.parse::<f64>().ok())
            .collect();
        if parts.len() == 4 && parts[2] > 0.0 && parts[3] > 0.0 {
            return Size::new(parts[2], parts[3]);
        }
    }
    Size::new(1920.0, 1080.0)
}

fn attr_f64(node: Node, name: &str, default: f64) -> f64 {
    node.attribute(name)
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(default)
}

/// Fill attribute: absent means the default, `none` means no fill.
fn fill_attr(node: Node, default: Rgba) -> Option<Rgba> {
    match node.attribute("fill") {
        None => Some(default),
        Some(value) => match value {
            "none" | "transparent" => None,
            other => Some(parse_color_string(other).unwrap_or(default)),
        },
    }
}

/// Stroke attribute: absent means the default, `none` means invisible.
fn stroke_attr(node: Node, default: Rgba) -> Rgba {
    match node.attribute("stroke") {
        None => default,
        Some("none") | Some("transparent") => Rgba::new(0, 0, 0, 0),
        Some(other) => parse_color_string(other).unwrap_or(default),
    }
}

fn convert_rect(node: Node) -> Element {
    let mut rect = Rectangle::new(
        Point::new(attr_f64(node, "x", 0.0), attr_f64(node, "y", 0.0)),
        attr_f64(node, "width", 100.0),
        attr_f64(node, "height", 60.0),
    )
    .with_corner_radius(attr_f64(node, "rx", 0.0));
    rect.style.fill = fill_attr(node, Rgba::new(0x34, 0x98, 0xdb, 0xff));
    rect.style.stroke_color = stroke_attr(node, Rgba::new(0x2c, 0x3e, 0x50, 0xff));
    rect.style.stroke_width = attr_f64(node, "stroke-width", 0.0);
    rect.style.opacity = attr_f64(node, "opacity", 1.0).clamp(0.0, 1.0);
    Element::Rectangle(rect)
}

fn convert_circle(node: Node) -> Element {
    let radius = attr_f64(node, "r", 25.0);
    let center = Point::new(attr_f64(node, "cx", 0.0), attr_f64(node, "cy", 0.0));
    let mut ellipse = Ellipse::from_center(center, radius);
    ellipse.style.fill = fill_attr(node, Rgba::new(0x34, 0x98, 0xdb, 0xff));
    ellipse.style.stroke_color = stroke_attr(node, Rgba::new(0x2c, 0x3e, 0x50, 0xff));
    ellipse.style.stroke_width = attr_f64(node, "stroke-width", 0.0);
    ellipse.style.opacity = attr_f64(node, "opacity", 1.0).clamp(0.0, 1.0);
    Element::Ellipse(ellipse)
}

fn convert_text(node: Node) -> Element {
    let content: String = node
        .descendants()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect();
    let content = content.trim();
    let content = if content.is_empty() { "Text" } else { content };

    let mut text = Text::new(
        Point::new(attr_f64(node, "x", 0.0), attr_f64(node, "y", 0.0)),
        content.to_string(),
    );
    text.font_size = attr_f64(node, "font-size", 16.0);
    text.font_family = node.attribute("font-family").unwrap_or("Arial").to_string();
    text.style.fill = Some(fill_attr(node, Rgba::black()).unwrap_or_else(Rgba::black));
    text.style.opacity = attr_f64(node, "opacity", 1.0).clamp(0.0, 1.0);
    Element::Text(text)
}
