//! Archive export.
//!
//! Writes the document as a zip of JSON files shaped like the archives
//! the importer reads, so scenes survive a trip through other tools.
//! The mapping is lossy: gradients, shadows and blend modes are dropped,
//! and shapes without a foreign counterpart export as plain layers.

use crate::archive::write_archive;
use crate::error::ImportResult;
use serde_json::{json, Value};
use uuid::Uuid;
use vexel_core::{Element, Rgba, Scene, Style};

/// Serialize a scene into a zip archive of foreign-shaped JSON entries.
pub fn export_archive(scene: &Scene) -> ImportResult<Vec<u8>> {
    let document = serde_json::to_vec_pretty(&document_json(scene))?;
    let meta = serde_json::to_vec_pretty(&meta_json(scene))?;
    let user = serde_json::to_vec_pretty(&user_json())?;
    Ok(write_archive(&[
        ("document.json", document.as_slice()),
        ("meta.json", meta.as_slice()),
        ("user.json", user.as_slice()),
    ]))
}

fn document_json(scene: &Scene) -> Value {
    let layers: Vec<Value> = scene.elements_ordered().map(layer_json).collect();
    json!({
        "_class": "document",
        "do_objectID": scene.id,
        "name": scene.name,
        "pages": [{
            "_class": "page",
            "do_objectID": format!("page_{}", Uuid::new_v4()),
            "name": "Page 1",
            "layers": layers,
        }],
    })
}

fn layer_json(element: &Element) -> Value {
    let bounds = element.bounds();
    let style = element.style();
    let mut layer = json!({
        "_class": layer_class(element),
        "do_objectID": element.id().to_string(),
        "name": element.kind_name(),
        "isVisible": style.visible,
        "isLocked": style.locked,
        "style": {
            "_class": "style",
            "opacity": style.opacity,
            "fills": fills_json(style),
            "borders": borders_json(style),
        },
        "frame": {
            "_class": "rect",
            "x": bounds.x0,
            "y": bounds.y0,
            "width": bounds.width(),
            "height": bounds.height(),
        },
    });

    if let Element::Text(text) = element {
        layer["attributedString"] = json!({
            "_class": "attributedString",
            "string": text.content,
            "attributes": [{
                "_class": "stringAttribute",
                "location": 0,
                "length": text.content.chars().count(),
                "attributes": {
                    "MSAttributedStringFontAttribute": {
                        "_class": "fontDescriptor",
                        "attributes": {
                            "name": text.font_family,
                            "size": text.font_size,
                        },
                    },
                },
            }],
        });
    }
    layer
}

fn layer_class(element: &Element) -> &'static str {
    match element {
        Element::Rectangle(_) => "rectangle",
        Element::Ellipse(_) => "oval",
        Element::Text(_) => "text",
        Element::Group(_) => "group",
        _ => "layer",
    }
}

fn fills_json(style: &Style) -> Value {
    match style.fill {
        Some(color) => json!([{
            "_class": "fill",
            "isEnabled": true,
            "color": color_json(color),
        }]),
        None => json!([]),
    }
}

fn borders_json(style: &Style) -> Value {
    if style.stroke_width > 0.0 {
        json!([{
            "_class": "border",
            "isEnabled": true,
            "thickness": style.stroke_width,
            "color": color_json(style.stroke_color),
        }])
    } else {
        json!([])
    }
}

fn color_json(color: Rgba) -> Value {
    json!({
        "_class": "color",
        "red": color.r as f64 / 255.0,
        "green": color.g as f64 / 255.0,
        "blue": color.b as f64 / 255.0,
        "alpha": color.a as f64 / 255.0,
    })
}

fn meta_json(scene: &Scene) -> Value {
    json!({
        "version": 134,
        "app": "com.bohemiancoding.sketch3",
        "appVersion": "71",
        "build": 123456,
        "commit": "abcdef",
        "variant": "NONAPPSTORE",
        "creator": "Vexel",
        "created": {
            "commit": "abcdef",
            "appVersion": "71",
            "app": "Vexel",
        },
        "canvasSize": {
            "width": scene.canvas_size.width,
            "height": scene.canvas_size.height,
        },
    })
}

fn user_json() -> Value {
    json!({
        "document": {},
        "pageListHeight": 85,
    })
}
