//! Foreign document conversion.
//!
//! Design archives ship JSON trees in many dialects, so the converter
//! duck-types every node instead of binding to one schema. Nodes that
//! look like boxes, ellipses, text or vectors become native elements;
//! containers contribute only their children. Documents that yield
//! almost nothing go through two looser scans, and as a last resort a
//! placeholder scene is substituted, so an import never comes back empty.

use crate::archive::Archive;
use crate::error::{ImportError, ImportResult};
use kurbo::{Point, Size, Vec2};
use serde_json::{Map, Value};
use vexel_core::elements::{Ellipse, FontWeight, FreehandPath, Rectangle, Text, TextAlign};
use vexel_core::{Element, Rgba, Scene, Style};

/// Recursion guard for the main node walk.
const MAX_DEPTH: usize = 50;
/// Recursion guard for the loose geometry scan.
const SCAN_DEPTH: usize = 10;
/// Recursion guard for the text harvest.
const TEXT_DEPTH: usize = 15;
/// A conversion yielding this few elements triggers the fallback scans.
const SPARSE_LIMIT: usize = 2;

const META_FILE: &str = "meta.json";

/// Known payload names, most specific first.
const MAIN_FILE_CANDIDATES: &[&str] = &[
    "document.json",
    "content.json",
    "data.json",
    "design.json",
    "pages/page.json",
    "user.json",
];

const ASSET_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg", "gif"];

/// Imported canvases are widened to a workable minimum unless the size
/// comes from explicit metadata.
const MIN_CANVAS_WIDTH: f64 = 1200.0;
const MIN_CANVAS_HEIGHT: f64 = 800.0;

/// Milestones reported while an import runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportStage {
    /// Container opened, entries listed.
    Unpack,
    /// Payload entry chosen, metadata read.
    Locate,
    /// Payload parsed into a JSON tree.
    Parse,
    /// Tree converted to elements.
    Convert,
    /// Canvas size and assets resolved.
    Finalize,
}

impl ImportStage {
    /// Progress value in percent, for shells that show a bar.
    pub fn percent(self) -> u8 {
        match self {
            ImportStage::Unpack => 20,
            ImportStage::Locate => 40,
            ImportStage::Parse => 60,
            ImportStage::Convert => 90,
            ImportStage::Finalize => 100,
        }
    }
}

/// An image or other resource carried alongside the document payload.
#[derive(Debug, Clone)]
pub struct ImportedAsset {
    /// Path inside the source archive.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Result of a successful import, not yet bound to a document.
#[derive(Debug)]
pub struct ImportedScene {
    /// Converted elements in paint order.
    pub elements: Vec<Element>,
    /// Canvas size inferred from the source.
    pub canvas_size: Size,
    /// Bundled resources, if the source was an archive.
    pub assets: Vec<ImportedAsset>,
}

impl ImportedScene {
    /// Materialize into a document, preserving element order.
    pub fn into_scene(self, name: &str) -> Scene {
        let mut scene = Scene::new();
        scene.name = name.to_string();
        scene.canvas_size = self.canvas_size;
        for element in self.elements {
            scene.add_element(element);
        }
        scene
    }
}

#[derive(Clone, Copy)]
enum Format {
    Archive,
    Json,
    Svg,
}

/// Import a file of any supported format, dispatching on its name and
/// leading bytes.
pub fn import_file(
    name: &str,
    bytes: &[u8],
    progress: &mut dyn FnMut(ImportStage),
) -> ImportResult<ImportedScene> {
    match sniff_format(name, bytes) {
        Some(Format::Archive) => import_archive(bytes, progress),
        Some(Format::Json) => {
            let imported = import_json(utf8(bytes)?)?;
            progress(ImportStage::Finalize);
            Ok(imported)
        }
        Some(Format::Svg) => {
            let imported = crate::svg::import_svg(utf8(bytes)?)?;
            progress(ImportStage::Finalize);
            Ok(imported)
        }
        None => Err(ImportError::UnsupportedFormat(name.to_string())),
    }
}

fn sniff_format(name: &str, bytes: &[u8]) -> Option<Format> {
    let lower = name.to_ascii_lowercase();
    for (suffix, format) in [
        (".sketch", Format::Archive),
        (".fig", Format::Archive),
        (".zip", Format::Archive),
        (".json", Format::Json),
        (".svg", Format::Svg),
    ] {
        if lower.ends_with(suffix) {
            return Some(format);
        }
    }
    if bytes.starts_with(b"PK") {
        return Some(Format::Archive);
    }
    match bytes.iter().find(|byte| !byte.is_ascii_whitespace()) {
        Some(b'{') | Some(b'[') => Some(Format::Json),
        Some(b'<') => Some(Format::Svg),
        _ => None,
    }
}

fn utf8(bytes: &[u8]) -> ImportResult<&str> {
    std::str::from_utf8(bytes)
        .map_err(|err| ImportError::UnparsablePayload(format!("not utf-8 text: {err}")))
}

/// Import a zip archive holding a JSON design document.
pub fn import_archive(
    bytes: &[u8],
    progress: &mut dyn FnMut(ImportStage),
) -> ImportResult<ImportedScene> {
    let archive = Archive::parse(bytes)?;
    progress(ImportStage::Unpack);

    let main = locate_main_entry(&archive).ok_or(ImportError::NoDataFile)?;
    log::info!("importing archive entry {}", main.name);
    let meta = archive
        .get(META_FILE)
        .and_then(|entry| std::str::from_utf8(&entry.data).ok())
        .and_then(|text| serde_json::from_str::<Value>(text).ok());
    progress(ImportStage::Locate);

    let text = utf8(&main.data)?;
    if text.trim().is_empty() {
        return Err(ImportError::UnparsablePayload("empty data file".to_string()));
    }
    let tree: Value =
        serde_json::from_str(text).map_err(|err| ImportError::UnparsablePayload(err.to_string()))?;
    progress(ImportStage::Parse);

    let elements = convert_tree(&tree);
    progress(ImportStage::Convert);

    let canvas_size = infer_canvas_size(&tree, meta.as_ref());
    let assets = collect_assets(&archive);
    progress(ImportStage::Finalize);

    Ok(ImportedScene {
        elements,
        canvas_size,
        assets,
    })
}

/// Import a bare JSON document: either our own serialized form or a
/// foreign design tree.
pub fn import_json(text: &str) -> ImportResult<ImportedScene> {
    if let Ok(scene) = Scene::from_json(text) {
        let elements = scene.elements_ordered().cloned().collect();
        return Ok(ImportedScene {
            elements,
            canvas_size: scene.canvas_size,
            assets: Vec::new(),
        });
    }

    let tree: Value =
        serde_json::from_str(text).map_err(|err| ImportError::UnparsablePayload(err.to_string()))?;
    let foreign = ["document", "pages", "layers", "children"]
        .iter()
        .any(|key| tree.get(key).is_some_and(js_truthy));
    if !foreign {
        return Err(ImportError::UnsupportedFormat(
            "json document with no recognizable shape".to_string(),
        ));
    }

    let elements = convert_tree(&tree);
    let canvas_size = infer_canvas_size(&tree, None);
    Ok(ImportedScene {
        elements,
        canvas_size,
        assets: Vec::new(),
    })
}

fn locate_main_entry(archive: &Archive) -> Option<&crate::archive::ArchiveEntry> {
    for name in MAIN_FILE_CANDIDATES {
        if let Some(entry) = archive.get(name) {
            return Some(entry);
        }
    }
    // The largest json is the likeliest payload; metadata never is.
    archive
        .entries()
        .iter()
        .filter(|entry| entry.name.ends_with(".json") && entry.name != META_FILE)
        .max_by_key(|entry| entry.data.len())
        .or_else(|| archive.entries().first())
}

fn collect_assets(archive: &Archive) -> Vec<ImportedAsset> {
    archive
        .entries()
        .iter()
        .filter(|entry| {
            let lower = entry.name.to_ascii_lowercase();
            let ext = lower.rsplit('.').next().unwrap_or("");
            ASSET_EXTENSIONS.contains(&ext)
        })
        .map(|entry| ImportedAsset {
            name: entry.name.clone(),
            bytes: entry.data.clone(),
        })
        .collect()
}

/// Walk a foreign JSON tree and convert every recognizable node.
pub(crate) fn convert_tree(tree: &Value) -> Vec<Element> {
    let mut elements = Vec::new();

    if let Some(document) = tree.get("document").filter(|value| js_truthy(value)) {
        walk_node(document, Vec2::ZERO, 0, true, &mut elements);
    } else if let Some(pages) = tree.get("pages").and_then(Value::as_array) {
        for page in pages {
            walk_node(page, Vec2::ZERO, 0, true, &mut elements);
        }
    } else if let Some(layers) = tree.get("layers").and_then(Value::as_array) {
        for layer in layers {
            walk_node(layer, Vec2::ZERO, 0, true, &mut elements);
        }
    } else if let Some(children) = tree.get("children").and_then(Value::as_array) {
        for child in children {
            walk_node(child, Vec2::ZERO, 0, true, &mut elements);
        }
    } else if let Some(nodes) = tree.as_array() {
        for node in nodes {
            walk_node(node, Vec2::ZERO, 0, true, &mut elements);
        }
    } else {
        walk_node(tree, Vec2::ZERO, 0, true, &mut elements);
    }

    if elements.len() <= SPARSE_LIMIT {
        log::info!(
            "conversion yielded {} elements, running fallback scans",
            elements.len()
        );
        scan_geometry(tree, 0, &mut elements);
        harvest_text(tree, 0, &mut elements);
        if elements.len() <= SPARSE_LIMIT {
            elements.extend(placeholder_elements());
        }
    }
    elements
}

/// Position and size resolved for one node.
struct NodeFrame {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    has_bbox: bool,
    has_size: bool,
}

fn node_frame(node: &Map<String, Value>, offset: Vec2) -> NodeFrame {
    let bbox = node.get("absoluteBoundingBox").and_then(Value::as_object);
    let bbox_field = |key: &str| bbox.and_then(|b| b.get(key)).and_then(Value::as_f64);
    let size_field =
        |key: &str| node.get("size").and_then(|size| size.get(key)).and_then(Value::as_f64);

    // A bounding box is absolute; loose x/y are relative to the parent.
    let x = bbox_field("x").unwrap_or_else(|| f64_field(node, "x").unwrap_or(0.0) + offset.x);
    let y = bbox_field("y").unwrap_or_else(|| f64_field(node, "y").unwrap_or(0.0) + offset.y);
    let width = first_nonzero(&[bbox_field("width"), f64_field(node, "width"), size_field("x")]);
    let height = first_nonzero(&[bbox_field("height"), f64_field(node, "height"), size_field("y")]);

    NodeFrame {
        x,
        y,
        width,
        height,
        has_bbox: node.get("absoluteBoundingBox").is_some_and(js_truthy),
        has_size: node.get("size").is_some_and(js_truthy),
    }
}

fn node_kind(node: &Map<String, Value>) -> String {
    if let Some(kind) = str_field(node, "type") {
        return kind.to_ascii_uppercase();
    }
    // Untyped nodes get a kind guessed from their fields.
    if str_field(node, "characters").is_some() || str_field(node, "text").is_some() {
        return "TEXT".to_string();
    }
    let has_fills = node.get("fills").is_some_and(js_truthy);
    if has_fills && node.contains_key("cornerRadius") {
        return "RECTANGLE".to_string();
    }
    if has_fills {
        return "ELLIPSE".to_string();
    }
    if node.get("children").is_some_and(js_truthy) {
        return "GROUP".to_string();
    }
    String::new()
}

fn walk_node(
    value: &Value,
    offset: Vec2,
    depth: usize,
    parent_visible: bool,
    out: &mut Vec<Element>,
) {
    let Some(node) = value.as_object() else {
        return;
    };
    if depth > MAX_DEPTH {
        log::warn!("node tree deeper than {MAX_DEPTH} levels, pruning");
        return;
    }

    let kind = node_kind(node);
    let frame = node_frame(node, offset);
    let visible = parent_visible && !matches!(node.get("visible"), Some(Value::Bool(false)));

    match kind.as_str() {
        "RECTANGLE" | "FRAME" | "COMPONENT" | "INSTANCE" | "COMPONENT_SET" => {
            convert_box(node, &frame, visible, out);
        }
        "ELLIPSE" | "CIRCLE" => convert_ellipse(node, &frame, visible, out),
        "TEXT" => convert_text(node, &frame, visible, out),
        "VECTOR" | "BOOLEAN_OPERATION" | "STAR" | "POLYGON" | "LINE" => {
            convert_vector(&kind, node, &frame, visible, out);
        }
        "IMAGE" | "RECTANGLE_IMAGE" => convert_image(node, &frame, visible, out),
        // Containers contribute nothing themselves.
        "GROUP" | "SECTION" | "CANVAS" | "DOCUMENT" | "PAGE" => {}
        _ => convert_unknown(node, &frame, visible, out),
    }

    if let Some(children) = node.get("children").and_then(Value::as_array) {
        // Children are walked after their parent so they paint on top.
        // Group coordinates are the base for group children; other kinds
        // already carry absolute child positions.
        let child_offset = if kind == "GROUP" || kind == "SECTION" {
            Vec2::new(frame.x, frame.y)
        } else {
            Vec2::ZERO
        };
        for child in children {
            walk_node(child, child_offset, depth + 1, visible, out);
        }
    }
}

fn convert_box(node: &Map<String, Value>, frame: &NodeFrame, visible: bool, out: &mut Vec<Element>) {
    if frame.width <= 0.0 || frame.height <= 0.0 {
        return;
    }
    let mut rect = Rectangle::new(Point::new(frame.x, frame.y), frame.width, frame.height)
        .with_corner_radius(f64_field(node, "cornerRadius").unwrap_or(0.0));
    // Transparent boxes are kept: frames without fills still mark layout.
    rect.style.fill = extract_color(field(node, "fills").or_else(|| field(node, "backgroundColor")));
    rect.style.stroke_color = extract_color(field(node, "strokes")).unwrap_or_else(transparent);
    rect.style.stroke_width = f64_field(node, "strokeWeight").unwrap_or(0.0);
    apply_common(&mut rect.style, node, visible);
    out.push(Element::Rectangle(rect));
}

fn convert_ellipse(
    node: &Map<String, Value>,
    frame: &NodeFrame,
    visible: bool,
    out: &mut Vec<Element>,
) {
    if frame.width <= 0.0 || frame.height <= 0.0 {
        return;
    }
    let radius = frame.width.min(frame.height) / 2.0;
    let center = Point::new(frame.x + frame.width / 2.0, frame.y + frame.height / 2.0);
    let mut ellipse = Ellipse::from_center(center, radius);
    ellipse.style.fill =
        Some(extract_color(field(node, "fills")).unwrap_or(Rgba::new(0x34, 0x98, 0xdb, 0xff)));
    ellipse.style.stroke_color = extract_color(field(node, "strokes")).unwrap_or_else(transparent);
    ellipse.style.stroke_width = f64_field(node, "strokeWeight").unwrap_or(0.0);
    apply_common(&mut ellipse.style, node, visible);
    out.push(Element::Ellipse(ellipse));
}

fn convert_text(node: &Map<String, Value>, frame: &NodeFrame, visible: bool, out: &mut Vec<Element>) {
    let content = text_content(node)
        .or_else(|| str_field(node, "name").map(str::to_string))
        .unwrap_or_else(|| "Text".to_string());

    let font_size = text_prop(node, "fontSize")
        .and_then(Value::as_f64)
        .filter(|size| *size != 0.0)
        .unwrap_or(16.0);
    let font_family = text_prop(node, "fontFamily")
        .and_then(Value::as_str)
        .filter(|family| !family.is_empty())
        .map(str::to_string)
        .or_else(|| {
            text_prop(node, "fontPostScriptName")
                .and_then(Value::as_str)
                .and_then(|name| name.split('-').next())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Arial".to_string());
    let color = extract_color(field(node, "fills"))
        .or_else(|| extract_color(style_obj(node).and_then(|style| field(style, "fills"))))
        .or_else(|| extract_color(field(node, "color")))
        .or_else(|| extract_color(style_obj(node).and_then(|style| field(style, "color"))))
        .unwrap_or_else(Rgba::black);
    let weight = match text_prop(node, "fontWeight") {
        Some(Value::Number(number)) if number.as_f64().unwrap_or(0.0) >= 600.0 => FontWeight::Bold,
        Some(Value::String(name)) if name.eq_ignore_ascii_case("bold") => FontWeight::Bold,
        _ => FontWeight::Normal,
    };
    let align = match text_prop(node, "textAlignHorizontal").and_then(Value::as_str) {
        Some(value) if value.eq_ignore_ascii_case("center") => TextAlign::Center,
        Some(value) if value.eq_ignore_ascii_case("right") => TextAlign::Right,
        _ => TextAlign::Left,
    };

    // Foreign y is the baseline, ours is the top edge of the line box.
    let mut text = Text::new(Point::new(frame.x, frame.y + font_size), content);
    text.font_size = font_size;
    text.font_family = font_family;
    text.weight = weight;
    text.align = align;
    text.letter_spacing = text_prop(node, "letterSpacing")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    text.line_height = text_prop(node, "lineHeightPx")
        .and_then(Value::as_f64)
        .filter(|px| *px != 0.0)
        .map(|px| px / font_size)
        .unwrap_or(1.2);
    text.style.fill = Some(color);
    apply_common(&mut text.style, node, visible);
    out.push(Element::Text(text));
}

fn convert_vector(
    kind: &str,
    node: &Map<String, Value>,
    frame: &NodeFrame,
    visible: bool,
    out: &mut Vec<Element>,
) {
    if frame.width <= 0.0 || frame.height <= 0.0 {
        return;
    }
    let origin = Vec2::new(frame.x, frame.y);
    let points = vector_samples(kind, node, frame.width, frame.height)
        .into_iter()
        .map(|point| point + origin)
        .collect();
    let brush = f64_field(node, "strokeWeight")
        .filter(|weight| *weight != 0.0)
        .unwrap_or(2.0);
    let mut path = FreehandPath::new(points, brush);
    path.style.fill = extract_color(field(node, "fills"));
    path.style.stroke_color = extract_color(field(node, "strokes")).unwrap_or_else(Rgba::black);
    apply_common(&mut path.style, node, visible);
    out.push(Element::Path(path));
}

/// Approximate a vector node with polyline samples in local coordinates.
fn vector_samples(kind: &str, node: &Map<String, Value>, width: f64, height: f64) -> Vec<Point> {
    use std::f64::consts::PI;

    let box_outline = || {
        vec![
            Point::new(0.0, 0.0),
            Point::new(width, 0.0),
            Point::new(width, height),
            Point::new(0.0, height),
            Point::new(0.0, 0.0),
        ]
    };

    // Real outline data would need a full path parser; the box stands in.
    if node
        .get("vectorData")
        .and_then(Value::as_array)
        .is_some_and(|data| !data.is_empty())
    {
        return box_outline();
    }

    match kind {
        "STAR" => {
            let spikes = f64_field(node, "pointCount")
                .filter(|count| *count != 0.0)
                .unwrap_or(5.0) as usize;
            let outer = width.min(height) / 2.0;
            let inner = outer * 0.5;
            let center = Point::new(width / 2.0, height / 2.0);
            let mut samples = Vec::with_capacity(spikes * 2 + 1);
            for i in 0..spikes * 2 {
                let radius = if i % 2 == 0 { outer } else { inner };
                let angle = i as f64 * PI / spikes as f64 - PI / 2.0;
                samples.push(Point::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                ));
            }
            if let Some(first) = samples.first().copied() {
                samples.push(first);
            }
            samples
        }
        "POLYGON" => {
            let sides = f64_field(node, "pointCount")
                .filter(|count| *count != 0.0)
                .unwrap_or(6.0) as usize;
            let radius = width.min(height) / 2.0;
            let center = Point::new(width / 2.0, height / 2.0);
            let mut samples = Vec::with_capacity(sides + 1);
            for i in 0..sides {
                let angle = i as f64 * 2.0 * PI / sides as f64 - PI / 2.0;
                samples.push(Point::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                ));
            }
            if let Some(first) = samples.first().copied() {
                samples.push(first);
            }
            samples
        }
        "LINE" => vec![Point::new(0.0, height / 2.0), Point::new(width, height / 2.0)],
        _ => box_outline(),
    }
}

fn convert_image(
    node: &Map<String, Value>,
    frame: &NodeFrame,
    visible: bool,
    out: &mut Vec<Element>,
) {
    if frame.width <= 0.0 || frame.height <= 0.0 {
        return;
    }
    // Pixel data is carried separately as an asset; the canvas gets a
    // gray stand-in at the image's frame.
    let mut rect = Rectangle::new(Point::new(frame.x, frame.y), frame.width, frame.height);
    rect.style.fill = Some(Rgba::new(0xe0, 0xe0, 0xe0, 0xff));
    rect.style.stroke_color = Rgba::new(0x99, 0x99, 0x99, 0xff);
    rect.style.stroke_width = 1.0;
    apply_common(&mut rect.style, node, visible);
    out.push(Element::Rectangle(rect));
}

fn convert_unknown(
    node: &Map<String, Value>,
    frame: &NodeFrame,
    visible: bool,
    out: &mut Vec<Element>,
) {
    let sized = frame.width > 0.0 && frame.height > 0.0;
    if !sized && !frame.has_bbox && !frame.has_size {
        return;
    }
    let width = if frame.width != 0.0 { frame.width } else { 50.0 };
    let height = if frame.height != 0.0 { frame.height } else { 50.0 };

    let mut rect = Rectangle::new(Point::new(frame.x, frame.y), width, height);
    rect.style.fill =
        Some(extract_color(field(node, "fills")).unwrap_or(Rgba::new(0xcc, 0xcc, 0xcc, 0xff)));
    rect.style.stroke_color =
        extract_color(field(node, "strokes")).unwrap_or(Rgba::new(0x99, 0x99, 0x99, 0xff));
    rect.style.stroke_width = f64_field(node, "strokeWeight")
        .filter(|weight| *weight != 0.0)
        .unwrap_or(1.0);
    apply_common(&mut rect.style, node, visible);
    out.push(Element::Rectangle(rect));
}

fn apply_common(style: &mut Style, node: &Map<String, Value>, visible: bool) {
    style.opacity = f64_field(node, "opacity").unwrap_or(1.0).clamp(0.0, 1.0);
    style.visible = visible;
}

fn transparent() -> Rgba {
    Rgba::new(0, 0, 0, 0)
}

fn text_content(node: &Map<String, Value>) -> Option<String> {
    if let Some(text) = str_field(node, "characters")
        .or_else(|| str_field(node, "text"))
        .or_else(|| str_field(node, "content"))
    {
        return Some(text.to_string());
    }
    let runs = node.get("runs").and_then(Value::as_array)?;
    let joined: String = runs
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|run| str_field(run, "text"))
        .collect();
    if joined.is_empty() { None } else { Some(joined) }
}

/// Typography lives either on a nested style object or on the node itself.
fn text_prop<'a>(node: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    style_obj(node)
        .and_then(|style| field(style, key))
        .or_else(|| field(node, key))
}

fn style_obj(node: &Map<String, Value>) -> Option<&Map<String, Value>> {
    node.get("style").and_then(Value::as_object)
}

// Field helpers mirror the loose member access foreign trees expect:
// null and empty values fall through to the next candidate.

fn field<'a>(node: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    node.get(key).filter(|value| js_truthy(value))
}

fn f64_field(node: &Map<String, Value>, key: &str) -> Option<f64> {
    node.get(key).and_then(Value::as_f64)
}

fn str_field<'a>(node: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    node.get(key).and_then(Value::as_str).filter(|text| !text.is_empty())
}

fn first_nonzero(candidates: &[Option<f64>]) -> f64 {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|value| *value != 0.0)
        .unwrap_or(0.0)
}

fn js_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Resolve a fill or stroke specification to a single color.
///
/// Accepts a direct `{r, g, b, a}` object with unit channels, a CSS-style
/// string, or a paint array where the first solid entry wins over the
/// first gradient, which wins over anything else still visible.
pub(crate) fn extract_color(value: Option<&Value>) -> Option<Rgba> {
    match value? {
        Value::Object(object)
            if object.contains_key("r")
                && object.contains_key("g")
                && object.contains_key("b") =>
        {
            unit_color(object, 1.0)
        }
        Value::String(text) => parse_color_string(text),
        Value::Array(entries) => {
            let candidates: Vec<&Map<String, Value>> = entries
                .iter()
                .filter_map(Value::as_object)
                .filter(|entry| {
                    !matches!(entry.get("visible"), Some(Value::Bool(false)))
                        && entry.get("opacity").and_then(Value::as_f64) != Some(0.0)
                })
                .collect();
            let solid = candidates
                .iter()
                .find(|entry| str_field(entry, "type") == Some("SOLID"));
            let gradient = candidates.iter().find(|entry| {
                str_field(entry, "type").is_some_and(|kind| kind.starts_with("GRADIENT_"))
            });
            let entry = solid.or(gradient).or(candidates.first())?;
            entry_color(entry)
        }
        _ => None,
    }
}

fn entry_color(entry: &Map<String, Value>) -> Option<Rgba> {
    let opacity = entry.get("opacity").and_then(Value::as_f64).unwrap_or(1.0);
    let kind = str_field(entry, "type").unwrap_or("");

    if kind == "SOLID" {
        if let Some(color) = entry.get("color").and_then(Value::as_object) {
            return unit_color(color, opacity);
        }
    }
    if kind.starts_with("GRADIENT_") {
        // Flattened to the first stop; gradients are not reconstructed.
        if let Some(stop) = entry
            .get("gradientStops")
            .and_then(Value::as_array)
            .and_then(|stops| stops.first())
            .and_then(|stop| stop.get("color"))
            .and_then(Value::as_object)
        {
            return unit_color(stop, opacity);
        }
    }
    // Loose entries carry a bare color object or a hex string.
    if let Some(color) = entry.get("color").and_then(Value::as_object) {
        if color.get("a").and_then(Value::as_f64).is_some_and(|a| a < 0.1) {
            return None;
        }
        let r = color.get("r").and_then(Value::as_f64)?;
        let g = color.get("g").and_then(Value::as_f64)?;
        let b = color.get("b").and_then(Value::as_f64)?;
        return Some(Rgba::new(unit_channel(r), unit_channel(g), unit_channel(b), 255));
    }
    str_field(entry, "hex").and_then(Rgba::from_hex)
}

fn unit_color(object: &Map<String, Value>, extra_opacity: f64) -> Option<Rgba> {
    let r = object.get("r").and_then(Value::as_f64)?;
    let g = object.get("g").and_then(Value::as_f64)?;
    let b = object.get("b").and_then(Value::as_f64)?;
    let alpha = object.get("a").and_then(Value::as_f64).unwrap_or(1.0) * extra_opacity;
    if alpha < 0.01 {
        return None;
    }
    Some(Rgba::new(
        unit_channel(r),
        unit_channel(g),
        unit_channel(b),
        unit_channel(alpha),
    ))
}

fn unit_channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn byte_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

/// Parse `#hex`, `rgb()` and `rgba()` strings. `transparent` and `none`
/// mean no color at all.
pub(crate) fn parse_color_string(text: &str) -> Option<Rgba> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("transparent") || text.eq_ignore_ascii_case("none") {
        return None;
    }
    if text.starts_with('#') {
        return Rgba::from_hex(text);
    }
    let body = text
        .strip_prefix("rgba(")
        .or_else(|| text.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }
    let r = parts[0].parse::<f64>().ok()?;
    let g = parts[1].parse::<f64>().ok()?;
    let b = parts[2].parse::<f64>().ok()?;
    let alpha = match parts.get(3) {
        Some(part) => part.parse::<f64>().ok()?,
        None => 1.0,
    };
    Some(Rgba::new(byte_channel(r), byte_channel(g), byte_channel(b), unit_channel(alpha)))
}

/// Loose pass over the whole tree for anything with dimensions, used when
/// the structured walk found almost nothing.
fn scan_geometry(value: &Value, depth: usize, out: &mut Vec<Element>) {
    if depth > SCAN_DEPTH {
        return;
    }
    match value {
        Value::Object(node) => {
            if node.get("width").is_some_and(js_truthy)
                || node.get("height").is_some_and(js_truthy)
                || node.get("absoluteBoundingBox").is_some_and(js_truthy)
                || node.get("size").is_some_and(js_truthy)
            {
                push_duck_typed(node, out);
            }
            for child in node.values() {
                match child {
                    Value::Array(items) => {
                        for item in items {
                            scan_geometry(item, depth + 1, out);
                        }
                    }
                    Value::Object(_) => scan_geometry(child, depth + 1, out),
                    _ => {}
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                scan_geometry(item, depth + 1, out);
            }
        }
        _ => {}
    }
}

fn push_duck_typed(node: &Map<String, Value>, out: &mut Vec<Element>) {
    let bbox = node.get("absoluteBoundingBox").and_then(Value::as_object);
    let bbox_field = |key: &str| bbox.and_then(|b| b.get(key)).and_then(Value::as_f64);
    let size_field =
        |key: &str| node.get("size").and_then(|size| size.get(key)).and_then(Value::as_f64);

    let x = first_nonzero(&[f64_field(node, "x"), bbox_field("x")]);
    let y = first_nonzero(&[f64_field(node, "y"), bbox_field("y")]);
    let width = [f64_field(node, "width"), bbox_field("width"), size_field("x")]
        .into_iter()
        .flatten()
        .find(|value| *value != 0.0)
        .unwrap_or(100.0);
    let height = [f64_field(node, "height"), bbox_field("height"), size_field("y")]
        .into_iter()
        .flatten()
        .find(|value| *value != 0.0)
        .unwrap_or(50.0);
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    let fill_source = field(node, "fill")
        .or_else(|| field(node, "fills"))
        .or_else(|| field(node, "backgroundColor"));
    let stroke = extract_color(field(node, "stroke").or_else(|| field(node, "strokes")))
        .unwrap_or(Rgba::new(0x2c, 0x3e, 0x50, 0xff));
    let stroke_width = f64_field(node, "strokeWidth").unwrap_or(0.0);
    let opacity = f64_field(node, "opacity").filter(|value| *value != 0.0).unwrap_or(1.0);
    let visible = !matches!(node.get("visible"), Some(Value::Bool(false)));

    let content = str_field(node, "text")
        .or_else(|| str_field(node, "characters"))
        .or_else(|| str_field(node, "content"));

    if let Some(content) = content {
        let mut text = Text::new(Point::new(x, y), content.to_string());
        text.font_size = f64_field(node, "fontSize").filter(|size| *size != 0.0).unwrap_or(16.0);
        text.font_family = str_field(node, "fontFamily").unwrap_or("Arial").to_string();
        text.style.fill = Some(extract_color(fill_source).unwrap_or_else(Rgba::black));
        text.style.stroke_color = stroke;
        text.style.stroke_width = stroke_width;
        text.style.opacity = opacity.clamp(0.0, 1.0);
        text.style.visible = visible;
        out.push(Element::Text(text));
    } else if str_field(node, "type") == Some("ELLIPSE") || str_field(node, "shape") == Some("circle")
    {
        let mut ellipse = Ellipse::new(Point::new(x, y), width.min(height) / 2.0);
        ellipse.style.fill =
            Some(extract_color(fill_source).unwrap_or(Rgba::new(0x34, 0x98, 0xdb, 0xff)));
        ellipse.style.stroke_color = stroke;
        ellipse.style.stroke_width = stroke_width;
        ellipse.style.opacity = opacity.clamp(0.0, 1.0);
        ellipse.style.visible = visible;
        out.push(Element::Ellipse(ellipse));
    } else {
        let mut rect = Rectangle::new(Point::new(x, y), width, height);
        rect.style.fill =
            Some(extract_color(fill_source).unwrap_or(Rgba::new(0x34, 0x98, 0xdb, 0xff)));
        rect.style.stroke_color = stroke;
        rect.style.stroke_width = stroke_width;
        rect.style.opacity = opacity.clamp(0.0, 1.0);
        rect.style.visible = visible;
        out.push(Element::Rectangle(rect));
    }
}

/// Pull every piece of text out of the tree, wherever it hides.
fn harvest_text(value: &Value, depth: usize, out: &mut Vec<Element>) {
    if depth > TEXT_DEPTH {
        return;
    }
    let Some(node) = value.as_object() else {
        return;
    };

    if let Some(content) = harvested_content(node) {
        let bbox = node.get("absoluteBoundingBox").and_then(Value::as_object);
        let bbox_field = |key: &str| bbox.and_then(|b| b.get(key)).and_then(Value::as_f64);
        let x = first_nonzero(&[bbox_field("x"), f64_field(node, "x")]);
        let y = first_nonzero(&[bbox_field("y"), f64_field(node, "y")]);
        let font_size = [
            style_obj(node).and_then(|style| style.get("fontSize")).and_then(Value::as_f64),
            f64_field(node, "fontSize"),
            node.get("textData").and_then(|data| data.get("fontSize")).and_then(Value::as_f64),
        ]
        .into_iter()
        .flatten()
        .find(|size| *size != 0.0)
        .unwrap_or(16.0);

        let mut text = Text::new(Point::new(x, y + font_size), content);
        text.font_size = font_size;
        text.font_family = style_obj(node)
            .and_then(|style| str_field(style, "fontFamily"))
            .or_else(|| str_field(node, "fontFamily"))
            .unwrap_or("Arial")
            .to_string();
        text.style.fill = Some(
            extract_color(
                field(node, "fills")
                    .or_else(|| style_obj(node).and_then(|style| field(style, "fills")))
                    .or_else(|| field(node, "color")),
            )
            .unwrap_or_else(Rgba::black),
        );
        out.push(Element::Text(text));
    }

    if let Some(children) = node.get("children").and_then(Value::as_array) {
        for child in children {
            harvest_text(child, depth + 1, out);
        }
    }
    for key in ["layers", "elements", "items", "components"] {
        if let Some(items) = node.get(key).and_then(Value::as_array) {
            for item in items {
                harvest_text(item, depth + 1, out);
            }
        }
    }
}

fn harvested_content(node: &Map<String, Value>) -> Option<String> {
    let direct = str_field(node, "characters")
        .or_else(|| str_field(node, "text"))
        .or_else(|| str_field(node, "content"))
        .or_else(|| {
            node.get("textData")
                .and_then(Value::as_object)
                .and_then(|data| str_field(data, "characters"))
        })
        .or_else(|| str_field(node, "textContent"));

    let content = match direct {
        Some(text) => text.to_string(),
        None => node
            .get("runs")
            .and_then(Value::as_array)?
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|run| str_field(run, "text").or_else(|| str_field(run, "characters")))
            .collect(),
    };
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Stand-in scene for imports where nothing could be recognized.
pub(crate) fn placeholder_elements() -> Vec<Element> {
    let mut background = Rectangle::new(Point::new(0.0, 0.0), 800.0, 600.0);
    background.style.fill = Some(Rgba::new(0x1a, 0x1a, 0x1a, 0xff));
    background.style.stroke_width = 0.0;

    let mut headline = Text::new(Point::new(50.0, 80.0), "Imported document".to_string());
    headline.font_size = 36.0;
    headline.style.fill = Some(Rgba::white());

    let mut note = Text::new(
        Point::new(50.0, 150.0),
        "No recognizable layers were found in this file".to_string(),
    );
    note.font_size = 14.0;
    note.style.fill = Some(Rgba::new(0xcc, 0xcc, 0xcc, 0xff));

    let mut button = Rectangle::new(Point::new(50.0, 200.0), 120.0, 40.0);
    button.style.fill = Some(Rgba::new(0xff, 0x6b, 0x35, 0xff));
    button.style.stroke_width = 0.0;

    let mut label = Text::new(Point::new(72.0, 212.0), "Placeholder".to_string());
    label.font_size = 14.0;
    label.style.fill = Some(Rgba::white());

    vec![
        Element::Rectangle(background),
        Element::Text(headline),
        Element::Text(note),
        Element::Rectangle(button),
        Element::Text(label),
    ]
}

/// Infer the canvas size from the tree, falling back to archive metadata.
fn infer_canvas_size(tree: &Value, meta: Option<&Value>) -> Size {
    if let Some(frame) = tree
        .get("pages")
        .and_then(Value::as_array)
        .and_then(|pages| pages.first())
        .and_then(|page| page.get("frame"))
        .and_then(Value::as_object)
    {
        let width = frame
            .get("width")
            .and_then(Value::as_f64)
            .filter(|value| *value != 0.0)
            .unwrap_or(1920.0);
        let height = frame
            .get("height")
            .and_then(Value::as_f64)
            .filter(|value| *value != 0.0)
            .unwrap_or(1080.0);
        return Size::new(width.max(MIN_CANVAS_WIDTH), height.max(MIN_CANVAS_HEIGHT));
    }

    if let Some(bbox) = tree
        .get("document")
        .and_then(|document| document.get("children"))
        .and_then(Value::as_array)
        .and_then(|children| children.first())
        .and_then(|child| child.get("absoluteBoundingBox"))
        .and_then(Value::as_object)
    {
        if let (Some(width), Some(height)) = (
            bbox.get("width").and_then(Value::as_f64),
            bbox.get("height").and_then(Value::as_f64),
        ) {
            return Size::new(width.max(MIN_CANVAS_WIDTH), height.max(MIN_CANVAS_HEIGHT));
        }
    }

    if let Some(size) = meta
        .and_then(|meta| meta.get("canvasSize"))
        .and_then(Value::as_object)
    {
        // Explicit metadata is trusted as-is, no widening.
        let width = size
            .get("width")
            .and_then(Value::as_f64)
            .filter(|value| *value != 0.0)
            .unwrap_or(1920.0);
        let height = size
            .get("height")
            .and_then(Value::as_f64)
            .filter(|value| *value != 0.0)
            .unwrap_or(1080.0);
        return Size::new(width, height);
    }

    Size::new(1920.0, 1080.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::write_archive;
    use serde_json::json;

    fn rect_element(element: &Element) -> &Rectangle {
        match element {
            Element::Rectangle(rect) => rect,
            other => panic!("Expected rectangle, got {other:?}"),
        }
    }

    fn text_element(element: &Element) -> &Text {
        match element {
            Element::Text(text) => text,
            other => panic!("Expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_archive_import_places_rectangles() {
        let document = json!({
            "document": {
                "type": "DOCUMENT",
                "children": [{
                    "type": "CANVAS",
                    "children": [
                        {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 0.0, "y": 0.0, "width": 50.0, "height": 50.0}},
                        {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 100.0, "y": 0.0, "width": 50.0, "height": 50.0}},
                        {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 200.0, "y": 0.0, "width": 50.0, "height": 50.0}},
                    ],
                }],
            },
        });
        let payload = serde_json::to_vec(&document).unwrap();
        let bytes = write_archive(&[("document.json", payload.as_slice())]);

        let mut percents = Vec::new();
        let imported = import_archive(&bytes, &mut |stage| percents.push(stage.percent())).unwrap();

        assert_eq!(imported.elements.len(), 3);
        for (index, expected_x) in [0.0, 100.0, 200.0].iter().enumerate() {
            let rect = rect_element(&imported.elements[index]);
            assert!((rect.position.x - expected_x).abs() < f64::EPSILON);
            assert!(rect.position.y.abs() < f64::EPSILON);
            assert!((rect.width - 50.0).abs() < f64::EPSILON);
            assert!((rect.height - 50.0).abs() < f64::EPSILON);
        }
        assert!((imported.canvas_size.width - 1920.0).abs() < f64::EPSILON);
        assert!((imported.canvas_size.height - 1080.0).abs() < f64::EPSILON);
        assert!(percents.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(percents.last(), Some(&100));
    }

    #[test]
    fn test_ellipse_is_centered_in_its_box() {
        let tree = json!({
            "children": [{
                "type": "ELLIPSE",
                "absoluteBoundingBox": {"x": 10.0, "y": 20.0, "width": 100.0, "height": 60.0},
            }],
        });
        let elements = convert_tree(&tree);
        match &elements[0] {
            Element::Ellipse(ellipse) => {
                assert!((ellipse.radius - 30.0).abs() < f64::EPSILON);
                assert!((ellipse.position.x - 30.0).abs() < f64::EPSILON);
                assert!((ellipse.position.y - 20.0).abs() < f64::EPSILON);
            }
            other => panic!("Expected ellipse, got {other:?}"),
        }
    }

    #[test]
    fn test_text_styling_is_carried_over() {
        let tree = json!({
            "children": [
                {
                    "type": "TEXT",
                    "characters": "Title",
                    "absoluteBoundingBox": {"x": 40.0, "y": 100.0, "width": 200.0, "height": 30.0},
                    "fills": [{"type": "SOLID", "color": {"r": 1.0, "g": 0.0, "b": 0.0}}],
                    "style": {
                        "fontSize": 24.0,
                        "fontFamily": "Inter",
                        "fontWeight": 700,
                        "textAlignHorizontal": "CENTER",
                        "letterSpacing": 1.5,
                        "lineHeightPx": 36.0,
                    },
                },
                // Keep the conversion above the sparse limit.
                {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0}},
                {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 20.0, "y": 0.0, "width": 10.0, "height": 10.0}},
            ],
        });
        let elements = convert_tree(&tree);
        assert_eq!(elements.len(), 3);

        let text = text_element(&elements[0]);
        assert_eq!(text.content, "Title");
        assert!((text.font_size - 24.0).abs() < f64::EPSILON);
        assert_eq!(text.font_family, "Inter");
        assert_eq!(text.weight, FontWeight::Bold);
        assert_eq!(text.align, TextAlign::Center);
        assert!((text.letter_spacing - 1.5).abs() < f64::EPSILON);
        assert!((text.line_height - 1.5).abs() < f64::EPSILON);
        // The source y is a baseline, so the top edge sits one font size lower.
        assert!((text.position.y - 124.0).abs() < f64::EPSILON);
        assert_eq!(text.style.fill, Some(Rgba::new(255, 0, 0, 255)));
    }

    #[test]
    fn test_text_runs_are_joined() {
        let tree = json!({
            "layers": [
                {"type": "TEXT", "runs": [{"text": "Hello "}, {"text": "world"}]},
                {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0}},
                {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 20.0, "y": 0.0, "width": 10.0, "height": 10.0}},
            ],
        });
        let elements = convert_tree(&tree);
        assert_eq!(text_element(&elements[0]).content, "Hello world");
    }

    #[test]
    fn test_star_becomes_closed_sample_path() {
        let tree = json!({
            "children": [
                {
                    "type": "STAR",
                    "pointCount": 5,
                    "absoluteBoundingBox": {"x": 10.0, "y": 10.0, "width": 100.0, "height": 100.0},
                },
                {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0}},
                {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 20.0, "y": 0.0, "width": 10.0, "height": 10.0}},
            ],
        });
        let elements = convert_tree(&tree);
        match &elements[0] {
            Element::Path(path) => {
                assert_eq!(path.points.len(), 11);
                assert_eq!(path.points.first(), path.points.last());
                assert!((path.brush_size - 2.0).abs() < f64::EPSILON);
                // Top spike of the star: centered horizontally, at the top edge.
                assert!((path.points[0].x - 60.0).abs() < 1e-9);
                assert!((path.points[0].y - 10.0).abs() < 1e-9);
            }
            other => panic!("Expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kinds_become_gray_boxes() {
        let tree = json!({
            "children": [
                {"type": "WIDGET", "absoluteBoundingBox": {"x": 5.0, "y": 5.0, "width": 80.0, "height": 40.0}},
                {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0}},
                {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 20.0, "y": 0.0, "width": 10.0, "height": 10.0}},
            ],
        });
        let elements = convert_tree(&tree);
        let rect = rect_element(&elements[0]);
        assert_eq!(rect.style.fill, Some(Rgba::new(0xcc, 0xcc, 0xcc, 0xff)));
        assert_eq!(rect.style.stroke_color, Rgba::new(0x99, 0x99, 0x99, 0xff));
        assert!((rect.style.stroke_width - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hidden_groups_hide_their_children() {
        let tree = json!({
            "children": [
                {
                    "type": "GROUP",
                    "x": 10.0,
                    "y": 20.0,
                    "visible": false,
                    "children": [
                        {"type": "RECTANGLE", "x": 5.0, "y": 5.0, "width": 30.0, "height": 30.0},
                    ],
                },
                {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0}},
                {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 20.0, "y": 0.0, "width": 10.0, "height": 10.0}},
            ],
        });
        let elements = convert_tree(&tree);
        let child = rect_element(&elements[0]);
        assert!(!child.style.visible);
        // Group children are offset by the group's own position.
        assert!((child.position.x - 15.0).abs() < f64::EPSILON);
        assert!((child.position.y - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_color_extraction_rules() {
        // A solid entry wins over an earlier gradient.
        let paints = json!([
            {"type": "GRADIENT_LINEAR", "gradientStops": [{"color": {"r": 0.0, "g": 1.0, "b": 0.0}}]},
            {"type": "SOLID", "color": {"r": 1.0, "g": 0.0, "b": 0.0}},
        ]);
        assert_eq!(extract_color(Some(&paints)), Some(Rgba::new(255, 0, 0, 255)));

        // Invisible solids are skipped entirely.
        let paints = json!([
            {"type": "SOLID", "visible": false, "color": {"r": 1.0, "g": 0.0, "b": 0.0}},
            {"type": "GRADIENT_RADIAL", "gradientStops": [{"color": {"r": 0.0, "g": 0.0, "b": 1.0}}]},
        ]);
        assert_eq!(extract_color(Some(&paints)), Some(Rgba::new(0, 0, 255, 255)));

        // Entry opacity multiplies into the alpha channel.
        let paints = json!([{"type": "SOLID", "opacity": 0.5, "color": {"r": 0.0, "g": 0.0, "b": 0.0, "a": 1.0}}]);
        assert_eq!(extract_color(Some(&paints)), Some(Rgba::new(0, 0, 0, 128)));

        // Direct color objects and strings.
        let direct = json!({"r": 0.0, "g": 0.0, "b": 1.0});
        assert_eq!(extract_color(Some(&direct)), Some(Rgba::new(0, 0, 255, 255)));
        assert_eq!(extract_color(Some(&json!("transparent"))), None);
        assert_eq!(extract_color(Some(&json!("#ff0000"))), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(
            extract_color(Some(&json!("rgba(255, 0, 0, 0.5)"))),
            Some(Rgba::new(255, 0, 0, 128))
        );

        // Loose entries with a hex field.
        let paints = json!([{"hex": "#00ff00"}]);
        assert_eq!(extract_color(Some(&paints)), Some(Rgba::new(0, 255, 0, 255)));

        assert_eq!(extract_color(None), None);
    }

    #[test]
    fn test_sparse_documents_fall_back_to_duck_typing() {
        // No recognizable tree shape, but three sized boxes hide inside.
        let tree = json!({
            "payload": {
                "items": [
                    {"x": 0.0, "y": 0.0, "width": 40.0, "height": 40.0},
                    {"x": 50.0, "y": 0.0, "width": 40.0, "height": 40.0},
                    {"x": 100.0, "y": 0.0, "width": 40.0, "height": 40.0},
                ],
            },
        });
        let elements = convert_tree(&tree);
        assert_eq!(elements.len(), 3);
        let rect = rect_element(&elements[1]);
        assert!((rect.position.x - 50.0).abs() < f64::EPSILON);
        assert_eq!(rect.style.fill, Some(Rgba::new(0x34, 0x98, 0xdb, 0xff)));
    }

    #[test]
    fn test_unrecognizable_input_gets_placeholder_scene() {
        let tree = json!({"foo": {"bar": true}});
        let elements = convert_tree(&tree);
        assert_eq!(elements.len(), 5);
        let background = rect_element(&elements[0]);
        assert!((background.width - 800.0).abs() < f64::EPSILON);
        assert!((background.height - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_native_json_roundtrip() {
        let mut scene = Scene::new();
        scene.canvas_size = Size::new(640.0, 480.0);
        scene.add_element(Element::Rectangle(Rectangle::new(
            Point::new(10.0, 10.0),
            100.0,
            50.0,
        )));
        let serialized = scene.to_json().unwrap();

        let imported = import_json(&serialized).unwrap();
        assert_eq!(imported.elements.len(), 1);
        assert!((imported.canvas_size.width - 640.0).abs() < f64::EPSILON);
        let rect = rect_element(&imported.elements[0]);
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shapeless_json_is_unsupported() {
        match import_json(r#"{"hello": 1}"#) {
            Err(ImportError::UnsupportedFormat(_)) => {}
            other => panic!("Expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_small_page_frames_widen_to_minimum_canvas() {
        let imported = import_json(r#"{"pages": [{"frame": {"width": 500, "height": 400}}]}"#).unwrap();
        assert!((imported.canvas_size.width - 1200.0).abs() < f64::EPSILON);
        assert!((imported.canvas_size.height - 800.0).abs() < f64::EPSILON);
        // The frame box duck-types in the fallback scan, and the scan's
        // single find is still sparse enough for the placeholder to follow.
        assert_eq!(imported.elements.len(), 6);
    }

    #[test]
    fn test_unknown_extension_sniffs_magic_bytes() {
        let document = json!({"children": [
            {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0}},
        ]});
        let payload = serde_json::to_vec(&document).unwrap();
        let bytes = write_archive(&[("document.json", payload.as_slice())]);

        let imported = import_file("export.bin", &bytes, &mut |_| {}).unwrap();
        assert!(!imported.elements.is_empty());

        match import_file("export.bin", b"no recognizable shape here", &mut |_| {}) {
            Err(ImportError::UnsupportedFormat(name)) => assert_eq!(name, "export.bin"),
            other => panic!("Expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_archive_has_no_data_file() {
        let bytes = write_archive(&[]);
        match import_archive(&bytes, &mut |_| {}) {
            Err(ImportError::NoDataFile) => {}
            other => panic!("Expected NoDataFile, got {other:?}"),
        }
    }

    #[test]
    fn test_assets_are_collected_from_archives() {
        let document = json!({"children": [
            {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0}},
            {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 20.0, "y": 0.0, "width": 10.0, "height": 10.0}},
            {"type": "RECTANGLE", "absoluteBoundingBox": {"x": 40.0, "y": 0.0, "width": 10.0, "height": 10.0}},
        ]});
        let payload = serde_json::to_vec(&document).unwrap();
        let bytes = write_archive(&[
            ("document.json", payload.as_slice()),
            ("images/logo.PNG", b"png bytes".as_slice()),
            ("notes.txt", b"not an asset".as_slice()),
        ]);
        let imported = import_archive(&bytes, &mut |_| {}).unwrap();
        assert_eq!(imported.assets.len(), 1);
        assert_eq!(imported.assets[0].name, "images/logo.PNG");
    }

    #[test]
    fn test_into_scene_keeps_order_and_canvas() {
        let imported = ImportedScene {
            elements: vec![
                Element::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0)),
                Element::Rectangle(Rectangle::new(Point::new(20.0, 0.0), 10.0, 10.0)),
            ],
            canvas_size: Size::new(800.0, 600.0),
            assets: Vec::new(),
        };
        let scene = imported.into_scene("From archive");
        assert_eq!(scene.name, "From archive");
        assert_eq!(scene.elements.len(), 2);
        assert!((scene.canvas_size.width - 800.0).abs() < f64::EPSILON);
        let first = scene.elements_ordered().next().unwrap();
        assert!(first.bounds().x0.abs() < f64::EPSILON);
    }
}
