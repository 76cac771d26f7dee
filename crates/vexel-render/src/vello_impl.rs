//! Vello implementation of the renderer.

use crate::cache::{CacheStatus, ImageCache};
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Shape as KurboShape, Stroke, Vec2};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext};
use peniko::{Brush, Color, Fill, Mix};
use vello::Scene;
use vexel_core::elements::{
    BlendMode, Element, ElementTrait, FreehandPath, GradientKind, GradientSpec, Image, Rgba,
    ShadowSpec, Style, Text, TextAlign, TextDecoration,
};
use vexel_core::selection::{
    rotation_handle_center, selection_handles, Handle, HandleKind, HANDLE_SIZE,
    ROTATE_HANDLE_RADIUS,
};
use vexel_core::snap::{GapMeasurement, GuideAxis, SnapGuide};

/// Grid spacing in scene units.
const GRID_SPACING: f64 = 50.0;
/// Content padding around exports, in scene units.
const EXPORT_PADDING: f64 = 20.0;
/// Tick length on measurement segments, in screen pixels.
const MEASUREMENT_TICK: f64 = 6.0;
/// Measurement label size in screen pixels.
const MEASUREMENT_FONT_SIZE: f64 = 12.0;

/// Result of an offscreen render - raw RGBA pixel data and dimensions.
#[derive(Debug)]
pub struct ExportImage {
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl ExportImage {
    /// Encode the pixels as a PNG file.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|err| RendererError::RenderFailed(err.to_string()))?;
            writer
                .write_image_data(&self.rgba_data)
                .map_err(|err| RendererError::RenderFailed(err.to_string()))?;
        }
        Ok(png_data)
    }
}

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Selection chrome color.
    selection_color: Color,
    /// Font context for text layout (cached so system fonts are enumerated once).
    font_cx: FontContext,
    /// Layout context for text layout.
    layout_cx: LayoutContext<Brush>,
    /// Current zoom level (for zoom-independent chrome).
    zoom: f64,
    /// Decoded bitmap cache so images are not re-decoded every frame.
    image_cache: ImageCache,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an element blend mode onto the compositing mix.
fn blend_mix(mode: BlendMode) -> Mix {
    match mode {
        BlendMode::Normal => Mix::Normal,
        BlendMode::Multiply => Mix::Multiply,
        BlendMode::Screen => Mix::Screen,
        BlendMode::Overlay => Mix::Overlay,
        BlendMode::Darken => Mix::Darken,
        BlendMode::Lighten => Mix::Lighten,
        BlendMode::ColorDodge => Mix::ColorDodge,
        BlendMode::ColorBurn => Mix::ColorBurn,
        BlendMode::HardLight => Mix::HardLight,
        BlendMode::SoftLight => Mix::SoftLight,
        BlendMode::Difference => Mix::Difference,
        BlendMode::Exclusion => Mix::Exclusion,
        BlendMode::Hue => Mix::Hue,
        BlendMode::Saturation => Mix::Saturation,
        BlendMode::Color => Mix::Color,
        BlendMode::Luminosity => Mix::Luminosity,
    }
}

/// Color for a gradient stop or shadow with element opacity baked in.
fn tinted(color: Rgba, opacity: f64) -> Color {
    let alpha = (color.a as f64 * opacity.clamp(0.0, 1.0)) as u8;
    Color::from_rgba8(color.r, color.g, color.b, alpha)
}

/// Endpoints of a linear gradient run across `bounds` at `angle` degrees.
/// The run spans the rectangle's support along the gradient direction so the
/// first and last stops land exactly on the silhouette.
fn linear_gradient_endpoints(bounds: Rect, angle: f64) -> (Point, Point) {
    let center = bounds.center();
    let rad = angle.to_radians();
    let dir = Vec2::new(rad.cos(), rad.sin());
    let reach = (bounds.width() / 2.0) * dir.x.abs() + (bounds.height() / 2.0) * dir.y.abs();
    (center - dir * reach, center + dir * reach)
}

/// Build a peniko gradient from a gradient spec, stops spaced evenly.
fn gradient_brush(spec: &GradientSpec, bounds: Rect, opacity: f64) -> peniko::Gradient {
    let count = spec.stops.len();
    let stops: Vec<peniko::ColorStop> = spec
        .stops
        .iter()
        .enumerate()
        .map(|(i, &stop)| {
            let offset = if count <= 1 {
                0.0
            } else {
                i as f32 / (count - 1) as f32
            };
            peniko::ColorStop::from((offset, tinted(stop, opacity)))
        })
        .collect();

    let gradient = match spec.kind {
        GradientKind::Linear => {
            let (start, end) = linear_gradient_endpoints(bounds, spec.angle);
            peniko::Gradient::new_linear(start, end)
        }
        GradientKind::Radial => {
            let radius = bounds.width().hypot(bounds.height()) / 2.0;
            peniko::Gradient::new_radial(bounds.center(), radius as f32)
        }
    };
    gradient.with_stops(stops.as_slice())
}

/// Corner radius used when a shadow is approximated by its bounding box.
fn shadow_corner_radius(element: &Element) -> f64 {
    match element {
        Element::Rectangle(rect) => rect.corner_radius,
        Element::Ellipse(_) => {
            let bounds = element.bounds();
            bounds.width().min(bounds.height()) / 2.0
        }
        _ => 0.0,
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer. Fonts come from system discovery.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(0, 123, 255, 255),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            zoom: 1.0,
            image_cache: ImageCache::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Get mutable references to both font and layout contexts for overlays.
    pub fn contexts_mut(&mut self) -> (&mut FontContext, &mut LayoutContext<Brush>) {
        (&mut self.font_cx, &mut self.layout_cx)
    }

    /// The decoded image cache, for invalidation when payloads change.
    pub fn image_cache_mut(&mut self) -> &mut ImageCache {
        &mut self.image_cache
    }

    /// Build a scene for export (elements only, no grid/selection/guides).
    /// Returns the scene and the scaled bounds (for texture dimensions).
    ///
    /// `scale` is the export resolution multiplier (1 = 1x, 2 = 2x, 3 = 3x).
    pub fn build_export_scene(
        &mut self,
        document: &vexel_core::scene::Scene,
        scale: f64,
    ) -> (Scene, Option<Rect>) {
        self.scene.reset();
        self.zoom = scale;

        let Some(bounds) = document.bounds() else {
            return (std::mem::take(&mut self.scene), None);
        };

        let padded = bounds.inflate(EXPORT_PADDING, EXPORT_PADDING);
        let transform = Affine::scale(scale) * Affine::translate((-padded.x0, -padded.y0));

        let scaled_width = padded.width() * scale;
        let scaled_height = padded.height() * scale;

        let bg_rect = Rect::new(0.0, 0.0, scaled_width, scaled_height);
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, Color::WHITE, None, &bg_rect);

        for element in document.elements_ordered() {
            if !element.style().visible {
                continue;
            }
            self.render_element(element, transform);
        }

        let scaled_bounds = Rect::new(0.0, 0.0, scaled_width, scaled_height);
        (std::mem::take(&mut self.scene), Some(scaled_bounds))
    }

    /// Build a scene for exporting selected elements only. Group frames pull
    /// their members in even when the members are not selected themselves.
    ///
    /// `scale` is the export resolution multiplier.
    pub fn build_export_scene_selection(
        &mut self,
        document: &vexel_core::scene::Scene,
        selection: &[vexel_core::elements::ElementId],
        scale: f64,
    ) -> (Scene, Option<Rect>) {
        self.scene.reset();
        self.zoom = scale;

        if selection.is_empty() {
            return (std::mem::take(&mut self.scene), None);
        }

        let members = document.expand_with_members(selection);
        let Some(bounds) = document.bounds_of(&members) else {
            return (std::mem::take(&mut self.scene), None);
        };

        let padded = bounds.inflate(EXPORT_PADDING, EXPORT_PADDING);
        let transform = Affine::scale(scale) * Affine::translate((-padded.x0, -padded.y0));

        let scaled_width = padded.width() * scale;
        let scaled_height = padded.height() * scale;

        let bg_rect = Rect::new(0.0, 0.0, scaled_width, scaled_height);
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, Color::WHITE, None, &bg_rect);

        for element in document.elements_ordered() {
            if !members.contains(&element.id()) || !element.style().visible {
                continue;
            }
            self.render_element(element, transform);
        }

        let scaled_bounds = Rect::new(0.0, 0.0, scaled_width, scaled_height);
        (std::mem::take(&mut self.scene), Some(scaled_bounds))
    }

    /// Render a single element with its rotation, shadow and compositing.
    fn render_element(&mut self, element: &Element, transform: Affine) {
        // Group frames draw nothing; their members are ordinary scene
        // elements and render on their own.
        if element.is_group() {
            return;
        }

        let style = element.style();
        let bounds = element.bounds();
        let rotation = element.rotation();
        let transform = if rotation != 0.0 {
            transform * Affine::rotate_about(rotation.to_radians(), bounds.center())
        } else {
            transform
        };

        // Vector fills and strokes carry opacity in their colors; images get
        // it through a layer instead.
        let layer_alpha = if matches!(element, Element::Image(_)) {
            style.opacity.clamp(0.0, 1.0) as f32
        } else {
            1.0
        };
        let needs_layer = style.blend_mode != BlendMode::Normal || layer_alpha < 1.0;
        if needs_layer {
            let mut pad = style.stroke_width.max(1.0);
            if let Some(shadow) = &style.shadow {
                pad += shadow.offset_x.abs().max(shadow.offset_y.abs()) + shadow.blur * 3.0;
            }
            let clip = bounds.inflate(pad, pad);
            self.scene
                .push_layer(blend_mix(style.blend_mode), layer_alpha, transform, &clip);
        }

        if let Some(shadow) = style.shadow {
            self.render_shadow(element, &shadow, transform);
        }

        match element {
            Element::Text(text) => self.render_text(text, transform),
            Element::Image(image) => self.render_image(image, transform),
            Element::Path(path) => self.render_freehand(path, transform),
            _ if style.blur > 0.0 => self.render_blurred(element, transform),
            _ => self.render_outline(&element.to_path(), bounds, style, transform),
        }

        if needs_layer {
            self.scene.pop_layer();
        }
    }

    /// Fill and stroke an element outline.
    fn render_outline(&mut self, path: &BezPath, bounds: Rect, style: &Style, transform: Affine) {
        if let Some(gradient) = &style.gradient {
            let brush = gradient_brush(gradient, bounds, style.opacity);
            self.scene.fill(Fill::NonZero, transform, &brush, None, path);
        } else if let Some(fill_color) = style.fill_with_opacity() {
            self.scene.fill(Fill::NonZero, transform, fill_color, None, path);
        }

        if style.stroke_width > 0.0 {
            let stroke = Stroke::new(style.stroke_width);
            self.scene
                .stroke(&stroke, transform, style.stroke_with_opacity(), None, path);
        }
    }

    /// Draw a drop shadow under the element.
    fn render_shadow(&mut self, element: &Element, shadow: &ShadowSpec, transform: Affine) {
        let color = tinted(shadow.color, element.style().opacity);
        let offset = Affine::translate((shadow.offset_x, shadow.offset_y));
        if shadow.blur > 0.0 {
            // Blurred silhouette of the bounding box; exact path silhouettes
            // are not worth the cost at interactive rates.
            self.scene.draw_blurred_rounded_rect(
                transform * offset,
                element.bounds(),
                color,
                shadow_corner_radius(element),
                shadow.blur,
            );
        } else {
            self.scene
                .fill(Fill::NonZero, transform * offset, color, None, &element.to_path());
        }
    }

    /// Draw a shape with its blur radius applied. Vello has no general blur
    /// layer, so the shape becomes a blurred silhouette of its box, the same
    /// approximation shadows use. Text, images and freehand strokes ignore
    /// their blur radius.
    fn render_blurred(&mut self, element: &Element, transform: Affine) {
        let style = element.style();
        let color = style
            .fill_with_opacity()
            .unwrap_or_else(|| style.stroke_with_opacity());
        self.scene.draw_blurred_rounded_rect(
            transform,
            element.bounds(),
            color,
            shadow_corner_radius(element),
            style.blur,
        );
    }

    /// Stroke a freehand path with round caps and joins.
    fn render_freehand(&mut self, path: &FreehandPath, transform: Affine) {
        let color = path.style.stroke_with_opacity();
        if path.points.len() < 2 {
            // A tap leaves a single point; draw it as a dot.
            if let Some(&point) = path.points.first() {
                let dot = kurbo::Circle::new(point, path.brush_size / 2.0);
                self.scene
                    .fill(Fill::NonZero, transform, color, None, &dot.to_path(0.1));
            }
            return;
        }
        let stroke = Stroke::new(path.brush_size)
            .with_caps(Cap::Round)
            .with_join(Join::Round);
        self.scene
            .stroke(&stroke, transform, color, None, &path.to_path());
    }

    /// Render a text element using Parley for layout.
    fn render_text(&mut self, text: &Text, transform: Affine) {
        use parley::StyleProperty;
        use vexel_core::elements::FontWeight;

        if text.content.is_empty() {
            // Placeholder caret so empty text stays discoverable on canvas.
            let caret_height = text.font_size * 1.2;
            let caret = kurbo::Line::new(
                Point::new(text.position.x, text.position.y),
                Point::new(text.position.x, text.position.y + caret_height),
            );
            let stroke = Stroke::new(2.0);
            self.scene
                .stroke(&stroke, transform, Color::from_rgba8(100, 100, 100, 200), None, &caret);
            return;
        }

        let style = &text.style;
        let color = style
            .fill_with_opacity()
            .unwrap_or_else(|| style.stroke_with_opacity());
        let brush = Brush::Solid(color);
        let font_size = text.font_size as f32;

        let parley_weight = match text.weight {
            FontWeight::Normal => parley::FontWeight::NORMAL,
            FontWeight::Bold => parley::FontWeight::BOLD,
        };
        // Quoted family first, generic fallbacks so layout still shapes when
        // the family is not installed.
        let stack = format!("\"{}\", system-ui, sans-serif", text.font_family);

        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, &text.content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontWeight(parley_weight));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Source(
            std::borrow::Cow::Owned(stack),
        )));
        builder.push_default(StyleProperty::LineHeight(
            parley::LineHeight::FontSizeRelative(text.line_height as f32),
        ));
        if text.italic {
            builder.push_default(StyleProperty::FontStyle(parley::FontStyle::Italic));
        }
        if text.letter_spacing != 0.0 {
            builder.push_default(StyleProperty::LetterSpacing(text.letter_spacing as f32));
        }
        let mut layout = builder.build(&text.content);

        // Lines break only at explicit newlines; no wrap width.
        layout.break_all_lines(None);
        let alignment = match text.align {
            TextAlign::Left => parley::Alignment::Start,
            TextAlign::Center => parley::Alignment::Center,
            TextAlign::Right => parley::Alignment::End,
        };
        layout.align(None, alignment, parley::AlignmentOptions::default());

        // text.position is the top-left of the text box; Parley layouts have
        // y=0 at the top with the baseline offset down.
        let text_transform = transform * Affine::translate((text.position.x, text.position.y));
        let glyph_count = self.draw_glyph_runs(&layout, &brush, text.decoration, text_transform);

        // If no glyphs were produced (no font resolved), draw a fallback box.
        if glyph_count == 0 {
            let bounds = text.bounds();
            self.scene.fill(
                Fill::NonZero,
                transform,
                Color::from_rgba8(255, 100, 100, 100),
                None,
                &bounds.to_path(0.1),
            );
        }
    }

    /// Emit the glyph runs of a computed layout, with optional decoration.
    /// Returns the number of glyphs drawn.
    fn draw_glyph_runs(
        &mut self,
        layout: &parley::Layout<Brush>,
        brush: &Brush,
        decoration: TextDecoration,
        transform: Affine,
    ) -> usize {
        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        glyph_count += 1;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(brush)
                        .hint(true)
                        .transform(transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }

                match decoration {
                    TextDecoration::None => {}
                    TextDecoration::Underline => {
                        let metrics = run.metrics();
                        let (offset, size) = (metrics.underline_offset, metrics.underline_size);
                        self.draw_decoration_line(&glyph_run, offset, size, brush, transform);
                    }
                    TextDecoration::Strikethrough => {
                        let metrics = run.metrics();
                        let (offset, size) =
                            (metrics.strikethrough_offset, metrics.strikethrough_size);
                        self.draw_decoration_line(&glyph_run, offset, size, brush, transform);
                    }
                }
            }
        }
        glyph_count
    }

    /// Stroke a decoration line across a glyph run. `offset` is measured up
    /// from the baseline; y grows downward.
    fn draw_decoration_line(
        &mut self,
        glyph_run: &parley::layout::GlyphRun<'_, Brush>,
        offset: f32,
        size: f32,
        brush: &Brush,
        transform: Affine,
    ) {
        let y = glyph_run.baseline() - offset + size / 2.0;
        let line = kurbo::Line::new(
            (glyph_run.offset() as f64, y as f64),
            ((glyph_run.offset() + glyph_run.advance()) as f64, y as f64),
        );
        self.scene
            .stroke(&Stroke::new(size as f64), transform, brush, None, &line);
    }

    /// Draw a short single-line label centered on `at`, in scene units.
    fn draw_label(&mut self, content: &str, at: Point, font_size: f64, color: Color, transform: Affine) {
        use parley::StyleProperty;

        let brush = Brush::Solid(color);
        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Source(
            std::borrow::Cow::Borrowed("system-ui, sans-serif"),
        )));
        let mut layout = builder.build(content);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let offset = Affine::translate((
            at.x - layout.width() as f64 / 2.0,
            at.y - layout.height() as f64 / 2.0,
        ));
        self.draw_glyph_runs(&layout, &brush, TextDecoration::None, transform * offset);
    }

    /// Render an image element from the decoded cache. An element with no
    /// payload gets a placeholder; one waiting on a decode, or whose decode
    /// failed, draws nothing this frame.
    fn render_image(&mut self, image: &Image, transform: Affine) {
        if !image.has_data() {
            self.render_image_placeholder(image, transform);
            return;
        }
        let bitmap = match self.image_cache.get(image) {
            CacheStatus::Bitmap(bitmap) => bitmap,
            CacheStatus::Pending | CacheStatus::Missing => return,
        };

        let bounds = image.bounds();
        let scale_x = bounds.width() / bitmap.width as f64;
        let scale_y = bounds.height() / bitmap.height as f64;
        let (width, height) = (bitmap.width, bitmap.height);

        let image_data = peniko::ImageData {
            data: peniko::Blob::new(bitmap),
            format: peniko::ImageFormat::Rgba8,
            width,
            height,
            alpha_type: peniko::ImageAlphaType::Alpha,
        };

        let image_transform = transform
            * Affine::translate((bounds.x0, bounds.y0))
            * Affine::scale_non_uniform(scale_x, scale_y);

        self.scene.draw_image(&image_data.into(), image_transform);
    }

    /// Render a placeholder for images without a drawable payload.
    fn render_image_placeholder(&mut self, image: &Image, transform: Affine) {
        let bounds = image.bounds();

        let rect_path = bounds.to_path(0.1);
        self.scene.fill(
            Fill::NonZero,
            transform,
            Color::from_rgba8(200, 200, 200, 255),
            None,
            &rect_path,
        );

        // Diagonal X so the missing payload is obvious.
        let stroke = Stroke::new(2.0);
        let mut x_path = BezPath::new();
        x_path.move_to(Point::new(bounds.x0, bounds.y0));
        x_path.line_to(Point::new(bounds.x1, bounds.y1));
        x_path.move_to(Point::new(bounds.x1, bounds.y0));
        x_path.line_to(Point::new(bounds.x0, bounds.y1));
        self.scene.stroke(
            &stroke,
            transform,
            Color::from_rgba8(150, 150, 150, 255),
            None,
            &x_path,
        );

        self.scene.stroke(
            &stroke,
            transform,
            Color::from_rgba8(100, 100, 100, 255),
            None,
            &rect_path,
        );
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.selection_color = ctx.selection_color;

        let editor = ctx.editor;
        self.zoom = editor.camera.zoom * ctx.scale_factor;

        let camera_transform = Affine::scale(ctx.scale_factor) * editor.camera.transform();
        let viewport = Rect::new(0.0, 0.0, ctx.viewport_size.width, ctx.viewport_size.height);

        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            ctx.background_color,
            None,
            &viewport,
        );

        if editor.show_grid {
            self.render_grid(viewport, camera_transform, GRID_SPACING);
        }

        // Elements in z-order (skip the one being edited - the shell draws
        // its own editing overlay on top).
        for element in editor.scene.elements_ordered() {
            if !element.style().visible {
                continue;
            }
            if ctx.editing_element == Some(element.id()) {
                continue;
            }
            self.render_element(element, camera_transform);
        }

        if let Some(bounds) = editor.selection_bounds() {
            let single = editor.selection.len() == 1;
            self.render_selection_chrome(bounds, camera_transform, single);
        }

        if let Some(rect) = editor.box_select_rect() {
            self.render_box_select(rect, camera_transform);
        }

        if !editor.guides.is_empty() {
            self.render_snap_guides(&editor.guides, camera_transform, ctx.viewport_size);
        }

        if !editor.measurements.is_empty() {
            self.render_measurements(&editor.measurements, camera_transform);
        }
    }
}

impl VelloRenderer {
    /// Calculate grid bounds from viewport and transform.
    fn grid_bounds(&self, viewport: Rect, transform: Affine, spacing: f64) -> (f64, f64, f64, f64) {
        let inv = transform.inverse();
        let world_tl = inv * Point::new(viewport.x0, viewport.y0);
        let world_br = inv * Point::new(viewport.x1, viewport.y1);

        let start_x = (world_tl.x / spacing).floor() * spacing;
        let start_y = (world_tl.y / spacing).floor() * spacing;
        let end_x = (world_br.x / spacing).ceil() * spacing;
        let end_y = (world_br.y / spacing).ceil() * spacing;

        (start_x, start_y, end_x, end_y)
    }

    /// Render grid lines with the scene axes drawn heavier on top.
    fn render_grid(&mut self, viewport: Rect, transform: Affine, spacing: f64) {
        let grid_color = Color::from_rgba8(224, 224, 224, 255);
        let axis_color = Color::from_rgba8(176, 176, 176, 255);
        let stroke = Stroke::new(1.0 / self.zoom);

        let (start_x, start_y, end_x, end_y) = self.grid_bounds(viewport, transform, spacing);

        let mut x = start_x;
        while x <= end_x {
            let mut path = BezPath::new();
            path.move_to(Point::new(x, start_y));
            path.line_to(Point::new(x, end_y));
            self.scene.stroke(&stroke, transform, grid_color, None, &path);
            x += spacing;
        }

        let mut y = start_y;
        while y <= end_y {
            let mut path = BezPath::new();
            path.move_to(Point::new(start_x, y));
            path.line_to(Point::new(end_x, y));
            self.scene.stroke(&stroke, transform, grid_color, None, &path);
            y += spacing;
        }

        let axis_stroke = Stroke::new(2.0 / self.zoom);
        if start_x <= 0.0 && end_x >= 0.0 {
            let mut path = BezPath::new();
            path.move_to(Point::new(0.0, start_y));
            path.line_to(Point::new(0.0, end_y));
            self.scene
                .stroke(&axis_stroke, transform, axis_color, None, &path);
        }
        if start_y <= 0.0 && end_y >= 0.0 {
            let mut path = BezPath::new();
            path.move_to(Point::new(start_x, 0.0));
            path.line_to(Point::new(end_x, 0.0));
            self.scene
                .stroke(&axis_stroke, transform, axis_color, None, &path);
        }
    }

    /// Render the dashed selection box, and for single selections the resize
    /// handles plus the rotation handle with its stem.
    fn render_selection_chrome(&mut self, bounds: Rect, transform: Affine, single: bool) {
        let stroke_width = 1.0 / self.zoom;
        let dash_len = 5.0 / self.zoom;
        let stroke = Stroke::new(stroke_width).with_dashes(0.0, &[dash_len, dash_len]);

        let mut box_path = BezPath::new();
        box_path.move_to(Point::new(bounds.x0, bounds.y0));
        box_path.line_to(Point::new(bounds.x1, bounds.y0));
        box_path.line_to(Point::new(bounds.x1, bounds.y1));
        box_path.line_to(Point::new(bounds.x0, bounds.y1));
        box_path.close_path();
        self.scene
            .stroke(&stroke, transform, self.selection_color, None, &box_path);

        if !single {
            return;
        }

        // Stem from the top edge up to the rotation handle.
        let rotate_center = rotation_handle_center(bounds, self.zoom);
        let mut stem = BezPath::new();
        stem.move_to(Point::new(bounds.center().x, bounds.y0));
        stem.line_to(rotate_center);
        self.scene.stroke(
            &Stroke::new(stroke_width),
            transform,
            self.selection_color,
            None,
            &stem,
        );

        for handle in selection_handles(bounds, self.zoom) {
            self.render_handle(&handle, transform);
        }
    }

    /// Render a single handle. Sizes are scaled inversely with zoom to keep
    /// a constant screen size.
    fn render_handle(&mut self, handle: &Handle, transform: Affine) {
        let pos = handle.position;
        let border = Stroke::new(1.5 / self.zoom);

        match handle.kind {
            HandleKind::Rotate => {
                // Same radius the hit test uses, so the visible circle is
                // the clickable area.
                let radius = ROTATE_HANDLE_RADIUS / self.zoom;
                let path = kurbo::Circle::new(pos, radius).to_path(0.1);
                self.scene
                    .fill(Fill::NonZero, transform, Color::WHITE, None, &path);
                self.scene
                    .stroke(&border, transform, self.selection_color, None, &path);
            }
            HandleKind::Corner(_) | HandleKind::Edge(_) => {
                let half = HANDLE_SIZE / 2.0 / self.zoom;
                let rect = Rect::new(pos.x - half, pos.y - half, pos.x + half, pos.y + half);
                let path = rect.to_path(0.1);
                self.scene
                    .fill(Fill::NonZero, transform, Color::WHITE, None, &path);
                self.scene
                    .stroke(&border, transform, self.selection_color, None, &path);
            }
        }
    }

    /// Render the box-select marquee.
    fn render_box_select(&mut self, rect: Rect, transform: Affine) {
        let fill_color = Color::from_rgba8(0, 123, 255, 26);
        let mut path = BezPath::new();
        path.move_to(Point::new(rect.x0, rect.y0));
        path.line_to(Point::new(rect.x1, rect.y0));
        path.line_to(Point::new(rect.x1, rect.y1));
        path.line_to(Point::new(rect.x0, rect.y1));
        path.close_path();

        self.scene
            .fill(Fill::NonZero, transform, fill_color, None, &path);

        let stroke_width = 1.0 / self.zoom;
        let dash_len = 5.0 / self.zoom;
        let stroke = Stroke::new(stroke_width).with_dashes(0.0, &[dash_len, dash_len]);
        self.scene
            .stroke(&stroke, transform, self.selection_color, None, &path);
    }

    /// Render alignment guides as full-viewport lines.
    fn render_snap_guides(&mut self, guides: &[SnapGuide], transform: Affine, viewport_size: kurbo::Size) {
        let guide_color = Color::from_rgba8(255, 0, 255, 200);
        let stroke = Stroke::new(1.0 / self.zoom);

        // Convert screen bounds to world bounds so the lines span the view.
        let inv_transform = transform.inverse();
        let world_tl = inv_transform * Point::new(0.0, 0.0);
        let world_br = inv_transform * Point::new(viewport_size.width, viewport_size.height);

        for guide in guides {
            let mut path = BezPath::new();
            match guide.axis {
                GuideAxis::Vertical => {
                    path.move_to(Point::new(guide.position, world_tl.y));
                    path.line_to(Point::new(guide.position, world_br.y));
                }
                GuideAxis::Horizontal => {
                    path.move_to(Point::new(world_tl.x, guide.position));
                    path.line_to(Point::new(world_br.x, guide.position));
                }
            }
            self.scene.stroke(&stroke, transform, guide_color, None, &path);
        }
    }

    /// Render gap measurements: a segment with end ticks and a distance label.
    fn render_measurements(&mut self, measurements: &[GapMeasurement], transform: Affine) {
        let color = Color::from_rgba8(255, 107, 107, 255);
        let stroke = Stroke::new(1.0 / self.zoom);
        let half_tick = MEASUREMENT_TICK / 2.0 / self.zoom;

        for measurement in measurements {
            let delta = measurement.to - measurement.from;
            let length = delta.hypot();
            if length < f64::EPSILON {
                continue;
            }
            let dir = delta / length;
            let perp = Vec2::new(-dir.y, dir.x);

            let mut path = BezPath::new();
            path.move_to(measurement.from);
            path.line_to(measurement.to);
            path.move_to(measurement.from + perp * half_tick);
            path.line_to(measurement.from - perp * half_tick);
            path.move_to(measurement.to + perp * half_tick);
            path.line_to(measurement.to - perp * half_tick);
            self.scene.stroke(&stroke, transform, color, None, &path);

            let midpoint = measurement.from.midpoint(measurement.to);
            let label_at = midpoint + perp * (10.0 / self.zoom);
            let label = format!("{:.0}", measurement.distance);
            self.draw_label(&label, label_at, MEASUREMENT_FONT_SIZE / self.zoom, color, transform);
        }
    }
}
