//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use thiserror::Error;
use vexel_core::editor::Editor;
use vexel_core::elements::ElementId;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Unsupported image data: {0}")]
    UnsupportedImage(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single frame.
///
/// Camera, selection, snap guides and box-select state come from the
/// editor itself; the context carries what only the shell knows.
pub struct RenderContext<'a> {
    /// The editing session to draw.
    pub editor: &'a Editor,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Canvas background color.
    pub background_color: Color,
    /// Selection chrome color.
    pub selection_color: Color,
    /// Element currently being edited inline; skipped so the shell can draw
    /// its own editing overlay on top.
    pub editing_element: Option<ElementId>,
}

impl<'a> RenderContext<'a> {
    pub fn new(editor: &'a Editor, viewport_size: Size) -> Self {
        Self {
            editor,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(245, 245, 245, 255),
            selection_color: Color::from_rgba8(0, 123, 255, 255),
            editing_element: None,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the selection chrome color.
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Set the element being edited inline (skipped while drawing).
    pub fn with_editing_element(mut self, id: Option<ElementId>) -> Self {
        self.editing_element = id;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    ///
    /// Called once per frame; prepares all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Background color for clearing the surface.
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
