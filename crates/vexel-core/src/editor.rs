//! The editor session: tool state, pointer gestures, selection and history.

use crate::camera::{
    Camera, FIT_CONTENT_MAX_ZOOM, FIT_CONTENT_PADDING, FIT_SELECTION_MAX_ZOOM,
    FIT_SELECTION_PADDING,
};
use crate::elements::{Element, ElementId, FontWeight, Style, TextAlign, TextDecoration};
use crate::history::{History, Snapshot};
use crate::input::{InputState, Modifiers, PointerButton};
use crate::scene::{Alignment, BooleanOp, Scene};
use crate::selection::{
    apply_resize, handle_at_point, is_resizable, pointer_angle_degrees, resize_bounds, Corner,
    HandleKind,
};
use crate::snap::{gap_measurements, snap_moving_bounds, GapMeasurement, SnapGuide};
use crate::tools::{create_element, ToolKind};
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::HashMap;

/// Pick slop around elements, in pixels.
pub const HIT_TOLERANCE: f64 = 3.0;

/// The gesture currently in progress. Every gesture that edits the scene
/// carries the snapshot taken before its first mutation; the snapshot is
/// committed to history on release, and only if something actually changed.
#[derive(Debug)]
enum Mode {
    Idle,
    Panning {
        anchor_pixel: Point,
        start_offset: Vec2,
    },
    MovingSelection {
        anchor: Point,
        origins: HashMap<ElementId, Point>,
        /// Bounds of the single selected element at gesture start; None for
        /// multi-selections, which do not snap.
        primary_bounds: Option<Rect>,
        before: Snapshot,
        moved: bool,
    },
    ResizingHandle {
        id: ElementId,
        handle: HandleKind,
        original: Rect,
        before: Snapshot,
        changed: bool,
    },
    Rotating {
        id: ElementId,
        center: Point,
        start_angle: f64,
        initial_rotation: f64,
        before: Snapshot,
        changed: bool,
    },
    DrawingShape {
        id: ElementId,
        anchor: Point,
        before: Snapshot,
    },
    DrawingPath {
        id: ElementId,
        before: Snapshot,
    },
    BoxSelecting {
        anchor: Point,
        current: Point,
    },
}

/// Visual properties captured by `copy_style` and replayed by
/// `paste_style`. Visibility and lock state belong to the target element
/// and are never pasted over.
#[derive(Debug, Clone)]
pub struct StyleClipboard {
    style: Style,
    rotation: f64,
    corner_radius: Option<f64>,
    typography: Option<Typography>,
}

#[derive(Debug, Clone)]
struct Typography {
    font_family: String,
    font_size: f64,
    weight: FontWeight,
    italic: bool,
    decoration: TextDecoration,
    align: TextAlign,
    line_height: f64,
    letter_spacing: f64,
}

impl StyleClipboard {
    fn capture(element: &Element) -> Self {
        let corner_radius = match element {
            Element::Rectangle(rect) => Some(rect.corner_radius),
            _ => None,
        };
        let typography = match element {
            Element::Text(text) => Some(Typography {
                font_family: text.font_family.clone(),
                font_size: text.font_size,
                weight: text.weight,
                italic: text.italic,
                decoration: text.decoration,
                align: text.align,
                line_height: text.line_height,
                letter_spacing: text.letter_spacing,
            }),
            _ => None,
        };
        Self {
            style: element.style().clone(),
            rotation: element.rotation(),
            corner_radius,
            typography,
        }
    }

    fn apply(&self, element: &mut Element) {
        let target = element.style_mut();
        let visible = target.visible;
        let locked = target.locked;
        *target = self.style.clone();
        target.visible = visible;
        target.locked = locked;
        element.set_rotation(self.rotation);
        if let Element::Rectangle(rect) = element {
            if let Some(radius) = self.corner_radius {
                rect.corner_radius = radius;
            }
        }
        if let Element::Text(text) = element {
            if let Some(typography) = &self.typography {
                text.font_family = typography.font_family.clone();
                text.font_size = typography.font_size;
                text.weight = typography.weight;
                text.italic = typography.italic;
                text.decoration = typography.decoration;
                text.align = typography.align;
                text.line_height = typography.line_height;
                text.letter_spacing = typography.letter_spacing;
            }
        }
    }
}

/// An editing session over one document.
///
/// The shell feeds pointer and keyboard events in viewport pixels; the
/// editor owns all scene-space interpretation.
pub struct Editor {
    pub scene: Scene,
    pub camera: Camera,
    pub history: History,
    pub input: InputState,
    pub tool: ToolKind,
    pub selection: Vec<ElementId>,
    pub viewport_size: Size,
    pub show_grid: bool,
    pub snap_enabled: bool,
    /// Alignment guides from the snap of the current move, for drawing.
    pub guides: Vec<SnapGuide>,
    /// Neighbor gaps measured while Alt-dragging, for drawing.
    pub measurements: Vec<GapMeasurement>,
    /// Topmost element under the idle pointer.
    pub hovered: Option<ElementId>,
    mode: Mode,
    double_clicked: Option<ElementId>,
    style_clipboard: Option<StyleClipboard>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::with_scene(Scene::new())
    }

    pub fn with_scene(scene: Scene) -> Self {
        Self {
            scene,
            camera: Camera::new(),
            history: History::new(),
            input: InputState::new(),
            tool: ToolKind::Select,
            selection: Vec::new(),
            viewport_size: Size::ZERO,
            show_grid: true,
            snap_enabled: true,
            guides: Vec::new(),
            measurements: Vec::new(),
            hovered: None,
            mode: Mode::Idle,
            double_clicked: None,
            style_clipboard: None,
        }
    }

    /// Replace the document, dropping selection and history.
    pub fn load_scene(&mut self, scene: Scene) {
        self.scene = scene;
        self.selection.clear();
        self.history.clear();
        self.hovered = None;
        self.guides.clear();
        self.measurements.clear();
        self.mode = Mode::Idle;
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    /// Switch tools. Ignored while a gesture is in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if matches!(self.mode, Mode::Idle) {
            self.tool = tool;
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.mode, Mode::Idle)
    }

    /// The box-select rectangle while one is being dragged.
    pub fn box_select_rect(&self) -> Option<Rect> {
        match self.mode {
            Mode::BoxSelecting { anchor, current } => Some(Rect::from_points(anchor, current)),
            _ => None,
        }
    }

    /// Element double-clicked since the last call, for the shell to open
    /// inline editing.
    pub fn take_double_clicked(&mut self) -> Option<ElementId> {
        self.double_clicked.take()
    }

    /// Bounding box of the current selection.
    pub fn selection_bounds(&self) -> Option<Rect> {
        self.scene.bounds_of(&self.selection)
    }

    fn hit_tolerance(&self) -> f64 {
        HIT_TOLERANCE / self.camera.zoom
    }

    // ------------------------------------------------------------------
    // Pointer events
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, pixel: Point, button: PointerButton, modifiers: Modifiers) {
        self.input.set_modifiers(modifiers);
        let double = self.input.on_button_down(button, pixel);
        if !matches!(self.mode, Mode::Idle) {
            return;
        }
        let point = self.camera.to_scene(pixel);

        // Panning: middle button, ctrl+primary with any tool, or
        // shift+primary with the select tool. The shift chord wins over
        // anything under the pointer, handles included.
        let pan_chord = button == PointerButton::Middle
            || (button == PointerButton::Primary && modifiers.ctrl)
            || (button == PointerButton::Primary
                && modifiers.shift
                && self.tool == ToolKind::Select);
        if pan_chord {
            self.mode = Mode::Panning {
                anchor_pixel: pixel,
                start_offset: self.camera.offset,
            };
            return;
        }
        if button != PointerButton::Primary {
            return;
        }

        // Selection handles, only with the select tool and a single
        // selected element.
        if self.tool == ToolKind::Select && self.selection.len() == 1 {
            let id = self.selection[0];
            if let Some(element) = self.scene.get(id) {
                let bounds = element.bounds();
                match handle_at_point(bounds, self.camera.zoom, point) {
                    Some(HandleKind::Rotate) => {
                        let center = bounds.center();
                        self.mode = Mode::Rotating {
                            id,
                            center,
                            start_angle: pointer_angle_degrees(center, point),
                            initial_rotation: element.rotation(),
                            before: Snapshot::capture(&self.scene),
                            changed: false,
                        };
                        return;
                    }
                    Some(handle) if is_resizable(element) && !element.style().locked => {
                        self.mode = Mode::ResizingHandle {
                            id,
                            handle,
                            original: bounds,
                            before: Snapshot::capture(&self.scene),
                            changed: false,
                        };
                        return;
                    }
                    _ => {}
                }
            }
        }

        match self.tool {
            ToolKind::Select => self.select_press(point, double),
            ToolKind::Pen => {
                let before = Snapshot::capture(&self.scene);
                if let Some(element) = create_element(ToolKind::Pen, point) {
                    let id = element.id();
                    self.scene.add_element(element);
                    self.mode = Mode::DrawingPath { id, before };
                }
            }
            ToolKind::Eraser => {
                if let Some(id) = self.scene.element_at_point(point, self.hit_tolerance()) {
                    self.history.record(&self.scene);
                    self.scene.remove_element(id);
                    self.selection.retain(|&kept| kept != id);
                }
            }
            tool if tool.draws_shape() => {
                let before = Snapshot::capture(&self.scene);
                if let Some(element) = create_element(tool, point) {
                    let id = element.id();
                    self.scene.add_element(element);
                    self.selection = vec![id];
                    self.mode = Mode::DrawingShape {
                        id,
                        anchor: point,
                        before,
                    };
                }
            }
            tool if tool.places_element() => {
                let before = Snapshot::capture(&self.scene);
                if let Some(element) = create_element(tool, point) {
                    let id = element.id();
                    self.scene.add_element(element);
                    self.selection = vec![id];
                    self.history.record_snapshot(before);
                }
            }
            _ => {}
        }
    }

    /// Press with the select tool: hit logic, move start or box select.
    fn select_press(&mut self, point: Point, double: bool) {
        match self.scene.element_at_point(point, self.hit_tolerance()) {
            Some(id) => {
                if double {
                    self.double_clicked = Some(id);
                }
                let locked = self
                    .scene
                    .get(id)
                    .map(|e| e.style().locked)
                    .unwrap_or(false);
                if !self.selection.contains(&id) {
                    self.selection = vec![id];
                }
                if locked {
                    // Locked elements can be selected but not dragged.
                    return;
                }

                let moving = self.scene.expand_with_members(&self.selection);
                let mut origins = HashMap::new();
                for &moving_id in &moving {
                    if let Some(element) = self.scene.get(moving_id) {
                        if !element.style().locked {
                            origins.insert(moving_id, element.bounds().origin());
                        }
                    }
                }
                let primary_bounds = if self.selection.len() == 1 {
                    self.scene.get(self.selection[0]).map(|e| e.bounds())
                } else {
                    None
                };
                self.mode = Mode::MovingSelection {
                    anchor: point,
                    origins,
                    primary_bounds,
                    before: Snapshot::capture(&self.scene),
                    moved: false,
                };
            }
            None => {
                self.mode = Mode::BoxSelecting {
                    anchor: point,
                    current: point,
                };
            }
        }
    }

    pub fn pointer_move(&mut self, pixel: Point, modifiers: Modifiers) {
        self.input.set_modifiers(modifiers);
        self.input.on_pointer_move(pixel);
        let point = self.camera.to_scene(pixel);

        let mode = std::mem::replace(&mut self.mode, Mode::Idle);
        self.mode = match mode {
            Mode::Idle => {
                self.hovered = self.scene.element_at_point(point, self.hit_tolerance());
                Mode::Idle
            }
            Mode::Panning {
                anchor_pixel,
                start_offset,
            } => {
                self.camera.offset = start_offset + (pixel - anchor_pixel);
                Mode::Panning {
                    anchor_pixel,
                    start_offset,
                }
            }
            Mode::MovingSelection {
                anchor,
                origins,
                primary_bounds,
                before,
                moved,
            } => {
                let raw = point - anchor;
                let delta = self.snapped_move_delta(raw, primary_bounds, &origins);
                for (&id, &origin) in &origins {
                    if let Some(element) = self.scene.get_mut(id) {
                        element.set_origin(origin + delta);
                    }
                }
                self.update_measurements(modifiers, primary_bounds, delta, &origins);
                let displaced = !origins.is_empty() && delta != Vec2::ZERO;
                Mode::MovingSelection {
                    anchor,
                    origins,
                    primary_bounds,
                    before,
                    moved: moved || displaced,
                }
            }
            Mode::ResizingHandle {
                id,
                handle,
                original,
                before,
                ..
            } => {
                let bounds = resize_bounds(original, handle, point, modifiers.shift);
                if let Some(element) = self.scene.get_mut(id) {
                    apply_resize(element, bounds);
                }
                Mode::ResizingHandle {
                    id,
                    handle,
                    original,
                    before,
                    changed: true,
                }
            }
            Mode::Rotating {
                id,
                center,
                start_angle,
                initial_rotation,
                before,
                ..
            } => {
                let angle = pointer_angle_degrees(center, point);
                if let Some(element) = self.scene.get_mut(id) {
                    element.set_rotation(initial_rotation + angle - start_angle);
                }
                Mode::Rotating {
                    id,
                    center,
                    start_angle,
                    initial_rotation,
                    before,
                    changed: true,
                }
            }
            Mode::DrawingShape { id, anchor, before } => {
                let frame = resize_bounds(
                    Rect::from_origin_size(anchor, Size::ZERO),
                    HandleKind::Corner(Corner::BottomRight),
                    point,
                    false,
                );
                if let Some(element) = self.scene.get_mut(id) {
                    apply_resize(element, frame);
                }
                Mode::DrawingShape { id, anchor, before }
            }
            Mode::DrawingPath { id, before } => {
                if let Some(Element::Path(path)) = self.scene.get_mut(id) {
                    path.push_point(point);
                }
                Mode::DrawingPath { id, before }
            }
            Mode::BoxSelecting { anchor, .. } => Mode::BoxSelecting {
                anchor,
                current: point,
            },
        };
    }

    /// Snap a proposed move delta against other elements. Applies only to
    /// single selections; the corrected delta moves every dragged element
    /// so groups stay rigid.
    fn snapped_move_delta(
        &mut self,
        raw: Vec2,
        primary_bounds: Option<Rect>,
        origins: &HashMap<ElementId, Point>,
    ) -> Vec2 {
        self.guides.clear();
        let Some(bounds) = primary_bounds else {
            return raw;
        };
        if !self.snap_enabled {
            return raw;
        }
        let others: Vec<Rect> = self
            .scene
            .elements_ordered()
            .filter(|e| e.style().visible && !origins.contains_key(&e.id()))
            .map(|e| e.bounds())
            .collect();
        let outcome = snap_moving_bounds(bounds + raw, &others, self.camera.zoom);
        self.guides = outcome.guides;
        raw + outcome.correction
    }

    fn update_measurements(
        &mut self,
        modifiers: Modifiers,
        primary_bounds: Option<Rect>,
        delta: Vec2,
        origins: &HashMap<ElementId, Point>,
    ) {
        self.measurements.clear();
        if !modifiers.alt {
            return;
        }
        let Some(bounds) = primary_bounds else {
            return;
        };
        let others: Vec<Rect> = self
            .scene
            .elements_ordered()
            .filter(|e| e.style().visible && !origins.contains_key(&e.id()))
            .map(|e| e.bounds())
            .collect();
        self.measurements = gap_measurements(bounds + delta, &others);
    }

    pub fn pointer_up(&mut self, pixel: Point, button: PointerButton) {
        self.input.on_button_up(button, pixel);
        self.finish_gesture();
    }

    /// Commit the gesture in progress, if any, and return to idle.
    fn finish_gesture(&mut self) {
        self.guides.clear();
        self.measurements.clear();
        let mode = std::mem::replace(&mut self.mode, Mode::Idle);
        match mode {
            Mode::Idle | Mode::Panning { .. } => {}
            Mode::MovingSelection { before, moved, .. } => {
                if moved {
                    self.history.record_snapshot(before);
                }
            }
            Mode::ResizingHandle {
                before, changed, ..
            } => {
                if changed {
                    self.history.record_snapshot(before);
                }
            }
            Mode::Rotating {
                before, changed, ..
            } => {
                if changed {
                    self.history.record_snapshot(before);
                }
            }
            Mode::DrawingShape { before, .. } => {
                self.history.record_snapshot(before);
            }
            Mode::DrawingPath { id, before } => {
                let keep = match self.scene.get(id) {
                    Some(Element::Path(path)) => path.points.len() >= 2,
                    _ => false,
                };
                if keep {
                    self.history.record_snapshot(before);
                } else {
                    self.scene.remove_element(id);
                }
            }
            Mode::BoxSelecting { anchor, current } => {
                self.selection = self
                    .scene
                    .elements_in_rect(Rect::from_points(anchor, current));
            }
        }
    }

    /// Scroll-wheel zoom at the cursor. Positive direction zooms in.
    pub fn wheel(&mut self, pixel: Point, direction: f64) {
        self.camera.zoom_wheel(pixel, direction);
    }

    /// Escape commits any gesture as it stands, clears the selection and
    /// returns to the select tool.
    pub fn escape(&mut self) {
        self.finish_gesture();
        self.selection.clear();
        self.tool = ToolKind::Select;
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        let undone = self.history.undo(&mut self.scene);
        if undone {
            self.prune_selection();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        let redone = self.history.redo(&mut self.scene);
        if redone {
            self.prune_selection();
        }
        redone
    }

    fn prune_selection(&mut self) {
        let scene = &self.scene;
        self.selection.retain(|id| scene.elements.contains_key(id));
        if let Some(hovered) = self.hovered {
            if !scene.elements.contains_key(&hovered) {
                self.hovered = None;
            }
        }
    }

    /// Delete the selected elements. Locked elements stay.
    pub fn delete_selection(&mut self) {
        let removable: Vec<ElementId> = self
            .selection
            .iter()
            .filter(|&&id| {
                self.scene
                    .get(id)
                    .map(|e| !e.style().locked)
                    .unwrap_or(false)
            })
            .copied()
            .collect();
        if removable.is_empty() {
            return;
        }
        self.history.record(&self.scene);
        self.scene.remove_elements(&removable);
        self.prune_selection();
    }

    /// Duplicate the selection; the copies become the new selection.
    pub fn duplicate_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.history.record(&self.scene);
        self.selection = self.scene.duplicate(&self.selection);
    }

    pub fn group_selection(&mut self) {
        if self.selection.len() < 2 {
            return;
        }
        let before = Snapshot::capture(&self.scene);
        if let Some(group_id) = self.scene.group(&self.selection) {
            self.history.record_snapshot(before);
            self.selection = vec![group_id];
        }
    }

    /// Ungroup a single selected group; its members become the selection.
    pub fn ungroup_selection(&mut self) {
        let [id] = self.selection[..] else {
            return;
        };
        if !matches!(self.scene.get(id), Some(e) if e.is_group()) {
            return;
        }
        let before = Snapshot::capture(&self.scene);
        if let Some(members) = self.scene.ungroup(id) {
            self.history.record_snapshot(before);
            self.selection = members;
        }
    }

    /// Combine the selected elements' bounding boxes into one element.
    /// The survivor becomes the selection.
    pub fn combine_selection(&mut self, op: BooleanOp) {
        let enough = match op {
            BooleanOp::Subtract => self.selection.len() == 2,
            BooleanOp::Union | BooleanOp::Intersect => self.selection.len() >= 2,
        };
        if !enough {
            return;
        }
        let before = Snapshot::capture(&self.scene);
        if let Some(id) = self.scene.combine(&self.selection, op) {
            self.history.record_snapshot(before);
            self.selection = vec![id];
        }
    }

    /// Capture the visual style of the first selected element.
    pub fn copy_style(&mut self) {
        let Some(&id) = self.selection.first() else {
            return;
        };
        if let Some(element) = self.scene.get(id) {
            self.style_clipboard = Some(StyleClipboard::capture(element));
        }
    }

    /// Apply the copied style to every selected element. Typography lands
    /// only on text and corner radius only on rectangles; the targets keep
    /// their own visibility and lock state.
    pub fn paste_style(&mut self) {
        let Some(clipboard) = self.style_clipboard.clone() else {
            return;
        };
        if self.selection.is_empty() {
            return;
        }
        self.history.record(&self.scene);
        for &id in &self.selection {
            if let Some(element) = self.scene.get_mut(id) {
                clipboard.apply(element);
            }
        }
    }

    pub fn align_selection(&mut self, alignment: Alignment) {
        if self.selection.len() < 2 {
            return;
        }
        self.history.record(&self.scene);
        self.scene.align(&self.selection, alignment);
    }

    /// Rotate the selection a quarter turn clockwise.
    pub fn rotate_selection_quarter(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.history.record(&self.scene);
        self.scene.rotate_by(&self.selection, 90.0);
    }

    pub fn select_all(&mut self) {
        self.selection = self
            .scene
            .z_order
            .iter()
            .filter(|id| {
                self.scene
                    .get(**id)
                    .map(|e| e.style().visible)
                    .unwrap_or(false)
            })
            .copied()
            .collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn bring_selection_to_front(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.history.record(&self.scene);
        let ordered: Vec<ElementId> = self
            .scene
            .z_order
            .iter()
            .filter(|id| self.selection.contains(id))
            .copied()
            .collect();
        for id in ordered {
            self.scene.bring_to_front(id);
        }
    }

    pub fn send_selection_to_back(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.history.record(&self.scene);
        let ordered: Vec<ElementId> = self
            .scene
            .z_order
            .iter()
            .filter(|id| self.selection.contains(id))
            .rev()
            .copied()
            .collect();
        for id in ordered {
            self.scene.send_to_back(id);
        }
    }

    pub fn toggle_selection_lock(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.history.record(&self.scene);
        for &id in &self.selection {
            if let Some(element) = self.scene.get_mut(id) {
                let locked = element.style().locked;
                element.style_mut().locked = !locked;
            }
        }
    }

    pub fn zoom_to_fit(&mut self) {
        if let Some(bounds) = self.scene.bounds() {
            self.camera.fit_to_bounds(
                bounds,
                self.viewport_size,
                FIT_CONTENT_PADDING,
                FIT_CONTENT_MAX_ZOOM,
            );
        }
    }

    pub fn zoom_to_selection(&mut self) {
        if let Some(bounds) = self.selection_bounds() {
            self.camera.fit_to_bounds(
                bounds,
                self.viewport_size,
                FIT_SELECTION_PADDING,
                FIT_SELECTION_MAX_ZOOM,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Rectangle, Rgba, ShadowSpec, Text};

    fn editor_with_rect(x: f64, y: f64, w: f64, h: f64) -> (Editor, ElementId) {
        let mut editor = Editor::new();
        editor.set_viewport_size(Size::new(800.0, 600.0));
        let element = Element::Rectangle(Rectangle::new(Point::new(x, y), w, h));
        let id = element.id();
        editor.scene.add_element(element);
        (editor, id)
    }

    fn press(editor: &mut Editor, x: f64, y: f64) {
        editor.pointer_down(
            Point::new(x, y),
            PointerButton::Primary,
            Modifiers::default(),
        );
    }

    fn drag(editor: &mut Editor, x: f64, y: f64) {
        editor.pointer_move(Point::new(x, y), Modifiers::default());
    }

    fn release(editor: &mut Editor, x: f64, y: f64) {
        editor.pointer_up(Point::new(x, y), PointerButton::Primary);
    }

    #[test]
    fn test_click_selects_topmost() {
        let (mut editor, id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        press(&mut editor, 50.0, 40.0);
        release(&mut editor, 50.0, 40.0);
        assert_eq!(editor.selection, vec![id]);
    }

    #[test]
    fn test_click_empty_space_clears_via_box_select() {
        let (mut editor, _id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        press(&mut editor, 50.0, 40.0);
        release(&mut editor, 50.0, 40.0);
        press(&mut editor, 500.0, 500.0);
        release(&mut editor, 500.0, 500.0);
        assert!(editor.selection.is_empty());
    }

    #[test]
    fn test_shift_drag_over_element_pans_without_selecting() {
        let (mut editor, _id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        // Shift+primary starts a pan even with an element under the
        // pointer; the element is neither selected nor moved.
        editor.pointer_down(Point::new(50.0, 30.0), PointerButton::Primary, shift);
        editor.pointer_move(Point::new(90.0, 70.0), shift);
        editor.pointer_up(Point::new(90.0, 70.0), PointerButton::Primary);

        assert_eq!(editor.camera.offset, Vec2::new(40.0, 40.0));
        assert!(editor.selection.is_empty());
        assert!(!editor.history.can_undo());
    }

    #[test]
    fn test_shift_drag_keeps_existing_selection() {
        let (mut editor, id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        press(&mut editor, 50.0, 40.0);
        release(&mut editor, 50.0, 40.0);
        assert_eq!(editor.selection, vec![id]);

        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        editor.pointer_down(Point::new(50.0, 40.0), PointerButton::Primary, shift);
        editor.pointer_move(Point::new(20.0, 10.0), shift);
        editor.pointer_up(Point::new(20.0, 10.0), PointerButton::Primary);

        assert_eq!(editor.camera.offset, Vec2::new(-30.0, -30.0));
        assert_eq!(editor.selection, vec![id]);
        let bounds = editor.scene.get(id).unwrap().bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_moves_and_commits_one_undo_entry() {
        let (mut editor, id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        press(&mut editor, 50.0, 40.0);
        drag(&mut editor, 80.0, 90.0);
        drag(&mut editor, 110.0, 140.0);
        release(&mut editor, 110.0, 140.0);

        let bounds = editor.scene.get(id).unwrap().bounds();
        assert!((bounds.x0 - 70.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 110.0).abs() < f64::EPSILON);

        assert!(editor.undo());
        let bounds = editor.scene.get(id).unwrap().bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!(!editor.history.can_undo());
    }

    #[test]
    fn test_click_without_drag_records_nothing() {
        let (mut editor, _id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        press(&mut editor, 50.0, 40.0);
        release(&mut editor, 50.0, 40.0);
        assert!(!editor.history.can_undo());
    }

    #[test]
    fn test_locked_element_selects_but_does_not_move() {
        let (mut editor, id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        editor.scene.set_locked(id, true);
        press(&mut editor, 50.0, 40.0);
        drag(&mut editor, 150.0, 140.0);
        release(&mut editor, 150.0, 140.0);

        assert_eq!(editor.selection, vec![id]);
        let bounds = editor.scene.get(id).unwrap().bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!(!editor.history.can_undo());
    }

    #[test]
    fn test_box_select_picks_overlapping() {
        let (mut editor, a) = editor_with_rect(10.0, 10.0, 50.0, 50.0);
        let element = Element::Rectangle(Rectangle::new(Point::new(100.0, 10.0), 50.0, 50.0));
        let b = element.id();
        editor.scene.add_element(element);
        let far = Element::Rectangle(Rectangle::new(Point::new(600.0, 400.0), 50.0, 50.0));
        editor.scene.add_element(far);

        press(&mut editor, 0.0, 0.0);
        drag(&mut editor, 170.0, 80.0);
        assert!(editor.box_select_rect().is_some());
        release(&mut editor, 170.0, 80.0);

        assert_eq!(editor.selection, vec![a, b]);
        assert!(editor.box_select_rect().is_none());
    }

    #[test]
    fn test_drawing_rectangle_commits_on_release() {
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Rectangle);
        press(&mut editor, 10.0, 10.0);
        drag(&mut editor, 60.0, 50.0);
        release(&mut editor, 60.0, 50.0);

        assert_eq!(editor.scene.len(), 1);
        assert_eq!(editor.selection.len(), 1);
        let bounds = editor.scene.get(editor.selection[0]).unwrap().bounds();
        assert!((bounds.width() - 50.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 40.0).abs() < f64::EPSILON);

        assert!(editor.undo());
        assert!(editor.scene.is_empty());
    }

    #[test]
    fn test_shape_click_places_default_size() {
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Rectangle);
        press(&mut editor, 10.0, 10.0);
        release(&mut editor, 10.0, 10.0);
        let bounds = editor.scene.get(editor.selection[0]).unwrap().bounds();
        assert!((bounds.width() - 100.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pen_stroke_needs_two_points() {
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Pen);
        press(&mut editor, 10.0, 10.0);
        release(&mut editor, 10.0, 10.0);
        assert!(editor.scene.is_empty());
        assert!(!editor.history.can_undo());

        press(&mut editor, 10.0, 10.0);
        drag(&mut editor, 40.0, 40.0);
        drag(&mut editor, 90.0, 60.0);
        release(&mut editor, 90.0, 60.0);
        assert_eq!(editor.scene.len(), 1);
        assert!(editor.history.can_undo());
    }

    #[test]
    fn test_eraser_removes_and_undo_restores() {
        let (mut editor, id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        editor.set_tool(ToolKind::Eraser);
        press(&mut editor, 50.0, 40.0);
        release(&mut editor, 50.0, 40.0);
        assert!(editor.scene.is_empty());

        assert!(editor.undo());
        assert!(editor.scene.get(id).is_some());
    }

    #[test]
    fn test_middle_button_pans_without_touching_selection() {
        let (mut editor, id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        press(&mut editor, 50.0, 40.0);
        release(&mut editor, 50.0, 40.0);

        editor.pointer_down(
            Point::new(400.0, 300.0),
            PointerButton::Middle,
            Modifiers::default(),
        );
        drag(&mut editor, 430.0, 280.0);
        editor.pointer_up(Point::new(430.0, 280.0), PointerButton::Middle);

        assert_eq!(editor.camera.offset, Vec2::new(30.0, -20.0));
        assert_eq!(editor.selection, vec![id]);
    }

    #[test]
    fn test_resize_via_corner_handle() {
        let (mut editor, id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        press(&mut editor, 50.0, 40.0);
        release(&mut editor, 50.0, 40.0);

        // Grab the bottom-right corner handle and drag outward.
        press(&mut editor, 110.0, 70.0);
        drag(&mut editor, 160.0, 120.0);
        release(&mut editor, 160.0, 120.0);

        let bounds = editor.scene.get(id).unwrap().bounds();
        assert!((bounds.width() - 150.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 110.0).abs() < f64::EPSILON);
        assert!(editor.history.can_undo());
    }

    #[test]
    fn test_rotation_handle_rotates() {
        let (mut editor, id) = editor_with_rect(100.0, 100.0, 100.0, 100.0);
        press(&mut editor, 150.0, 150.0);
        release(&mut editor, 150.0, 150.0);

        // Rotation handle sits 20px above the top edge at zoom 1.
        press(&mut editor, 150.0, 80.0);
        // Drag to the right of the center: from -90 deg to 0 deg.
        drag(&mut editor, 220.0, 150.0);
        release(&mut editor, 220.0, 150.0);

        let rotation = editor.scene.get(id).unwrap().rotation();
        assert!((rotation - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_snaps_to_neighbor_edge() {
        let (mut editor, _anchor) = editor_with_rect(0.0, 0.0, 100.0, 100.0);
        let element = Element::Rectangle(Rectangle::new(Point::new(200.0, 0.0), 50.0, 50.0));
        let id = element.id();
        editor.scene.add_element(element);

        press(&mut editor, 225.0, 25.0);
        drag(&mut editor, 128.0, 25.0);
        assert!(!editor.guides.is_empty());
        release(&mut editor, 128.0, 25.0);

        let bounds = editor.scene.get(id).unwrap().bounds();
        assert!((bounds.x0 - 100.0).abs() < f64::EPSILON);
        assert!(editor.guides.is_empty());
    }

    #[test]
    fn test_escape_commits_and_resets() {
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Rectangle);
        press(&mut editor, 10.0, 10.0);
        drag(&mut editor, 80.0, 80.0);
        editor.escape();

        assert_eq!(editor.scene.len(), 1);
        assert!(editor.selection.is_empty());
        assert_eq!(editor.tool, ToolKind::Select);
        assert!(editor.is_idle());
        assert!(editor.history.can_undo());
    }

    #[test]
    fn test_undo_ignored_mid_gesture() {
        let (mut editor, _id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        editor.history.record(&editor.scene);
        press(&mut editor, 50.0, 40.0);
        drag(&mut editor, 80.0, 70.0);
        assert!(!editor.undo());
        release(&mut editor, 80.0, 70.0);
        assert!(editor.undo());
    }

    #[test]
    fn test_double_click_surfaces_element() {
        let (mut editor, id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        press(&mut editor, 50.0, 40.0);
        release(&mut editor, 50.0, 40.0);
        press(&mut editor, 50.0, 40.0);
        release(&mut editor, 50.0, 40.0);
        assert_eq!(editor.take_double_clicked(), Some(id));
        assert_eq!(editor.take_double_clicked(), None);
    }

    #[test]
    fn test_delete_skips_locked() {
        let (mut editor, a) = editor_with_rect(10.0, 10.0, 50.0, 50.0);
        let element = Element::Rectangle(Rectangle::new(Point::new(100.0, 10.0), 50.0, 50.0));
        let b = element.id();
        editor.scene.add_element(element);
        editor.scene.set_locked(a, true);
        editor.selection = vec![a, b];

        editor.delete_selection();
        assert!(editor.scene.get(a).is_some());
        assert!(editor.scene.get(b).is_none());
        assert_eq!(editor.selection, vec![a]);
    }

    #[test]
    fn test_duplicate_selects_copies() {
        let (mut editor, id) = editor_with_rect(10.0, 10.0, 50.0, 50.0);
        editor.selection = vec![id];
        editor.duplicate_selection();
        assert_eq!(editor.scene.len(), 2);
        assert_eq!(editor.selection.len(), 1);
        assert_ne!(editor.selection[0], id);
    }

    #[test]
    fn test_group_then_ungroup_selection() {
        let (mut editor, a) = editor_with_rect(0.0, 0.0, 20.0, 20.0);
        let element = Element::Rectangle(Rectangle::new(Point::new(40.0, 0.0), 20.0, 20.0));
        let b = element.id();
        editor.scene.add_element(element);
        editor.selection = vec![a, b];

        editor.group_selection();
        assert_eq!(editor.selection.len(), 1);
        let group_id = editor.selection[0];
        assert!(editor.scene.get(group_id).unwrap().is_group());

        editor.ungroup_selection();
        assert_eq!(editor.selection, vec![a, b]);
        assert!(editor.scene.get(group_id).is_none());
    }

    #[test]
    fn test_union_replaces_selection_with_spanning_rect() {
        let (mut editor, a) = editor_with_rect(0.0, 0.0, 40.0, 40.0);
        let element = Element::Rectangle(Rectangle::new(Point::new(100.0, 20.0), 40.0, 40.0));
        let b = element.id();
        editor.scene.add_element(element);
        editor.selection = vec![a, b];

        editor.combine_selection(BooleanOp::Union);
        assert_eq!(editor.scene.len(), 1);
        assert_eq!(editor.selection.len(), 1);
        let bounds = editor.scene.get(editor.selection[0]).unwrap().bounds();
        assert!((bounds.width() - 140.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 60.0).abs() < f64::EPSILON);

        assert!(editor.undo());
        assert_eq!(editor.scene.len(), 2);
        assert!(editor.scene.get(a).is_some());
        assert!(!editor.history.can_undo());
    }

    #[test]
    fn test_subtract_needs_exactly_two_selected() {
        let (mut editor, a) = editor_with_rect(0.0, 0.0, 40.0, 40.0);
        let second = Element::Rectangle(Rectangle::new(Point::new(20.0, 20.0), 40.0, 40.0));
        let third = Element::Rectangle(Rectangle::new(Point::new(200.0, 0.0), 40.0, 40.0));
        let b = second.id();
        let c = third.id();
        editor.scene.add_element(second);
        editor.scene.add_element(third);

        editor.selection = vec![a, b, c];
        editor.combine_selection(BooleanOp::Subtract);
        assert_eq!(editor.scene.len(), 3);
        assert!(!editor.history.can_undo());

        editor.selection = vec![a, b];
        editor.combine_selection(BooleanOp::Subtract);
        assert!(editor.scene.get(a).is_some());
        assert!(editor.scene.get(b).is_none());
        assert_eq!(editor.selection, vec![a]);
        assert!(editor.history.can_undo());
    }

    #[test]
    fn test_intersect_disjoint_records_nothing() {
        let (mut editor, a) = editor_with_rect(0.0, 0.0, 40.0, 40.0);
        let element = Element::Rectangle(Rectangle::new(Point::new(200.0, 200.0), 40.0, 40.0));
        let b = element.id();
        editor.scene.add_element(element);
        editor.selection = vec![a, b];

        editor.combine_selection(BooleanOp::Intersect);
        assert_eq!(editor.scene.len(), 2);
        assert_eq!(editor.selection, vec![a, b]);
        assert!(!editor.history.can_undo());
    }

    #[test]
    fn test_paste_style_transfers_look_but_not_lock() {
        let (mut editor, source) = editor_with_rect(0.0, 0.0, 40.0, 40.0);
        let element = Element::Rectangle(Rectangle::new(Point::new(100.0, 0.0), 40.0, 40.0));
        let target = element.id();
        editor.scene.add_element(element);

        let red = Rgba::new(0xe7, 0x4c, 0x3c, 0xff);
        {
            let style = editor.scene.get_mut(source).unwrap().style_mut();
            style.fill = Some(red);
            style.shadow = Some(ShadowSpec::default());
        }
        editor.scene.set_locked(target, true);

        editor.selection = vec![source];
        editor.copy_style();
        editor.selection = vec![target];
        editor.paste_style();

        let style = editor.scene.get(target).unwrap().style();
        assert_eq!(style.fill, Some(red));
        assert!(style.shadow.is_some());
        assert!(style.locked);
        assert!(editor.history.can_undo());

        assert!(editor.undo());
        let style = editor.scene.get(target).unwrap().style();
        assert_ne!(style.fill, Some(red));
        assert!(!editor.history.can_undo());
    }

    #[test]
    fn test_paste_style_typography_only_reaches_text() {
        let mut editor = Editor::new();
        let mut source = Text::new(Point::new(0.0, 0.0), "heading");
        source.font_size = 32.0;
        source.toggle_bold();
        let source_id = source.id;
        editor.scene.add_element(Element::Text(source));
        let target_text = Text::new(Point::new(0.0, 100.0), "body");
        let text_id = target_text.id;
        editor.scene.add_element(Element::Text(target_text));
        let rect = Element::Rectangle(Rectangle::new(Point::new(200.0, 0.0), 40.0, 40.0));
        let rect_id = rect.id();
        editor.scene.add_element(rect);

        editor.selection = vec![source_id];
        editor.copy_style();
        editor.selection = vec![text_id, rect_id];
        editor.paste_style();

        match editor.scene.get(text_id).unwrap() {
            Element::Text(text) => {
                assert!((text.font_size - 32.0).abs() < f64::EPSILON);
                assert_eq!(text.weight, FontWeight::Bold);
            }
            _ => panic!("expected text"),
        }
        // The rectangle takes the shared style but stays a plain rect.
        let rect_style = editor.scene.get(rect_id).unwrap().style();
        assert_eq!(
            rect_style.fill,
            editor.scene.get(source_id).unwrap().style().fill
        );
    }

    #[test]
    fn test_paste_style_without_copy_is_noop() {
        let (mut editor, id) = editor_with_rect(0.0, 0.0, 40.0, 40.0);
        editor.selection = vec![id];
        editor.paste_style();
        assert!(!editor.history.can_undo());
    }

    #[test]
    fn test_wheel_zoom_keeps_cursor_anchor() {
        let mut editor = Editor::new();
        let cursor = Point::new(300.0, 200.0);
        let before = editor.camera.to_scene(cursor);
        editor.wheel(cursor, 1.0);
        let after = editor.camera.to_scene(cursor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
        assert!((editor.camera.zoom - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_to_fit_centers_content() {
        let (mut editor, _id) = editor_with_rect(0.0, 0.0, 200.0, 100.0);
        editor.zoom_to_fit();
        let center = editor.camera.to_pixel(Point::new(100.0, 50.0));
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_tool_switch_ignored_mid_gesture() {
        let (mut editor, _id) = editor_with_rect(10.0, 10.0, 100.0, 60.0);
        press(&mut editor, 50.0, 40.0);
        drag(&mut editor, 60.0, 50.0);
        editor.set_tool(ToolKind::Pen);
        assert_eq!(editor.tool, ToolKind::Select);
        release(&mut editor, 60.0, 50.0);
        editor.set_tool(ToolKind::Pen);
        assert_eq!(editor.tool, ToolKind::Pen);
    }
}
