//! Scene document: the ordered element collection and its editing operations.

use crate::elements::{Element, ElementId, Group, Rectangle};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Offset applied to duplicated elements.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Edge or axis to align a group of elements against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    /// Align centers to the average center x.
    CenterHorizontal,
    /// Align centers to the average center y.
    CenterVertical,
}

/// Boolean combination over element bounding boxes.
///
/// These operate on boxes, not path outlines: union and intersect replace
/// the participants with a rectangle, subtract keeps the first element and
/// deletes the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Subtract,
    Intersect,
}

/// A design document: elements, their z-order and the canvas size.
///
/// Z-order runs back to front; the collection index is the only ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// All elements in the document, keyed by ID.
    pub elements: HashMap<ElementId, Element>,
    /// Z-order of elements (back to front).
    pub z_order: Vec<ElementId>,
    /// Logical canvas size in scene units.
    pub canvas_size: Size,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            elements: HashMap::new(),
            z_order: Vec::new(),
            canvas_size: Size::new(1920.0, 1080.0),
        }
    }

    /// Add an element to the document, on top of the z-order.
    pub fn add_element(&mut self, element: Element) {
        let id = element.id();
        self.z_order.push(id);
        self.elements.insert(id, element);
    }

    /// Remove an element from the document.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        self.z_order.retain(|&element_id| element_id != id);
        self.elements.remove(&id)
    }

    /// Remove several elements. Returns how many were actually removed.
    pub fn remove_elements(&mut self, ids: &[ElementId]) -> usize {
        let mut removed = 0;
        for &id in ids {
            if self.remove_element(id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Clear all elements from the document.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.z_order.clear();
    }

    /// Get an element by ID.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    /// Iterate elements in z-order (back to front).
    pub fn elements_ordered(&self) -> impl Iterator<Item = &Element> {
        self.z_order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Bounding box of all elements.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for element in self.elements.values() {
            let bounds = element.bounds();
            result = Some(match result {
                Some(r) => r.union(bounds),
                None => bounds,
            });
        }
        result
    }

    /// Bounding box of a set of elements.
    pub fn bounds_of(&self, ids: &[ElementId]) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for &id in ids {
            if let Some(element) = self.elements.get(&id) {
                let bounds = element.bounds();
                result = Some(match result {
                    Some(r) => r.union(bounds),
                    None => bounds,
                });
            }
        }
        result
    }

    /// Find the topmost visible element at a point.
    /// Locked elements are still returned; callers decide what a click on
    /// them may do.
    pub fn element_at_point(&self, point: Point, tolerance: f64) -> Option<ElementId> {
        self.z_order.iter().rev().find_map(|&id| {
            self.elements
                .get(&id)
                .filter(|e| e.style().visible && e.hit_test(point, tolerance))
                .map(|_| id)
        })
    }

    /// Find visible, unlocked elements whose bounds overlap a rectangle.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.z_order
            .iter()
            .filter_map(|&id| {
                self.elements
                    .get(&id)
                    .filter(|e| e.style().visible && !e.style().locked && e.intersects_rect(rect))
                    .map(|_| id)
            })
            .collect()
    }

    /// Bring an element to the front (topmost).
    pub fn bring_to_front(&mut self, id: ElementId) {
        if self.elements.contains_key(&id) {
            self.z_order.retain(|&element_id| element_id != id);
            self.z_order.push(id);
        }
    }

    /// Send an element to the back (bottommost).
    pub fn send_to_back(&mut self, id: ElementId) {
        if self.elements.contains_key(&id) {
            self.z_order.retain(|&element_id| element_id != id);
            self.z_order.insert(0, id);
        }
    }

    /// Move an element one layer forward (towards front).
    /// Returns true if the element was moved, false if already at front.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        if let Some(pos) = self.z_order.iter().position(|&element_id| element_id == id) {
            if pos < self.z_order.len() - 1 {
                self.z_order.swap(pos, pos + 1);
                return true;
            }
        }
        false
    }

    /// Move an element one layer backward (towards back).
    /// Returns true if the element was moved, false if already at back.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        if let Some(pos) = self.z_order.iter().position(|&element_id| element_id == id) {
            if pos > 0 {
                self.z_order.swap(pos, pos - 1);
                return true;
            }
        }
        false
    }

    /// Expand a set of ids with the members of any groups it contains.
    /// Used by move gestures so dragging a group carries its members.
    pub fn expand_with_members(&self, ids: &[ElementId]) -> Vec<ElementId> {
        let mut expanded: Vec<ElementId> = ids.to_vec();
        for &id in ids {
            if let Some(Element::Group(group)) = self.elements.get(&id) {
                for &member in &group.members {
                    if !expanded.contains(&member) && self.elements.contains_key(&member) {
                        expanded.push(member);
                    }
                }
            }
        }
        expanded
    }

    /// Translate elements (and group members) by a delta, skipping locked ones.
    pub fn translate_elements(&mut self, ids: &[ElementId], delta: Vec2) {
        for id in self.expand_with_members(ids) {
            if let Some(element) = self.elements.get_mut(&id) {
                if !element.style().locked {
                    element.translate(delta);
                }
            }
        }
    }

    /// Duplicate elements with fresh ids, offset down-right.
    /// Copies are appended to the top of the z-order; their ids are returned
    /// in the originals' z-order.
    pub fn duplicate(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let ordered: Vec<ElementId> = self
            .z_order
            .iter()
            .filter(|id| ids.contains(id))
            .copied()
            .collect();

        let mut new_ids = Vec::with_capacity(ordered.len());
        for id in ordered {
            if let Some(element) = self.elements.get(&id) {
                let mut copy = element.clone();
                copy.regenerate_id();
                copy.translate(DUPLICATE_OFFSET);
                new_ids.push(copy.id());
                self.add_element(copy);
            }
        }
        new_ids
    }

    /// Align elements to a shared edge or axis. Locked elements neither move
    /// nor contribute to the target; fewer than two participants is a no-op.
    pub fn align(&mut self, ids: &[ElementId], alignment: Alignment) {
        let participants: Vec<(ElementId, Rect)> = ids
            .iter()
            .filter_map(|&id| {
                self.elements
                    .get(&id)
                    .filter(|e| !e.style().locked)
                    .map(|e| (id, e.bounds()))
            })
            .collect();
        if participants.len() < 2 {
            return;
        }

        let target = match alignment {
            Alignment::Left => participants
                .iter()
                .map(|(_, b)| b.x0)
                .fold(f64::INFINITY, f64::min),
            Alignment::Right => participants
                .iter()
                .map(|(_, b)| b.x1)
                .fold(f64::NEG_INFINITY, f64::max),
            Alignment::Top => participants
                .iter()
                .map(|(_, b)| b.y0)
                .fold(f64::INFINITY, f64::min),
            Alignment::Bottom => participants
                .iter()
                .map(|(_, b)| b.y1)
                .fold(f64::NEG_INFINITY, f64::max),
            Alignment::CenterHorizontal => {
                participants.iter().map(|(_, b)| b.center().x).sum::<f64>()
                    / participants.len() as f64
            }
            Alignment::CenterVertical => {
                participants.iter().map(|(_, b)| b.center().y).sum::<f64>()
                    / participants.len() as f64
            }
        };

        for (id, bounds) in participants {
            let delta = match alignment {
                Alignment::Left => Vec2::new(target - bounds.x0, 0.0),
                Alignment::Right => Vec2::new(target - bounds.x1, 0.0),
                Alignment::Top => Vec2::new(0.0, target - bounds.y0),
                Alignment::Bottom => Vec2::new(0.0, target - bounds.y1),
                Alignment::CenterHorizontal => Vec2::new(target - bounds.center().x, 0.0),
                Alignment::CenterVertical => Vec2::new(0.0, target - bounds.center().y),
            };
            if let Some(element) = self.elements.get_mut(&id) {
                element.translate(delta);
            }
        }
    }

    /// Group elements under a new frame element placed on top.
    /// Members remain in the document. Returns the group's id, or None for
    /// fewer than two members.
    pub fn group(&mut self, ids: &[ElementId]) -> Option<ElementId> {
        let members: Vec<ElementId> = self
            .z_order
            .iter()
            .filter(|id| ids.contains(id) && self.elements.contains_key(id))
            .copied()
            .collect();
        if members.len() < 2 {
            return None;
        }
        let frame = self.bounds_of(&members)?;
        let group = Group::new(members, frame);
        let group_id = group.id;
        self.add_element(Element::Group(group));
        Some(group_id)
    }

    /// Dissolve a group, removing only the frame element.
    /// Returns the member ids that are still present in the document.
    pub fn ungroup(&mut self, group_id: ElementId) -> Option<Vec<ElementId>> {
        let members = match self.elements.get(&group_id) {
            Some(Element::Group(group)) => group.members.clone(),
            _ => return None,
        };
        self.remove_element(group_id);
        Some(
            members
                .into_iter()
                .filter(|id| self.elements.contains_key(id))
                .collect(),
        )
    }

    /// Combine elements with a boolean operation over their bounding boxes.
    ///
    /// Union and intersect need at least two participants and replace them
    /// with a rectangle carrying the first participant's style; intersect
    /// is a no-op when the boxes do not overlap. Subtract needs exactly two
    /// and deletes the second. Returns the surviving element's id.
    pub fn combine(&mut self, ids: &[ElementId], op: BooleanOp) -> Option<ElementId> {
        let participants: Vec<ElementId> = ids
            .iter()
            .filter(|id| self.elements.contains_key(id))
            .copied()
            .collect();

        match op {
            BooleanOp::Subtract => {
                let [base, cutter] = participants[..] else {
                    return None;
                };
                self.remove_element(cutter);
                Some(base)
            }
            BooleanOp::Union | BooleanOp::Intersect => {
                if participants.len() < 2 {
                    return None;
                }
                let frame = match op {
                    BooleanOp::Union => self.bounds_of(&participants)?,
                    _ => {
                        let mut frame = self.get(participants[0])?.bounds();
                        for &id in &participants[1..] {
                            frame = frame.intersect(self.get(id)?.bounds());
                        }
                        if frame.width() <= 0.0 || frame.height() <= 0.0 {
                            return None;
                        }
                        frame
                    }
                };
                let style = self.get(participants[0])?.style().clone();
                self.remove_elements(&participants);

                let mut combined =
                    Rectangle::new(frame.origin(), frame.width(), frame.height());
                combined.style = style;
                let id = combined.id;
                self.add_element(Element::Rectangle(combined));
                Some(id)
            }
        }
    }

    /// Rotate elements by a delta in degrees, skipping locked ones.
    pub fn rotate_by(&mut self, ids: &[ElementId], degrees: f64) {
        for &id in ids {
            if let Some(element) = self.elements.get_mut(&id) {
                if !element.style().locked {
                    let rotation = element.rotation();
                    element.set_rotation(rotation + degrees);
                }
            }
        }
    }

    pub fn set_locked(&mut self, id: ElementId, locked: bool) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.style_mut().locked = locked;
        }
    }

    pub fn set_visible(&mut self, id: ElementId, visible: bool) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.style_mut().visible = visible;
        }
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Ellipse, Rectangle};

    fn rect_at(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::Rectangle(Rectangle::new(Point::new(x, y), w, h))
    }

    #[test]
    fn test_add_and_remove() {
        let mut scene = Scene::new();
        let element = rect_at(0.0, 0.0, 100.0, 60.0);
        let id = element.id();
        scene.add_element(element);
        assert_eq!(scene.len(), 1);
        assert!(scene.remove_element(id).is_some());
        assert!(scene.is_empty());
        assert!(scene.z_order.is_empty());
    }

    #[test]
    fn test_topmost_wins() {
        let mut scene = Scene::new();
        let bottom = rect_at(0.0, 0.0, 100.0, 100.0);
        let top = rect_at(50.0, 50.0, 100.0, 100.0);
        let bottom_id = bottom.id();
        let top_id = top.id();
        scene.add_element(bottom);
        scene.add_element(top);

        assert_eq!(scene.element_at_point(Point::new(75.0, 75.0), 0.0), Some(top_id));
        assert_eq!(scene.element_at_point(Point::new(25.0, 25.0), 0.0), Some(bottom_id));
        assert_eq!(scene.element_at_point(Point::new(500.0, 500.0), 0.0), None);
    }

    #[test]
    fn test_invisible_elements_not_hit() {
        let mut scene = Scene::new();
        let element = rect_at(0.0, 0.0, 100.0, 100.0);
        let id = element.id();
        scene.add_element(element);
        scene.set_visible(id, false);
        assert_eq!(scene.element_at_point(Point::new(50.0, 50.0), 0.0), None);
    }

    #[test]
    fn test_z_order_ops() {
        let mut scene = Scene::new();
        let a = rect_at(0.0, 0.0, 10.0, 10.0);
        let b = rect_at(0.0, 0.0, 10.0, 10.0);
        let c = rect_at(0.0, 0.0, 10.0, 10.0);
        let (ia, ib, ic) = (a.id(), b.id(), c.id());
        scene.add_element(a);
        scene.add_element(b);
        scene.add_element(c);

        scene.bring_to_front(ia);
        assert_eq!(scene.z_order, vec![ib, ic, ia]);

        scene.send_to_back(ia);
        assert_eq!(scene.z_order, vec![ia, ib, ic]);

        assert!(scene.bring_forward(ia));
        assert_eq!(scene.z_order, vec![ib, ia, ic]);

        assert!(scene.send_backward(ia));
        assert_eq!(scene.z_order, vec![ia, ib, ic]);

        assert!(!scene.send_backward(ia));
        assert!(!scene.bring_forward(ic));
    }

    #[test]
    fn test_duplicate_offsets_and_fresh_ids() {
        let mut scene = Scene::new();
        let element = rect_at(10.0, 10.0, 50.0, 30.0);
        let id = element.id();
        scene.add_element(element);

        let copies = scene.duplicate(&[id]);
        assert_eq!(copies.len(), 1);
        assert_ne!(copies[0], id);
        assert_eq!(scene.len(), 2);

        let copy_bounds = scene.get(copies[0]).unwrap().bounds();
        assert!((copy_bounds.x0 - 30.0).abs() < f64::EPSILON);
        assert!((copy_bounds.y0 - 30.0).abs() < f64::EPSILON);
        // Copy lands on top.
        assert_eq!(*scene.z_order.last().unwrap(), copies[0]);
    }

    #[test]
    fn test_align_left_and_center() {
        let mut scene = Scene::new();
        let a = rect_at(10.0, 0.0, 20.0, 20.0);
        let b = rect_at(50.0, 40.0, 40.0, 20.0);
        let (ia, ib) = (a.id(), b.id());
        scene.add_element(a);
        scene.add_element(b);

        scene.align(&[ia, ib], Alignment::Left);
        assert!((scene.get(ia).unwrap().bounds().x0 - 10.0).abs() < f64::EPSILON);
        assert!((scene.get(ib).unwrap().bounds().x0 - 10.0).abs() < f64::EPSILON);

        scene.align(&[ia, ib], Alignment::CenterVertical);
        let ca = scene.get(ia).unwrap().bounds().center().y;
        let cb = scene.get(ib).unwrap().bounds().center().y;
        assert!((ca - cb).abs() < f64::EPSILON);
    }

    #[test]
    fn test_align_skips_locked() {
        let mut scene = Scene::new();
        let a = rect_at(10.0, 0.0, 20.0, 20.0);
        let b = rect_at(50.0, 0.0, 20.0, 20.0);
        let c = rect_at(100.0, 0.0, 20.0, 20.0);
        let (ia, ib, ic) = (a.id(), b.id(), c.id());
        scene.add_element(a);
        scene.add_element(b);
        scene.add_element(c);
        scene.set_locked(ic, true);

        scene.align(&[ia, ib, ic], Alignment::Left);
        assert!((scene.get(ib).unwrap().bounds().x0 - 10.0).abs() < f64::EPSILON);
        // Locked element stays put.
        assert!((scene.get(ic).unwrap().bounds().x0 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_group_and_ungroup_keep_members() {
        let mut scene = Scene::new();
        let a = rect_at(0.0, 0.0, 20.0, 20.0);
        let b = rect_at(40.0, 0.0, 20.0, 20.0);
        let (ia, ib) = (a.id(), b.id());
        scene.add_element(a);
        scene.add_element(b);

        let group_id = scene.group(&[ia, ib]).unwrap();
        assert_eq!(scene.len(), 3);
        let frame = scene.get(group_id).unwrap().bounds();
        assert!((frame.x0 - 0.0).abs() < f64::EPSILON);
        assert!((frame.x1 - 60.0).abs() < f64::EPSILON);

        let members = scene.ungroup(group_id).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(scene.len(), 2);
        assert!(scene.get(ia).is_some());
        assert!(scene.get(ib).is_some());
    }

    #[test]
    fn test_group_requires_two() {
        let mut scene = Scene::new();
        let a = rect_at(0.0, 0.0, 20.0, 20.0);
        let ia = a.id();
        scene.add_element(a);
        assert!(scene.group(&[ia]).is_none());
    }

    #[test]
    fn test_moving_group_carries_members() {
        let mut scene = Scene::new();
        let a = rect_at(0.0, 0.0, 20.0, 20.0);
        let b = rect_at(40.0, 0.0, 20.0, 20.0);
        let (ia, ib) = (a.id(), b.id());
        scene.add_element(a);
        scene.add_element(b);
        let group_id = scene.group(&[ia, ib]).unwrap();

        scene.translate_elements(&[group_id], Vec2::new(10.0, 5.0));
        assert!((scene.get(ia).unwrap().bounds().x0 - 10.0).abs() < f64::EPSILON);
        assert!((scene.get(ib).unwrap().bounds().x0 - 50.0).abs() < f64::EPSILON);
        assert!((scene.get(group_id).unwrap().bounds().x0 - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_box_selection_contract() {
        let mut scene = Scene::new();
        let a = rect_at(0.0, 0.0, 20.0, 20.0);
        let b = rect_at(40.0, 0.0, 20.0, 20.0);
        let c = rect_at(200.0, 200.0, 20.0, 20.0);
        let (ia, ib, ic) = (a.id(), b.id(), c.id());
        scene.add_element(a);
        scene.add_element(b);
        scene.add_element(c);

        let picked = scene.elements_in_rect(Rect::new(-5.0, -5.0, 70.0, 30.0));
        assert_eq!(picked, vec![ia, ib]);
        assert!(!picked.contains(&ic));
    }

    #[test]
    fn test_combine_union_spans_participants() {
        let mut scene = Scene::new();
        let mut a = Rectangle::new(Point::new(0.0, 0.0), 40.0, 40.0);
        a.style.fill = Some(crate::elements::Rgba::new(255, 0, 0, 255));
        let b = rect_at(100.0, 20.0, 40.0, 40.0);
        let (ia, ib) = (a.id, b.id());
        scene.add_element(Element::Rectangle(a));
        scene.add_element(b);

        let id = scene.combine(&[ia, ib], BooleanOp::Union).unwrap();
        assert_eq!(scene.len(), 1);
        assert!(scene.get(ia).is_none());
        assert!(scene.get(ib).is_none());

        let bounds = scene.get(id).unwrap().bounds();
        assert!((bounds.x0 - 0.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 140.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 60.0).abs() < f64::EPSILON);
        // The first participant's style carries over.
        assert_eq!(
            scene.get(id).unwrap().style().fill,
            Some(crate::elements::Rgba::new(255, 0, 0, 255))
        );
    }

    #[test]
    fn test_combine_subtract_keeps_base() {
        let mut scene = Scene::new();
        let a = rect_at(0.0, 0.0, 40.0, 40.0);
        let b = rect_at(20.0, 20.0, 40.0, 40.0);
        let (ia, ib) = (a.id(), b.id());
        scene.add_element(a);
        scene.add_element(b);

        assert_eq!(scene.combine(&[ia, ib], BooleanOp::Subtract), Some(ia));
        assert!(scene.get(ia).is_some());
        assert!(scene.get(ib).is_none());

        // Subtract takes exactly two participants.
        let c = rect_at(100.0, 0.0, 10.0, 10.0);
        let ic = c.id();
        scene.add_element(c);
        assert_eq!(scene.combine(&[ia], BooleanOp::Subtract), None);
        assert_eq!(scene.combine(&[ia, ic, ic], BooleanOp::Subtract), None);
    }

    #[test]
    fn test_combine_intersect_needs_overlap() {
        let mut scene = Scene::new();
        let a = rect_at(0.0, 0.0, 40.0, 40.0);
        let b = rect_at(20.0, 20.0, 40.0, 40.0);
        let (ia, ib) = (a.id(), b.id());
        scene.add_element(a);
        scene.add_element(b);

        let id = scene.combine(&[ia, ib], BooleanOp::Intersect).unwrap();
        let bounds = scene.get(id).unwrap().bounds();
        assert!((bounds.x0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 40.0).abs() < f64::EPSILON);
        assert_eq!(scene.len(), 1);

        // Disjoint boxes leave the scene untouched.
        let c = rect_at(200.0, 200.0, 10.0, 10.0);
        let ic = c.id();
        scene.add_element(c);
        assert_eq!(scene.combine(&[id, ic], BooleanOp::Intersect), None);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_rotate_by_normalizes() {
        let mut scene = Scene::new();
        let element = Element::Ellipse(Ellipse::new(Point::new(0.0, 0.0), 50.0));
        let id = element.id();
        scene.add_element(element);
        scene.rotate_by(&[id], 90.0);
        scene.rotate_by(&[id], 300.0);
        assert!((scene.get(id).unwrap().rotation() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut scene = Scene::new();
        scene.add_element(rect_at(10.0, 10.0, 50.0, 30.0));
        let json = scene.to_json().unwrap();
        let restored = Scene::from_json(&json).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.z_order, scene.z_order);
    }
}
