//! Snapshot-based undo/redo for scene documents.

use crate::elements::{Element, ElementId};
use crate::scene::Scene;
use std::collections::HashMap;

/// Maximum number of undo entries kept.
pub const MAX_HISTORY: usize = 50;

/// A captured copy of the document's elements and z-order.
///
/// Camera, selection and canvas size are deliberately not part of a
/// snapshot; undo restores content, not the viewport.
#[derive(Debug, Clone)]
pub struct Snapshot {
    elements: HashMap<ElementId, Element>,
    z_order: Vec<ElementId>,
}

impl Snapshot {
    /// Capture the current document state.
    pub fn capture(scene: &Scene) -> Self {
        Self {
            elements: scene.elements.clone(),
            z_order: scene.z_order.clone(),
        }
    }

    fn restore(self, scene: &mut Scene) {
        scene.elements = self.elements;
        scene.z_order = self.z_order;
    }
}

/// Two-stack undo/redo history.
///
/// Callers record the state *before* a change; undo swaps the live state
/// with the top of the undo stack.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the document state before a change. Clears the redo stack.
    pub fn record(&mut self, scene: &Scene) {
        self.record_snapshot(Snapshot::capture(scene));
    }

    /// Record a snapshot captured earlier, e.g. at the start of a drag.
    /// Clears the redo stack.
    pub fn record_snapshot(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > MAX_HISTORY {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo the last change. Returns false if there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                self.redo_stack.push(Snapshot::capture(scene));
                snapshot.restore(scene);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone change. Returns false if there is nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        match self.redo_stack.pop() {
            Some(snapshot) => {
                self.undo_stack.push(Snapshot::capture(scene));
                snapshot.restore(scene);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop all history, e.g. after loading a different document.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
