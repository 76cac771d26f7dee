//! Pointer and keyboard modifier state, fed by the embedding shell.

use kurbo::Point;
use std::time::{Duration, Instant};

/// Two clicks within this window and [`DOUBLE_CLICK_SLOP`] count as a double.
pub const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(500);

/// Maximum pixel distance between two clicks of a double click.
pub const DOUBLE_CLICK_SLOP: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Keyboard modifier state, mirrored from the shell on every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Live pointer state: position in viewport pixels, held buttons and
/// double-click tracking.
#[derive(Debug)]
pub struct InputState {
    /// Pointer position in viewport pixels.
    pub position: Point,
    pub modifiers: Modifiers,
    primary_down: bool,
    secondary_down: bool,
    middle_down: bool,
    last_click: Option<(Instant, Point)>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            position: Point::ZERO,
            modifiers: Modifiers::default(),
            primary_down: false,
            secondary_down: false,
            middle_down: false,
            last_click: None,
        }
    }

    pub fn on_pointer_move(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Record a button press. Returns true when a primary press completes a
    /// double click.
    pub fn on_button_down(&mut self, button: PointerButton, position: Point) -> bool {
        self.position = position;
        match button {
            PointerButton::Primary => {
                self.primary_down = true;
                self.register_click(position, Instant::now())
            }
            PointerButton::Secondary => {
                self.secondary_down = true;
                false
            }
            PointerButton::Middle => {
                self.middle_down = true;
                false
            }
        }
    }

    pub fn on_button_up(&mut self, button: PointerButton, position: Point) {
        self.position = position;
        match button {
            PointerButton::Primary => self.primary_down = false,
            PointerButton::Secondary => self.secondary_down = false,
            PointerButton::Middle => self.middle_down = false,
        }
    }

    pub fn is_pressed(&self, button: PointerButton) -> bool {
        match button {
            PointerButton::Primary => self.primary_down,
            PointerButton::Secondary => self.secondary_down,
            PointerButton::Middle => self.middle_down,
        }
    }

    /// A double click consumes the pending click, so a third press starts a
    /// fresh sequence.
    fn register_click(&mut self, position: Point, now: Instant) -> bool {
        if let Some((at, where_)) = self.last_click {
            if now.duration_since(at) <= DOUBLE_CLICK_INTERVAL
                && where_.distance(position) <= DOUBLE_CLICK_SLOP
            {
                self.last_click = None;
                return true;
            }
        }
        self.last_click = Some((now, position));
        false
    }
}
