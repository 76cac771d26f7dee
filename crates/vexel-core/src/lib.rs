//! Core document model and editing logic for the Vexel design editor.
//!
//! This crate is renderer-agnostic: it owns elements, the scene document,
//! the camera, selection and snapping geometry, the pointer state machine
//! and persistence. Rendering lives in `vexel-render`, archive import in
//! `vexel-import`.

pub mod camera;
pub mod editor;
pub mod elements;
pub mod history;
pub mod input;
pub mod scene;
pub mod selection;
pub mod snap;
pub mod storage;
pub mod tools;

pub use camera::Camera;
pub use editor::Editor;
pub use elements::{Element, ElementId, Rgba, Style};
pub use history::History;
pub use input::{InputState, Modifiers, PointerButton};
pub use scene::{Alignment, BooleanOp, Scene};
pub use tools::ToolKind;
