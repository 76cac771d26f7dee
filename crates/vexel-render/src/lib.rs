//! Vexel Render Library
//!
//! Renderer abstraction and implementations for Vexel.
//! The default implementation uses Vello for GPU-accelerated rendering.

pub mod cache;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use cache::{attach_image_bytes, Bitmap, CacheStatus, ImageCache};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::{ExportImage, VelloRenderer};
