//! Decoded bitmap cache for placed images.
//!
//! Payloads live base64-encoded on the elements themselves so documents
//! stay self-contained. The cache never decodes inside a frame: `get`
//! queues the work and reports `Pending`, the embedder drains the queue
//! with `process_pending` between frames, and a loaded-asset callback
//! tells it to schedule a redraw.

use crate::renderer::{RenderResult, RendererError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::collections::HashMap;
use std::sync::Arc;
use vexel_core::elements::{ElementId, Image, ImageFilters, ImageFormat};

/// Decoded RGBA pixels, 4 bytes per pixel.
#[derive(Debug)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

// Lets a shared bitmap back a peniko::Blob without copying the pixels.
impl AsRef<[u8]> for Bitmap {
    fn as_ref(&self) -> &[u8] {
        &self.rgba
    }
}

/// What the cache knows about an image this frame.
pub enum CacheStatus {
    /// Decoded and filter-baked pixels, ready to draw.
    Bitmap(Arc<Bitmap>),
    /// Queued for decoding; draw nothing this frame.
    Pending,
    /// No payload, or the payload failed to decode.
    Missing,
}

enum CacheEntry {
    Ready {
        filters: ImageFilters,
        payload_len: usize,
        bitmap: Arc<Bitmap>,
    },
    Failed,
}

/// Per-element bitmap cache. Filter changes re-bake; payload swaps are
/// detected by encoded length.
#[derive(Default)]
pub struct ImageCache {
    entries: HashMap<ElementId, CacheEntry>,
    queue: Vec<Image>,
    on_loaded: Option<Box<dyn FnMut(ElementId)>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the element id each time a queued decode completes
    /// successfully; the embedder wires this to a redraw request.
    pub fn set_on_loaded(&mut self, callback: impl FnMut(ElementId) + 'static) {
        self.on_loaded = Some(Box::new(callback));
    }

    /// Look an image up, queueing a decode on a miss. A failed decode is
    /// remembered as `Missing` so it is not retried every frame.
    pub fn get(&mut self, image: &Image) -> CacheStatus {
        match self.entries.get(&image.id) {
            Some(CacheEntry::Ready {
                filters,
                payload_len,
                bitmap,
            }) if *filters == image.filters && *payload_len == image.data_base64.len() => {
                return CacheStatus::Bitmap(Arc::clone(bitmap));
            }
            Some(CacheEntry::Failed) => return CacheStatus::Missing,
            _ => {}
        }
        if !image.has_data() {
            return CacheStatus::Missing;
        }
        if !self.queue.iter().any(|queued| queued.id == image.id) {
            self.queue.push(image.clone());
        }
        CacheStatus::Pending
    }

    /// Decode everything queued since the last call. Returns the number of
    /// bitmaps that became ready; the loaded-asset callback fires once per
    /// ready bitmap.
    pub fn process_pending(&mut self) -> usize {
        let queue = std::mem::take(&mut self.queue);
        let mut ready = 0;
        for image in queue {
            match decode(&image) {
                Ok(bitmap) => {
                    self.entries.insert(
                        image.id,
                        CacheEntry::Ready {
                            filters: image.filters,
                            payload_len: image.data_base64.len(),
                            bitmap: Arc::new(bitmap),
                        },
                    );
                    ready += 1;
                    if let Some(callback) = self.on_loaded.as_mut() {
                        callback(image.id);
                    }
                }
                Err(err) => {
                    log::warn!("image {} is not drawable: {err}", image.id);
                    self.entries.insert(image.id, CacheEntry::Failed);
                }
            }
        }
        ready
    }

    /// Decodes waiting in the queue.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn invalidate(&mut self, id: ElementId) {
        self.entries.remove(&id);
        self.queue.retain(|queued| queued.id != id);
    }

    /// Drop entries for elements that no longer exist.
    pub fn retain_live(&mut self, mut live: impl FnMut(ElementId) -> bool) {
        self.entries.retain(|id, _| live(*id));
        self.queue.retain(|queued| live(queued.id));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decode(image: &Image) -> RenderResult<Bitmap> {
    if !image.has_data() {
        return Err(RendererError::UnsupportedImage("no payload".to_string()));
    }
    if image.format == ImageFormat::Svg {
        return Err(RendererError::UnsupportedImage(
            "svg payloads are not rasterized".to_string(),
        ));
    }
    let bytes = BASE64
        .decode(image.data_base64.as_bytes())
        .map_err(|err| RendererError::UnsupportedImage(err.to_string()))?;
    let decoded = ::image::load_from_memory(&bytes)
        .map_err(|err| RendererError::UnsupportedImage(err.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgba = rgba.into_raw();
    if !image.filters.is_identity() {
        apply_filters(&mut rgba, image.filters);
    }
    Ok(Bitmap {
        width,
        height,
        rgba,
    })
}

/// Bake display filters into the pixels, in the same order the editor UI
/// lists them: brightness, contrast, saturation, grayscale, sepia, invert.
fn apply_filters(rgba: &mut [u8], filters: ImageFilters) {
    let brightness = filters.brightness / 100.0;
    let contrast = filters.contrast / 100.0;
    let saturation = filters.saturation / 100.0;
    let grayscale = (filters.grayscale / 100.0).clamp(0.0, 1.0);
    let sepia = (filters.sepia / 100.0).clamp(0.0, 1.0);
    let invert = (filters.invert / 100.0).clamp(0.0, 1.0);

    for pixel in rgba.chunks_exact_mut(4) {
        let mut r = pixel[0] as f64;
        let mut g = pixel[1] as f64;
        let mut b = pixel[2] as f64;

        r *= brightness;
        g *= brightness;
        b *= brightness;

        r = (r - 128.0) * contrast + 128.0;
        g = (g - 128.0) * contrast + 128.0;
        b = (b - 128.0) * contrast + 128.0;

        let luma = 0.2126 * r + 0.7152 * g + 0.0722 * b;
        r = luma + (r - luma) * saturation;
        g = luma + (g - luma) * saturation;
        b = luma + (b - luma) * saturation;

        let luma = 0.2126 * r + 0.7152 * g + 0.0722 * b;
        r += (luma - r) * grayscale;
        g += (luma - g) * grayscale;
        b += (luma - b) * grayscale;

        let sr = 0.393 * r + 0.769 * g + 0.189 * b;
        let sg = 0.349 * r + 0.686 * g + 0.168 * b;
        let sb = 0.272 * r + 0.534 * g + 0.131 * b;
        r += (sr - r) * sepia;
        g += (sg - g) * sepia;
        b += (sb - b) * sepia;

        r = r * (1.0 - invert) + (255.0 - r) * invert;
        g = g * (1.0 - invert) + (255.0 - g) * invert;
        b = b * (1.0 - invert) + (255.0 - b) * invert;

        pixel[0] = r.clamp(0.0, 255.0) as u8;
        pixel[1] = g.clamp(0.0, 255.0) as u8;
        pixel[2] = b.clamp(0.0, 255.0) as u8;
    }
}

/// Attach raw encoded bytes to an image element: sniff the format, decode
/// the natural size and store the payload base64-encoded. The element's
/// display size is capped by its own intake rules.
pub fn attach_image_bytes(image: &mut Image, bytes: &[u8]) -> RenderResult<()> {
    use ::image::GenericImageView;

    let format = ImageFormat::from_magic_bytes(bytes).ok_or_else(|| {
        RendererError::UnsupportedImage("unrecognized image payload".to_string())
    })?;
    if format == ImageFormat::Svg {
        return Err(RendererError::UnsupportedImage(
            "svg payloads are not rasterized".to_string(),
        ));
    }
    let decoded = ::image::load_from_memory(bytes)
        .map_err(|err| RendererError::UnsupportedImage(err.to_string()))?;
    let (width, height) = decoded.dimensions();
    image.attach(format, BASE64.encode(bytes), width, height);
    Ok(())
}
