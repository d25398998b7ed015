//! Rasterizing bar content and caching the resulting textures.
//!
//! Producing a texture takes two steps: a [`Rasterizer`] draws text or shapes
//! into a [`RasterBuffer`] in CPU memory, then a [`TextureUploader`] turns the
//! buffer into a [`TextureId`] the renderer can draw. Either step can fail; a
//! failed texture is left unset in the [`TextureCache`] and is attempted
//! again on the next frame, while the caller draws a placeholder.

use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{Color, ColorF, Point, Size, Physical};
use crate::layout::TitlePlacement;

/// An opaque handle to a texture owned by the host's renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Premultiplied ARGB32 pixels, one `u32` per pixel in native byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    /// The dimensions of the buffer.
    pub size: Size<i32, Physical>,
    /// Row-major pixel data.
    pub data: Vec<u32>,
}

impl RasterBuffer {
    /// Creates a fully transparent buffer.
    pub fn new(size: Size<i32, Physical>) -> Result<Self, RasterError> {
        if size.is_empty() {
            return Err(RasterError::InvalidSize(size.width, size.height))
        }
        let len = size.width as usize * size.height as usize;
        Ok(Self { size, data: vec![0; len] })
    }
}

/// Rasterization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// The requested buffer has no area.
    #[error("invalid buffer size {0}x{1}")]
    InvalidSize(i32, i32),
    /// The font could not be loaded or shaped.
    #[error("font error: {0}")]
    Font(String),
    /// Any other failure of the underlying rasterizer.
    #[error("rasterizer error: {0}")]
    Other(String),
}

/// Texture upload failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The renderer could not allocate a texture.
    #[error("could not allocate texture")]
    Allocation,
    /// The pixel data was rejected.
    #[error("upload failed: {0}")]
    Upload(String),
}

/// How text is positioned horizontally within its buffer.
///
/// Text is always centered vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextPosition {
    /// Placed according to the title layout.
    Placed(TitlePlacement),
    /// Centered, not ellipsized.
    Centered,
}

/// A line of text to rasterize.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest<'a> {
    /// The text.
    pub text: &'a str,
    /// The font family.
    pub font: &'a str,
    /// The font size, already scaled to physical pixels.
    pub font_size: f64,
    /// The text color.
    pub color: ColorF,
    /// The size of the buffer to draw into.
    pub buffer: Size<i32, Physical>,
    /// Where the text goes.
    pub position: TextPosition,
}

/// A filled circle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub struct Circle {
    pub center: Point<f64, Physical>,
    pub radius: f64,
    pub color: ColorF,
}

/// A set of circles to rasterize onto one transparent buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct CirclesRequest<'a> {
    /// The size of the buffer to draw into.
    pub buffer: Size<i32, Physical>,
    /// The circles, drawn in order.
    pub circles: &'a [Circle],
}

/// Draws text and shapes into CPU memory.
pub trait Rasterizer {
    /// Draws one line of antialiased text.
    fn rasterize_text(&mut self, req: &TextRequest<'_>) -> Result<RasterBuffer, RasterError>;

    /// Draws filled circles.
    fn rasterize_circles(&mut self, req: &CirclesRequest<'_>) -> Result<RasterBuffer, RasterError>;
}

/// Moves raster buffers into renderer-owned textures.
pub trait TextureUploader {
    /// Uploads a buffer into a new texture.
    fn upload(&mut self, buffer: &RasterBuffer) -> Result<TextureId, UploadError>;

    /// Frees a texture.
    fn release(&mut self, texture: TextureId);
}

/// Why a texture could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureError {
    #[error(transparent)]
    #[allow(missing_docs)]
    Raster(#[from] RasterError),
    #[error(transparent)]
    #[allow(missing_docs)]
    Upload(#[from] UploadError),
}

/// The last inputs the title texture was rendered from.
#[derive(Debug, Clone, PartialEq)]
struct TitleKey {
    text: String,
    color: Color,
    font_size: f64,
}

/// The textures belonging to one bar.
///
/// Owned textures must be handed back with [`release_all`](TextureCache::release_all)
/// before the cache is dropped.
#[derive(Debug, Default)]
pub struct TextureCache {
    title: Option<TextureId>,
    buttons: Option<TextureId>,
    icons: Vec<Option<TextureId>>,

    last_title: Option<TitleKey>,
    last_scale: Option<f64>,

    /// Set when the button list, colors or focus changed.
    pub buttons_dirty: bool,
    /// Set when the bar's assigned box changed size.
    pub size_changed: bool,
    /// Set when a rule changed the title color.
    pub title_color_changed: bool,
}

impl TextureCache {
    /// Creates an empty cache that regenerates everything on first use.
    pub fn new() -> Self {
        Self {
            buttons_dirty: true,
            ..Self::default()
        }
    }

    /// The current title texture.
    pub fn title(&self) -> Option<TextureId> {
        self.title
    }

    /// The current buttons texture.
    pub fn buttons(&self) -> Option<TextureId> {
        self.buttons
    }

    /// The cached text of the last title rendered.
    pub fn last_title_text(&self) -> Option<&str> {
        self.last_title.as_ref().map(|k| k.text.as_str())
    }

    /// Whether the title texture must be produced again.
    ///
    /// `font_size` is the scaled size, so moving to a monitor with another
    /// scale also counts as a change.
    pub fn title_stale(&self, text: &str, color: Color, font_size: f64) -> bool {
        let key_changed = match &self.last_title {
            Some(key) => key.text != text || key.color != color || key.font_size != font_size,
            None => true,
        };

        key_changed || self.size_changed || self.title_color_changed || self.title.is_none()
    }

    /// Whether the buttons texture must be produced again.
    pub fn buttons_stale(&self, scale: f64) -> bool {
        self.buttons_dirty
            || self.size_changed
            || self.buttons.is_none()
            || self.last_scale != Some(scale)
    }

    /// Renders and uploads the title, replacing the previous texture.
    ///
    /// The inputs are recorded even on failure, so a failed title is only
    /// retried because its texture is missing.
    pub fn regenerate_title(
        &mut self,
        rasterizer: &mut dyn Rasterizer,
        uploader: &mut dyn TextureUploader,
        req: &TextRequest<'_>,
        color: Color,
    ) -> Result<TextureId, TextureError> {
        if let Some(old) = self.title.take() {
            uploader.release(old);
        }
        self.last_title = Some(TitleKey {
            text: req.text.to_string(),
            color,
            font_size: req.font_size,
        });

        let id = produce(uploader, rasterizer.rasterize_text(req))?;
        debug!(target: "texture", "title texture {:?} for {:?}", id, req.text);
        self.title = Some(id);
        Ok(id)
    }

    /// Renders and uploads the button circles, replacing the previous texture.
    ///
    /// Icon textures are dropped along with it and produced again on demand.
    pub fn regenerate_buttons(
        &mut self,
        rasterizer: &mut dyn Rasterizer,
        uploader: &mut dyn TextureUploader,
        req: &CirclesRequest<'_>,
        scale: f64,
    ) -> Result<TextureId, TextureError> {
        if let Some(old) = self.buttons.take() {
            uploader.release(old);
        }
        self.clear_icons(uploader);
        self.buttons_dirty = false;
        self.last_scale = Some(scale);

        let id = produce(uploader, rasterizer.rasterize_circles(req))?;
        debug!(target: "texture", "buttons texture {:?} with {} circles", id, req.circles.len());
        self.buttons = Some(id);
        Ok(id)
    }

    /// Returns the icon texture for button `index`, producing it if missing.
    ///
    /// A failure is logged and yields `None`; the icon is tried again next time.
    pub fn icon(
        &mut self,
        index: usize,
        rasterizer: &mut dyn Rasterizer,
        uploader: &mut dyn TextureUploader,
        req: &TextRequest<'_>,
    ) -> Option<TextureId> {
        if self.icons.len() <= index {
            self.icons.resize(index + 1, None);
        }
        if let Some(id) = self.icons[index] {
            return Some(id)
        }

        match produce(uploader, rasterizer.rasterize_text(req)) {
            Ok(id) => {
                self.icons[index] = Some(id);
                Some(id)
            }
            Err(e) => {
                warn!(target: "texture", "could not produce icon {:?}: {}", req.text, e);
                None
            }
        }
    }

    /// Frees every icon texture.
    pub fn clear_icons(&mut self, uploader: &mut dyn TextureUploader) {
        for id in self.icons.drain(..).flatten() {
            uploader.release(id);
        }
    }

    /// Clears the per-frame change flags once a frame has been drawn.
    pub fn finish_frame(&mut self) {
        self.size_changed = false;
        self.title_color_changed = false;
    }

    /// Takes every texture out of the cache, leaving it empty and dirty.
    ///
    /// The caller becomes responsible for releasing the returned textures.
    pub fn take_all(&mut self) -> Vec<TextureId> {
        let mut out: Vec<TextureId> = self.icons.drain(..).flatten().collect();
        out.extend(self.title.take());
        out.extend(self.buttons.take());
        self.last_title = None;
        self.buttons_dirty = true;
        out
    }

    /// Frees every texture.
    pub fn release_all(&mut self, uploader: &mut dyn TextureUploader) {
        for id in self.take_all() {
            uploader.release(id);
        }
    }

    /// Whether the cache holds no textures.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.buttons.is_none() && self.icons.iter().all(Option::is_none)
    }
}

fn produce(
    uploader: &mut dyn TextureUploader,
    raster: Result<RasterBuffer, RasterError>,
) -> Result<TextureId, TextureError> {
    let buffer = raster?;
    Ok(uploader.upload(&buffer)?)
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::mock::{MockRasterizer, MockUploader};

    fn text_req(text: &str) -> TextRequest<'_> {
        TextRequest {
            text,
            font: "Sans",
            font_size: 10.0,
            color: ColorF::new(1.0, 1.0, 1.0, 1.0),
            buffer: Size::new(100, 15),
            position: TextPosition::Centered,
        }
    }

    #[test]
    fn test_raster_buffer_rejects_empty() {
        assert_eq!(
            RasterBuffer::new(Size::new(0, 10)),
            Err(RasterError::InvalidSize(0, 10))
        );
        assert_eq!(RasterBuffer::new(Size::new(4, 2)).unwrap().data.len(), 8);
    }

    #[test_log::test]
    fn test_title_staleness() {
        let mut cache = TextureCache::new();
        let mut raster = MockRasterizer::default();
        let mut uploader = MockUploader::default();

        assert!(cache.title_stale("a", Color::WHITE, 10.0));
        cache.regenerate_title(&mut raster, &mut uploader, &text_req("a"), Color::WHITE).unwrap();

        assert!(!cache.title_stale("a", Color::WHITE, 10.0));
        assert!(cache.title_stale("b", Color::WHITE, 10.0));
        assert!(cache.title_stale("a", Color::BLACK, 10.0));
        assert!(cache.title_stale("a", Color::WHITE, 12.0));

        cache.size_changed = true;
        assert!(cache.title_stale("a", Color::WHITE, 10.0));
        cache.finish_frame();
        assert!(!cache.title_stale("a", Color::WHITE, 10.0));
    }

    #[test_log::test]
    fn test_failure_leaves_texture_unset_and_retries() {
        let mut cache = TextureCache::new();
        let mut raster = MockRasterizer { fail: true, ..Default::default() };
        let mut uploader = MockUploader::default();

        let res = cache.regenerate_title(&mut raster, &mut uploader, &text_req("a"), Color::WHITE);
        assert!(res.is_err());
        assert!(cache.title().is_none());
        // same inputs, but no texture
        assert!(cache.title_stale("a", Color::WHITE, 10.0));

        raster.fail = false;
        cache.regenerate_title(&mut raster, &mut uploader, &text_req("a"), Color::WHITE).unwrap();
        assert!(cache.title().is_some());
        assert_eq!(raster.text_calls, 2);
    }

    #[test_log::test]
    fn test_upload_failure() {
        let mut cache = TextureCache::new();
        let mut raster = MockRasterizer::default();
        let mut uploader = MockUploader { fail: true, ..Default::default() };

        let req = CirclesRequest { buffer: Size::new(10, 10), circles: &[] };
        assert_eq!(
            cache.regenerate_buttons(&mut raster, &mut uploader, &req, 1.0),
            Err(TextureError::Upload(UploadError::Allocation))
        );
        assert!(cache.buttons_stale(1.0));
    }

    #[test_log::test]
    fn test_buttons_regeneration_drops_icons() {
        let mut cache = TextureCache::new();
        let mut raster = MockRasterizer::default();
        let mut uploader = MockUploader::default();
        let req = CirclesRequest { buffer: Size::new(10, 10), circles: &[] };

        assert!(cache.buttons_stale(1.0));
        cache.regenerate_buttons(&mut raster, &mut uploader, &req, 1.0).unwrap();
        assert!(!cache.buttons_stale(1.0));
        assert!(cache.buttons_stale(2.0));

        let icon = cache.icon(1, &mut raster, &mut uploader, &text_req("x"));
        assert!(icon.is_some());
        // cached on second request
        assert_eq!(cache.icon(1, &mut raster, &mut uploader, &text_req("x")), icon);
        assert_eq!(raster.text_calls, 1);

        cache.buttons_dirty = true;
        cache.regenerate_buttons(&mut raster, &mut uploader, &req, 1.0).unwrap();
        assert!(uploader.released.contains(&icon.unwrap()));

        cache.release_all(&mut uploader);
        assert!(cache.is_empty());
        assert!(uploader.live().is_empty());
    }
}
