//! The drawing surface bars are rendered onto.
//!
//! All coordinates here are physical and relative to the monitor being drawn.

use std::fmt::Debug;

use custom_debug_derive::Debug as CustomDebug;

use crate::types::{ColorF, Rectangle, Physical};
use crate::texture::{Rasterizer, TextureUploader, TextureId};

use super::MonitorInfo;

/// The rendering operations a bar needs from the host's renderer.
pub trait BarRenderer: Debug {
    /// Restricts drawing to `region`, or lifts the restriction if `None`.
    fn scissor(&mut self, region: Option<Rectangle<i32, Physical>>);

    /// Masks out a rounded rectangle: nothing drawn afterward lands inside it
    /// until [`pop_clip`](BarRenderer::pop_clip) is called.
    fn push_rounded_clip(&mut self, region: Rectangle<i32, Physical>, radius: f64, power: f64);

    /// Clears the mask set by [`push_rounded_clip`](BarRenderer::push_rounded_clip).
    fn pop_clip(&mut self);

    /// Fills a rectangle with rounded corners.
    fn render_rect(
        &mut self,
        region: Rectangle<i32, Physical>,
        color: ColorF,
        radius: f64,
        power: f64,
        blur: bool,
    );

    /// Draws a texture stretched over `region`.
    fn render_texture(&mut self, texture: TextureId, region: Rectangle<i32, Physical>, alpha: f32);
}

/// Everything needed to draw bars onto one monitor for one frame.
#[derive(CustomDebug)]
pub struct Frame<'a> {
    /// The monitor being drawn.
    pub monitor: &'a MonitorInfo,
    /// The opacity the host is drawing the window at.
    pub alpha: f32,
    /// Where drawing goes.
    #[debug(skip)]
    pub renderer: &'a mut dyn BarRenderer,
    /// Turns text and shapes into pixels.
    #[debug(skip)]
    pub rasterizer: &'a mut dyn Rasterizer,
    /// Turns pixels into textures.
    #[debug(skip)]
    pub uploader: &'a mut dyn TextureUploader,
}

impl<'a> Frame<'a> {
    /// The monitor's scale factor.
    pub fn scale(&self) -> f64 {
        self.monitor.scale
    }
}
