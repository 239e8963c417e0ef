//! Interactive pan/zoom state for one image slot.
//!
//! The source image is drawn at `offset` with size
//! `W * base_scale * user_scale` by `H * base_scale * user_scale`, where
//! `base_scale` is the cover scale of the source against the canvas. After
//! every mutation the offset is clamped so the drawn image covers the
//! whole canvas.

mod events;
mod load;
mod render;

use std::sync::Arc;

use image::RgbaImage;
use tracing::debug;

use crate::config::SlotConfig;
use crate::error::Result;

pub use events::{EventOutcome, ViewportEvent};
pub use load::{LoadOutcome, LoadTicket};

/// A position in canvas pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Interaction phase of a viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportPhase {
    NoImage,
    /// Image present, transform may have changed since the last export.
    Loaded,
    Dragging,
    /// Exported and untouched since.
    Applied,
}

#[derive(Clone, Copy, Debug)]
struct DragAnchor {
    pointer: Point,
    offset: Point,
}

pub struct Viewport {
    config: SlotConfig,
    source: Option<Arc<RgbaImage>>,
    base_scale: f64,
    user_scale: f64,
    offset: Point,
    drag: Option<DragAnchor>,
    phase: ViewportPhase,
    generation: u64,
}

impl Viewport {
    pub fn new(config: SlotConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source: None,
            base_scale: 1.0,
            user_scale: 1.0,
            offset: Point::default(),
            drag: None,
            phase: ViewportPhase::NoImage,
            generation: 0,
        })
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&Arc<RgbaImage>> {
        self.source.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.source.as_ref().map(|img| img.dimensions())
    }

    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    pub fn user_scale(&self) -> f64 {
        self.user_scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn phase(&self) -> ViewportPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (
            self.config.canvas_width as f64,
            self.config.canvas_height as f64,
        )
    }

    /// On-canvas size of the drawn image, or `None` without an image.
    pub fn draw_size(&self) -> Option<(f64, f64)> {
        self.image_size().map(|(w, h)| {
            let scale = self.base_scale * self.user_scale;
            (w as f64 * scale, h as f64 * scale)
        })
    }

    /// Set the zoom multiplier, keeping the point under the canvas centre fixed.
    pub fn set_zoom(&mut self, value: f64) {
        if !self.has_image() || !value.is_finite() {
            return;
        }
        let new_scale = self.config.zoom.clamp(value);
        let old_scale = self.user_scale;
        if new_scale == old_scale {
            return;
        }

        let (cw, ch) = self.canvas_size();
        let (cx, cy) = (cw / 2.0, ch / 2.0);
        let ratio = new_scale / old_scale;
        self.offset = Point::new(
            cx - (cx - self.offset.x) * ratio,
            cy - (cy - self.offset.y) * ratio,
        );
        self.user_scale = new_scale;
        self.clamp_offset();
        self.touch();
        debug!(zoom = new_scale, x = self.offset.x, y = self.offset.y, "zoom");
    }

    /// One wheel notch: scrolling up zooms in, scrolling down zooms out.
    pub fn on_wheel(&mut self, delta_y: f64) {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        let step = if delta_y < 0.0 {
            self.config.wheel_step
        } else {
            -self.config.wheel_step
        };
        self.set_zoom(self.config.zoom.clamp(self.user_scale + step));
    }

    /// Start a drag at a canvas position. Returns false when there is nothing
    /// to drag or the pointer is outside the canvas.
    pub fn begin_drag(&mut self, x: f64, y: f64) -> bool {
        let (cw, ch) = self.canvas_size();
        if !self.has_image() || !(0.0..cw).contains(&x) || !(0.0..ch).contains(&y) {
            return false;
        }
        self.drag = Some(DragAnchor {
            pointer: Point::new(x, y),
            offset: self.offset,
        });
        self.phase = ViewportPhase::Dragging;
        true
    }

    /// Move the drag pointer. The offset follows the total pointer
    /// displacement since the drag started.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        let Some(anchor) = self.drag else {
            return;
        };
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.offset = Point::new(
            anchor.offset.x + (x - anchor.pointer.x),
            anchor.offset.y + (y - anchor.pointer.y),
        );
        self.clamp_offset();
    }

    pub fn end_drag(&mut self) {
        if self.drag.take().is_some() {
            self.phase = ViewportPhase::Loaded;
        }
    }

    /// Shift the image by `(dx, dy)` canvas pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !self.has_image() || !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.offset = Point::new(self.offset.x + dx, self.offset.y + dy);
        self.clamp_offset();
        self.touch();
    }

    /// Drop the image and all transform state.
    pub fn reset(&mut self) {
        self.generation = load::next_generation();
        self.source = None;
        self.base_scale = 1.0;
        self.user_scale = 1.0;
        self.offset = Point::default();
        self.drag = None;
        self.phase = ViewportPhase::NoImage;
        debug!(generation = self.generation, "viewport reset");
    }

    pub(crate) fn mark_applied(&mut self) {
        if self.has_image() && self.drag.is_none() {
            self.phase = ViewportPhase::Applied;
        }
    }

    fn install(&mut self, image: RgbaImage) {
        let (w, h) = image.dimensions();
        let (cw, ch) = self.canvas_size();
        self.base_scale = (cw / w as f64).max(ch / h as f64);
        self.user_scale = 1.0;
        let (dw, dh) = (w as f64 * self.base_scale, h as f64 * self.base_scale);
        self.offset = Point::new((cw - dw) / 2.0, (ch - dh) / 2.0);
        self.source = Some(Arc::new(image));
        self.drag = None;
        self.phase = ViewportPhase::Loaded;
        self.clamp_offset();
    }

    fn touch(&mut self) {
        if self.phase == ViewportPhase::Applied {
            self.phase = ViewportPhase::Loaded;
        }
    }

    fn clamp_offset(&mut self) {
        let Some((dw, dh)) = self.draw_size() else {
            return;
        };
        let (cw, ch) = self.canvas_size();
        self.offset = Point::new(
            clamp_axis(self.offset.x, cw, dw),
            clamp_axis(self.offset.y, ch, dh),
        );
    }
}

/// Keep `[offset, offset + draw]` covering `[0, canvas]`. If the drawn
/// extent is short of the canvas (float noise at the cover scale) the image
/// is centred instead.
fn clamp_axis(offset: f64, canvas: f64, draw: f64) -> f64 {
    let lo = canvas - draw;
    if lo > 0.0 {
        lo / 2.0
    } else {
        offset.clamp(lo, 0.0)
    }
}
