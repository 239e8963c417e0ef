use image::RgbaImage;

use super::Viewport;
use crate::consts::{BORDER_COLOR, BORDER_WIDTH};
use crate::sampling::{draw_image, stroke_border, Rect};

impl Viewport {
    /// Draw the current view onto a fresh canvas-sized surface and stroke the
    /// crop boundary. `None` without an image.
    pub fn render(&self) -> Option<RgbaImage> {
        let source = self.source.as_ref()?;
        let (dw, dh) = self.draw_size()?;
        let mut surface = RgbaImage::new(self.config.canvas_width, self.config.canvas_height);
        let (w, h) = source.dimensions();
        draw_image(
            &mut surface,
            source,
            Rect::full(w, h),
            Rect::new(self.offset.x, self.offset.y, dw, dh),
        );
        stroke_border(&mut surface, BORDER_WIDTH, BORDER_COLOR);
        Some(surface)
    }
}
