use image::RgbaImage;
use tracing::info;

use crate::consts::EXPORT_BACKGROUND;
use crate::error::Result;
use crate::image_io::encode_png;
use crate::sampling::{draw_image, fill, Rect};
use crate::viewport::Viewport;

/// Region of the source image visible through the crop window, in source
/// pixel coordinates.
pub type SourceRect = Rect;

impl Viewport {
    pub fn source_rect(&self) -> Option<SourceRect> {
        source_rect(self)
    }
}

/// Compute the [`SourceRect`] of a viewport.
///
/// Inverse of the on-canvas placement: canvas `(0, 0)` maps to
/// `(-offset / draw) * source` and the canvas extent maps to
/// `(canvas / draw) * source`.
pub fn source_rect(viewport: &Viewport) -> Option<SourceRect> {
    let (w, h) = viewport.image_size()?;
    let (dw, dh) = viewport.draw_size()?;
    let (cw, ch) = viewport.canvas_size();
    let offset = viewport.offset();
    let (w, h) = (w as f64, h as f64);
    Some(Rect::new(
        (-offset.x / dw) * w,
        (-offset.y / dh) * h,
        (cw / dw) * w,
        (ch / dh) * h,
    ))
}

/// Rasterize the visible window into a fresh bitmap at the slot's fixed
/// output resolution, over a white background.
///
/// Pure function of the viewport state: the same state always produces the
/// same pixels. `None` when no image is loaded.
pub fn export_crop(viewport: &Viewport) -> Option<RgbaImage> {
    let source = viewport.source()?;
    let rect = source_rect(viewport)?;
    let (out_w, out_h) = viewport.config().output_size();

    let mut output = RgbaImage::new(out_w, out_h);
    fill(&mut output, EXPORT_BACKGROUND);
    draw_image(&mut output, source, rect, Rect::full(out_w, out_h));

    info!(
        src_x = rect.x,
        src_y = rect.y,
        src_w = rect.width,
        src_h = rect.height,
        out_w,
        out_h,
        "exported crop"
    );
    Some(output)
}

/// [`export_crop`] encoded as PNG.
pub fn export_png(viewport: &Viewport) -> Result<Option<Vec<u8>>> {
    export_crop(viewport).map(|crop| encode_png(&crop)).transpose()
}
