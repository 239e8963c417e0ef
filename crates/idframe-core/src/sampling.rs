use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Axis-aligned rectangle in floating-point pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width x height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Fill every pixel with `color`.
pub fn fill(dst: &mut RgbaImage, color: [u8; 4]) {
    for pixel in dst.pixels_mut() {
        *pixel = Rgba(color);
    }
}

/// Draw an opaque frame of `width` pixels along the image edges.
pub fn stroke_border(dst: &mut RgbaImage, width: u32, color: [u8; 4]) {
    let (w, h) = dst.dimensions();
    for (x, y, pixel) in dst.enumerate_pixels_mut() {
        if x < width || y < width || x + width >= w || y + width >= h {
            *pixel = Rgba(color);
        }
    }
}

/// Resample `src_rect` of `src` into `dst_rect` of `dst` with bilinear
/// filtering, compositing source-over.
///
/// Sampling happens at destination pixel centres. A destination pixel is
/// touched only when its centre lies inside `dst_rect` and maps inside
/// both `src_rect` and the source bounds; everything else keeps its
/// current value. The result does not depend on whether rows run in
/// parallel.
pub fn draw_image(dst: &mut RgbaImage, src: &RgbaImage, src_rect: Rect, dst_rect: Rect) {
    let (sw, sh) = src.dimensions();
    if src_rect.is_empty() || dst_rect.is_empty() || sw == 0 || sh == 0 {
        return;
    }

    let (dw, dh) = dst.dimensions();
    let clip_left = src_rect.x.max(0.0);
    let clip_top = src_rect.y.max(0.0);
    let clip_right = src_rect.right().min(sw as f64);
    let clip_bottom = src_rect.bottom().min(sh as f64);
    let scale_x = src_rect.width / dst_rect.width;
    let scale_y = src_rect.height / dst_rect.height;

    let fill_row = |py: usize, row: &mut [u8]| {
        let cy = py as f64 + 0.5;
        if cy < dst_rect.y || cy >= dst_rect.bottom() {
            return;
        }
        let v = src_rect.y + (cy - dst_rect.y) * scale_y;
        if v < clip_top || v >= clip_bottom {
            return;
        }
        for (px, out) in row.chunks_exact_mut(4).enumerate() {
            let cx = px as f64 + 0.5;
            if cx < dst_rect.x || cx >= dst_rect.right() {
                continue;
            }
            let u = src_rect.x + (cx - dst_rect.x) * scale_x;
            if u < clip_left || u >= clip_right {
                continue;
            }
            let sample = bilinear_premultiplied(src, u - 0.5, v - 0.5);
            composite_over(out, sample);
        }
    };

    let row_len = dw as usize * 4;
    if row_len == 0 {
        return;
    }
    let buf: &mut [u8] = dst;
    if dw as usize * dh as usize >= PARALLEL_PIXEL_THRESHOLD {
        buf.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(py, row)| fill_row(py, row));
    } else {
        buf.chunks_mut(row_len)
            .enumerate()
            .for_each(|(py, row)| fill_row(py, row));
    }
}

/// Bilinear sample at continuous pixel coordinates, clamped to the edges.
/// Returns premultiplied RGB and alpha, all on a 0..255 scale.
fn bilinear_premultiplied(src: &RgbaImage, x: f64, y: f64) -> [f32; 4] {
    let (w, h) = src.dimensions();
    let x = x.clamp(0.0, (w - 1) as f64);
    let y = y.clamp(0.0, (h - 1) as f64);

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = (x - x0) as f32;
    let fy = (y - y0) as f32;
    let x0 = x0 as u32;
    let y0 = y0 as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x1, y0, fx * (1.0 - fy)),
        (x0, y1, (1.0 - fx) * fy),
        (x1, y1, fx * fy),
    ];

    let mut acc = [0.0f32; 4];
    for (tx, ty, weight) in taps {
        if weight == 0.0 {
            continue;
        }
        let p = src.get_pixel(tx, ty).0;
        let alpha = p[3] as f32 / 255.0;
        acc[0] += p[0] as f32 * alpha * weight;
        acc[1] += p[1] as f32 * alpha * weight;
        acc[2] += p[2] as f32 * alpha * weight;
        acc[3] += p[3] as f32 * weight;
    }
    acc
}

fn composite_over(dst: &mut [u8], src: [f32; 4]) {
    let sa = src[3] / 255.0;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let dc = dst[c] as f32 * da;
        dst[c] = to_u8((src[c] + dc * (1.0 - sa)) / out_a);
    }
    dst[3] = to_u8(out_a * 255.0);
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
