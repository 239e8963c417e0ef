#![allow(dead_code)]

use image::{Rgba, RgbaImage};

use idframe_core::config::{SlotConfig, ZoomRange};
use idframe_core::image_io::encode_png;

/// Opaque test pattern where every pixel differs from its neighbours.
pub fn pattern_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 7 % 256) as u8,
            (y * 11 % 256) as u8,
            ((x + y) * 3 % 256) as u8,
            255,
        ])
    })
}

pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    encode_png(image).unwrap()
}

/// Slot with a `canvas_w x canvas_h` window and zoom `[1, 3]`.
pub fn slot(canvas_w: u32, canvas_h: u32, output_width: u32) -> SlotConfig {
    SlotConfig {
        canvas_width: canvas_w,
        canvas_height: canvas_h,
        zoom: ZoomRange {
            min: 1.0,
            max: 3.0,
            step: 0.01,
        },
        wheel_step: 0.05,
        output_width,
    }
}

/// Deterministic pseudo-random sequence for interaction fuzzing.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Uniform value in `[lo, hi)`.
    pub fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let unit = (self.0 >> 11) as f64 / (1u64 << 53) as f64;
        lo + unit * (hi - lo)
    }
}
