//! Background removal and ink boost for signature crops.

use std::fmt;
use std::sync::Arc;

use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::{DEFAULT_THRESHOLD, INK_BOOST_FACTOR, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{IdframeError, Result};
use crate::image_io::encode_png;

/// Brightness cutoff in `[0, 255]`. Pixels at or above it are background.
///
/// Zero disables background removal: nothing is keyed out and every pixel
/// gets the ink boost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Threshold(u8);

impl Threshold {
    pub const MIN: Threshold = Threshold(0);
    pub const MAX: Threshold = Threshold(255);

    pub fn new(value: u8) -> Self {
        Self(value)
    }

    /// Clamp arbitrary slider input into range.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 255) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn removes_background(self) -> bool {
        self.0 > 0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Produce a cleaned copy of `raw`. `raw` itself is never modified.
///
/// Per pixel, with `brightness = (R + G + B) / 3`:
/// - `brightness >= threshold`: alpha becomes 0.
/// - otherwise each colour channel drops by `(255 - brightness) * 0.2`
///   (floored at 0) and alpha becomes 255.
pub fn cleanup(raw: &RgbaImage, threshold: Threshold) -> RgbaImage {
    let mut out = raw.clone();
    let (w, h) = out.dimensions();
    let buf: &mut [u8] = &mut out;

    if w as usize * h as usize >= PARALLEL_PIXEL_THRESHOLD {
        buf.par_chunks_exact_mut(4)
            .for_each(|px| cleanup_pixel(px, threshold));
    } else {
        buf.chunks_exact_mut(4)
            .for_each(|px| cleanup_pixel(px, threshold));
    }
    out
}

/// [`cleanup`] for images of unknown layout. Only 8-bit RGBA is accepted.
pub fn cleanup_dynamic(raw: &DynamicImage, threshold: Threshold) -> Result<RgbaImage> {
    match raw {
        DynamicImage::ImageRgba8(img) => Ok(cleanup(img, threshold)),
        other => Err(IdframeError::UnsupportedPixelFormat(format!(
            "{:?}, expected Rgba8",
            other.color()
        ))),
    }
}

fn cleanup_pixel(px: &mut [u8], threshold: Threshold) {
    let brightness = (px[0] as f64 + px[1] as f64 + px[2] as f64) / 3.0;
    if threshold.removes_background() && brightness >= threshold.value() as f64 {
        px[3] = 0;
        return;
    }
    let boost = (255.0 - brightness).max(0.0) * INK_BOOST_FACTOR;
    for c in &mut px[..3] {
        *c = store_channel((*c as f64 - boost).max(0.0));
    }
    px[3] = 255;
}

/// Clamped 8-bit store, rounding half to even.
fn store_channel(v: f64) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Raw signature crop plus its cleaned derivative.
///
/// The cleaned image is always recomputed from `raw`, so moving the
/// threshold back and forth never compounds.
#[derive(Clone, Debug)]
pub struct SignaturePair {
    raw: Arc<RgbaImage>,
    cleaned: RgbaImage,
    threshold: Threshold,
}

impl SignaturePair {
    pub fn new(raw: RgbaImage, threshold: Threshold) -> Self {
        let raw = Arc::new(raw);
        let cleaned = cleanup(&raw, threshold);
        Self {
            raw,
            cleaned,
            threshold,
        }
    }

    pub fn raw(&self) -> &Arc<RgbaImage> {
        &self.raw
    }

    pub fn cleaned(&self) -> &RgbaImage {
        &self.cleaned
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Recompute the cleaned image from the raw crop. Returns false if the
    /// threshold did not change.
    pub fn retune(&mut self, threshold: Threshold) -> bool {
        if threshold == self.threshold {
            return false;
        }
        self.cleaned = cleanup(&self.raw, threshold);
        self.threshold = threshold;
        info!(threshold = threshold.value(), "signature re-tuned");
        true
    }

    /// Replace the cleaned image with one computed for `threshold` elsewhere.
    pub fn set_cleaned(&mut self, cleaned: RgbaImage, threshold: Threshold) {
        self.cleaned = cleaned;
        self.threshold = threshold;
    }

    pub fn raw_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.raw)
    }

    pub fn cleaned_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.cleaned)
    }
}
