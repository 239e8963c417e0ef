use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbaImage;
use tracing::{debug, info, warn};

use super::Viewport;
use crate::error::{IdframeError, Result};
use crate::image_io::decode_image;

/// Generations are drawn from one process-wide sequence, so a ticket issued
/// by one viewport (or a discarded session) never matches another.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

pub(super) fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Captured generation of a load request. Only the most recent ticket of a
/// viewport can install an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { width: u32, height: u32 },
    /// A newer load or a reset happened while this one was in flight.
    Stale,
    /// Decode failed or the image was unusable. State is unchanged.
    Rejected,
}

impl Viewport {
    /// Invalidate every outstanding load and hand out a ticket for a new one.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation = next_generation();
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Finish a load started with [`Viewport::begin_load`].
    ///
    /// Failures never touch the current image or transform.
    pub fn complete_load(&mut self, ticket: LoadTicket, decoded: Result<RgbaImage>) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale decode"
            );
            return LoadOutcome::Stale;
        }

        let image = match decoded.and_then(check_dimensions) {
            Ok(image) => image,
            Err(e) => {
                warn!("image load rejected: {e}");
                return LoadOutcome::Rejected;
            }
        };

        let (width, height) = image.dimensions();
        self.install(image);
        info!(
            width,
            height,
            base_scale = self.base_scale,
            "image loaded"
        );
        LoadOutcome::Loaded { width, height }
    }

    /// Decode and install in one step.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> LoadOutcome {
        let ticket = self.begin_load();
        self.complete_load(ticket, decode_image(bytes))
    }

    /// Install an already decoded image.
    pub fn load_decoded(&mut self, image: RgbaImage) -> LoadOutcome {
        let ticket = self.begin_load();
        self.complete_load(ticket, Ok(image))
    }
}

fn check_dimensions(image: RgbaImage) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(IdframeError::InvalidDimensions { width, height });
    }
    Ok(image)
}
