//! Self-contained units of work that may run off the interaction thread.
//!
//! Each task owns immutable inputs and returns a new result; completions are
//! routed back to the [`Session`](crate::session::Session), which discards
//! any that were superseded while in flight.

use std::path::PathBuf;
use std::sync::Arc;

use image::RgbaImage;
use tracing::debug;

use crate::cleanup::{cleanup, Threshold};
use crate::error::Result;
use crate::image_io::{decode_image, load_image};
use crate::session::Slot;
use crate::viewport::LoadTicket;

/// Where the bytes of an upload come from.
#[derive(Clone, Debug)]
pub enum DecodeSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

pub struct DecodeTask {
    pub slot: Slot,
    pub ticket: LoadTicket,
    pub source: DecodeSource,
}

pub struct DecodeDone {
    pub slot: Slot,
    pub ticket: LoadTicket,
    pub result: Result<RgbaImage>,
}

impl DecodeTask {
    pub fn run(self) -> DecodeDone {
        debug!(slot = %self.slot, generation = self.ticket.generation(), "decoding");
        let result = match &self.source {
            DecodeSource::Bytes(bytes) => decode_image(bytes),
            DecodeSource::Path(path) => load_image(path),
        };
        DecodeDone {
            slot: self.slot,
            ticket: self.ticket,
            result,
        }
    }
}

pub struct CleanupTask {
    pub request: u64,
    pub raw: Arc<RgbaImage>,
    pub threshold: Threshold,
}

pub struct CleanupDone {
    pub request: u64,
    pub raw: Arc<RgbaImage>,
    pub threshold: Threshold,
    pub cleaned: RgbaImage,
}

impl CleanupTask {
    pub fn run(self) -> CleanupDone {
        let cleaned = cleanup(&self.raw, self.threshold);
        CleanupDone {
            request: self.request,
            raw: self.raw,
            threshold: self.threshold,
            cleaned,
        }
    }
}
