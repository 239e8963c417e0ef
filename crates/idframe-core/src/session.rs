use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info};

use crate::cleanup::{SignaturePair, Threshold};
use crate::config::WizardConfig;
use crate::error::Result;
use crate::image_io::encode_png;
use crate::tasks::{CleanupDone, CleanupTask, DecodeDone, DecodeSource, DecodeTask};
use crate::viewport::{EventOutcome, LoadOutcome, LoadTicket, Viewport, ViewportEvent};

/// The two image slots of a credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Photo,
    Signature,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Photo, Slot::Signature];
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Photo => write!(f, "photo"),
            Self::Signature => write!(f, "signature"),
        }
    }
}

/// What the caller should refresh after a dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionUpdate {
    Nothing,
    Redraw(Slot),
    Exported(Slot),
    Cleared(Slot),
}

/// Owns both viewports and the artefacts they produced.
///
/// All mutation goes through `&mut self`, so events for either slot are
/// applied strictly in the order they are delivered.
pub struct Session {
    photo: Viewport,
    signature: Viewport,
    photo_crop: Option<RgbaImage>,
    signature_pair: Option<SignaturePair>,
    threshold: Threshold,
    cleanup_request: u64,
}

impl Session {
    pub fn new(config: &WizardConfig) -> Result<Self> {
        Ok(Self {
            photo: Viewport::new(config.photo.clone())?,
            signature: Viewport::new(config.signature.clone())?,
            photo_crop: None,
            signature_pair: None,
            threshold: Threshold::new(config.cleanup.default_threshold),
            cleanup_request: 0,
        })
    }

    pub fn viewport(&self, slot: Slot) -> &Viewport {
        match slot {
            Slot::Photo => &self.photo,
            Slot::Signature => &self.signature,
        }
    }

    fn viewport_mut(&mut self, slot: Slot) -> &mut Viewport {
        match slot {
            Slot::Photo => &mut self.photo,
            Slot::Signature => &mut self.signature,
        }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn photo_crop(&self) -> Option<&RgbaImage> {
        self.photo_crop.as_ref()
    }

    pub fn signature(&self) -> Option<&SignaturePair> {
        self.signature_pair.as_ref()
    }

    /// Deliver one input event to a slot's viewport.
    pub fn dispatch(&mut self, slot: Slot, event: ViewportEvent) -> SessionUpdate {
        match self.viewport_mut(slot).handle(event) {
            EventOutcome::Ignored => SessionUpdate::Nothing,
            EventOutcome::Updated => SessionUpdate::Redraw(slot),
            EventOutcome::Exported(crop) => {
                self.store_export(slot, crop);
                SessionUpdate::Exported(slot)
            }
            EventOutcome::Cleared => {
                self.clear_artifacts(slot);
                SessionUpdate::Cleared(slot)
            }
        }
    }

    /// Start an asynchronous load; run the returned task anywhere and feed
    /// its result to [`Session::complete_decode`].
    pub fn begin_load(&mut self, slot: Slot, source: DecodeSource) -> DecodeTask {
        let ticket = self.viewport_mut(slot).begin_load();
        DecodeTask {
            slot,
            ticket,
            source,
        }
    }

    pub fn complete_decode(&mut self, done: DecodeDone) -> LoadOutcome {
        self.complete_load(done.slot, done.ticket, done.result)
    }

    pub fn complete_load(
        &mut self,
        slot: Slot,
        ticket: LoadTicket,
        decoded: Result<RgbaImage>,
    ) -> LoadOutcome {
        let outcome = self.viewport_mut(slot).complete_load(ticket, decoded);
        if matches!(outcome, LoadOutcome::Loaded { .. }) {
            self.clear_artifacts(slot);
        }
        outcome
    }

    /// Synchronous load from encoded bytes.
    pub fn load_bytes(&mut self, slot: Slot, bytes: Vec<u8>) -> LoadOutcome {
        let task = self.begin_load(slot, DecodeSource::Bytes(bytes));
        self.complete_decode(task.run())
    }

    /// Set the cleanup threshold and re-clean the retained raw signature.
    pub fn set_threshold(&mut self, value: i64) -> bool {
        let threshold = Threshold::clamped(value);
        self.threshold = threshold;
        // a synchronous re-tune supersedes anything in flight
        self.cleanup_request += 1;
        match self.signature_pair.as_mut() {
            Some(pair) => pair.retune(threshold),
            None => false,
        }
    }

    /// Asynchronous variant of [`Session::set_threshold`]. Returns a task
    /// when there is a signature to re-clean.
    pub fn request_cleanup(&mut self, value: i64) -> Option<CleanupTask> {
        self.threshold = Threshold::clamped(value);
        self.cleanup_request += 1;
        let pair = self.signature_pair.as_ref()?;
        Some(CleanupTask {
            request: self.cleanup_request,
            raw: Arc::clone(pair.raw()),
            threshold: self.threshold,
        })
    }

    /// Install a finished cleanup unless a newer request, export or reset
    /// superseded it. Returns whether it was applied.
    pub fn complete_cleanup(&mut self, done: CleanupDone) -> bool {
        if done.request != self.cleanup_request {
            debug!(
                request = done.request,
                current = self.cleanup_request,
                "discarding stale cleanup"
            );
            return false;
        }
        match self.signature_pair.as_mut() {
            Some(pair) if Arc::ptr_eq(pair.raw(), &done.raw) => {
                pair.set_cleaned(done.cleaned, done.threshold);
                true
            }
            _ => false,
        }
    }

    pub fn photo_png(&self) -> Result<Option<Vec<u8>>> {
        self.photo_crop.as_ref().map(encode_png).transpose()
    }

    pub fn signature_raw_png(&self) -> Result<Option<Vec<u8>>> {
        self.signature_pair
            .as_ref()
            .map(SignaturePair::raw_png)
            .transpose()
    }

    pub fn signature_png(&self) -> Result<Option<Vec<u8>>> {
        self.signature_pair
            .as_ref()
            .map(SignaturePair::cleaned_png)
            .transpose()
    }

    /// Reset both slots, returning what each one needs refreshed.
    pub fn reset_all(&mut self) -> [SessionUpdate; 2] {
        Slot::ALL.map(|slot| self.dispatch(slot, ViewportEvent::Reset))
    }

    fn store_export(&mut self, slot: Slot, crop: RgbaImage) {
        match slot {
            Slot::Photo => {
                info!("photo crop applied");
                self.photo_crop = Some(crop);
            }
            Slot::Signature => {
                self.cleanup_request += 1;
                self.signature_pair = Some(SignaturePair::new(crop, self.threshold));
                info!(threshold = self.threshold.value(), "signature crop applied");
            }
        }
    }

    fn clear_artifacts(&mut self, slot: Slot) {
        match slot {
            Slot::Photo => self.photo_crop = None,
            Slot::Signature => {
                self.cleanup_request += 1;
                self.signature_pair = None;
            }
        }
    }
}
