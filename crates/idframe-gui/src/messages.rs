use std::path::PathBuf;
use std::sync::Arc;

use idframe_core::config::WizardConfig;
use idframe_core::session::Slot;
use idframe_core::tasks::{CleanupDone, CleanupTask, DecodeDone, DecodeTask};
use image::RgbaImage;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Decode an upload for a slot.
    Decode(DecodeTask),

    /// Re-clean the retained raw signature at a new threshold.
    Cleanup(CleanupTask),

    /// Write the applied crops as PNG files into `dir`.
    SaveOutputs {
        dir: PathBuf,
        photo: Option<RgbaImage>,
        signature_raw: Option<Arc<RgbaImage>>,
        signature: Option<RgbaImage>,
    },
}

/// Results sent back to the UI thread, by the worker or a dialog thread.
pub enum WorkerResult {
    /// The user chose a file for a slot. The UI thread starts the load so
    /// that load tickets are issued in pick order.
    FilePicked {
        slot: Slot,
        path: PathBuf,
    },
    OutputDirPicked {
        dir: PathBuf,
    },
    ConfigImported {
        config: WizardConfig,
    },
    Decoded(DecodeDone),
    Cleaned(CleanupDone),
    Saved {
        paths: Vec<PathBuf>,
    },
    Error {
        message: String,
    },
    Log {
        message: String,
    },
}
