use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use idframe_core::config::{SlotConfig, WizardConfig};
use idframe_core::error::IdframeError;
use idframe_core::image_io::{decode_image, save_png};
use idframe_core::session::Slot;
use idframe_core::viewport::{EventOutcome, LoadOutcome, Viewport, ViewportEvent};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use super::{slot_config, SlotArg, TransformArgs};
use crate::summary::{print_crop_summary, CropReport};

#[derive(Args)]
pub struct CropArgs {
    /// Input image files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Which slot's crop window to use
    #[arg(long, value_enum, default_value = "photo")]
    pub slot: SlotArg,

    #[command(flatten)]
    pub transform: TransformArgs,

    /// Directory for the exported PNGs
    #[arg(short = 'o', long, default_value = ".")]
    pub output_dir: PathBuf,
}

pub fn run(args: &CropArgs, config: &WizardConfig) -> Result<()> {
    let slot = Slot::from(args.slot);
    let slot_config = slot_config(config, slot);

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output dir {}", args.output_dir.display())
    })?;

    let pb = ProgressBar::new(args.files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Cropping [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let reports: Vec<CropReport> = args
        .files
        .par_iter()
        .map(|file| {
            let output = output_path(&args.output_dir, file, slot);
            let result = crop_file(file, &output, slot_config, &args.transform);
            pb.inc(1);
            CropReport {
                input: file.clone(),
                output,
                result: result.map_err(|e| format!("{e:#}")),
            }
        })
        .collect();
    pb.finish_and_clear();

    print_crop_summary(slot, slot_config, &reports);

    let failed = reports.iter().filter(|r| r.result.is_err()).count();
    if failed > 0 {
        bail!("{failed} of {} file(s) failed", reports.len());
    }
    Ok(())
}

/// Load, transform and export one file. Returns the exported size.
fn crop_file(
    file: &Path,
    output: &Path,
    slot: &SlotConfig,
    transform: &TransformArgs,
) -> Result<(u32, u32)> {
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let image = decode_image(&bytes).with_context(|| format!("Failed to decode {}", file.display()))?;

    let mut viewport = Viewport::new(slot.clone())?;
    if !matches!(viewport.load_decoded(image), LoadOutcome::Loaded { .. }) {
        bail!("{} could not be loaded", file.display());
    }
    for event in transform.events(slot) {
        viewport.handle(event);
    }

    let EventOutcome::Exported(crop) = viewport.handle(ViewportEvent::Apply) else {
        return Err(IdframeError::NoImage.into());
    };
    save_png(&crop, output).with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(crop.dimensions())
}

fn output_path(dir: &Path, input: &Path, slot: Slot) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    dir.join(format!("{stem}_{slot}.png"))
}
