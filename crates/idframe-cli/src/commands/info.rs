use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use idframe_core::config::WizardConfig;
use idframe_core::image_io::{decode_image, probe_image};
use idframe_core::session::Slot;
use idframe_core::viewport::Viewport;

use super::slot_config;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs, config: &WizardConfig) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let info = probe_image(&bytes)
        .with_context(|| format!("Unsupported image {}", args.file.display()))?;

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Color type:  {:?}", info.color);
    match info.format {
        Some(format) => println!("Format:      {:?}", format),
        None => println!("Format:      unknown"),
    }
    println!(
        "File size:   {:.1} KB",
        bytes.len() as f64 / 1024.0
    );

    let rgba = decode_image(&bytes)?;
    for slot in Slot::ALL {
        let mut viewport = Viewport::new(slot_config(config, slot).clone())?;
        viewport.load_decoded(rgba.clone());
        let Some(rect) = viewport.source_rect() else {
            continue;
        };
        println!();
        println!("{}:", slot);
        println!("  Window:      {}", viewport.config());
        println!("  Cover scale: {:.4}", viewport.base_scale());
        println!(
            "  Visible:     {:.0}x{:.0} at ({:.0}, {:.0})",
            rect.width, rect.height, rect.x, rect.y
        );
    }

    Ok(())
}
