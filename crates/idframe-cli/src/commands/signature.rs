use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use idframe_core::config::WizardConfig;
use idframe_core::error::IdframeError;
use idframe_core::image_io::{encode_png, png_data_url, save_png};
use idframe_core::session::{Session, Slot};
use idframe_core::viewport::{LoadOutcome, ViewportEvent};

use super::TransformArgs;
use crate::summary::print_signature_summary;

#[derive(Args)]
pub struct SignatureArgs {
    /// Scanned or photographed signature
    pub file: PathBuf,

    /// Brightness at or above which pixels become transparent (0 keeps all)
    #[arg(long)]
    pub threshold: Option<i64>,

    #[command(flatten)]
    pub transform: TransformArgs,

    /// Also save the uncleaned crop here
    #[arg(long)]
    pub raw_output: Option<PathBuf>,

    /// Cleaned signature output path
    #[arg(short, long, default_value = "signature.png")]
    pub output: PathBuf,

    /// Print the cleaned PNG as a data: URL for embedding in templates
    #[arg(long)]
    pub data_url: bool,
}

pub fn run(args: &SignatureArgs, config: &WizardConfig) -> Result<()> {
    let mut session = Session::new(config)?;

    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    if let LoadOutcome::Rejected = session.load_bytes(Slot::Signature, bytes) {
        bail!("{} is not a usable image", args.file.display());
    }

    if let Some(threshold) = args.threshold {
        session.set_threshold(threshold);
    }
    for event in args.transform.events(&config.signature) {
        session.dispatch(Slot::Signature, event);
    }
    session.dispatch(Slot::Signature, ViewportEvent::Apply);

    let pair = session.signature().ok_or(IdframeError::NoImage)?;

    save_png(pair.cleaned(), &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    if let Some(ref raw_path) = args.raw_output {
        save_png(pair.raw(), raw_path)
            .with_context(|| format!("Failed to write {}", raw_path.display()))?;
    }

    if args.data_url {
        println!("{}", png_data_url(&encode_png(pair.cleaned())?));
        return Ok(());
    }

    print_signature_summary(&args.file, pair, &args.output, args.raw_output.as_deref());
    Ok(())
}
