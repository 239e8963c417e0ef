use std::path::{Path, PathBuf};

use console::Style;
use idframe_core::cleanup::SignaturePair;
use idframe_core::config::SlotConfig;
use idframe_core::session::Slot;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    ok: Style,
    failed: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            ok: Style::new().green(),
            failed: Style::new().red().bold(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

/// Outcome of cropping one input file.
pub struct CropReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Exported size, or the error chain.
    pub result: Result<(u32, u32), String>,
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

pub fn print_crop_summary(slot: Slot, config: &SlotConfig, reports: &[CropReport]) {
    let s = Styles::new();
    print_title(&s, "idframe Crop");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Slot"),
        s.value.apply_to(slot)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Window"),
        s.value.apply_to(config)
    );
    println!();

    println!("  {}", s.header.apply_to("Files"));
    for report in reports {
        match &report.result {
            Ok((w, h)) => println!(
                "    {} {} {} {}",
                s.ok.apply_to("\u{2713}"),
                s.path.apply_to(report.input.display()),
                s.label.apply_to("\u{2192}"),
                s.value
                    .apply_to(format!("{} ({w}x{h})", report.output.display()))
            ),
            Err(e) => println!(
                "    {} {} {}",
                s.failed.apply_to("\u{2717}"),
                s.path.apply_to(report.input.display()),
                s.failed.apply_to(e)
            ),
        }
    }
    println!();

    let ok = reports.iter().filter(|r| r.result.is_ok()).count();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Exported"),
        s.value.apply_to(format!("{ok}/{}", reports.len()))
    );
    println!();
}

pub fn print_signature_summary(
    input: &Path,
    pair: &SignaturePair,
    output: &Path,
    raw_output: Option<&Path>,
) {
    let s = Styles::new();
    print_title(&s, "idframe Signature");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    let (w, h) = pair.cleaned().dimensions();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!("{w}x{h}"))
    );
    if pair.threshold().removes_background() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Threshold"),
            s.value.apply_to(pair.threshold())
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Threshold"),
            s.disabled.apply_to("0 (background kept)")
        );
    }

    let transparent = pair.cleaned().pixels().filter(|p| p.0[3] == 0).count();
    let total = (w as usize * h as usize).max(1);
    println!(
        "  {:<14}{}",
        s.label.apply_to("Removed"),
        s.value
            .apply_to(format!("{:.1}%", transparent as f64 * 100.0 / total as f64))
    );
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Cleaned"),
        s.path.apply_to(output.display())
    );
    match raw_output {
        Some(path) => println!(
            "  {:<14}{}",
            s.label.apply_to("Raw"),
            s.path.apply_to(path.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Raw"),
            s.disabled.apply_to("not saved")
        ),
    }
    println!();
}
