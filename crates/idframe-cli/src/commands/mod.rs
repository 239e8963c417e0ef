pub mod config;
pub mod crop;
pub mod info;
pub mod signature;

use clap::{Args, ValueEnum};
use idframe_core::config::{SlotConfig, WizardConfig};
use idframe_core::session::Slot;
use idframe_core::viewport::ViewportEvent;

#[derive(Clone, Copy, ValueEnum)]
pub enum SlotArg {
    Photo,
    Signature,
}

impl From<SlotArg> for Slot {
    fn from(arg: SlotArg) -> Self {
        match arg {
            SlotArg::Photo => Slot::Photo,
            SlotArg::Signature => Slot::Signature,
        }
    }
}

pub fn slot_config(config: &WizardConfig, slot: Slot) -> &SlotConfig {
    match slot {
        Slot::Photo => &config.photo,
        Slot::Signature => &config.signature,
    }
}

/// Zoom and pan applied before export, as a user would in the wizard.
#[derive(Args, Clone)]
pub struct TransformArgs {
    /// Zoom multiplier on top of the cover fit (clamped to the slot range)
    #[arg(long, default_value = "1.0")]
    pub zoom: f64,

    /// Drag distance in canvas pixels, e.g. "-40,12"
    #[arg(long, value_parser = parse_pan, allow_hyphen_values = true)]
    pub pan: Option<(f64, f64)>,
}

impl TransformArgs {
    /// The interaction as viewport events: set the zoom, then drag from
    /// the canvas centre by the requested distance.
    pub fn events(&self, slot: &SlotConfig) -> Vec<ViewportEvent> {
        let mut events = vec![ViewportEvent::SetZoom(self.zoom)];
        if let Some((dx, dy)) = self.pan {
            let cx = slot.canvas_width as f64 / 2.0;
            let cy = slot.canvas_height as f64 / 2.0;
            events.push(ViewportEvent::PointerDown { x: cx, y: cy });
            events.push(ViewportEvent::PointerMove {
                x: cx + dx,
                y: cy + dy,
            });
            events.push(ViewportEvent::PointerUp);
        }
        events
    }
}

fn parse_pan(s: &str) -> Result<(f64, f64), String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid pan component '{v}': {e}"))
    };
    Ok((parse(dx)?, parse(dy)?))
}
