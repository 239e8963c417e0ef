use image::RgbaImage;

use super::{Viewport, ViewportPhase};
use crate::export::export_crop;

/// Input delivered to a viewport, in canvas pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    /// Wheel scroll; only the sign matters.
    Wheel { delta_y: f64 },
    /// Zoom slider value.
    SetZoom(f64),
    Apply,
    Reset,
}

#[derive(Debug)]
pub enum EventOutcome {
    /// Nothing changed.
    Ignored,
    /// Transform or interaction state changed; re-render.
    Updated,
    /// Apply produced a fresh crop.
    Exported(RgbaImage),
    /// The viewport was reset to `NoImage`.
    Cleared,
}

impl Viewport {
    /// Apply one input event. Events must be fed in arrival order.
    pub fn handle(&mut self, event: ViewportEvent) -> EventOutcome {
        match event {
            ViewportEvent::PointerDown { x, y } => {
                if self.begin_drag(x, y) {
                    EventOutcome::Updated
                } else {
                    EventOutcome::Ignored
                }
            }
            ViewportEvent::PointerMove { x, y } => {
                if self.is_dragging() {
                    self.drag_to(x, y);
                    EventOutcome::Updated
                } else {
                    EventOutcome::Ignored
                }
            }
            ViewportEvent::PointerUp | ViewportEvent::PointerLeave => {
                if self.is_dragging() {
                    self.end_drag();
                    EventOutcome::Updated
                } else {
                    EventOutcome::Ignored
                }
            }
            ViewportEvent::Wheel { delta_y } => self.changed(|vp| vp.on_wheel(delta_y)),
            ViewportEvent::SetZoom(value) => self.changed(|vp| vp.set_zoom(value)),
            ViewportEvent::Apply => match export_crop(self) {
                Some(crop) => {
                    self.mark_applied();
                    EventOutcome::Exported(crop)
                }
                None => EventOutcome::Ignored,
            },
            ViewportEvent::Reset => {
                let had_image = self.phase != ViewportPhase::NoImage;
                // always bumps the generation so in-flight loads are dropped
                self.reset();
                if had_image {
                    EventOutcome::Cleared
                } else {
                    EventOutcome::Ignored
                }
            }
        }
    }

    fn changed(&mut self, f: impl FnOnce(&mut Self)) -> EventOutcome {
        let before = (self.user_scale, self.offset);
        f(self);
        if before == (self.user_scale, self.offset) {
            EventOutcome::Ignored
        } else {
            EventOutcome::Updated
        }
    }
}
