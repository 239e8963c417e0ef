use idframe_core::session::Slot;
use idframe_core::viewport::ViewportPhase;

use crate::app::IdframeApp;

pub fn show(ctx: &egui::Context, app: &mut IdframeApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area, fixed height for 4 lines, scrollable.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        ui.horizontal(|ui| {
            for slot in Slot::ALL {
                let viewport = app.session.viewport(slot);
                let phase = match viewport.phase() {
                    ViewportPhase::NoImage => "empty",
                    ViewportPhase::Loaded => "editing",
                    ViewportPhase::Dragging => "dragging",
                    ViewportPhase::Applied => "applied",
                };
                ui.label(format!(
                    "{slot}: {phase}, zoom {:.0}%",
                    viewport.user_scale() * 100.0
                ));
                ui.separator();
            }
            ui.label(format!("Threshold: {}", app.session.threshold()));
            if app.ui_state.cleanups_in_flight > 0 {
                ui.separator();
                ui.spinner();
            }
        });

        ui.add_space(2.0);
    });
}
