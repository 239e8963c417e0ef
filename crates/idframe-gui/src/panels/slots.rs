use idframe_core::cleanup::Threshold;
use idframe_core::session::Slot;
use idframe_core::viewport::{ViewportEvent, ViewportPhase};

use super::menu_bar::open_file;
use super::section_header;
use crate::app::IdframeApp;

const PREVIEW_WIDTH: f32 = 240.0;

pub fn show(ctx: &egui::Context, app: &mut IdframeApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::both().show(ui, |ui| {
            ui.columns(2, |columns| {
                slot_column(&mut columns[0], app, Slot::Photo);
                slot_column(&mut columns[1], app, Slot::Signature);
            });
        });
    });
}

fn slot_column(ui: &mut egui::Ui, app: &mut IdframeApp, slot: Slot) {
    let title = match slot {
        Slot::Photo => "Photo",
        Slot::Signature => "Signature",
    };
    let status = match app.session.viewport(slot).phase() {
        ViewportPhase::NoImage => None,
        ViewportPhase::Applied => Some("applied"),
        _ => app.ui_state.view(slot).file_name.as_deref(),
    };
    section_header(ui, title, status);

    canvas(ui, app, slot);
    ui.add_space(4.0);
    zoom_slider(ui, app, slot);

    ui.horizontal(|ui| {
        if ui.button("Open...").clicked() {
            open_file(app, slot);
        }
        let has_image = app.session.viewport(slot).has_image();
        if ui.add_enabled(has_image, egui::Button::new("Apply")).clicked() {
            app.dispatch(slot, ViewportEvent::Apply);
        }
        if ui.add_enabled(has_image, egui::Button::new("Reset")).clicked() {
            app.dispatch(slot, ViewportEvent::Reset);
        }
    });

    if slot == Slot::Signature {
        ui.add_space(4.0);
        threshold_slider(ui, app);
    }

    ui.add_space(8.0);
    preview(ui, app, slot);
}

/// The crop window. Pointer input is translated to canvas pixel coordinates
/// and fed to the slot's viewport in arrival order.
fn canvas(ui: &mut egui::Ui, app: &mut IdframeApp, slot: Slot) {
    let (cw, ch) = app.session.viewport(slot).canvas_size();
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(cw as f32, ch as f32), egui::Sense::click_and_drag());

    let to_canvas = |pos: egui::Pos2| {
        let local = pos - rect.min;
        (local.x as f64, local.y as f64)
    };

    if response.drag_started_by(egui::PointerButton::Primary) {
        if let Some(pos) = response.interact_pointer_pos() {
            let (x, y) = to_canvas(pos);
            app.dispatch(slot, ViewportEvent::PointerDown { x, y });
        }
    }
    if app.session.viewport(slot).is_dragging() {
        match ui.input(|i| i.pointer.latest_pos()) {
            Some(pos) if rect.contains(pos) => {
                if response.dragged() {
                    let (x, y) = to_canvas(pos);
                    app.dispatch(slot, ViewportEvent::PointerMove { x, y });
                }
            }
            _ => app.dispatch(slot, ViewportEvent::PointerLeave),
        }
        if response.drag_stopped() {
            app.dispatch(slot, ViewportEvent::PointerUp);
        }
    }

    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            // egui: wheel-up is positive. Viewport: negative zooms in.
            app.dispatch(
                slot,
                ViewportEvent::Wheel {
                    delta_y: -scroll as f64,
                },
            );
        }
    }

    let painter = ui.painter_at(rect);
    match &app.ui_state.view(slot).canvas {
        Some(texture) if app.session.viewport(slot).has_image() => {
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        _ => {
            painter.rect_filled(rect, 0.0, egui::Color32::from_gray(30));
            painter.rect_stroke(
                rect.shrink(1.0),
                0.0,
                egui::Stroke::new(2.0, egui::Color32::from_gray(0x2c)),
                egui::StrokeKind::Inside,
            );
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Open an image to begin",
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(100),
            );
        }
    }

    let hover = if app.session.viewport(slot).is_dragging() {
        egui::CursorIcon::Grabbing
    } else {
        egui::CursorIcon::Grab
    };
    if app.session.viewport(slot).has_image() {
        response.on_hover_cursor(hover);
    }
}

fn zoom_slider(ui: &mut egui::Ui, app: &mut IdframeApp, slot: Slot) {
    let viewport = app.session.viewport(slot);
    let zoom = viewport.config().zoom.clone();
    let mut value = viewport.user_scale();
    let enabled = viewport.has_image();

    let response = ui.add_enabled(
        enabled,
        egui::Slider::new(&mut value, zoom.min..=zoom.max)
            .step_by(zoom.step)
            .text("Zoom"),
    );
    if response.changed() {
        app.dispatch(slot, ViewportEvent::SetZoom(value));
    }
}

fn threshold_slider(ui: &mut egui::Ui, app: &mut IdframeApp) {
    let mut value = app.ui_state.threshold;
    let response = ui
        .add(
            egui::Slider::new(
                &mut value,
                Threshold::MIN.value() as i64..=Threshold::MAX.value() as i64,
            )
            .text("Background threshold"),
        )
        .on_hover_text("Pixels at least this bright become transparent. 0 keeps the background.");
    if response.changed() {
        app.set_threshold(value);
    }
}

fn preview(ui: &mut egui::Ui, app: &IdframeApp, slot: Slot) {
    let Some(texture) = &app.ui_state.view(slot).preview else {
        ui.weak("Apply to produce the output image");
        return;
    };
    let [w, h] = texture.size();
    let size = egui::vec2(PREVIEW_WIDTH, PREVIEW_WIDTH * h as f32 / w.max(1) as f32);
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    if slot == Slot::Signature {
        paint_checkerboard(ui, rect);
    }
    ui.painter().image(
        texture.id(),
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

/// Backdrop that makes keyed-out background visible.
fn paint_checkerboard(ui: &egui::Ui, rect: egui::Rect) {
    const CELL: f32 = 8.0;
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(200));
    let cols = (rect.width() / CELL).ceil() as usize;
    let rows = (rect.height() / CELL).ceil() as usize;
    for row in 0..rows {
        for col in (row % 2..cols).step_by(2) {
            let min = rect.min + egui::vec2(col as f32 * CELL, row as f32 * CELL);
            painter.rect_filled(
                egui::Rect::from_min_size(min, egui::vec2(CELL, CELL)),
                0.0,
                egui::Color32::from_gray(240),
            );
        }
    }
}
