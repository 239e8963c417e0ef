use std::path::PathBuf;
use std::sync::mpsc;

use idframe_core::config::WizardConfig;
use idframe_core::session::{Session, SessionUpdate, Slot};
use idframe_core::tasks::DecodeSource;
use idframe_core::viewport::{LoadOutcome, ViewportEvent};
use image::RgbaImage;

use crate::convert::rgba_to_color_image;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::state::UIState;
use crate::worker;

pub struct IdframeApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    /// Handed to dialog threads so their picks arrive in the result queue.
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub config: WizardConfig,
    pub session: Session,
    pub ui_state: UIState,
}

impl IdframeApp {
    pub fn new(ctx: &egui::Context, config: WizardConfig) -> anyhow::Result<Self> {
        let session = Session::new(&config)?;
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = worker::spawn_worker(result_tx.clone(), ctx.clone());

        let ui_state = UIState {
            threshold: session.threshold().value() as i64,
            ..Default::default()
        };

        Ok(Self {
            cmd_tx,
            result_tx,
            result_rx,
            config,
            session,
            ui_state,
        })
    }

    /// Drain all pending results from the worker and dialog threads.
    fn poll_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::FilePicked { slot, path } => {
                    self.ui_state.view_mut(slot).file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned());
                    let task = self.session.begin_load(slot, DecodeSource::Path(path));
                    self.send_command(WorkerCommand::Decode(task));
                }
                WorkerResult::Decoded(done) => {
                    let slot = done.slot;
                    match self.session.complete_decode(done) {
                        LoadOutcome::Loaded { width, height } => {
                            self.ui_state.view_mut(slot).mark_dirty();
                            self.ui_state
                                .add_log(format!("Loaded {slot} image ({width}x{height})"));
                        }
                        LoadOutcome::Rejected => {
                            self.ui_state
                                .add_log(format!("Could not read the {slot} image"));
                        }
                        LoadOutcome::Stale => {}
                    }
                }
                WorkerResult::Cleaned(done) => {
                    self.ui_state.cleanups_in_flight =
                        self.ui_state.cleanups_in_flight.saturating_sub(1);
                    if self.session.complete_cleanup(done) {
                        self.ui_state.signature.preview_dirty = true;
                    }
                }
                WorkerResult::OutputDirPicked { dir } => self.save_outputs(dir),
                WorkerResult::ConfigImported { config } => self.apply_config(config),
                WorkerResult::Saved { paths } => {
                    for path in paths {
                        self.ui_state.add_log(format!("Saved: {}", path.display()));
                    }
                }
                WorkerResult::Error { message } => {
                    self.ui_state.add_log(format!("ERROR: {message}"));
                }
                WorkerResult::Log { message } => {
                    self.ui_state.add_log(message);
                }
            }
        }
    }

    /// Deliver an input event and flag whatever it invalidated.
    pub fn dispatch(&mut self, slot: Slot, event: ViewportEvent) {
        let update = self.session.dispatch(slot, event);
        self.apply_update(update);
    }

    pub fn reset_all(&mut self) {
        for update in self.session.reset_all() {
            self.apply_update(update);
        }
    }

    fn apply_update(&mut self, update: SessionUpdate) {
        match update {
            SessionUpdate::Nothing => {}
            SessionUpdate::Redraw(slot) => self.ui_state.view_mut(slot).canvas_dirty = true,
            SessionUpdate::Exported(slot) => {
                let view = self.ui_state.view_mut(slot);
                view.canvas_dirty = true;
                view.preview_dirty = true;
                self.ui_state.add_log(format!("Applied {slot} crop"));
            }
            SessionUpdate::Cleared(slot) => {
                let view = self.ui_state.view_mut(slot);
                view.mark_dirty();
                view.file_name = None;
            }
        }
    }

    /// Move the threshold slider. The re-clean runs on the worker; only the
    /// newest request is kept when results arrive.
    pub fn set_threshold(&mut self, value: i64) {
        self.ui_state.threshold = value;
        if let Some(task) = self.session.request_cleanup(value) {
            self.ui_state.cleanups_in_flight += 1;
            self.send_command(WorkerCommand::Cleanup(task));
        }
    }

    pub fn has_outputs(&self) -> bool {
        self.session.photo_crop().is_some() || self.session.signature().is_some()
    }

    fn save_outputs(&mut self, dir: PathBuf) {
        let signature = self.session.signature();
        self.send_command(WorkerCommand::SaveOutputs {
            dir,
            photo: self.session.photo_crop().cloned(),
            signature_raw: signature.map(|pair| pair.raw().clone()),
            signature: signature.map(|pair| pair.cleaned().clone()),
        });
    }

    fn apply_config(&mut self, config: WizardConfig) {
        match Session::new(&config) {
            Ok(session) => {
                self.session = session;
                self.config = config;
                self.ui_state.threshold = self.session.threshold().value() as i64;
                for slot in Slot::ALL {
                    let view = self.ui_state.view_mut(slot);
                    view.mark_dirty();
                    view.file_name = None;
                }
                self.ui_state.add_log("Config imported".into());
            }
            Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
        }
    }

    /// Rebuild textures flagged dirty since the last frame.
    fn refresh_textures(&mut self, ctx: &egui::Context) {
        for slot in Slot::ALL {
            if self.ui_state.view(slot).canvas_dirty {
                let surface = self.session.viewport(slot).render();
                let view = self.ui_state.view_mut(slot);
                view.canvas = surface.map(|s| load(ctx, &format!("{slot}_canvas"), &s));
                view.canvas_dirty = false;
            }
            if self.ui_state.view(slot).preview_dirty {
                let preview = match slot {
                    Slot::Photo => self.session.photo_crop(),
                    Slot::Signature => self.session.signature().map(|pair| pair.cleaned()),
                };
                let texture = preview.map(|img| load(ctx, &format!("{slot}_preview"), img));
                let view = self.ui_state.view_mut(slot);
                view.preview = texture;
                view.preview_dirty = false;
            }
        }
    }

    pub fn send_command(&self, cmd: WorkerCommand) {
        let _ = self.cmd_tx.send(cmd);
    }
}

fn load(ctx: &egui::Context, name: &str, image: &RgbaImage) -> egui::TextureHandle {
    ctx.load_texture(name, rgba_to_color_image(image), egui::TextureOptions::LINEAR)
}

impl eframe::App for IdframeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results();
        self.refresh_textures(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::slots::show(ctx, self);
        // input handled this frame may have invalidated textures
        if self.ui_state.photo.canvas_dirty || self.ui_state.signature.canvas_dirty {
            ctx.request_repaint();
        }

        if self.ui_state.show_about {
            egui::Window::new("About idframe")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("idframe");
                        ui.label("Photo and signature cropping");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.ui_state.show_about = false;
                        }
                    });
                });
        }
    }
}
