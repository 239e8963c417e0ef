use std::path::{Path, PathBuf};
use std::sync::mpsc;

use idframe_core::image_io::save_png;
use image::RgbaImage;

use crate::messages::{WorkerCommand, WorkerResult};

/// Spawn the worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> mpsc::Sender<WorkerCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("idframe-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })
        .expect("Failed to spawn worker thread");

    cmd_tx
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn send_error(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, msg: impl Into<String>) {
    send(
        tx,
        ctx,
        WorkerResult::Error {
            message: msg.into(),
        },
    );
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::Decode(task) => {
                send(&tx, &ctx, WorkerResult::Decoded(task.run()));
            }
            WorkerCommand::Cleanup(task) => {
                send(&tx, &ctx, WorkerResult::Cleaned(task.run()));
            }
            WorkerCommand::SaveOutputs {
                dir,
                photo,
                signature_raw,
                signature,
            } => {
                let outputs = [
                    ("photo.png", photo.as_ref()),
                    ("signature_raw.png", signature_raw.as_deref()),
                    ("signature.png", signature.as_ref()),
                ];
                match save_outputs(&dir, &outputs) {
                    Ok(paths) => send(&tx, &ctx, WorkerResult::Saved { paths }),
                    Err(e) => send_error(&tx, &ctx, format!("Save failed: {e}")),
                }
            }
        }
    }
}

fn save_outputs(
    dir: &Path,
    outputs: &[(&str, Option<&RgbaImage>)],
) -> idframe_core::error::Result<Vec<PathBuf>> {
    let mut saved = Vec::new();
    for (name, image) in outputs {
        if let Some(image) = image {
            let path = dir.join(name);
            save_png(image, &path)?;
            saved.push(path);
        }
    }
    Ok(saved)
}
