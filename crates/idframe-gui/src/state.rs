use idframe_core::session::Slot;

/// Textures shown for one slot. Dirty flags mark textures that no longer
/// match the session and must be rebuilt before the next paint.
#[derive(Default)]
pub struct SlotView {
    pub canvas: Option<egui::TextureHandle>,
    pub canvas_dirty: bool,
    /// The applied crop (cleaned, for the signature).
    pub preview: Option<egui::TextureHandle>,
    pub preview_dirty: bool,
    pub file_name: Option<String>,
}

impl SlotView {
    pub fn mark_dirty(&mut self) {
        self.canvas_dirty = true;
        self.preview_dirty = true;
    }
}

/// Overall UI state.
#[derive(Default)]
pub struct UIState {
    pub photo: SlotView,
    pub signature: SlotView,

    /// Threshold slider position; may run ahead of the applied cleanup.
    pub threshold: i64,

    /// Cleanup requests sent to the worker and not yet answered.
    pub cleanups_in_flight: usize,

    /// Log messages.
    pub log_messages: Vec<String>,

    pub show_about: bool,
}

impl UIState {
    pub fn view(&self, slot: Slot) -> &SlotView {
        match slot {
            Slot::Photo => &self.photo,
            Slot::Signature => &self.signature,
        }
    }

    pub fn view_mut(&mut self, slot: Slot) -> &mut SlotView {
        match slot {
            Slot::Photo => &mut self.photo,
            Slot::Signature => &mut self.signature,
        }
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }
}
