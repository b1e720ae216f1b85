//! Confirmation and editing dialogs opened from a message's action palette

use eframe::egui;

use super::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteModalEvent {
    Confirm,
    Cancel,
}

/// Asks before deleting a message
#[derive(Default)]
pub struct DeleteMessageModal;

impl DeleteMessageModal {
    pub fn show(&mut self, ctx: &egui::Context, id: egui::Id) -> Option<DeleteModalEvent> {
        let mut event = None;

        egui::Window::new("Delete message")
            .id(id)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("Are you sure you want to delete this message?");
                ui.label(
                    egui::RichText::new("It will be deleted for all users.")
                        .small()
                        .color(theme::TEXT_MUTED),
                );
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        event = Some(DeleteModalEvent::Cancel);
                    }
                    let delete = egui::Button::new(egui::RichText::new("Delete").color(egui::Color32::WHITE))
                        .fill(theme::RED);
                    if ui.add(delete).clicked() {
                        event = Some(DeleteModalEvent::Confirm);
                    }
                });
            });

        if event.is_none() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            event = Some(DeleteModalEvent::Cancel);
        }

        event
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditModalEvent {
    Save(String),
    Cancel,
}

/// Edits the text of a message, starting from its current text
#[derive(Default)]
pub struct EditMessageModal {
    original_text: String,
    draft: String,
}

impl EditMessageModal {
    pub fn open(&mut self, original_text: &str) {
        self.original_text = original_text.to_string();
        self.draft = original_text.to_string();
    }

    /// Saving is allowed once the draft is non-blank and differs from the original
    pub fn can_save(&self) -> bool {
        !self.draft.trim().is_empty() && self.draft.trim() != self.original_text.trim()
    }

    pub fn show(&mut self, ctx: &egui::Context, id: egui::Id) -> Option<EditModalEvent> {
        let mut event = None;
        let can_save = self.can_save();

        egui::Window::new("Edit message")
            .id(id)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.draft)
                        .desired_rows(4)
                        .desired_width(360.0),
                );
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        event = Some(EditModalEvent::Cancel);
                    }
                    if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
                        event = Some(EditModalEvent::Save(self.draft.trim().to_string()));
                    }
                });
            });

        if event.is_none() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            event = Some(EditModalEvent::Cancel);
        }

        event
    }
}
