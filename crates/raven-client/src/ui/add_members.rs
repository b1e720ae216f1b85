use eframe::egui;
use std::sync::Arc;
use tokio::runtime::Handle;

use raven_protocol::AddChannelMember;

use crate::network::MessageBackend;
use crate::state::Notifications;
use crate::tasks::TaskScope;

use super::actions_palette::DataChangedCallback;
use super::theme;

/// Split user ids typed as a comma or whitespace separated list
pub fn parse_user_ids(input: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if !id.is_empty() && !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

/// Dialog adding users to the current channel
pub struct AddMembersDialog {
    is_open: bool,
    user_ids: String,
    backend: Arc<dyn MessageBackend>,
    notifications: Notifications,
    tasks: TaskScope,
}

impl AddMembersDialog {
    pub fn new(backend: Arc<dyn MessageBackend>, notifications: Notifications, runtime: Handle) -> Self {
        Self {
            is_open: false,
            user_ids: String::new(),
            backend,
            notifications,
            tasks: TaskScope::new(runtime),
        }
    }

    pub fn open(&mut self) {
        self.is_open = true;
        self.user_ids.clear();
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Send one membership request per user id; `on_added` runs after each success
    pub fn submit(&mut self, channel_id: &str, on_added: DataChangedCallback) -> usize {
        let ids = parse_user_ids(&self.user_ids);

        for user_id in &ids {
            let request = AddChannelMember {
                channel_id: channel_id.to_string(),
                user_id: user_id.clone(),
            };
            let backend = self.backend.clone();
            let notifications = self.notifications.clone();
            let on_added = on_added.clone();

            self.tasks.spawn(async move {
                let user_id = request.user_id.clone();
                match backend.add_channel_member(request).await {
                    Ok(()) => {
                        notifications.info(format!("Added {}", user_id));
                        on_added();
                    }
                    Err(e) => {
                        tracing::warn!("Failed to add {} to channel: {}", user_id, e);
                        notifications.error(format!("Could not add {}: {}", user_id, e));
                    }
                }
            });
        }

        if !ids.is_empty() {
            self.is_open = false;
            self.user_ids.clear();
        }
        ids.len()
    }

    pub fn show(&mut self, ctx: &egui::Context, channel_id: &str, on_added: DataChangedCallback) {
        if !self.is_open {
            return;
        }

        let mut submit = false;
        let mut cancel = false;

        egui::Window::new("Add members")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("User IDs (comma separated):");
                let response = ui.text_edit_singleline(&mut self.user_ids);
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }

                ui.label(
                    egui::RichText::new("Members can read and post in this channel.")
                        .small()
                        .color(theme::TEXT_MUTED),
                );

                ui.horizontal(|ui| {
                    let has_ids = !parse_user_ids(&self.user_ids).is_empty();
                    if ui.add_enabled(has_ids, egui::Button::new("Add")).clicked() {
                        submit = true;
                    }

                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if submit {
            self.submit(channel_id, on_added);
        } else if cancel {
            self.is_open = false;
            self.user_ids.clear();
        }
    }
}
