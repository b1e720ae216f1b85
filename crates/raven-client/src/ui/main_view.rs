use eframe::egui;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::state::{AppState, UiState};

use super::actions_palette::{DataChangedCallback, PaletteContext};
use super::add_members::AddMembersDialog;
use super::avatars::AvatarCache;
use super::chat::ChatView;
use super::member_list::MemberList;
use super::members_button::{MembersButtonEvent, ViewOrAddMembersButton};
use super::theme;

/// Data the view asks the app to reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Messages,
    Members,
}

fn refresh_callback(tx: &mpsc::UnboundedSender<Refresh>, refresh: Refresh) -> DataChangedCallback {
    let tx = tx.clone();
    Arc::new(move || {
        let _ = tx.send(refresh);
    })
}

pub struct MainView {
    chat_view: ChatView,
    member_list: MemberList,
    add_members: AddMembersDialog,
    avatars: AvatarCache,
    refresh_tx: mpsc::UnboundedSender<Refresh>,
    refresh_rx: mpsc::UnboundedReceiver<Refresh>,
}

impl MainView {
    pub fn new(palette_ctx: PaletteContext, avatars: AvatarCache) -> Self {
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let add_members = AddMembersDialog::new(
            palette_ctx.backend.clone(),
            palette_ctx.notifications.clone(),
            palette_ctx.runtime.clone(),
        );

        Self {
            chat_view: ChatView::new(palette_ctx, refresh_callback(&refresh_tx, Refresh::Messages)),
            member_list: MemberList::new(),
            add_members,
            avatars,
            refresh_tx,
            refresh_rx,
        }
    }

    /// Refresh requests posted by background tasks since the last frame
    pub fn drain_refreshes(&mut self) -> Vec<Refresh> {
        let mut refreshes = Vec::new();
        while let Ok(refresh) = self.refresh_rx.try_recv() {
            if !refreshes.contains(&refresh) {
                refreshes.push(refresh);
            }
        }
        refreshes
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        state: &AppState,
        ui_state: &mut UiState,
        runtime: &tokio::runtime::Runtime,
    ) {
        let (channel_id, messages, is_loading, connection_error, active_users, channel_ctx) =
            runtime.block_on(async {
                let s = state.read().await;
                (
                    s.current_channel_id.clone(),
                    s.messages.clone(),
                    s.is_loading,
                    s.connection_error.clone(),
                    s.active_users.clone(),
                    s.channel_context(),
                )
            });

        let Some(channel_id) = channel_id else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label("No channel selected. Set channel_id in raven.toml");
                });
            });
            return;
        };

        let channel_name = channel_ctx
            .channel_data
            .as_ref()
            .map(|c| c.channel_name.clone())
            .unwrap_or_else(|| channel_id.clone());

        // Channel header
        egui::TopBottomPanel::top("channel_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(format!("# {}", channel_name));
                if let Some(description) = channel_ctx.channel_data.as_ref().and_then(|c| c.channel_description.as_deref()) {
                    ui.label(egui::RichText::new(description).small().color(theme::TEXT_MUTED));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match ViewOrAddMembersButton::show(ui, &channel_ctx, &active_users, &mut self.avatars) {
                        Some(MembersButtonEvent::ViewMembers) => {
                            ui_state.members_panel_open = !ui_state.members_panel_open;
                            ui_state.save();
                        }
                        Some(MembersButtonEvent::AddMembers) => self.add_members.open(),
                        None => {}
                    }
                });
            });
        });

        // Right panel - Channel members
        if ui_state.members_panel_open {
            egui::SidePanel::right("members_panel")
                .min_width(200.0)
                .max_width(300.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        if self.member_list.show(ui, &channel_ctx, &active_users, &mut self.avatars) {
                            ui_state.members_panel_open = false;
                            ui_state.save();
                        }
                    });
                });
        }

        // Main chat area
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chat_view
                .show(ui, &channel_id, &messages, is_loading, connection_error.as_deref());
        });

        self.add_members
            .show(ctx, &channel_id, refresh_callback(&self.refresh_tx, Refresh::Members));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::network::testing::RecordingBackend;
    use crate::network::NetworkClient;
    use crate::state::Notifications;
    use tokio::runtime::Handle;

    #[tokio::test]
    async fn test_refreshes_are_deduplicated() {
        let (backend, _calls) = RecordingBackend::new();
        let mut view = MainView::new(PaletteContext {
            current_user: "u1".to_string(),
            backend,
            notifications: Notifications::new(),
            runtime: Handle::current(),
            server_url: "http://localhost:8000".to_string(),
        }, AvatarCache::new(NetworkClient::new(&ClientConfig::default()), Handle::current()));

        let messages = refresh_callback(&view.refresh_tx, Refresh::Messages);
        let members = refresh_callback(&view.refresh_tx, Refresh::Members);
        messages();
        members();
        messages();

        assert_eq!(view.drain_refreshes(), vec![Refresh::Messages, Refresh::Members]);
        assert!(view.drain_refreshes().is_empty());
    }
}
