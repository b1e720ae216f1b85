use eframe::egui;
use raven_protocol::ChannelMember;

use crate::state::ChannelContext;
use super::avatars::{paint_avatar, AvatarCache};
use super::members_button::initials;
use super::theme;

/// Side panel listing channel members, online first
pub struct MemberList;

impl MemberList {
    pub fn new() -> Self {
        Self
    }

    /// Returns true when the user closed the panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &ChannelContext,
        active_users: &[String],
        avatars: &mut AvatarCache,
    ) -> bool {
        let mut close = false;

        let mut members: Vec<&ChannelMember> = ctx.channel_members.values().collect();
        members.sort_by(|a, b| a.display_name().cmp(b.display_name()));

        let (online_members, offline_members): (Vec<_>, Vec<_>) = members
            .into_iter()
            .partition(|m| active_users.iter().any(|u| u == &m.name));

        ui.vertical(|ui| {
            // Header
            ui.horizontal(|ui| {
                let title = ctx
                    .channel_data
                    .as_ref()
                    .map(|c| c.channel_name.clone())
                    .unwrap_or_default();
                ui.label(
                    egui::RichText::new(format!("MEMBERS - {}", online_members.len() + offline_members.len()))
                        .color(theme::TEXT_MUTED)
                        .small()
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").on_hover_text("Close").clicked() {
                        close = true;
                    }
                    ui.label(egui::RichText::new(title).strong());
                });
            });

            if let Some(description) = ctx.channel_data.as_ref().and_then(|c| c.channel_description.as_deref()) {
                ui.label(egui::RichText::new(description).color(theme::TEXT_MUTED).small());
            }

            ui.add_space(8.0);

            // Online section
            if !online_members.is_empty() {
                ui.label(
                    egui::RichText::new(format!("ONLINE - {}", online_members.len()))
                        .color(theme::TEXT_MUTED)
                        .small()
                );
                ui.add_space(4.0);

                for member in &online_members {
                    self.render_member(ui, member, true, avatars);
                }

                ui.add_space(8.0);
            }

            // Offline section
            if !offline_members.is_empty() {
                ui.collapsing(
                    egui::RichText::new(format!("OFFLINE - {}", offline_members.len()))
                        .color(theme::TEXT_MUTED)
                        .small(),
                    |ui| {
                        for member in &offline_members {
                            self.render_member(ui, member, false, avatars);
                        }
                    }
                );
            }
        });

        close
    }

    fn render_member(&self, ui: &mut egui::Ui, member: &ChannelMember, online: bool, avatars: &mut AvatarCache) {
        ui.horizontal(|ui| {
            let (response, painter) = ui.allocate_painter(egui::vec2(32.0, 32.0), egui::Sense::hover());
            let rect = response.rect;

            let texture = member
                .user_image
                .as_deref()
                .and_then(|file| avatars.texture(ui.ctx(), file));

            if let Some(texture) = texture {
                paint_avatar(&painter, egui::Rect::from_center_size(rect.center(), egui::vec2(28.0, 28.0)), texture);
            } else {
                // Draw avatar background
                painter.circle_filled(rect.center(), 14.0, theme::BG_ACCENT);

                // Draw initials
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    initials(member.display_name()),
                    egui::FontId::proportional(12.0),
                    theme::TEXT_NORMAL,
                );
            }

            // Draw presence dot
            if online {
                let status_pos = rect.right_bottom() + egui::vec2(-4.0, -4.0);
                painter.circle_filled(status_pos, 5.0, theme::GREEN);
            }

            ui.add_space(4.0);

            ui.vertical(|ui| {
                ui.label(
                    egui::RichText::new(member.display_name())
                        .color(theme::TEXT_NORMAL)
                );
                if member.display_name() != member.name {
                    ui.label(
                        egui::RichText::new(&member.name)
                            .color(theme::TEXT_MUTED)
                            .small()
                    );
                }
            });
        });

        ui.add_space(2.0);
    }
}

impl Default for MemberList {
    fn default() -> Self {
        Self::new()
    }
}
