use eframe::egui;

use crate::state::ChannelContext;

use super::avatars::{paint_avatar, AvatarCache};
use super::theme;

/// Avatars shown before collapsing the rest into `+N`
pub const MAX_VISIBLE_AVATARS: usize = 2;

const AVATAR_SIZE: f32 = 22.0;
const AVATAR_OVERLAP: f32 = 4.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarView {
    pub name: String,
    pub display_name: String,
    pub initials: String,
    /// Avatar file, when the member has one
    pub image: Option<String>,
    /// Member is currently online
    pub online: bool,
}

/// What the members button shows for a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembersSummary {
    pub avatars: Vec<AvatarView>,
    /// Members not shown as avatars
    pub overflow: usize,
    pub show_add_members: bool,
}

/// Up to two uppercase initials of a display name
pub fn initials(display_name: &str) -> String {
    let initials: String = display_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();

    if initials.is_empty() { "?".to_string() } else { initials }
}

impl MembersSummary {
    pub fn new(ctx: &ChannelContext, active_users: &[String]) -> Self {
        let mut members: Vec<_> = ctx.channel_members.values().collect();
        members.sort_by(|a, b| a.display_name().cmp(b.display_name()).then_with(|| a.name.cmp(&b.name)));

        let avatars = members
            .iter()
            .take(MAX_VISIBLE_AVATARS)
            .map(|member| AvatarView {
                name: member.name.clone(),
                display_name: member.display_name().to_string(),
                initials: initials(member.display_name()),
                image: member.user_image.clone().filter(|image| !image.is_empty()),
                online: active_users.iter().any(|u| u == &member.name),
            })
            .collect();

        Self {
            avatars,
            overflow: members.len().saturating_sub(MAX_VISIBLE_AVATARS),
            show_add_members: ctx
                .channel_data
                .as_ref()
                .is_some_and(|channel| channel.channel_type.can_add_members()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.avatars.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembersButtonEvent {
    ViewMembers,
    AddMembers,
}

/// Channel header control: member avatars, plus "add members" where allowed
pub struct ViewOrAddMembersButton;

impl ViewOrAddMembersButton {
    pub fn show(
        ui: &mut egui::Ui,
        ctx: &ChannelContext,
        active_users: &[String],
        avatars: &mut AvatarCache,
    ) -> Option<MembersButtonEvent> {
        let summary = MembersSummary::new(ctx, active_users);
        let mut event = None;

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;

            if Self::members_button(ui, &summary, avatars)
                .on_hover_text("view members/ channel details")
                .clicked()
            {
                event = Some(MembersButtonEvent::ViewMembers);
            }

            if summary.show_add_members
                && ui
                    .button("➕")
                    .on_hover_text("add members")
                    .clicked()
            {
                event = Some(MembersButtonEvent::AddMembers);
            }
        });

        event
    }

    fn members_button(ui: &mut egui::Ui, summary: &MembersSummary, avatars: &mut AvatarCache) -> egui::Response {
        let overflow_text = (summary.overflow > 0).then(|| format!("+{}", summary.overflow));
        let avatars_width = if summary.is_empty() {
            AVATAR_SIZE
        } else {
            summary.avatars.len() as f32 * (AVATAR_SIZE - AVATAR_OVERLAP) + AVATAR_OVERLAP
        };
        let overflow_width = if overflow_text.is_some() { AVATAR_SIZE } else { 0.0 };
        let size = egui::vec2(avatars_width + overflow_width + 12.0, AVATAR_SIZE + 8.0);

        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
        if !ui.is_rect_visible(rect) {
            return response;
        }

        let painter = ui.painter();
        let visuals = ui.style().interact(&response);
        painter.rect(rect, 4.0, visuals.weak_bg_fill, visuals.bg_stroke);

        let mut x = rect.left() + 6.0;
        let center_y = rect.center().y;

        if summary.is_empty() {
            painter.text(
                egui::pos2(x + AVATAR_SIZE / 2.0, center_y),
                egui::Align2::CENTER_CENTER,
                "👤",
                egui::FontId::proportional(14.0),
                theme::TEXT_MUTED,
            );
            return response;
        }

        for avatar in &summary.avatars {
            let avatar_rect = egui::Rect::from_min_size(
                egui::pos2(x, center_y - AVATAR_SIZE / 2.0),
                egui::vec2(AVATAR_SIZE, AVATAR_SIZE),
            );
            let texture = avatar
                .image
                .as_deref()
                .and_then(|file| avatars.texture(ui.ctx(), file));
            match texture {
                Some(texture) => paint_avatar(painter, avatar_rect, texture),
                None => {
                    painter.rect_filled(avatar_rect, 4.0, theme::BG_ACCENT);
                    painter.text(
                        avatar_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        &avatar.initials,
                        egui::FontId::proportional(10.0),
                        theme::TEXT_NORMAL,
                    );
                }
            }

            // Presence badge
            if avatar.online {
                painter.circle_filled(avatar_rect.right_bottom() + egui::vec2(-3.0, -3.0), 3.5, theme::GREEN);
            }

            x += AVATAR_SIZE - AVATAR_OVERLAP;
        }

        if let Some(text) = overflow_text {
            painter.text(
                egui::pos2(x + AVATAR_OVERLAP + AVATAR_SIZE / 2.0, center_y),
                egui::Align2::CENTER_CENTER,
                text,
                egui::FontId::proportional(10.0),
                theme::TEXT_MUTED,
            );
        }

        response
    }
}
