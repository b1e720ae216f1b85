//! Hover toolbar attached to a single message
//!
//! Quick reactions, the emoji picker, reply, edit, save (like), download and
//! delete. Each palette owns the one modal it may have open and every request
//! it spawned; dropping the palette aborts those requests.

use eframe::egui;
use std::sync::Arc;
use tokio::runtime::Handle;

use raven_protocol::{CreateReaction, Message, ToggleLike};

use crate::network::{resolve_file_url, MessageBackend};
use crate::state::Notifications;
use crate::tasks::TaskScope;

use super::emoji_button::EmojiButton;
use super::emoji_picker::{EmojiPicker, EmojiPickerEvent};
use super::message_modals::{DeleteMessageModal, DeleteModalEvent, EditMessageModal, EditModalEvent};
use super::modal::{ModalManager, ModalType};
use super::theme;

/// One-click reactions: emoji and tooltip
pub const QUICK_REACTIONS: &[(&str, &str)] = &[
    ("✅", "done"),
    ("👀", "looking into this..."),
    ("🎉", "great job!"),
];

/// Distance of the palette above the first message of a group
const TOP_OFFSET: f32 = 16.0;
/// Distance above a continuation message
const CONTINUATION_TOP_OFFSET: f32 = 28.0;
const RIGHT_OFFSET: f32 = 8.0;

/// Called after a request changed message data on the server
pub type DataChangedCallback = Arc<dyn Fn() + Send + Sync>;

/// Everything a palette needs besides the message itself
#[derive(Clone)]
pub struct PaletteContext {
    pub current_user: String,
    pub backend: Arc<dyn MessageBackend>,
    pub notifications: Notifications,
    pub runtime: Handle,
    /// Base for resolving relative file URLs
    pub server_url: String,
}

/// Per-frame inputs from the parent
pub struct PaletteProps<'a> {
    pub message: &'a Message,
    /// Whether the toolbar should be drawn this frame
    pub visible: bool,
    /// The message continues the previous author's group (vertical offset only)
    pub is_continuation: bool,
    /// Whether the parent handles replies
    pub has_reply: bool,
    pub on_data_changed: DataChangedCallback,
}

/// What the user did in the palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteAction {
    QuickReact(String),
    OpenEmojiPicker,
    PickEmoji(String),
    Reply,
    Edit,
    ToggleLike,
    Download,
    Delete,
    ConfirmDelete,
    SubmitEdit(String),
    CloseModal,
}

/// Notifications for the parent
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteEvent {
    /// Compose a reply to this message
    Reply(Message),
    /// `false` while the palette must stay pinned (emoji picker open)
    HoverScroll(bool),
}

/// Controls derived from a message and the current user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteControls {
    pub text: String,
    pub file: String,
    pub liked: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub download: Option<String>,
}

impl PaletteControls {
    pub fn for_message(message: &Message, current_user: &str) -> Self {
        let text = message.text().to_string();
        let file = message.file().to_string();
        let is_owner = message.is_owned_by(current_user);

        Self {
            liked: message.is_liked_by(current_user),
            can_edit: is_owner && !text.is_empty(),
            can_delete: is_owner,
            download: if file.is_empty() { None } else { Some(file.clone()) },
            text,
            file,
        }
    }

    pub fn like_label(&self) -> &'static str {
        if self.liked { "unsave" } else { "save" }
    }

    /// Filled star when saved, outline otherwise
    pub fn like_icon(&self) -> &'static str {
        if self.liked { "★" } else { "☆" }
    }
}

pub struct ActionsPalette {
    ctx: PaletteContext,
    modal: ModalManager,
    emoji_picker: EmojiPicker,
    delete_modal: DeleteMessageModal,
    edit_modal: EditMessageModal,
    tasks: TaskScope,
    /// Modal state last reported through `HoverScroll`
    reported_modal: Option<ModalType>,
    /// Screen area of the toolbar, when it was drawn in the last frame
    toolbar_rect: Option<egui::Rect>,
}

impl ActionsPalette {
    pub fn new(ctx: PaletteContext) -> Self {
        let tasks = TaskScope::new(ctx.runtime.clone());
        Self {
            ctx,
            modal: ModalManager::new(),
            emoji_picker: EmojiPicker::new(),
            delete_modal: DeleteMessageModal,
            edit_modal: EditMessageModal::default(),
            tasks,
            reported_modal: None,
            toolbar_rect: None,
        }
    }

    pub fn modal_type(&self) -> ModalType {
        self.modal.modal_type()
    }

    pub fn toolbar_rect(&self) -> Option<egui::Rect> {
        self.toolbar_rect
    }

    /// Requests spawned by this palette that are still running
    pub fn in_flight(&self) -> usize {
        self.tasks.in_flight()
    }

    /// Hover-scroll state to report, once per modal change.
    ///
    /// The first call always reports, like an effect on mount.
    pub fn scroll_lock_change(&mut self) -> Option<bool> {
        let current = self.modal.modal_type();
        if self.reported_modal == Some(current) {
            return None;
        }
        self.reported_modal = Some(current);
        Some(current != ModalType::EmojiPicker)
    }

    /// Apply one user action
    pub fn dispatch(&mut self, action: PaletteAction, props: &PaletteProps<'_>) -> Option<PaletteEvent> {
        let controls = PaletteControls::for_message(props.message, &self.ctx.current_user);

        match action {
            PaletteAction::QuickReact(emoji) => {
                self.save_reaction(props.message, &emoji);
            }
            PaletteAction::OpenEmojiPicker => {
                self.emoji_picker.open();
                self.modal.open_modal(ModalType::EmojiPicker);
            }
            PaletteAction::PickEmoji(emoji) => {
                if self.modal.modal_type() == ModalType::EmojiPicker {
                    self.save_reaction(props.message, &emoji);
                    self.modal.close_modal();
                }
            }
            PaletteAction::Reply => {
                if props.has_reply {
                    return Some(PaletteEvent::Reply(props.message.clone()));
                }
            }
            PaletteAction::Edit => {
                if controls.can_edit {
                    self.edit_modal.open(&controls.text);
                    self.modal.open_modal(ModalType::EditMessage);
                }
            }
            PaletteAction::ToggleLike => {
                self.toggle_like(props.message, controls.liked, props.on_data_changed.clone());
            }
            PaletteAction::Download => {
                if let Some(file) = &controls.download {
                    let url = resolve_file_url(&self.ctx.server_url, file);
                    if let Err(e) = open::that(&url) {
                        tracing::warn!("Failed to open {}: {}", url, e);
                        self.ctx.notifications.error(format!("Could not open file: {}", e));
                    }
                }
            }
            PaletteAction::Delete => {
                if controls.can_delete {
                    self.modal.open_modal(ModalType::DeleteMessage);
                }
            }
            PaletteAction::ConfirmDelete => {
                if controls.can_delete {
                    self.delete_message(props.message, props.on_data_changed.clone());
                }
                self.modal.close_modal();
            }
            PaletteAction::SubmitEdit(text) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    return None;
                }
                if controls.can_edit && text != controls.text.trim() {
                    self.edit_message(props.message, text, props.on_data_changed.clone());
                }
                self.modal.close_modal();
            }
            PaletteAction::CloseModal => {
                self.modal.close_modal();
            }
        }

        None
    }

    fn save_reaction(&mut self, message: &Message, emoji: &str) {
        let Some(name) = message.identifier() else {
            tracing::debug!("Ignoring reaction on unsaved message");
            return;
        };

        let request = CreateReaction {
            reaction: emoji.to_string(),
            user: self.ctx.current_user.clone(),
            message: name.to_string(),
        };
        let backend = self.ctx.backend.clone();
        let notifications = self.ctx.notifications.clone();

        self.tasks.spawn(async move {
            if let Err(e) = backend.create_reaction(request).await {
                tracing::warn!("Failed to add reaction: {}", e);
                notifications.error(format!("Could not add reaction: {}", e));
            }
        });
    }

    fn toggle_like(&mut self, message: &Message, liked: bool, on_data_changed: DataChangedCallback) {
        let Some(name) = message.identifier() else {
            tracing::debug!("Ignoring save on unsaved message");
            return;
        };

        let request = ToggleLike::for_message(name, liked);
        let backend = self.ctx.backend.clone();
        let notifications = self.ctx.notifications.clone();

        self.tasks.spawn(async move {
            match backend.toggle_like(request).await {
                Ok(()) => on_data_changed(),
                Err(e) => {
                    tracing::warn!("Failed to toggle save: {}", e);
                    notifications.error(format!("Could not update saved messages: {}", e));
                }
            }
        });
    }

    fn delete_message(&mut self, message: &Message, on_data_changed: DataChangedCallback) {
        let Some(name) = message.identifier().map(str::to_string) else {
            return;
        };
        let backend = self.ctx.backend.clone();
        let notifications = self.ctx.notifications.clone();

        self.tasks.spawn(async move {
            match backend.delete_message(&name).await {
                Ok(()) => {
                    notifications.info("Message deleted");
                    on_data_changed();
                }
                Err(e) => {
                    tracing::warn!("Failed to delete message {}: {}", name, e);
                    notifications.error(format!("Could not delete message: {}", e));
                }
            }
        });
    }

    fn edit_message(&mut self, message: &Message, text: String, on_data_changed: DataChangedCallback) {
        let Some(name) = message.identifier().map(str::to_string) else {
            return;
        };
        let backend = self.ctx.backend.clone();
        let notifications = self.ctx.notifications.clone();

        self.tasks.spawn(async move {
            match backend.edit_message(&name, &text).await {
                Ok(()) => on_data_changed(),
                Err(e) => {
                    tracing::warn!("Failed to edit message {}: {}", name, e);
                    notifications.error(format!("Could not edit message: {}", e));
                }
            }
        });
    }

    /// Draw the toolbar above the top-right corner of `message_rect` and any open modal.
    ///
    /// Returns events for the parent, including hover-scroll changes.
    pub fn show(&mut self, ui: &mut egui::Ui, message_rect: egui::Rect, props: &PaletteProps<'_>) -> Vec<PaletteEvent> {
        let controls = PaletteControls::for_message(props.message, &self.ctx.current_user);
        let id = ui.id().with(("actions_palette", &props.message.name));
        let mut actions = Vec::new();
        let mut picker_anchor = None;
        self.toolbar_rect = None;

        if props.visible || self.modal.modal_type() != ModalType::None {
            let top_offset = if props.is_continuation {
                CONTINUATION_TOP_OFFSET
            } else {
                TOP_OFFSET
            };

            let toolbar = egui::Area::new(id)
                .order(egui::Order::Foreground)
                .pivot(egui::Align2::RIGHT_TOP)
                .fixed_pos(egui::pos2(
                    message_rect.right() - RIGHT_OFFSET,
                    message_rect.top() - top_offset,
                ))
                .show(ui.ctx(), |ui| {
                    egui::Frame::none()
                        .fill(theme::BG_PALETTE)
                        .stroke(egui::Stroke::new(1.0, theme::BORDER))
                        .rounding(6.0)
                        .inner_margin(4.0)
                        .show(ui, |ui| {
                            ui.spacing_mut().item_spacing = egui::vec2(4.0, 0.0);
                            ui.horizontal(|ui| {
                                for (emoji, label) in QUICK_REACTIONS {
                                    EmojiButton::new(emoji, label).show(ui, || {
                                        actions.push(PaletteAction::QuickReact(emoji.to_string()));
                                    });
                                }

                                let picker_btn = ui.small_button("☺").on_hover_text("find another reaction");
                                if picker_btn.clicked() {
                                    actions.push(PaletteAction::OpenEmojiPicker);
                                }
                                picker_anchor = Some(picker_btn.rect.left_bottom() + egui::vec2(0.0, 4.0));

                                if ui.small_button("↩").on_hover_text("reply").clicked() {
                                    actions.push(PaletteAction::Reply);
                                }

                                if controls.can_edit && ui.small_button("✏").on_hover_text("edit").clicked() {
                                    actions.push(PaletteAction::Edit);
                                }

                                if ui
                                    .small_button(controls.like_icon())
                                    .on_hover_text(controls.like_label())
                                    .clicked()
                                {
                                    actions.push(PaletteAction::ToggleLike);
                                }

                                if controls.download.is_some()
                                    && ui.small_button("⬇").on_hover_text("download").clicked()
                                {
                                    actions.push(PaletteAction::Download);
                                }

                                if controls.can_delete
                                    && ui
                                        .small_button(egui::RichText::new("🗑").color(theme::RED))
                                        .on_hover_text("delete")
                                        .clicked()
                                {
                                    actions.push(PaletteAction::Delete);
                                }
                            });
                        });
                });
            self.toolbar_rect = Some(toolbar.response.rect);
        }

        match self.modal.modal_type() {
            ModalType::EmojiPicker => {
                let anchor = picker_anchor.unwrap_or_else(|| message_rect.right_top());
                match self.emoji_picker.show(ui.ctx(), id.with("emoji_picker"), anchor) {
                    Some(EmojiPickerEvent::Picked(emoji)) => actions.push(PaletteAction::PickEmoji(emoji)),
                    Some(EmojiPickerEvent::Closed) => actions.push(PaletteAction::CloseModal),
                    None => {}
                }
            }
            ModalType::DeleteMessage => match self.delete_modal.show(ui.ctx(), id.with("delete")) {
                Some(DeleteModalEvent::Confirm) => actions.push(PaletteAction::ConfirmDelete),
                Some(DeleteModalEvent::Cancel) => actions.push(PaletteAction::CloseModal),
                None => {}
            },
            ModalType::EditMessage => match self.edit_modal.show(ui.ctx(), id.with("edit")) {
                Some(EditModalEvent::Save(text)) => actions.push(PaletteAction::SubmitEdit(text)),
                Some(EditModalEvent::Cancel) => actions.push(PaletteAction::CloseModal),
                None => {}
            },
            ModalType::None => {}
        }

        let mut events: Vec<PaletteEvent> = actions
            .into_iter()
            .filter_map(|action| self.dispatch(action, props))
            .collect();

        if let Some(enabled) = self.scroll_lock_change() {
            events.push(PaletteEvent::HoverScroll(enabled));
        }

        events
    }
}
