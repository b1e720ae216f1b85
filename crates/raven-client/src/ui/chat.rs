//! Message list of the current channel, with a hover actions palette per message

use chrono::{Local, NaiveDateTime};
use eframe::egui;
use std::collections::HashMap;

use raven_protocol::{Message, MessageContent};

use super::actions_palette::{ActionsPalette, DataChangedCallback, PaletteContext, PaletteEvent, PaletteProps};
use super::modal::ModalType;
use super::theme;

/// Format a timestamp as relative time ("Just now", "2m ago", etc.)
pub fn format_relative_time(timestamp: NaiveDateTime, now: NaiveDateTime) -> String {
    let duration = now.signed_duration_since(timestamp);

    if duration.num_seconds() < 60 {
        "Just now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() == 1 {
        "Yesterday".to_string()
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        timestamp.format("%b %d, %Y").to_string()
    }
}

/// Single line shown for a message in the reply preview
pub fn message_preview(message: &Message) -> String {
    match &message.content {
        MessageContent::Text { text } => text.lines().next().unwrap_or_default().to_string(),
        MessageContent::File { file } | MessageContent::Image { file } => {
            let name = file.rsplit('/').next().unwrap_or(file);
            format!("📎 {}", name)
        }
        MessageContent::Other => String::new(),
    }
}

pub struct ChatView {
    palette_ctx: PaletteContext,
    on_data_changed: DataChangedCallback,
    /// Palettes by message name, created when a message is first hovered
    palettes: HashMap<String, ActionsPalette>,
    hovered: Option<String>,
    /// Message whose palette disabled scrolling
    scroll_locked_by: Option<String>,
    reply_to: Option<Message>,
    channel_id: Option<String>,
}

impl ChatView {
    pub fn new(palette_ctx: PaletteContext, on_data_changed: DataChangedCallback) -> Self {
        Self {
            palette_ctx,
            on_data_changed,
            palettes: HashMap::new(),
            hovered: None,
            scroll_locked_by: None,
            reply_to: None,
            channel_id: None,
        }
    }

    pub fn reply_to(&self) -> Option<&Message> {
        self.reply_to.as_ref()
    }

    pub fn scroll_enabled(&self) -> bool {
        self.scroll_locked_by.is_none()
    }

    /// Forget per-channel state when the channel changes.
    ///
    /// Dropping the palettes aborts their pending requests.
    fn sync_channel(&mut self, channel_id: &str) {
        if self.channel_id.as_deref() == Some(channel_id) {
            return;
        }
        self.channel_id = Some(channel_id.to_string());
        self.palettes.clear();
        self.hovered = None;
        self.scroll_locked_by = None;
        self.reply_to = None;
    }

    /// Drop palettes whose message is gone, and idle palettes that are no longer hovered
    fn prune_palettes(&mut self, messages: &[Message]) {
        let hovered = self.hovered.clone();
        self.palettes.retain(|name, palette| {
            let exists = messages.iter().any(|m| &m.name == name);
            let busy = palette.modal_type() != ModalType::None || palette.in_flight() > 0;
            exists && (busy || hovered.as_ref() == Some(name))
        });

        if let Some(locked) = &self.scroll_locked_by {
            if !self.palettes.contains_key(locked) {
                self.scroll_locked_by = None;
            }
        }
        if let Some(reply) = &self.reply_to {
            if !messages.iter().any(|m| m.name == reply.name) {
                self.reply_to = None;
            }
        }
    }

    /// Whether `pos` lies on the toolbar of the hovered or pinned palette
    fn over_toolbar(&self, pos: egui::Pos2) -> bool {
        [self.hovered.as_ref(), self.scroll_locked_by.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(|name| self.palettes.get(name))
            .filter_map(ActionsPalette::toolbar_rect)
            .any(|rect| rect.contains(pos))
    }

    fn palette_for(&mut self, name: &str) -> &mut ActionsPalette {
        let ctx = &self.palette_ctx;
        self.palettes
            .entry(name.to_string())
            .or_insert_with(|| ActionsPalette::new(ctx.clone()))
    }

    fn handle_palette_event(&mut self, name: &str, event: PaletteEvent) {
        match event {
            PaletteEvent::Reply(message) => {
                tracing::debug!("Replying to {}", message.name);
                self.reply_to = Some(message);
            }
            PaletteEvent::HoverScroll(false) => {
                self.scroll_locked_by = Some(name.to_string());
            }
            PaletteEvent::HoverScroll(true) => {
                if self.scroll_locked_by.as_deref() == Some(name) {
                    self.scroll_locked_by = None;
                }
            }
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        channel_id: &str,
        messages: &[Message],
        is_loading: bool,
        connection_error: Option<&str>,
    ) {
        self.sync_channel(channel_id);
        self.prune_palettes(messages);

        let now = Local::now().naive_local();
        let pointer = ui.ctx().pointer_hover_pos();
        // The toolbar floats over the previous row, so the pointer on it must not move the hover
        let over_popup = pointer
            .and_then(|pos| ui.ctx().layer_id_at(pos))
            .is_some_and(|layer| layer.order == egui::Order::Foreground);
        let keep_hover = over_popup || pointer.is_some_and(|pos| self.over_toolbar(pos));
        let mut hovered_now: Option<String> = None;
        let mut events: Vec<(String, PaletteEvent)> = Vec::new();

        if let Some(error) = connection_error {
            ui.label(egui::RichText::new(error).color(theme::RED));
        }

        if is_loading && messages.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        }

        let available_height = ui.available_height() - if self.reply_to.is_some() { 40.0 } else { 0.0 };

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .max_height(available_height)
            .stick_to_bottom(true)
            .enable_scrolling(self.scroll_enabled())
            .show(ui, |ui| {
                if messages.is_empty() {
                    ui.label(egui::RichText::new("No messages yet").color(theme::TEXT_MUTED));
                }

                for message in messages {
                    let background = ui.painter().add(egui::Shape::Noop);

                    let row = ui
                        .vertical(|ui| {
                            if !message.is_continuation {
                                ui.add_space(6.0);
                                ui.horizontal(|ui| {
                                    ui.label(egui::RichText::new(&message.owner).strong().color(theme::AUTHOR));
                                    if let Some(creation) = message.creation {
                                        ui.label(
                                            egui::RichText::new(format_relative_time(creation, now))
                                                .small()
                                                .color(theme::TEXT_MUTED),
                                        )
                                        .on_hover_text(creation.format("%B %d, %Y at %I:%M %p").to_string());
                                    }
                                });
                            }

                            match &message.content {
                                MessageContent::Text { text } => {
                                    ui.label(egui::RichText::new(text).color(theme::TEXT_NORMAL));
                                }
                                MessageContent::File { .. } | MessageContent::Image { .. } => {
                                    ui.label(egui::RichText::new(message_preview(message)).color(theme::TEXT_LINK));
                                }
                                MessageContent::Other => {
                                    ui.label(
                                        egui::RichText::new("Unsupported message")
                                            .italics()
                                            .color(theme::TEXT_MUTED),
                                    );
                                }
                            }
                        })
                        .response;

                    let row_rect = egui::Rect::from_x_y_ranges(ui.max_rect().x_range(), row.rect.y_range());
                    let is_hovered = pointer.is_some_and(|pos| row_rect.contains(pos) && ui.clip_rect().contains(pos));
                    if is_hovered {
                        hovered_now = Some(message.name.clone());
                    }

                    let visible = match &self.scroll_locked_by {
                        Some(locked) => locked == &message.name,
                        None => self.hovered.as_deref() == Some(message.name.as_str()),
                    };
                    if visible {
                        ui.painter().set(background, egui::Shape::rect_filled(row_rect, 0.0, theme::BG_SECONDARY));
                    }

                    if message.name.is_empty() || !(visible || self.palettes.contains_key(&message.name)) {
                        continue;
                    }

                    let props = PaletteProps {
                        message,
                        visible,
                        is_continuation: message.is_continuation,
                        has_reply: true,
                        on_data_changed: self.on_data_changed.clone(),
                    };
                    let palette = self.palette_for(&message.name);
                    for event in palette.show(ui, row_rect, &props) {
                        events.push((message.name.clone(), event));
                    }
                }
            });

        for (name, event) in events {
            self.handle_palette_event(&name, event);
        }

        if !keep_hover {
            self.hovered = hovered_now;
        }

        self.show_reply_preview(ui);
    }

    fn show_reply_preview(&mut self, ui: &mut egui::Ui) {
        let Some(reply) = &self.reply_to else {
            return;
        };

        let mut cancel = false;
        egui::Frame::none()
            .fill(theme::BG_SECONDARY)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Replying to").small().color(theme::TEXT_MUTED));
                    ui.label(egui::RichText::new(&reply.owner).small().strong().color(theme::AUTHOR));
                    ui.label(egui::RichText::new(message_preview(reply)).small().color(theme::TEXT_MUTED));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").on_hover_text("Cancel reply").clicked() {
                            cancel = true;
                        }
                    });
                });
            });

        if cancel {
            self.reply_to = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::testing::RecordingBackend;
    use crate::state::Notifications;
    use crate::ui::actions_palette::PaletteAction;
    use crate::ui::headless;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::runtime::Handle;

    fn at(hour: u32, min: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|d| d.and_hms_opt(hour, min, 0))
            .unwrap()
    }

    fn message(name: &str, content: MessageContent) -> Message {
        Message {
            name: name.to_string(),
            owner: "u1".to_string(),
            channel_id: "general".to_string(),
            creation: None,
            is_continuation: false,
            liked_by: None,
            content,
        }
    }

    fn text(name: &str) -> Message {
        message(name, MessageContent::Text { text: "first line\nsecond".to_string() })
    }

    fn chat_view(backend: Arc<RecordingBackend>) -> ChatView {
        let ctx = PaletteContext {
            current_user: "u1".to_string(),
            backend,
            notifications: Notifications::new(),
            runtime: Handle::current(),
            server_url: "http://localhost:8000".to_string(),
        };
        ChatView::new(ctx, Arc::new(|| {}))
    }

    #[test]
    fn test_format_relative_time() {
        let now = at(12, 0, 10);
        assert_eq!(format_relative_time(at(11, 59, 10), now), "Just now");
        assert_eq!(format_relative_time(at(11, 15, 10), now), "45m ago");
        assert_eq!(format_relative_time(at(9, 0, 10), now), "3h ago");
        assert_eq!(format_relative_time(at(11, 0, 9), now), "Yesterday");
        assert_eq!(format_relative_time(at(12, 0, 6), now), "4d ago");
        assert_eq!(format_relative_time(at(12, 0, 1), now), "Mar 01, 2024");
    }

    #[test]
    fn test_message_preview() {
        assert_eq!(message_preview(&text("MSG1")), "first line");
        assert_eq!(
            message_preview(&message("MSG2", MessageContent::Image { file: "/files/cat.png".to_string() })),
            "📎 cat.png"
        );
        assert_eq!(message_preview(&message("MSG3", MessageContent::Other)), "");
    }

    #[tokio::test]
    async fn test_idle_palettes_are_pruned() {
        let (backend, _calls) = RecordingBackend::new();
        let mut view = chat_view(backend);
        let messages = vec![text("MSG1"), text("MSG2")];

        view.sync_channel("general");
        view.hovered = Some("MSG1".to_string());
        view.palette_for("MSG1");
        view.palette_for("MSG2");

        view.prune_palettes(&messages);
        assert!(view.palettes.contains_key("MSG1"));
        assert!(!view.palettes.contains_key("MSG2"));

        view.prune_palettes(&messages[1..]);
        assert!(view.palettes.is_empty());
    }

    #[tokio::test]
    async fn test_busy_palette_survives_hover_loss() {
        let (backend, _calls) = RecordingBackend::delayed(Duration::from_millis(200));
        let mut view = chat_view(backend);
        let messages = vec![text("MSG1")];
        view.sync_channel("general");

        let on_data_changed = view.on_data_changed.clone();
        let props = PaletteProps {
            message: &messages[0],
            visible: true,
            is_continuation: false,
            has_reply: true,
            on_data_changed,
        };
        view.palette_for("MSG1").dispatch(PaletteAction::ToggleLike, &props);

        view.hovered = None;
        view.prune_palettes(&messages);
        assert!(view.palettes.contains_key("MSG1"));
    }

    #[tokio::test]
    async fn test_scroll_lock_follows_palette_events() {
        let (backend, _calls) = RecordingBackend::new();
        let mut view = chat_view(backend);
        view.sync_channel("general");
        assert!(view.scroll_enabled());

        view.handle_palette_event("MSG1", PaletteEvent::HoverScroll(false));
        assert!(!view.scroll_enabled());

        view.handle_palette_event("MSG2", PaletteEvent::HoverScroll(true));
        assert!(!view.scroll_enabled());

        view.handle_palette_event("MSG1", PaletteEvent::HoverScroll(true));
        assert!(view.scroll_enabled());
    }

    #[tokio::test]
    async fn test_switching_channel_resets_state() {
        let (backend, _calls) = RecordingBackend::new();
        let mut view = chat_view(backend);
        view.sync_channel("general");
        view.palette_for("MSG1");
        view.handle_palette_event("MSG1", PaletteEvent::Reply(text("MSG1")));
        view.handle_palette_event("MSG1", PaletteEvent::HoverScroll(false));
        assert!(view.reply_to().is_some());

        view.sync_channel("random");
        assert!(view.palettes.is_empty());
        assert!(view.reply_to().is_none());
        assert!(view.scroll_enabled());
    }

    #[tokio::test]
    async fn test_continuation_toolbar_keeps_hover() {
        let (backend, _calls) = RecordingBackend::new();
        let mut view = chat_view(backend);
        let mut follow_up = message("MSG2", MessageContent::Text { text: "follow up".to_string() });
        follow_up.is_continuation = true;
        let messages = vec![
            message("MSG1", MessageContent::Text { text: "opening".to_string() }),
            follow_up,
        ];
        let ctx = egui::Context::default();

        let output = headless::settle(&ctx, 2, |ui| view.show(ui, "general", &messages, false, None));
        let row = headless::text_rect(&output, "follow up").expect("message drawn");

        headless::run_frame(&ctx, headless::pointer_moved(row.center()), |ui| {
            view.show(ui, "general", &messages, false, None)
        });
        assert_eq!(view.hovered.as_deref(), Some("MSG2"));

        headless::settle(&ctx, 3, |ui| view.show(ui, "general", &messages, false, None));
        let toolbar = view
            .palettes
            .get("MSG2")
            .and_then(ActionsPalette::toolbar_rect)
            .expect("toolbar drawn");

        // The toolbar of a continuation sits over the row above it
        let on_toolbar = toolbar.center_top() + egui::vec2(0.0, 3.0);
        assert!(on_toolbar.y < row.top());

        headless::run_frame(&ctx, headless::pointer_moved(on_toolbar), |ui| {
            view.show(ui, "general", &messages, false, None)
        });
        headless::settle(&ctx, 2, |ui| view.show(ui, "general", &messages, false, None));

        assert_eq!(view.hovered.as_deref(), Some("MSG2"));
        assert!(view.palettes.contains_key("MSG2"));
    }
}
