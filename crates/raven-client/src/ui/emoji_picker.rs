use eframe::egui;

use super::theme;

/// Number of columns in the emoji grid
const GRID_COLUMNS: usize = 8;

/// Emoji cell size in pixels
const CELL_SIZE: f32 = 28.0;

/// An emoji with the keywords it can be searched by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emoji {
    pub symbol: &'static str,
    pub keywords: &'static str,
}

const fn e(symbol: &'static str, keywords: &'static str) -> Emoji {
    Emoji { symbol, keywords }
}

pub const CATEGORIES: &[(&str, &[Emoji])] = &[
    (
        "Smileys",
        &[
            e("😀", "grinning smile happy"),
            e("😂", "joy laugh tears"),
            e("🙂", "slight smile"),
            e("😉", "wink"),
            e("😍", "heart eyes love"),
            e("🤔", "thinking hmm"),
            e("😮", "open mouth wow surprised"),
            e("😢", "cry sad tear"),
            e("😡", "angry rage"),
            e("😴", "sleep tired"),
            e("🙏", "pray please thanks"),
            e("🤝", "handshake deal"),
        ],
    ),
    (
        "Gestures",
        &[
            e("👍", "thumbs up yes like"),
            e("👎", "thumbs down no dislike"),
            e("👏", "clap applause"),
            e("🙌", "raised hands celebrate"),
            e("👋", "wave hello bye"),
            e("💪", "muscle strong"),
            e("👀", "eyes looking watching"),
            e("🫡", "salute"),
        ],
    ),
    (
        "Symbols",
        &[
            e("✅", "check done complete yes"),
            e("❌", "cross no wrong"),
            e("❤️", "heart love red"),
            e("🔥", "fire hot lit"),
            e("⭐", "star favourite"),
            e("⚠️", "warning caution"),
            e("❓", "question"),
            e("💯", "hundred perfect"),
        ],
    ),
    (
        "Objects",
        &[
            e("🎉", "tada party celebrate congrats"),
            e("🚀", "rocket launch ship"),
            e("🐛", "bug insect"),
            e("📌", "pin pushpin"),
            e("📎", "paperclip attachment"),
            e("💡", "bulb idea"),
            e("☕", "coffee tea"),
            e("🍕", "pizza food"),
        ],
    ),
];

/// Emojis whose symbol or keywords match `query`, case-insensitively
pub fn filter_emojis(query: &str) -> Vec<Emoji> {
    let query = query.trim().to_lowercase();
    CATEGORIES
        .iter()
        .flat_map(|(_, emojis)| emojis.iter().copied())
        .filter(|emoji| {
            query.is_empty()
                || emoji.symbol == query
                || emoji.keywords.split_whitespace().any(|k| k.starts_with(&query))
        })
        .collect()
}

/// Result of one frame of the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmojiPickerEvent {
    Picked(String),
    Closed,
}

/// Popover grid of emojis with a search box
pub struct EmojiPicker {
    search_query: String,
    /// Skip outside-click detection on the frame the picker opened
    just_opened: bool,
}

impl EmojiPicker {
    pub fn new() -> Self {
        Self {
            search_query: String::new(),
            just_opened: false,
        }
    }

    pub fn open(&mut self) {
        self.search_query.clear();
        self.just_opened = true;
    }

    pub fn show(&mut self, ctx: &egui::Context, id: egui::Id, anchor: egui::Pos2) -> Option<EmojiPickerEvent> {
        let mut event = None;

        let area = egui::Area::new(id)
            .order(egui::Order::Foreground)
            .fixed_pos(anchor)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(GRID_COLUMNS as f32 * (CELL_SIZE + 4.0));

                    let search = ui.add(
                        egui::TextEdit::singleline(&mut self.search_query)
                            .hint_text("Search emoji")
                            .desired_width(f32::INFINITY),
                    );
                    if self.just_opened {
                        search.request_focus();
                    }

                    ui.add_space(4.0);

                    if self.search_query.trim().is_empty() {
                        egui::ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                            for (category, emojis) in CATEGORIES {
                                ui.label(egui::RichText::new(*category).small().color(theme::TEXT_MUTED));
                                if let Some(picked) = Self::grid(ui, category, emojis) {
                                    event = Some(EmojiPickerEvent::Picked(picked));
                                }
                            }
                        });
                    } else {
                        let matches = filter_emojis(&self.search_query);
                        if matches.is_empty() {
                            ui.label(egui::RichText::new("No emoji found").color(theme::TEXT_MUTED));
                        } else if let Some(picked) = Self::grid(ui, "search", &matches) {
                            event = Some(EmojiPickerEvent::Picked(picked));
                        }
                    }
                });
            });

        let escape = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if event.is_none() && (escape || (!self.just_opened && area.response.clicked_elsewhere())) {
            event = Some(EmojiPickerEvent::Closed);
        }

        self.just_opened = false;
        event
    }

    fn grid(ui: &mut egui::Ui, id_salt: &str, emojis: &[Emoji]) -> Option<String> {
        let mut picked = None;
        egui::Grid::new(("emoji_grid", id_salt))
            .spacing(egui::vec2(2.0, 2.0))
            .show(ui, |ui| {
                for (i, emoji) in emojis.iter().enumerate() {
                    let button = egui::Button::new(egui::RichText::new(emoji.symbol).size(18.0))
                        .frame(false)
                        .min_size(egui::vec2(CELL_SIZE, CELL_SIZE));
                    if ui.add(button).on_hover_text(emoji.keywords).clicked() {
                        picked = Some(emoji.symbol.to_string());
                    }
                    if (i + 1) % GRID_COLUMNS == 0 {
                        ui.end_row();
                    }
                }
            });
        picked
    }
}

impl Default for EmojiPicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_lists_everything() {
        let total: usize = CATEGORIES.iter().map(|(_, emojis)| emojis.len()).sum();
        assert_eq!(filter_emojis("  ").len(), total);
    }

    #[test]
    fn test_keyword_prefix_match() {
        let matches = filter_emojis("Celeb");
        let symbols: Vec<_> = matches.iter().map(|e| e.symbol).collect();
        assert_eq!(symbols, vec!["🙌", "🎉"]);
    }

    #[test]
    fn test_symbol_match_and_no_match() {
        assert_eq!(filter_emojis("🚀").len(), 1);
        assert!(filter_emojis("zzz-not-an-emoji").is_empty());
    }
}
